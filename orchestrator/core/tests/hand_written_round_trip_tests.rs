// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Streams written by hand, the way operators keep them in a repository:
//! parse, check for submission, encode, and parse again.

use kmanifest_core::domain::auxiliary::StorageParameters;
use kmanifest_core::domain::kind::Kind;
use kmanifest_core::domain::manifest::{AnyManifest, Controller, Workload};
use kmanifest_core::infrastructure::{ManifestEncoder, ManifestParser};

const STREAM: &str = r#"
# web tier
apiVersion: apps/v1
kind: Deployment
metadata:
  name: web
  namespace: shop
  labels:
    tier: frontend
spec:
  replicas: 3
  revisionHistoryLimit: 5
  strategy:
    type: RollingUpdate
    rollingUpdate:
      maxSurge: 1
      maxUnavailable: 25%
  selector:
    matchLabels:
      app: web
  template:
    metadata:
      labels:
        app: web
        tier: frontend
    spec:
      serviceAccountName: web
      containers:
      - name: nginx
        image: nginx:1.25
        ports:
        - containerPort: 80
        resources:
          requests:
            cpu: 250m
            memory: 128Mi
            ephemeral-storage: 1Gi
          limits:
            memory: 256Mi
        readinessProbe:
          httpGet:
            path: /healthz
            port: 80
          periodSeconds: 5
---
apiVersion: apps/v1
kind: StatefulSet
metadata:
  name: db
  namespace: shop
spec:
  replicas: 2
  serviceName: db
  selector:
    matchLabels:
      app: db
  template:
    metadata:
      labels:
        app: db
    spec:
      containers:
      - name: postgres
        image: postgres:16
        volumeMounts:
        - name: data
          mountPath: /var/lib/postgresql/data
        - name: logs
          mountPath: /var/log/postgresql
  volumeClaimTemplates:
  - metadata:
      name: data
    spec:
      accessModes:
      - ReadWriteOnce
      storageClassName: rbd-fast
      resources:
        requests:
          storage: 20Gi
  - metadata:
      name: logs
    spec:
      accessModes:
      - ReadWriteOnce
      resources:
        requests:
          storage: 2Gi
---
apiVersion: storage.k8s.io/v1
kind: StorageClass
metadata:
  name: rbd-fast
provisioner: kubernetes.io/rbd
reclaimPolicy: Retain
allowVolumeExpansion: false
parameters:
  monitors: 10.16.153.105:6789,10.16.153.106:6789
  adminId: admin
  adminSecretName: ceph-secret
  adminSecretNamespace: kube-system
  pool: kube
  userId: kube
  userSecretName: ceph-secret-user
  userSecretNamespace: shop
  fsType: ext4
  imageFormat: "2"
  imageFeatures: layering
"#;

const EXTENSIONS: &str = r#"
apiVersion: v1
kind: ServiceAccount
metadata:
  name: web
  namespace: shop
imagePullSecrets:
- name: registry
automountServiceAccountToken: false
---
apiVersion: v1
kind: Endpoints
metadata:
  name: legacy-db
  namespace: shop
subsets:
- addresses:
  - ip: 192.168.10.4
  notReadyAddresses:
  - ip: 192.168.10.5
  ports:
  - name: pg
    port: 5432
    protocol: TCP
---
apiVersion: apiextensions.k8s.io/v1
kind: CustomResourceDefinition
metadata:
  name: backups.shop.example.com
spec:
  group: shop.example.com
  versions:
  - name: v1
    served: true
    storage: true
    schema:
      openAPIV3Schema:
        type: object
  scope: Namespaced
  names:
    plural: backups
    singular: backup
    kind: Backup
    shortNames:
    - bk
"#;

fn round_trip(yaml: &str) -> Vec<AnyManifest> {
    let parsed = ManifestParser::parse_str(yaml).unwrap();
    for manifest in &parsed {
        ManifestParser::check_submission(manifest).unwrap();
    }
    let encoder = ManifestEncoder::default();
    let first = String::from_utf8(encoder.encode_all(&parsed).unwrap()).unwrap();
    let reparsed = ManifestParser::parse_str(&first).unwrap();
    assert_eq!(reparsed, parsed);
    let second = String::from_utf8(encoder.encode_all(&reparsed).unwrap()).unwrap();
    assert_eq!(first, second);
    reparsed
}

#[test]
fn test_hand_written_stream_survives_round_trip() {
    let manifests = round_trip(STREAM);
    let kinds: Vec<Kind> = manifests.iter().map(AnyManifest::kind).collect();
    assert_eq!(kinds, [Kind::Deployment, Kind::StatefulSet, Kind::StorageClass]);

    let AnyManifest::Deployment(web) = &manifests[0] else {
        panic!("expected Deployment");
    };
    assert_eq!(web.replicas(), 3);
    assert_eq!(web.selector().match_labels().get("app").map(String::as_str), Some("web"));
    let nginx = &web.containers()[0];
    assert!(nginx.readiness_probe().is_some());
    assert_eq!(
        nginx
            .resources()
            .requests
            .extended
            .get("ephemeral-storage")
            .map(|q| q.as_str()),
        Some("1Gi")
    );

    let AnyManifest::StatefulSet(db) = &manifests[1] else {
        panic!("expected StatefulSet");
    };
    let claims: Vec<&str> = db
        .volume_claim_templates()
        .iter()
        .map(|t| t.metadata().name())
        .collect();
    assert_eq!(claims, ["data", "logs"]);
    assert_eq!(
        db.volume_claim_templates()[0].spec().storage_class_name(),
        Some("rbd-fast")
    );
    assert_eq!(
        db.volume_claim_templates()[1].spec().storage().map(|q| q.as_str()),
        Some("2Gi")
    );

    let AnyManifest::StorageClass(sc) = &manifests[2] else {
        panic!("expected StorageClass");
    };
    assert!(!sc.allow_volume_expansion());
    match sc.get_parameters() {
        StorageParameters::CephRbd(params) => {
            assert_eq!(params.user_secret_namespace(), "shop");
            assert_eq!(params.monitors(), "10.16.153.105:6789,10.16.153.106:6789");
            assert_eq!(params.image_format(), "2");
        }
        other => panic!("expected rbd parameters, got {other:?}"),
    }
}

#[test]
fn test_extension_kinds_survive_round_trip() {
    let manifests = round_trip(EXTENSIONS);
    let kinds: Vec<Kind> = manifests.iter().map(AnyManifest::kind).collect();
    assert_eq!(
        kinds,
        [Kind::ServiceAccount, Kind::Endpoints, Kind::CustomResourceDefinition]
    );
    assert_eq!(manifests[2].name(), "backups.shop.example.com");
    assert_eq!(manifests[2].metadata().namespace(), None);
}

#[test]
fn test_dropped_claim_field_is_reported() {
    let typo = STREAM.replace("      storageClassName: rbd-fast", "      storageClass: rbd-fast");
    let err = ManifestParser::parse_str(&typo).unwrap_err();
    assert!(
        err.to_string()
            .contains("spec.volumeClaimTemplates[0].spec.storageClass"),
        "{err}"
    );
}
