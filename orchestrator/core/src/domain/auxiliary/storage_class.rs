// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Storage Class
//!
//! Dynamic-provisioning profile. The `parameters` block depends on the
//! provisioner: `kubernetes.io/rbd` gets the typed [`CephRbdParameters`]
//! (seeded with defaults), anything else an untyped string map. Switching
//! provisioner resets the parameters.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Cluster-scoped storage profile with provisioner-specific parameters

use crate::domain::error::{ValidationError, ValidationResult};
use crate::domain::kind::{Kind, TypeMeta};
use crate::domain::metadata::ObjectMeta;
use crate::domain::primitives::{parse_enum, require_non_empty, validate_pairs, KeyValue};
use crate::domain::schema::{ReclaimPolicy, CEPH_RBD_PROVISIONER, FS_TYPES};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::net::SocketAddr;

const IMAGE_FORMATS: &[&str] = &["1", "2"];

// ============================================================================
// Ceph RBD parameters
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CephRbdParameters {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    monitors: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    admin_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    admin_secret_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    admin_secret_namespace: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pool: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    user_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    user_secret_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    user_secret_namespace: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    fs_type: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    image_format: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    image_features: String,
}

impl Default for CephRbdParameters {
    fn default() -> Self {
        Self {
            monitors: String::new(),
            admin_id: "admin".to_string(),
            admin_secret_name: "admin".to_string(),
            admin_secret_namespace: String::new(),
            pool: String::new(),
            user_id: String::new(),
            user_secret_name: String::new(),
            user_secret_namespace: String::new(),
            fs_type: "xfs".to_string(),
            image_format: "2".to_string(),
            image_features: "layering".to_string(),
        }
    }
}

fn check_monitors(monitors: &str) -> ValidationResult {
    require_non_empty("parameters.monitors", monitors)?;
    for entry in monitors.split(',').map(str::trim) {
        let addr: SocketAddr = entry.parse().map_err(|_| {
            ValidationError::invalid(
                "parameters.monitors",
                format!("'{entry}' is not an ip:port pair"),
            )
        })?;
        if addr.port() == 0 {
            return Err(ValidationError::invalid(
                "parameters.monitors",
                format!("'{entry}' has port 0"),
            ));
        }
    }
    Ok(())
}

fn check_fs_type(fs_type: &str) -> ValidationResult {
    if !FS_TYPES.contains(&fs_type) {
        return Err(ValidationError::invalid(
            "parameters.fsType",
            format!("'{fs_type}' is not one of {}", FS_TYPES.join(", ")),
        ));
    }
    Ok(())
}

fn check_image_format(format: &str) -> ValidationResult {
    if !IMAGE_FORMATS.contains(&format) {
        return Err(ValidationError::invalid(
            "parameters.imageFormat",
            format!("'{format}' must be 1 or 2"),
        ));
    }
    Ok(())
}

fn set_required(slot: &mut String, field: &'static str, value: &str) -> ValidationResult {
    require_non_empty(field, value)?;
    *slot = value.to_string();
    Ok(())
}

impl CephRbdParameters {
    pub fn monitors(&self) -> &str {
        &self.monitors
    }

    pub fn admin_id(&self) -> &str {
        &self.admin_id
    }

    pub fn admin_secret_name(&self) -> &str {
        &self.admin_secret_name
    }

    pub fn pool(&self) -> &str {
        &self.pool
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn user_secret_name(&self) -> &str {
        &self.user_secret_name
    }

    pub fn user_secret_namespace(&self) -> &str {
        &self.user_secret_namespace
    }

    pub fn fs_type(&self) -> &str {
        &self.fs_type
    }

    pub fn image_format(&self) -> &str {
        &self.image_format
    }

    pub fn image_features(&self) -> &str {
        &self.image_features
    }

    /// Comma-separated `ip:port` list; every entry needs a valid address and
    /// a non-zero port.
    pub fn set_monitors(&mut self, monitors: &str) -> ValidationResult {
        check_monitors(monitors)?;
        self.monitors = monitors.to_string();
        Ok(())
    }

    pub fn set_admin_id(&mut self, id: &str) -> ValidationResult {
        set_required(&mut self.admin_id, "parameters.adminId", id)
    }

    pub fn set_admin_secret_name(&mut self, name: &str) -> ValidationResult {
        set_required(&mut self.admin_secret_name, "parameters.adminSecretName", name)
    }

    pub fn set_admin_secret_namespace(&mut self, namespace: &str) -> ValidationResult {
        set_required(
            &mut self.admin_secret_namespace,
            "parameters.adminSecretNamespace",
            namespace,
        )
    }

    pub fn set_pool(&mut self, pool: &str) -> ValidationResult {
        set_required(&mut self.pool, "parameters.pool", pool)
    }

    pub fn set_user_id(&mut self, id: &str) -> ValidationResult {
        set_required(&mut self.user_id, "parameters.userId", id)
    }

    pub fn set_user_secret_name(&mut self, name: &str) -> ValidationResult {
        set_required(&mut self.user_secret_name, "parameters.userSecretName", name)
    }

    pub fn set_user_secret_namespace(&mut self, namespace: &str) -> ValidationResult {
        set_required(
            &mut self.user_secret_namespace,
            "parameters.userSecretNamespace",
            namespace,
        )
    }

    pub fn set_fs_type(&mut self, fs_type: &str) -> ValidationResult {
        check_fs_type(fs_type)?;
        self.fs_type = fs_type.to_string();
        Ok(())
    }

    pub fn set_image_format(&mut self, format: &str) -> ValidationResult {
        check_image_format(format)?;
        self.image_format = format.to_string();
        Ok(())
    }

    pub fn set_image_features(&mut self, features: &str) -> ValidationResult {
        set_required(&mut self.image_features, "parameters.imageFeatures", features)
    }

    /// Applies `{key, val}` pairs by parameter name. Any bad pair or unknown
    /// key rejects the whole call.
    pub fn set_data(&mut self, data: &[KeyValue]) -> ValidationResult {
        validate_pairs("parameters", data)?;
        let mut next = self.clone();
        for KeyValue { key, val } in data {
            match key.as_str() {
                "monitors" => next.set_monitors(val)?,
                "adminId" => next.set_admin_id(val)?,
                "adminSecretName" => next.set_admin_secret_name(val)?,
                "adminSecretNamespace" => next.set_admin_secret_namespace(val)?,
                "pool" => next.set_pool(val)?,
                "userId" => next.set_user_id(val)?,
                "userSecretName" => next.set_user_secret_name(val)?,
                "userSecretNamespace" => next.set_user_secret_namespace(val)?,
                "fsType" => next.set_fs_type(val)?,
                "imageFormat" => next.set_image_format(val)?,
                "imageFeatures" => next.set_image_features(val)?,
                other => {
                    return Err(ValidationError::invalid(
                        "parameters",
                        format!("unknown Ceph RBD parameter '{other}'"),
                    ))
                }
            }
        }
        *self = next;
        Ok(())
    }

    /// Parsed parameters may leave any key out; the ones present must hold
    /// values their setters would accept.
    fn validate(&self) -> ValidationResult {
        if !self.monitors.is_empty() {
            check_monitors(&self.monitors)?;
        }
        if !self.fs_type.is_empty() {
            check_fs_type(&self.fs_type)?;
        }
        if !self.image_format.is_empty() {
            check_image_format(&self.image_format)?;
        }
        Ok(())
    }
}

// ============================================================================
// StorageClass
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum StorageParameters {
    CephRbd(CephRbdParameters),
    Generic(BTreeMap<String, String>),
}

impl StorageParameters {
    fn for_provisioner(provisioner: &str) -> Self {
        if provisioner == CEPH_RBD_PROVISIONER {
            StorageParameters::CephRbd(CephRbdParameters::default())
        } else {
            StorageParameters::Generic(BTreeMap::new())
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, StorageParameters::Generic(map) if map.is_empty())
    }
}

impl Default for StorageParameters {
    fn default() -> Self {
        StorageParameters::Generic(BTreeMap::new())
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawStorageClass")]
pub struct StorageClass {
    #[serde(flatten)]
    type_meta: TypeMeta,
    metadata: ObjectMeta,
    #[serde(skip_serializing_if = "String::is_empty")]
    provisioner: String,
    #[serde(skip_serializing_if = "StorageParameters::is_empty")]
    parameters: StorageParameters,
    #[serde(skip_serializing_if = "Option::is_none")]
    reclaim_policy: Option<ReclaimPolicy>,
    allow_volume_expansion: bool,
}

/// Wire form; `parameters` is typed once the provisioner is known.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawStorageClass {
    #[serde(flatten)]
    type_meta: TypeMeta,
    #[serde(default)]
    metadata: ObjectMeta,
    #[serde(default)]
    provisioner: String,
    #[serde(default)]
    parameters: BTreeMap<String, String>,
    #[serde(default)]
    reclaim_policy: Option<ReclaimPolicy>,
    #[serde(default = "default_true")]
    allow_volume_expansion: bool,
}

impl TryFrom<RawStorageClass> for StorageClass {
    type Error = serde_yaml::Error;

    fn try_from(raw: RawStorageClass) -> Result<Self, Self::Error> {
        let parameters = if raw.provisioner == CEPH_RBD_PROVISIONER {
            let value = serde_yaml::to_value(&raw.parameters)?;
            StorageParameters::CephRbd(serde_yaml::from_value(value)?)
        } else {
            StorageParameters::Generic(raw.parameters)
        };
        Ok(Self {
            type_meta: raw.type_meta,
            metadata: raw.metadata,
            provisioner: raw.provisioner,
            parameters,
            reclaim_policy: raw.reclaim_policy,
            allow_volume_expansion: raw.allow_volume_expansion,
        })
    }
}

impl StorageClass {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            type_meta: TypeMeta::stable(Kind::StorageClass),
            metadata: ObjectMeta::named(name),
            provisioner: String::new(),
            parameters: StorageParameters::default(),
            reclaim_policy: None,
            allow_volume_expansion: true,
        }
    }

    pub fn provisioner(&self) -> &str {
        &self.provisioner
    }

    pub fn reclaim_policy(&self) -> Option<ReclaimPolicy> {
        self.reclaim_policy
    }

    pub fn allow_volume_expansion(&self) -> bool {
        self.allow_volume_expansion
    }

    pub fn get_parameters(&self) -> &StorageParameters {
        &self.parameters
    }

    pub fn parameters_mut(&mut self) -> &mut StorageParameters {
        &mut self.parameters
    }

    /// The Ceph RBD parameters, when the provisioner is `kubernetes.io/rbd`.
    pub fn ceph_rbd_mut(&mut self) -> Option<&mut CephRbdParameters> {
        match &mut self.parameters {
            StorageParameters::CephRbd(params) => Some(params),
            StorageParameters::Generic(_) => None,
        }
    }

    /// Sets the provisioner and resets `parameters` to its defaults.
    pub fn set_provisioner(&mut self, provisioner: &str) -> ValidationResult {
        require_non_empty("provisioner", provisioner)?;
        self.provisioner = provisioner.to_string();
        self.parameters = StorageParameters::for_provisioner(provisioner);
        tracing::debug!(provisioner, "reset storage class parameters");
        Ok(())
    }

    pub fn set_reclaim_policy(&mut self, policy: &str) -> ValidationResult {
        self.reclaim_policy = Some(parse_enum("reclaimPolicy", policy)?);
        Ok(())
    }

    pub fn set_allow_volume_expansion(&mut self, allow: bool) {
        self.allow_volume_expansion = allow;
    }
}

impl_manifest!(StorageClass, {
    fn validate(&self) -> ValidationResult {
        self.metadata.validate(Self::VALIDATION)?;
        require_non_empty("provisioner", &self.provisioner)?;
        match &self.parameters {
            StorageParameters::CephRbd(params) => params.validate(),
            StorageParameters::Generic(_) => Ok(()),
        }
    }
});

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::manifest::Manifest;

    fn rbd_class() -> StorageClass {
        let mut sc = StorageClass::new("fast");
        sc.set_provisioner(CEPH_RBD_PROVISIONER).unwrap();
        sc
    }

    // ── Provisioner ──

    #[test]
    fn test_rbd_defaults() {
        let mut sc = rbd_class();
        let params = sc.ceph_rbd_mut().unwrap();
        assert_eq!(params.admin_id(), "admin");
        assert_eq!(params.admin_secret_name(), "admin");
        assert_eq!(params.fs_type(), "xfs");
        assert_eq!(params.image_format(), "2");
        assert_eq!(params.image_features(), "layering");
        assert!(sc.allow_volume_expansion());
    }

    #[test]
    fn test_switching_provisioner_resets_parameters() {
        let mut sc = rbd_class();
        sc.ceph_rbd_mut().unwrap().set_pool("kube").unwrap();
        sc.set_provisioner("example.com/nfs").unwrap();
        assert_eq!(sc.get_parameters(), &StorageParameters::default());
        sc.set_provisioner(CEPH_RBD_PROVISIONER).unwrap();
        assert_eq!(sc.ceph_rbd_mut().unwrap().pool(), "");
        assert!(sc.set_provisioner("").is_err());
        assert_eq!(sc.provisioner(), CEPH_RBD_PROVISIONER);
    }

    // ── Monitors ──

    #[test]
    fn test_monitor_list_validation() {
        let mut sc = rbd_class();
        let params = sc.ceph_rbd_mut().unwrap();
        params
            .set_monitors("192.168.1.1:6789,192.168.1.2:6789")
            .unwrap();
        for bad in ["192.168.1.1", "not-an-ip:6789", "192.168.1.1:0", "", "10.0.0.1:6789,"] {
            assert!(params.set_monitors(bad).is_err(), "{bad}");
        }
        assert_eq!(params.monitors(), "192.168.1.1:6789,192.168.1.2:6789");
    }

    // ── set_data ──

    #[test]
    fn test_set_data_dispatches_by_key() {
        let mut params = CephRbdParameters::default();
        params
            .set_data(&[
                KeyValue::new("pool", "kube"),
                KeyValue::new("userId", "kube"),
                KeyValue::new("imageFormat", "1"),
            ])
            .unwrap();
        assert_eq!(params.pool(), "kube");
        assert_eq!(params.user_id(), "kube");
        assert_eq!(params.image_format(), "1");
    }

    #[test]
    fn test_set_data_is_all_or_nothing() {
        let mut params = CephRbdParameters::default();
        let before = params.clone();
        assert!(params
            .set_data(&[KeyValue::new("pool", "kube"), KeyValue::new("imageFormat", "3")])
            .is_err());
        assert!(params
            .set_data(&[KeyValue::new("pool", "kube"), KeyValue::new("colour", "blue")])
            .is_err());
        assert!(params
            .set_data(&[KeyValue::new("monitors", "192.168.1.1")])
            .is_err());
        assert_eq!(params, before);
    }

    #[test]
    fn test_fs_type_registry() {
        let mut params = CephRbdParameters::default();
        assert!(params.set_fs_type("btrfs").is_err());
        params.set_fs_type("ext4").unwrap();
        assert_eq!(params.fs_type(), "ext4");
    }

    // ── Encoding ──

    #[test]
    fn test_storage_class_yaml_round_trip() {
        let mut sc = rbd_class();
        sc.ceph_rbd_mut()
            .unwrap()
            .set_monitors("10.16.153.105:6789")
            .unwrap();
        sc.set_reclaim_policy("Retain").unwrap();
        let yaml = serde_yaml::to_string(&sc).unwrap();
        assert!(yaml.starts_with("apiVersion: storage.k8s.io/v1\nkind: StorageClass\n"));
        assert!(yaml.contains("provisioner: kubernetes.io/rbd"));
        assert!(yaml.contains("adminSecretName: admin"));
        assert!(yaml.contains("allowVolumeExpansion: true"));
        assert!(!yaml.contains("userId"));

        let back: StorageClass = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back, sc);
    }

    #[test]
    fn test_user_secret_namespace_kept_on_parse() {
        let yaml = "apiVersion: storage.k8s.io/v1\nkind: StorageClass\nmetadata:\n  name: fast\nprovisioner: kubernetes.io/rbd\nparameters:\n  monitors: 10.16.153.105:6789\n  userSecretName: ceph-user\n  userSecretNamespace: tenants\n";
        let mut sc: StorageClass = serde_yaml::from_str(yaml).unwrap();
        let params = sc.ceph_rbd_mut().unwrap();
        assert_eq!(params.user_secret_name(), "ceph-user");
        assert_eq!(params.user_secret_namespace(), "tenants");
        let out = serde_yaml::to_string(&sc).unwrap();
        assert!(out.contains("userSecretNamespace: tenants"));

        let mut params = CephRbdParameters::default();
        params
            .set_data(&[KeyValue::new("userSecretNamespace", "tenants")])
            .unwrap();
        assert_eq!(params.user_secret_namespace(), "tenants");
        assert!(params.set_user_secret_namespace("").is_err());
    }

    #[test]
    fn test_unknown_rbd_parameter_rejected_on_parse() {
        let yaml = "apiVersion: storage.k8s.io/v1\nkind: StorageClass\nmetadata:\n  name: fast\nprovisioner: kubernetes.io/rbd\nparameters:\n  pool: kube\n  colour: blue\n";
        let err = serde_yaml::from_str::<StorageClass>(yaml).unwrap_err();
        assert!(err.to_string().contains("colour"), "{err}");
    }

    #[test]
    fn test_generic_parameters_round_trip() {
        let yaml = "apiVersion: storage.k8s.io/v1\nkind: StorageClass\nmetadata:\n  name: nfs\nprovisioner: example.com/nfs\nparameters:\n  archiveOnDelete: 'false'\n";
        let sc: StorageClass = serde_yaml::from_str(yaml).unwrap();
        assert!(sc.allow_volume_expansion());
        match sc.get_parameters() {
            StorageParameters::Generic(map) => assert_eq!(map["archiveOnDelete"], "false"),
            other => panic!("unexpected parameters {other:?}"),
        }
    }

    #[test]
    fn test_parsed_rbd_parameters_rechecked() {
        let yaml = "apiVersion: storage.k8s.io/v1\nkind: StorageClass\nmetadata:\n  name: fast\nprovisioner: kubernetes.io/rbd\nparameters:\n  monitors: 10.16.153.105:6789\n  fsType: ext4\n";
        let sc: StorageClass = serde_yaml::from_str(yaml).unwrap();
        sc.validate().unwrap();
        for (from, to) in [("fsType: ext4", "fsType: btrfs"), ("10.16.153.105:6789", "10.16.153.105")] {
            let sc: StorageClass = serde_yaml::from_str(&yaml.replace(from, to)).unwrap();
            assert!(sc.validate().is_err(), "{to}");
        }
        let sc: StorageClass =
            serde_yaml::from_str(&yaml.replace("provisioner: kubernetes.io/rbd\n", "")).unwrap();
        assert!(sc.validate().is_err());
    }
}
