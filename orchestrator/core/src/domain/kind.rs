// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Manifest Kinds
//!
//! The closed set of manifest kinds this crate can build, and the
//! `apiVersion`/`kind` header every manifest carries.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Kind discriminator and type header

use crate::domain::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Kind {
    Pod,
    Deployment,
    StatefulSet,
    DaemonSet,
    ReplicaSet,
    Job,
    CronJob,
    PodPreset,
    ConfigMap,
    Secret,
    Namespace,
    Service,
    Ingress,
    NetworkPolicy,
    ResourceQuota,
    LimitRange,
    PersistentVolume,
    PersistentVolumeClaim,
    StorageClass,
    HorizontalPodAutoscaler,
    Node,
    ServiceAccount,
    Endpoints,
    CustomResourceDefinition,
}

impl Kind {
    pub const ALL: [Kind; 24] = [
        Kind::Pod,
        Kind::Deployment,
        Kind::StatefulSet,
        Kind::DaemonSet,
        Kind::ReplicaSet,
        Kind::Job,
        Kind::CronJob,
        Kind::PodPreset,
        Kind::ConfigMap,
        Kind::Secret,
        Kind::Namespace,
        Kind::Service,
        Kind::Ingress,
        Kind::NetworkPolicy,
        Kind::ResourceQuota,
        Kind::LimitRange,
        Kind::PersistentVolume,
        Kind::PersistentVolumeClaim,
        Kind::StorageClass,
        Kind::HorizontalPodAutoscaler,
        Kind::Node,
        Kind::ServiceAccount,
        Kind::Endpoints,
        Kind::CustomResourceDefinition,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Pod => "Pod",
            Kind::Deployment => "Deployment",
            Kind::StatefulSet => "StatefulSet",
            Kind::DaemonSet => "DaemonSet",
            Kind::ReplicaSet => "ReplicaSet",
            Kind::Job => "Job",
            Kind::CronJob => "CronJob",
            Kind::PodPreset => "PodPreset",
            Kind::ConfigMap => "ConfigMap",
            Kind::Secret => "Secret",
            Kind::Namespace => "Namespace",
            Kind::Service => "Service",
            Kind::Ingress => "Ingress",
            Kind::NetworkPolicy => "NetworkPolicy",
            Kind::ResourceQuota => "ResourceQuota",
            Kind::LimitRange => "LimitRange",
            Kind::PersistentVolume => "PersistentVolume",
            Kind::PersistentVolumeClaim => "PersistentVolumeClaim",
            Kind::StorageClass => "StorageClass",
            Kind::HorizontalPodAutoscaler => "HorizontalPodAutoscaler",
            Kind::Node => "Node",
            Kind::ServiceAccount => "ServiceAccount",
            Kind::Endpoints => "Endpoints",
            Kind::CustomResourceDefinition => "CustomResourceDefinition",
        }
    }

    /// The stable API group/version the kind is served under.
    pub fn default_api_version(&self) -> &'static str {
        match self {
            Kind::Pod
            | Kind::ConfigMap
            | Kind::Secret
            | Kind::Namespace
            | Kind::Service
            | Kind::ResourceQuota
            | Kind::LimitRange
            | Kind::PersistentVolume
            | Kind::PersistentVolumeClaim
            | Kind::Node
            | Kind::ServiceAccount
            | Kind::Endpoints => "v1",
            Kind::Deployment | Kind::StatefulSet | Kind::DaemonSet | Kind::ReplicaSet => "apps/v1",
            Kind::Job | Kind::CronJob => "batch/v1",
            Kind::PodPreset => "settings.k8s.io/v1alpha1",
            Kind::Ingress | Kind::NetworkPolicy => "networking.k8s.io/v1",
            Kind::StorageClass => "storage.k8s.io/v1",
            Kind::HorizontalPodAutoscaler => "autoscaling/v2",
            Kind::CustomResourceDefinition => "apiextensions.k8s.io/v1",
        }
    }

    /// Cluster-scoped kinds never carry `metadata.namespace`.
    pub fn is_namespaced(&self) -> bool {
        !matches!(
            self,
            Kind::Namespace
                | Kind::Node
                | Kind::PersistentVolume
                | Kind::StorageClass
                | Kind::CustomResourceDefinition
        )
    }

    /// Kinds that embed a pod template.
    pub fn is_workload(&self) -> bool {
        matches!(
            self,
            Kind::Pod
                | Kind::Deployment
                | Kind::StatefulSet
                | Kind::DaemonSet
                | Kind::ReplicaSet
                | Kind::Job
                | Kind::CronJob
        )
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Kind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Kind::ALL
            .iter()
            .copied()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| ValidationError::invalid("kind", format!("unknown kind '{s}'")))
    }
}

/// `apiVersion` and `kind`, flattened into the top of every manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeMeta {
    #[serde(rename = "apiVersion")]
    pub(crate) api_version: String,
    pub(crate) kind: Kind,
}

impl TypeMeta {
    pub(crate) fn new(kind: Kind, api_version: impl Into<String>) -> Self {
        Self {
            api_version: api_version.into(),
            kind,
        }
    }

    pub(crate) fn stable(kind: Kind) -> Self {
        Self::new(kind, kind.default_api_version())
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trips_through_str() {
        for kind in Kind::ALL {
            assert_eq!(kind.as_str().parse::<Kind>().unwrap(), kind);
        }
        assert!("ReplicationController".parse::<Kind>().is_err());
    }

    #[test]
    fn test_serde_name_matches_as_str() {
        for kind in Kind::ALL {
            let yaml = serde_yaml::to_string(&kind).unwrap();
            assert_eq!(yaml.trim(), kind.as_str());
        }
    }

    #[test]
    fn test_api_versions() {
        assert_eq!(Kind::Pod.default_api_version(), "v1");
        assert_eq!(Kind::Deployment.default_api_version(), "apps/v1");
        assert_eq!(Kind::CronJob.default_api_version(), "batch/v1");
        assert_eq!(Kind::StorageClass.default_api_version(), "storage.k8s.io/v1");
        assert_eq!(Kind::PodPreset.default_api_version(), "settings.k8s.io/v1alpha1");
        assert_eq!(Kind::Endpoints.default_api_version(), "v1");
        assert_eq!(
            Kind::CustomResourceDefinition.default_api_version(),
            "apiextensions.k8s.io/v1"
        );
    }

    #[test]
    fn test_scope() {
        assert!(Kind::Pod.is_namespaced());
        assert!(!Kind::Node.is_namespaced());
        assert!(!Kind::StorageClass.is_namespaced());
        assert!(!Kind::CustomResourceDefinition.is_namespaced());
        assert!(Kind::ServiceAccount.is_namespaced());
        assert!(Kind::CronJob.is_workload());
        assert!(!Kind::Secret.is_workload());
    }
}
