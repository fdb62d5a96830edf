// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Auxiliary Resources
//!
//! Configuration, networking, policy, storage and cluster kinds that do not
//! run containers themselves, plus API extensions.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Non-workload manifest kinds

pub mod config_map;
pub mod custom_resource_definition;
pub mod endpoints;
pub mod horizontal_pod_autoscaler;
pub mod ingress;
pub mod limit_range;
pub mod namespace;
pub mod network_policy;
pub mod node;
pub mod persistent_volume;
pub mod persistent_volume_claim;
pub mod resource_quota;
pub mod secret;
pub mod service;
pub mod service_account;
pub mod storage_class;

pub use config_map::ConfigMap;
pub use custom_resource_definition::{
    CustomResourceDefinition, CustomResourceDefinitionNames, CustomResourceDefinitionSpec,
    CustomResourceDefinitionVersion, CustomResourceValidation, ResourceScope,
};
pub use endpoints::{EndpointAddress, EndpointPort, EndpointSubset, Endpoints};
pub use horizontal_pod_autoscaler::{
    CrossVersionObjectReference, HorizontalPodAutoscaler, MetricIdentifier, MetricSpec,
    MetricTarget,
};
pub use ingress::{HttpIngressPath, Ingress, PathType};
pub use limit_range::{LimitRange, LimitRangeItem, LimitType};
pub use namespace::Namespace;
pub use network_policy::{
    IpBlock, NetworkPolicy, NetworkPolicyEgressRule, NetworkPolicyIngressRule, NetworkPolicyPeer,
    NetworkPolicyPort, PolicyType,
};
pub use node::{Node, Taint};
pub use persistent_volume::{ClaimReference, PersistentVolume};
pub use persistent_volume_claim::{PersistentVolumeClaim, PersistentVolumeClaimSpec};
pub use resource_quota::{QuotaResource, ResourceQuota};
pub use secret::Secret;
pub use service::{Service, ServicePort, ServiceType};
pub use service_account::ServiceAccount;
pub use storage_class::{CephRbdParameters, StorageClass, StorageParameters};
