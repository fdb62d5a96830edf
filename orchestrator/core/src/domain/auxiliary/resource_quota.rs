// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use crate::domain::error::{ValidationError, ValidationResult};
use crate::domain::kind::{Kind, TypeMeta};
use crate::domain::manifest::Namespaced;
use crate::domain::metadata::ObjectMeta;
use crate::domain::primitives::{require_non_negative, Quantity};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Resource names a quota can cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum QuotaResource {
    #[serde(rename = "pods")]
    Pods,
    #[serde(rename = "configmaps")]
    ConfigMaps,
    #[serde(rename = "persistentvolumeclaims")]
    PersistentVolumeClaims,
    #[serde(rename = "replicationcontrollers")]
    ReplicationControllers,
    #[serde(rename = "secrets")]
    Secrets,
    #[serde(rename = "services")]
    Services,
    #[serde(rename = "requests.cpu")]
    RequestsCpu,
    #[serde(rename = "requests.memory")]
    RequestsMemory,
    #[serde(rename = "limits.cpu")]
    LimitsCpu,
    #[serde(rename = "limits.memory")]
    LimitsMemory,
    #[serde(rename = "requests.storage")]
    RequestsStorage,
}

impl QuotaResource {
    /// Object-count resources, as opposed to compute or storage amounts.
    pub fn is_count(self) -> bool {
        matches!(
            self,
            QuotaResource::Pods
                | QuotaResource::ConfigMaps
                | QuotaResource::PersistentVolumeClaims
                | QuotaResource::ReplicationControllers
                | QuotaResource::Secrets
                | QuotaResource::Services
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceQuotaSpec {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    hard: BTreeMap<QuotaResource, Quantity>,
}

/// Aggregate caps on what a namespace may consume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceQuota {
    #[serde(flatten)]
    type_meta: TypeMeta,
    #[serde(default)]
    metadata: ObjectMeta,
    #[serde(default)]
    spec: ResourceQuotaSpec,
}

impl Default for ResourceQuota {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceQuota {
    pub fn new() -> Self {
        Self {
            type_meta: TypeMeta::stable(Kind::ResourceQuota),
            metadata: ObjectMeta::new(),
            spec: ResourceQuotaSpec::default(),
        }
    }

    pub fn hard(&self) -> &BTreeMap<QuotaResource, Quantity> {
        &self.spec.hard
    }

    pub fn set_hard(&mut self, resource: QuotaResource, quantity: &str) -> ValidationResult {
        let quantity = Quantity::parse(quantity)?;
        self.spec.hard.insert(resource, quantity);
        Ok(())
    }

    pub fn set_hard_count(&mut self, resource: QuotaResource, count: i64) -> ValidationResult {
        if !resource.is_count() {
            return Err(ValidationError::invalid(
                "spec.hard",
                format!("{resource:?} is not an object count"),
            ));
        }
        require_non_negative("spec.hard", count)?;
        self.set_hard(resource, &count.to_string())
    }
}

impl_manifest!(ResourceQuota, {
    /// Object counts must be whole, non-negative numbers.
    fn validate(&self) -> ValidationResult {
        self.metadata.validate(Self::VALIDATION)?;
        for (resource, quantity) in self.spec.hard.iter().filter(|(r, _)| r.is_count()) {
            let count: i64 = quantity.as_str().parse().map_err(|_| {
                ValidationError::invalid(
                    "spec.hard",
                    format!("{resource:?} count '{quantity}' is not a whole number"),
                )
            })?;
            require_non_negative("spec.hard", count)?;
        }
        Ok(())
    }
});

impl Namespaced for ResourceQuota {}
