// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use crate::domain::error::{ValidationError, ValidationResult};
use crate::domain::kind::{Kind, TypeMeta};
use crate::domain::manifest::Namespaced;
use crate::domain::metadata::{LabelPolicy, ObjectMeta};
use crate::domain::primitives::Quantity;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Resource name (`cpu`, `memory`, `storage`) to amount.
pub type ResourceMap = BTreeMap<String, Quantity>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LimitType {
    Container,
    Pod,
    PersistentVolumeClaim,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LimitRangeItem {
    #[serde(rename = "type")]
    pub limit_type: LimitType,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub max: ResourceMap,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub min: ResourceMap,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub default: ResourceMap,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub default_request: ResourceMap,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub max_limit_request_ratio: ResourceMap,
}

impl LimitRangeItem {
    pub fn new(limit_type: LimitType) -> Self {
        Self {
            limit_type,
            max: ResourceMap::new(),
            min: ResourceMap::new(),
            default: ResourceMap::new(),
            default_request: ResourceMap::new(),
            max_limit_request_ratio: ResourceMap::new(),
        }
    }

    fn constraints(&self) -> [&ResourceMap; 5] {
        [
            &self.max,
            &self.min,
            &self.default,
            &self.default_request,
            &self.max_limit_request_ratio,
        ]
    }

    fn validate(&self) -> ValidationResult {
        let maps = self.constraints();
        if maps.iter().all(|m| m.is_empty()) {
            return Err(ValidationError::EmptyCollection {
                field: "limits constraints",
            });
        }
        if maps.iter().flat_map(|m| m.keys()).any(String::is_empty) {
            return Err(ValidationError::Empty {
                field: "limits resource name",
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitRangeSpec {
    #[serde(default)]
    limits: Vec<LimitRangeItem>,
}

/// Per-object defaults and bounds for compute and storage requests.
///
/// Like NetworkPolicy, `set_labels` refuses keys that are already set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitRange {
    #[serde(flatten)]
    type_meta: TypeMeta,
    #[serde(default)]
    metadata: ObjectMeta,
    #[serde(default)]
    spec: LimitRangeSpec,
}

impl Default for LimitRange {
    fn default() -> Self {
        Self::new()
    }
}

impl LimitRange {
    pub fn new() -> Self {
        Self {
            type_meta: TypeMeta::stable(Kind::LimitRange),
            metadata: ObjectMeta::new(),
            spec: LimitRangeSpec::default(),
        }
    }

    pub fn limits(&self) -> &[LimitRangeItem] {
        &self.spec.limits
    }

    pub fn add_limit(&mut self, item: LimitRangeItem) -> ValidationResult {
        item.validate()?;
        self.spec.limits.push(item);
        Ok(())
    }
}

impl_manifest!(LimitRange, {
    const LABEL_POLICY: LabelPolicy = LabelPolicy::RejectExisting;

    fn validate(&self) -> ValidationResult {
        self.metadata.validate(Self::VALIDATION)?;
        self.spec.limits.iter().try_for_each(LimitRangeItem::validate)
    }
});

impl Namespaced for LimitRange {}
