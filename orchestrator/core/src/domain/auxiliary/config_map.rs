// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use crate::domain::error::ValidationResult;
use crate::domain::kind::{Kind, TypeMeta};
use crate::domain::manifest::Namespaced;
use crate::domain::metadata::ObjectMeta;
use crate::domain::primitives::{validate_label_map, validate_pairs, KeyValue};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Plain configuration data, stored verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigMap {
    #[serde(flatten)]
    type_meta: TypeMeta,
    #[serde(default)]
    metadata: ObjectMeta,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    data: BTreeMap<String, String>,
}

impl Default for ConfigMap {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigMap {
    pub fn new() -> Self {
        Self {
            type_meta: TypeMeta::stable(Kind::ConfigMap),
            metadata: ObjectMeta::new(),
            data: BTreeMap::new(),
        }
    }

    /// Adds every pair, or none if any pair has an empty key or value.
    pub fn set_data(&mut self, data: &[KeyValue]) -> ValidationResult {
        validate_pairs("data", data)?;
        self.data
            .extend(data.iter().map(|kv| (kv.key.clone(), kv.val.clone())));
        Ok(())
    }

    pub fn get_data(&self) -> &BTreeMap<String, String> {
        &self.data
    }
}

impl_manifest!(ConfigMap, {
    fn validate(&self) -> ValidationResult {
        self.metadata.validate(Self::VALIDATION)?;
        if self.data.is_empty() {
            return Ok(());
        }
        validate_label_map("data", &self.data)
    }
});

impl Namespaced for ConfigMap {}
