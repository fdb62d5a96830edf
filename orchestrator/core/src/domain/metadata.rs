// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Object Metadata
//!
//! Name, namespace, labels and annotations shared by every manifest and by
//! embedded pod templates.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Validated metadata with per-kind label policy

use crate::domain::error::{ValidationError, ValidationResult};
use crate::domain::primitives::{require_non_empty, validate_label_map, Labels};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How `set_labels` treats a key that is already present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelPolicy {
    /// Last write wins.
    Overwrite,
    /// An existing key is a validation error and nothing is applied.
    RejectExisting,
}

/// Whether metadata setters check their input.
///
/// `Skipped` is the documented no-op validator used by kinds whose setters
/// apply input as given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validation {
    Enforced,
    Skipped,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectMeta {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    namespace: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    labels: Labels,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    annotations: Labels,
}

impl ObjectMeta {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn labels(&self) -> &Labels {
        &self.labels
    }

    pub fn label(&self, key: &str) -> Option<&str> {
        self.labels.get(key).map(String::as_str)
    }

    pub fn annotations(&self) -> &Labels {
        &self.annotations
    }

    pub fn set_name(&mut self, name: &str) -> ValidationResult {
        self.set_name_with(name, Validation::Enforced)
    }

    pub fn set_name_with(&mut self, name: &str, validation: Validation) -> ValidationResult {
        if validation == Validation::Enforced {
            require_non_empty("metadata.name", name)?;
        }
        self.name = name.to_string();
        Ok(())
    }

    pub fn set_namespace(&mut self, namespace: &str) -> ValidationResult {
        self.set_namespace_with(namespace, Validation::Enforced)
    }

    pub fn set_namespace_with(&mut self, namespace: &str, validation: Validation) -> ValidationResult {
        if validation == Validation::Enforced {
            require_non_empty("metadata.namespace", namespace)?;
        }
        self.namespace = Some(namespace.to_string());
        Ok(())
    }

    /// Merges `labels` into the label set.
    ///
    /// The whole input is checked before any entry is written, so a failed
    /// call leaves the existing labels untouched.
    pub fn set_labels(&mut self, labels: &Labels, policy: LabelPolicy) -> ValidationResult {
        validate_label_map("metadata.labels", labels)?;
        if policy == LabelPolicy::RejectExisting {
            if let Some(key) = labels.keys().find(|k| self.labels.contains_key(*k)) {
                return Err(ValidationError::DuplicateKey { key: key.clone() });
            }
        }
        self.merge_labels(labels);
        Ok(())
    }

    pub fn set_annotations(&mut self, annotations: &Labels) -> ValidationResult {
        validate_label_map("metadata.annotations", annotations)?;
        self.annotations
            .extend(annotations.iter().map(|(k, v)| (k.clone(), v.clone())));
        Ok(())
    }

    pub(crate) fn merge_labels(&mut self, labels: &Labels) {
        self.labels
            .extend(labels.iter().map(|(k, v)| (k.clone(), v.clone())));
    }

    pub(crate) fn merge_annotations(&mut self, annotations: &Labels) {
        self.annotations
            .extend(annotations.iter().map(|(k, v)| (k.clone(), v.clone())));
    }

    pub(crate) fn replace_labels(&mut self, labels: &Labels) {
        self.labels = labels.clone();
    }

    pub(crate) fn insert_label(&mut self, key: &str, value: &str) {
        self.labels.insert(key.to_string(), value.to_string());
    }

    /// Checks a top-level object's metadata as its setters would have.
    pub(crate) fn validate(&self, validation: Validation) -> ValidationResult {
        if validation == Validation::Skipped {
            return Ok(());
        }
        require_non_empty("metadata.name", &self.name)?;
        if let Some(namespace) = &self.namespace {
            require_non_empty("metadata.namespace", namespace)?;
        }
        self.validate_maps()
    }

    pub(crate) fn validate_maps(&self) -> ValidationResult {
        if !self.labels.is_empty() {
            validate_label_map("metadata.labels", &self.labels)?;
        }
        if !self.annotations.is_empty() {
            validate_label_map("metadata.annotations", &self.annotations)?;
        }
        Ok(())
    }

    pub(crate) fn set_default_namespace(&mut self, namespace: &str) -> bool {
        if self.namespace.is_none() && !namespace.is_empty() {
            self.namespace = Some(namespace.to_string());
            return true;
        }
        false
    }
}
