// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use crate::domain::error::ValidationResult;
use crate::domain::kind::{Kind, TypeMeta};
use crate::domain::manifest::Namespaced;
use crate::domain::metadata::ObjectMeta;
use crate::domain::primitives::{parse_enum, require_non_empty, Quantity};
use crate::domain::schema::{AccessMode, VolumeMode};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage: Option<Quantity>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimResources {
    #[serde(default)]
    pub requests: StorageRequest,
}

impl ClaimResources {
    fn is_empty(&self) -> bool {
        self.requests.storage.is_none()
    }
}

/// Claim body, shared with StatefulSet claim templates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistentVolumeClaimSpec {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    access_modes: Vec<AccessMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    volume_mode: Option<VolumeMode>,
    #[serde(default, skip_serializing_if = "ClaimResources::is_empty")]
    resources: ClaimResources,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    storage_class_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    volume_name: Option<String>,
}

impl PersistentVolumeClaimSpec {
    pub fn access_modes(&self) -> &[AccessMode] {
        &self.access_modes
    }

    pub fn volume_mode(&self) -> Option<VolumeMode> {
        self.volume_mode
    }

    pub fn storage(&self) -> Option<&Quantity> {
        self.resources.requests.storage.as_ref()
    }

    pub fn storage_class_name(&self) -> Option<&str> {
        self.storage_class_name.as_deref()
    }

    pub fn volume_name(&self) -> Option<&str> {
        self.volume_name.as_deref()
    }

    pub(crate) fn add_access_mode(&mut self, mode: &str) -> ValidationResult {
        let mode: AccessMode = parse_enum("accessModes", mode)?;
        self.access_modes.push(mode);
        Ok(())
    }

    pub(crate) fn set_volume_mode(&mut self, mode: &str) -> ValidationResult {
        self.volume_mode = Some(parse_enum("volumeMode", mode)?);
        Ok(())
    }

    pub(crate) fn set_storage(&mut self, storage: &str) -> ValidationResult {
        self.resources.requests.storage = Some(Quantity::parse(storage)?);
        Ok(())
    }

    pub(crate) fn set_storage_class_name(&mut self, name: &str) -> ValidationResult {
        require_non_empty("storageClassName", name)?;
        self.storage_class_name = Some(name.to_string());
        Ok(())
    }

    pub(crate) fn set_volume_name(&mut self, name: &str) -> ValidationResult {
        require_non_empty("volumeName", name)?;
        self.volume_name = Some(name.to_string());
        Ok(())
    }

    pub(crate) fn validate(&self) -> ValidationResult {
        if let Some(name) = &self.storage_class_name {
            require_non_empty("storageClassName", name)?;
        }
        if let Some(name) = &self.volume_name {
            require_non_empty("volumeName", name)?;
        }
        Ok(())
    }
}

/// A request for storage, bound by the control plane to a PersistentVolume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistentVolumeClaim {
    #[serde(flatten)]
    type_meta: TypeMeta,
    #[serde(default)]
    metadata: ObjectMeta,
    #[serde(default)]
    spec: PersistentVolumeClaimSpec,
}

impl Default for PersistentVolumeClaim {
    fn default() -> Self {
        Self::new()
    }
}

impl PersistentVolumeClaim {
    pub fn new() -> Self {
        Self {
            type_meta: TypeMeta::stable(Kind::PersistentVolumeClaim),
            metadata: ObjectMeta::new(),
            spec: PersistentVolumeClaimSpec::default(),
        }
    }

    pub fn spec(&self) -> &PersistentVolumeClaimSpec {
        &self.spec
    }

    /// Appends one access mode.
    pub fn set_access_mode(&mut self, mode: &str) -> ValidationResult {
        self.spec.add_access_mode(mode)
    }

    pub fn set_volume_mode(&mut self, mode: &str) -> ValidationResult {
        self.spec.set_volume_mode(mode)
    }

    pub fn set_storage(&mut self, storage: &str) -> ValidationResult {
        self.spec.set_storage(storage)
    }

    pub fn set_storage_class_name(&mut self, name: &str) -> ValidationResult {
        self.spec.set_storage_class_name(name)
    }

    /// Binds to a specific PersistentVolume instead of dynamic provisioning.
    pub fn set_volume_name(&mut self, name: &str) -> ValidationResult {
        self.spec.set_volume_name(name)
    }
}

impl_manifest!(PersistentVolumeClaim, {
    fn validate(&self) -> ValidationResult {
        self.metadata.validate(Self::VALIDATION)?;
        self.spec.validate()
    }
});

impl Namespaced for PersistentVolumeClaim {}
