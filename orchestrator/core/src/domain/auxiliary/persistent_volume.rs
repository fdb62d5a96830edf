// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use crate::domain::error::{ValidationError, ValidationResult};
use crate::domain::kind::{Kind, TypeMeta};
use crate::domain::metadata::ObjectMeta;
use crate::domain::primitives::{parse_enum, require_non_empty, Quantity};
use crate::domain::schema::{AccessMode, ReclaimPolicy, VolumeMode};
use crate::domain::volume::RbdVolumeSource;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capacity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage: Option<Quantity>,
}

impl Capacity {
    fn is_empty(&self) -> bool {
        self.storage.is_none()
    }
}

/// Pre-binds a volume to one claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimReference {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub namespace: String,
    pub name: String,
}

impl ClaimReference {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            api_version: Some(Kind::PersistentVolumeClaim.default_api_version().to_string()),
            kind: Some(Kind::PersistentVolumeClaim.to_string()),
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    fn validate(&self) -> ValidationResult {
        require_non_empty("spec.claimRef.namespace", &self.namespace)?;
        require_non_empty("spec.claimRef.name", &self.name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistentVolumeSpec {
    #[serde(default, skip_serializing_if = "Capacity::is_empty")]
    capacity: Capacity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    volume_mode: Option<VolumeMode>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    access_modes: Vec<AccessMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    persistent_volume_reclaim_policy: Option<ReclaimPolicy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    storage_class_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    rbd: Option<RbdVolumeSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    claim_ref: Option<ClaimReference>,
}

/// Cluster-scoped piece of provisioned storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistentVolume {
    #[serde(flatten)]
    type_meta: TypeMeta,
    #[serde(default)]
    metadata: ObjectMeta,
    #[serde(default)]
    spec: PersistentVolumeSpec,
}

impl PersistentVolume {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            type_meta: TypeMeta::stable(Kind::PersistentVolume),
            metadata: ObjectMeta::named(name),
            spec: PersistentVolumeSpec::default(),
        }
    }

    pub fn capacity(&self) -> Option<&Quantity> {
        self.spec.capacity.storage.as_ref()
    }

    pub fn access_modes(&self) -> &[AccessMode] {
        &self.spec.access_modes
    }

    pub fn reclaim_policy(&self) -> Option<ReclaimPolicy> {
        self.spec.persistent_volume_reclaim_policy
    }

    pub fn rbd(&self) -> Option<&RbdVolumeSource> {
        self.spec.rbd.as_ref()
    }

    pub fn claim_ref(&self) -> Option<&ClaimReference> {
        self.spec.claim_ref.as_ref()
    }

    pub fn set_capacity(&mut self, storage: &str) -> ValidationResult {
        self.spec.capacity.storage = Some(Quantity::parse(storage)?);
        Ok(())
    }

    /// Replaces the access mode list.
    pub fn set_access_modes(&mut self, modes: &[&str]) -> ValidationResult {
        if modes.is_empty() {
            return Err(ValidationError::EmptyCollection {
                field: "spec.accessModes",
            });
        }
        let modes = modes
            .iter()
            .map(|m| parse_enum::<AccessMode>("spec.accessModes", m))
            .collect::<ValidationResult<Vec<_>>>()?;
        self.spec.access_modes = modes;
        Ok(())
    }

    pub fn set_volume_mode(&mut self, mode: &str) -> ValidationResult {
        self.spec.volume_mode = Some(parse_enum("spec.volumeMode", mode)?);
        Ok(())
    }

    pub fn set_reclaim_policy(&mut self, policy: &str) -> ValidationResult {
        self.spec.persistent_volume_reclaim_policy =
            Some(parse_enum("spec.persistentVolumeReclaimPolicy", policy)?);
        Ok(())
    }

    pub fn set_storage_class_name(&mut self, name: &str) -> ValidationResult {
        require_non_empty("spec.storageClassName", name)?;
        self.spec.storage_class_name = Some(name.to_string());
        Ok(())
    }

    pub fn set_rbd(&mut self, rbd: RbdVolumeSource) -> ValidationResult {
        rbd.validate()?;
        self.spec.rbd = Some(rbd);
        Ok(())
    }

    pub fn set_claim_ref(&mut self, claim: ClaimReference) -> ValidationResult {
        claim.validate()?;
        self.spec.claim_ref = Some(claim);
        Ok(())
    }
}

impl_manifest!(PersistentVolume, {
    fn validate(&self) -> ValidationResult {
        self.metadata.validate(Self::VALIDATION)?;
        let spec = &self.spec;
        if let Some(name) = &spec.storage_class_name {
            require_non_empty("spec.storageClassName", name)?;
        }
        if let Some(rbd) = &spec.rbd {
            rbd.validate()?;
        }
        if let Some(claim) = &spec.claim_ref {
            claim.validate()?;
        }
        Ok(())
    }
});
