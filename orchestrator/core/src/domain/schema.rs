// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Schema Profile and Registries
//!
//! `SchemaProfile` selects the `apiVersion` each kind is constructed with.
//! The remaining items are the fixed vocabularies the storage kinds draw from.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Immutable lookup tables, no process-wide state

use crate::domain::kind::{Kind, TypeMeta};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Kind to `apiVersion` mapping used when constructing manifests.
///
/// Kinds without an override use [`Kind::default_api_version`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaProfile {
    #[serde(rename = "apiVersions", default, skip_serializing_if = "BTreeMap::is_empty")]
    api_versions: BTreeMap<Kind, String>,
}

impl SchemaProfile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_api_version(mut self, kind: Kind, api_version: impl Into<String>) -> Self {
        self.api_versions.insert(kind, api_version.into());
        self
    }

    pub fn api_version(&self, kind: Kind) -> &str {
        self.api_versions
            .get(&kind)
            .map(String::as_str)
            .unwrap_or_else(|| kind.default_api_version())
    }

    pub fn overrides(&self) -> &BTreeMap<Kind, String> {
        &self.api_versions
    }

    pub(crate) fn type_meta(&self, kind: Kind) -> TypeMeta {
        TypeMeta::new(kind, self.api_version(kind))
    }
}

/// Known StorageClass provisioners and their display names.
pub const PROVISIONERS: &[(&str, &str)] = &[(CEPH_RBD_PROVISIONER, "Ceph RBD")];

pub const CEPH_RBD_PROVISIONER: &str = "kubernetes.io/rbd";

pub const FS_TYPES: &[&str] = &["xfs", "ext4", "nfs"];

pub const VOLUME_PLUGINS: &[&str] = &["RBD"];

pub fn provisioner_name(id: &str) -> Option<&'static str> {
    PROVISIONERS
        .iter()
        .find(|(key, _)| *key == id)
        .map(|(_, name)| *name)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccessMode {
    ReadWriteOnce,
    ReadOnlyMany,
    ReadWriteMany,
}

impl AccessMode {
    pub const ALL: [AccessMode; 3] = [
        AccessMode::ReadWriteOnce,
        AccessMode::ReadOnlyMany,
        AccessMode::ReadWriteMany,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VolumeMode {
    Block,
    Filesystem,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReclaimPolicy {
    Delete,
    Retain,
    Recycle,
}
