// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Volume Spec
//!
//! A named storage source attachable to a pod template. The source is a sum
//! type; a volume carries at most one and refuses a second.

use crate::domain::error::{ValidationError, ValidationResult};
use crate::domain::primitives::{is_false, require_non_empty, LocalObjectReference, Quantity};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HostPathType {
    DirectoryOrCreate,
    Directory,
    FileOrCreate,
    File,
    Socket,
    CharDevice,
    BlockDevice,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostPathVolumeSource {
    pub path: String,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub path_type: Option<HostPathType>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmptyDirVolumeSource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medium: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_limit: Option<Quantity>,
}

/// Projects one key of a Secret or ConfigMap to a relative file path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyToPath {
    pub key: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretVolumeSource {
    pub secret_name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<KeyToPath>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_mode: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigMapVolumeSource {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<KeyToPath>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_mode: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistentVolumeClaimVolumeSource {
    pub claim_name: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub read_only: bool,
}

/// Ceph RADOS block device. Also used as a PersistentVolume source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RbdVolumeSource {
    pub monitors: Vec<String>,
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fs_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pool: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyring: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_ref: Option<LocalObjectReference>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub read_only: bool,
}

impl RbdVolumeSource {
    pub(crate) fn validate(&self) -> ValidationResult {
        if self.monitors.iter().all(String::is_empty) {
            return Err(ValidationError::EmptyCollection { field: "rbd.monitors" });
        }
        require_non_empty("rbd.image", &self.image)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VolumeSource {
    HostPath(HostPathVolumeSource),
    EmptyDir(EmptyDirVolumeSource),
    Secret(SecretVolumeSource),
    ConfigMap(ConfigMapVolumeSource),
    PersistentVolumeClaim(PersistentVolumeClaimVolumeSource),
    Rbd(RbdVolumeSource),
}

impl VolumeSource {
    fn validate(&self) -> ValidationResult {
        match self {
            VolumeSource::HostPath(s) => require_non_empty("hostPath.path", &s.path),
            VolumeSource::EmptyDir(_) => Ok(()),
            VolumeSource::Secret(s) => {
                require_non_empty("secret.secretName", &s.secret_name)?;
                validate_items(&s.items)
            }
            VolumeSource::ConfigMap(s) => {
                require_non_empty("configMap.name", &s.name)?;
                validate_items(&s.items)
            }
            VolumeSource::PersistentVolumeClaim(s) => {
                require_non_empty("persistentVolumeClaim.claimName", &s.claim_name)
            }
            VolumeSource::Rbd(s) => s.validate(),
        }
    }
}

fn validate_items(items: &[KeyToPath]) -> ValidationResult {
    for item in items {
        require_non_empty("items.key", &item.key)?;
        require_non_empty("items.path", &item.path)?;
    }
    Ok(())
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Volume {
    #[serde(default)]
    name: String,
    #[serde(flatten)]
    source: Option<VolumeSource>,
}

impl Volume {
    /// An unsourced volume; attach one with [`Volume::set_source`].
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: None,
        }
    }

    fn sourced(name: impl Into<String>, source: VolumeSource) -> Self {
        Self {
            name: name.into(),
            source: Some(source),
        }
    }

    pub fn secret(name: impl Into<String>, secret_name: impl Into<String>) -> Self {
        Self::sourced(
            name,
            VolumeSource::Secret(SecretVolumeSource {
                secret_name: secret_name.into(),
                ..Default::default()
            }),
        )
    }

    pub fn config_map(name: impl Into<String>, config_map: impl Into<String>) -> Self {
        Self::sourced(
            name,
            VolumeSource::ConfigMap(ConfigMapVolumeSource {
                name: config_map.into(),
                ..Default::default()
            }),
        )
    }

    pub fn host_path(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self::sourced(
            name,
            VolumeSource::HostPath(HostPathVolumeSource {
                path: path.into(),
                path_type: None,
            }),
        )
    }

    pub fn empty_dir(name: impl Into<String>) -> Self {
        Self::sourced(name, VolumeSource::EmptyDir(EmptyDirVolumeSource::default()))
    }

    pub fn persistent_volume_claim(name: impl Into<String>, claim: impl Into<String>) -> Self {
        Self::sourced(
            name,
            VolumeSource::PersistentVolumeClaim(PersistentVolumeClaimVolumeSource {
                claim_name: claim.into(),
                read_only: false,
            }),
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source(&self) -> Option<&VolumeSource> {
        self.source.as_ref()
    }

    pub fn set_name(&mut self, name: &str) -> ValidationResult {
        require_non_empty("volume name", name)?;
        self.name = name.to_string();
        Ok(())
    }

    pub fn set_source(&mut self, source: VolumeSource) -> ValidationResult {
        if self.source.is_some() {
            return Err(ValidationError::SourceAlreadySet {
                volume: self.name.clone(),
            });
        }
        source.validate()?;
        self.source = Some(source);
        Ok(())
    }

    /// A volume ready to attach has a name and a valid source.
    pub(crate) fn validate(&self) -> ValidationResult {
        require_non_empty("volume name", &self.name)?;
        match &self.source {
            Some(source) => source.validate(),
            None => Err(ValidationError::invalid(
                "volume",
                format!("'{}' has no source", self.name),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_source_is_rejected() {
        let mut volume = Volume::new("data");
        volume
            .set_source(VolumeSource::EmptyDir(EmptyDirVolumeSource::default()))
            .unwrap();
        let err = volume
            .set_source(VolumeSource::HostPath(HostPathVolumeSource {
                path: "/var/data".into(),
                path_type: None,
            }))
            .unwrap_err();
        assert_eq!(err, ValidationError::SourceAlreadySet { volume: "data".into() });
        assert!(matches!(volume.source(), Some(VolumeSource::EmptyDir(_))));
    }

    #[test]
    fn test_source_required_fields() {
        let mut volume = Volume::new("creds");
        let missing = VolumeSource::Secret(SecretVolumeSource::default());
        assert!(volume.set_source(missing).is_err());
        assert!(volume.source().is_none());

        let rbd = VolumeSource::Rbd(RbdVolumeSource {
            monitors: vec!["10.0.0.1:6789".into()],
            ..Default::default()
        });
        assert!(volume.set_source(rbd).is_err());
    }

    #[test]
    fn test_unsourced_volume_is_not_attachable() {
        assert!(Volume::new("x").validate().is_err());
        assert!(Volume::secret("", "s").validate().is_err());
        assert!(Volume::secret("x", "s").validate().is_ok());
    }

    #[test]
    fn test_secret_volume_yaml() {
        let yaml = serde_yaml::to_string(&Volume::secret("vol1", "secret1")).unwrap();
        assert_eq!(yaml, "name: vol1\nsecret:\n  secretName: secret1\n");
        let back: Volume = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back, Volume::secret("vol1", "secret1"));
    }

    #[test]
    fn test_empty_dir_and_unsourced_yaml() {
        let yaml = serde_yaml::to_string(&Volume::empty_dir("scratch")).unwrap();
        assert_eq!(yaml, "name: scratch\nemptyDir: {}\n");
        let back: Volume = serde_yaml::from_str("name: bare\n").unwrap();
        assert!(back.source().is_none());
    }
}
