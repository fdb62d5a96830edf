// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use crate::domain::container::{EnvFromSource, EnvVar, VolumeMount};
use crate::domain::kind::{Kind, TypeMeta};
use crate::domain::manifest::Namespaced;
use crate::domain::metadata::{ObjectMeta, Validation};
use crate::domain::selector::LabelSelector;
use crate::domain::volume::Volume;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodPresetSpec {
    #[serde(default, skip_serializing_if = "LabelSelector::is_empty")]
    selector: LabelSelector,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    env: Vec<EnvVar>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    env_from: Vec<EnvFromSource>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    volumes: Vec<Volume>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    volume_mounts: Vec<VolumeMount>,
}

/// Injects env, volumes and mounts into pods matching a selector at
/// admission time.
///
/// Every setter applies its input unchecked: this kind carries
/// [`Validation::Skipped`], so metadata setters inherited from
/// [`Manifest`](crate::domain::manifest::Manifest) skip validation too.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PodPreset {
    #[serde(flatten)]
    type_meta: TypeMeta,
    #[serde(default)]
    metadata: ObjectMeta,
    #[serde(default)]
    spec: PodPresetSpec,
}

impl Default for PodPreset {
    fn default() -> Self {
        Self::new()
    }
}

impl PodPreset {
    pub fn new() -> Self {
        Self {
            type_meta: TypeMeta::stable(Kind::PodPreset),
            metadata: ObjectMeta::new(),
            spec: PodPresetSpec::default(),
        }
    }

    pub fn selector(&self) -> &LabelSelector {
        &self.spec.selector
    }

    pub fn env(&self) -> &[EnvVar] {
        &self.spec.env
    }

    pub fn volumes(&self) -> &[Volume] {
        &self.spec.volumes
    }

    pub fn volume_mounts(&self) -> &[VolumeMount] {
        &self.spec.volume_mounts
    }

    pub fn set_selector(&mut self, selector: LabelSelector) {
        self.spec.selector = selector;
    }

    pub fn add_env(&mut self, env: EnvVar) {
        self.spec.env.push(env);
    }

    pub fn add_env_from(&mut self, source: EnvFromSource) {
        self.spec.env_from.push(source);
    }

    pub fn add_volume(&mut self, volume: Volume) {
        self.spec.volumes.push(volume);
    }

    pub fn add_volume_mount(&mut self, mount: VolumeMount) {
        self.spec.volume_mounts.push(mount);
    }
}

impl_manifest!(PodPreset, {
    const VALIDATION: Validation = Validation::Skipped;
});

impl Namespaced for PodPreset {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::manifest::Manifest;
    use crate::domain::primitives::labels_from;

    #[test]
    fn test_metadata_setters_skip_validation() {
        let mut preset = PodPreset::new();
        preset.set_metadata_name("").unwrap();
        preset.set_namespace("").unwrap();
        preset.set_labels(&labels_from([("", "")])).unwrap();
        assert_eq!(preset.get_namespace(), Some(""));
        assert_eq!(preset.metadata().label(""), Some(""));
    }

    #[test]
    fn test_body_setters_apply_unchecked() {
        let mut preset = PodPreset::new();
        preset.set_selector(LabelSelector::new());
        preset.add_env(EnvVar::value("DB_PORT", "6379"));
        preset.add_volume(Volume::new(""));
        preset.add_volume_mount(VolumeMount::new("cache", "/cache"));
        assert_eq!(preset.env().len(), 1);
        assert_eq!(preset.volumes().len(), 1);
        assert_eq!(preset.volume_mounts()[0].mount_path, "/cache");
    }

    #[test]
    fn test_preset_yaml() {
        let mut preset = PodPreset::new();
        preset.set_metadata_name("allow-database").unwrap();
        preset.add_env(EnvVar::value("DB_PORT", "6379"));
        let yaml = serde_yaml::to_string(&preset).unwrap();
        assert!(yaml.starts_with("apiVersion: settings.k8s.io/v1alpha1\nkind: PodPreset\n"));
        assert!(yaml.contains("name: DB_PORT"));
        assert!(!yaml.contains("selector"));
    }
}
