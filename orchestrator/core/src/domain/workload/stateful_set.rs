// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use crate::domain::auxiliary::PersistentVolumeClaimSpec;
use crate::domain::error::ValidationResult;
use crate::domain::kind::{Kind, TypeMeta};
use crate::domain::manifest::{validate_controller, Controller, Namespaced, Workload};
use crate::domain::metadata::ObjectMeta;
use crate::domain::pod_template::{PodSpec, PodTemplateSpec};
use crate::domain::primitives::{
    is_zero_i32, require_non_empty, require_positive, validate_replicas, Labels,
};
use crate::domain::selector::LabelSelector;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PodManagementPolicy {
    OrderedReady,
    Parallel,
}

/// Per-replica storage template, distinct from the pod-level volume list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeClaimTemplate {
    #[serde(default)]
    metadata: ObjectMeta,
    #[serde(default)]
    spec: PersistentVolumeClaimSpec,
}

impl VolumeClaimTemplate {
    pub fn metadata(&self) -> &ObjectMeta {
        &self.metadata
    }

    pub fn spec(&self) -> &PersistentVolumeClaimSpec {
        &self.spec
    }

    /// Pods mount the claim by this name, so it is required.
    fn validate(&self) -> ValidationResult {
        require_non_empty("volumeClaimTemplates metadata.name", self.metadata.name())?;
        self.metadata.validate_maps()?;
        self.spec.validate()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatefulSetSpec {
    #[serde(default, skip_serializing_if = "is_zero_i32")]
    replicas: i32,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    service_name: String,
    #[serde(default, skip_serializing_if = "LabelSelector::is_empty")]
    selector: LabelSelector,
    #[serde(default)]
    template: PodTemplateSpec,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    volume_claim_templates: Vec<VolumeClaimTemplate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pod_management_policy: Option<PodManagementPolicy>,
}

/// Replicated pods with stable identities and per-replica storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatefulSet {
    #[serde(flatten)]
    type_meta: TypeMeta,
    #[serde(default)]
    metadata: ObjectMeta,
    #[serde(default)]
    spec: StatefulSetSpec,
}

impl Default for StatefulSet {
    fn default() -> Self {
        Self::new()
    }
}

impl StatefulSet {
    pub fn new() -> Self {
        Self {
            type_meta: TypeMeta::stable(Kind::StatefulSet),
            metadata: ObjectMeta::new(),
            spec: StatefulSetSpec::default(),
        }
    }

    pub fn replicas(&self) -> i32 {
        self.spec.replicas
    }

    pub fn service_name(&self) -> &str {
        &self.spec.service_name
    }

    pub fn volume_claim_templates(&self) -> &[VolumeClaimTemplate] {
        &self.spec.volume_claim_templates
    }

    /// The template the claim setters below edit: the most recently added one.
    pub fn volume_claim_template(&self) -> Option<&VolumeClaimTemplate> {
        self.spec.volume_claim_templates.last()
    }

    pub fn set_replicas(&mut self, replicas: i32) -> ValidationResult {
        require_positive("spec.replicas", replicas.into())?;
        self.spec.replicas = replicas;
        Ok(())
    }

    /// Headless service governing the pods' network identity.
    pub fn set_service_name(&mut self, name: &str) -> ValidationResult {
        require_non_empty("spec.serviceName", name)?;
        self.spec.service_name = name.to_string();
        Ok(())
    }

    pub fn set_pod_management_policy(&mut self, policy: PodManagementPolicy) {
        self.spec.pod_management_policy = Some(policy);
    }

    /// Starts another claim template; later claim setters edit this one.
    pub fn add_volume_claim_template(&mut self, name: &str) -> ValidationResult {
        let mut template = VolumeClaimTemplate::default();
        template.metadata.set_name(name)?;
        self.spec.volume_claim_templates.push(template);
        Ok(())
    }

    /// Applies `edit` to a copy of the current claim template (a fresh one
    /// when there is none) and keeps the copy only on success.
    fn update_claim<F>(&mut self, edit: F) -> ValidationResult
    where
        F: FnOnce(&mut VolumeClaimTemplate) -> ValidationResult,
    {
        let templates = &mut self.spec.volume_claim_templates;
        let mut template = templates.last().cloned().unwrap_or_default();
        edit(&mut template)?;
        match templates.last_mut() {
            Some(current) => *current = template,
            None => templates.push(template),
        }
        Ok(())
    }

    pub fn set_volume_claim_name(&mut self, name: &str) -> ValidationResult {
        self.update_claim(|t| t.metadata.set_name(name))
    }

    pub fn set_volume_claim_annotations(&mut self, annotations: &Labels) -> ValidationResult {
        self.update_claim(|t| t.metadata.set_annotations(annotations))
    }

    /// Appends one access mode to the claim template.
    pub fn set_access_mode(&mut self, mode: &str) -> ValidationResult {
        self.update_claim(|t| t.spec.add_access_mode(mode))
    }

    pub fn set_storage(&mut self, storage: &str) -> ValidationResult {
        self.update_claim(|t| t.spec.set_storage(storage))
    }

    pub fn set_storage_class_name(&mut self, name: &str) -> ValidationResult {
        self.update_claim(|t| t.spec.set_storage_class_name(name))
    }
}

impl_manifest!(StatefulSet, {
    fn validate(&self) -> ValidationResult {
        self.metadata.validate(Self::VALIDATION)?;
        let spec = &self.spec;
        validate_replicas("spec.replicas", spec.replicas)?;
        for template in &spec.volume_claim_templates {
            template.validate()?;
        }
        validate_controller(self)
    }
});

impl Namespaced for StatefulSet {}

impl Workload for StatefulSet {
    fn pod_spec(&self) -> &PodSpec {
        self.spec.template.spec()
    }

    fn pod_spec_mut(&mut self) -> &mut PodSpec {
        self.spec.template.spec_mut()
    }
}

impl Controller for StatefulSet {
    fn template(&self) -> &PodTemplateSpec {
        &self.spec.template
    }

    fn template_mut(&mut self) -> &mut PodTemplateSpec {
        &mut self.spec.template
    }

    fn selector(&self) -> &LabelSelector {
        &self.spec.selector
    }

    fn selector_mut(&mut self) -> &mut LabelSelector {
        &mut self.spec.selector
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::container::Container;
    use crate::domain::manifest::Manifest;
    use crate::domain::primitives::labels_from;
    use crate::domain::schema::AccessMode;

    #[test]
    fn test_access_modes_append() {
        let mut sts = StatefulSet::new();
        sts.set_access_mode("ReadWriteOnce").unwrap();
        sts.set_access_mode("ReadOnlyMany").unwrap();
        assert!(sts.set_access_mode("WriteSometimes").is_err());
        assert!(sts.set_access_mode("").is_err());
        assert_eq!(
            sts.volume_claim_template().unwrap().spec().access_modes(),
            [AccessMode::ReadWriteOnce, AccessMode::ReadOnlyMany]
        );
        assert_eq!(sts.volume_claim_templates().len(), 1);
    }

    #[test]
    fn test_claim_template_setters() {
        let mut sts = StatefulSet::new();
        assert!(sts.set_volume_claim_name("").is_err());
        assert!(sts.volume_claim_templates().is_empty());
        sts.set_volume_claim_name("data").unwrap();
        assert!(sts.set_storage("lots").is_err());
        sts.set_storage("10Gi").unwrap();
        let template = sts.volume_claim_template().unwrap();
        assert_eq!(template.spec().storage().map(|q| q.as_str()), Some("10Gi"));
        assert_eq!(template.metadata().name(), "data");
    }

    #[test]
    fn test_service_name_and_replicas() {
        let mut sts = StatefulSet::new();
        assert!(sts.set_service_name("").is_err());
        sts.set_service_name("db-headless").unwrap();
        assert!(sts.set_replicas(0).is_err());
        sts.set_replicas(3).unwrap();
        assert_eq!(sts.service_name(), "db-headless");
        assert_eq!(sts.replicas(), 3);
    }

    #[test]
    fn test_claim_templates_serialized_as_list() {
        let mut sts = StatefulSet::new();
        let yaml = serde_yaml::to_string(&sts).unwrap();
        assert!(!yaml.contains("volumeClaimTemplates"));

        sts.set_volume_claim_name("data").unwrap();
        sts.set_access_mode("ReadWriteOnce").unwrap();
        let yaml = serde_yaml::to_string(&sts).unwrap();
        assert!(
            yaml.contains("volumeClaimTemplates:\n  - metadata:\n      name: data"),
            "{yaml}"
        );
        let back: StatefulSet = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back, sts);
    }

    #[test]
    fn test_every_claim_template_kept_on_parse() {
        let yaml = "apiVersion: apps/v1\nkind: StatefulSet\nmetadata:\n  name: db\nspec:\n  serviceName: db\n  selector:\n    matchLabels:\n      app: db\n  template:\n    metadata:\n      labels:\n        app: db\n    spec:\n      containers:\n      - name: postgres\n        image: postgres:16\n  volumeClaimTemplates:\n  - metadata:\n      name: data\n    spec:\n      accessModes:\n      - ReadWriteOnce\n      resources:\n        requests:\n          storage: 10Gi\n  - metadata:\n      name: logs\n    spec:\n      accessModes:\n      - ReadWriteOnce\n      resources:\n        requests:\n          storage: 1Gi\n";
        let sts: StatefulSet = serde_yaml::from_str(yaml).unwrap();
        let names: Vec<&str> = sts
            .volume_claim_templates()
            .iter()
            .map(|t| t.metadata().name())
            .collect();
        assert_eq!(names, ["data", "logs"]);
        sts.validate().unwrap();

        let out = serde_yaml::to_string(&sts).unwrap();
        assert!(out.contains("name: logs"), "{out}");
        assert!(out.contains("storage: 1Gi"));
        let back: StatefulSet = serde_yaml::from_str(&out).unwrap();
        assert_eq!(back, sts);
    }

    #[test]
    fn test_claim_setters_edit_latest_template() {
        let mut sts = StatefulSet::new();
        sts.set_volume_claim_name("data").unwrap();
        sts.set_storage("10Gi").unwrap();
        assert!(sts.add_volume_claim_template("").is_err());
        sts.add_volume_claim_template("logs").unwrap();
        sts.set_storage("1Gi").unwrap();
        let templates = sts.volume_claim_templates();
        assert_eq!(templates.len(), 2);
        assert_eq!(templates[0].spec().storage().map(|q| q.as_str()), Some("10Gi"));
        assert_eq!(templates[1].metadata().name(), "logs");
        assert_eq!(templates[1].spec().storage().map(|q| q.as_str()), Some("1Gi"));
    }

    #[test]
    fn test_unnamed_claim_template_fails_validation() {
        let mut sts = StatefulSet::new();
        sts.set_metadata_name("db").unwrap();
        sts.set_selector(LabelSelector::matching(&labels_from([("app", "db")])).unwrap())
            .unwrap();
        sts.add_container(Container::new("postgres", "postgres:16"))
            .unwrap();
        sts.validate().unwrap();
        sts.set_storage("10Gi").unwrap();
        assert!(sts.validate().is_err());
        sts.set_volume_claim_name("data").unwrap();
        sts.validate().unwrap();
    }
}
