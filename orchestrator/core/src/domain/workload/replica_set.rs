// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use crate::domain::error::ValidationResult;
use crate::domain::kind::{Kind, TypeMeta};
use crate::domain::manifest::{validate_controller, Controller, Namespaced, Workload};
use crate::domain::metadata::ObjectMeta;
use crate::domain::pod_template::{PodSpec, PodTemplateSpec};
use crate::domain::primitives::{
    is_zero_i32, require_non_empty, require_positive, validate_replicas,
};
use crate::domain::selector::LabelSelector;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplicaSetSpec {
    #[serde(default, skip_serializing_if = "is_zero_i32")]
    replicas: i32,
    #[serde(default, skip_serializing_if = "LabelSelector::is_empty")]
    selector: LabelSelector,
    #[serde(default)]
    template: PodTemplateSpec,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplicaSet {
    #[serde(flatten)]
    type_meta: TypeMeta,
    #[serde(default)]
    metadata: ObjectMeta,
    #[serde(default)]
    spec: ReplicaSetSpec,
}

impl Default for ReplicaSet {
    fn default() -> Self {
        Self::new()
    }
}

impl ReplicaSet {
    pub fn new() -> Self {
        Self {
            type_meta: TypeMeta::stable(Kind::ReplicaSet),
            metadata: ObjectMeta::new(),
            spec: ReplicaSetSpec::default(),
        }
    }

    pub fn replicas(&self) -> i32 {
        self.spec.replicas
    }

    pub fn set_replicas(&mut self, replicas: i32) -> ValidationResult {
        require_positive("spec.replicas", replicas.into())?;
        self.spec.replicas = replicas;
        Ok(())
    }

    pub fn get_label(&self, key: &str) -> Option<&str> {
        self.metadata.label(key)
    }

    /// Sets a single pod template label, overwriting any previous value.
    pub fn set_template_label(&mut self, key: &str, value: &str) -> ValidationResult {
        require_non_empty("template label key", key)?;
        require_non_empty("template label value", value)?;
        self.spec.template.metadata_mut().insert_label(key, value);
        Ok(())
    }
}

impl_manifest!(ReplicaSet, {
    fn validate(&self) -> ValidationResult {
        self.metadata.validate(Self::VALIDATION)?;
        validate_replicas("spec.replicas", self.spec.replicas)?;
        validate_controller(self)
    }
});

impl Namespaced for ReplicaSet {}

impl Workload for ReplicaSet {
    fn pod_spec(&self) -> &PodSpec {
        self.spec.template.spec()
    }

    fn pod_spec_mut(&mut self) -> &mut PodSpec {
        self.spec.template.spec_mut()
    }
}

impl Controller for ReplicaSet {
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
    use crate::domain::manifest::Manifest;
    use crate::domain::primitives::labels_from;

    #[test]
    fn test_get_label() {
        let mut rs = ReplicaSet::new();
        rs.set_labels(&labels_from([("tier", "frontend")])).unwrap();
        assert_eq!(rs.get_label("tier"), Some("frontend"));
        assert_eq!(rs.get_label("missing"), None);
    }

    #[test]
    fn test_template_label() {
        let mut rs = ReplicaSet::new();
        assert!(rs.set_template_label("", "v").is_err());
        assert!(rs.set_template_label("k", "").is_err());
        rs.set_template_label("tier", "frontend").unwrap();
        rs.set_template_label("tier", "backend").unwrap();
        assert_eq!(rs.template().labels(), &labels_from([("tier", "backend")]));
    }

    #[test]
    fn test_replicas() {
        let mut rs = ReplicaSet::new();
        assert!(rs.set_replicas(-2).is_err());
        assert_eq!(rs.replicas(), 0);
        rs.set_replicas(5).unwrap();
        assert_eq!(rs.replicas(), 5);
    }

    #[test]
    fn test_parsed_replicas_rechecked() {
        let yaml = "apiVersion: apps/v1\nkind: ReplicaSet\nmetadata:\n  name: web\nspec:\n  replicas: -1\n  selector:\n    matchLabels:\n      tier: frontend\n  template:\n    metadata:\n      labels:\n        tier: frontend\n    spec:\n      containers:\n      - name: php\n        image: php:8\n";
        let rs: ReplicaSet = serde_yaml::from_str(yaml).unwrap();
        assert!(rs.validate().is_err());
        let rs: ReplicaSet = serde_yaml::from_str(&yaml.replace("replicas: -1", "replicas: 3")).unwrap();
        rs.validate().unwrap();
    }
}
