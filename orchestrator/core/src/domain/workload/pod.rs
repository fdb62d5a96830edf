// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use crate::domain::error::ValidationResult;
use crate::domain::kind::{Kind, TypeMeta};
use crate::domain::manifest::{Namespaced, Workload};
use crate::domain::metadata::ObjectMeta;
use crate::domain::pod_template::{PodSpec, Toleration};
use crate::domain::primitives::Labels;
use serde::{Deserialize, Serialize};

/// A single pod, scheduled directly without a controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pod {
    #[serde(flatten)]
    type_meta: TypeMeta,
    #[serde(default)]
    metadata: ObjectMeta,
    #[serde(default)]
    spec: PodSpec,
}

impl Pod {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            type_meta: TypeMeta::stable(Kind::Pod),
            metadata: ObjectMeta::named(name),
            spec: PodSpec::new(),
        }
    }

    pub fn spec(&self) -> &PodSpec {
        &self.spec
    }

    pub fn set_node_selector(&mut self, selector: &Labels) -> ValidationResult {
        self.spec.set_node_selector(selector)
    }

    pub fn add_toleration(&mut self, toleration: Toleration) -> ValidationResult {
        self.spec.add_toleration(toleration)
    }

    pub fn add_image_pull_secret(&mut self, name: &str) -> ValidationResult {
        self.spec.add_image_pull_secret(name)
    }

    pub fn set_host_network(&mut self, enabled: bool) {
        self.spec.set_host_network(enabled);
    }

    pub fn set_service_account_name(&mut self, name: &str) -> ValidationResult {
        self.spec.set_service_account_name(name)
    }

    pub fn set_priority_class_name(&mut self, name: &str) -> ValidationResult {
        self.spec.set_priority_class_name(name)
    }
}

impl_manifest!(Pod, {
    fn validate(&self) -> ValidationResult {
        self.metadata.validate(Self::VALIDATION)?;
        self.spec.validate()
    }
});

impl Namespaced for Pod {}

impl Workload for Pod {
    fn pod_spec(&self) -> &PodSpec {
        &self.spec
    }

    fn pod_spec_mut(&mut self) -> &mut PodSpec {
        &mut self.spec
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::container::Container;
    use crate::domain::manifest::Manifest;
    use crate::domain::pod_template::RestartPolicy;
    use crate::domain::primitives::labels_from;
    use crate::domain::volume::Volume;

    #[test]
    fn test_new_pod() {
        let pod = Pod::new("pod1");
        assert_eq!(pod.name(), "pod1");
        assert_eq!(pod.api_version(), "v1");
        assert_eq!(pod.kind(), Kind::Pod);
        assert!(pod.metadata().labels().is_empty());
        assert!(pod.containers().is_empty());
    }

    #[test]
    fn test_required_strings() {
        let mut pod = Pod::new("pod1");
        assert!(pod.set_metadata_name("").is_err());
        assert!(pod.set_namespace("").is_err());
        assert_eq!(pod.name(), "pod1");
        assert_eq!(pod.get_namespace(), None);
    }

    #[test]
    fn test_labels_overwrite() {
        let mut pod = Pod::new("pod1");
        pod.set_labels(&labels_from([("app", "a")])).unwrap();
        pod.set_labels(&labels_from([("app", "b")])).unwrap();
        assert_eq!(pod.metadata().label("app"), Some("b"));
        assert!(pod.set_labels(&Labels::new()).is_err());
        assert!(pod.set_annotations(&labels_from([("note", "")])).is_err());
    }

    #[test]
    fn test_containers_and_volumes() {
        let mut pod = Pod::new("pod1");
        pod.add_container(Container::new("c", "busybox")).unwrap();
        pod.add_volume(Volume::secret("v", "s")).unwrap();
        pod.set_restart_policy("Never").unwrap();
        assert_eq!(pod.spec().containers().len(), 1);
        assert_eq!(pod.spec().volumes().len(), 1);
        assert_eq!(pod.spec().restart_policy(), Some(RestartPolicy::Never));
    }

    #[test]
    fn test_pod_yaml_header() {
        let mut pod = Pod::new("pod1");
        pod.set_namespace("default").unwrap();
        let yaml = serde_yaml::to_string(&pod).unwrap();
        assert_eq!(
            yaml,
            "apiVersion: v1\nkind: Pod\nmetadata:\n  name: pod1\n  namespace: default\nspec: {}\n"
        );
    }

    #[test]
    fn test_pod_validation_needs_a_container() {
        let mut pod = Pod::new("web");
        assert!(pod.validate().is_err());
        pod.add_container(Container::new("web", "nginx")).unwrap();
        pod.set_priority_class_name("critical").unwrap();
        pod.validate().unwrap();
        assert_eq!(pod.spec().priority_class_name(), Some("critical"));
    }
}
