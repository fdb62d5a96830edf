// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Pod Template
//!
//! The reusable pod description embedded in every workload: containers,
//! volumes, restart policy and scheduling hints.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Owns containers and volumes by value

use crate::domain::container::Container;
use crate::domain::error::{ValidationError, ValidationResult};
use crate::domain::metadata::ObjectMeta;
use crate::domain::primitives::{
    is_false, parse_enum, require_non_empty, require_non_negative, validate_label_map, Labels,
    LocalObjectReference,
};
use crate::domain::volume::Volume;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RestartPolicy {
    Always,
    Never,
    OnFailure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaintEffect {
    NoSchedule,
    PreferNoSchedule,
    NoExecute,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TolerationOperator {
    Exists,
    Equal,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Toleration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<TolerationOperator>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effect: Option<TaintEffect>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toleration_seconds: Option<i64>,
}

impl Toleration {
    pub fn equal(key: &str, value: &str, effect: TaintEffect) -> Self {
        Self {
            key: Some(key.to_string()),
            operator: Some(TolerationOperator::Equal),
            value: Some(value.to_string()),
            effect: Some(effect),
            toleration_seconds: None,
        }
    }

    pub fn exists(key: &str) -> Self {
        Self {
            key: Some(key.to_string()),
            operator: Some(TolerationOperator::Exists),
            ..Self::default()
        }
    }

    /// An empty key is only meaningful with `Exists`, which then matches
    /// every taint.
    pub(crate) fn validate(&self) -> ValidationResult {
        let exists = self.operator == Some(TolerationOperator::Exists);
        if self.key.as_deref().unwrap_or_default().is_empty() && !exists {
            return Err(ValidationError::Empty { field: "toleration key" });
        }
        if exists && self.value.is_some() {
            return Err(ValidationError::invalid(
                "toleration",
                "operator Exists takes no value",
            ));
        }
        if self.toleration_seconds.is_some() && self.effect != Some(TaintEffect::NoExecute) {
            return Err(ValidationError::invalid(
                "toleration",
                "tolerationSeconds applies only to the NoExecute effect",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeSelectorOperator {
    In,
    NotIn,
    Exists,
    DoesNotExist,
    Gt,
    Lt,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSelectorRequirement {
    pub key: String,
    pub operator: NodeSelectorOperator,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,
}

impl NodeSelectorRequirement {
    fn validate(&self) -> ValidationResult {
        require_non_empty("nodeSelectorRequirement key", &self.key)?;
        let expected = match self.operator {
            NodeSelectorOperator::In | NodeSelectorOperator::NotIn => None,
            NodeSelectorOperator::Exists | NodeSelectorOperator::DoesNotExist => Some(0),
            NodeSelectorOperator::Gt | NodeSelectorOperator::Lt => Some(1),
        };
        let ok = match expected {
            None => !self.values.is_empty(),
            Some(n) => self.values.len() == n,
        };
        if !ok {
            return Err(ValidationError::invalid(
                "nodeSelectorRequirement values",
                format!("{:?} got {} values", self.operator, self.values.len()),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeSelectorTerm {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub match_expressions: Vec<NodeSelectorRequirement>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeSelector {
    pub node_selector_terms: Vec<NodeSelectorTerm>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeAffinity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_during_scheduling_ignored_during_execution: Option<NodeSelector>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Affinity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_affinity: Option<NodeAffinity>,
}

// ============================================================================
// PodSpec
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodSpec {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    init_containers: Vec<Container>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    containers: Vec<Container>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    volumes: Vec<Volume>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    restart_policy: Option<RestartPolicy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    termination_grace_period_seconds: Option<i64>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    node_selector: Labels,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    service_account_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    priority_class_name: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    host_network: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    image_pull_secrets: Vec<LocalObjectReference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    affinity: Option<Affinity>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    tolerations: Vec<Toleration>,
}

impl PodSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn containers(&self) -> &[Container] {
        &self.containers
    }

    pub fn init_containers(&self) -> &[Container] {
        &self.init_containers
    }

    pub fn volumes(&self) -> &[Volume] {
        &self.volumes
    }

    pub fn restart_policy(&self) -> Option<RestartPolicy> {
        self.restart_policy
    }

    pub fn node_selector(&self) -> &Labels {
        &self.node_selector
    }

    pub fn tolerations(&self) -> &[Toleration] {
        &self.tolerations
    }

    pub fn image_pull_secrets(&self) -> &[LocalObjectReference] {
        &self.image_pull_secrets
    }

    pub fn termination_grace_period_seconds(&self) -> Option<i64> {
        self.termination_grace_period_seconds
    }

    pub fn affinity(&self) -> Option<&Affinity> {
        self.affinity.as_ref()
    }

    pub fn priority_class_name(&self) -> Option<&str> {
        self.priority_class_name.as_deref()
    }

    pub fn add_container(&mut self, container: Container) -> ValidationResult {
        container.validate_identity()?;
        self.containers.push(container);
        Ok(())
    }

    pub fn add_init_container(&mut self, container: Container) -> ValidationResult {
        container.validate_identity()?;
        self.init_containers.push(container);
        Ok(())
    }

    /// Container with the given name, for follow-up configuration.
    pub fn container_mut(&mut self, name: &str) -> Option<&mut Container> {
        self.containers.iter_mut().find(|c| c.name() == name)
    }

    pub fn add_volume(&mut self, volume: Volume) -> ValidationResult {
        volume.validate()?;
        self.volumes.push(volume);
        Ok(())
    }

    /// Accepts `Always`, `Never` or `OnFailure`.
    pub fn set_restart_policy(&mut self, policy: &str) -> ValidationResult {
        let policy: RestartPolicy = parse_enum("restartPolicy", policy)?;
        self.restart_policy = Some(policy);
        Ok(())
    }

    pub(crate) fn put_restart_policy(&mut self, policy: RestartPolicy) {
        self.restart_policy = Some(policy);
    }

    pub fn set_node_selector(&mut self, selector: &Labels) -> ValidationResult {
        validate_label_map("nodeSelector", selector)?;
        self.node_selector
            .extend(selector.iter().map(|(k, v)| (k.clone(), v.clone())));
        Ok(())
    }

    pub fn add_toleration(&mut self, toleration: Toleration) -> ValidationResult {
        toleration.validate()?;
        self.tolerations.push(toleration);
        Ok(())
    }

    pub fn add_image_pull_secret(&mut self, name: &str) -> ValidationResult {
        require_non_empty("imagePullSecrets name", name)?;
        self.image_pull_secrets.push(LocalObjectReference {
            name: name.to_string(),
        });
        Ok(())
    }

    pub fn set_host_network(&mut self, enabled: bool) {
        self.host_network = enabled;
    }

    pub fn set_service_account_name(&mut self, name: &str) -> ValidationResult {
        require_non_empty("serviceAccountName", name)?;
        self.service_account_name = Some(name.to_string());
        Ok(())
    }

    pub fn set_priority_class_name(&mut self, name: &str) -> ValidationResult {
        require_non_empty("priorityClassName", name)?;
        self.priority_class_name = Some(name.to_string());
        Ok(())
    }

    pub fn set_termination_grace_period_seconds(&mut self, seconds: i64) -> ValidationResult {
        require_non_negative("terminationGracePeriodSeconds", seconds)?;
        self.termination_grace_period_seconds = Some(seconds);
        Ok(())
    }

    /// Adds one required node-affinity term; terms are ORed, the
    /// requirements inside a term are ANDed.
    pub fn add_node_affinity_term(
        &mut self,
        requirements: Vec<NodeSelectorRequirement>,
    ) -> ValidationResult {
        if requirements.is_empty() {
            return Err(ValidationError::EmptyCollection {
                field: "nodeSelectorTerm",
            });
        }
        for requirement in &requirements {
            requirement.validate()?;
        }
        let affinity = self.affinity.get_or_insert_with(Affinity::default);
        let node = affinity.node_affinity.get_or_insert_with(NodeAffinity::default);
        let required = node
            .required_during_scheduling_ignored_during_execution
            .get_or_insert_with(NodeSelector::default);
        required.node_selector_terms.push(NodeSelectorTerm {
            match_expressions: requirements,
        });
        Ok(())
    }

    /// Re-applies the setter rules to the whole pod spec. A pod needs at
    /// least one container.
    pub(crate) fn validate(&self) -> ValidationResult {
        if self.containers.is_empty() {
            return Err(ValidationError::EmptyCollection { field: "containers" });
        }
        for container in self.init_containers.iter().chain(&self.containers) {
            container.validate()?;
        }
        for volume in &self.volumes {
            volume.validate()?;
        }
        if !self.node_selector.is_empty() {
            validate_label_map("nodeSelector", &self.node_selector)?;
        }
        for toleration in &self.tolerations {
            toleration.validate()?;
        }
        for secret in &self.image_pull_secrets {
            require_non_empty("imagePullSecrets name", &secret.name)?;
        }
        if let Some(name) = &self.service_account_name {
            require_non_empty("serviceAccountName", name)?;
        }
        if let Some(name) = &self.priority_class_name {
            require_non_empty("priorityClassName", name)?;
        }
        if let Some(seconds) = self.termination_grace_period_seconds {
            require_non_negative("terminationGracePeriodSeconds", seconds)?;
        }
        let terms = self
            .affinity
            .iter()
            .filter_map(|a| a.node_affinity.as_ref())
            .filter_map(|n| n.required_during_scheduling_ignored_during_execution.as_ref())
            .flat_map(|required| &required.node_selector_terms);
        for term in terms {
            if term.match_expressions.is_empty() {
                return Err(ValidationError::EmptyCollection {
                    field: "nodeSelectorTerm",
                });
            }
            for requirement in &term.match_expressions {
                requirement.validate()?;
            }
        }
        Ok(())
    }
}

// ============================================================================
// PodTemplateSpec
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PodTemplateSpec {
    #[serde(default)]
    metadata: ObjectMeta,
    #[serde(default)]
    spec: PodSpec,
}

impl PodTemplateSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn metadata(&self) -> &ObjectMeta {
        &self.metadata
    }

    pub fn metadata_mut(&mut self) -> &mut ObjectMeta {
        &mut self.metadata
    }

    pub fn spec(&self) -> &PodSpec {
        &self.spec
    }

    pub fn spec_mut(&mut self) -> &mut PodSpec {
        &mut self.spec
    }

    pub fn labels(&self) -> &Labels {
        self.metadata.labels()
    }

    /// Template metadata carries no name, so only its label and annotation
    /// maps are checked.
    pub(crate) fn validate(&self) -> ValidationResult {
        self.metadata.validate_maps()?;
        self.spec.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::primitives::labels_from;

    #[test]
    fn test_restart_policy_enumeration() {
        let mut spec = PodSpec::new();
        spec.set_restart_policy("OnFailure").unwrap();
        assert!(spec.set_restart_policy("policy1").is_err());
        assert!(spec.set_restart_policy("").is_err());
        assert_eq!(spec.restart_policy(), Some(RestartPolicy::OnFailure));
    }

    #[test]
    fn test_add_container_rejects_anonymous() {
        let mut spec = PodSpec::new();
        assert!(spec.add_container(Container::new("", "nginx")).is_err());
        assert!(spec.add_container(Container::new("web", "")).is_err());
        spec.add_container(Container::new("web", "nginx")).unwrap();
        assert_eq!(spec.containers().len(), 1);
        assert!(spec.container_mut("web").is_some());
    }

    #[test]
    fn test_add_volume_requires_source() {
        let mut spec = PodSpec::new();
        assert!(spec.add_volume(Volume::new("bare")).is_err());
        spec.add_volume(Volume::empty_dir("tmp")).unwrap();
        assert_eq!(spec.volumes().len(), 1);
    }

    #[test]
    fn test_toleration_rules() {
        let mut spec = PodSpec::new();
        assert!(spec.add_toleration(Toleration::default()).is_err());
        let mut with_value = Toleration::exists("gpu");
        with_value.value = Some("yes".into());
        assert!(spec.add_toleration(with_value).is_err());
        let mut timed = Toleration::equal("k", "v", TaintEffect::NoSchedule);
        timed.toleration_seconds = Some(30);
        assert!(spec.add_toleration(timed).is_err());

        let match_all = Toleration {
            operator: Some(TolerationOperator::Exists),
            ..Default::default()
        };
        spec.add_toleration(match_all).unwrap();
        spec.add_toleration(Toleration::equal("dedicated", "db", TaintEffect::NoExecute))
            .unwrap();
        assert_eq!(spec.tolerations().len(), 2);
    }

    #[test]
    fn test_node_affinity_terms() {
        let mut spec = PodSpec::new();
        assert!(spec.add_node_affinity_term(vec![]).is_err());
        let bad = NodeSelectorRequirement {
            key: "cpu".into(),
            operator: NodeSelectorOperator::Gt,
            values: vec![],
        };
        assert!(spec.add_node_affinity_term(vec![bad]).is_err());
        assert!(spec.affinity().is_none());

        let zone = NodeSelectorRequirement {
            key: "topology.kubernetes.io/zone".into(),
            operator: NodeSelectorOperator::In,
            values: vec!["a".into()],
        };
        spec.add_node_affinity_term(vec![zone]).unwrap();
        let yaml = serde_yaml::to_string(&spec).unwrap();
        assert!(yaml.contains("requiredDuringSchedulingIgnoredDuringExecution"), "{yaml}");
    }

    // ── Whole-spec validation ──

    #[test]
    fn test_spec_validation_walks_containers_and_volumes() {
        assert_eq!(
            PodSpec::new().validate(),
            Err(ValidationError::EmptyCollection { field: "containers" })
        );

        let mut spec = PodSpec::new();
        spec.add_container(Container::new("web", "nginx")).unwrap();
        spec.set_priority_class_name("high").unwrap();
        spec.validate().unwrap();
        assert_eq!(spec.priority_class_name(), Some("high"));

        let parsed: PodSpec = serde_yaml::from_str(
            "containers:\n- name: web\n  image: nginx\nvolumes:\n- name: scratch\n",
        )
        .unwrap();
        assert!(parsed.validate().is_err());

        let parsed: PodSpec = serde_yaml::from_str(
            "containers:\n- name: web\n  image: nginx\nterminationGracePeriodSeconds: -5\n",
        )
        .unwrap();
        assert!(parsed.validate().is_err());
    }

    #[test]
    fn test_scheduling_hints() {
        let mut spec = PodSpec::new();
        assert!(spec.set_node_selector(&Labels::new()).is_err());
        spec.set_node_selector(&labels_from([("disk", "ssd")])).unwrap();
        assert!(spec.add_image_pull_secret("").is_err());
        spec.add_image_pull_secret("regcred").unwrap();
        assert!(spec.set_termination_grace_period_seconds(-1).is_err());
        spec.set_termination_grace_period_seconds(0).unwrap();
        assert_eq!(spec.termination_grace_period_seconds(), Some(0));
        spec.set_host_network(true);
        let yaml = serde_yaml::to_string(&spec).unwrap();
        assert!(yaml.contains("hostNetwork: true"));
        assert!(yaml.contains("nodeSelector:\n  disk: ssd"));
    }
}
