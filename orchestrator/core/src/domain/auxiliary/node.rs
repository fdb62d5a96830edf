// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use crate::domain::error::ValidationResult;
use crate::domain::kind::{Kind, TypeMeta};
use crate::domain::metadata::ObjectMeta;
use crate::domain::pod_template::TaintEffect;
use crate::domain::primitives::{is_false, require_non_empty, validate_cidr};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Taint {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub effect: TaintEffect,
}

impl Taint {
    pub fn new(key: impl Into<String>, value: Option<&str>, effect: TaintEffect) -> Self {
        Self {
            key: key.into(),
            value: value.map(str::to_string),
            effect,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeSpec {
    #[serde(rename = "podCIDR", default, skip_serializing_if = "Option::is_none")]
    pod_cidr: Option<String>,
    #[serde(rename = "providerID", default, skip_serializing_if = "Option::is_none")]
    provider_id: Option<String>,
    #[serde(rename = "externalID", default, skip_serializing_if = "String::is_empty")]
    external_id: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    taints: Vec<Taint>,
    #[serde(default, skip_serializing_if = "is_false")]
    unschedulable: bool,
}

/// A cluster member. Only the writable spec fields are modelled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    #[serde(flatten)]
    type_meta: TypeMeta,
    #[serde(default)]
    metadata: ObjectMeta,
    #[serde(default)]
    spec: NodeSpec,
}

impl Node {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            type_meta: TypeMeta::stable(Kind::Node),
            metadata: ObjectMeta::named(name),
            spec: NodeSpec::default(),
        }
    }

    pub fn taints(&self) -> &[Taint] {
        &self.spec.taints
    }

    pub fn unschedulable(&self) -> bool {
        self.spec.unschedulable
    }

    pub fn get_external_id(&self) -> &str {
        &self.spec.external_id
    }

    /// Cordons (`true`) or uncordons (`false`) the node.
    pub fn set_unschedulable(&mut self, unschedulable: bool) {
        self.spec.unschedulable = unschedulable;
    }

    pub fn add_taint(&mut self, taint: Taint) -> ValidationResult {
        require_non_empty("spec.taints.key", &taint.key)?;
        self.spec.taints.push(taint);
        Ok(())
    }

    pub fn set_pod_cidr(&mut self, cidr: &str) -> ValidationResult {
        validate_cidr("spec.podCIDR", cidr)?;
        self.spec.pod_cidr = Some(cidr.to_string());
        Ok(())
    }

    pub fn set_provider_id(&mut self, id: &str) -> ValidationResult {
        require_non_empty("spec.providerID", id)?;
        self.spec.provider_id = Some(id.to_string());
        Ok(())
    }

    pub fn set_external_id(&mut self, id: &str) -> ValidationResult {
        require_non_empty("spec.externalID", id)?;
        self.spec.external_id = id.to_string();
        Ok(())
    }
}

impl_manifest!(Node, {
    fn validate(&self) -> ValidationResult {
        self.metadata.validate(Self::VALIDATION)?;
        let spec = &self.spec;
        if let Some(cidr) = &spec.pod_cidr {
            validate_cidr("spec.podCIDR", cidr)?;
        }
        if let Some(id) = &spec.provider_id {
            require_non_empty("spec.providerID", id)?;
        }
        for taint in &spec.taints {
            require_non_empty("spec.taints.key", &taint.key)?;
        }
        Ok(())
    }
});

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::manifest::Manifest;
    use crate::domain::primitives::labels_from;

    #[test]
    fn test_taints() {
        let mut node = Node::new("worker-1");
        assert!(node
            .add_taint(Taint::new("", None, TaintEffect::NoSchedule))
            .is_err());
        node.add_taint(Taint::new("dedicated", Some("gpu"), TaintEffect::NoExecute))
            .unwrap();
        assert_eq!(node.taints().len(), 1);
    }

    #[test]
    fn test_spec_setters() {
        let mut node = Node::new("worker-1");
        assert!(node.set_pod_cidr("10.244.1.0").is_err());
        node.set_pod_cidr("10.244.1.0/24").unwrap();
        assert!(node.set_provider_id("").is_err());
        node.set_provider_id("aws:///us-east-1a/i-0abc").unwrap();
        assert_eq!(node.get_external_id(), "");
        node.set_external_id("10.0.0.7").unwrap();
        assert_eq!(node.get_external_id(), "10.0.0.7");
        node.set_unschedulable(true);
        assert!(node.unschedulable());
    }

    #[test]
    fn test_node_yaml() {
        let mut node = Node::new("worker-1");
        node.set_labels(&labels_from([("node-role.kubernetes.io/worker", "true")]))
            .unwrap();
        node.set_pod_cidr("10.244.1.0/24").unwrap();
        node.set_unschedulable(true);
        let yaml = serde_yaml::to_string(&node).unwrap();
        assert!(yaml.contains("podCIDR: 10.244.1.0/24"), "{yaml}");
        assert!(yaml.contains("unschedulable: true"));
        assert!(!yaml.contains("namespace"));
    }

    #[test]
    fn test_parsed_node_rechecked() {
        let yaml = "apiVersion: v1\nkind: Node\nmetadata:\n  name: n1\nspec:\n  podCIDR: 10.244.1.0/24\n  taints:\n  - key: dedicated\n    effect: NoSchedule\n";
        let node: Node = serde_yaml::from_str(yaml).unwrap();
        node.validate().unwrap();
        let node: Node = serde_yaml::from_str(&yaml.replace("10.244.1.0/24", "10.244.1.0")).unwrap();
        assert!(node.validate().is_err());
    }
}
