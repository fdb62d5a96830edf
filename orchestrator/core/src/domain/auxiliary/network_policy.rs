// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Network Policy
//!
//! Allow-list rules for pod traffic. Every rule added through
//! [`NetworkPolicy::add_ingress`] / [`NetworkPolicy::add_egress`] must name at
//! least one port and at least one peer with an `ipBlock`.
//!
//! Labels on this kind are write-once: `set_labels` with a key that is
//! already present fails.

use crate::domain::error::{ValidationError, ValidationResult};
use crate::domain::kind::{Kind, TypeMeta};
use crate::domain::manifest::Namespaced;
use crate::domain::metadata::{LabelPolicy, ObjectMeta};
use crate::domain::primitives::{parse_enum, validate_cidr, IntOrString, Labels, Protocol};
use crate::domain::selector::LabelSelector;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PolicyType {
    Ingress,
    Egress,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpBlock {
    pub cidr: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub except: Vec<String>,
}

impl IpBlock {
    pub fn new(cidr: impl Into<String>) -> Self {
        Self {
            cidr: cidr.into(),
            except: Vec::new(),
        }
    }

    fn validate(&self) -> ValidationResult {
        validate_cidr("ipBlock.cidr", &self.cidr)?;
        for except in &self.except {
            validate_cidr("ipBlock.except", except)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkPolicyPeer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_block: Option<IpBlock>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace_selector: Option<LabelSelector>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pod_selector: Option<LabelSelector>,
}

impl NetworkPolicyPeer {
    pub fn ip_block(block: IpBlock) -> Self {
        Self {
            ip_block: Some(block),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkPolicyPort {
    #[serde(default)]
    pub protocol: Protocol,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<IntOrString>,
}

impl NetworkPolicyPort {
    pub fn tcp(port: impl Into<IntOrString>) -> Self {
        Self {
            protocol: Protocol::Tcp,
            port: Some(port.into()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkPolicyIngressRule {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub from: Vec<NetworkPolicyPeer>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<NetworkPolicyPort>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkPolicyEgressRule {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub to: Vec<NetworkPolicyPeer>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<NetworkPolicyPort>,
}

fn validate_rule(peers: &[NetworkPolicyPeer], ports: &[NetworkPolicyPort]) -> ValidationResult {
    if ports.is_empty() {
        return Err(ValidationError::EmptyCollection { field: "ports" });
    }
    if ports
        .iter()
        .any(|p| p.port.as_ref().is_some_and(IntOrString::is_zero))
    {
        return Err(ValidationError::invalid("ports", "port must not be zero"));
    }
    if !peers.iter().any(|peer| peer.ip_block.is_some()) {
        return Err(ValidationError::EmptyCollection { field: "ipBlock" });
    }
    for peer in peers {
        if let Some(block) = &peer.ip_block {
            block.validate()?;
        }
        for selector in peer.namespace_selector.iter().chain(&peer.pod_selector) {
            selector.validate()?;
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkPolicySpec {
    #[serde(default)]
    pod_selector: LabelSelector,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    policy_types: Vec<PolicyType>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    ingress: Vec<NetworkPolicyIngressRule>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    egress: Vec<NetworkPolicyEgressRule>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkPolicy {
    #[serde(flatten)]
    type_meta: TypeMeta,
    #[serde(default)]
    metadata: ObjectMeta,
    #[serde(default)]
    spec: NetworkPolicySpec,
}

impl Default for NetworkPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl NetworkPolicy {
    pub fn new() -> Self {
        Self {
            type_meta: TypeMeta::stable(Kind::NetworkPolicy),
            metadata: ObjectMeta::new(),
            spec: NetworkPolicySpec::default(),
        }
    }

    pub fn pod_selector(&self) -> &LabelSelector {
        &self.spec.pod_selector
    }

    pub fn policy_types(&self) -> &[PolicyType] {
        &self.spec.policy_types
    }

    pub fn ingress(&self) -> &[NetworkPolicyIngressRule] {
        &self.spec.ingress
    }

    pub fn egress(&self) -> &[NetworkPolicyEgressRule] {
        &self.spec.egress
    }

    /// Appends each of `Ingress` / `Egress`; any other value rejects the call.
    pub fn set_policy_types(&mut self, types: &[&str]) -> ValidationResult {
        if types.is_empty() {
            return Err(ValidationError::EmptyCollection {
                field: "spec.policyTypes",
            });
        }
        let parsed = types
            .iter()
            .map(|t| parse_enum::<PolicyType>("spec.policyTypes", t))
            .collect::<ValidationResult<Vec<_>>>()?;
        self.spec.policy_types.extend(parsed);
        Ok(())
    }

    pub fn add_pod_selector(&mut self, labels: &Labels) -> ValidationResult {
        self.spec.pod_selector.set_match_labels(labels)
    }

    pub fn add_ingress(&mut self, rule: NetworkPolicyIngressRule) -> ValidationResult {
        validate_rule(&rule.from, &rule.ports)?;
        self.spec.ingress.push(rule);
        Ok(())
    }

    pub fn add_egress(&mut self, rule: NetworkPolicyEgressRule) -> ValidationResult {
        validate_rule(&rule.to, &rule.ports)?;
        self.spec.egress.push(rule);
        Ok(())
    }
}

impl_manifest!(NetworkPolicy, {
    const LABEL_POLICY: LabelPolicy = LabelPolicy::RejectExisting;

    fn validate(&self) -> ValidationResult {
        self.metadata.validate(Self::VALIDATION)?;
        let spec = &self.spec;
        spec.pod_selector.validate()?;
        for rule in &spec.ingress {
            validate_rule(&rule.from, &rule.ports)?;
        }
        for rule in &spec.egress {
            validate_rule(&rule.to, &rule.ports)?;
        }
        Ok(())
    }
});

impl Namespaced for NetworkPolicy {}
