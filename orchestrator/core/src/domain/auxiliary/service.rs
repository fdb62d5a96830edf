// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use crate::domain::container::validate_port_number;
use crate::domain::error::{ValidationError, ValidationResult};
use crate::domain::kind::{Kind, TypeMeta};
use crate::domain::manifest::Namespaced;
use crate::domain::metadata::ObjectMeta;
use crate::domain::primitives::{
    parse_enum, require_non_empty, validate_label_map, IntOrString, Labels, Protocol,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::net::IpAddr;

/// `clusterIP` value that makes a headless service.
pub const HEADLESS_CLUSTER_IP: &str = "None";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServiceType {
    ClusterIP,
    NodePort,
    LoadBalancer,
    ExternalName,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServicePort {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub protocol: Protocol,
    pub port: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_port: Option<IntOrString>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_port: Option<i32>,
}

impl ServicePort {
    pub fn tcp(port: i32, target_port: impl Into<IntOrString>) -> Self {
        Self {
            name: None,
            protocol: Protocol::Tcp,
            port,
            target_port: Some(target_port.into()),
            node_port: None,
        }
    }

    fn validate(&self) -> ValidationResult {
        validate_port_number("port", self.port)?;
        if let Some(target) = &self.target_port {
            if target.is_zero() {
                return Err(ValidationError::invalid("targetPort", "must not be zero"));
            }
        }
        if let Some(node_port) = self.node_port {
            validate_port_number("nodePort", node_port)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceSpec {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    service_type: Option<ServiceType>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    selector: Labels,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    ports: Vec<ServicePort>,
    #[serde(rename = "clusterIP", default, skip_serializing_if = "Option::is_none")]
    cluster_ip: Option<String>,
    #[serde(rename = "loadBalancerIP", default, skip_serializing_if = "Option::is_none")]
    load_balancer_ip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    external_name: Option<String>,
}

/// Stable virtual address in front of a set of pods.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    #[serde(flatten)]
    type_meta: TypeMeta,
    #[serde(default)]
    metadata: ObjectMeta,
    #[serde(default)]
    spec: ServiceSpec,
}

impl Default for Service {
    fn default() -> Self {
        Self::new()
    }
}

impl Service {
    pub fn new() -> Self {
        Self {
            type_meta: TypeMeta::stable(Kind::Service),
            metadata: ObjectMeta::new(),
            spec: ServiceSpec::default(),
        }
    }

    pub fn service_type(&self) -> Option<ServiceType> {
        self.spec.service_type
    }

    pub fn selector(&self) -> &Labels {
        &self.spec.selector
    }

    pub fn ports(&self) -> &[ServicePort] {
        &self.spec.ports
    }

    pub fn cluster_ip(&self) -> Option<&str> {
        self.spec.cluster_ip.as_deref()
    }

    pub fn set_selector(&mut self, selector: &Labels) -> ValidationResult {
        validate_label_map("spec.selector", selector)?;
        self.spec
            .selector
            .extend(selector.iter().map(|(k, v)| (k.clone(), v.clone())));
        Ok(())
    }

    pub fn add_port(&mut self, port: ServicePort) -> ValidationResult {
        port.validate()?;
        self.spec.ports.push(port);
        Ok(())
    }

    pub fn set_type(&mut self, service_type: &str) -> ValidationResult {
        self.spec.service_type = Some(parse_enum("spec.type", service_type)?);
        Ok(())
    }

    /// Accepts an IP address or `None` for a headless service.
    pub fn set_cluster_ip(&mut self, ip: &str) -> ValidationResult {
        if ip != HEADLESS_CLUSTER_IP {
            parse_ip("spec.clusterIP", ip)?;
        }
        self.spec.cluster_ip = Some(ip.to_string());
        Ok(())
    }

    pub fn set_load_balancer_ip(&mut self, ip: &str) -> ValidationResult {
        parse_ip("spec.loadBalancerIP", ip)?;
        self.spec.load_balancer_ip = Some(ip.to_string());
        Ok(())
    }

    pub fn set_external_name(&mut self, name: &str) -> ValidationResult {
        require_non_empty("spec.externalName", name)?;
        self.spec.external_name = Some(name.to_string());
        Ok(())
    }
}

fn parse_ip(field: &'static str, ip: &str) -> ValidationResult<IpAddr> {
    require_non_empty(field, ip)?;
    ip.parse()
        .map_err(|_| ValidationError::invalid(field, format!("'{ip}' is not an IP address")))
}

impl ServiceSpec {
    fn validate(&self) -> ValidationResult {
        if !self.selector.is_empty() {
            validate_label_map("spec.selector", &self.selector)?;
        }
        for port in &self.ports {
            port.validate()?;
        }
        if let Some(ip) = self.cluster_ip.as_deref().filter(|ip| *ip != HEADLESS_CLUSTER_IP) {
            parse_ip("spec.clusterIP", ip)?;
        }
        if let Some(ip) = &self.load_balancer_ip {
            parse_ip("spec.loadBalancerIP", ip)?;
        }
        if let Some(name) = &self.external_name {
            require_non_empty("spec.externalName", name)?;
        }
        Ok(())
    }
}

impl_manifest!(Service, {
    fn validate(&self) -> ValidationResult {
        self.metadata.validate(Self::VALIDATION)?;
        self.spec.validate()
    }
});

impl Namespaced for Service {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::manifest::Manifest;
    use crate::domain::primitives::labels_from;

    #[test]
    fn test_ports() {
        let mut svc = Service::new();
        assert!(svc.add_port(ServicePort::tcp(0, 8080)).is_err());
        assert!(svc.add_port(ServicePort::tcp(80, 0)).is_err());
        assert!(svc.add_port(ServicePort::tcp(80, "")).is_err());
        svc.add_port(ServicePort::tcp(80, "http")).unwrap();
        assert_eq!(svc.ports().len(), 1);
    }

    #[test]
    fn test_type_and_ips() {
        let mut svc = Service::new();
        assert!(svc.set_type("Headless").is_err());
        svc.set_type("LoadBalancer").unwrap();
        assert!(svc.set_cluster_ip("10.0.0.300").is_err());
        svc.set_cluster_ip("None").unwrap();
        assert!(svc.set_load_balancer_ip("").is_err());
        svc.set_load_balancer_ip("203.0.113.10").unwrap();
        assert_eq!(svc.service_type(), Some(ServiceType::LoadBalancer));
        assert_eq!(svc.cluster_ip(), Some("None"));
    }

    #[test]
    fn test_service_yaml() {
        let mut svc = Service::new();
        svc.set_metadata_name("web").unwrap();
        svc.set_selector(&labels_from([("app", "web")])).unwrap();
        svc.add_port(ServicePort::tcp(80, 8080)).unwrap();
        svc.set_cluster_ip("10.96.0.10").unwrap();
        let yaml = serde_yaml::to_string(&svc).unwrap();
        assert!(yaml.contains("clusterIP: 10.96.0.10"), "{yaml}");
        assert!(yaml.contains("targetPort: 8080"));
        assert!(yaml.contains("protocol: TCP"));
        assert!(!yaml.contains("type:"));
    }

    #[test]
    fn test_parsed_service_rechecked() {
        let yaml = "apiVersion: v1\nkind: Service\nmetadata:\n  name: web\nspec:\n  selector:\n    app: web\n  clusterIP: None\n  ports:\n  - port: 80\n    targetPort: 8080\n";
        let svc: Service = serde_yaml::from_str(yaml).unwrap();
        svc.validate().unwrap();
        for (from, to) in [("port: 80", "port: 70000"), ("clusterIP: None", "clusterIP: nowhere")] {
            let svc: Service = serde_yaml::from_str(&yaml.replace(from, to)).unwrap();
            assert!(svc.validate().is_err(), "{to}");
        }
    }
}
