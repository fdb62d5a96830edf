// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Endpoints
//!
//! Hand-maintained backends for a selector-less service. Each subset pairs
//! a set of addresses with the ports they all serve.

use crate::domain::container::validate_port_number;
use crate::domain::error::{ValidationError, ValidationResult};
use crate::domain::kind::{Kind, TypeMeta};
use crate::domain::manifest::Namespaced;
use crate::domain::metadata::ObjectMeta;
use crate::domain::primitives::{require_non_empty, Protocol};
use serde::{Deserialize, Serialize};
use std::net::IpAddr;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointAddress {
    pub ip: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_name: Option<String>,
}

impl EndpointAddress {
    fn validate(&self) -> ValidationResult {
        self.ip.parse::<IpAddr>().map_err(|_| {
            ValidationError::invalid("addresses.ip", format!("'{}' is not an IP address", self.ip))
        })?;
        if let Some(hostname) = &self.hostname {
            require_non_empty("addresses.hostname", hostname)?;
        }
        if let Some(node_name) = &self.node_name {
            require_non_empty("addresses.nodeName", node_name)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointPort {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub port: i32,
    #[serde(default)]
    pub protocol: Protocol,
}

impl EndpointPort {
    pub fn tcp(port: i32) -> Self {
        Self {
            name: None,
            port,
            protocol: Protocol::Tcp,
        }
    }

    fn validate(&self) -> ValidationResult {
        validate_port_number("ports.port", self.port)?;
        if let Some(name) = &self.name {
            require_non_empty("ports.name", name)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointSubset {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    addresses: Vec<EndpointAddress>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    not_ready_addresses: Vec<EndpointAddress>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    ports: Vec<EndpointPort>,
}

impl EndpointSubset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn addresses(&self) -> &[EndpointAddress] {
        &self.addresses
    }

    pub fn not_ready_addresses(&self) -> &[EndpointAddress] {
        &self.not_ready_addresses
    }

    pub fn ports(&self) -> &[EndpointPort] {
        &self.ports
    }

    pub fn add_address(&mut self, ip: &str) -> ValidationResult {
        let address = bare_address(ip);
        address.validate()?;
        self.addresses.push(address);
        Ok(())
    }

    pub fn add_not_ready_address(&mut self, ip: &str) -> ValidationResult {
        let address = bare_address(ip);
        address.validate()?;
        self.not_ready_addresses.push(address);
        Ok(())
    }

    pub fn add_port(&mut self, port: EndpointPort) -> ValidationResult {
        port.validate()?;
        self.ports.push(port);
        Ok(())
    }

    /// A subset with no address of either kind routes nowhere.
    fn validate(&self) -> ValidationResult {
        if self.addresses.is_empty() && self.not_ready_addresses.is_empty() {
            return Err(ValidationError::EmptyCollection { field: "subsets.addresses" });
        }
        for address in self.addresses.iter().chain(&self.not_ready_addresses) {
            address.validate()?;
        }
        for port in &self.ports {
            port.validate()?;
        }
        Ok(())
    }
}

fn bare_address(ip: &str) -> EndpointAddress {
    EndpointAddress {
        ip: ip.to_string(),
        hostname: None,
        node_name: None,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoints {
    #[serde(flatten)]
    type_meta: TypeMeta,
    #[serde(default)]
    metadata: ObjectMeta,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    subsets: Vec<EndpointSubset>,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::new()
    }
}

impl Endpoints {
    pub fn new() -> Self {
        Self {
            type_meta: TypeMeta::stable(Kind::Endpoints),
            metadata: ObjectMeta::new(),
            subsets: Vec::new(),
        }
    }

    pub fn subsets(&self) -> &[EndpointSubset] {
        &self.subsets
    }

    pub fn add_subset(&mut self, subset: EndpointSubset) -> ValidationResult {
        subset.validate()?;
        self.subsets.push(subset);
        Ok(())
    }
}

impl_manifest!(Endpoints, {
    fn validate(&self) -> ValidationResult {
        self.metadata.validate(Self::VALIDATION)?;
        self.subsets.iter().try_for_each(EndpointSubset::validate)
    }
});

impl Namespaced for Endpoints {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::manifest::Manifest;

    fn subset() -> EndpointSubset {
        let mut subset = EndpointSubset::new();
        subset.add_address("10.0.0.5").unwrap();
        subset.add_port(EndpointPort::tcp(5432)).unwrap();
        subset
    }

    #[test]
    fn test_subset_setters() {
        let mut s = EndpointSubset::new();
        assert!(s.add_address("db.internal").is_err());
        assert!(s.add_port(EndpointPort::tcp(0)).is_err());
        s.add_not_ready_address("fd00::7").unwrap();
        assert_eq!(s.not_ready_addresses().len(), 1);
        assert!(s.addresses().is_empty());

        let mut ep = Endpoints::new();
        assert!(ep.add_subset(EndpointSubset::new()).is_err());
        ep.add_subset(s).unwrap();
        assert_eq!(ep.subsets().len(), 1);
    }

    #[test]
    fn test_endpoints_document() {
        let mut ep = Endpoints::new();
        ep.set_metadata_name("postgres").unwrap();
        ep.add_subset(subset()).unwrap();
        let yaml = serde_yaml::to_string(&ep).unwrap();
        assert_eq!(
            yaml,
            "apiVersion: v1\nkind: Endpoints\nmetadata:\n  name: postgres\nsubsets:\n- addresses:\n  - ip: 10.0.0.5\n  ports:\n  - port: 5432\n    protocol: TCP\n"
        );
        ep.validate().unwrap();
    }

    #[test]
    fn test_parsed_subsets_rechecked() {
        let yaml = "apiVersion: v1\nkind: Endpoints\nmetadata:\n  name: postgres\nsubsets:\n- addresses:\n  - ip: 10.0.0.5\n  ports:\n  - port: 5432\n";
        let ep: Endpoints = serde_yaml::from_str(yaml).unwrap();
        ep.validate().unwrap();
        assert_eq!(ep.subsets()[0].ports()[0].protocol, Protocol::Tcp);

        for (from, to) in [("ip: 10.0.0.5", "ip: postgres"), ("port: 5432", "port: 70000")] {
            let ep: Endpoints = serde_yaml::from_str(&yaml.replace(from, to)).unwrap();
            assert!(ep.validate().is_err(), "{to}");
        }
    }
}
