// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use crate::domain::container::validate_port_number;
use crate::domain::error::{ValidationError, ValidationResult};
use crate::domain::kind::{Kind, TypeMeta};
use crate::domain::manifest::Namespaced;
use crate::domain::metadata::ObjectMeta;
use crate::domain::primitives::require_non_empty;
use serde::{Deserialize, Serialize};

pub const ANNOTATION_INGRESS_CLASS: &str = "kubernetes.io/ingress.class";
pub const ANNOTATION_WHITELIST_X_FORWARDED_FOR: &str =
    "ingress.kubernetes.io/whitelist-x-forwarded-for";
pub const ANNOTATION_WHITELIST_SOURCE_RANGE: &str =
    "traefik.ingress.kubernetes.io/whitelist-source-range";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PathType {
    Exact,
    Prefix,
    #[default]
    ImplementationSpecific,
}

/// Backend port, by number or by the service port's name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceBackendPort {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngressServiceBackend {
    pub name: String,
    pub port: ServiceBackendPort,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngressBackend {
    pub service: IngressServiceBackend,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpIngressPath {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default)]
    pub path_type: PathType,
    pub backend: IngressBackend,
}

impl HttpIngressPath {
    /// Routes `path` (or the whole host, for `None`) to a numbered service port.
    pub fn new(path: Option<&str>, service_name: &str, port: i32) -> Self {
        Self {
            path: path.map(str::to_string),
            path_type: PathType::default(),
            backend: IngressBackend {
                service: IngressServiceBackend {
                    name: service_name.to_string(),
                    port: ServiceBackendPort {
                        number: Some(port),
                        name: None,
                    },
                },
            },
        }
    }

    fn validate(&self) -> ValidationResult {
        let service = &self.backend.service;
        require_non_empty("backend.service.name", &service.name)?;
        match (&service.port.number, &service.port.name) {
            (Some(n), None) => validate_port_number("backend.service.port", *n),
            (None, Some(name)) => require_non_empty("backend.service.port", name),
            _ => Err(ValidationError::invalid(
                "backend.service.port",
                "exactly one of number or name is required",
            )),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpIngressRuleValue {
    pub paths: Vec<HttpIngressPath>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngressRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(default)]
    pub http: HttpIngressRuleValue,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngressTls {
    pub hosts: Vec<String>,
    pub secret_name: String,
}

impl IngressTls {
    fn validate(&self) -> ValidationResult {
        if self.hosts.is_empty() {
            return Err(ValidationError::EmptyCollection { field: "tls.hosts" });
        }
        if self.hosts.iter().any(String::is_empty) {
            return Err(ValidationError::Empty { field: "tls.hosts" });
        }
        require_non_empty("tls.secretName", &self.secret_name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngressSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ingress_class_name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    tls: Vec<IngressTls>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    rules: Vec<IngressRule>,
}

/// HTTP routing from hosts and paths to services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingress {
    #[serde(flatten)]
    type_meta: TypeMeta,
    #[serde(default)]
    metadata: ObjectMeta,
    #[serde(default)]
    spec: IngressSpec,
}

impl Default for Ingress {
    fn default() -> Self {
        Self::new()
    }
}

impl Ingress {
    pub fn new() -> Self {
        Self {
            type_meta: TypeMeta::stable(Kind::Ingress),
            metadata: ObjectMeta::new(),
            spec: IngressSpec::default(),
        }
    }

    pub fn rules(&self) -> &[IngressRule] {
        &self.spec.rules
    }

    pub fn tls(&self) -> &[IngressTls] {
        &self.spec.tls
    }

    /// Appends one rule for `host`. An empty host matches every host; an
    /// empty path list adds nothing.
    pub fn set_rules(&mut self, host: &str, paths: Vec<HttpIngressPath>) -> ValidationResult {
        if paths.is_empty() {
            return Ok(());
        }
        for path in &paths {
            path.validate()?;
        }
        self.spec.rules.push(IngressRule {
            host: (!host.is_empty()).then(|| host.to_string()),
            http: HttpIngressRuleValue { paths },
        });
        Ok(())
    }

    pub fn set_tls(&mut self, hosts: &[&str], secret_name: &str) -> ValidationResult {
        let tls = IngressTls {
            hosts: hosts.iter().map(|h| h.to_string()).collect(),
            secret_name: secret_name.to_string(),
        };
        tls.validate()?;
        self.spec.tls.push(tls);
        Ok(())
    }

    pub fn set_ingress_class_name(&mut self, name: &str) -> ValidationResult {
        require_non_empty("spec.ingressClassName", name)?;
        self.spec.ingress_class_name = Some(name.to_string());
        Ok(())
    }
}

impl_manifest!(Ingress, {
    fn validate(&self) -> ValidationResult {
        self.metadata.validate(Self::VALIDATION)?;
        let spec = &self.spec;
        if let Some(name) = &spec.ingress_class_name {
            require_non_empty("spec.ingressClassName", name)?;
        }
        for tls in &spec.tls {
            tls.validate()?;
        }
        for rule in &spec.rules {
            if rule.http.paths.is_empty() {
                return Err(ValidationError::EmptyCollection {
                    field: "rules.http.paths",
                });
            }
            for path in &rule.http.paths {
                path.validate()?;
            }
        }
        Ok(())
    }
});

impl Namespaced for Ingress {}
