// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! CustomResourceDefinition
//!
//! Registers a new resource type under `/apis/<group>/<version>/<plural>`.
//! The object's name is tied to its spec: it must read `<plural>.<group>`.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Cluster-scoped API extension with served/storage versions

use crate::domain::error::{ValidationError, ValidationResult};
use crate::domain::kind::{Kind, TypeMeta};
use crate::domain::metadata::ObjectMeta;
use crate::domain::primitives::{parse_enum, require_non_empty};
use serde::{Deserialize, Serialize};

/// Where instances of the custom resource live.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResourceScope {
    #[default]
    Namespaced,
    Cluster,
}

/// How the resource is addressed on the API path, in manifests and on the
/// command line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomResourceDefinitionNames {
    #[serde(default)]
    pub plural: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub singular: String,
    #[serde(default)]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub short_names: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub list_kind: String,
}

impl CustomResourceDefinitionNames {
    pub fn new(plural: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            plural: plural.into(),
            kind: kind.into(),
            ..Self::default()
        }
    }

    fn validate(&self) -> ValidationResult {
        require_lowercase("names.plural", &self.plural)?;
        require_non_empty("names.kind", &self.kind)?;
        if !self.singular.is_empty() {
            require_lowercase("names.singular", &self.singular)?;
        }
        for short in &self.short_names {
            require_lowercase("names.shortNames", short)?;
        }
        Ok(())
    }
}

fn require_lowercase(field: &'static str, value: &str) -> ValidationResult {
    require_non_empty(field, value)?;
    if value.chars().any(|c| c.is_ascii_uppercase() || c.is_whitespace()) {
        return Err(ValidationError::invalid(
            field,
            format!("'{value}' must be lowercase without spaces"),
        ));
    }
    Ok(())
}

/// OpenAPI v3 schema for one version, kept as written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomResourceValidation {
    #[serde(rename = "openAPIV3Schema")]
    pub open_api_v3_schema: serde_yaml::Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomResourceDefinitionVersion {
    pub name: String,
    #[serde(default)]
    pub served: bool,
    #[serde(default)]
    pub storage: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<CustomResourceValidation>,
}

impl CustomResourceDefinitionVersion {
    pub fn new(name: impl Into<String>, served: bool, storage: bool) -> Self {
        Self {
            name: name.into(),
            served,
            storage,
            schema: None,
        }
    }

    pub fn with_schema(mut self, schema: serde_yaml::Value) -> Self {
        self.schema = Some(CustomResourceValidation {
            open_api_v3_schema: schema,
        });
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomResourceDefinitionSpec {
    #[serde(default)]
    group: String,
    #[serde(default)]
    versions: Vec<CustomResourceDefinitionVersion>,
    #[serde(default)]
    scope: ResourceScope,
    #[serde(default)]
    names: CustomResourceDefinitionNames,
}

impl CustomResourceDefinitionSpec {
    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn versions(&self) -> &[CustomResourceDefinitionVersion] {
        &self.versions
    }

    pub fn scope(&self) -> ResourceScope {
        self.scope
    }

    pub fn names(&self) -> &CustomResourceDefinitionNames {
        &self.names
    }

    fn expected_name(&self) -> Option<String> {
        if self.group.is_empty() || self.names.plural.is_empty() {
            return None;
        }
        Some(format!("{}.{}", self.names.plural, self.group))
    }

    fn validate(&self) -> ValidationResult {
        check_group(&self.group)?;
        self.names.validate()?;
        if self.versions.is_empty() {
            return Err(ValidationError::EmptyCollection { field: "spec.versions" });
        }
        for (i, version) in self.versions.iter().enumerate() {
            require_non_empty("versions.name", &version.name)?;
            if self.versions[..i].iter().any(|v| v.name == version.name) {
                return Err(ValidationError::DuplicateKey {
                    key: version.name.clone(),
                });
            }
        }
        match self.versions.iter().filter(|v| v.storage).count() {
            1 => Ok(()),
            n => Err(ValidationError::invalid(
                "spec.versions",
                format!("exactly one version must be the storage version, found {n}"),
            )),
        }
    }
}

fn check_group(group: &str) -> ValidationResult {
    require_non_empty("spec.group", group)?;
    if !group.contains('.') || group.starts_with('.') || group.ends_with('.') {
        return Err(ValidationError::invalid(
            "spec.group",
            format!("'{group}' must be a dotted domain such as example.com"),
        ));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomResourceDefinition {
    #[serde(flatten)]
    type_meta: TypeMeta,
    #[serde(default)]
    metadata: ObjectMeta,
    #[serde(default)]
    spec: CustomResourceDefinitionSpec,
}

impl Default for CustomResourceDefinition {
    fn default() -> Self {
        Self::new()
    }
}

impl CustomResourceDefinition {
    pub fn new() -> Self {
        Self {
            type_meta: TypeMeta::stable(Kind::CustomResourceDefinition),
            metadata: ObjectMeta::new(),
            spec: CustomResourceDefinitionSpec::default(),
        }
    }

    pub fn spec(&self) -> &CustomResourceDefinitionSpec {
        &self.spec
    }

    pub fn set_group(&mut self, group: &str) -> ValidationResult {
        check_group(group)?;
        self.spec.group = group.to_string();
        Ok(())
    }

    pub fn set_scope(&mut self, scope: &str) -> ValidationResult {
        self.spec.scope = parse_enum("spec.scope", scope)?;
        Ok(())
    }

    pub fn set_names(&mut self, names: CustomResourceDefinitionNames) -> ValidationResult {
        names.validate()?;
        self.spec.names = names;
        Ok(())
    }

    /// Rejects a name already listed and a second storage version.
    pub fn add_version(&mut self, version: CustomResourceDefinitionVersion) -> ValidationResult {
        require_non_empty("versions.name", &version.name)?;
        if self.spec.versions.iter().any(|v| v.name == version.name) {
            return Err(ValidationError::DuplicateKey { key: version.name });
        }
        if version.storage && self.spec.versions.iter().any(|v| v.storage) {
            return Err(ValidationError::invalid(
                "spec.versions",
                format!("'{}' cannot be a second storage version", version.name),
            ));
        }
        self.spec.versions.push(version);
        Ok(())
    }
}

impl_manifest!(CustomResourceDefinition, {
    /// The name must be `<plural>.<group>`. Before group and plural are set
    /// only the dotted shape is checked.
    fn set_metadata_name(&mut self, name: &str) -> ValidationResult {
        require_non_empty("metadata.name", name)?;
        match self.spec.expected_name() {
            Some(expected) if expected != name => {
                return Err(ValidationError::invalid(
                    "metadata.name",
                    format!("'{name}' must be '{expected}'"),
                ));
            }
            Some(_) => {}
            None if !name.contains('.') => {
                return Err(ValidationError::invalid(
                    "metadata.name",
                    format!("'{name}' must have the form <plural>.<group>"),
                ));
            }
            None => {}
        }
        self.metadata.set_name_with(name, Self::VALIDATION)
    }

    fn validate(&self) -> ValidationResult {
        self.metadata.validate(Self::VALIDATION)?;
        self.spec.validate()?;
        match self.spec.expected_name() {
            Some(expected) if expected != self.metadata.name() => Err(ValidationError::invalid(
                "metadata.name",
                format!("'{}' must be '{expected}'", self.metadata.name()),
            )),
            _ => Ok(()),
        }
    }
});
