// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Manifest YAML Parser
//!
//! Reads multi-document YAML streams back into typed manifests so existing
//! files can be checked and re-encoded canonically.
//!
//! # Architecture
//!
//! - **Layer:** Infrastructure
//! - **Purpose:** Parse external YAML → Domain objects
//! - **Anti-Corruption:** `kind` selects the domain type; unknown kinds are rejected
//!   and so are fields the domain type has no slot for
//!
//! # Stream Format
//!
//! ```yaml
//! apiVersion: v1
//! kind: Namespace
//! metadata:
//!   name: apps
//! ---
//! apiVersion: v1
//! kind: ConfigMap
//! metadata:
//!   name: settings
//! data:
//!   mode: fast
//! ```

use crate::domain::error::ManifestError;
use crate::domain::kind::Kind;
use crate::domain::manifest::AnyManifest;
use anyhow::{Context, Result};
use serde::Deserialize;
use serde_yaml::Value;
use std::path::Path;

// ============================================================================
// Parser API
// ============================================================================

pub struct ManifestParser;

impl ManifestParser {
    /// Parse every document in a YAML stream. Empty documents are skipped.
    ///
    /// Document indices in errors are zero-based positions in the stream.
    pub fn parse_str(yaml: &str) -> Result<Vec<AnyManifest>, ManifestError> {
        let mut manifests = Vec::new();
        for (index, document) in serde_yaml::Deserializer::from_str(yaml).enumerate() {
            let value = serde_yaml::Value::deserialize(document)
                .map_err(|source| ManifestError::Parse { index, source })?;
            if value.is_null() {
                continue;
            }

            let kind_name = value
                .get("kind")
                .and_then(serde_yaml::Value::as_str)
                .ok_or(ManifestError::MissingKind { index })?;
            let kind: Kind = kind_name.parse().map_err(|_| {
                tracing::warn!(index, kind = kind_name, "Unsupported manifest kind");
                ManifestError::UnknownKind(kind_name.to_string())
            })?;

            let manifest = AnyManifest::from_value(kind, value.clone())
                .map_err(|source| ManifestError::Parse { index, source })?;
            let encoded = serde_yaml::to_value(&manifest)
                .map_err(|source| ManifestError::Parse { index, source })?;
            let mut fields = Vec::new();
            dropped_fields(&value, &encoded, "", &mut fields);
            if !fields.is_empty() {
                tracing::warn!(index, kind = %kind, ?fields, "Manifest has unknown fields");
                return Err(ManifestError::UnknownFields {
                    index,
                    kind: kind.to_string(),
                    fields,
                });
            }
            tracing::debug!(index, kind = %kind, name = manifest.name(), "Parsed manifest document");
            manifests.push(manifest);
        }
        Ok(manifests)
    }

    /// Parse a manifest file from disk
    pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Vec<AnyManifest>> {
        let yaml = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read manifest file: {:?}", path.as_ref()))?;

        Self::parse_str(&yaml)
            .with_context(|| format!("Failed to parse manifest file: {:?}", path.as_ref()))
    }

    /// Checks a manifest is complete enough to hand to a control plane:
    /// named, scoped correctly, and passing the same rules its setters apply.
    pub fn check_submission(manifest: &AnyManifest) -> Result<(), ManifestError> {
        let kind = manifest.kind();
        let name = manifest.name();
        let reject = |reason: &str| ManifestError::Submission {
            kind: kind.to_string(),
            name: name.to_string(),
            reason: reason.to_string(),
        };

        if name.is_empty() {
            return Err(reject("metadata.name is empty"));
        }
        if !kind.is_namespaced() && manifest.metadata().namespace().is_some() {
            return Err(reject("cluster-scoped kinds cannot set metadata.namespace"));
        }
        manifest.validate().map_err(|err| reject(&err.to_string()))
    }

    /// Fills `namespace` into every namespaced manifest that has none.
    /// Returns how many manifests changed.
    pub fn apply_default_namespace(manifests: &mut [AnyManifest], namespace: &str) -> usize {
        manifests
            .iter_mut()
            .map(|m| m.apply_default_namespace(namespace))
            .filter(|changed| *changed)
            .count()
    }
}

// ============================================================================
// Unknown Field Detection
// ============================================================================

/// Collects dotted paths present in `input` but lost after decoding and
/// re-encoding. Values that encode to nothing anyway (null, false, 0, "",
/// empty collections) are not reported.
fn dropped_fields(input: &Value, output: &Value, path: &str, found: &mut Vec<String>) {
    match (input, output) {
        (Value::Mapping(input), Value::Mapping(output)) => {
            for (key, value) in input {
                let name = match key.as_str() {
                    Some(name) => name.to_string(),
                    None => format!("{key:?}"),
                };
                let child = if path.is_empty() { name } else { format!("{path}.{name}") };
                match output.get(key) {
                    Some(kept) => dropped_fields(value, kept, &child, found),
                    None if is_blank(value) => {}
                    None => found.push(child),
                }
            }
        }
        (Value::Sequence(input), Value::Sequence(output)) => {
            if input.len() != output.len() {
                found.push(format!("{path}[{}..]", output.len().min(input.len())));
                return;
            }
            for (i, (value, kept)) in input.iter().zip(output).enumerate() {
                dropped_fields(value, kept, &format!("{path}[{i}]"), found);
            }
        }
        (Value::Tagged(input), Value::Tagged(output)) => {
            dropped_fields(&input.value, &output.value, path, found)
        }
        _ => {}
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Sequence(items) => items.is_empty(),
        Value::Mapping(map) => map.values().all(is_blank),
        Value::Tagged(tagged) => is_blank(&tagged.value),
    }
}

// ============================================================================
// Tests
// ============================================================================
