// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Manifest Encoder
//!
//! Turns built manifests into the YAML documents a control plane accepts.
//!
//! # Architecture
//!
//! - **Layer:** Infrastructure
//! - **Purpose:** Domain objects → YAML / JSON bytes
//!
//! The encoder is a structural traversal: field names, omission of empty
//! fields and enum shapes all come from the serde attributes on the domain
//! types. Nothing is re-validated here.
//!
//! ```yaml
//! apiVersion: v1
//! kind: Pod
//! metadata:
//!   name: web
//! spec:
//!   containers:
//!   - name: nginx
//!     image: nginx:1.25
//! ```

use crate::domain::config::EncoderConfig;
use crate::domain::error::EncodingError;
use crate::domain::manifest::AnyManifest;
use serde::Serialize;

const DOCUMENT_SEPARATOR: &str = "---\n";

#[derive(Debug, Clone, Default)]
pub struct ManifestEncoder {
    config: EncoderConfig,
}

impl ManifestEncoder {
    pub fn new(config: EncoderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    /// Encode one manifest as a YAML document.
    pub fn encode<T>(&self, manifest: &T) -> Result<Vec<u8>, EncodingError>
    where
        T: Serialize + ?Sized,
    {
        Ok(self.encode_to_string(manifest)?.into_bytes())
    }

    pub fn encode_to_string<T>(&self, manifest: &T) -> Result<String, EncodingError>
    where
        T: Serialize + ?Sized,
    {
        let body = serde_yaml::to_string(manifest)?;
        tracing::debug!(bytes = body.len(), "Encoded manifest document");
        if self.config.explicit_document_start {
            return Ok(format!("{DOCUMENT_SEPARATOR}{body}"));
        }
        Ok(body)
    }

    /// Encode a batch as one multi-document YAML stream, in input order.
    pub fn encode_all(&self, manifests: &[AnyManifest]) -> Result<Vec<u8>, EncodingError> {
        let mut out = String::new();
        for (index, manifest) in manifests.iter().enumerate() {
            if index > 0 || self.config.explicit_document_start {
                out.push_str(DOCUMENT_SEPARATOR);
            }
            out.push_str(&serde_yaml::to_string(manifest)?);
        }
        tracing::debug!(documents = manifests.len(), bytes = out.len(), "Encoded manifest stream");
        Ok(out.into_bytes())
    }

    /// Pretty-printed JSON, for tooling that does not read YAML.
    pub fn encode_json<T>(&self, manifest: &T) -> Result<Vec<u8>, EncodingError>
    where
        T: Serialize + ?Sized,
    {
        let mut bytes = serde_json::to_vec_pretty(manifest)?;
        bytes.push(b'\n');
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::auxiliary::{ConfigMap, Namespace};
    use crate::domain::container::Container;
    use crate::domain::manifest::{Manifest, Workload};
    use crate::domain::primitives::KeyValue;
    use crate::domain::workload::Pod;

    fn config_map() -> ConfigMap {
        let mut cm = ConfigMap::new();
        cm.set_metadata_name("settings").unwrap();
        cm.set_data(&[KeyValue::new("mode", "fast")]).unwrap();
        cm
    }

    #[test]
    fn test_encode_single_document() {
        let encoder = ManifestEncoder::default();
        let yaml = String::from_utf8(encoder.encode(&config_map()).unwrap()).unwrap();
        assert_eq!(
            yaml,
            "apiVersion: v1\nkind: ConfigMap\nmetadata:\n  name: settings\ndata:\n  mode: fast\n"
        );
    }

    #[test]
    fn test_explicit_document_start() {
        let encoder = ManifestEncoder::new(EncoderConfig {
            explicit_document_start: true,
        });
        let yaml = encoder.encode_to_string(&Namespace::new("apps")).unwrap();
        assert!(yaml.starts_with("---\napiVersion: v1\nkind: Namespace\n"), "{yaml}");
    }

    #[test]
    fn test_encode_all_separates_documents() {
        let mut pod = Pod::new("web");
        pod.add_container(Container::new("nginx", "nginx:1.25")).unwrap();
        let batch: Vec<AnyManifest> = vec![Namespace::new("apps").into(), pod.into()];

        let yaml = String::from_utf8(ManifestEncoder::default().encode_all(&batch).unwrap()).unwrap();
        assert!(!yaml.starts_with("---"));
        assert_eq!(yaml.matches("---\n").count(), 1);
        let ns_at = yaml.find("kind: Namespace").unwrap();
        let pod_at = yaml.find("kind: Pod").unwrap();
        assert!(ns_at < pod_at);
    }

    #[test]
    fn test_encode_all_empty_batch() {
        assert!(ManifestEncoder::default().encode_all(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_encode_json() {
        let json = ManifestEncoder::default().encode_json(&config_map()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&json).unwrap();
        assert_eq!(value["kind"], "ConfigMap");
        assert_eq!(value["apiVersion"], "v1");
        assert_eq!(value["data"]["mode"], "fast");
    }

    #[test]
    fn test_to_yaml_matches_default_encoder() {
        let cm = config_map();
        let via_trait = cm.to_yaml().unwrap();
        let via_encoder = ManifestEncoder::default().encode_to_string(&cm).unwrap();
        assert_eq!(via_trait, via_encoder);
        assert_eq!(cm.kind().as_str(), "ConfigMap");
    }
}
