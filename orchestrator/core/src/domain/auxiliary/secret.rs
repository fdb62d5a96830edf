// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Secret
//!
//! Values passed to [`Secret::set_data`] are stored base64-encoded with the
//! standard alphabet, matching the `data` field of the API object.
//! [`Secret::get_data`] reverses the encoding.

use crate::domain::error::{DecodeError, ValidationError, ValidationResult};
use crate::domain::kind::{Kind, TypeMeta};
use crate::domain::manifest::Namespaced;
use crate::domain::metadata::ObjectMeta;
use crate::domain::primitives::{
    require_non_empty, validate_label_map, validate_pairs, KeyValue,
};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const SECRET_TYPE_OPAQUE: &str = "Opaque";
pub const SECRET_TYPE_TLS: &str = "kubernetes.io/tls";
pub const SECRET_TYPE_DOCKER_CONFIG_JSON: &str = "kubernetes.io/dockerconfigjson";
pub const SECRET_TYPE_BASIC_AUTH: &str = "kubernetes.io/basic-auth";

fn default_type() -> String {
    SECRET_TYPE_OPAQUE.to_string()
}

/// Encodes a plaintext value the way it is stored in `data`.
pub fn encode_value(value: &str) -> String {
    STANDARD.encode(value.as_bytes())
}

/// Decodes a stored `data` value back to text.
pub fn decode_value(key: &str, encoded: &str) -> Result<String, DecodeError> {
    let bytes = STANDARD
        .decode(encoded.as_bytes())
        .map_err(|source| DecodeError::Base64 {
            key: key.to_string(),
            source,
        })?;
    String::from_utf8(bytes).map_err(|source| DecodeError::Utf8 {
        key: key.to_string(),
        source,
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Secret {
    #[serde(flatten)]
    type_meta: TypeMeta,
    #[serde(default)]
    metadata: ObjectMeta,
    #[serde(rename = "type", default = "default_type")]
    secret_type: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    data: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    string_data: BTreeMap<String, String>,
}

impl Default for Secret {
    fn default() -> Self {
        Self::new()
    }
}

impl Secret {
    pub fn new() -> Self {
        Self {
            type_meta: TypeMeta::stable(Kind::Secret),
            metadata: ObjectMeta::new(),
            secret_type: default_type(),
            data: BTreeMap::new(),
            string_data: BTreeMap::new(),
        }
    }

    pub fn secret_type(&self) -> &str {
        &self.secret_type
    }

    pub fn set_type(&mut self, secret_type: &str) -> ValidationResult {
        require_non_empty("type", secret_type)?;
        self.secret_type = secret_type.to_string();
        Ok(())
    }

    /// Encodes and stores every pair, or none if any pair is empty.
    pub fn set_data(&mut self, data: &[KeyValue]) -> ValidationResult {
        validate_pairs("data", data)?;
        self.data
            .extend(data.iter().map(|kv| (kv.key.clone(), encode_value(&kv.val))));
        Ok(())
    }

    /// Write-only plaintext values the API server merges into `data`.
    pub fn set_string_data(&mut self, data: &[KeyValue]) -> ValidationResult {
        validate_pairs("stringData", data)?;
        self.string_data
            .extend(data.iter().map(|kv| (kv.key.clone(), kv.val.clone())));
        Ok(())
    }

    /// Decoded view of `data`.
    pub fn get_data(&self) -> Result<BTreeMap<String, String>, DecodeError> {
        self.data
            .iter()
            .map(|(key, encoded)| Ok((key.clone(), decode_value(key, encoded)?)))
            .collect()
    }

    /// The stored, still-encoded `data` map.
    pub fn raw_data(&self) -> &BTreeMap<String, String> {
        &self.data
    }

    pub fn string_data(&self) -> &BTreeMap<String, String> {
        &self.string_data
    }
}

impl_manifest!(Secret, {
    /// Stored `data` values must be base64; their decoded form may be binary.
    fn validate(&self) -> ValidationResult {
        self.metadata.validate(Self::VALIDATION)?;
        require_non_empty("type", &self.secret_type)?;
        if !self.data.is_empty() {
            validate_label_map("data", &self.data)?;
        }
        if !self.string_data.is_empty() {
            validate_label_map("stringData", &self.string_data)?;
        }
        for (key, encoded) in &self.data {
            STANDARD.decode(encoded.as_bytes()).map_err(|e| {
                ValidationError::invalid("data", format!("value for key '{key}': {e}"))
            })?;
        }
        Ok(())
    }
});

impl Namespaced for Secret {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::manifest::Manifest;

    // ── Codec ──

    #[test]
    fn test_codec_round_trip() {
        for value in ["", "password", "pässwörd", "日本語", "line\nbreak", "\u{1F512}"] {
            assert_eq!(decode_value("k", &encode_value(value)).unwrap(), value);
        }
    }

    #[test]
    fn test_codec_uses_standard_alphabet() {
        assert_eq!(encode_value("admin"), "YWRtaW4=");
        assert_eq!(encode_value("??>"), "Pz8+");
    }

    #[test]
    fn test_decode_failures() {
        assert!(matches!(
            decode_value("k", "not base64!"),
            Err(DecodeError::Base64 { .. })
        ));
        // 0xff 0xfe
        assert!(matches!(
            decode_value("k", "//4="),
            Err(DecodeError::Utf8 { .. })
        ));
    }

    // ── Secret ──

    #[test]
    fn test_set_and_get_data() {
        let mut secret = Secret::new();
        secret
            .set_data(&[KeyValue::new("user", "admin"), KeyValue::new("pass", "s3cr3t")])
            .unwrap();
        assert_eq!(secret.raw_data()["user"], "YWRtaW4=");
        let decoded = secret.get_data().unwrap();
        assert_eq!(decoded["user"], "admin");
        assert_eq!(decoded["pass"], "s3cr3t");
    }

    #[test]
    fn test_set_data_is_all_or_nothing() {
        let mut secret = Secret::new();
        assert!(secret
            .set_data(&[KeyValue::new("a", "1"), KeyValue::new("b", "")])
            .is_err());
        assert!(secret.raw_data().is_empty());
    }

    #[test]
    fn test_tampered_data_fails_to_decode() {
        let yaml = "apiVersion: v1\nkind: Secret\nmetadata:\n  name: s\ndata:\n  key: '%%%'\n";
        let secret: Secret = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(secret.secret_type(), SECRET_TYPE_OPAQUE);
        let err = secret.get_data().unwrap_err();
        assert!(err.to_string().contains("'key'"));
    }

    #[test]
    fn test_type_and_string_data() {
        let mut secret = Secret::new();
        assert!(secret.set_type("").is_err());
        secret.set_type(SECRET_TYPE_TLS).unwrap();
        secret
            .set_string_data(&[KeyValue::new("config.yaml", "debug: true")])
            .unwrap();
        let yaml = serde_yaml::to_string(&secret).unwrap();
        assert!(yaml.contains("type: kubernetes.io/tls"), "{yaml}");
        assert!(yaml.contains("stringData:"));
        assert!(!yaml.contains("\ndata:"));
    }

    // ── Validation ──

    #[test]
    fn test_parsed_data_must_be_base64() {
        let yaml = "apiVersion: v1\nkind: Secret\nmetadata:\n  name: db\ntype: Opaque\ndata:\n  password: cGFzc3dvcmQ=\n";
        let secret: Secret = serde_yaml::from_str(yaml).unwrap();
        secret.validate().unwrap();
        let secret: Secret =
            serde_yaml::from_str(&yaml.replace("cGFzc3dvcmQ=", "not base64!")).unwrap();
        assert!(secret.validate().is_err());
    }
}
