// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Manifest Errors
//!
//! Error taxonomy shared by every builder in the object model.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Typed failures for setters, Secret decoding and encoding

use thiserror::Error;

/// A setter input violated a documented precondition.
///
/// Returned synchronously; the receiving object is left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    #[error("{field} must be greater than zero, got {value}")]
    NotPositive { field: &'static str, value: i64 },

    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: i64 },

    #[error("{field} requires at least one entry")]
    EmptyCollection { field: &'static str },

    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error("key '{key}' already exists")]
    DuplicateKey { key: String },

    #[error("volume '{volume}' already has a source")]
    SourceAlreadySet { volume: String },
}

impl ValidationError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// A stored Secret value could not be turned back into text.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("value for key '{key}' is not valid base64: {source}")]
    Base64 {
        key: String,
        #[source]
        source: base64::DecodeError,
    },

    #[error("value for key '{key}' is not valid UTF-8: {source}")]
    Utf8 {
        key: String,
        #[source]
        source: std::string::FromUtf8Error,
    },
}

/// The encoder could not traverse a resource graph.
#[derive(Debug, Error)]
pub enum EncodingError {
    #[error("failed to encode manifest as YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("failed to encode manifest as JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Umbrella error for callers that mix building, parsing and encoding.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Encoding(#[from] EncodingError),

    #[error("failed to parse manifest document {index}: {source}")]
    Parse {
        index: usize,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("manifest document {index} has no kind")]
    MissingKind { index: usize },

    #[error("unsupported manifest kind: {0}")]
    UnknownKind(String),

    #[error("manifest document {index} ({kind}) has unknown fields: {}", fields.join(", "))]
    UnknownFields {
        index: usize,
        kind: String,
        fields: Vec<String>,
    },

    #[error("{kind} '{name}' is not ready for submission: {reason}")]
    Submission {
        kind: String,
        name: String,
        reason: String,
    },
}

pub type ValidationResult<T = ()> = Result<T, ValidationError>;
