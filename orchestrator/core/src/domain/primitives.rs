// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Primitive Value Types
//!
//! Scalar values shared by every resource: resource quantities, label maps,
//! ordered key/value pairs and int-or-string ports.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Leaf value objects with their own validation rules

use crate::domain::error::{ValidationError, ValidationResult};
use regex::Regex;
use serde::de::{DeserializeOwned, IntoDeserializer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;
use std::sync::LazyLock;

/// Label and annotation maps. Ordered so encoded output is canonical.
pub type Labels = BTreeMap<String, String>;

static QUANTITY_PATTERN: LazyLock<Result<Regex, regex::Error>> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(\d+(\.\d*)?|\.\d+)([eE][+-]?\d+|[kMGTPE]i|[mkMGTPE])?$")
});

/// A Kubernetes resource quantity such as `500m`, `2Gi` or `1e3`.
///
/// Hand-written manifests often give whole quantities as bare numbers
/// (`cpu: 1`, `pods: 10`); those are accepted and kept in their text form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub struct Quantity(String);

impl Quantity {
    pub fn parse(value: &str) -> ValidationResult<Self> {
        let value = value.trim();
        if value.is_empty() {
            return Err(ValidationError::Empty { field: "quantity" });
        }
        let pattern = QUANTITY_PATTERN
            .as_ref()
            .map_err(|e| ValidationError::invalid("quantity", e.to_string()))?;
        if !pattern.is_match(value) {
            return Err(ValidationError::invalid(
                "quantity",
                format!("'{value}' is not a valid resource quantity"),
            ));
        }
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Quantity {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl<'de> Deserialize<'de> for Quantity {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Text(String),
            Int(i64),
            Float(f64),
        }

        let text = match Repr::deserialize(deserializer)? {
            Repr::Text(s) => s,
            Repr::Int(n) => n.to_string(),
            Repr::Float(f) => f.to_string(),
        };
        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}

impl From<Quantity> for String {
    fn from(q: Quantity) -> Self {
        q.0
    }
}

impl FromStr for Quantity {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Builds a [`Labels`] map from borrowed pairs.
pub fn labels_from<'a, I>(pairs: I) -> Labels
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// One `{key, val}` entry handed to the `set_data` family of setters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValue {
    pub key: String,
    pub val: String,
}

impl KeyValue {
    pub fn new(key: impl Into<String>, val: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            val: val.into(),
        }
    }
}

/// Port reference that may be a number or a named container port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IntOrString {
    Int(i32),
    String(String),
}

impl IntOrString {
    /// `true` for `0` and the empty string.
    pub fn is_zero(&self) -> bool {
        match self {
            IntOrString::Int(n) => *n == 0,
            IntOrString::String(s) => s.is_empty(),
        }
    }
}

impl From<i32> for IntOrString {
    fn from(n: i32) -> Self {
        IntOrString::Int(n)
    }
}

impl From<&str> for IntOrString {
    fn from(s: &str) -> Self {
        IntOrString::String(s.to_string())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Protocol {
    #[default]
    Tcp,
    Udp,
    Sctp,
}

/// Reference to an object in the same namespace by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalObjectReference {
    pub name: String,
}

/// Serde adapter writing an `Option` of a one-of enum as a single-key map
/// (`secretKeyRef: {...}`) rather than a YAML-tagged value.
pub(crate) mod one_of {
    use serde::de::DeserializeOwned;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize)]
    struct Ref<'a, T> {
        #[serde(flatten)]
        inner: &'a T,
    }

    #[derive(Deserialize)]
    struct Owned<T> {
        #[serde(flatten)]
        inner: T,
    }

    pub fn serialize<S, T>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: Serialize,
    {
        value.as_ref().map(|inner| Ref { inner }).serialize(serializer)
    }

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        Ok(Option::<Owned<T>>::deserialize(deserializer)?.map(|o| o.inner))
    }
}

// ============================================================================
// Shared checks
// ============================================================================

pub(crate) fn require_non_empty(field: &'static str, value: &str) -> ValidationResult {
    if value.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    Ok(())
}

pub(crate) fn require_positive(field: &'static str, value: i64) -> ValidationResult {
    if value <= 0 {
        return Err(ValidationError::NotPositive { field, value });
    }
    Ok(())
}

pub(crate) fn require_non_negative(field: &'static str, value: i64) -> ValidationResult {
    if value < 0 {
        return Err(ValidationError::Negative { field, value });
    }
    Ok(())
}

/// Replica counts are omitted when zero, so only a set, non-positive count
/// is an error.
pub(crate) fn validate_replicas(field: &'static str, replicas: i32) -> ValidationResult {
    if replicas == 0 {
        return Ok(());
    }
    require_positive(field, replicas.into())
}

/// Rejects an empty map and any entry with an empty key or value.
pub(crate) fn validate_label_map(field: &'static str, labels: &Labels) -> ValidationResult {
    if labels.is_empty() {
        return Err(ValidationError::EmptyCollection { field });
    }
    for (key, value) in labels {
        if key.is_empty() {
            return Err(ValidationError::Empty { field: "label key" });
        }
        if value.is_empty() {
            return Err(ValidationError::invalid(
                field,
                format!("value for key '{key}' is empty"),
            ));
        }
    }
    Ok(())
}

/// Same rules as [`validate_label_map`] for ordered `{key, val}` input.
pub(crate) fn validate_pairs(field: &'static str, pairs: &[KeyValue]) -> ValidationResult {
    if pairs.is_empty() {
        return Err(ValidationError::EmptyCollection { field });
    }
    for pair in pairs {
        if pair.key.is_empty() {
            return Err(ValidationError::Empty { field: "data key" });
        }
        if pair.val.is_empty() {
            return Err(ValidationError::invalid(
                field,
                format!("value for key '{}' is empty", pair.key),
            ));
        }
    }
    Ok(())
}

/// Parses a string into one of the unit variants of a serde enum, using the
/// enum's own rename table as the accepted vocabulary.
pub(crate) fn parse_enum<T: DeserializeOwned>(field: &'static str, value: &str) -> ValidationResult<T> {
    require_non_empty(field, value)?;
    T::deserialize(value.into_deserializer())
        .map_err(|e: serde::de::value::Error| ValidationError::invalid(field, e.to_string()))
}

/// Parses `address/prefix` notation for IPv4 or IPv6.
pub(crate) fn validate_cidr(field: &'static str, cidr: &str) -> ValidationResult {
    require_non_empty(field, cidr)?;
    let (addr, prefix) = cidr
        .split_once('/')
        .ok_or_else(|| ValidationError::invalid(field, format!("'{cidr}' has no prefix length")))?;
    let addr: IpAddr = addr
        .parse()
        .map_err(|_| ValidationError::invalid(field, format!("'{cidr}' has an invalid address")))?;
    let max = if addr.is_ipv4() { 32 } else { 128 };
    match prefix.parse::<u8>() {
        Ok(p) if p <= max => Ok(()),
        _ => Err(ValidationError::invalid(
            field,
            format!("'{cidr}' has an invalid prefix length"),
        )),
    }
}

pub(crate) fn is_false(value: &bool) -> bool {
    !*value
}

pub(crate) fn is_zero_i32(value: &i32) -> bool {
    *value == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantity_accepts_common_forms() {
        for ok in ["1", "500m", "0.5", "2Gi", "128Mi", "1e3", "1.5E-2", "10k", "+1", ".5"] {
            assert!(Quantity::parse(ok).is_ok(), "expected {ok} to parse");
        }
    }

    #[test]
    fn test_quantity_pattern_compiled_once() {
        let first = QUANTITY_PATTERN.as_ref().unwrap() as *const Regex;
        for _ in 0..3 {
            Quantity::parse("250m").unwrap();
        }
        assert_eq!(QUANTITY_PATTERN.as_ref().unwrap() as *const Regex, first);
    }

    #[test]
    fn test_quantity_rejects_garbage() {
        assert_eq!(
            Quantity::parse(""),
            Err(ValidationError::Empty { field: "quantity" })
        );
        for bad in ["abc", "1.5XB", "Gi", "1 Gi", "1Kb"] {
            assert!(Quantity::parse(bad).is_err(), "expected {bad} to fail");
        }
    }

    #[test]
    fn test_quantity_serializes_as_plain_string() {
        let q = Quantity::parse("250m").unwrap();
        assert_eq!(serde_yaml::to_string(&q).unwrap().trim(), "250m");
        let back: Quantity = serde_yaml::from_str("1Gi").unwrap();
        assert_eq!(back.as_str(), "1Gi");
        assert!(serde_yaml::from_str::<Quantity>("nonsense").is_err());
        let bare: Quantity = serde_yaml::from_str("10").unwrap();
        assert_eq!(bare.as_str(), "10");
        let half: Quantity = serde_yaml::from_str("0.5").unwrap();
        assert_eq!(half.as_str(), "0.5");
    }

    #[test]
    fn test_label_map_validation() {
        assert!(validate_label_map("labels", &Labels::new()).is_err());
        let mut labels = Labels::new();
        labels.insert("app".into(), "web".into());
        assert!(validate_label_map("labels", &labels).is_ok());
        labels.insert("".into(), "x".into());
        assert!(validate_label_map("labels", &labels).is_err());
    }

    #[test]
    fn test_cidr_validation() {
        assert!(validate_cidr("cidr", "10.0.0.0/8").is_ok());
        assert!(validate_cidr("cidr", "fd00::/64").is_ok());
        assert!(validate_cidr("cidr", "10.0.0.0").is_err());
        assert!(validate_cidr("cidr", "10.0.0.0/33").is_err());
        assert!(validate_cidr("cidr", "host/8").is_err());
        assert!(validate_cidr("cidr", "").is_err());
    }

    #[test]
    fn test_parse_enum_uses_serde_names() {
        let p: Protocol = parse_enum("protocol", "UDP").unwrap();
        assert_eq!(p, Protocol::Udp);
        assert!(parse_enum::<Protocol>("protocol", "udp").is_err());
        assert_eq!(
            parse_enum::<Protocol>("protocol", ""),
            Err(ValidationError::Empty { field: "protocol" })
        );
    }

    #[test]
    fn test_int_or_string_is_zero() {
        assert!(IntOrString::Int(0).is_zero());
        assert!(IntOrString::from("").is_zero());
        assert!(!IntOrString::from("http").is_zero());
        assert!(!IntOrString::Int(8080).is_zero());
    }
}
