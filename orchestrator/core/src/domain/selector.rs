// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Label Selector
//!
//! Exact-match labels plus set-based expressions. All entries are ANDed by the
//! control plane; nothing here evaluates a selector.

use crate::domain::error::{ValidationError, ValidationResult};
use crate::domain::primitives::{parse_enum, require_non_empty, validate_label_map, Labels};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectorOperator {
    In,
    NotIn,
    Exists,
    DoesNotExist,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchExpression {
    pub key: String,
    pub operator: SelectorOperator,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,
}

impl MatchExpression {
    /// `In`/`NotIn` need at least one value; `Exists`/`DoesNotExist` take none.
    fn validate(&self) -> ValidationResult {
        require_non_empty("matchExpressions key", &self.key)?;
        match self.operator {
            SelectorOperator::In | SelectorOperator::NotIn => {
                if self.values.is_empty() {
                    return Err(ValidationError::EmptyCollection {
                        field: "matchExpressions values",
                    });
                }
                if self.values.iter().any(String::is_empty) {
                    return Err(ValidationError::Empty {
                        field: "matchExpressions value",
                    });
                }
            }
            SelectorOperator::Exists | SelectorOperator::DoesNotExist => {
                if !self.values.is_empty() {
                    return Err(ValidationError::invalid(
                        "matchExpressions values",
                        format!("{:?} takes no values", self.operator),
                    ));
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelSelector {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    match_labels: Labels,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    match_expressions: Vec<MatchExpression>,
}

impl LabelSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selector that matches exactly `labels`.
    pub fn matching(labels: &Labels) -> ValidationResult<Self> {
        let mut selector = Self::new();
        selector.set_match_labels(labels)?;
        Ok(selector)
    }

    pub fn match_labels(&self) -> &Labels {
        &self.match_labels
    }

    pub fn match_expressions(&self) -> &[MatchExpression] {
        &self.match_expressions
    }

    pub fn is_empty(&self) -> bool {
        self.match_labels.is_empty() && self.match_expressions.is_empty()
    }

    pub fn add_match_label(&mut self, key: &str, value: &str) -> ValidationResult {
        require_non_empty("matchLabels key", key)?;
        require_non_empty("matchLabels value", value)?;
        self.match_labels.insert(key.to_string(), value.to_string());
        Ok(())
    }

    pub fn set_match_labels(&mut self, labels: &Labels) -> ValidationResult {
        validate_label_map("matchLabels", labels)?;
        self.match_labels
            .extend(labels.iter().map(|(k, v)| (k.clone(), v.clone())));
        Ok(())
    }

    /// Appends an expression after checking it against its operator.
    pub fn add_match_expression(
        &mut self,
        key: &str,
        operator: &str,
        values: &[&str],
    ) -> ValidationResult {
        let operator: SelectorOperator = parse_enum("matchExpressions operator", operator)?;
        self.push_expression(MatchExpression {
            key: key.to_string(),
            operator,
            values: values.iter().map(|v| v.to_string()).collect(),
        })
    }

    pub fn push_expression(&mut self, expression: MatchExpression) -> ValidationResult {
        expression.validate()?;
        self.match_expressions.push(expression);
        Ok(())
    }

    pub(crate) fn validate(&self) -> ValidationResult {
        if !self.match_labels.is_empty() {
            validate_label_map("matchLabels", &self.match_labels)?;
        }
        self.match_expressions
            .iter()
            .try_for_each(MatchExpression::validate)
    }
}
