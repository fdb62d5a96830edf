// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use crate::domain::error::ValidationResult;
use crate::domain::kind::{Kind, TypeMeta};
use crate::domain::manifest::Namespaced;
use crate::domain::metadata::ObjectMeta;
use crate::domain::primitives::{require_non_empty, LocalObjectReference};
use serde::{Deserialize, Serialize};

/// Identity for processes running in pods, plus the secrets it may mount
/// and pull images with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceAccount {
    #[serde(flatten)]
    type_meta: TypeMeta,
    #[serde(default)]
    metadata: ObjectMeta,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    secrets: Vec<LocalObjectReference>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    image_pull_secrets: Vec<LocalObjectReference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    automount_service_account_token: Option<bool>,
}

impl Default for ServiceAccount {
    fn default() -> Self {
        Self::new()
    }
}

impl ServiceAccount {
    pub fn new() -> Self {
        Self {
            type_meta: TypeMeta::stable(Kind::ServiceAccount),
            metadata: ObjectMeta::new(),
            secrets: Vec::new(),
            image_pull_secrets: Vec::new(),
            automount_service_account_token: None,
        }
    }

    pub fn secrets(&self) -> &[LocalObjectReference] {
        &self.secrets
    }

    pub fn image_pull_secrets(&self) -> &[LocalObjectReference] {
        &self.image_pull_secrets
    }

    pub fn automount_service_account_token(&self) -> Option<bool> {
        self.automount_service_account_token
    }

    pub fn add_secret(&mut self, name: &str) -> ValidationResult {
        require_non_empty("secrets name", name)?;
        self.secrets.push(LocalObjectReference {
            name: name.to_string(),
        });
        Ok(())
    }

    pub fn add_image_pull_secret(&mut self, name: &str) -> ValidationResult {
        require_non_empty("imagePullSecrets name", name)?;
        self.image_pull_secrets.push(LocalObjectReference {
            name: name.to_string(),
        });
        Ok(())
    }

    pub fn set_automount_service_account_token(&mut self, automount: bool) {
        self.automount_service_account_token = Some(automount);
    }
}

impl_manifest!(ServiceAccount, {
    fn validate(&self) -> ValidationResult {
        self.metadata.validate(Self::VALIDATION)?;
        for secret in &self.secrets {
            require_non_empty("secrets name", &secret.name)?;
        }
        for secret in &self.image_pull_secrets {
            require_non_empty("imagePullSecrets name", &secret.name)?;
        }
        Ok(())
    }
});

impl Namespaced for ServiceAccount {}
