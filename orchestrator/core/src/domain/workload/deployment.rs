// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use crate::domain::error::{ValidationError, ValidationResult};
use crate::domain::kind::{Kind, TypeMeta};
use crate::domain::manifest::{validate_controller, Controller, Namespaced, Workload};
use crate::domain::metadata::ObjectMeta;
use crate::domain::pod_template::{PodSpec, PodTemplateSpec};
use crate::domain::primitives::{
    is_zero_i32, require_non_negative, require_positive, validate_replicas, IntOrString,
};
use crate::domain::selector::LabelSelector;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollingUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_surge: Option<IntOrString>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_unavailable: Option<IntOrString>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DeploymentStrategy {
    RollingUpdate {
        #[serde(
            rename = "rollingUpdate",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        rolling_update: Option<RollingUpdate>,
    },
    Recreate,
}

impl DeploymentStrategy {
    fn validate(&self) -> ValidationResult {
        if let DeploymentStrategy::RollingUpdate {
            rolling_update: Some(update),
        } = self
        {
            let zero = |v: &Option<IntOrString>| v.as_ref().is_none_or(IntOrString::is_zero);
            if zero(&update.max_surge) && zero(&update.max_unavailable) {
                return Err(ValidationError::invalid(
                    "spec.strategy.rollingUpdate",
                    "maxSurge and maxUnavailable cannot both be zero",
                ));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentSpec {
    #[serde(default, skip_serializing_if = "is_zero_i32")]
    replicas: i32,
    #[serde(default, skip_serializing_if = "LabelSelector::is_empty")]
    selector: LabelSelector,
    #[serde(default)]
    template: PodTemplateSpec,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    strategy: Option<DeploymentStrategy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    revision_history_limit: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    min_ready_seconds: Option<i32>,
}

/// Declarative rollout of a replicated, stateless pod template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deployment {
    #[serde(flatten)]
    type_meta: TypeMeta,
    #[serde(default)]
    metadata: ObjectMeta,
    #[serde(default)]
    spec: DeploymentSpec,
}

impl Default for Deployment {
    fn default() -> Self {
        Self::new()
    }
}

impl Deployment {
    pub fn new() -> Self {
        Self {
            type_meta: TypeMeta::stable(Kind::Deployment),
            metadata: ObjectMeta::new(),
            spec: DeploymentSpec::default(),
        }
    }

    pub fn replicas(&self) -> i32 {
        self.spec.replicas
    }

    pub fn strategy(&self) -> Option<&DeploymentStrategy> {
        self.spec.strategy.as_ref()
    }

    pub fn set_replicas(&mut self, replicas: i32) -> ValidationResult {
        require_positive("spec.replicas", replicas.into())?;
        self.spec.replicas = replicas;
        Ok(())
    }

    pub fn set_strategy(&mut self, strategy: DeploymentStrategy) -> ValidationResult {
        strategy.validate()?;
        self.spec.strategy = Some(strategy);
        Ok(())
    }

    pub fn set_revision_history_limit(&mut self, limit: i32) -> ValidationResult {
        require_non_negative("spec.revisionHistoryLimit", limit.into())?;
        self.spec.revision_history_limit = Some(limit);
        Ok(())
    }

    pub fn set_min_ready_seconds(&mut self, seconds: i32) -> ValidationResult {
        require_non_negative("spec.minReadySeconds", seconds.into())?;
        self.spec.min_ready_seconds = Some(seconds);
        Ok(())
    }
}

impl_manifest!(Deployment, {
    fn validate(&self) -> ValidationResult {
        self.metadata.validate(Self::VALIDATION)?;
        let spec = &self.spec;
        validate_replicas("spec.replicas", spec.replicas)?;
        if let Some(strategy) = &spec.strategy {
            strategy.validate()?;
        }
        if let Some(limit) = spec.revision_history_limit {
            require_non_negative("spec.revisionHistoryLimit", limit.into())?;
        }
        if let Some(seconds) = spec.min_ready_seconds {
            require_non_negative("spec.minReadySeconds", seconds.into())?;
        }
        validate_controller(self)
    }
});

impl Namespaced for Deployment {}

impl Workload for Deployment {
    fn pod_spec(&self) -> &PodSpec {
        self.spec.template.spec()
    }

    fn pod_spec_mut(&mut self) -> &mut PodSpec {
        self.spec.template.spec_mut()
    }
}

impl Controller for Deployment {
    fn template(&self) -> &PodTemplateSpec {
        &self.spec.template
    }

    fn template_mut(&mut self) -> &mut PodTemplateSpec {
        &mut self.spec.template
    }

    fn selector(&self) -> &LabelSelector {
        &self.spec.selector
    }

    fn selector_mut(&mut self) -> &mut LabelSelector {
        &mut self.spec.selector
    }
}
