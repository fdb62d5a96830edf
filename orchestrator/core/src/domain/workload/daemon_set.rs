// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use crate::domain::error::ValidationResult;
use crate::domain::kind::{Kind, TypeMeta};
use crate::domain::manifest::{validate_controller, Controller, Namespaced, Workload};
use crate::domain::metadata::ObjectMeta;
use crate::domain::pod_template::{PodSpec, PodTemplateSpec, RestartPolicy, Toleration};
use crate::domain::primitives::{require_non_negative, Labels};
use crate::domain::selector::LabelSelector;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DaemonSetSpec {
    #[serde(default, skip_serializing_if = "LabelSelector::is_empty")]
    selector: LabelSelector,
    #[serde(default)]
    template: PodTemplateSpec,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    min_ready_seconds: Option<i32>,
}

/// One pod per eligible node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaemonSet {
    #[serde(flatten)]
    type_meta: TypeMeta,
    #[serde(default)]
    metadata: ObjectMeta,
    #[serde(default)]
    spec: DaemonSetSpec,
}

impl Default for DaemonSet {
    fn default() -> Self {
        Self::new()
    }
}

impl DaemonSet {
    /// Pods restart `Always` unless told otherwise.
    pub fn new() -> Self {
        let mut spec = DaemonSetSpec::default();
        spec.template
            .spec_mut()
            .put_restart_policy(RestartPolicy::Always);
        Self {
            type_meta: TypeMeta::stable(Kind::DaemonSet),
            metadata: ObjectMeta::new(),
            spec,
        }
    }

    pub fn add_toleration(&mut self, toleration: Toleration) -> ValidationResult {
        self.spec.template.spec_mut().add_toleration(toleration)
    }

    pub fn set_node_selector(&mut self, selector: &Labels) -> ValidationResult {
        self.spec.template.spec_mut().set_node_selector(selector)
    }

    pub fn set_termination_grace_period_seconds(&mut self, seconds: i64) -> ValidationResult {
        self.spec
            .template
            .spec_mut()
            .set_termination_grace_period_seconds(seconds)
    }
}

impl_manifest!(DaemonSet, {
    /// Also labels the selector and pod template with `name=<name>`, so a
    /// named DaemonSet always selects its own pods.
    fn set_metadata_name(&mut self, name: &str) -> ValidationResult {
        self.metadata.set_name(name)?;
        self.spec.selector.add_match_label("name", name)?;
        self.spec.template.metadata_mut().insert_label("name", name);
        tracing::debug!(daemon_set = %name, "propagated name label to selector and template");
        Ok(())
    }

    fn validate(&self) -> ValidationResult {
        self.metadata.validate(Self::VALIDATION)?;
        if let Some(seconds) = self.spec.min_ready_seconds {
            require_non_negative("spec.minReadySeconds", seconds.into())?;
        }
        validate_controller(self)
    }
});

impl Namespaced for DaemonSet {}

impl Workload for DaemonSet {
    fn pod_spec(&self) -> &PodSpec {
        self.spec.template.spec()
    }

    fn pod_spec_mut(&mut self) -> &mut PodSpec {
        self.spec.template.spec_mut()
    }
}

impl Controller for DaemonSet {
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
