// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use crate::domain::error::{ValidationError, ValidationResult};
use crate::domain::kind::{Kind, TypeMeta};
use crate::domain::manifest::{apply_selector, Controller, Namespaced, Workload};
use crate::domain::metadata::ObjectMeta;
use crate::domain::pod_template::{PodSpec, PodTemplateSpec};
use crate::domain::primitives::{
    is_false, parse_enum, require_non_empty, require_non_negative, require_positive,
};
use crate::domain::selector::LabelSelector;
use crate::domain::workload::job::JobSpec;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Five cron fields, or one of the `@` shorthands.
static SCHEDULE_PATTERN: LazyLock<Result<Regex, regex::Error>> = LazyLock::new(|| {
    Regex::new(r"^(@(yearly|annually|monthly|weekly|daily|midnight|hourly)|(\S+\s+){4}\S+)$")
});

fn check_schedule(schedule: &str) -> ValidationResult {
    require_non_empty("spec.schedule", schedule)?;
    let pattern = SCHEDULE_PATTERN
        .as_ref()
        .map_err(|e| ValidationError::invalid("spec.schedule", e.to_string()))?;
    if !pattern.is_match(schedule.trim()) {
        return Err(ValidationError::invalid(
            "spec.schedule",
            format!("'{schedule}' is not a cron expression"),
        ));
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConcurrencyPolicy {
    Allow,
    Forbid,
    Replace,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobTemplateSpec {
    #[serde(default)]
    metadata: ObjectMeta,
    #[serde(default)]
    spec: JobSpec,
}

impl JobTemplateSpec {
    pub fn metadata(&self) -> &ObjectMeta {
        &self.metadata
    }

    pub fn spec(&self) -> &JobSpec {
        &self.spec
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CronJobSpec {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    schedule: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    concurrency_policy: Option<ConcurrencyPolicy>,
    #[serde(default, skip_serializing_if = "is_false")]
    suspend: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    starting_deadline_seconds: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    successful_jobs_history_limit: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    failed_jobs_history_limit: Option<i32>,
    #[serde(default)]
    job_template: JobTemplateSpec,
}

/// Runs a Job on a cron schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CronJob {
    #[serde(flatten)]
    type_meta: TypeMeta,
    #[serde(default)]
    metadata: ObjectMeta,
    #[serde(default)]
    spec: CronJobSpec,
}

impl Default for CronJob {
    fn default() -> Self {
        Self::new()
    }
}

impl CronJob {
    pub fn new() -> Self {
        Self {
            type_meta: TypeMeta::stable(Kind::CronJob),
            metadata: ObjectMeta::new(),
            spec: CronJobSpec::default(),
        }
    }

    pub fn get_name(&self) -> &str {
        self.metadata.name()
    }

    pub fn schedule(&self) -> &str {
        &self.spec.schedule
    }

    pub fn job_template(&self) -> &JobTemplateSpec {
        &self.spec.job_template
    }

    pub fn suspended(&self) -> bool {
        self.spec.suspend
    }

    pub fn set_schedule(&mut self, schedule: &str) -> ValidationResult {
        check_schedule(schedule)?;
        self.spec.schedule = schedule.trim().to_string();
        Ok(())
    }

    pub fn set_concurrency_policy(&mut self, policy: &str) -> ValidationResult {
        self.spec.concurrency_policy = Some(parse_enum("spec.concurrencyPolicy", policy)?);
        Ok(())
    }

    pub fn set_suspend(&mut self, suspend: bool) {
        self.spec.suspend = suspend;
    }

    pub fn set_starting_deadline_seconds(&mut self, seconds: i64) -> ValidationResult {
        require_positive("spec.startingDeadlineSeconds", seconds)?;
        self.spec.starting_deadline_seconds = Some(seconds);
        Ok(())
    }

    pub fn set_successful_jobs_history_limit(&mut self, limit: i32) -> ValidationResult {
        require_non_negative("spec.successfulJobsHistoryLimit", limit.into())?;
        self.spec.successful_jobs_history_limit = Some(limit);
        Ok(())
    }

    pub fn set_failed_jobs_history_limit(&mut self, limit: i32) -> ValidationResult {
        require_non_negative("spec.failedJobsHistoryLimit", limit.into())?;
        self.spec.failed_jobs_history_limit = Some(limit);
        Ok(())
    }

    pub fn set_completions(&mut self, completions: i32) -> ValidationResult {
        self.spec.job_template.spec.set_completions(completions)
    }

    pub fn set_parallelism(&mut self, parallelism: i32) -> ValidationResult {
        self.spec.job_template.spec.set_parallelism(parallelism)
    }

    pub fn set_backoff_limit(&mut self, limit: i32) -> ValidationResult {
        self.spec.job_template.spec.set_backoff_limit(limit)
    }
}

impl_manifest!(CronJob, {
    fn validate(&self) -> ValidationResult {
        self.metadata.validate(Self::VALIDATION)?;
        let spec = &self.spec;
        check_schedule(&spec.schedule)?;
        if let Some(seconds) = spec.starting_deadline_seconds {
            require_positive("spec.startingDeadlineSeconds", seconds)?;
        }
        if let Some(limit) = spec.successful_jobs_history_limit {
            require_non_negative("spec.successfulJobsHistoryLimit", limit.into())?;
        }
        if let Some(limit) = spec.failed_jobs_history_limit {
            require_non_negative("spec.failedJobsHistoryLimit", limit.into())?;
        }
        spec.job_template.metadata.validate_maps()?;
        spec.job_template.spec.validate()
    }
});

impl Namespaced for CronJob {}

impl Workload for CronJob {
    fn pod_spec(&self) -> &PodSpec {
        self.spec.job_template.spec.template().spec()
    }

    fn pod_spec_mut(&mut self) -> &mut PodSpec {
        self.spec.job_template.spec.template_mut().spec_mut()
    }

    fn set_restart_policy(&mut self, policy: &str) -> ValidationResult {
        self.spec.job_template.spec.set_restart_policy(policy)
    }
}

impl Controller for CronJob {
    fn template(&self) -> &PodTemplateSpec {
        self.spec.job_template.spec.template()
    }

    fn template_mut(&mut self) -> &mut PodTemplateSpec {
        self.spec.job_template.spec.template_mut()
    }

    fn selector(&self) -> &LabelSelector {
        self.spec.job_template.spec.selector()
    }

    fn selector_mut(&mut self) -> &mut LabelSelector {
        self.spec.job_template.spec.selector_mut()
    }

    fn set_selector(&mut self, selector: LabelSelector) -> ValidationResult {
        apply_selector(self, selector)?;
        self.spec.job_template.spec.mark_manual_selector();
        Ok(())
    }
}
