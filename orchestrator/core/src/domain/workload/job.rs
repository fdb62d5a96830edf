// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use crate::domain::error::{ValidationError, ValidationResult};
use crate::domain::kind::{Kind, TypeMeta};
use crate::domain::manifest::{
    apply_selector, validate_selected_template, Controller, Namespaced, Workload,
};
use crate::domain::metadata::ObjectMeta;
use crate::domain::pod_template::{PodSpec, PodTemplateSpec, RestartPolicy};
use crate::domain::primitives::{
    is_zero_i32, parse_enum, require_non_negative, require_positive,
};
use crate::domain::selector::LabelSelector;
use serde::{Deserialize, Serialize};

/// Run-to-completion spec, shared by Job and CronJob's job template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    parallelism: Option<i32>,
    #[serde(default, skip_serializing_if = "is_zero_i32")]
    completions: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    backoff_limit: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    active_deadline_seconds: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ttl_seconds_after_finished: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    manual_selector: Option<bool>,
    #[serde(default, skip_serializing_if = "LabelSelector::is_empty")]
    selector: LabelSelector,
    #[serde(default)]
    template: PodTemplateSpec,
}

impl JobSpec {
    pub fn completions(&self) -> i32 {
        self.completions
    }

    pub fn parallelism(&self) -> Option<i32> {
        self.parallelism
    }

    pub fn backoff_limit(&self) -> Option<i32> {
        self.backoff_limit
    }

    pub fn manual_selector(&self) -> Option<bool> {
        self.manual_selector
    }

    pub fn template(&self) -> &PodTemplateSpec {
        &self.template
    }

    pub(crate) fn template_mut(&mut self) -> &mut PodTemplateSpec {
        &mut self.template
    }

    pub(crate) fn selector(&self) -> &LabelSelector {
        &self.selector
    }

    pub(crate) fn selector_mut(&mut self) -> &mut LabelSelector {
        &mut self.selector
    }

    pub(crate) fn set_completions(&mut self, completions: i32) -> ValidationResult {
        require_positive("spec.completions", completions.into())?;
        self.completions = completions;
        Ok(())
    }

    pub(crate) fn set_parallelism(&mut self, parallelism: i32) -> ValidationResult {
        require_positive("spec.parallelism", parallelism.into())?;
        self.parallelism = Some(parallelism);
        Ok(())
    }

    pub(crate) fn set_backoff_limit(&mut self, limit: i32) -> ValidationResult {
        require_non_negative("spec.backoffLimit", limit.into())?;
        self.backoff_limit = Some(limit);
        Ok(())
    }

    pub(crate) fn set_active_deadline_seconds(&mut self, seconds: i64) -> ValidationResult {
        require_positive("spec.activeDeadlineSeconds", seconds)?;
        self.active_deadline_seconds = Some(seconds);
        Ok(())
    }

    pub(crate) fn set_ttl_seconds_after_finished(&mut self, seconds: i32) -> ValidationResult {
        require_non_negative("spec.ttlSecondsAfterFinished", seconds.into())?;
        self.ttl_seconds_after_finished = Some(seconds);
        Ok(())
    }

    pub(crate) fn mark_manual_selector(&mut self) {
        self.manual_selector = Some(true);
    }

    /// Jobs only accept `Never` or `OnFailure`.
    pub(crate) fn set_restart_policy(&mut self, policy: &str) -> ValidationResult {
        let policy: RestartPolicy = parse_enum("restartPolicy", policy)?;
        if policy == RestartPolicy::Always {
            return Err(ValidationError::invalid(
                "restartPolicy",
                "jobs require Never or OnFailure",
            ));
        }
        self.template.spec_mut().put_restart_policy(policy);
        Ok(())
    }

    pub(crate) fn validate(&self) -> ValidationResult {
        if self.completions != 0 {
            require_positive("spec.completions", self.completions.into())?;
        }
        if let Some(parallelism) = self.parallelism {
            require_positive("spec.parallelism", parallelism.into())?;
        }
        if let Some(limit) = self.backoff_limit {
            require_non_negative("spec.backoffLimit", limit.into())?;
        }
        if let Some(seconds) = self.active_deadline_seconds {
            require_positive("spec.activeDeadlineSeconds", seconds)?;
        }
        if let Some(seconds) = self.ttl_seconds_after_finished {
            require_non_negative("spec.ttlSecondsAfterFinished", seconds.into())?;
        }
        if self.template.spec().restart_policy() == Some(RestartPolicy::Always) {
            return Err(ValidationError::invalid(
                "restartPolicy",
                "jobs require Never or OnFailure",
            ));
        }
        if self.selector.is_empty() {
            return self.template.validate();
        }
        if self.manual_selector != Some(true) {
            return Err(ValidationError::invalid(
                "spec.selector",
                "a hand-written selector needs manualSelector: true",
            ));
        }
        validate_selected_template(&self.selector, &self.template)
    }
}

/// A batch workload that runs pods until a number of completions succeed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    #[serde(flatten)]
    type_meta: TypeMeta,
    #[serde(default)]
    metadata: ObjectMeta,
    #[serde(default)]
    spec: JobSpec,
}

impl Default for Job {
    fn default() -> Self {
        Self::new()
    }
}

impl Job {
    pub fn new() -> Self {
        Self {
            type_meta: TypeMeta::stable(Kind::Job),
            metadata: ObjectMeta::new(),
            spec: JobSpec::default(),
        }
    }

    pub fn spec(&self) -> &JobSpec {
        &self.spec
    }

    pub fn completions(&self) -> i32 {
        self.spec.completions
    }

    pub fn set_completions(&mut self, completions: i32) -> ValidationResult {
        self.spec.set_completions(completions)
    }

    pub fn set_parallelism(&mut self, parallelism: i32) -> ValidationResult {
        self.spec.set_parallelism(parallelism)
    }

    pub fn set_backoff_limit(&mut self, limit: i32) -> ValidationResult {
        self.spec.set_backoff_limit(limit)
    }

    pub fn set_active_deadline_seconds(&mut self, seconds: i64) -> ValidationResult {
        self.spec.set_active_deadline_seconds(seconds)
    }

    pub fn set_ttl_seconds_after_finished(&mut self, seconds: i32) -> ValidationResult {
        self.spec.set_ttl_seconds_after_finished(seconds)
    }

    /// Names the pod template.
    pub fn set_template_name(&mut self, name: &str) -> ValidationResult {
        self.spec.template.metadata_mut().set_name(name)
    }
}

impl_manifest!(Job, {
    fn validate(&self) -> ValidationResult {
        self.metadata.validate(Self::VALIDATION)?;
        self.spec.validate()
    }
});

impl Namespaced for Job {}

impl Workload for Job {
    fn pod_spec(&self) -> &PodSpec {
        self.spec.template.spec()
    }

    fn pod_spec_mut(&mut self) -> &mut PodSpec {
        self.spec.template.spec_mut()
    }

    fn set_restart_policy(&mut self, policy: &str) -> ValidationResult {
        self.spec.set_restart_policy(policy)
    }
}

impl Controller for Job {
    fn template(&self) -> &PodTemplateSpec {
        self.spec.template()
    }

    fn template_mut(&mut self) -> &mut PodTemplateSpec {
        self.spec.template_mut()
    }

    fn selector(&self) -> &LabelSelector {
        self.spec.selector()
    }

    fn selector_mut(&mut self) -> &mut LabelSelector {
        self.spec.selector_mut()
    }

    /// A hand-written Job selector needs `manualSelector: true`.
    fn set_selector(&mut self, selector: LabelSelector) -> ValidationResult {
        apply_selector(self, selector)?;
        self.spec.mark_manual_selector();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::container::Container;
    use crate::domain::manifest::Manifest;
    use crate::domain::primitives::labels_from;

    #[test]
    fn test_completions_must_be_positive() {
        let mut job = Job::new();
        assert!(job.set_completions(0).is_err());
        assert_eq!(job.completions(), 0);
        job.set_completions(4).unwrap();
        assert!(job.set_completions(-1).is_err());
        assert_eq!(job.completions(), 4);
    }

    #[test]
    fn test_restart_policy_excludes_always() {
        let mut job = Job::new();
        assert!(job.set_restart_policy("Always").is_err());
        assert_eq!(job.pod_spec().restart_policy(), None);
        job.set_restart_policy("OnFailure").unwrap();
        assert_eq!(job.pod_spec().restart_policy(), Some(RestartPolicy::OnFailure));
    }

    #[test]
    fn test_template_name() {
        let mut job = Job::new();
        assert!(job.set_template_name("").is_err());
        job.set_template_name("pi").unwrap();
        assert_eq!(job.template().metadata().name(), "pi");
    }

    #[test]
    fn test_selector_sets_manual_selector() {
        let mut job = Job::new();
        assert!(job.set_selector(LabelSelector::new()).is_err());
        assert_eq!(job.spec().manual_selector(), None);
        let selector = LabelSelector::matching(&labels_from([("job", "pi")])).unwrap();
        job.set_selector(selector).unwrap();
        assert_eq!(job.spec().manual_selector(), Some(true));
        assert_eq!(job.template().labels(), &labels_from([("job", "pi")]));
    }

    #[test]
    fn test_counters() {
        let mut job = Job::new();
        assert!(job.set_parallelism(0).is_err());
        assert!(job.set_backoff_limit(-1).is_err());
        assert!(job.set_active_deadline_seconds(0).is_err());
        assert!(job.set_ttl_seconds_after_finished(-1).is_err());
        job.set_parallelism(2).unwrap();
        job.set_backoff_limit(0).unwrap();
        job.set_ttl_seconds_after_finished(0).unwrap();
        assert_eq!(job.spec().parallelism(), Some(2));
        assert_eq!(job.spec().backoff_limit(), Some(0));
    }

    // ── Whole-object validation ──

    #[test]
    fn test_job_validation() {
        let mut job = Job::new();
        job.set_metadata_name("pi").unwrap();
        job.set_restart_policy("Never").unwrap();
        job.add_container(Container::new("pi", "perl")).unwrap();
        job.validate().unwrap();

        let selector = LabelSelector::matching(&labels_from([("job", "pi")])).unwrap();
        job.set_selector(selector).unwrap();
        job.validate().unwrap();

        job.spec.manual_selector = None;
        assert!(job.validate().is_err());
    }

    #[test]
    fn test_parsed_job_rechecked() {
        let yaml = "apiVersion: batch/v1\nkind: Job\nmetadata:\n  name: pi\nspec:\n  completions: 3\n  template:\n    spec:\n      restartPolicy: Never\n      containers:\n      - name: pi\n        image: perl\n";
        let job: Job = serde_yaml::from_str(yaml).unwrap();
        job.validate().unwrap();

        for (from, to) in [
            ("completions: 3", "completions: -3"),
            ("restartPolicy: Never", "restartPolicy: Always"),
            ("completions: 3", "backoffLimit: -1"),
        ] {
            let job: Job = serde_yaml::from_str(&yaml.replace(from, to)).unwrap();
            assert!(job.validate().is_err(), "{to}");
        }
    }
}
