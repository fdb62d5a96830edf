// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Workload Resources
//!
//! Manifest kinds that run containers, directly (Pod) or through a
//! controller owning a pod template.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Pod, controllers and PodPreset

pub mod cron_job;
pub mod daemon_set;
pub mod deployment;
pub mod job;
pub mod pod;
pub mod pod_preset;
pub mod replica_set;
pub mod stateful_set;

pub use cron_job::{ConcurrencyPolicy, CronJob, CronJobSpec, JobTemplateSpec};
pub use daemon_set::{DaemonSet, DaemonSetSpec};
pub use deployment::{Deployment, DeploymentSpec, DeploymentStrategy, RollingUpdate};
pub use job::{Job, JobSpec};
pub use pod::Pod;
pub use pod_preset::{PodPreset, PodPresetSpec};
pub use replica_set::{ReplicaSet, ReplicaSetSpec};
pub use stateful_set::{PodManagementPolicy, StatefulSet, StatefulSetSpec, VolumeClaimTemplate};
