// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Horizontal Pod Autoscaler
//!
//! `autoscaling/v2` shape: a scale target, replica bounds and a list of
//! metrics. Each metric is a tagged sum type whose variant carries only the
//! fields that variant needs, so a Pods metric can never carry an object
//! reference and vice versa.

use crate::domain::error::{ValidationError, ValidationResult};
use crate::domain::kind::{Kind, TypeMeta};
use crate::domain::manifest::Namespaced;
use crate::domain::metadata::ObjectMeta;
use crate::domain::primitives::{require_non_empty, require_positive, Quantity};
use crate::domain::selector::LabelSelector;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrossVersionObjectReference {
    pub api_version: String,
    pub kind: String,
    pub name: String,
}

impl CrossVersionObjectReference {
    /// Reference to `name` of `kind` at that kind's stable apiVersion.
    pub fn to(kind: Kind, name: impl Into<String>) -> Self {
        Self {
            api_version: kind.default_api_version().to_string(),
            kind: kind.to_string(),
            name: name.into(),
        }
    }

    fn validate(&self, field: &'static str) -> ValidationResult {
        require_non_empty(field, &self.kind)?;
        require_non_empty(field, &self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MetricTarget {
    Utilization {
        #[serde(rename = "averageUtilization")]
        average_utilization: i32,
    },
    AverageValue {
        #[serde(rename = "averageValue")]
        average_value: Quantity,
    },
    Value {
        value: Quantity,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricIdentifier {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector: Option<LabelSelector>,
}

impl MetricIdentifier {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            selector: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceMetricSource {
    pub name: String,
    pub target: MetricTarget,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PodsMetricSource {
    pub metric: MetricIdentifier,
    pub target: MetricTarget,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMetricSource {
    pub described_object: CrossVersionObjectReference,
    pub metric: MetricIdentifier,
    pub target: MetricTarget,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalMetricSource {
    pub metric: MetricIdentifier,
    pub target: MetricTarget,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MetricSpec {
    Resource { resource: ResourceMetricSource },
    Pods { pods: PodsMetricSource },
    Object { object: ObjectMetricSource },
    External { external: ExternalMetricSource },
}

impl MetricSpec {
    /// Average CPU or memory utilization across pods, in percent.
    pub fn resource_utilization(name: &str, percent: i32) -> Self {
        MetricSpec::Resource {
            resource: ResourceMetricSource {
                name: name.to_string(),
                target: MetricTarget::Utilization {
                    average_utilization: percent,
                },
            },
        }
    }

    fn validate(&self) -> ValidationResult {
        match self {
            MetricSpec::Resource { resource } => {
                require_non_empty("metrics.resource.name", &resource.name)?;
                match &resource.target {
                    MetricTarget::Utilization {
                        average_utilization,
                    } => require_positive(
                        "metrics.resource.target.averageUtilization",
                        (*average_utilization).into(),
                    ),
                    MetricTarget::AverageValue { .. } => Ok(()),
                    MetricTarget::Value { .. } => Err(ValidationError::invalid(
                        "metrics.resource.target",
                        "resource metrics take Utilization or AverageValue",
                    )),
                }
            }
            MetricSpec::Pods { pods } => {
                require_non_empty("metrics.pods.metric.name", &pods.metric.name)?;
                match pods.target {
                    MetricTarget::AverageValue { .. } => Ok(()),
                    _ => Err(ValidationError::invalid(
                        "metrics.pods.target",
                        "pods metrics take AverageValue",
                    )),
                }
            }
            MetricSpec::Object { object } => {
                object.described_object.validate("metrics.object.describedObject")?;
                require_non_empty("metrics.object.metric.name", &object.metric.name)?;
                match object.target {
                    MetricTarget::Utilization { .. } => Err(ValidationError::invalid(
                        "metrics.object.target",
                        "object metrics take Value or AverageValue",
                    )),
                    _ => Ok(()),
                }
            }
            MetricSpec::External { external } => {
                require_non_empty("metrics.external.metric.name", &external.metric.name)?;
                match external.target {
                    MetricTarget::Utilization { .. } => Err(ValidationError::invalid(
                        "metrics.external.target",
                        "external metrics take Value or AverageValue",
                    )),
                    _ => Ok(()),
                }
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HorizontalPodAutoscalerSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    scale_target_ref: Option<CrossVersionObjectReference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    min_replicas: Option<i32>,
    #[serde(default)]
    max_replicas: i32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    metrics: Vec<MetricSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HorizontalPodAutoscaler {
    #[serde(flatten)]
    type_meta: TypeMeta,
    #[serde(default)]
    metadata: ObjectMeta,
    #[serde(default)]
    spec: HorizontalPodAutoscalerSpec,
}

impl Default for HorizontalPodAutoscaler {
    fn default() -> Self {
        Self::new()
    }
}

impl HorizontalPodAutoscaler {
    pub fn new() -> Self {
        Self {
            type_meta: TypeMeta::stable(Kind::HorizontalPodAutoscaler),
            metadata: ObjectMeta::new(),
            spec: HorizontalPodAutoscalerSpec::default(),
        }
    }

    pub fn scale_target_ref(&self) -> Option<&CrossVersionObjectReference> {
        self.spec.scale_target_ref.as_ref()
    }

    pub fn min_replicas(&self) -> Option<i32> {
        self.spec.min_replicas
    }

    pub fn max_replicas(&self) -> i32 {
        self.spec.max_replicas
    }

    pub fn metrics(&self) -> &[MetricSpec] {
        &self.spec.metrics
    }

    pub fn set_scale_target_ref(&mut self, target: CrossVersionObjectReference) -> ValidationResult {
        require_non_empty("spec.scaleTargetRef.apiVersion", &target.api_version)?;
        target.validate("spec.scaleTargetRef")?;
        self.spec.scale_target_ref = Some(target);
        Ok(())
    }

    pub fn set_min_replicas(&mut self, replicas: i32) -> ValidationResult {
        require_positive("spec.minReplicas", replicas.into())?;
        if self.spec.max_replicas > 0 && replicas > self.spec.max_replicas {
            return Err(ValidationError::invalid(
                "spec.minReplicas",
                format!("{replicas} exceeds maxReplicas {}", self.spec.max_replicas),
            ));
        }
        self.spec.min_replicas = Some(replicas);
        Ok(())
    }

    pub fn set_max_replicas(&mut self, replicas: i32) -> ValidationResult {
        require_positive("spec.maxReplicas", replicas.into())?;
        let min = self.spec.min_replicas.unwrap_or(1);
        if replicas < min {
            return Err(ValidationError::invalid(
                "spec.maxReplicas",
                format!("{replicas} is below minReplicas {min}"),
            ));
        }
        self.spec.max_replicas = replicas;
        Ok(())
    }

    pub fn add_metric(&mut self, metric: MetricSpec) -> ValidationResult {
        metric.validate()?;
        self.spec.metrics.push(metric);
        Ok(())
    }
}

impl HorizontalPodAutoscalerSpec {
    fn validate(&self) -> ValidationResult {
        let target = self
            .scale_target_ref
            .as_ref()
            .ok_or(ValidationError::Empty {
                field: "spec.scaleTargetRef",
            })?;
        require_non_empty("spec.scaleTargetRef.apiVersion", &target.api_version)?;
        target.validate("spec.scaleTargetRef")?;
        require_positive("spec.maxReplicas", self.max_replicas.into())?;
        if let Some(min) = self.min_replicas {
            require_positive("spec.minReplicas", min.into())?;
            if min > self.max_replicas {
                return Err(ValidationError::invalid(
                    "spec.minReplicas",
                    format!("{min} exceeds maxReplicas {}", self.max_replicas),
                ));
            }
        }
        self.metrics.iter().try_for_each(MetricSpec::validate)
    }
}

impl_manifest!(HorizontalPodAutoscaler, {
    fn validate(&self) -> ValidationResult {
        self.metadata.validate(Self::VALIDATION)?;
        self.spec.validate()
    }
});

impl Namespaced for HorizontalPodAutoscaler {}
