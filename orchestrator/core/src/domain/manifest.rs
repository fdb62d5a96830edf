// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Manifest Traits
//!
//! Capabilities shared across kinds. Setters common to every manifest live
//! here as provided methods; a kind changes the shared behaviour by setting
//! `LABEL_POLICY` / `VALIDATION` or by overriding a method.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Shared setter contract for manifests, workloads and controllers
//!
//! ```text
//! Manifest ── Namespaced ── Workload ── Controller
//!   (all)     (scoped)      (pod spec)   (selector + template)
//! ```

use crate::domain::auxiliary::{
    ConfigMap, CustomResourceDefinition, Endpoints, HorizontalPodAutoscaler, Ingress, LimitRange,
    Namespace, NetworkPolicy, Node, PersistentVolume, PersistentVolumeClaim, ResourceQuota, Secret,
    Service, ServiceAccount, StorageClass,
};
use crate::domain::container::Container;
use crate::domain::error::{EncodingError, ValidationError, ValidationResult};
use crate::domain::kind::{Kind, TypeMeta};
use crate::domain::metadata::{LabelPolicy, ObjectMeta, Validation};
use crate::domain::pod_template::{PodSpec, PodTemplateSpec};
use crate::domain::primitives::Labels;
use crate::domain::schema::SchemaProfile;
use crate::domain::selector::LabelSelector;
use crate::domain::volume::Volume;
use crate::domain::workload::{
    CronJob, DaemonSet, Deployment, Job, Pod, PodPreset, ReplicaSet, StatefulSet,
};
use crate::infrastructure::manifest_encoder::ManifestEncoder;
use serde::Serialize;

/// Implements [`Manifest`] for a struct with `type_meta` and `metadata`
/// fields. Extra associated items (policy consts, overridden setters) go in
/// the optional braces.
macro_rules! impl_manifest {
    ($ty:ty) => {
        impl_manifest!($ty, {});
    };
    ($ty:ty, { $($item:item)* }) => {
        impl $crate::domain::manifest::Manifest for $ty {
            $($item)*

            fn type_meta(&self) -> &$crate::domain::kind::TypeMeta {
                &self.type_meta
            }

            fn type_meta_mut(&mut self) -> &mut $crate::domain::kind::TypeMeta {
                &mut self.type_meta
            }

            fn metadata(&self) -> &$crate::domain::metadata::ObjectMeta {
                &self.metadata
            }

            fn metadata_mut(&mut self) -> &mut $crate::domain::metadata::ObjectMeta {
                &mut self.metadata
            }
        }
    };
}

/// A top-level manifest object.
pub trait Manifest: Serialize {
    /// Behaviour of `set_labels` on a key that is already present.
    const LABEL_POLICY: LabelPolicy = LabelPolicy::Overwrite;
    /// Whether metadata setters check their input.
    const VALIDATION: Validation = Validation::Enforced;

    fn type_meta(&self) -> &TypeMeta;
    fn type_meta_mut(&mut self) -> &mut TypeMeta;
    fn metadata(&self) -> &ObjectMeta;
    fn metadata_mut(&mut self) -> &mut ObjectMeta;

    fn kind(&self) -> Kind {
        self.type_meta().kind()
    }

    fn api_version(&self) -> &str {
        self.type_meta().api_version()
    }

    fn name(&self) -> &str {
        self.metadata().name()
    }

    /// Re-checks the whole object against the rules its setters enforce.
    /// Parsed documents never went through those setters.
    fn validate(&self) -> ValidationResult {
        self.metadata().validate(Self::VALIDATION)
    }

    /// Re-targets a freshly built object at another schema profile.
    fn with_schema(mut self, profile: &SchemaProfile) -> Self
    where
        Self: Sized,
    {
        let kind = self.kind();
        *self.type_meta_mut() = profile.type_meta(kind);
        self
    }

    fn set_metadata_name(&mut self, name: &str) -> ValidationResult {
        self.metadata_mut().set_name_with(name, Self::VALIDATION)
    }

    fn set_labels(&mut self, labels: &Labels) -> ValidationResult {
        match Self::VALIDATION {
            Validation::Enforced => self.metadata_mut().set_labels(labels, Self::LABEL_POLICY),
            Validation::Skipped => {
                self.metadata_mut().merge_labels(labels);
                Ok(())
            }
        }
    }

    fn set_annotations(&mut self, annotations: &Labels) -> ValidationResult {
        match Self::VALIDATION {
            Validation::Enforced => self.metadata_mut().set_annotations(annotations),
            Validation::Skipped => {
                self.metadata_mut().merge_annotations(annotations);
                Ok(())
            }
        }
    }

    /// Encodes with the default [`ManifestEncoder`] settings.
    fn to_yaml(&self) -> Result<String, EncodingError> {
        ManifestEncoder::default().encode_to_string(self)
    }
}

/// Manifests that live inside a namespace.
pub trait Namespaced: Manifest {
    fn set_namespace(&mut self, namespace: &str) -> ValidationResult {
        self.metadata_mut()
            .set_namespace_with(namespace, Self::VALIDATION)
    }

    fn get_namespace(&self) -> Option<&str> {
        self.metadata().namespace()
    }
}

/// Manifests that run containers.
pub trait Workload: Namespaced {
    fn pod_spec(&self) -> &PodSpec;
    fn pod_spec_mut(&mut self) -> &mut PodSpec;

    fn containers(&self) -> &[Container] {
        self.pod_spec().containers()
    }

    fn add_container(&mut self, container: Container) -> ValidationResult {
        self.pod_spec_mut().add_container(container)
    }

    fn add_volume(&mut self, volume: Volume) -> ValidationResult {
        self.pod_spec_mut().add_volume(volume)
    }

    fn set_restart_policy(&mut self, policy: &str) -> ValidationResult {
        self.pod_spec_mut().set_restart_policy(policy)
    }
}

/// Workloads that manage pods through a selector and a pod template.
pub trait Controller: Workload {
    fn template(&self) -> &PodTemplateSpec;
    fn template_mut(&mut self) -> &mut PodTemplateSpec;
    fn selector(&self) -> &LabelSelector;
    fn selector_mut(&mut self) -> &mut LabelSelector;

    /// Replaces the selector and overwrites the template labels with its
    /// `matchLabels`, keeping selector and pod labels in agreement.
    fn set_selector(&mut self, selector: LabelSelector) -> ValidationResult {
        apply_selector(self, selector)
    }

    /// Adds to the selector's `matchLabels` without touching the template.
    fn set_match_labels(&mut self, labels: &Labels) -> ValidationResult {
        self.selector_mut().set_match_labels(labels)
    }

    fn set_template_labels(&mut self, labels: &Labels) -> ValidationResult {
        self.template_mut()
            .metadata_mut()
            .set_labels(labels, LabelPolicy::Overwrite)
    }

    fn set_template_annotations(&mut self, annotations: &Labels) -> ValidationResult {
        self.template_mut().metadata_mut().set_annotations(annotations)
    }
}

pub(crate) fn apply_selector<C>(controller: &mut C, selector: LabelSelector) -> ValidationResult
where
    C: Controller + ?Sized,
{
    if selector.match_labels().is_empty() {
        return Err(ValidationError::EmptyCollection {
            field: "selector.matchLabels",
        });
    }
    controller
        .template_mut()
        .metadata_mut()
        .replace_labels(selector.match_labels());
    *controller.selector_mut() = selector;
    Ok(())
}

/// Selector and template rules every controller shares: a non-empty
/// `matchLabels` the template labels satisfy, and a valid pod template.
pub(crate) fn validate_controller<C>(controller: &C) -> ValidationResult
where
    C: Controller + ?Sized,
{
    let selector = controller.selector();
    if selector.match_labels().is_empty() {
        return Err(ValidationError::EmptyCollection {
            field: "selector.matchLabels",
        });
    }
    validate_selected_template(selector, controller.template())
}

pub(crate) fn validate_selected_template(
    selector: &LabelSelector,
    template: &PodTemplateSpec,
) -> ValidationResult {
    selector.validate()?;
    let labels = template.labels();
    if let Some((key, value)) = selector
        .match_labels()
        .iter()
        .find(|(key, value)| labels.get(*key) != Some(*value))
    {
        return Err(ValidationError::invalid(
            "template.metadata.labels",
            format!("selector label {key}={value} does not match the template"),
        ));
    }
    template.validate()
}

macro_rules! any_manifest {
    ($($variant:ident),+ $(,)?) => {
        /// Any supported manifest, for heterogeneous batches and parsing.
        #[derive(Debug, Clone, PartialEq, Serialize)]
        #[serde(untagged)]
        pub enum AnyManifest {
            $($variant($variant),)+
        }

        impl AnyManifest {
            pub fn kind(&self) -> Kind {
                match self {
                    $(AnyManifest::$variant(m) => m.kind(),)+
                }
            }

            pub fn api_version(&self) -> &str {
                match self {
                    $(AnyManifest::$variant(m) => m.api_version(),)+
                }
            }

            pub fn metadata(&self) -> &ObjectMeta {
                match self {
                    $(AnyManifest::$variant(m) => m.metadata(),)+
                }
            }

            pub(crate) fn metadata_mut(&mut self) -> &mut ObjectMeta {
                match self {
                    $(AnyManifest::$variant(m) => m.metadata_mut(),)+
                }
            }

            pub fn validate(&self) -> ValidationResult {
                match self {
                    $(AnyManifest::$variant(m) => m.validate(),)+
                }
            }

            fn type_meta_mut(&mut self) -> &mut TypeMeta {
                match self {
                    $(AnyManifest::$variant(m) => m.type_meta_mut(),)+
                }
            }

            /// Deserializes a YAML value already known to be of `kind`.
            pub(crate) fn from_value(
                kind: Kind,
                value: serde_yaml::Value,
            ) -> Result<Self, serde_yaml::Error> {
                match kind {
                    $(Kind::$variant => serde_yaml::from_value(value).map(AnyManifest::$variant),)+
                }
            }
        }

        $(
            impl From<$variant> for AnyManifest {
                fn from(manifest: $variant) -> Self {
                    AnyManifest::$variant(manifest)
                }
            }
        )+
    };
}

any_manifest!(
    Pod,
    Deployment,
    StatefulSet,
    DaemonSet,
    ReplicaSet,
    Job,
    CronJob,
    PodPreset,
    ConfigMap,
    Secret,
    Namespace,
    Service,
    Ingress,
    NetworkPolicy,
    ResourceQuota,
    LimitRange,
    PersistentVolume,
    PersistentVolumeClaim,
    StorageClass,
    HorizontalPodAutoscaler,
    Node,
    ServiceAccount,
    Endpoints,
    CustomResourceDefinition,
);

impl AnyManifest {
    pub fn name(&self) -> &str {
        self.metadata().name()
    }

    /// Fills `metadata.namespace` on namespaced kinds that have none.
    /// Returns whether anything changed.
    pub fn apply_default_namespace(&mut self, namespace: &str) -> bool {
        if !self.kind().is_namespaced() {
            return false;
        }
        self.metadata_mut().set_default_namespace(namespace)
    }

    /// Rewrites `apiVersion` when `profile` overrides this kind. Returns
    /// whether anything changed.
    pub fn apply_schema(&mut self, profile: &SchemaProfile) -> bool {
        let kind = self.kind();
        let Some(api_version) = profile.overrides().get(&kind) else {
            return false;
        };
        if self.api_version() == api_version.as_str() {
            return false;
        }
        *self.type_meta_mut() = profile.type_meta(kind);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::primitives::labels_from;

    #[test]
    fn test_with_schema_retargets_api_version() {
        let profile = SchemaProfile::new().with_api_version(Kind::Deployment, "extensions/v1beta1");
        let deployment = Deployment::new().with_schema(&profile);
        assert_eq!(deployment.api_version(), "extensions/v1beta1");
        assert_eq!(deployment.kind(), Kind::Deployment);
    }

    #[test]
    fn test_apply_selector_overwrites_template_labels() {
        let mut rs = ReplicaSet::new();
        rs.set_template_labels(&labels_from([("app", "old"), ("extra", "x")]))
            .unwrap();
        let selector = LabelSelector::matching(&labels_from([("app", "new")])).unwrap();
        rs.set_selector(selector).unwrap();
        assert_eq!(rs.template().labels(), &labels_from([("app", "new")]));
    }

    #[test]
    fn test_empty_selector_leaves_everything_unchanged() {
        let mut rs = ReplicaSet::new();
        rs.set_template_labels(&labels_from([("app", "web")])).unwrap();
        assert!(rs.set_selector(LabelSelector::new()).is_err());
        assert_eq!(rs.template().labels(), &labels_from([("app", "web")]));
        assert!(rs.selector().is_empty());
    }

    #[test]
    fn test_default_namespace_only_for_namespaced_kinds() {
        let mut pod: AnyManifest = Pod::new("p").into();
        assert!(pod.apply_default_namespace("team-a"));
        assert_eq!(pod.metadata().namespace(), Some("team-a"));
        assert!(!pod.apply_default_namespace("team-b"));

        let mut node: AnyManifest = Node::new("n1").into();
        assert!(!node.apply_default_namespace("team-a"));
        assert_eq!(node.metadata().namespace(), None);
    }

    #[test]
    fn test_apply_schema_touches_only_overridden_kinds() {
        let profile = SchemaProfile::new().with_api_version(Kind::CronJob, "batch/v1beta1");
        let mut cron: AnyManifest = CronJob::new().into();
        assert!(cron.apply_schema(&profile));
        assert_eq!(cron.api_version(), "batch/v1beta1");
        assert!(!cron.apply_schema(&profile));

        let mut job: AnyManifest = Job::new().into();
        assert!(!job.apply_schema(&profile));
        assert_eq!(job.api_version(), "batch/v1");
    }
}
