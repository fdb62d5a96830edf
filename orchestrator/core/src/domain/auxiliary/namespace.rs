// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use crate::domain::kind::{Kind, TypeMeta};
use crate::domain::metadata::ObjectMeta;
use serde::{Deserialize, Serialize};

/// Cluster-scoped; carries only a name and labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Namespace {
    #[serde(flatten)]
    type_meta: TypeMeta,
    #[serde(default)]
    metadata: ObjectMeta,
}

impl Namespace {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            type_meta: TypeMeta::stable(Kind::Namespace),
            metadata: ObjectMeta::named(name),
        }
    }
}

impl_manifest!(Namespace);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::manifest::Manifest;
    use crate::domain::primitives::labels_from;

    #[test]
    fn test_namespace_document() {
        let mut ns = Namespace::new("monitoring");
        ns.set_labels(&labels_from([("team", "sre")])).unwrap();
        let yaml = serde_yaml::to_string(&ns).unwrap();
        assert_eq!(
            yaml,
            "apiVersion: v1\nkind: Namespace\nmetadata:\n  name: monitoring\n  labels:\n    team: sre\n"
        );
    }
}
