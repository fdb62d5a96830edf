// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Configuration discovery and environment overrides.
//!
//! Kept in a single test so the process environment is never mutated by two
//! tests at once.

use kmanifest_core::domain::config::ManifestConfig;
use kmanifest_core::domain::kind::Kind;
use kmanifest_core::domain::manifest::AnyManifest;
use kmanifest_core::domain::schema::SchemaProfile;
use kmanifest_core::domain::workload::Pod;
use kmanifest_core::infrastructure::ManifestParser;

#[test]
fn test_env_path_and_overrides() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("custom.yaml");

    let mut config = ManifestConfig::default();
    config.metadata.name = "discovered".to_string();
    config.spec.schema = SchemaProfile::new().with_api_version(Kind::Ingress, "extensions/v1beta1");
    config.to_yaml_file(&path).unwrap();

    std::env::set_var("KMANIFEST_CONFIG_PATH", &path);
    std::env::set_var("KMANIFEST_DEFAULT_NAMESPACE", "team-a");
    std::env::set_var("KMANIFEST_EXPLICIT_DOCUMENT_START", "yes");

    assert_eq!(ManifestConfig::discover_config(), Some(path.clone()));
    let loaded = ManifestConfig::load_or_default(None).unwrap();
    assert_eq!(loaded.metadata.name, "discovered");
    assert_eq!(loaded.schema().api_version(Kind::Ingress), "extensions/v1beta1");
    assert_eq!(loaded.default_namespace(), Some("team-a"));
    assert!(loaded.spec.encoder.explicit_document_start);
    loaded.validate().unwrap();

    let mut manifests: Vec<AnyManifest> = vec![Pod::new("p").into()];
    if let Some(ns) = loaded.default_namespace() {
        ManifestParser::apply_default_namespace(&mut manifests, ns);
    }
    assert_eq!(manifests[0].metadata().namespace(), Some("team-a"));

    // Invalid values are ignored, not applied.
    std::env::set_var("KMANIFEST_EXPLICIT_DOCUMENT_START", "sometimes");
    std::env::set_var("KMANIFEST_DEFAULT_NAMESPACE", "");
    let mut reloaded = ManifestConfig::from_yaml_file(&path).unwrap();
    reloaded.apply_env_overrides();
    assert!(!reloaded.spec.encoder.explicit_document_start);
    assert_eq!(reloaded.default_namespace(), None);

    std::env::remove_var("KMANIFEST_CONFIG_PATH");
    std::env::remove_var("KMANIFEST_DEFAULT_NAMESPACE");
    std::env::remove_var("KMANIFEST_EXPLICIT_DOCUMENT_START");
}
