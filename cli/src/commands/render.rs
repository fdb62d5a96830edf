// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Render command
//!
//! Parses manifest files, applies configured defaults, checks each manifest
//! and prints the canonical encoding.

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use std::io::Write;
use std::path::PathBuf;

use kmanifest_core::domain::config::ManifestConfig;
use kmanifest_core::domain::manifest::AnyManifest;
use kmanifest_core::infrastructure::{ManifestEncoder, ManifestParser};

#[derive(Args)]
pub struct RenderArgs {
    /// Manifest files (multi-document YAML)
    #[arg(value_name = "FILE", required = true)]
    pub files: Vec<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Yaml)]
    pub output: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Yaml,
    Json,
}

pub fn execute(args: RenderArgs, config_override: Option<PathBuf>) -> Result<()> {
    let config = ManifestConfig::load_or_default(config_override)
        .context("Failed to load configuration")?;

    let manifests = load_manifests(&args.files, &config)?;
    let bytes = render(&manifests, args.output, &config)?;

    std::io::stdout()
        .write_all(&bytes)
        .context("Failed to write rendered manifests")?;
    Ok(())
}

/// Parses every file in order, then applies the configured namespace and
/// schema overrides and runs the submission checks.
pub fn load_manifests(files: &[PathBuf], config: &ManifestConfig) -> Result<Vec<AnyManifest>> {
    let mut manifests = Vec::new();
    for file in files {
        manifests.extend(ManifestParser::parse_file(file)?);
    }

    if let Some(namespace) = config.default_namespace() {
        let changed = ManifestParser::apply_default_namespace(&mut manifests, namespace);
        tracing::debug!(changed, namespace, "Applied default namespace");
    }
    for manifest in &mut manifests {
        manifest.apply_schema(config.schema());
    }

    for manifest in &manifests {
        ManifestParser::check_submission(manifest)?;
    }
    Ok(manifests)
}

/// JSON output is a single object for one manifest and an array otherwise.
pub fn render(
    manifests: &[AnyManifest],
    format: OutputFormat,
    config: &ManifestConfig,
) -> Result<Vec<u8>> {
    let encoder = ManifestEncoder::new(config.spec.encoder.clone());
    let bytes = match (format, manifests) {
        (OutputFormat::Yaml, _) => encoder.encode_all(manifests)?,
        (OutputFormat::Json, [single]) => encoder.encode_json(single)?,
        (OutputFormat::Json, _) => encoder.encode_json(manifests)?,
    };
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kmanifest_core::domain::kind::Kind;
    use kmanifest_core::domain::schema::SchemaProfile;

    const DEPLOYMENT: &str = r#"apiVersion: apps/v1
kind: Deployment
metadata:
  name: web
spec:
  replicas: 2
  selector:
    matchLabels:
      app: web
  template:
    metadata:
      labels:
        app: web
    spec:
      containers:
      - name: nginx
        image: nginx:1.25
"#;

    fn write_manifest(dir: &tempfile::TempDir, name: &str, body: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_load_applies_namespace_and_schema() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_manifest(&dir, "web.yaml", DEPLOYMENT);
        let mut config = ManifestConfig::default();
        config.spec.default_namespace = Some("apps".to_string());
        config.spec.schema =
            SchemaProfile::new().with_api_version(Kind::Deployment, "extensions/v1beta1");

        let manifests = load_manifests(&[path], &config).unwrap();
        assert_eq!(manifests.len(), 1);
        assert_eq!(manifests[0].metadata().namespace(), Some("apps"));
        assert_eq!(manifests[0].api_version(), "extensions/v1beta1");
    }

    #[test]
    fn test_render_yaml_is_canonical() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_manifest(&dir, "web.yaml", DEPLOYMENT);
        let config = ManifestConfig::default();
        let manifests = load_manifests(&[path], &config).unwrap();

        let yaml = String::from_utf8(render(&manifests, OutputFormat::Yaml, &config).unwrap()).unwrap();
        assert!(yaml.starts_with("apiVersion: apps/v1\nkind: Deployment\nmetadata:\n  name: web\n"), "{yaml}");
        assert!(yaml.contains("replicas: 2"));
    }

    #[test]
    fn test_render_json_shapes() {
        let dir = tempfile::tempdir().unwrap();
        let one = write_manifest(&dir, "web.yaml", DEPLOYMENT);
        let two = write_manifest(
            &dir,
            "ns.yaml",
            "apiVersion: v1\nkind: Namespace\nmetadata:\n  name: apps\n",
        );
        let config = ManifestConfig::default();

        let single = load_manifests(&[one.clone()], &config).unwrap();
        let json: serde_json::Value =
            serde_json::from_slice(&render(&single, OutputFormat::Json, &config).unwrap()).unwrap();
        assert_eq!(json["kind"], "Deployment");

        let both = load_manifests(&[one, two], &config).unwrap();
        let json: serde_json::Value =
            serde_json::from_slice(&render(&both, OutputFormat::Json, &config).unwrap()).unwrap();
        assert_eq!(json.as_array().map(Vec::len), Some(2));
        assert_eq!(json[1]["kind"], "Namespace");
    }

    #[test]
    fn test_submission_check_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_manifest(
            &dir,
            "node.yaml",
            "apiVersion: v1\nkind: Node\nmetadata:\n  name: n1\n  namespace: default\n",
        );
        let err = load_manifests(&[path], &ManifestConfig::default()).unwrap_err();
        assert!(err.to_string().contains("not ready for submission"), "{err}");
    }
}
