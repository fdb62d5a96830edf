// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Validate command
//!
//! Runs the same parse and submission checks as `render`, file by file,
//! and reports each result.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use kmanifest_core::domain::config::ManifestConfig;

use super::render::load_manifests;

#[derive(Args)]
pub struct ValidateArgs {
    /// Manifest files (multi-document YAML)
    #[arg(value_name = "FILE", required = true)]
    pub files: Vec<PathBuf>,
}

pub fn execute(args: ValidateArgs, config_override: Option<PathBuf>) -> Result<()> {
    let config = ManifestConfig::load_or_default(config_override)
        .context("Failed to load configuration")?;

    let failed = validate_files(&args.files, &config);
    if failed > 0 {
        anyhow::bail!("{} of {} files failed validation", failed, args.files.len());
    }
    Ok(())
}

/// Prints one line per file and returns how many failed.
pub fn validate_files(files: &[PathBuf], config: &ManifestConfig) -> usize {
    let mut failed = 0;
    for file in files {
        match load_manifests(std::slice::from_ref(file), config) {
            Ok(manifests) => {
                println!(
                    "{} {} ({} manifests)",
                    "✓".green(),
                    file.display(),
                    manifests.len()
                );
            }
            Err(e) => {
                failed += 1;
                println!("{} {}: {:#}", "✗".red(), file.display(), e);
            }
        }
    }
    failed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_failed_files() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.yaml");
        std::fs::write(&good, "apiVersion: v1\nkind: Namespace\nmetadata:\n  name: apps\n").unwrap();
        let unknown = dir.path().join("unknown.yaml");
        std::fs::write(&unknown, "apiVersion: v1\nkind: Widget\nmetadata:\n  name: w\n").unwrap();
        let missing = dir.path().join("missing.yaml");

        let config = ManifestConfig::default();
        assert_eq!(validate_files(&[good.clone()], &config), 0);
        assert_eq!(validate_files(&[good, unknown, missing], &config), 2);
    }

    #[test]
    fn test_setter_rules_and_unknown_fields_fail_files() {
        let dir = tempfile::tempdir().unwrap();
        let negative = dir.path().join("negative.yaml");
        std::fs::write(
            &negative,
            "apiVersion: apps/v1\nkind: ReplicaSet\nmetadata:\n  name: rs\nspec:\n  replicas: -1\n  selector:\n    matchLabels:\n      app: rs\n  template:\n    metadata:\n      labels:\n        app: rs\n    spec:\n      containers:\n      - name: app\n        image: app:1\n",
        )
        .unwrap();
        let extra = dir.path().join("extra.yaml");
        std::fs::write(
            &extra,
            "apiVersion: v1\nkind: ConfigMap\nmetadata:\n  name: cm\n  generateName: cm-\ndata:\n  a: b\n",
        )
        .unwrap();

        let config = ManifestConfig::default();
        assert_eq!(validate_files(&[negative, extra], &config), 2);
    }
}
