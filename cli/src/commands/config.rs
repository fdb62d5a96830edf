// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Configuration management commands
//!
//! Commands: show, validate, generate

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use std::path::{Path, PathBuf};

use kmanifest_core::domain::config::ManifestConfig;
use kmanifest_core::domain::kind::Kind;
use kmanifest_core::domain::schema::SchemaProfile;

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Show config file paths checked
        #[arg(long)]
        paths: bool,
    },

    /// Validate configuration file
    Validate {
        /// Path to config file (default: discover)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// Generate sample configuration
    Generate {
        /// Output path (default: ./kmanifest.yaml)
        #[arg(short, long, default_value = "./kmanifest.yaml")]
        output: PathBuf,

        /// Include example overrides
        #[arg(long)]
        examples: bool,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

pub fn handle_command(command: ConfigCommand, config_override: Option<PathBuf>) -> Result<()> {
    match command {
        ConfigCommand::Show { paths } => show(config_override, paths),
        ConfigCommand::Validate { file } => validate(file.or(config_override)),
        ConfigCommand::Generate {
            output,
            examples,
            force,
        } => generate(&output, examples, force),
    }
}

fn show(config_override: Option<PathBuf>, show_paths: bool) -> Result<()> {
    let config = ManifestConfig::load_or_default(config_override.clone())
        .context("Failed to load configuration")?;

    if show_paths {
        println!("{}", "Configuration discovery paths:".bold());
        if let Some(path) = &config_override {
            println!("  1. --config flag: {}", path.display());
        } else {
            println!("  1. --config flag: {}", "(not set)".dimmed());
        }
        println!(
            "  2. KMANIFEST_CONFIG_PATH: {}",
            std::env::var("KMANIFEST_CONFIG_PATH")
                .unwrap_or_else(|_| "(not set)".to_string())
                .dimmed()
        );
        println!("  3. ./kmanifest.yaml");
        println!("  4. ~/.kmanifest/config.yaml");
        println!("  5. /etc/kmanifest/config.yaml");
        if let Some(found) = ManifestConfig::discover_config() {
            println!("  Discovered: {}", found.display());
        }
        println!();
    }

    println!("{}", "Current configuration:".bold());
    println!();
    println!("  Name: {}", config.metadata.name);
    println!(
        "  Default namespace: {}",
        config.default_namespace().unwrap_or("(none)")
    );
    println!(
        "  Explicit document start: {}",
        config.spec.encoder.explicit_document_start
    );
    println!();

    println!("{}", "apiVersion overrides:".bold());
    if config.schema().overrides().is_empty() {
        println!("  {}", "(none)".dimmed());
    }
    for (kind, api_version) in config.schema().overrides() {
        println!(
            "  {} {} → {}",
            kind,
            kind.default_api_version().dimmed(),
            api_version
        );
    }
    println!();

    Ok(())
}

fn validate(config_path: Option<PathBuf>) -> Result<()> {
    println!("Validating configuration...");

    let config = ManifestConfig::load_or_default(config_path)
        .context("Failed to load configuration")?;

    config
        .validate()
        .context("Configuration validation failed")?;

    println!("{}", "✓ Configuration is valid".green());

    Ok(())
}

/// The document written by `config generate`.
pub fn sample_config(with_examples: bool) -> ManifestConfig {
    let mut config = ManifestConfig::default();
    if with_examples {
        config.spec.schema = SchemaProfile::new()
            .with_api_version(Kind::CronJob, "batch/v1beta1")
            .with_api_version(Kind::HorizontalPodAutoscaler, "autoscaling/v2beta2");
        config.spec.default_namespace = Some("default".to_string());
        config.spec.encoder.explicit_document_start = true;
    }
    config
}

fn generate(output: &Path, with_examples: bool, force: bool) -> Result<()> {
    if output.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite it.",
            output.display()
        );
    }

    sample_config(with_examples)
        .to_yaml_file(output)
        .with_context(|| format!("Failed to write config to {:?}", output))?;

    println!(
        "{}",
        format!("✓ Configuration generated: {}", output.display()).green()
    );

    Ok(())
}
