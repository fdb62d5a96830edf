// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! # kmanifest CLI
//!
//! The `kmanifest` binary checks and canonicalizes Kubernetes manifests
//! using the typed builders in `kmanifest-core`.
//!
//! ## Commands
//!
//! - `kmanifest render <FILE>...` - Parse, check and re-encode manifests
//! - `kmanifest validate <FILE>...` - Parse and check manifests
//! - `kmanifest kinds` - List supported kinds and their apiVersions
//! - `kmanifest config show|validate|generate` - Configuration management

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

use kmanifest_cli::commands::{self, ConfigCommand, KindsArgs, RenderArgs, ValidateArgs};

/// kmanifest - Build, check and render Kubernetes manifests
#[derive(Parser)]
#[command(name = "kmanifest")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file (overrides discovery)
    #[arg(
        short,
        long,
        global = true,
        env = "KMANIFEST_CONFIG_PATH",
        value_name = "FILE"
    )]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "KMANIFEST_LOG_LEVEL", default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse, check and re-encode manifest files canonically
    #[command(name = "render")]
    Render(RenderArgs),

    /// Parse and check manifest files without printing them
    #[command(name = "validate")]
    Validate(ValidateArgs),

    /// List supported manifest kinds
    #[command(name = "kinds")]
    Kinds(KindsArgs),

    /// Configuration management
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli.log_level)?;

    match cli.command {
        Some(Commands::Render(args)) => commands::render::execute(args, cli.config),
        Some(Commands::Validate(args)) => commands::validate::execute(args, cli.config),
        Some(Commands::Kinds(args)) => commands::kinds::execute(args, cli.config),
        Some(Commands::Config { command }) => commands::config::handle_command(command, cli.config),
        None => {
            eprintln!("{}", "No command specified. Use --help for usage.".yellow());
            std::process::exit(1);
        }
    }
}

/// Initialize tracing subscriber for logging
fn init_logging(level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))
        .context("Failed to create log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    Ok(())
}
