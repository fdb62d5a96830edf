// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Kinds command: lists every supported kind with the apiVersion the
//! current configuration builds it under.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use std::path::PathBuf;

use kmanifest_core::domain::config::ManifestConfig;
use kmanifest_core::domain::kind::Kind;
use kmanifest_core::domain::schema::{SchemaProfile, PROVISIONERS};

#[derive(Args)]
pub struct KindsArgs {
    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KindRow {
    pub kind: &'static str,
    pub api_version: String,
    pub namespaced: bool,
    pub workload: bool,
}

pub fn rows(profile: &SchemaProfile) -> Vec<KindRow> {
    Kind::ALL
        .iter()
        .map(|kind| KindRow {
            kind: kind.as_str(),
            api_version: profile.api_version(*kind).to_string(),
            namespaced: kind.is_namespaced(),
            workload: kind.is_workload(),
        })
        .collect()
}

pub fn execute(args: KindsArgs, config_override: Option<PathBuf>) -> Result<()> {
    let config = ManifestConfig::load_or_default(config_override)
        .context("Failed to load configuration")?;
    let rows = rows(config.schema());

    if args.json {
        let json = serde_json::to_string_pretty(&rows).context("Failed to encode kinds")?;
        println!("{}", json);
        return Ok(());
    }

    println!(
        "{:<26} {:<28} {}",
        "KIND".bold(),
        "API VERSION".bold(),
        "SCOPE".bold()
    );
    for row in &rows {
        let scope = if row.namespaced { "Namespaced" } else { "Cluster" };
        let api_version = if config.schema().overrides().keys().any(|k| k.as_str() == row.kind) {
            row.api_version.yellow().to_string()
        } else {
            row.api_version.clone()
        };
        println!("{:<26} {:<28} {}", row.kind, api_version, scope);
    }

    println!();
    println!("{}", "Provisioners:".bold());
    for (id, name) in PROVISIONERS {
        println!("  {} ({})", id, name);
    }
    Ok(())
}
