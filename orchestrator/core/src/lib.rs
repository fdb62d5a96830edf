// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! kmanifest core
//!
//! Builds Kubernetes manifests through validated setters and encodes them
//! as canonical YAML.
//!
//! # Architecture
//!
//! - **Layer:** Core System
//! - **Purpose:** Object model (domain) plus encoder and parser (infrastructure)

pub mod domain;
pub mod infrastructure;

pub use domain::*;
