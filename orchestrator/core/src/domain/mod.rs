// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Domain
//!
//! The manifest object model: value types, shared metadata and builders for
//! every supported kind.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Typed, validated in-memory manifests; no I/O

pub mod error;
pub mod primitives;
pub mod kind;
pub mod schema;
pub mod metadata;
pub mod selector;
pub mod container;
pub mod volume;
pub mod pod_template;
#[macro_use]
pub mod manifest;
pub mod workload;
pub mod auxiliary;
pub mod config;
