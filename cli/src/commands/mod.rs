// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Command implementations for kmanifest CLI

pub mod config;
pub mod kinds;
pub mod render;
pub mod validate;

pub use self::config::ConfigCommand;
pub use self::kinds::KindsArgs;
pub use self::render::RenderArgs;
pub use self::validate::ValidateArgs;
