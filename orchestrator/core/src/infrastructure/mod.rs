// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

pub mod manifest_encoder;
pub mod manifest_parser;

pub use manifest_encoder::ManifestEncoder;
pub use manifest_parser::ManifestParser;
