// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Version information for the symptom triage service

/// Semantic version number
pub const VERSION_NUMBER: &str = env!("CARGO_PKG_VERSION");

/// Build date
pub const BUILD_DATE: &str = "2025-10-13";

/// Get formatted version string for logging
pub fn get_version_string() -> String {
    format!("Symptom Triage {} ({})", VERSION_NUMBER, BUILD_DATE)
}
