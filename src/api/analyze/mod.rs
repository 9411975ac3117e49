// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Symptom analysis API
//!
//! This module provides the POST /analyze endpoint.

pub mod handler;
pub mod request;
pub mod response;

pub use handler::analyze_handler;
pub use request::{AgeValue, AnalyzeRequest};
pub use response::AnalyzeResponse;
