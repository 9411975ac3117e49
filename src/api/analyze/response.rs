// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! AnalyzeResponse type for POST /analyze

use crate::triage::TriageResult;
use serde::{Deserialize, Serialize};

/// Response body for POST /analyze
///
/// # Example
/// ```json
/// {
///   "department": "ENT, Dermatology",
///   "answer": "Ear pain ..., The rash ...",
///   "treatment": "\nDepartment: ENT\n- Keep the ear dry\n\nDepartment: Dermatology\n- Avoid scratching"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub department: String,
    pub answer: String,
    pub treatment: String,
}

impl From<TriageResult> for AnalyzeResponse {
    fn from(result: TriageResult) -> Self {
        Self {
            department: result.department,
            answer: result.answer,
            treatment: result.treatment,
        }
    }
}
