// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use serde::{Deserialize, Serialize};

use super::parser::ParseOutcome;

pub const NOT_IDENTIFIED: &str = "Not Identified";
pub const PARSING_FAILED: &str = "Parsing Failed";
pub const NO_TREATMENT_FOUND: &str = "No specific treatment found.";
pub const TREATMENT_EXTRACTION_ERROR: &str = "Error extracting treatment information.";
pub const NO_CONTEXT_ANSWER: &str = "I'm sorry, I couldn't find any relevant information for the symptoms provided. Please consult a doctor for a proper diagnosis.";
pub const NO_CONTEXT_TREATMENT: &str = "- Seek medical attention\n- Avoid self-diagnosis\n- Maintain symptom log\n- Visit nearest hospital if symptoms worsen";

/// Structured triage answer returned to the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriageResult {
    pub department: String,
    pub answer: String,
    pub treatment: String,
}

impl TriageResult {
    /// Shape a parse outcome into the response fields
    ///
    /// Parsed sections are joined in order of appearance: departments and
    /// explanations with `", "`, treatment blocks with a newline. The two
    /// failure variants degrade to sentinel departments and carry the raw
    /// completion as the answer.
    pub fn from_outcome(outcome: ParseOutcome) -> Self {
        match outcome {
            ParseOutcome::Parsed(sections) => Self {
                department: sections
                    .iter()
                    .map(|s| s.department.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
                answer: sections
                    .iter()
                    .map(|s| s.explanation.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
                treatment: sections
                    .iter()
                    .map(|s| s.render_treatment())
                    .collect::<Vec<_>>()
                    .join("\n"),
            },
            ParseOutcome::Unparsed { raw } => Self {
                department: NOT_IDENTIFIED.to_string(),
                answer: raw,
                treatment: NO_TREATMENT_FOUND.to_string(),
            },
            ParseOutcome::Malformed { raw, .. } => Self {
                department: PARSING_FAILED.to_string(),
                answer: raw,
                treatment: TREATMENT_EXTRACTION_ERROR.to_string(),
            },
        }
    }

    /// Answer used when retrieval surfaces nothing
    pub fn no_context() -> Self {
        Self {
            department: NOT_IDENTIFIED.to_string(),
            answer: NO_CONTEXT_ANSWER.to_string(),
            treatment: NO_CONTEXT_TREATMENT.to_string(),
        }
    }
}
