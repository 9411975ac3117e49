// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Extraction of department sections from a free-text completion
//!
//! The completion comes from a hosted model and is treated as untrusted
//! input: any text yields a [`ParseOutcome`], never a panic or an error.

use regex::Regex;
use serde::Serialize;
use tracing::{debug, warn};

/// Repeated `--- Department: / Explanation: / Treatment:` blocks.
/// Bullet lines are matched without dot-all so a block stops at its last bullet.
const SECTION_PATTERN: &str =
    r"(?s)---\s*Department:\s*(.*?)\s*Explanation:\s*(.*?)\s*Treatment:\s*((?-s:- .+\n?)*)";

/// One parsed block of the completion
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepartmentSection {
    pub department: String,
    pub explanation: String,
    /// Bullet texts without the leading `- `
    pub treatments: Vec<String>,
}

impl DepartmentSection {
    /// `\nDepartment: {dept}\n- a\n- b`
    pub fn render_treatment(&self) -> String {
        let bullets = self
            .treatments
            .iter()
            .map(|t| format!("- {}", t))
            .collect::<Vec<_>>()
            .join("\n");
        format!("\nDepartment: {}\n{}", self.department, bullets)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    /// At least one well-formed section, in order of appearance
    Parsed(Vec<DepartmentSection>),
    /// No section markers found
    Unparsed { raw: String },
    /// Markers found but a section could not be extracted
    Malformed { raw: String, reason: String },
}

/// Turns a raw completion into structured sections
pub trait CompletionParser: Send + Sync {
    fn parse(&self, completion: &str) -> ParseOutcome;
}

/// Regex-based parser for the `---`-delimited section format
#[derive(Debug, Clone)]
pub struct RegexCompletionParser {
    pattern: Regex,
}

impl RegexCompletionParser {
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(SECTION_PATTERN).expect("section pattern compiles"),
        }
    }
}

impl Default for RegexCompletionParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Lines starting with `-`, with surrounding dashes and spaces removed
fn normalize_bullets(block: &str) -> Vec<String> {
    block
        .trim()
        .lines()
        .filter(|line| line.trim().starts_with('-'))
        .map(|line| {
            line.trim_matches(|c: char| c == '-' || c == ' ')
                .trim()
                .to_string()
        })
        .collect()
}

impl CompletionParser for RegexCompletionParser {
    fn parse(&self, completion: &str) -> ParseOutcome {
        let raw = completion.trim();
        let mut sections = Vec::new();

        for caps in self.pattern.captures_iter(raw) {
            let department = caps.get(1).map_or("", |m| m.as_str()).trim();
            let explanation = caps.get(2).map_or("", |m| m.as_str()).trim();
            let bullets = caps.get(3).map_or("", |m| m.as_str());

            if department.is_empty() || explanation.is_empty() {
                let reason = format!(
                    "section {} has an empty {}",
                    sections.len() + 1,
                    if department.is_empty() { "department" } else { "explanation" }
                );
                warn!("Completion parse failed: {}", reason);
                return ParseOutcome::Malformed {
                    raw: raw.to_string(),
                    reason,
                };
            }

            sections.push(DepartmentSection {
                department: department.to_string(),
                explanation: explanation.to_string(),
                treatments: normalize_bullets(bullets),
            });
        }

        if sections.is_empty() {
            debug!("No department sections in completion ({} chars)", raw.len());
            return ParseOutcome::Unparsed {
                raw: raw.to_string(),
            };
        }

        debug!(
            "Parsed {} department sections: {:?}",
            sections.len(),
            sections.iter().map(|s| s.department.as_str()).collect::<Vec<_>>()
        );
        ParseOutcome::Parsed(sections)
    }
}
