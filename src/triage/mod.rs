// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Symptom triage: prompt composition, completion parsing and the pipeline
//! that ties retrieval and generation together

pub mod parser;
pub mod prompt;
pub mod result;
pub mod service;

pub use parser::{CompletionParser, DepartmentSection, ParseOutcome, RegexCompletionParser};
pub use prompt::{capitalize, AgeGroup, PatientProfile, PromptComposer};
pub use result::TriageResult;
pub use service::{PatientQuery, TriageError, TriageService, DEFAULT_AGE, DEFAULT_GENDER};
