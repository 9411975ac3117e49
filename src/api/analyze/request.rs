// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! AnalyzeRequest type for POST /analyze
//!
//! Only `symptoms` is required. `age` is coerced leniently: integers, floats
//! (truncated toward zero) and numeric strings are all accepted.

use crate::api::ApiError;
use crate::triage::{PatientQuery, DEFAULT_AGE, DEFAULT_GENDER};
use serde::{Deserialize, Serialize};

/// Request body for POST /analyze
///
/// # Example
/// ```json
/// {
///   "symptoms": "ear pain and itchy rash",
///   "age": 45,
///   "gender": "female"
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    /// Free-text symptom description
    #[serde(default)]
    pub symptoms: Option<String>,

    /// Patient age in years
    /// Default: 30
    #[serde(default)]
    pub age: Option<AgeValue>,

    /// Patient gender
    /// Default: "Male"
    #[serde(default)]
    pub gender: Option<String>,
}

/// Any JSON shape an age is accepted in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AgeValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl AgeValue {
    pub fn to_years(&self) -> Result<i64, ApiError> {
        match self {
            AgeValue::Integer(age) => Ok(*age),
            AgeValue::Float(age) if age.is_finite() => Ok(age.trunc() as i64),
            AgeValue::Float(age) => Err(invalid_age(age)),
            AgeValue::Text(text) => text.trim().parse::<i64>().map_err(|_| invalid_age(text)),
        }
    }
}

fn invalid_age(value: impl std::fmt::Display) -> ApiError {
    ApiError::InvalidRequest(format!("Invalid age: {}", value))
}

impl AnalyzeRequest {
    /// Validates the request and converts it to a pipeline query
    ///
    /// # Validation Rules
    /// 1. **symptoms**: Must be present and not empty or whitespace-only
    /// 2. **age**: Must be a whole number, a finite float or a numeric string
    pub fn into_query(self) -> Result<PatientQuery, ApiError> {
        let symptoms = self
            .symptoms
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ApiError::InvalidRequest("No symptoms provided".to_string()))?;

        let age = match &self.age {
            Some(value) => value.to_years()?,
            None => DEFAULT_AGE,
        };

        let gender = self
            .gender
            .filter(|g| !g.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_GENDER.to_string());

        Ok(PatientQuery::new(symptoms, Some(age), Some(gender)))
    }
}
