// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Triage prompt composition
//!
//! The prompt is a single fixed template. Identical inputs always render an
//! identical prompt; nothing is truncated or budgeted.

use std::fmt;

use crate::rag::RetrievedPassage;

/// Coarse age bracket used in the patient profile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgeGroup {
    Young,
    Adult,
    Elderly,
}

impl AgeGroup {
    pub fn from_age(age: i64) -> Self {
        if age < 20 {
            AgeGroup::Young
        } else if age < 60 {
            AgeGroup::Adult
        } else {
            AgeGroup::Elderly
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AgeGroup::Young => "Young",
            AgeGroup::Adult => "Adult",
            AgeGroup::Elderly => "Elderly",
        }
    }
}

impl fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Upper-case the first character, lower-case the rest
pub fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Demographic line rendered into the prompt, e.g. `Adult Female`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatientProfile {
    pub age_group: AgeGroup,
    pub gender: String,
}

impl PatientProfile {
    pub fn new(age: i64, gender: &str) -> Self {
        Self {
            age_group: AgeGroup::from_age(age),
            gender: capitalize(gender),
        }
    }
}

impl fmt::Display for PatientProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.age_group, self.gender)
    }
}

const PROMPT_TASK_AND_EXAMPLES: &str = r#"Your task:
1. Analyze the symptoms individually.
2. Match each symptom with the most appropriate medical department from the knowledge base.
3. For each department, explain briefly why it's relevant.
4. Extract only relevant treatment steps from the context for that department.

Use the format shown in these examples:
Symptoms : Chest Pain , Knee Pain
---
Department: Cardiology
Explanation: The patient is experiencing chest pain, which may indicate heart-related issues. Cardiology specializes in diagnosing and treating such symptoms.
Treatment:
- Avoid physical exertion
- Monitor blood pressure regularly
- Schedule an ECG with a cardiologist
---

---
Department: Orthopedics
Explanation: Knee pain is typically treated under orthopedics, which deals with joint and musculoskeletal conditions.
Treatment:
- Rest and avoid weight-bearing activity
- Apply ice to reduce swelling
- Consult an orthopedic doctor for examination
---

Now analyze the patient's current symptoms. Repeat the format above for each relevant department.
NOTE:
For each symptom, please check for department. If you find different departments then give their answer separately.
Do not mention the word "context" or how you found the result.
Do not mix treatments or explanations from different departments in one section.
Only output sections for departments clearly supported by the reference material.
"#;

/// Renders the triage instruction prompt
#[derive(Debug, Clone, Default)]
pub struct PromptComposer;

impl PromptComposer {
    pub fn new() -> Self {
        Self
    }

    /// Passages rendered as `title:\ncontent`, separated by blank lines
    pub fn render_context(passages: &[RetrievedPassage]) -> String {
        passages
            .iter()
            .map(|p| format!("{}:\n{}", p.title, p.content))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    pub fn compose(
        &self,
        symptoms: &str,
        profile: &PatientProfile,
        passages: &[RetrievedPassage],
    ) -> String {
        format!(
            "\nYou are a medical assistant AI helping to triage a patient based on symptoms and demographic information.\n\n\
             Patient's Symptoms: \"{symptoms}\"\n\
             Age and Gender: {profile}\n\n\
             Refer only to the following medical knowledge base:\n\
             {context}\n\n\
             {rest}",
            symptoms = symptoms,
            profile = profile,
            context = Self::render_context(passages),
            rest = PROMPT_TASK_AND_EXAMPLES,
        )
    }
}
