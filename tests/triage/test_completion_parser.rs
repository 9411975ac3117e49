// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Completion parsing tests with realistic model output

use symptom_triage::triage::{
    CompletionParser, ParseOutcome, RegexCompletionParser, TriageResult,
};

fn parse(completion: &str) -> TriageResult {
    TriageResult::from_outcome(RegexCompletionParser::new().parse(completion))
}

#[test]
fn test_sections_surrounded_by_prose() {
    let completion = r#"Based on the symptoms, here is my assessment.

---
Department: Gastroenterology
Explanation: Abdominal pain after meals and bloating suggest a digestive issue.
Treatment:
- Eat smaller meals
- Avoid spicy food
---

---
Department: Psychiatry
Explanation: Persistent low mood and poor sleep may indicate depression.
Treatment:
- Keep a regular sleep schedule
- Talk to a mental health professional
---

Please consult a doctor."#;

    let result = parse(completion);

    assert_eq!(result.department, "Gastroenterology, Psychiatry");
    assert_eq!(
        result.answer,
        "Abdominal pain after meals and bloating suggest a digestive issue., Persistent low mood and poor sleep may indicate depression."
    );
    assert_eq!(
        result.treatment,
        "\nDepartment: Gastroenterology\n- Eat smaller meals\n- Avoid spicy food\n\nDepartment: Psychiatry\n- Keep a regular sleep schedule\n- Talk to a mental health professional"
    );
}

#[test]
fn test_single_section_without_closing_rule() {
    let result = parse("---\nDepartment: Orthopedics\nExplanation: Knee pain.\nTreatment:\n- Rest\n- Ice");

    assert_eq!(result.department, "Orthopedics");
    assert_eq!(result.treatment, "\nDepartment: Orthopedics\n- Rest\n- Ice");
}

#[test]
fn test_multiline_explanation_is_kept() {
    let completion = "---\nDepartment: Neurology\nExplanation: Frequent headaches\nwith dizziness.\nTreatment:\n- Stay hydrated\n---";
    let ParseOutcome::Parsed(sections) = RegexCompletionParser::new().parse(completion) else {
        panic!("expected parsed outcome");
    };

    assert_eq!(sections[0].explanation, "Frequent headaches\nwith dizziness.");
}

#[test]
fn test_plain_refusal_passes_through() {
    let completion = "I cannot provide medical advice. Please see a doctor.";

    let result = parse(&format!("\n  {}\n", completion));

    assert_eq!(result.department, "Not Identified");
    assert_eq!(result.answer, completion);
    assert_eq!(result.treatment, "No specific treatment found.");
}

#[test]
fn test_empty_explanation_is_parsing_failure() {
    let completion = "---\nDepartment: ENT\nExplanation:\nTreatment:\n- Rest\n---";

    let result = parse(completion);

    assert_eq!(result.department, "Parsing Failed");
    assert_eq!(result.answer, completion);
    assert_eq!(result.treatment, "Error extracting treatment information.");
}
