// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! End-to-end triage pipeline over the bundled knowledge base

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use symptom_triage::{
    config::TriageConfig,
    generation::{GenerationClient, GenerationError},
    rag::{load_knowledge_index, Retriever},
    triage::{PatientQuery, TriageService},
};

struct RecordingGenerator {
    completion: String,
    prompts: Mutex<Vec<String>>,
}

#[async_trait]
impl GenerationClient for RecordingGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.completion.clone())
    }

    fn model_name(&self) -> String {
        "recording".to_string()
    }
}

async fn setup(top_k: usize, completion: &str) -> (TriageService, Arc<RecordingGenerator>) {
    let mut config = TriageConfig::default();
    config.retrieval.top_k = top_k;

    let index = load_knowledge_index(&config).await.unwrap();
    let generator = Arc::new(RecordingGenerator {
        completion: completion.to_string(),
        prompts: Mutex::new(Vec::new()),
    });
    let service = TriageService::new(
        Retriever::new(Arc::new(index)),
        generator.clone(),
        config.retrieval.top_k,
    );
    (service, generator)
}

/// Passage headers look like `ENT - Ear Pain (Young Male):`
fn passage_count(prompt: &str) -> usize {
    prompt.lines().filter(|line| line.ends_with("):")).count()
}

#[tokio::test]
async fn test_prompt_holds_top_k_passages() {
    let completion = "---\nDepartment: ENT\nExplanation: Ear infection signs.\nTreatment:\n- Apply warm compress\n---";
    let (service, generator) = setup(6, completion).await;

    let result = service
        .analyze(&PatientQuery::new(
            "ear pain from an infection",
            Some(15),
            Some("male".to_string()),
        ))
        .await
        .unwrap();

    assert_eq!(result.department, "ENT");
    assert_eq!(result.treatment, "\nDepartment: ENT\n- Apply warm compress");

    let prompts = generator.prompts.lock().unwrap();
    assert_eq!(prompts.len(), 1);
    assert_eq!(passage_count(&prompts[0]), 6);
    assert!(prompts[0].contains("Age and Gender: Young Male"));
    assert!(prompts[0].contains("ENT - Ear Pain"));
}

#[tokio::test]
async fn test_configured_top_k_limits_passages() {
    let (service, generator) = setup(2, "no sections here").await;

    let result = service
        .analyze(&PatientQuery::new("trouble sleeping at night", None, None))
        .await
        .unwrap();

    assert_eq!(result.department, "Not Identified");
    assert_eq!(result.answer, "no sections here");

    let prompts = generator.prompts.lock().unwrap();
    assert_eq!(passage_count(&prompts[0]), 2);
    assert!(prompts[0].contains("Age and Gender: Adult Male"));
}
