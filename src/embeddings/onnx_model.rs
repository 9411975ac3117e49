// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! ONNX sentence-transformer embedding model
//!
//! Wraps ONNX Runtime for models such as `all-mpnet-base-v2` exported to ONNX.
//!
//! - BERT-style tokenization via `tokenizers`
//! - Attention-masked mean pooling over token embeddings
//! - Output dimension discovered from a validation inference at load time

use anyhow::{anyhow, Context, Result};
use ndarray::{Array2, Array3, ArrayView2, Axis, Ix3};
use ort::execution_providers::CPUExecutionProvider;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Value;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tokenizers::Tokenizer;
use tracing::info;

/// Tokenized batch ready for inference, padded to a common length
struct EncodedBatch {
    input_ids: Array2<i64>,
    attention_mask: Array2<i64>,
    token_type_ids: Array2<i64>,
}

/// ONNX-based sentence embedding model
///
/// # Thread Safety
/// The session sits behind `Arc<Mutex>` because inference needs `&mut Session`;
/// cloning the model shares the same session.
#[derive(Clone)]
pub struct OnnxEmbeddingModel {
    session: Arc<Mutex<Session>>,
    tokenizer: Arc<Tokenizer>,
    model_name: String,
    dimension: usize,
    /// MPNet exports take no `token_type_ids`; BERT exports do
    uses_token_type_ids: bool,
}

impl std::fmt::Debug for OnnxEmbeddingModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxEmbeddingModel")
            .field("model_name", &self.model_name)
            .field("dimension", &self.dimension)
            .field("uses_token_type_ids", &self.uses_token_type_ids)
            .finish_non_exhaustive()
    }
}

impl OnnxEmbeddingModel {
    /// Creates a new ONNX embedding model from disk paths
    ///
    /// # Errors
    /// Returns error if:
    /// - Model or tokenizer file not found or invalid
    /// - ONNX Runtime initialization fails
    /// - Model output is not `[batch, seq_len, hidden]`
    ///
    /// # Example
    /// ```ignore
    /// let model = OnnxEmbeddingModel::new(
    ///     "sentence-transformers/all-mpnet-base-v2",
    ///     "./models/all-mpnet-base-v2/model.onnx",
    ///     "./models/all-mpnet-base-v2/tokenizer.json",
    /// ).await?;
    /// ```
    pub async fn new<P: AsRef<Path>>(
        model_name: impl Into<String>,
        model_path: P,
        tokenizer_path: P,
    ) -> Result<Self> {
        let model_name = model_name.into();
        let model_path = model_path.as_ref();
        let tokenizer_path = tokenizer_path.as_ref();

        if !model_path.exists() {
            anyhow::bail!("ONNX model file not found: {}", model_path.display());
        }
        if !tokenizer_path.exists() {
            anyhow::bail!("Tokenizer file not found: {}", tokenizer_path.display());
        }

        info!("Loading ONNX embedding model {} from {}", model_name, model_path.display());

        let mut session = Session::builder()
            .context("Failed to create session builder")?
            .with_execution_providers([CPUExecutionProvider::default().build()])
            .context("Failed to set CPU execution provider")?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .context("Failed to set optimization level")?
            .with_intra_threads(4)
            .context("Failed to set intra threads")?
            .commit_from_file(model_path)
            .context(format!(
                "Failed to load ONNX model from {}",
                model_path.display()
            ))?;

        let uses_token_type_ids = session
            .inputs
            .iter()
            .any(|input| input.name == "token_type_ids");

        let tokenizer = Tokenizer::from_file(tokenizer_path)
            .map_err(|e| anyhow!("Failed to load tokenizer: {}", e))?;

        // Discover the hidden size with one validation inference
        let dimension = {
            let batch = encode_batch(&tokenizer, &["validation test".to_string()])?;
            let output = infer(&mut session, batch, uses_token_type_ids)?;
            let hidden = output.shape()[2];
            if hidden == 0 {
                anyhow::bail!("Model outputs an empty hidden dimension");
            }
            hidden
        };

        info!("ONNX embedding model loaded ({} dimensions)", dimension);

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            tokenizer: Arc::new(tokenizer),
            model_name,
            dimension,
            uses_token_type_ids,
        })
    }

    /// Generates embedding for a single text
    pub async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut embeddings = self.embed_batch(&[text.to_string()]).await?;
        embeddings
            .pop()
            .ok_or_else(|| anyhow!("Model returned no embedding"))
    }

    /// Generates embeddings for multiple texts in one inference call
    ///
    /// Texts are padded to the longest sequence in the batch; padding is
    /// excluded from pooling by the attention mask.
    pub async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        let batch = encode_batch(&self.tokenizer, texts)?;
        let attention_mask = batch.attention_mask.clone();

        let output_array = {
            let mut session_guard = self
                .session
                .lock()
                .map_err(|_| anyhow!("Embedding session lock poisoned"))?;
            infer(&mut session_guard, batch, self.uses_token_type_ids)?
        };

        let mut embeddings: Vec<Vec<f32>> = Vec::with_capacity(texts.len());
        for batch_idx in 0..texts.len() {
            let token_embeddings = output_array.index_axis(Axis(0), batch_idx);
            let mask = attention_mask.row(batch_idx);
            embeddings.push(mean_pool(token_embeddings, mask.as_slice().unwrap_or(&[])));
        }

        for (i, emb) in embeddings.iter().enumerate() {
            if emb.len() != self.dimension {
                anyhow::bail!(
                    "Unexpected embedding dimension at index {}: {} (expected {})",
                    i,
                    emb.len(),
                    self.dimension
                );
            }
        }

        Ok(embeddings)
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }
}

fn encode_batch(tokenizer: &Tokenizer, texts: &[String]) -> Result<EncodedBatch> {
    let encodings: Vec<_> = texts
        .iter()
        .map(|text| {
            tokenizer
                .encode(text.as_str(), true)
                .map_err(|e| anyhow!("Tokenization failed: {}", e))
        })
        .collect::<Result<Vec<_>>>()?;

    let max_len = encodings
        .iter()
        .map(|enc| enc.get_ids().len())
        .max()
        .unwrap_or(0);

    let mut input_ids = Vec::with_capacity(texts.len() * max_len);
    let mut attention_mask = Vec::with_capacity(texts.len() * max_len);

    for encoding in &encodings {
        let ids = encoding.get_ids();
        let mask = encoding.get_attention_mask();

        input_ids.extend(ids.iter().map(|&id| id as i64));
        attention_mask.extend(mask.iter().map(|&m| m as i64));

        let padding_needed = max_len - ids.len();
        input_ids.extend(std::iter::repeat(0i64).take(padding_needed));
        attention_mask.extend(std::iter::repeat(0i64).take(padding_needed));
    }

    Ok(EncodedBatch {
        input_ids: Array2::from_shape_vec((texts.len(), max_len), input_ids)
            .context("Failed to create input_ids array")?,
        attention_mask: Array2::from_shape_vec((texts.len(), max_len), attention_mask)
            .context("Failed to create attention_mask array")?,
        token_type_ids: Array2::zeros((texts.len(), max_len)),
    })
}

/// Run the model and copy out token embeddings as `[batch, seq_len, hidden]`
fn infer(
    session: &mut Session,
    batch: EncodedBatch,
    uses_token_type_ids: bool,
) -> Result<Array3<f32>> {
    let outputs = if uses_token_type_ids {
        session.run(ort::inputs![
            "input_ids" => Value::from_array(batch.input_ids)?,
            "attention_mask" => Value::from_array(batch.attention_mask)?,
            "token_type_ids" => Value::from_array(batch.token_type_ids)?
        ])?
    } else {
        session.run(ort::inputs![
            "input_ids" => Value::from_array(batch.input_ids)?,
            "attention_mask" => Value::from_array(batch.attention_mask)?
        ])?
    };

    // Index [0] rather than a name: exports differ in output naming
    let output_tensor = outputs[0]
        .try_extract_array::<f32>()
        .context("Failed to extract output tensor")?;
    let shape = output_tensor.shape().to_vec();

    output_tensor
        .to_owned()
        .into_dimensionality::<Ix3>()
        .map_err(|_| {
            anyhow!(
                "Model outputs unexpected dimensions: {:?} (expected [batch, seq_len, hidden])",
                shape
            )
        })
}

/// Average token embeddings weighted by the attention mask
fn mean_pool(token_embeddings: ArrayView2<'_, f32>, mask: &[i64]) -> Vec<f32> {
    let seq_len = token_embeddings.shape()[0];
    let hidden_dim = token_embeddings.shape()[1];

    let mut pooled = vec![0.0f32; hidden_dim];
    let mut sum_mask = 0.0f32;

    for i in 0..seq_len {
        let mask_value = mask.get(i).copied().unwrap_or(0) as f32;
        sum_mask += mask_value;
        for j in 0..hidden_dim {
            pooled[j] += token_embeddings[[i, j]] * mask_value;
        }
    }

    for val in &mut pooled {
        *val /= sum_mask.max(1e-9);
    }

    pooled
}
