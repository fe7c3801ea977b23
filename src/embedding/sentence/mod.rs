//! Sentence embedder (BERT + tokenizer, mean pooled).
//!
//! Use [`SentenceConfig::stub`] for tests/examples without model files.

/// Sentence embedder configuration.
pub mod config;

#[cfg(test)]
mod tests;

pub use config::SentenceConfig;

use candle_core::{Device, Tensor};
use tokenizers::Tokenizer;
use tracing::{debug, info, warn};

use crate::embedding::bert::{SentenceBert, l2_normalize};
use crate::embedding::device::select_device;
use crate::embedding::error::EmbeddingError;
use crate::embedding::loader::{ModelFiles, load_tokenizer};

enum EmbedderBackend {
    Model {
        model: SentenceBert,
        tokenizer: Tokenizer,
        device: Device,
    },
    Stub,
}

/// Embedding generator backed by a pretrained sentence model (supports stub mode).
pub struct SentenceEmbedder {
    backend: EmbedderBackend,
    config: SentenceConfig,
}

impl std::fmt::Debug for SentenceEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SentenceEmbedder")
            .field(
                "backend",
                &match &self.backend {
                    EmbedderBackend::Model { device, .. } => format!("Model({:?})", device),
                    EmbedderBackend::Stub => "Stub".to_string(),
                },
            )
            .field("model_id", &self.config.model_id)
            .field("dimension", &self.dimension())
            .field("max_seq_len", &self.config.max_seq_len)
            .finish()
    }
}

impl SentenceEmbedder {
    /// Loads the embedder from a config (stub mode is supported).
    pub fn load(config: SentenceConfig) -> Result<Self, EmbeddingError> {
        config.validate()?;

        if config.testing_stub {
            warn!("Sentence embedder running in STUB mode (testing only)");
            return Ok(Self {
                backend: EmbedderBackend::Stub,
                config,
            });
        }

        let device = select_device(config.device)?;
        debug!(?device, "Selected compute device for sentence embedder");

        let files = match &config.model_dir {
            Some(dir) => ModelFiles::from_dir(dir)?,
            None => ModelFiles::from_hub(&config.model_id, &config.revision)?,
        };

        let tokenizer = load_tokenizer(&files.tokenizer, config.max_seq_len)?;
        let model = SentenceBert::load(&files.config, &files.weights, &device).map_err(|e| {
            EmbeddingError::ModelLoadFailed {
                reason: format!(
                    "Failed to load BERT weights from {}: {}",
                    files.weights.path().display(),
                    e
                ),
            }
        })?;

        info!(
            model_id = %config.model_id,
            hidden_size = model.hidden_size(),
            num_layers = model.num_layers(),
            max_seq_len = config.max_seq_len,
            "Sentence model loaded"
        );

        Ok(Self {
            backend: EmbedderBackend::Model {
                model,
                tokenizer,
                device,
            },
            config,
        })
    }

    /// Generates an embedding for a single string.
    pub fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.embed_batch(&[text])?
            .into_iter()
            .next()
            .ok_or_else(|| EmbeddingError::InferenceFailed {
                reason: "model returned no embedding".to_string(),
            })
    }

    /// Generates embeddings for a batch of strings, preserving input order.
    pub fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        match &self.backend {
            EmbedderBackend::Model {
                model,
                tokenizer,
                device,
            } => {
                let mut results = Vec::with_capacity(texts.len());
                for chunk in texts.chunks(self.config.batch_size) {
                    results.extend(self.embed_chunk(chunk, model, tokenizer, device)?);
                }
                Ok(results)
            }
            EmbedderBackend::Stub => Ok(texts.iter().map(|text| self.embed_stub(text)).collect()),
        }
    }

    fn embed_chunk(
        &self,
        texts: &[&str],
        model: &SentenceBert,
        tokenizer: &Tokenizer,
        device: &Device,
    ) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let encodings = tokenizer.encode_batch(texts.to_vec(), true).map_err(|e| {
            EmbeddingError::TokenizationFailed {
                reason: e.to_string(),
            }
        })?;

        // Padding is batch-longest, so every encoding has the same length.
        let seq_len = encodings.first().map(|e| e.len()).unwrap_or(0);
        if seq_len == 0 {
            return Ok(vec![vec![0.0; model.hidden_size()]; texts.len()]);
        }

        let mut ids = Vec::with_capacity(texts.len() * seq_len);
        let mut mask = Vec::with_capacity(texts.len() * seq_len);
        for encoding in &encodings {
            ids.extend_from_slice(encoding.get_ids());
            mask.extend_from_slice(encoding.get_attention_mask());
        }

        debug!(
            batch = texts.len(),
            seq_len, "Generating embeddings (transformer forward pass)"
        );

        let input_ids = Tensor::from_vec(ids, (texts.len(), seq_len), device)?;
        let attention_mask = Tensor::from_vec(mask, (texts.len(), seq_len), device)?;

        let mut pooled = model
            .forward_pooled(&input_ids, &attention_mask)
            .map_err(|e| EmbeddingError::InferenceFailed {
                reason: format!("Transformer forward pass failed: {}", e),
            })?;

        if self.config.normalize {
            pooled = l2_normalize(&pooled)?;
        }

        Ok(pooled.to_vec2::<f32>()?)
    }

    fn embed_stub(&self, text: &str) -> Vec<f32> {
        use std::hash::{DefaultHasher, Hash, Hasher};

        debug!(text_len = text.len(), "Generating stub embedding");

        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        let mut state = hasher.finish();

        let mut embedding = Vec::with_capacity(self.config.stub_dimension);
        for _ in 0..self.config.stub_dimension {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
            let value = ((state >> 32) as f32 / u32::MAX as f32) * 2.0 - 1.0;
            embedding.push(value);
        }

        let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut embedding {
                *x /= norm;
            }
        }
        embedding
    }

    /// Returns the output embedding dimension.
    pub fn dimension(&self) -> usize {
        match &self.backend {
            EmbedderBackend::Model { model, .. } => model.hidden_size(),
            EmbedderBackend::Stub => self.config.stub_dimension,
        }
    }

    /// Returns `true` if running in stub mode.
    pub fn is_stub(&self) -> bool {
        matches!(self.backend, EmbedderBackend::Stub)
    }

    /// Returns the embedder configuration.
    pub fn config(&self) -> &SentenceConfig {
        &self.config
    }
}
