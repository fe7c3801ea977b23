use std::path::PathBuf;

use crate::constants::{
    DEFAULT_BATCH_SIZE, DEFAULT_EMBEDDING_DIM, DEFAULT_MAX_SEQ_LEN, DEFAULT_MODEL_ID,
    DEFAULT_REVISION,
};
use crate::embedding::device::DevicePreference;
use crate::embedding::error::EmbeddingError;

#[derive(Debug, Clone)]
/// Configuration for [`SentenceEmbedder`](super::SentenceEmbedder).
pub struct SentenceConfig {
    /// Hub model identifier.
    pub model_id: String,
    /// Hub revision.
    pub revision: String,
    /// Local model directory; overrides the Hub when set.
    pub model_dir: Option<PathBuf>,
    /// Max tokens to consider.
    pub max_seq_len: usize,
    /// Texts per forward pass.
    pub batch_size: usize,
    /// L2-normalize output vectors.
    pub normalize: bool,
    /// Compute device request.
    pub device: DevicePreference,
    /// If true, run in deterministic stub mode (no model files required).
    pub testing_stub: bool,
    /// Output dimension in stub mode. Real models report their own.
    pub stub_dimension: usize,
}

impl Default for SentenceConfig {
    fn default() -> Self {
        Self {
            model_id: DEFAULT_MODEL_ID.to_string(),
            revision: DEFAULT_REVISION.to_string(),
            model_dir: None,
            max_seq_len: DEFAULT_MAX_SEQ_LEN,
            batch_size: DEFAULT_BATCH_SIZE,
            normalize: true,
            device: DevicePreference::Auto,
            testing_stub: false,
            stub_dimension: DEFAULT_EMBEDDING_DIM,
        }
    }
}

impl SentenceConfig {
    /// Creates a config for a Hub model id.
    pub fn new(model_id: impl Into<String>) -> Self {
        Self {
            model_id: model_id.into(),
            ..Default::default()
        }
    }

    /// Creates a config that reads model files from `dir` instead of the Hub.
    pub fn from_dir<P: Into<PathBuf>>(dir: P) -> Self {
        Self {
            model_dir: Some(dir.into()),
            ..Default::default()
        }
    }

    /// Creates a stub config (no model files; produces deterministic embeddings).
    pub fn stub() -> Self {
        Self {
            testing_stub: true,
            ..Default::default()
        }
    }

    /// Validates settings that would otherwise fail deep inside inference.
    pub fn validate(&self) -> Result<(), EmbeddingError> {
        if self.testing_stub {
            if self.stub_dimension == 0 {
                return Err(EmbeddingError::InvalidConfig {
                    reason: "stub_dimension must be greater than zero".to_string(),
                });
            }
            return Ok(());
        }

        if self.model_id.trim().is_empty() && self.model_dir.is_none() {
            return Err(EmbeddingError::InvalidConfig {
                reason: "model_id is required when no model_dir is set".to_string(),
            });
        }

        if self.max_seq_len == 0 {
            return Err(EmbeddingError::InvalidConfig {
                reason: "max_seq_len must be greater than zero".to_string(),
            });
        }

        if self.batch_size == 0 {
            return Err(EmbeddingError::InvalidConfig {
                reason: "batch_size must be greater than zero".to_string(),
            });
        }

        if let Some(ref dir) = self.model_dir
            && !dir.is_dir()
        {
            return Err(EmbeddingError::ModelNotFound { path: dir.clone() });
        }

        Ok(())
    }
}
