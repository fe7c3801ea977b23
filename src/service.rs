//! Model wrapper shared by the CLI and the HTTP gateway.

use tracing::{debug, instrument};

use crate::constants::TEST_SENTENCE;
use crate::embedding::{EmbeddingError, SentenceConfig, SentenceEmbedder};
use crate::payload::{BatchEmbeddingResponse, EmbeddingResponse, SelfTestResponse};

/// One loaded model plus the identifier reported in every response.
#[derive(Debug)]
pub struct EmbeddingService {
    embedder: SentenceEmbedder,
    model_name: String,
}

impl EmbeddingService {
    pub fn load(config: SentenceConfig) -> Result<Self, EmbeddingError> {
        let model_name = config.model_id.clone();
        let embedder = SentenceEmbedder::load(config)?;
        Ok(Self {
            embedder,
            model_name,
        })
    }

    #[instrument(skip_all, fields(text_len = text.len()))]
    pub fn embed_single(&self, text: &str) -> Result<EmbeddingResponse, EmbeddingError> {
        let embedding = self.embedder.embed(text)?;
        Ok(EmbeddingResponse::new(embedding, &self.model_name))
    }

    #[instrument(skip_all, fields(count = texts.len()))]
    pub fn embed_batch(&self, texts: &[String]) -> Result<BatchEmbeddingResponse, EmbeddingError> {
        let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
        let embeddings = self.embedder.embed_batch(&refs)?;
        debug!(count = embeddings.len(), "Batch encoded");
        Ok(BatchEmbeddingResponse::new(embeddings, &self.model_name))
    }

    /// Encodes [`TEST_SENTENCE`] and checks the vector has the expected length.
    pub fn self_test(&self) -> Result<SelfTestResponse, EmbeddingError> {
        let embedding = self.embedder.embed(TEST_SENTENCE)?;
        if embedding.len() != self.dimension() {
            return Err(EmbeddingError::InferenceFailed {
                reason: format!(
                    "self-test produced {} values, expected {}",
                    embedding.len(),
                    self.dimension()
                ),
            });
        }
        Ok(SelfTestResponse::passed(embedding.len(), &self.model_name))
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    pub fn dimension(&self) -> usize {
        self.embedder.dimension()
    }

    pub fn is_stub(&self) -> bool {
        self.embedder.is_stub()
    }
}
