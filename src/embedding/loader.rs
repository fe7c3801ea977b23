//! Model file resolution (local directory or Hugging Face Hub) and tokenizer setup.

use std::path::{Path, PathBuf};

use hf_hub::api::sync::{ApiBuilder, ApiRepo};
use hf_hub::{Repo, RepoType};
use tokenizers::{PaddingParams, PaddingStrategy, Tokenizer, TruncationParams};
use tracing::{debug, info};

use super::error::EmbeddingError;

pub const CONFIG_FILE: &str = "config.json";
pub const TOKENIZER_FILE: &str = "tokenizer.json";
pub const SAFETENSORS_FILE: &str = "model.safetensors";
pub const PYTORCH_FILE: &str = "pytorch_model.bin";

/// Weight file formats the BERT loader understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Weights {
    Safetensors(PathBuf),
    Pytorch(PathBuf),
}

impl Weights {
    pub fn path(&self) -> &Path {
        match self {
            Weights::Safetensors(p) | Weights::Pytorch(p) => p,
        }
    }
}

/// Paths to everything needed to build a [`super::SentenceEmbedder`].
#[derive(Debug, Clone)]
pub struct ModelFiles {
    pub config: PathBuf,
    pub tokenizer: PathBuf,
    pub weights: Weights,
}

impl ModelFiles {
    /// Resolves files from a local directory.
    pub fn from_dir(dir: &Path) -> Result<Self, EmbeddingError> {
        let config = existing(dir.join(CONFIG_FILE))?;
        let tokenizer = existing(dir.join(TOKENIZER_FILE))?;

        let safetensors = dir.join(SAFETENSORS_FILE);
        let pytorch = dir.join(PYTORCH_FILE);
        let weights = if safetensors.is_file() {
            Weights::Safetensors(safetensors)
        } else if pytorch.is_file() {
            Weights::Pytorch(pytorch)
        } else {
            return Err(EmbeddingError::ModelNotFound { path: safetensors });
        };

        debug!(dir = %dir.display(), "Resolved model files from local directory");
        Ok(Self {
            config,
            tokenizer,
            weights,
        })
    }

    /// Downloads (or reuses cached) files for `model_id` at `revision`.
    pub fn from_hub(model_id: &str, revision: &str) -> Result<Self, EmbeddingError> {
        let api = ApiBuilder::new()
            .with_progress(false)
            .build()
            .map_err(|e| EmbeddingError::DownloadFailed {
                model_id: model_id.to_string(),
                file: String::new(),
                reason: e.to_string(),
            })?;
        let repo = api.repo(Repo::with_revision(
            model_id.to_string(),
            RepoType::Model,
            revision.to_string(),
        ));

        info!(model_id, revision, "Fetching model files from the Hugging Face Hub");

        let config = fetch(&repo, model_id, CONFIG_FILE)?;
        let tokenizer = fetch(&repo, model_id, TOKENIZER_FILE)?;
        let weights = match fetch(&repo, model_id, SAFETENSORS_FILE) {
            Ok(path) => Weights::Safetensors(path),
            Err(safetensors_err) => {
                debug!(error = %safetensors_err, "No safetensors weights, trying pytorch_model.bin");
                Weights::Pytorch(fetch(&repo, model_id, PYTORCH_FILE)?)
            }
        };

        Ok(Self {
            config,
            tokenizer,
            weights,
        })
    }
}

fn existing(path: PathBuf) -> Result<PathBuf, EmbeddingError> {
    if path.is_file() {
        Ok(path)
    } else {
        Err(EmbeddingError::ModelNotFound { path })
    }
}

fn fetch(repo: &ApiRepo, model_id: &str, file: &str) -> Result<PathBuf, EmbeddingError> {
    repo.get(file).map_err(|e| EmbeddingError::DownloadFailed {
        model_id: model_id.to_string(),
        file: file.to_string(),
        reason: e.to_string(),
    })
}

/// Loads a tokenizer that truncates to `max_len` and pads each batch to its longest member.
pub fn load_tokenizer(path: &Path, max_len: usize) -> Result<Tokenizer, EmbeddingError> {
    let mut tokenizer =
        Tokenizer::from_file(path).map_err(|e| EmbeddingError::TokenizationFailed {
            reason: format!("Failed to load tokenizer from {}: {}", path.display(), e),
        })?;

    let truncation = TruncationParams {
        max_length: max_len,
        ..Default::default()
    };
    tokenizer
        .with_truncation(Some(truncation))
        .map_err(|e| EmbeddingError::TokenizationFailed {
            reason: format!("Failed to configure truncation: {}", e),
        })?;

    tokenizer.with_padding(Some(PaddingParams {
        strategy: PaddingStrategy::BatchLongest,
        ..Default::default()
    }));

    Ok(tokenizer)
}
