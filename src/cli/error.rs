use thiserror::Error;

use crate::config::ConfigError;
use crate::embedding::EmbeddingError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),

    #[error("invalid JSON input: {0}")]
    InvalidInput(#[from] serde_json::Error),

    #[error("failed to read standard input: {0}")]
    Stdin(#[from] std::io::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    #[error("'serve' starts a server and cannot run as a one-shot command")]
    NotOneShot,
}
