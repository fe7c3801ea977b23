//! Embedding + model utilities.
//!
//! - [`sentence`] provides embedding generation.
//! - [`loader`] resolves model files from disk or the Hugging Face Hub.

/// BERT encoder with mean pooling.
pub mod bert;
/// Device selection (CPU / Metal / CUDA).
pub mod device;
mod error;
/// Model file and tokenizer loading.
pub mod loader;
/// Sentence embedder.
pub mod sentence;

pub use device::{DevicePreference, select_device};
pub use error::EmbeddingError;
pub use sentence::{SentenceConfig, SentenceEmbedder};
