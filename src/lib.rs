//! Sentence embedding library crate (used by the `sentence-embed` binary and tests).
//!
//! # Public API Surface
//!
//! - [`Config`], [`ConfigError`] - environment-backed settings
//! - [`SentenceEmbedder`], [`SentenceConfig`] - model loading and encoding
//! - [`EmbeddingService`] - the model wrapper behind every command
//! - [`payload`] - JSON request/response records
//! - [`cli`] - argument parsing and one-shot dispatch
//! - [`gateway`] - HTTP `serve` mode
//!
//! Use [`SentenceConfig::stub`] (or `EMBED_STUB=1`) to run without model files.

pub mod cli;
pub mod config;
pub mod constants;
pub mod embedding;
pub mod gateway;
pub mod payload;
pub mod service;

pub use cli::{CliError, Command};
pub use config::{Config, ConfigError, ServeConfig};
pub use constants::{DEFAULT_EMBEDDING_DIM, DEFAULT_MODEL_ID, TEST_SENTENCE};
pub use embedding::{DevicePreference, EmbeddingError, SentenceConfig, SentenceEmbedder};
pub use gateway::{GatewayError, HandlerState, create_router_with_state};
pub use payload::{
    BatchEmbeddingResponse, BatchRequest, CommandOutput, EmbeddingResponse, ErrorResponse,
    SelfTestResponse,
};
pub use service::EmbeddingService;
