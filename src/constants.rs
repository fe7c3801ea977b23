//! Cross-cutting, shared constants.
//!
//! The defaults describe `sentence-transformers/all-MiniLM-L6-v2`. A different
//! model can be selected at runtime (see [`crate::config`]); the real output
//! dimension is then read from the model's `config.json`.

/// Hub identifier of the model loaded when nothing else is configured.
pub const DEFAULT_MODEL_ID: &str = "sentence-transformers/all-MiniLM-L6-v2";

/// Hub revision used when nothing else is configured.
pub const DEFAULT_REVISION: &str = "main";

/// Output dimension of the default model (and of the stub embedder).
pub const DEFAULT_EMBEDDING_DIM: usize = 384;

/// Tokens kept per input before truncation.
pub const DEFAULT_MAX_SEQ_LEN: usize = 256;

/// Texts per forward pass.
pub const DEFAULT_BATCH_SIZE: usize = 32;

/// Default HTTP port for `serve`.
pub const DEFAULT_PORT: u16 = 8090;

/// Sentence encoded by the `test` command.
pub const TEST_SENTENCE: &str = "This is a test sentence for embedding verification.";
