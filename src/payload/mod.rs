//! JSON request and response records.
//!
//! The same records are printed by the CLI and returned by the HTTP gateway.
//! Field order is part of the output format.


use serde::{Deserialize, Serialize};

/// `batch` input: `{"texts": [string, ...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct BatchRequest {
    pub texts: Vec<String>,
}

/// Serve-mode single input: `{"text": string}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SingleRequest {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EmbeddingResponse {
    pub success: bool,
    pub embedding: Vec<f32>,
    pub dimension: usize,
    pub model: String,
}

impl EmbeddingResponse {
    pub fn new(embedding: Vec<f32>, model: impl Into<String>) -> Self {
        Self {
            success: true,
            dimension: embedding.len(),
            embedding,
            model: model.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct BatchEmbeddingResponse {
    pub success: bool,
    pub embeddings: Vec<Vec<f32>>,
    pub count: usize,
    pub dimension: usize,
    pub model: String,
}

impl BatchEmbeddingResponse {
    /// `dimension` is the length of the first vector, or 0 for an empty batch.
    pub fn new(embeddings: Vec<Vec<f32>>, model: impl Into<String>) -> Self {
        Self {
            success: true,
            count: embeddings.len(),
            dimension: embeddings.first().map_or(0, Vec::len),
            embeddings,
            model: model.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    Passed,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SelfTestResponse {
    pub success: bool,
    pub test: TestStatus,
    pub dimension: usize,
    pub model: String,
}

impl SelfTestResponse {
    pub fn passed(dimension: usize, model: impl Into<String>) -> Self {
        Self {
            success: true,
            test: TestStatus::Passed,
            dimension,
            model: model.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

/// Anything a one-shot command can print.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CommandOutput {
    Single(EmbeddingResponse),
    Batch(BatchEmbeddingResponse),
    Test(SelfTestResponse),
    Error(ErrorResponse),
}

impl CommandOutput {
    pub fn is_success(&self) -> bool {
        !matches!(self, CommandOutput::Error(_))
    }

    /// Compact single-line JSON.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            format!(
                r#"{{"success": false, "error": "failed to serialize output: {}"}}"#,
                e.to_string().replace('"', "'")
            )
        })
    }
}
