use axum::{Json, body::Bytes, extract::State};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::embedding::EmbeddingError;
use crate::gateway::error::GatewayError;
use crate::gateway::state::HandlerState;
use crate::payload::{
    BatchEmbeddingResponse, BatchRequest, EmbeddingResponse, SelfTestResponse, SingleRequest,
};

#[instrument(skip_all)]
pub async fn embed_handler(
    State(state): State<HandlerState>,
    body: Bytes,
) -> Result<Json<EmbeddingResponse>, GatewayError> {
    let request: SingleRequest = parse_body(&body)?;
    if request.text.is_empty() {
        return Err(GatewayError::InvalidRequest(
            "text must not be empty".to_string(),
        ));
    }

    let service = state.service.clone();
    let response = run_blocking(move || service.embed_single(&request.text)).await?;
    Ok(Json(response))
}

#[instrument(skip_all)]
pub async fn embed_batch_handler(
    State(state): State<HandlerState>,
    body: Bytes,
) -> Result<Json<BatchEmbeddingResponse>, GatewayError> {
    let request: BatchRequest = parse_body(&body)?;
    debug!(count = request.texts.len(), "Batch request received");

    let service = state.service.clone();
    let response = run_blocking(move || service.embed_batch(&request.texts)).await?;
    Ok(Json(response))
}

#[instrument(skip_all)]
pub async fn self_test_handler(
    State(state): State<HandlerState>,
) -> Result<Json<SelfTestResponse>, GatewayError> {
    let service = state.service.clone();
    let response = run_blocking(move || service.self_test()).await?;
    Ok(Json(response))
}

pub(crate) fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, GatewayError> {
    serde_json::from_slice(body)
        .map_err(|e| GatewayError::InvalidRequest(format!("Invalid request body: {}", e)))
}

/// Runs inference on the blocking pool so request handling threads stay free.
async fn run_blocking<T, F>(f: F) -> Result<T, GatewayError>
where
    F: FnOnce() -> Result<T, EmbeddingError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| GatewayError::InternalError(format!("embedding task failed: {}", e)))?
        .map_err(GatewayError::from)
}
