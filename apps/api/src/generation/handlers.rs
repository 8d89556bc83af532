//! Axum route handlers for the Generation API.

use axum::{extract::State, Json};
use serde::Serialize;
use tracing::debug;

use crate::errors::{ApiJson, AppError};
use crate::generation::generator::{GenerateRequest, GenerationResult};
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub success: bool,
    pub data: GenerationResult,
    /// Present only when the fields were sliced positionally and should not be trusted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_response: Option<String>,
}

/// POST /api/generate
///
/// Turns a narrative into STAR fields. Nothing is persisted; the store is never touched.
pub async fn handle_generate(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<GenerateRequest>,
) -> Result<Json<GenerateResponse>, AppError> {
    let generated = state.generator.generate(request).await?;
    debug!(
        "Returning generation from {} (strategy={:?})",
        generated.model, generated.strategy
    );

    Ok(Json(GenerateResponse {
        success: true,
        data: generated.result,
        raw_response: generated.raw_response,
    }))
}
