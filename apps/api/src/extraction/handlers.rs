//! Axum route handlers for the Extraction Config API.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::extraction::keys::normalize_label_to_key;
use crate::extraction::records::{
    create_extraction_config, delete_extraction_config, get_extraction_config,
    get_extraction_prompt, preview_extraction_config, CreateConfigRequest, CreateConfigResponse,
    ExtractionPromptResponse, PreviewRequest, PreviewResponse,
};
use crate::models::extraction_config::ExtractionConfigRow;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

#[derive(Deserialize)]
pub struct NormalizeKeyRequest {
    pub label: String,
}

#[derive(Serialize)]
pub struct NormalizeKeyResponse {
    pub key: String,
}

/// POST /api/v1/extraction-configs
pub async fn handle_create(
    State(state): State<AppState>,
    Json(request): Json<CreateConfigRequest>,
) -> Result<(StatusCode, Json<CreateConfigResponse>), AppError> {
    let created = create_extraction_config(state.store.as_ref(), request).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// POST /api/v1/extraction-configs/preview
///
/// Compiles the prompt without saving anything.
pub async fn handle_preview(
    Json(request): Json<PreviewRequest>,
) -> Result<Json<PreviewResponse>, AppError> {
    Ok(Json(preview_extraction_config(request)?))
}

/// GET /api/v1/extraction-configs
pub async fn handle_list(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Vec<ExtractionConfigRow>>, AppError> {
    Ok(Json(state.store.list(params.user_id).await?))
}

/// GET /api/v1/extraction-configs/:id
pub async fn handle_get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ExtractionConfigRow>, AppError> {
    Ok(Json(get_extraction_config(state.store.as_ref(), id).await?))
}

/// GET /api/v1/extraction-configs/:id/prompt
///
/// Returns the prompt exactly as compiled at creation time.
pub async fn handle_get_prompt(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ExtractionPromptResponse>, AppError> {
    Ok(Json(get_extraction_prompt(state.store.as_ref(), id).await?))
}

/// DELETE /api/v1/extraction-configs/:id
pub async fn handle_delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    delete_extraction_config(state.store.as_ref(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/extraction-configs/normalize-key
pub async fn handle_normalize_key(
    Json(request): Json<NormalizeKeyRequest>,
) -> Json<NormalizeKeyResponse> {
    Json(NormalizeKeyResponse {
        key: normalize_label_to_key(&request.label),
    })
}
