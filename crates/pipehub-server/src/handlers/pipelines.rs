//! Pipeline resource handlers (fetch, validate, add, image, list, delete).

use axum::extract::{Path, State};
use axum::Json;

use pipehub_check::ValidationVerdict;
use pipehub_core::PipelineDescriptor;

use crate::error::ApiError;
use crate::schema::pipelines::{
    PipelineCreatedResponse, PipelineDeletedResponse, PipelineImageResponse,
    PipelineListResponse,
};
use crate::state::AppState;

/// Fetches a stored pipeline's graph description (params stripped).
///
/// `GET /pipelines/{uid}`
pub async fn get_pipeline(
    State(state): State<AppState>,
    Path(uid): Path<String>,
) -> Result<Json<PipelineDescriptor>, ApiError> {
    let service = state.service.lock().await;
    Ok(Json(service.graph_by_uid(&uid)?))
}

/// Validates a pipeline with the given structure.
///
/// `POST /pipelines/validate`
pub async fn validate_pipeline(
    State(state): State<AppState>,
    Json(descriptor): Json<PipelineDescriptor>,
) -> Result<Json<ValidationVerdict>, ApiError> {
    let service = state.service.lock().await;
    Ok(Json(service.validate(&descriptor)?))
}

/// Persists a new pipeline.
///
/// `POST /pipelines/add`
pub async fn add_pipeline(
    State(state): State<AppState>,
    Json(descriptor): Json<PipelineDescriptor>,
) -> Result<Json<PipelineCreatedResponse>, ApiError> {
    let mut service = state.service.lock().await;
    Ok(Json(service.add(&descriptor)?.into()))
}

/// Returns the rendered-image URL for a stored pipeline.
///
/// `GET /pipelines/{uid}/image`
pub async fn pipeline_image(
    State(state): State<AppState>,
    Path(uid): Path<String>,
) -> Result<Json<PipelineImageResponse>, ApiError> {
    let service = state.service.lock().await;
    let image_url = service.image_url(&uid)?;
    Ok(Json(PipelineImageResponse { uid, image_url }))
}

/// Lists all stored pipelines.
///
/// `GET /pipelines`
pub async fn list_pipelines(
    State(state): State<AppState>,
) -> Result<Json<PipelineListResponse>, ApiError> {
    let service = state.service.lock().await;
    Ok(Json(PipelineListResponse {
        pipelines: service.list()?,
    }))
}

/// Deletes a stored pipeline.
///
/// `DELETE /pipelines/{uid}`
pub async fn delete_pipeline(
    State(state): State<AppState>,
    Path(uid): Path<String>,
) -> Result<Json<PipelineDeletedResponse>, ApiError> {
    let mut service = state.service.lock().await;
    service.delete(&uid)?;
    Ok(Json(PipelineDeletedResponse { deleted: true }))
}
