use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    body::Body,
    extract::{Multipart, Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use futures::TryStreamExt;
use multimedia_core::{AppError, MultimediaAsset};
use multimedia_db::FindManyResult;
use multimedia_storage::detect_content_type;
use serde::Deserialize;
use std::sync::Arc;
use tokio_util::io::StreamReader;
use utoipa::IntoParams;
use uuid::Uuid;

/// Multipart field carrying the uploaded file
pub const UPLOAD_FIELD: &str = "file";

/// Header naming the original file for raw uploads
pub const FILENAME_HEADER: &str = "x-filename";

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FindAssetsQuery {
    /// Comma-separated asset ids
    #[serde(default)]
    pub ids: String,
}

fn parse_ids(raw: &str) -> Result<Vec<Uuid>, AppError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<Uuid>()
                .map_err(|_| AppError::InvalidInput(format!("Invalid asset id: {}", s)))
        })
        .collect()
}

#[utoipa::path(
    post,
    path = "/api/v0/assets",
    tag = "assets",
    request_body(content_type = "multipart/form-data", description = "File in the `file` field"),
    responses(
        (status = 201, description = "Asset stored", body = MultimediaAsset),
        (status = 400, description = "Invalid upload", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 502, description = "Object store failure", body = ErrorResponse)
    )
)]
pub async fn upload_asset(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let asset = state.ingest.ingest_multipart(multipart, UPLOAD_FIELD).await?;
    Ok((StatusCode::CREATED, Json(asset)))
}

#[utoipa::path(
    post,
    path = "/api/v0/assets/raw",
    tag = "assets",
    params(
        ("X-Filename" = String, Header, description = "Original file name"),
        ("Content-Length" = u64, Header, description = "Payload size in bytes")
    ),
    request_body(content_type = "application/octet-stream", description = "Raw file bytes"),
    responses(
        (status = 201, description = "Asset stored", body = MultimediaAsset),
        (status = 400, description = "Missing headers or truncated body", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse)
    )
)]
pub async fn upload_raw_asset(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Body,
) -> Result<impl IntoResponse, HttpAppError> {
    let filename = headers
        .get(FILENAME_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::InvalidInput("X-Filename header is required".to_string()))?
        .to_string();

    let declared_len = headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .ok_or_else(|| {
            AppError::InvalidInput("A valid Content-Length header is required".to_string())
        })?;

    let stream = body.into_data_stream().map_err(std::io::Error::other);
    let asset = state
        .ingest
        .ingest_stream(StreamReader::new(stream), &filename, declared_len)
        .await?;

    Ok((StatusCode::CREATED, Json(asset)))
}

#[utoipa::path(
    get,
    path = "/api/v0/assets/{id}",
    tag = "assets",
    params(("id" = Uuid, Path, description = "Asset ID")),
    responses(
        (status = 200, description = "Asset found", body = MultimediaAsset),
        (status = 404, description = "Asset not found", body = ErrorResponse)
    )
)]
pub async fn get_asset(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let asset = state
        .assets
        .find(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Asset not found".to_string()))?;
    Ok(Json(asset))
}

#[utoipa::path(
    get,
    path = "/api/v0/assets",
    tag = "assets",
    params(FindAssetsQuery),
    responses(
        (status = 200, description = "Found assets and ids with no record", body = FindManyResult),
        (status = 400, description = "Malformed id", body = ErrorResponse)
    )
)]
pub async fn find_assets(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FindAssetsQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let ids = parse_ids(&query.ids)?;
    let result = state.assets.find_many(&ids).await?;
    Ok(Json(result))
}

#[utoipa::path(
    get,
    path = "/api/v0/assets/{id}/content",
    tag = "assets",
    params(("id" = Uuid, Path, description = "Asset ID")),
    responses(
        (status = 200, description = "Stored bytes with a sniffed Content-Type"),
        (status = 404, description = "Asset or object not found", body = ErrorResponse)
    )
)]
pub async fn get_asset_content(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let asset = state
        .assets
        .find(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Asset not found".to_string()))?;

    let body = state.storage.read(asset.filename()).await?;
    let content_type = detect_content_type(&body);

    Ok(([(header::CONTENT_TYPE, content_type)], body))
}

#[utoipa::path(
    delete,
    path = "/api/v0/assets/{id}",
    tag = "assets",
    params(("id" = Uuid, Path, description = "Asset ID")),
    responses(
        (status = 204, description = "Asset deleted"),
        (status = 404, description = "Asset not found", body = ErrorResponse),
        (status = 502, description = "Object could not be removed", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(asset_id = %id, operation = "delete_asset"))]
pub async fn delete_asset(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    state.uploader.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
