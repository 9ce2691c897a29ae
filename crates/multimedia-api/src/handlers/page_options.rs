use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use multimedia_core::{AppError, PageOption, PageOptionBody};
use std::sync::Arc;
use validator::Validate;

#[utoipa::path(
    put,
    path = "/api/v0/page-options/{name}",
    tag = "page-options",
    params(("name" = String, Path, description = "Page option name")),
    request_body = PageOptionBody,
    responses(
        (status = 200, description = "Page option stored", body = PageOption),
        (status = 400, description = "Invalid page option", body = ErrorResponse)
    )
)]
pub async fn put_page_option(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    ValidatedJson(body): ValidatedJson<PageOptionBody>,
) -> Result<impl IntoResponse, HttpAppError> {
    let option = body.into_option(name);
    option.validate().map_err(AppError::from)?;

    // Wallpapers must point at an asset that already has a record.
    if let Some(wallpaper) = &option.wallpaper {
        let id = wallpaper.id().ok_or_else(|| {
            AppError::InvalidInput("wallpaper must reference a stored asset".to_string())
        })?;
        if state.assets.find(id).await?.is_none() {
            return Err(AppError::InvalidInput(format!(
                "wallpaper asset {} does not exist",
                id
            ))
            .into());
        }
    }

    state.page_options.store(&option).await?;
    tracing::info!(
        name = %option.name,
        has_wallpaper = option.wallpaper.is_some(),
        "Page option stored"
    );
    Ok(Json(option))
}

#[utoipa::path(
    get,
    path = "/api/v0/page-options/{name}",
    tag = "page-options",
    params(("name" = String, Path, description = "Page option name")),
    responses(
        (status = 200, description = "Page option found", body = PageOption),
        (status = 404, description = "Page option not found", body = ErrorResponse)
    )
)]
pub async fn get_page_option(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, HttpAppError> {
    let option = state
        .page_options
        .find_by_name(&name)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Page option '{}' not found", name)))?;
    Ok(Json(option))
}
