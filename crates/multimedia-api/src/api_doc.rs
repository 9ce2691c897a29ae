//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use multimedia_core::{models, AssetType, FieldViolation};
use multimedia_db::FindManyResult;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Multimedia Asset API",
        version = "0.1.0",
        description = "Upload, look up and delete multimedia assets (images, sound, PDF). Blobs live in an object store, descriptors in a metadata store. All endpoints are versioned under /api/v0/."
    ),
    paths(
        // Assets
        handlers::assets::upload_asset,
        handlers::assets::upload_raw_asset,
        handlers::assets::get_asset,
        handlers::assets::find_assets,
        handlers::assets::get_asset_content,
        handlers::assets::delete_asset,
        // Page options
        handlers::page_options::put_page_option,
        handlers::page_options::get_page_option,
    ),
    components(
        schemas(
            models::MultimediaAsset,
            models::PageOption,
            models::PageOptionBody,
            AssetType,
            FindManyResult,
            FieldViolation,
            error::ErrorResponse,
        )
    ),
    tags(
        (name = "assets", description = "Asset upload, lookup, download and deletion"),
        (name = "page-options", description = "Named page configuration with an optional wallpaper asset")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_asset_paths() {
        let spec = ApiDoc::openapi();
        let paths: Vec<&String> = spec.paths.paths.keys().collect();
        assert!(paths.iter().any(|p| p.as_str() == "/api/v0/assets/{id}"));
        assert!(paths.iter().any(|p| p.as_str() == "/api/v0/page-options/{name}"));
    }
}
