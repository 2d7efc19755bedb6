//! Routes that create recipes for the caller from another source. Kept off
//! `/api/recipes` so that no static segment shadows a username there.

pub mod copy;
pub mod generate;

use crate::AppState;
use axum::routing::post;
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for /api/add-recipe endpoints (mounted at /api/add-recipe)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/from-images", post(generate::generate_from_images))
        .route("/from-text", post(generate::generate_from_text))
        .route("/copy/{id}", post(copy::copy_recipe))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        generate::generate_from_images,
        generate::generate_from_text,
        copy::copy_recipe,
    ),
    components(schemas(
        recipebox_core::FileUpload,
        recipebox_core::GeneratedRecipe,
        generate::GenerateFromImagesRequest,
        generate::GenerateFromTextRequest,
    ))
)]
pub struct ApiDoc;
