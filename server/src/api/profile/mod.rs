pub mod get;
pub mod save;

use crate::AppState;
use axum::routing::get;
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for /api/profile endpoints (mounted at /api/profile)
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(get::get_profile).post(save::save_profile))
}

#[derive(OpenApi)]
#[openapi(
    paths(get::get_profile, save::save_profile),
    components(schemas(recipebox_core::Profile))
)]
pub struct ApiDoc;
