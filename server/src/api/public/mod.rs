pub mod testing;

use crate::AppState;
use axum::routing::get;
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for public endpoints (no auth required)
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/api/test/unauthed-ping",
        get(testing::unauthed_ping::unauthed_ping),
    )
}

#[derive(OpenApi)]
#[openapi(
    paths(testing::unauthed_ping::unauthed_ping),
    components(schemas(testing::unauthed_ping::UnauthedPingResponse))
)]
pub struct ApiDoc;
