use crate::api::{ApiError, ErrorResponse};
use crate::auth::Caller;
use crate::AppState;
use axum::routing::post;
use axum::{extract::State, Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

#[derive(Debug, Deserialize, ToSchema)]
pub struct SlugAvailableRequest {
    pub slug: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UsernameAvailableRequest {
    pub username: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AvailabilityResponse {
    pub available: bool,
}

/// Returns the router for the availability checks
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/slug/available", post(slug_available))
        .route("/api/username/available", post(username_available))
}

#[utoipa::path(
    post,
    path = "/api/slug/available",
    tag = "availability",
    request_body = SlugAvailableRequest,
    responses(
        (status = 200, description = "Whether the slug is free for the caller", body = AvailabilityResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn slug_available(
    Caller(caller): Caller,
    State(state): State<AppState>,
    Json(request): Json<SlugAvailableRequest>,
) -> Result<Json<AvailabilityResponse>, ApiError> {
    let available = state.service.slug_available(&caller, &request.slug).await?;
    Ok(Json(AvailabilityResponse { available }))
}

#[utoipa::path(
    post,
    path = "/api/username/available",
    tag = "availability",
    request_body = UsernameAvailableRequest,
    responses(
        (status = 200, description = "Whether nobody holds the username, ignoring case", body = AvailabilityResponse)
    )
)]
pub async fn username_available(
    State(state): State<AppState>,
    Json(request): Json<UsernameAvailableRequest>,
) -> Result<Json<AvailabilityResponse>, ApiError> {
    let available = state.service.username_available(&request.username).await?;
    Ok(Json(AvailabilityResponse { available }))
}

#[derive(OpenApi)]
#[openapi(
    paths(slug_available, username_available),
    components(schemas(
        SlugAvailableRequest,
        UsernameAvailableRequest,
        AvailabilityResponse
    ))
)]
pub struct ApiDoc;
