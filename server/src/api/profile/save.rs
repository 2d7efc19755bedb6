use crate::api::{ApiError, ErrorResponse};
use crate::auth::Caller;
use crate::AppState;
use axum::{extract::State, Json};
use recipebox_core::Profile;

#[utoipa::path(
    post,
    path = "/api/profile",
    tag = "profile",
    request_body = Profile,
    responses(
        (status = 200, description = "Saved profile", body = Profile),
        (status = 400, description = "Invalid username", body = ErrorResponse),
        (status = 401, description = "Profile belongs to someone else", body = ErrorResponse),
        (status = 409, description = "Username already taken", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn save_profile(
    Caller(caller): Caller,
    State(state): State<AppState>,
    Json(profile): Json<Profile>,
) -> Result<Json<Profile>, ApiError> {
    let saved = state.service.save_profile(&caller, profile).await?;
    tracing::info!(profile_id = %saved.id, username = %saved.username, "Saved profile");
    Ok(Json(saved))
}
