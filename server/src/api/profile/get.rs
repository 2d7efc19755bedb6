use crate::api::{ApiError, ErrorResponse};
use crate::auth::Caller;
use crate::AppState;
use axum::{extract::State, Json};
use recipebox_core::Profile;

#[utoipa::path(
    get,
    path = "/api/profile",
    tag = "profile",
    responses(
        (status = 200, description = "Caller's profile; username is empty until chosen", body = Profile),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_profile(
    Caller(caller): Caller,
    State(state): State<AppState>,
) -> Result<Json<Profile>, ApiError> {
    let profile = state.service.get_my_profile(&caller).await?;
    Ok(Json(profile))
}
