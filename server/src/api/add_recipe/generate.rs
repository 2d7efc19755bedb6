use crate::api::{ApiError, ErrorResponse};
use crate::auth::Caller;
use crate::AppState;
use axum::{extract::State, Json};
use recipebox_core::{FileUpload, GeneratedRecipe};
use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct GenerateFromImagesRequest {
    pub files: Vec<FileUpload>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct GenerateFromTextRequest {
    pub text: String,
}

#[utoipa::path(
    post,
    path = "/api/add-recipe/from-images",
    tag = "add-recipe",
    request_body = GenerateFromImagesRequest,
    responses(
        (status = 200, description = "Recipe extracted and saved", body = GeneratedRecipe),
        (status = 400, description = "Invalid upload or missing username", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 502, description = "Model call failed or answered unusably", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn generate_from_images(
    Caller(caller): Caller,
    State(state): State<AppState>,
    Json(request): Json<GenerateFromImagesRequest>,
) -> Result<Json<GeneratedRecipe>, ApiError> {
    let generated = state
        .service
        .generate_from_images(&caller, &request.files)
        .await?;
    Ok(Json(generated))
}

#[utoipa::path(
    post,
    path = "/api/add-recipe/from-text",
    tag = "add-recipe",
    request_body = GenerateFromTextRequest,
    responses(
        (status = 200, description = "Recipe extracted and saved", body = GeneratedRecipe),
        (status = 400, description = "Empty text or missing username", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 502, description = "Model call failed or answered unusably", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn generate_from_text(
    Caller(caller): Caller,
    State(state): State<AppState>,
    Json(request): Json<GenerateFromTextRequest>,
) -> Result<Json<GeneratedRecipe>, ApiError> {
    let generated = state
        .service
        .generate_from_text(&caller, &request.text)
        .await?;
    Ok(Json(generated))
}
