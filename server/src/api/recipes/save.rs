use crate::api::{ApiError, ErrorResponse};
use crate::auth::Caller;
use crate::AppState;
use axum::{extract::State, Json};
use recipebox_core::Recipe;

/// Create or replace a recipe. An empty `slug` is generated from the title
/// for new recipes and kept unchanged for existing ones.
#[utoipa::path(
    post,
    path = "/api/recipes",
    tag = "recipes",
    request_body = Recipe,
    responses(
        (status = 200, description = "Saved recipe", body = Recipe),
        (status = 400, description = "Invalid title or slug", body = ErrorResponse),
        (status = 401, description = "Caller does not own the recipe", body = ErrorResponse),
        (status = 409, description = "Slug already taken", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn save_recipe(
    Caller(caller): Caller,
    State(state): State<AppState>,
    Json(recipe): Json<Recipe>,
) -> Result<Json<Recipe>, ApiError> {
    let saved = state.service.save_recipe(&caller, recipe).await?;
    Ok(Json(saved))
}
