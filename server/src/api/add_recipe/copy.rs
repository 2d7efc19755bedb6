use crate::api::{recipe_id, ApiError, ErrorResponse};
use crate::auth::Caller;
use crate::AppState;
use axum::{
    extract::{rejection::PathRejection, Path, State},
    Json,
};
use recipebox_core::GeneratedRecipe;
use uuid::Uuid;

#[utoipa::path(
    post,
    path = "/api/add-recipe/copy/{id}",
    tag = "add-recipe",
    params(
        ("id" = Uuid, Path, description = "Recipe to copy")
    ),
    responses(
        (status = 200, description = "Where the copy can be found", body = GeneratedRecipe),
        (status = 400, description = "Invalid id, or caller has no username yet", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn copy_recipe(
    Caller(caller): Caller,
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<GeneratedRecipe>, ApiError> {
    let generated = state.service.copy_recipe(&caller, recipe_id(id)?).await?;
    Ok(Json(generated))
}
