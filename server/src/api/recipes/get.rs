use crate::api::{ApiError, ErrorResponse};
use crate::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use recipebox_core::Recipe;

#[utoipa::path(
    get,
    path = "/api/recipes/{username}/{slug}",
    tag = "recipes",
    params(
        ("username" = String, Path, description = "Owner's username"),
        ("slug" = String, Path, description = "Recipe slug")
    ),
    responses(
        (status = 200, description = "Recipe details", body = Recipe),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    )
)]
pub async fn get_recipe(
    State(state): State<AppState>,
    Path((username, slug)): Path<(String, String)>,
) -> Result<Json<Recipe>, ApiError> {
    let recipe = state.service.get_recipe(Some(&username), &slug).await?;
    Ok(Json(recipe))
}
