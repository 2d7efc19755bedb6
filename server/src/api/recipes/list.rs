use crate::api::{ApiError, ErrorResponse};
use crate::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use recipebox_core::RecipeCard;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipeListResponse {
    pub recipes: Vec<RecipeCard>,
}

#[utoipa::path(
    get,
    path = "/api/recipes",
    tag = "recipes",
    responses(
        (status = 200, description = "Cards for every recipe", body = RecipeListResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn list_recipes(
    State(state): State<AppState>,
) -> Result<Json<RecipeListResponse>, ApiError> {
    let recipes = state.service.list_recipe_cards(None).await?;
    Ok(Json(RecipeListResponse { recipes }))
}

#[utoipa::path(
    get,
    path = "/api/recipes/{username}",
    tag = "recipes",
    params(
        ("username" = String, Path, description = "Owner's username, case-insensitive")
    ),
    responses(
        (status = 200, description = "Cards for one owner's recipes", body = RecipeListResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn list_user_recipes(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<RecipeListResponse>, ApiError> {
    let recipes = state.service.list_recipe_cards(Some(&username)).await?;
    Ok(Json(RecipeListResponse { recipes }))
}
