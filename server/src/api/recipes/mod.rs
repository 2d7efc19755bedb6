pub mod delete;
pub mod get;
pub mod list;
pub mod save;

use crate::AppState;
use axum::routing::get;
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for /api/recipes endpoints (mounted at /api/recipes)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list::list_recipes).post(save::save_recipe))
        // GET takes an owner's username here, DELETE a recipe id.
        .route(
            "/{username}",
            get(list::list_user_recipes).delete(delete::delete_recipe),
        )
        .route("/{username}/{slug}", get(get::get_recipe))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        list::list_recipes,
        list::list_user_recipes,
        get::get_recipe,
        save::save_recipe,
        delete::delete_recipe,
    ),
    components(schemas(
        list::RecipeListResponse,
        recipebox_core::RecipeCard,
        recipebox_core::Recipe,
        recipebox_core::ProfileId,
    ))
)]
pub struct ApiDoc;
