pub mod add_recipe;
pub mod availability;
pub mod profile;
pub mod public;
pub mod recipes;


use crate::AppState;
use axum::extract::rejection::PathRejection;
use axum::extract::Path;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use recipebox_core::{ExtractError, ServiceError};
use serde::Serialize;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

/// Shared error response used by all endpoints
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    /// Stable machine-readable error kind, e.g. `not_found`.
    pub code: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: &str) -> Self {
        Self {
            error: error.into(),
            code: code.to_string(),
        }
    }
}

/// A [`ServiceError`] on its way out of a handler.
#[derive(Debug)]
pub struct ApiError(pub ServiceError);

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        ApiError(err)
    }
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match &self.0 {
            ServiceError::NotAuthorized => (StatusCode::UNAUTHORIZED, "not_authorized"),
            ServiceError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            ServiceError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
            ServiceError::Conflict(_) => (StatusCode::CONFLICT, "conflict"),
            ServiceError::Extraction { source, .. } => match source {
                ExtractError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "validation_error"),
                ExtractError::Upstream(_) => (StatusCode::BAD_GATEWAY, "upstream_error"),
                ExtractError::Decode(_) => (StatusCode::BAD_GATEWAY, "decode_error"),
                ExtractError::EmptyResponse => (StatusCode::BAD_GATEWAY, "empty_response"),
            },
            ServiceError::Storage { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "storage_error"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = match &self.0 {
            // Database details stay in the logs.
            ServiceError::Storage { op, .. } => {
                tracing::error!(error = %self.0, "Storage failure");
                format!("Failed to {op}")
            }
            ServiceError::Extraction { .. } => {
                tracing::warn!(error = %self.0, "Recipe extraction failed");
                self.0.to_string()
            }
            other => other.to_string(),
        };

        (status, Json(ErrorResponse::new(message, code))).into_response()
    }
}

/// Unwrap a recipe id path segment. A malformed id is a validation error, so
/// it gets the same JSON body as every other failure.
pub fn recipe_id(path: Result<Path<Uuid>, PathRejection>) -> Result<Uuid, ApiError> {
    path.map(|Path(id)| id).map_err(|rejection| {
        ApiError(ServiceError::Validation(format!(
            "Invalid recipe id: {}",
            rejection.body_text()
        )))
    })
}

/// All `/api` routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(public::router())
        .nest("/api/recipes", recipes::router())
        .nest("/api/add-recipe", add_recipe::router())
        .nest("/api/profile", profile::router())
        .merge(availability::router())
}

/// Generate the complete OpenAPI spec by merging all module specs
pub fn openapi() -> utoipa::openapi::OpenApi {
    // Base spec with shared components and security
    #[derive(OpenApi)]
    #[openapi(
        info(title = "recipebox", description = "Recipe collection with AI extraction"),
        components(schemas(ErrorResponse))
    )]
    struct BaseApi;

    let mut spec = BaseApi::openapi();

    if let Some(components) = spec.components.as_mut() {
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }

    let modules: Vec<utoipa::openapi::OpenApi> = vec![
        public::ApiDoc::openapi(),
        recipes::ApiDoc::openapi(),
        add_recipe::ApiDoc::openapi(),
        profile::ApiDoc::openapi(),
        availability::ApiDoc::openapi(),
    ];

    for module_spec in modules {
        spec.paths.paths.extend(module_spec.paths.paths);

        if let Some(module_components) = module_spec.components {
            if let Some(spec_components) = spec.components.as_mut() {
                spec_components.schemas.extend(module_components.schemas);
            }
        }
    }

    spec
}
