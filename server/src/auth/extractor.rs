use crate::api::ErrorResponse;
use crate::AppState;
use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use recipebox_core::CallerIdentity;

/// Extractor that resolves the Authorization header into a [`CallerIdentity`].
///
/// A request without the header is anonymous; the service decides whether
/// that is enough. A header that is present but unusable is rejected:
/// ```ignore
/// async fn my_handler(Caller(caller): Caller) -> impl IntoResponse {
///     // caller is Anonymous or Authenticated(profile_id)
/// }
/// ```
pub struct Caller(pub CallerIdentity);

#[derive(Debug)]
pub enum AuthError {
    InvalidHeader,
    InvalidFormat,
    InvalidToken,
    LookupFailed,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::InvalidHeader => (StatusCode::UNAUTHORIZED, "Invalid Authorization header"),
            AuthError::InvalidFormat => (
                StatusCode::UNAUTHORIZED,
                "Invalid Authorization header format",
            ),
            AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "Invalid or expired token"),
            AuthError::LookupFailed => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to verify credentials",
            ),
        };
        let code = if status == StatusCode::UNAUTHORIZED {
            "not_authorized"
        } else {
            "storage_error"
        };

        (status, Json(ErrorResponse::new(message, code))).into_response()
    }
}

impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);

        let Some(auth_header) = parts.headers.get(header::AUTHORIZATION) else {
            return Ok(Caller(CallerIdentity::Anonymous));
        };

        let auth_str = auth_header.to_str().map_err(|_| AuthError::InvalidHeader)?;

        let token = auth_str
            .strip_prefix("Bearer ")
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::InvalidFormat)?;

        let profile_id = state
            .identity
            .resolve(token)
            .await
            .map_err(|e| {
                tracing::error!("Identity lookup failed: {}", e);
                AuthError::LookupFailed
            })?
            .ok_or(AuthError::InvalidToken)?;

        Ok(Caller(CallerIdentity::Authenticated(profile_id)))
    }
}
