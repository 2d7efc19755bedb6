use thiserror::Error;

use crate::ai::ExtractError;
use crate::store::StoreError;

/// Errors surfaced by [`crate::service::RecipeService`] operations.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Caller is anonymous, or is not the owner of the resource.
    #[error("Not authorized")]
    NotAuthorized,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Error analyzing {input}: {source}")]
    Extraction {
        input: &'static str,
        #[source]
        source: ExtractError,
    },

    #[error("Storage error while trying to {op}: {source}")]
    Storage {
        op: &'static str,
        #[source]
        source: StoreError,
    },
}

/// Wrap a store failure with the operation that hit it. Uniqueness violations
/// become [`ServiceError::Conflict`], a missing owner profile a validation error.
pub(crate) fn storage_error(op: &'static str) -> impl FnOnce(StoreError) -> ServiceError {
    move |source| match source {
        StoreError::SlugConflict { .. } | StoreError::UsernameConflict { .. } => {
            ServiceError::Conflict(source.to_string())
        }
        StoreError::UnknownOwner { .. } => ServiceError::Validation(source.to_string()),
        other => ServiceError::Storage { op, source: other },
    }
}

pub(crate) fn extraction_error(input: &'static str) -> impl FnOnce(ExtractError) -> ServiceError {
    move |source| match source {
        ExtractError::InvalidInput(message) => ServiceError::Validation(message),
        other => ServiceError::Extraction {
            input,
            source: other,
        },
    }
}
