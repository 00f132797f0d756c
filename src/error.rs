use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::{
    password::PasswordError,
    repository::StorageError,
    validation::{FieldError, ValidationFailure},
};

/// NotFoundReason
///
/// Why a lookup by identifier failed. Both reasons reach the client the same way;
/// the distinction exists so callers (and tests) can tell whether storage was consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotFoundReason {
    /// The identifier is not a well-formed id; storage was never queried.
    InvalidId,
    /// The identifier is well-formed but matches no record.
    Unmatched,
}

/// ServiceError
///
/// Every failure a service operation can raise, tagged by kind.
/// `classify` is the only place that turns these into HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationFailure),

    #[error("{0}")]
    AlreadyExists(String),

    #[error("{message}")]
    NotFound {
        reason: NotFoundReason,
        message: String,
    },

    #[error("Email or password is incorrect")]
    CredentialMismatch,

    #[error("{0}")]
    Unauthorized(String),

    #[error("You are not allowed to perform this action")]
    Forbidden,

    #[error("password hashing failed: {0}")]
    Password(#[from] PasswordError),

    #[error("credential signing failed: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),

    #[error("storage failure: {0}")]
    Storage(StorageError),

    #[error("{0}")]
    Internal(String),
}

impl ServiceError {
    pub fn invalid_id(entity: &str, id: &str) -> Self {
        Self::NotFound {
            reason: NotFoundReason::InvalidId,
            message: format!("The {entity} with id {id} does not exist"),
        }
    }

    pub fn unmatched(entity: &str, id: impl std::fmt::Display) -> Self {
        Self::NotFound {
            reason: NotFoundReason::Unmatched,
            message: format!("The {entity} with id {id} does not exist"),
        }
    }

    pub fn not_found_reason(&self) -> Option<NotFoundReason> {
        match self {
            Self::NotFound { reason, .. } => Some(*reason),
            _ => None,
        }
    }
}

impl From<StorageError> for ServiceError {
    fn from(err: StorageError) -> Self {
        match err {
            // The table constraint is the backstop for the uniqueness check.
            StorageError::UniqueViolation(_) => {
                Self::AlreadyExists("A user with this email already exists".to_string())
            }
            other => Self::Storage(other),
        }
    }
}

/// ApiError
///
/// The HTTP-facing shape of a classified failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// 400: every violated field at once.
    BadInput(Vec<FieldError>),
    /// 409: already exists, does not exist, credential mismatch.
    Conflict(String),
    /// 401: missing, invalid or expired credential.
    Unauthorized(String),
    /// 403: recognized identity without the required privilege.
    Forbidden(String),
    /// 500: generic message only; the cause stays in the logs.
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadInput(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match self {
            Self::BadInput(errors) => json!({ "errors": errors }),
            Self::Conflict(message)
            | Self::Unauthorized(message)
            | Self::Forbidden(message)
            | Self::Internal(message) => json!({ "error": message }),
        };
        (status, Json(body)).into_response()
    }
}

pub const DEFAULT_INTERNAL_MESSAGE: &str = "Internal server error";

/// classify
///
/// Maps a service failure to its response. First match wins:
/// validation → 400, domain conflicts → 409, authentication → 401,
/// authorization → 403, anything else → 500 with `default_message`.
pub fn classify(err: ServiceError, default_message: &str) -> ApiError {
    match err {
        ServiceError::Validation(failure) => ApiError::BadInput(failure.errors),
        err @ (ServiceError::AlreadyExists(_)
        | ServiceError::NotFound { .. }
        | ServiceError::CredentialMismatch) => ApiError::Conflict(err.to_string()),
        ServiceError::Unauthorized(message) => ApiError::Unauthorized(message),
        err @ ServiceError::Forbidden => {
            tracing::warn!("authorization denied");
            ApiError::Forbidden(err.to_string())
        }
        err @ (ServiceError::Password(_)
        | ServiceError::Signing(_)
        | ServiceError::Storage(_)
        | ServiceError::Internal(_)) => {
            tracing::error!(error = %err, "{default_message}");
            ApiError::Internal(default_message.to_string())
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        classify(err, DEFAULT_INTERNAL_MESSAGE)
    }
}
