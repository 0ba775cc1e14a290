/// Error handling for the API server
///
/// This module provides a unified error type that maps to HTTP responses.
/// All handlers return `Result<T, ApiError>`.
///
/// Two lifecycle outcomes are not errors from the visitor's point of view
/// and become `303 See Other` redirects instead: an anonymous visitor is sent
/// to `/signIn`, and an unknown (or foreign) project or task sends the
/// owner back to `/projectHome`.
///
/// # Example
///
/// ```no_run
/// use axum::Json;
/// use planboard_api::error::ApiResult;
/// use planboard_shared::lifecycle;
/// use planboard_shared::db::pool::DbPool;
///
/// async fn handler(db: DbPool) -> ApiResult<Json<usize>> {
///     let projects = lifecycle::list_projects(&db).await?;
///     Ok(Json(projects.len()))
/// }
/// ```

use std::fmt;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use planboard_shared::{
    auth::{password::PasswordError, session::SessionError},
    forms::FieldError,
    lifecycle::LifecycleError,
};
use serde::{Deserialize, Serialize};

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Where anonymous visitors are sent
pub const SIGN_IN_PATH: &str = "/signIn";

/// Where owners land after a mutation or an unknown id
pub const HOME_PATH: &str = "/projectHome";

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Unauthorized (401) - failed sign-in
    Unauthorized(String),

    /// Conflict (409)
    Conflict(String),

    /// Unprocessable entity (422) - validation errors
    ValidationError(Vec<FieldError>),

    /// A rejected form, re-rendered with the submitted values and errors
    FormRejected {
        status: StatusCode,
        view: serde_json::Value,
    },

    /// See Other (303)
    Redirect(String),

    /// Internal server error (500)
    InternalError(String),

    /// Service unavailable (503)
    ServiceUnavailable(String),
}

/// Error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code (e.g., "validation_error", "unauthorized")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Optional validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

impl ApiError {
    /// Re-renders `view` with the given status
    pub fn form<V: Serialize>(status: StatusCode, view: &V) -> Self {
        match serde_json::to_value(view) {
            Ok(view) => ApiError::FormRejected { status, view },
            Err(e) => ApiError::InternalError(format!("Failed to serialise form view: {}", e)),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::ValidationError(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            ApiError::FormRejected { status, .. } => write!(f, "Form rejected: {}", status),
            ApiError::Redirect(location) => write!(f, "Redirect to {}", location),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
            ApiError::ServiceUnavailable(msg) => write!(f, "Service unavailable: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message, details) = match self {
            ApiError::Redirect(location) => return Redirect::to(&location).into_response(),
            ApiError::FormRejected { status, view } => return (status, Json(view)).into_response(),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg, None),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg, None),
            ApiError::ValidationError(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "validation_error",
                "Request validation failed".to_string(),
                Some(errors),
            ),
            ApiError::InternalError(msg) => {
                // Log internal errors but don't expose details to clients
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
            ApiError::ServiceUnavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "service_unavailable",
                msg,
                None,
            ),
        };

        let body = Json(ErrorResponse {
            error: error_code.to_string(),
            message,
            details,
        });

        (status, body).into_response()
    }
}

/// Convert lifecycle errors to API errors
impl From<LifecycleError> for ApiError {
    fn from(err: LifecycleError) -> Self {
        match err {
            LifecycleError::Validation(errors) => ApiError::ValidationError(errors),
            LifecycleError::DuplicateEmail(email) => {
                ApiError::Conflict(format!("Email {} already exists!", email))
            }
            LifecycleError::NotFound { entity, id } => {
                tracing::debug!(entity, id, "Unknown id, redirecting home");
                ApiError::Redirect(HOME_PATH.to_string())
            }
            LifecycleError::Authentication => {
                ApiError::Unauthorized(LifecycleError::Authentication.to_string())
            }
            LifecycleError::AnonymousAccess => ApiError::Redirect(SIGN_IN_PATH.to_string()),
            LifecycleError::Password(e) => e.into(),
            LifecycleError::Store(e) => e.into(),
        }
    }
}

/// Convert sqlx errors to API errors
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                ApiError::ServiceUnavailable("Database unavailable".to_string())
            }
            _ => ApiError::InternalError(format!("Database error: {}", err)),
        }
    }
}

/// Convert password errors to API errors
impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        ApiError::InternalError(format!("Password operation failed: {}", err))
    }
}

/// Convert session errors to API errors
///
/// Only issuing can fail at the HTTP layer; bad tokens resolve to anonymous.
impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        ApiError::InternalError(format!("Session operation failed: {}", err))
    }
}
