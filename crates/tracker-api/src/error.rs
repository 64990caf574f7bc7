//! API error types and their HTTP rendering

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};
use tracker_auth::AuthError;
use tracker_model::ValidationErrors;
use tracker_store::StoreError;

/// Message of the 401 body for authenticated actors without access.
pub const NOT_PERMITTED_MESSAGE: &str = "You don't have permission to view or modify that resource";

/// Message of the 404 body.
pub const NOT_FOUND_MESSAGE: &str = "Resource not found";

/// Message of the 401 body for anonymous requests.
pub const UNAUTHENTICATED_MESSAGE: &str = "You need to sign in or sign up before continuing.";

/// Errors a request can end in.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No valid session
    #[error("Unauthenticated: {0}")]
    Unauthenticated(AuthError),

    /// The request is malformed
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The resource exists but the actor may not touch it
    #[error("Not permitted")]
    NotPermitted,

    /// No such resource, kind, or route
    #[error("Not found")]
    NotFound,

    /// Field validation failed
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    /// Unexpected server-side failure; details are logged, not returned
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type for request handling.
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// HTTP status for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthenticated(_) | ApiError::NotPermitted => StatusCode::UNAUTHORIZED,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// JSON body for this error.
    pub fn body(&self) -> serde_json::Value {
        match self {
            ApiError::Unauthenticated(_) => json!({ "error": UNAUTHENTICATED_MESSAGE }),
            ApiError::BadRequest(message) => failure(message, "400"),
            ApiError::NotPermitted => failure(NOT_PERMITTED_MESSAGE, "401"),
            ApiError::NotFound => failure(NOT_FOUND_MESSAGE, "404"),
            ApiError::Validation(errors) => json!(errors),
            ApiError::Internal(_) => failure("Internal server error", "500"),
        }
    }
}

fn failure(message: &str, status: &str) -> serde_json::Value {
    json!({ "success": false, "error": message, "status": status })
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.body())).into_response()
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        warn!(%errors, "Validation failed");
        ApiError::Validation(errors)
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Validation(errors) => errors.into(),
            StoreError::NotFound(resource) => {
                warn!(%resource, "Record vanished during request");
                ApiError::NotFound
            }
            other => {
                error!(error = %other, "Store failure");
                ApiError::Internal(other.to_string())
            }
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        if err.is_server_error() {
            error!(error = %err, code = err.error_code(), "Authentication failure");
            ApiError::Internal(err.to_string())
        } else {
            warn!(code = err.error_code(), "Rejected credentials");
            ApiError::Unauthenticated(err)
        }
    }
}
