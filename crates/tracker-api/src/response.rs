//! Successful outcomes of resource requests

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};

/// A successful resource operation, ready to render.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse {
    /// 200 with an array of resources
    Listed(Vec<Value>),

    /// 200 with one resource
    Shown(Value),

    /// 201 with the new resource and its canonical location
    Created {
        /// Canonical URL of the resource
        location: String,
        /// Serialized resource
        body: Value,
    },

    /// 202 with the updated resource and its canonical location
    Accepted {
        /// Canonical URL of the resource
        location: String,
        /// Serialized resource
        body: Value,
    },

    /// 200 acknowledgment of a deletion
    Deleted,
}

impl ApiResponse {
    /// HTTP status for this outcome.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiResponse::Listed(_) | ApiResponse::Shown(_) | ApiResponse::Deleted => StatusCode::OK,
            ApiResponse::Created { .. } => StatusCode::CREATED,
            ApiResponse::Accepted { .. } => StatusCode::ACCEPTED,
        }
    }

    /// `Location` header value, if any.
    pub fn location(&self) -> Option<&str> {
        match self {
            ApiResponse::Created { location, .. } | ApiResponse::Accepted { location, .. } => Some(location),
            _ => None,
        }
    }

    /// JSON body for this outcome.
    pub fn body(&self) -> Value {
        match self {
            ApiResponse::Listed(items) => Value::Array(items.clone()),
            ApiResponse::Shown(body)
            | ApiResponse::Created { body, .. }
            | ApiResponse::Accepted { body, .. } => body.clone(),
            ApiResponse::Deleted => json!({
                "success": true,
                "message": "Resource successfully deleted.",
                "status": "204"
            }),
        }
    }
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let location = self.location().and_then(|l| HeaderValue::from_str(l).ok());
        let mut response = (status, Json(self.body())).into_response();
        if let Some(location) = location {
            response.headers_mut().insert(header::LOCATION, location);
        }
        response
    }
}
