//! Route-level error taxonomy.
//!
//! Missing-input errors are caught before any provider call; provider
//! rejections relay the provider's own message; everything unexpected is a
//! 500 with a generic message (detail is logged server-side and only
//! exposed in development).

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// A required field is absent from the request body or query.
    #[error("{0}")]
    MissingInput(String),

    /// No bearer token, or no identity to act on.
    #[error("{0}")]
    Unauthorized(String),

    /// The provider refused the forwarded call; its message passes
    /// through under the status the route contract names.
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },

    /// Transport failure or anything else unexpected.
    #[error("{message}")]
    Internal { message: String },
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingInput(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Rejected { status, .. } => *status,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": true,
            "message": self.to_string(),
        }));
        (self.status(), body).into_response()
    }
}
