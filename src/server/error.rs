//! HTTP mapping for [`TransformError`]
//!
//! Every error leaving a handler is rendered as `{"error": ..., "detail": ..., "status": ...}`.

use crate::utils::error::TransformError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

impl TransformError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            TransformError::MissingColumn { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            TransformError::NotFound { .. } => StatusCode::NOT_FOUND,
            TransformError::InvalidPath { .. } => StatusCode::BAD_REQUEST,
            e if e.is_rejection() => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for TransformError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({
            "error": self.user_friendly_message(),
            "detail": self.to_string(),
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}
