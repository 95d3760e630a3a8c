//! Mapping of forward outcomes onto HTTP responses.
//!
//! Errors use a fixed JSON shape, [`ErrorBody`]:
//! `{"statusCode", "error", "message", "data"?}`. Transport failures are
//! masked behind a generic 500 with no detail.

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use super::forward::Payload;
use crate::error::ForwardError;

pub const INTERNAL_MESSAGE: &str = "An internal server error occurred";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub status_code: u16,
    pub error: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

impl ErrorBody {
    #[must_use]
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status_code: status.as_u16(),
            error: status.canonical_reason().unwrap_or("Unknown").to_string(),
            message: message.into(),
            data: None,
        }
    }

    #[must_use]
    pub fn with_data(mut self, data: impl Into<String>) -> Self {
        self.data = Some(data.into());
        self
    }

    /// Build the body for a failed forward to `target`.
    #[must_use]
    pub fn from_forward_error(err: &ForwardError, target: Option<&str>) -> Self {
        match err {
            ForwardError::MissingTargetUrl => Self::new(err.status(), err.to_string()),
            ForwardError::Upstream { status, message } => {
                let body = Self::new(*status, message.clone());
                match target {
                    Some(target) => body.with_data(target),
                    None => body,
                }
            }
            ForwardError::Transport { .. } => Self::new(err.status(), INTERNAL_MESSAGE),
        }
    }
}

impl IntoResponse for ErrorBody {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

#[must_use]
pub fn error_response(err: &ForwardError, target: Option<&str>) -> Response {
    ErrorBody::from_forward_error(err, target).into_response()
}

#[must_use]
pub fn success_response(payload: Payload) -> Response {
    match payload {
        Payload::Json(value) => (StatusCode::OK, Json(value)).into_response(),
        Payload::Text { content_type, body } => {
            let content_type = content_type
                .unwrap_or_else(|| HeaderValue::from_static("text/plain; charset=utf-8"));
            (StatusCode::OK, [(header::CONTENT_TYPE, content_type)], body).into_response()
        }
        Payload::Empty => StatusCode::OK.into_response(),
    }
}

/// Any path other than `/`.
pub async fn not_found() -> Response {
    ErrorBody::new(StatusCode::NOT_FOUND, "Not Found").into_response()
}
