//! HTTP error responses.

use axum::{
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use depth_common::DepthFrameError;
use serde_json::json;
use tracing::{error, warn};

use crate::metrics;

/// Error returned by request handlers.
#[derive(Debug)]
pub enum ApiError {
    Frame(DepthFrameError),
    /// Query string missing a parameter or holding an unparsable value.
    BadQuery(String),
}

impl From<DepthFrameError> for ApiError {
    fn from(err: DepthFrameError) -> Self {
        ApiError::Frame(err)
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadQuery(rejection.body_text())
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Frame(e) => StatusCode::from_u16(e.http_status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            ApiError::BadQuery(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            ApiError::Frame(e) => e.error_code(),
            ApiError::BadQuery(_) => "InvalidQuery",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();
        let detail = match &self {
            ApiError::Frame(e) => e.to_string(),
            ApiError::BadQuery(msg) => msg.clone(),
        };

        match &self {
            ApiError::Frame(e) if e.is_integrity_violation() => {
                error!(code, detail = %detail, "Stored rows failed integrity checks")
            }
            _ if status.is_server_error() => error!(code, detail = %detail, "Request failed"),
            _ => warn!(code, status = status.as_u16(), detail = %detail, "Request rejected"),
        }
        metrics::record_error(code);

        (status, Json(json!({ "error": code, "detail": detail }))).into_response()
    }
}
