//! Errors returned by the HTTP handlers.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use map_common::MapError;
use query_client::QueryError;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Map(#[from] MapError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        let code = match self {
            ApiError::InvalidBody(_) => 400,
            ApiError::Query(err) => err.http_status_code(),
            ApiError::Map(err) => err.http_status_code(),
        };
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match &self {
            ApiError::InvalidBody(_) => json!({ "error": self.to_string() }),
            ApiError::Query(err) if err.is_client_error() => json!({ "error": err.to_string() }),
            ApiError::Query(
                err @ (QueryError::Upstream { .. } | QueryError::Http(_) | QueryError::Decode(_)),
            ) => {
                error!(error = %err, "Database query failed");
                json!({ "error": "Database query failed", "details": err.to_string() })
            }
            ApiError::Map(err) if status == StatusCode::BAD_REQUEST => {
                json!({ "error": err.to_string() })
            }
            other => {
                error!(error = %other, "Request failed");
                json!({ "error": "Internal server error" })
            }
        };

        if status.is_client_error() {
            warn!(status = status.as_u16(), "Rejected request");
        }

        (status, Json(body)).into_response()
    }
}
