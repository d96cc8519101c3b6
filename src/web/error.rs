use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::{error::FeedError, logging};

/// Errors surfaced by the snapshot API, rendered as `{"message": ...}`.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    /// The upstream quote board could not be read
    #[error("Failed to refresh quotes: {0}")]
    Upstream(#[from] FeedError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();

        if status.is_server_error() {
            logging::error_file_async(format!("{} {}", status, message));
        }

        (status, Json(json!({ "message": message }))).into_response()
    }
}
