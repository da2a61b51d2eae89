//! Response shapes and error mapping.
//!
//! # Design Decisions
//! - Failures carry no payload: status code plus empty body
//! - Domain errors are logged here and surface as a generic 500
//! - Successful bodies are JSON; serialization failure is a 500 via [`Json`]

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::comment::CommentError;

/// Acknowledgement body, e.g. `{"Message":"Successfully deleted"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl IntoResponse for Message {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// Errors a handler can end with.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("missing path parameter: {0}")]
    MissingParam(&'static str),

    #[error("undecodable request body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid request: {0}")]
    Invalid(String),

    #[error(transparent)]
    Domain(#[from] CommentError),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingParam(_) | ApiError::Decode(_) | ApiError::Invalid(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Domain(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::info!(error = %self, "Request rejected");
        }
        status.into_response()
    }
}
