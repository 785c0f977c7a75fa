use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::api::response;

pub const INVALID_JSON_MESSAGE: &str = "Invalid JSON from model";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Provider error: {0}")]
    Upstream(String),

    #[error("Invalid JSON from model: {source}")]
    Parse {
        raw: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unexpected error: {0}")]
    Unexpected(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Validation(msg) => response::error(StatusCode::BAD_REQUEST, msg).into_response(),
            AppError::Upstream(msg) | AppError::Unexpected(msg) | AppError::Config(msg) => {
                response::error(StatusCode::INTERNAL_SERVER_ERROR, msg).into_response()
            }
            AppError::Parse { raw, .. } => response::invalid_json(raw).into_response(),
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Upstream(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
