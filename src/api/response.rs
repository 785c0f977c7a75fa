use axum::Json;
use axum::http::StatusCode;
use serde::Serialize;
use serde_json::Value;

use crate::error::INVALID_JSON_MESSAGE;

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
}

/// The model's JSON is forwarded as-is, without an envelope.
pub fn success(data: Value) -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(data))
}

pub fn error(status: StatusCode, message: String) -> (StatusCode, Json<ErrorBody>) {
    (
        status,
        Json(ErrorBody {
            error: message,
            raw: None,
        }),
    )
}

pub fn invalid_json(raw: String) -> (StatusCode, Json<ErrorBody>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody {
            error: INVALID_JSON_MESSAGE.to_string(),
            raw: Some(raw),
        }),
    )
}
