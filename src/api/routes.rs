use std::time::Instant;

use axum::{
    Router,
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::Value;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnResponse, TraceLayer};
use tracing::{Level, debug, error, info, warn};

use crate::AppState;
use crate::api::models::{GenerationRequest, StudyMaterial};
use crate::api::response;
use crate::error::{AppError, Result};
use crate::llm::strip_code_fences;
use crate::prompt::build_prompt;

pub const HEALTH_MESSAGE: &str = "Study backend is running";
pub const NO_CONTENT_MESSAGE: &str = "No content provided";

const CONTENT_PREVIEW_CHARS: usize = 100;

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(health_handler))
        .route("/generate", post(generate_handler))
        .layer(DefaultBodyLimit::disable())
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(app_state)
}

async fn health_handler() -> &'static str {
    HEALTH_MESSAGE
}

async fn generate_handler(State(state): State<AppState>, body: Bytes) -> Response {
    let start_time = Instant::now();
    let result = process_generate_request(&state, &body).await;
    let elapsed = start_time.elapsed();

    match result {
        Ok(material) => {
            info!(?elapsed, "returning parsed study material");
            response::success(material).into_response()
        }
        Err(err) => {
            match &err {
                AppError::Validation(msg) => warn!(?elapsed, "rejected request: {}", msg),
                AppError::Upstream(msg) => error!(?elapsed, "provider call failed: {}", msg),
                AppError::Parse { raw, source } => {
                    error!(?elapsed, %source, raw = %raw, "model reply is not valid JSON")
                }
                AppError::Unexpected(msg) | AppError::Config(msg) => {
                    error!(?elapsed, "unexpected error: {}", msg)
                }
            }
            err.into_response()
        }
    }
}

async fn process_generate_request(state: &AppState, body: &[u8]) -> Result<Value> {
    let req = decode_request(body)?;

    let preview: String = req.content.chars().take(CONTENT_PREVIEW_CHARS).collect();
    info!(title = %req.title, content = %preview, "received generation request");

    if req.content.trim().is_empty() {
        return Err(AppError::Validation(NO_CONTENT_MESSAGE.to_string()));
    }

    let prompt = build_prompt(&req.title, &req.content);
    debug!(prompt_len = prompt.len(), "built prompt");

    let text = call_provider(state, &prompt).await?.unwrap_or_default();
    debug!(raw = %text, "provider reply");

    let clean = strip_code_fences(&text);
    debug!(cleaned = %clean, "cleaned provider reply");

    let parsed: Value = match serde_json::from_str(&clean) {
        Ok(value) => value,
        Err(source) => return Err(AppError::Parse { raw: clean, source }),
    };

    if let Err(e) = StudyMaterial::deserialize(&parsed) {
        warn!("model reply does not match the study material shape, forwarding as-is: {}", e);
    }

    Ok(parsed)
}

/// Reads the body as JSON whatever its content type. Empty values (`null`,
/// `false`, `0`, `""`, `[]`) count as `{}`.
fn decode_request(body: &[u8]) -> Result<GenerationRequest> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| AppError::Unexpected(format!("Failed to decode JSON object: {}", e)))?;

    if is_empty_value(&value) {
        return Ok(GenerationRequest::default());
    }

    match value {
        Value::Object(_) => serde_json::from_value(value)
            .map_err(|e| AppError::Unexpected(format!("Invalid request body: {}", e))),
        other => Err(AppError::Unexpected(format!(
            "Request body must be a JSON object, got {}",
            json_kind(&other)
        ))),
    }
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(_) => false,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

async fn call_provider(state: &AppState, prompt: &str) -> Result<Option<String>> {
    let call = state.provider.generate(prompt);
    match state.config.upstream_timeout {
        Some(limit) => tokio::time::timeout(limit, call)
            .await
            .map_err(|_| AppError::Upstream(format!("Provider call timed out after {:?}", limit)))?,
        None => call.await,
    }
}

fn handle_panic(err: Box<dyn std::any::Any + Send + 'static>) -> Response {
    let message = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unknown panic while handling request".to_string()
    };
    error!("handler panicked: {}", message);
    AppError::Unexpected(message).into_response()
}
