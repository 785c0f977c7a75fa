use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Config;
use crate::error::{AppError, Result};

/// A text-generation backend that turns one prompt into one reply.
#[async_trait]
pub trait StudyProvider: Send + Sync {
    /// Returns the reply text, or `None` when the provider answered without any.
    async fn generate(&self, prompt: &str) -> Result<Option<String>>;
}

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    role: &'a str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Deserialize, Debug)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize, Debug)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize, Debug)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize, Debug)]
struct Part {
    text: Option<String>,
    #[serde(default)]
    thought: bool,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate, skipping thought parts.
    fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let mut texts = parts
            .iter()
            .filter(|part| !part.thought)
            .filter_map(|part| part.text.as_deref())
            .peekable();
        texts.peek()?;
        Some(texts.collect())
    }
}

#[derive(Deserialize)]
struct ApiErrorEnvelope {
    error: ApiError,
}

#[derive(Deserialize)]
struct ApiError {
    code: Option<u16>,
    message: Option<String>,
    status: Option<String>,
}

fn describe_api_error(status: reqwest::StatusCode, body: &str) -> String {
    match serde_json::from_str::<ApiErrorEnvelope>(body) {
        Ok(ApiErrorEnvelope { error }) => format!(
            "{} {}. {}",
            error.code.unwrap_or(status.as_u16()),
            error.status.unwrap_or_else(|| status.to_string()),
            error.message.unwrap_or_default()
        ),
        Err(_) => format!("{}: {}", status, body),
    }
}

/// Google Gemini `generateContent` over REST.
pub struct GeminiClient {
    client: Client,
    api_key: String,
    endpoint: String,
}

impl GeminiClient {
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::new(),
            api_key: config.gemini_api_key.clone(),
            endpoint: format!(
                "{}/models/{}:generateContent",
                config.gemini_api_base, config.gemini_model
            ),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl StudyProvider for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<Option<String>> {
        let body = GenerateContentRequest {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        debug!(endpoint = %self.endpoint, prompt_len = prompt.len(), "sending prompt to Gemini");
        let res = self
            .client
            .post(&self.endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = res.status();
        let text = res.text().await?;
        if !status.is_success() {
            return Err(AppError::Upstream(describe_api_error(status, &text)));
        }

        let envelope: GenerateContentResponse = serde_json::from_str(&text).map_err(|e| {
            AppError::Upstream(format!("Invalid response format from Gemini: {}", e))
        })?;
        Ok(envelope.text())
    }
}

/// Removes markdown code-fence markers and surrounding whitespace.
///
/// Every literal "```json" and then every literal "```" is dropped wherever it
/// appears, balanced or not.
pub fn strip_code_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_json_fence() {
        assert_eq!(strip_code_fences("```json\n{\"summary\":\"x\"}\n```"), "{\"summary\":\"x\"}");
    }

    #[test]
    fn strips_unbalanced_fence() {
        assert_eq!(strip_code_fences("  ```json\n[1, 2]\n"), "[1, 2]");
        assert_eq!(strip_code_fences("{\"a\":1}```"), "{\"a\":1}");
    }

    #[test]
    fn strips_fences_inside_text() {
        assert_eq!(strip_code_fences("```\n{\"a\":\"```\"}\n```"), "{\"a\":\"\"}");
    }

    #[test]
    fn plain_text_is_only_trimmed() {
        assert_eq!(strip_code_fences("\n not json at all \t"), "not json at all");
        assert_eq!(strip_code_fences(""), "");
    }

    #[test]
    fn reply_text_joins_parts_of_first_candidate() {
        let envelope: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[
                {"content":{"role":"model","parts":[
                    {"text":"thinking","thought":true},
                    {"text":"{\"summary\":"},
                    {"text":"\"x\"}"}
                ]}},
                {"content":{"parts":[{"text":"ignored"}]}}
            ],"usageMetadata":{"totalTokenCount":3}}"#,
        )
        .unwrap();
        assert_eq!(envelope.text().as_deref(), Some("{\"summary\":\"x\"}"));
    }

    #[test]
    fn reply_without_text_is_none() {
        let empty: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(empty.text(), None);

        let blocked: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#).unwrap();
        assert_eq!(blocked.text(), None);
    }

    #[test]
    fn api_errors_are_described() {
        let body = r#"{"error":{"code":429,"message":"Quota exceeded","status":"RESOURCE_EXHAUSTED"}}"#;
        assert_eq!(
            describe_api_error(reqwest::StatusCode::TOO_MANY_REQUESTS, body),
            "429 RESOURCE_EXHAUSTED. Quota exceeded"
        );
        assert_eq!(
            describe_api_error(reqwest::StatusCode::BAD_GATEWAY, "upstream down"),
            "502 Bad Gateway: upstream down"
        );
    }

    #[test]
    fn endpoint_names_the_model() {
        let config = Config::from_lookup(|key| match key {
            "GEMINI_API_KEY" => Some("k".to_string()),
            _ => None,
        })
        .unwrap();
        let client = GeminiClient::new(&config);
        assert_eq!(
            client.endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }
}
