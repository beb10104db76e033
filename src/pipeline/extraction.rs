//! The model call and best-effort JSON extraction from its reply.
//!
//! The provider speaks the OpenAI chat-completions dialect. Decoding is
//! pinned deterministic (temperature 0) with JSON response mode, but the
//! reply is still treated as untrusted free text and parsed tolerantly.

use std::sync::OnceLock;
use std::time::Duration;

use regex::Regex;
use serde_json::{json, Map, Value};
use tracing::{error, info, warn};

use super::prompts::build_system_prompt;
use super::timeline::ContentBlock;
use crate::config::AppConfig;
use crate::error::ReportError;

/// Request timeout for the extraction call.
const API_TIMEOUT_SECS: u64 = 60;

static FENCE_OPEN_RE: OnceLock<Regex> = OnceLock::new();
static JSON_SPAN_RE: OnceLock<Regex> = OnceLock::new();

/// Send the assembled content to the model and return its reply text.
///
/// # Errors
/// [`ReportError::Config`] when no API key is configured;
/// [`ReportError::ModelApi`] on timeout, transport failure, non-2xx
/// status, or a response wrapper without text content.
pub async fn request_report(
    config: &AppConfig,
    content: &[ContentBlock],
) -> Result<String, ReportError> {
    if config.api_key.is_empty() {
        return Err(ReportError::Config(
            "API key not configured; set POIXE_API_KEY or api_key in the config file".to_string(),
        ));
    }

    let client = build_api_client()?;
    let user_content: Vec<Value> = content.iter().map(ContentBlock::to_content_part).collect();

    let body = json!({
        "model": config.model,
        "messages": [
            { "role": "system", "content": build_system_prompt() },
            { "role": "user", "content": user_content }
        ],
        "temperature": 0.0,
        "response_format": { "type": "json_object" }
    });

    let url = format!(
        "{}/chat/completions",
        config.api_base_url.trim_end_matches('/')
    );
    info!(
        "Requesting report extraction from '{}' (model '{}', {} content blocks)",
        url,
        config.model,
        content.len()
    );

    let response = client
        .post(&url)
        .bearer_auth(&config.api_key)
        .header("content-type", "application/json")
        .json(&body)
        .send()
        .await
        .map_err(|e| {
            let msg = if e.is_timeout() {
                format!("model API timeout after {}s", API_TIMEOUT_SECS)
            } else {
                format!("model API request failed: {}", e)
            };
            error!("{}", msg);
            ReportError::ModelApi(msg)
        })?;

    let body_text = handle_api_response(response).await?;

    let wrapper: Value = serde_json::from_str(&body_text).map_err(|e| {
        let msg = format!("failed to parse model API response wrapper: {}", e);
        error!("{}", msg);
        ReportError::ModelApi(msg)
    })?;

    wrapper["choices"][0]["message"]["content"]
        .as_str()
        .map(|s| s.to_string())
        .ok_or_else(|| {
            let msg = "no text content in model API response".to_string();
            error!("{}", msg);
            ReportError::ModelApi(msg)
        })
}

fn build_api_client() -> Result<reqwest::Client, ReportError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(API_TIMEOUT_SECS))
        .build()
        .map_err(|e| ReportError::ModelApi(format!("failed to build HTTP client: {}", e)))
}

/// Check status and read the body, truncating error payloads for logs.
async fn handle_api_response(response: reqwest::Response) -> Result<String, ReportError> {
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<failed to read body>".to_string());
        let truncated = if body.len() > 1024 {
            format!("{}...", &body[..1024])
        } else {
            body
        };
        let msg = format!("model API error: {} - {}", status, truncated);
        error!("{}", msg);
        return Err(ReportError::ModelApi(msg));
    }
    response
        .text()
        .await
        .map_err(|e| ReportError::ModelApi(format!("failed to read API response body: {}", e)))
}

/// Best-effort extraction of one JSON object from free-form model output.
///
/// Attempts, first success wins: strict parse; strip markdown code fences
/// and reparse; regex-extract the first greedy `{...}` span and parse
/// that. An attempt only counts if it yields an object. Total failure
/// returns an empty map — malformed output is recovered here, never
/// raised.
pub fn extract_json_object(text: &str) -> Map<String, Value> {
    if let Some(map) = parse_object(text) {
        return map;
    }

    let fence_re =
        FENCE_OPEN_RE.get_or_init(|| Regex::new(r"(?i)```json\s*").unwrap());
    let stripped = fence_re.replace_all(text, "").replace("```", "");
    if let Some(map) = parse_object(&stripped) {
        return map;
    }

    let span_re = JSON_SPAN_RE.get_or_init(|| Regex::new(r"(?s)\{.*\}").unwrap());
    if let Some(m) = span_re.find(&stripped) {
        if let Some(map) = parse_object(m.as_str()) {
            return map;
        }
    }

    warn!(
        "no JSON object found in model output ({} chars), using empty result",
        text.len()
    );
    Map::new()
}

fn parse_object(text: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(text.trim()) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}
