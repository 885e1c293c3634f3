//! Claude API integration for the baby tracker.
//!
//! Turns recent activity logs into a short, parent-friendly summary. Every
//! failure degrades to a fixed message; callers always get text to show.

use std::fmt;
use std::time::Duration;

use bt_core::digest::InsightEntry;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default request timeout for API calls.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const INSIGHT_MAX_TOKENS: u32 = 1024;
const INSIGHT_TEMPERATURE: f32 = 0.4;

/// Shown when no API key is configured.
pub const NO_API_KEY_MESSAGE: &str = "Please provide an API Key to generate insights.";
/// Shown when the request fails for any reason.
pub const UNAVAILABLE_MESSAGE: &str =
    "Unable to generate insights at the moment. Please try again later.";
/// Shown when the model answers with no text.
pub const EMPTY_MESSAGE: &str = "No insights generated.";

const SYSTEM_PROMPT: &str = "\
You are a helpful, empathetic pediatric nutrition assistant and baby data analyst.
Analyze the provided feeding logs for a baby.
Identify patterns, suggest improvements if relevant (standard generic advice, always with a disclaimer to consult a doctor), and summarize the day's progress.
Keep responses concise, encouraging, and easy for a tired parent to read.
Focus on:
1. Total feeding time or volume per day.
2. Frequency of feedings.
3. Balance between sides (if breastfeeding).
4. Any trends (e.g., \"Cluster feeding detected\").

Do not provide medical diagnosis.";

/// LLM client errors.
#[derive(Debug, Error)]
pub enum LlmError {
    /// The provided API key was invalid.
    #[error("invalid API key: {reason}")]
    InvalidApiKey { reason: &'static str },
    /// Failed to build HTTP client.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
    /// HTTP request failed.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// Failed to encode the log projection.
    #[error("failed to encode logs: {0}")]
    Encode(#[from] serde_json::Error),
    /// API returned an error response.
    #[error("API error: {message}")]
    Api { message: String },
    /// Failed to parse response.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Claude API client.
///
/// # Thread Safety
///
/// The client is safe to clone and share across threads. Each clone shares
/// the underlying HTTP connection pool.
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    api_key: String,
    url: String,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("api_key", &"[REDACTED]")
            .field("url", &self.url)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Creates a new client with the given API key.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is empty or whitespace-only, or if
    /// the HTTP client fails to build.
    pub fn new(api_key: impl Into<String>) -> Result<Self, LlmError> {
        let api_key = api_key.into();

        if api_key.is_empty() {
            return Err(LlmError::InvalidApiKey {
                reason: "API key cannot be empty",
            });
        }
        if api_key.trim().is_empty() {
            return Err(LlmError::InvalidApiKey {
                reason: "API key cannot be whitespace-only",
            });
        }

        let http = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(LlmError::ClientBuild)?;

        Ok(Self {
            http,
            api_key,
            url: ANTHROPIC_API_URL.to_string(),
        })
    }

    /// Sends requests to `url` instead of the public API endpoint.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Asks the model to summarize `entries`. The returned text may be empty.
    pub async fn summarize_logs(
        &self,
        model: &str,
        entries: &[InsightEntry],
    ) -> Result<String, LlmError> {
        let request = MessageRequest {
            model: model.to_string(),
            max_tokens: INSIGHT_MAX_TOKENS,
            temperature: INSIGHT_TEMPERATURE,
            system: SYSTEM_PROMPT,
            messages: vec![Message {
                role: "user",
                content: build_insight_prompt(entries)?,
            }],
        };
        tracing::debug!(model, entries = entries.len(), "requesting insights");

        let response = self
            .http
            .post(&self.url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(parse_api_error(&body).unwrap_or_else(|| LlmError::Api {
                message: format!("status {status}: {body}"),
            }));
        }

        let payload: MessageResponse = serde_json::from_str(&body)
            .map_err(|err| LlmError::InvalidResponse(err.to_string()))?;
        Ok(extract_text(payload.content))
    }
}

/// Insight text for `entries`, or one of the fixed fallback messages.
///
/// `None` means no API key is configured.
pub async fn generate_insights(
    client: Option<&Client>,
    model: &str,
    entries: &[InsightEntry],
) -> String {
    let Some(client) = client else {
        return NO_API_KEY_MESSAGE.to_string();
    };
    match client.summarize_logs(model, entries).await {
        Ok(text) if text.trim().is_empty() => EMPTY_MESSAGE.to_string(),
        Ok(text) => text,
        Err(err) => {
            tracing::warn!(error = %err, "insight request failed");
            UNAVAILABLE_MESSAGE.to_string()
        }
    }
}

#[derive(Debug, Serialize)]
struct MessageRequest {
    model: String,
    max_tokens: u32,
    temperature: f32,
    system: &'static str,
    messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock {
    Text {
        text: String,
    },
    #[serde(other)]
    Other,
}

fn extract_text(blocks: Vec<ContentBlock>) -> String {
    blocks
        .into_iter()
        .filter_map(|block| match block {
            ContentBlock::Text { text } => Some(text),
            ContentBlock::Other => None,
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn parse_api_error(body: &str) -> Option<LlmError> {
    #[derive(Deserialize)]
    struct ErrorPayload {
        error: ErrorDetails,
    }

    #[derive(Deserialize)]
    struct ErrorDetails {
        message: String,
    }

    serde_json::from_str::<ErrorPayload>(body)
        .ok()
        .map(|payload| LlmError::Api {
            message: payload.error.message,
        })
}

fn build_insight_prompt(entries: &[InsightEntry]) -> Result<String, LlmError> {
    let logs = serde_json::to_string(entries)?;
    Ok(format!(
        "Here are the recent feeding logs: {logs}. Please provide a summary and any helpful insights."
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(kind: &str, amount: &str) -> InsightEntry {
        InsightEntry {
            kind: kind.to_string(),
            time: "2025-01-01 08:00".to_string(),
            duration: "N/A".to_string(),
            amount: amount.to_string(),
            food: "N/A".to_string(),
        }
    }

    #[test]
    fn client_rejects_empty_api_key() {
        assert!(matches!(
            Client::new(""),
            Err(LlmError::InvalidApiKey { .. })
        ));
    }

    #[test]
    fn client_rejects_whitespace_api_key() {
        assert!(matches!(
            Client::new("   "),
            Err(LlmError::InvalidApiKey { .. })
        ));
    }

    #[test]
    fn client_debug_redacts_api_key() {
        let client = Client::new("secret-key").unwrap();
        let debug = format!("{client:?}");
        assert!(!debug.contains("secret-key"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn prompt_embeds_projection_as_json() {
        let prompt = build_insight_prompt(&[entry("bottle", "120ml")]).unwrap();
        assert!(prompt.starts_with("Here are the recent feeding logs: [{\"type\":\"bottle\""));
        assert!(prompt.contains("\"amount\":\"120ml\""));
        assert!(prompt.ends_with("Please provide a summary and any helpful insights."));
    }

    #[test]
    fn request_carries_system_prompt() {
        let request = MessageRequest {
            model: "m".to_string(),
            max_tokens: INSIGHT_MAX_TOKENS,
            temperature: INSIGHT_TEMPERATURE,
            system: SYSTEM_PROMPT,
            messages: Vec::new(),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert!(
            json["system"]
                .as_str()
                .unwrap()
                .contains("Do not provide medical diagnosis.")
        );
    }

    #[test]
    fn extract_text_skips_non_text_blocks() {
        let payload: MessageResponse = serde_json::from_str(
            r#"{"content":[{"type":"thinking","thinking":"..."},{"type":"text","text":"Feeds look steady."}]}"#,
        )
        .unwrap();
        assert_eq!(extract_text(payload.content), "Feeds look steady.");

        let empty: MessageResponse = serde_json::from_str(r#"{"content":[]}"#).unwrap();
        assert_eq!(extract_text(empty.content), "");
    }

    #[test]
    fn parse_api_error_reads_message() {
        let err = parse_api_error(r#"{"type":"error","error":{"type":"authentication_error","message":"invalid x-api-key"}}"#)
            .unwrap();
        assert_eq!(err.to_string(), "API error: invalid x-api-key");
        assert!(parse_api_error("<html>").is_none());
    }

    #[tokio::test]
    async fn missing_client_asks_for_api_key() {
        let text = generate_insights(None, "m", &[entry("bottle", "120ml")]).await;
        assert_eq!(text, NO_API_KEY_MESSAGE);
    }

    #[tokio::test]
    async fn unreachable_api_degrades_to_fallback() {
        let client = Client::new("key").unwrap().with_url("http://127.0.0.1:9/v1/messages");
        let text = generate_insights(Some(&client), "m", &[]).await;
        assert_eq!(text, UNAVAILABLE_MESSAGE);
    }
}
