//! Gemini implementation of [`GenerationClient`].

use std::time::Duration;

use async_trait::async_trait;
use pipeline::{
    instruction_for, schema_for, ContentKind, GenerationClient, GenerationError, Prompt,
    RawModelResponse,
};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE, RETRY_AFTER};
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::wire::{Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, Part};

const API_KEY_HEADER: &str = "x-goog-api-key";
const MAX_ERROR_BODY_CHARS: usize = 2_000;

/// Gemini provider configuration.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API key for authentication.
    pub api_key: String,
    /// Model name (e.g. `"gemini-2.5-flash"`).
    pub model: String,
    /// Base endpoint URL, without a trailing slash.
    pub endpoint: String,
    /// Sampling temperature (0.0 - 2.0).
    pub temperature: f32,
    /// Request timeout.
    pub timeout: Duration,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: "gemini-2.5-flash".to_string(),
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            temperature: 0.4,
            timeout: Duration::from_secs(60),
        }
    }
}

/// Errors constructing a [`GeminiProvider`].
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Gemini API key is empty")]
    MissingApiKey,
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Generates drafts through Gemini's structured-output mode.
///
/// Each call sends the kind's response schema and system instruction with
/// `responseMimeType = application/json`. Exactly one HTTP request is made per
/// [`GenerationClient::generate`] call; failures are never retried here.
pub struct GeminiProvider {
    client: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiProvider {
    /// Creates a provider. Fails if the API key is empty.
    pub fn new(config: GeminiConfig) -> Result<Self, ProviderError> {
        if config.api_key.trim().is_empty() {
            return Err(ProviderError::MissingApiKey);
        }
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    /// The model this provider calls.
    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn build_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model
        )
    }

    fn headers(&self) -> Result<HeaderMap, GenerationError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let key = HeaderValue::from_str(&self.config.api_key).map_err(|e| {
            GenerationError::Transport {
                reason: format!("invalid API key header: {e}"),
            }
        })?;
        headers.insert(API_KEY_HEADER, key);
        Ok(headers)
    }
}

pub(crate) fn build_request(
    kind: ContentKind,
    prompt: &Prompt,
    temperature: f32,
) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content {
            role: Some("user"),
            parts: vec![Part {
                text: prompt.as_str().to_string(),
            }],
        }],
        system_instruction: Content {
            role: None,
            parts: vec![Part {
                text: instruction_for(kind).to_string(),
            }],
        },
        generation_config: GenerationConfig {
            response_mime_type: "application/json",
            response_schema: schema_for(kind).to_response_schema(),
            temperature,
        },
    }
}

fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}…", &text[..idx]),
        None => text.to_string(),
    }
}

#[async_trait]
impl GenerationClient for GeminiProvider {
    #[instrument(skip_all, fields(model = %self.config.model, kind = %kind))]
    async fn generate(
        &self,
        kind: ContentKind,
        prompt: &Prompt,
    ) -> Result<RawModelResponse, GenerationError> {
        let body = build_request(kind, prompt, self.config.temperature);

        let response = self
            .client
            .post(self.build_url())
            .headers(self.headers()?)
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerationError::Transport {
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = parse_retry_after(response.headers());
            let text = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), ?retry_after, "Gemini returned an error status");
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body: truncate(&text, MAX_ERROR_BODY_CHARS),
                retry_after,
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| GenerationError::Transport {
                reason: e.to_string(),
            })?;

        let parsed: GenerateContentResponse =
            serde_json::from_str(&text).map_err(|e| GenerationError::Api {
                message: format!("unreadable response envelope: {e}"),
            })?;

        if let Some(error) = parsed.error {
            return Err(GenerationError::Api {
                message: error.message,
            });
        }

        let raw = RawModelResponse::new(
            parsed
                .first_text()
                .ok_or(GenerationError::EmptyResponse)?
                .trim(),
        );
        if raw.is_blank() {
            return Err(GenerationError::EmptyResponse);
        }
        debug!(chars = raw.as_str().len(), "Gemini returned content");
        Ok(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prompt() -> Prompt {
        Prompt::new("A powerful 90 HP tractor for sugarcane").unwrap()
    }

    #[test]
    fn default_config_targets_flash_model() {
        let config = GeminiConfig::default();
        assert_eq!(config.model, "gemini-2.5-flash");
        assert!(config.endpoint.contains("generativelanguage.googleapis.com"));
    }

    #[test]
    fn empty_api_key_is_rejected() {
        let result = GeminiProvider::new(GeminiConfig::default());
        assert!(matches!(result, Err(ProviderError::MissingApiKey)));
    }

    #[test]
    fn url_names_the_model_without_leaking_the_key() {
        let provider = GeminiProvider::new(GeminiConfig {
            api_key: "secret".to_string(),
            endpoint: "http://localhost:9999/v1beta/".to_string(),
            ..Default::default()
        })
        .unwrap();
        let url = provider.build_url();
        assert_eq!(
            url,
            "http://localhost:9999/v1beta/models/gemini-2.5-flash:generateContent"
        );
        assert!(!url.contains("secret"));
    }

    #[test]
    fn request_carries_schema_instruction_and_json_mime_type() {
        let body = serde_json::to_value(build_request(ContentKind::Machinery, &prompt(), 0.2))
            .unwrap();
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(
            body["contents"][0]["parts"][0]["text"],
            "A powerful 90 HP tractor for sugarcane"
        );
        assert_eq!(
            body["systemInstruction"]["parts"][0]["text"],
            instruction_for(ContentKind::Machinery)
        );
        assert!(body["systemInstruction"].get("role").is_none());
        assert_eq!(
            body["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert_eq!(
            body["generationConfig"]["responseSchema"],
            schema_for(ContentKind::Machinery).to_response_schema()
        );
    }

    #[test]
    fn training_request_uses_training_schema() {
        let body =
            serde_json::to_value(build_request(ContentKind::Training, &prompt(), 0.2)).unwrap();
        assert!(body["generationConfig"]["responseSchema"]["properties"]
            .get("content")
            .is_some());
    }

    #[test]
    fn retry_after_seconds_are_parsed() {
        let mut headers = HeaderMap::new();
        headers.insert(RETRY_AFTER, HeaderValue::from_static("12"));
        assert_eq!(parse_retry_after(&headers), Some(Duration::from_secs(12)));

        headers.insert(RETRY_AFTER, HeaderValue::from_static("Wed, 21 Oct 2015 07:28:00 GMT"));
        assert_eq!(parse_retry_after(&headers), None);
    }

    #[test]
    fn long_error_bodies_are_truncated() {
        let body = "x".repeat(10);
        assert_eq!(truncate(&body, 4), "xxxx…");
        assert_eq!(truncate("short", 10), "short");
    }
}
