//! Google Gemini client implementation

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::{GeneratorResult, ProviderConfig, ProviderError, TextGenerator, TextStream};

const DEFAULT_MAX_OUTPUT_TOKENS: usize = 8192;
const MAX_SSE_BUFFER: usize = 10 * 1024 * 1024;

/// Google Gemini API client
pub struct GeminiClient {
    client: Client,
    config: ProviderConfig,
}

impl GeminiClient {
    pub fn new(config: ProviderConfig) -> Result<Self, ProviderError> {
        if config.api_key.is_none() {
            return Err(ProviderError::Configuration(
                "API key required for Gemini".into(),
            ));
        }

        let timeout = Duration::from_secs(config.timeout_seconds.unwrap_or(120));
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self { client, config })
    }

    fn build_request(&self, prompt: &str) -> GeminiRequest {
        GeminiRequest {
            contents: vec![GeminiContent {
                role: "user".to_string(),
                parts: vec![GeminiPart {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: Some(GeminiGenerationConfig {
                max_output_tokens: self.config.max_tokens.unwrap_or(DEFAULT_MAX_OUTPUT_TOKENS),
                temperature: self.config.temperature,
            }),
        }
    }

    fn base_url(&self) -> &str {
        self.config
            .base_url
            .as_deref()
            .unwrap_or("https://generativelanguage.googleapis.com")
    }

    fn api_key(&self) -> String {
        self.config
            .api_key
            .as_ref()
            .map(|k| k.expose_secret().to_string())
            .unwrap_or_default()
    }

    async fn response_error(response: reqwest::Response) -> ProviderError {
        let status = response.status();

        if status.as_u16() == 429 {
            // Parse Retry-After header if present, otherwise default to 60s
            let retry_after_ms = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .map(|secs| secs * 1000)
                .unwrap_or(60000);
            return ProviderError::RateLimited { retry_after_ms };
        }

        if status.as_u16() == 401 || status.as_u16() == 403 {
            return ProviderError::AuthenticationFailed(format!("API error {}", status));
        }

        if status.is_server_error() {
            return ProviderError::Unavailable {
                provider: "gemini".to_string(),
            };
        }

        let body = response.text().await.unwrap_or_default();
        ProviderError::InvalidResponse(format!("API error {}: {}", status, body))
    }

    fn parse_sse_event_payload(event: &str) -> Option<String> {
        let mut payload_lines = Vec::new();
        for raw_line in event.lines() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with(':') {
                continue;
            }
            if let Some(rest) = line.strip_prefix("data:") {
                payload_lines.push(rest.trim_start().to_string());
            }
        }

        if payload_lines.is_empty() {
            None
        } else {
            Some(payload_lines.join("\n"))
        }
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> GeneratorResult<String> {
        let request = self.build_request(prompt);
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url(),
            self.config.model,
        );

        tracing::debug!(model = %self.config.model, "requesting generation");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", self.api_key())
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::response_error(response).await);
        }

        let api_response: GeminiResponse = response.json().await?;
        Ok(api_response.text().unwrap_or_default())
    }

    async fn generate_stream(&self, prompt: &str) -> GeneratorResult<TextStream> {
        let request = self.build_request(prompt);
        let url = format!(
            "{}/v1beta/models/{}:streamGenerateContent?alt=sse",
            self.base_url(),
            self.config.model,
        );

        tracing::debug!(model = %self.config.model, "requesting streamed generation");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", self.api_key())
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::response_error(response).await);
        }

        let byte_stream = response.bytes_stream();
        let stream = async_stream::try_stream! {
            let mut buffer = String::new();
            futures::pin_mut!(byte_stream);

            while let Some(result) = byte_stream.next().await {
                let bytes = result.map_err(|e| ProviderError::StreamError(e.to_string()))?;
                let text = String::from_utf8_lossy(&bytes);
                let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
                buffer.push_str(&normalized);

                if buffer.len() > MAX_SSE_BUFFER {
                    Err(ProviderError::StreamError(
                        "SSE buffer exceeded maximum size".to_string(),
                    ))?;
                }

                while let Some(pos) = buffer.find("\n\n") {
                    let event = buffer[..pos].to_string();
                    buffer = buffer[pos + 2..].to_string();

                    let payload = match Self::parse_sse_event_payload(&event) {
                        Some(p) => p,
                        None => continue,
                    };

                    if payload == "[DONE]" {
                        return;
                    }

                    if let Ok(response) = serde_json::from_str::<GeminiResponse>(&payload) {
                        let finished = response.finished();
                        if let Some(text) = response.text() {
                            if !text.is_empty() {
                                yield text;
                            }
                        }
                        if finished {
                            return;
                        }
                    }
                }
            }

            let remaining = buffer.trim().to_string();
            if !remaining.is_empty() {
                let payload = Self::parse_sse_event_payload(&remaining)
                    .unwrap_or_else(|| remaining.clone());
                if payload != "[DONE]" {
                    if let Ok(response) = serde_json::from_str::<GeminiResponse>(&payload) {
                        if let Some(text) = response.text() {
                            if !text.is_empty() {
                                yield text;
                            }
                        }
                    }
                }
            }
        };

        Ok(Box::pin(stream))
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    fn provider(&self) -> &str {
        "gemini"
    }
}

// API request/response types
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GeminiGenerationConfig>,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    role: String,
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    max_output_tokens: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    #[serde(default)]
    content: GeminiContentResponse,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct GeminiContentResponse {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

impl GeminiResponse {
    /// Concatenated text of the first candidate's parts.
    fn text(&self) -> Option<String> {
        let candidate = self.candidates.first()?;
        if candidate.content.parts.is_empty() {
            return None;
        }
        Some(
            candidate
                .content
                .parts
                .iter()
                .map(|p| p.text.as_str())
                .collect(),
        )
    }

    fn finished(&self) -> bool {
        self.candidates
            .first()
            .is_some_and(|c| c.finish_reason.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_api_key_is_configuration_error() {
        let result = GeminiClient::new(ProviderConfig::default());
        assert!(matches!(result, Err(ProviderError::Configuration(_))));
    }

    #[test]
    fn test_parse_sse_event_payload() {
        let payload = GeminiClient::parse_sse_event_payload("data: {\"a\":1}");
        assert_eq!(payload.as_deref(), Some("{\"a\":1}"));

        assert!(GeminiClient::parse_sse_event_payload(": keep-alive").is_none());
        assert!(GeminiClient::parse_sse_event_payload("").is_none());
    }

    #[test]
    fn test_response_text_concatenates_parts() {
        let response: GeminiResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"a"},{"text":"b"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(response.text().as_deref(), Some("ab"));
        assert!(!response.finished());
    }

    #[test]
    fn test_response_finished_on_stop() {
        let response: GeminiResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"end"}]},"finishReason":"STOP"}]}"#,
        )
        .unwrap();
        assert!(response.finished());
    }
}
