//! Gemini generateContent transport.
//!
//! Non-streaming only: the chat flow sends one prompt and reads one reply.
//! The API key is passed per call because credentials rotate between calls.

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Gemini API error: {status} - {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("Gemini error: {0}")]
    Api(String),
    #[error("Gemini returned an empty response")]
    Empty,
}

/// Per-call generation overrides. `None` fields are omitted from the wire
/// request, so the endpoint's own defaults apply.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationOptions {
    pub max_output_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

/// Seam between the chat flow and the concrete Gemini transport. Tests
/// substitute stub generators through this trait.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(
        &self,
        api_key: &str,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<String, LlmError>;
}

/// Thin client over the generateContent endpoint
pub struct GeminiClient {
    client: HttpClient,
    base_url: String,
    model: String,
    timeout: Duration,
}

impl GeminiClient {
    /// Create a new Gemini client. The base URL is configurable so failure
    /// injection and alternative deployments stay possible.
    pub fn new(base_url: String, model: String, timeout: Duration) -> Self {
        Self {
            client: HttpClient::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            timeout,
        }
    }

    fn endpoint_url(&self, api_key: &str) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, self.model, api_key
        )
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(
        &self,
        api_key: &str,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<String, LlmError> {
        let api_request = GeminiRequest {
            contents: vec![GeminiContent {
                role: "user".to_string(),
                parts: vec![GeminiTextPart {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: build_generation_config(options),
        };

        let response = self
            .client
            .post(self.endpoint_url(api_key))
            .json(&api_request)
            .timeout(self.timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Status { status, body });
        }

        let api_response: GeminiResponse = response.json().await?;
        extract_text(api_response)
    }
}

fn build_generation_config(options: &GenerationOptions) -> Option<GeminiGenerationConfig> {
    if options.max_output_tokens.is_none() && options.temperature.is_none() {
        return None;
    }
    Some(GeminiGenerationConfig {
        max_output_tokens: options.max_output_tokens,
        temperature: options.temperature,
    })
}

/// Pull the reply text out of a parsed response. An endpoint-declared error
/// or an empty reply is a generation failure, not a valid result.
fn extract_text(response: GeminiResponse) -> Result<String, LlmError> {
    if let Some(error) = response.error {
        return Err(LlmError::Api(error.message));
    }

    let mut text = String::new();
    if let Some(candidates) = response.candidates {
        if let Some(candidate) = candidates.into_iter().next() {
            for part in candidate.content.parts {
                if let Some(t) = part.text {
                    text.push_str(&t);
                }
            }
        }
    }

    if text.is_empty() {
        return Err(LlmError::Empty);
    }
    Ok(text)
}

// ============================================================================
// API Types
// ============================================================================

#[derive(Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GeminiGenerationConfig>,
}

#[derive(Serialize)]
struct GeminiContent {
    role: String,
    parts: Vec<GeminiTextPart>,
}

#[derive(Serialize)]
struct GeminiTextPart {
    text: String,
}

#[derive(Serialize)]
struct GeminiGenerationConfig {
    #[serde(rename = "maxOutputTokens", skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<GeminiCandidate>>,
    error: Option<GeminiError>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: GeminiContentResponse,
}

#[derive(Deserialize)]
struct GeminiContentResponse {
    parts: Vec<GeminiPartResponse>,
}

#[derive(Deserialize)]
struct GeminiPartResponse {
    text: Option<String>,
}

#[derive(Deserialize)]
struct GeminiError {
    message: String,
}
