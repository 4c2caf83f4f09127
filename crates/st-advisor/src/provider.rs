//! Generative-model providers for the strategy advisor.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use st_core::config::{AdvisorConfig, CredentialProvider};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum AdvisorError {
    /// No API key in the configured environment variable.
    #[error("missing credential: set {0}")]
    MissingCredential(String),

    /// The advisor has no usable backend (disabled or unconfigured).
    #[error("advisor offline: {0}")]
    Offline(String),

    /// Transport failure before a response arrived.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The API returned a non-success status.
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// The response could not be turned into a strategy.
    #[error("parse error: {0}")]
    Parse(String),

    #[error("request timed out")]
    Timeout,
}

impl From<reqwest::Error> for AdvisorError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AdvisorError::Timeout
        } else {
            AdvisorError::Http(err.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// StrategyProvider trait
// ---------------------------------------------------------------------------

/// A text-generation backend. `generate` returns the raw model output,
/// expected to be the JSON strategy document.
#[async_trait]
pub trait StrategyProvider: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, AdvisorError>;

    /// Short name for logs.
    fn name(&self) -> &str;
}

// ---------------------------------------------------------------------------
// GeminiProvider
// ---------------------------------------------------------------------------

/// Provider for the Gemini `generateContent` API with a JSON response schema.
pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiProvider {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
        }
    }

    /// Build from config, reading the key from the configured env var.
    pub fn from_config(cfg: &AdvisorConfig) -> Result<Self, AdvisorError> {
        let api_key = CredentialProvider::advisor_api_key(cfg)
            .ok_or_else(|| AdvisorError::MissingCredential(cfg.api_key_env.clone()))?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs.max(1)))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Ok(Self {
            client,
            api_key,
            model: cfg.model.clone(),
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Override the base URL (useful for testing with a mock server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    /// JSON request body: the prompt plus a schema pinning the three
    /// strategy fields.
    pub fn build_request_body(prompt: &str) -> serde_json::Value {
        serde_json::json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": prompt }],
            }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": {
                    "type": "OBJECT",
                    "properties": {
                        "analysis": { "type": "STRING" },
                        "recommendations": {
                            "type": "ARRAY",
                            "items": { "type": "STRING" },
                        },
                        "priorityLevel": {
                            "type": "STRING",
                            "enum": ["CRITICAL", "STABLE", "OPTIMAL"],
                        },
                    },
                    "required": ["analysis", "recommendations", "priorityLevel"],
                },
            },
        })
    }
}

#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

#[derive(Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Deserialize)]
struct GeminiPart {
    text: Option<String>,
}

#[async_trait]
impl StrategyProvider for GeminiProvider {
    async fn generate(&self, prompt: &str) -> Result<String, AdvisorError> {
        let resp = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(&Self::build_request_body(prompt))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(AdvisorError::Api {
                status: status.as_u16(),
                message: text,
            });
        }

        let body: GeminiResponse = resp
            .json()
            .await
            .map_err(|e| AdvisorError::Parse(e.to_string()))?;

        let text: String = body
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(AdvisorError::Parse("response contained no text".into()));
        }
        Ok(text)
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

// ---------------------------------------------------------------------------
// MockProvider
// ---------------------------------------------------------------------------

/// A mock provider for testing.
///
/// Each call pops the next queued result. With an empty queue it answers
/// with a STABLE briefing.
#[derive(Clone, Default)]
pub struct MockProvider {
    responses: Arc<Mutex<VecDeque<Result<String, AdvisorError>>>>,
    captured_prompts: Arc<Mutex<Vec<String>>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a raw model output.
    pub fn with_response(self, text: impl Into<String>) -> Self {
        self.queue().push_back(Ok(text.into()));
        self
    }

    /// Queue an error.
    pub fn with_error(self, error: AdvisorError) -> Self {
        self.queue().push_back(Err(error));
        self
    }

    /// Prompts received so far, oldest first.
    pub fn captured_prompts(&self) -> Vec<String> {
        self.captured_prompts
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }

    pub fn call_count(&self) -> usize {
        self.captured_prompts().len()
    }

    fn queue(&self) -> std::sync::MutexGuard<'_, VecDeque<Result<String, AdvisorError>>> {
        self.responses.lock().unwrap_or_else(|p| p.into_inner())
    }

    fn default_response() -> String {
        serde_json::json!({
            "analysis": "Mock briefing: holding station.",
            "recommendations": ["Maintain pace"],
            "priorityLevel": "STABLE",
        })
        .to_string()
    }
}

#[async_trait]
impl StrategyProvider for MockProvider {
    async fn generate(&self, prompt: &str) -> Result<String, AdvisorError> {
        self.captured_prompts
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(prompt.to_string());

        self.queue()
            .pop_front()
            .unwrap_or_else(|| Ok(Self::default_response()))
    }

    fn name(&self) -> &str {
        "mock"
    }
}
