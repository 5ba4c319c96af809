//! Blocking client for the Gemini `generateContent` endpoint
//!
//! The API key travels as the `key` query parameter; the body carries the prompt under
//! `contents` and the fixed instruction under `systemInstruction`.
//!
//! # Example
//!
//! ```no_run
//! use briefcraft::llm::{GeminiClient, LLMClient, LLMRequest};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = GeminiClient::new(
//!     "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent",
//!     "gemini-2.5-flash",
//!     "my-api-key",
//! )?;
//!
//! if client.health_check()? {
//!     let response = client.complete(&LLMRequest::new("Say hello to me."))?;
//!     println!("{}", response.content);
//! }
//! # Ok(())
//! # }
//! ```

use super::client::LLMClient;
use super::error::BackendError;
use super::types::{LLMRequest, LLMResponse};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// Default request timeout for generation calls
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Default timeout for the connectivity check
pub const DEFAULT_HEALTH_TIMEOUT_SECS: u64 = 15;

const HEALTH_PROMPT: &str = "Say hello to me.";

/// Gemini text-completion client
///
/// Performs one synchronous POST per [`LLMClient::complete`] call with no retries.
pub struct GeminiClient {
    /// Fully rendered endpoint URL (model already substituted)
    endpoint: String,

    /// Model identifier, kept for diagnostics
    model: String,

    /// Static API key sent as a query parameter
    api_key: String,

    http_client: Client,

    /// Timeout applied to generation requests
    timeout: Duration,

    /// Timeout applied to the connectivity check
    health_timeout: Duration,
}

impl GeminiClient {
    /// Creates a client with the default timeouts
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, BackendError> {
        Self::with_timeouts(
            endpoint,
            model,
            api_key,
            Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            Duration::from_secs(DEFAULT_HEALTH_TIMEOUT_SECS),
        )
    }

    /// Creates a client with explicit generation and health-check timeouts
    pub fn with_timeouts(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
        health_timeout: Duration,
    ) -> Result<Self, BackendError> {
        let http_client = Client::builder().timeout(timeout).build().map_err(|e| {
            BackendError::ConfigurationError {
                message: format!("Failed to build HTTP client: {}", e),
            }
        })?;

        Ok(Self {
            endpoint: endpoint.into(),
            model: model.into(),
            api_key: api_key.into(),
            http_client,
            timeout,
            health_timeout,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Sends a tiny prompt to confirm the key, model and endpoint are usable
    ///
    /// Returns `Ok(false)` when the service is unreachable, times out, rejects the
    /// request, or answers without text. Only unexpected failures are `Err`.
    pub fn health_check(&self) -> Result<bool, BackendError> {
        debug!("Checking Gemini connectivity for model {}", self.model);

        let request = LLMRequest::new(HEALTH_PROMPT);
        match self.send(&request, self.health_timeout) {
            Ok(response) => {
                let preview: String = response.content.trim().chars().take(50).collect();
                info!(
                    "Gemini connectivity check succeeded for {}: {}...",
                    self.model, preview
                );
                Ok(true)
            }
            Err(e @ BackendError::TimeoutError { .. })
            | Err(e @ BackendError::NetworkError { .. })
            | Err(e @ BackendError::ApiError { .. })
            | Err(e @ BackendError::EmptyGeneration { .. }) => {
                warn!("Gemini connectivity check failed: {}", e);
                Ok(false)
            }
            Err(e) => {
                error!("Gemini connectivity check error: {}", e);
                Err(e)
            }
        }
    }

    fn send(&self, request: &LLMRequest, timeout: Duration) -> Result<LLMResponse, BackendError> {
        let body = GeminiRequest::from_request(request);

        debug!(
            "Sending request to Gemini: model={}, prompt_length={}",
            self.model,
            request.prompt.len()
        );

        let start = Instant::now();

        let response = self
            .http_client
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .timeout(timeout)
            .json(&body)
            .send()
            .map_err(|e| {
                // Strip the URL so the key never reaches the logs
                let e = e.without_url();
                if e.is_timeout() {
                    error!("Gemini request timed out after {:?}", timeout);
                    BackendError::TimeoutError {
                        seconds: timeout.as_secs(),
                    }
                } else if e.is_connect() {
                    error!("Cannot connect to Gemini endpoint: {}", e);
                    BackendError::NetworkError {
                        message: format!("Connection failed: {}", e),
                    }
                } else {
                    error!("Gemini request error: {}", e);
                    BackendError::NetworkError {
                        message: format!("Request failed: {}", e),
                    }
                }
            })?;

        let status = response.status();
        let raw = response.text().map_err(|e| BackendError::NetworkError {
            message: format!("Failed to read response body: {}", e.without_url()),
        })?;
        let elapsed = start.elapsed();

        if !status.is_success() {
            error!("Gemini API returned error status {}", status);
            return Err(BackendError::ApiError {
                message: format!("HTTP {}: {}", status, truncate(&raw, 200)),
                status_code: Some(status.as_u16()),
            });
        }

        let parsed: GeminiResponse = serde_json::from_str(&raw).map_err(|e| {
            error!("Failed to parse Gemini response: {}", e);
            BackendError::InvalidResponse {
                message: format!("JSON parse error: {}", e),
                raw_response: Some(truncate(&raw, 200)),
            }
        })?;

        let finish_reason = parsed.finish_reason();
        let text = parsed.first_text().unwrap_or_default();
        if text.is_empty() {
            return Err(BackendError::EmptyGeneration { finish_reason });
        }

        info!(
            "Gemini generation completed in {:.2}s ({} chars)",
            elapsed.as_secs_f64(),
            text.len()
        );

        let mut reply = LLMResponse::text(text, elapsed);
        reply.finish_reason = finish_reason;
        Ok(reply)
    }
}

impl LLMClient for GeminiClient {
    fn complete(&self, request: &LLMRequest) -> Result<LLMResponse, BackendError> {
        self.send(request, self.timeout)
    }

    fn name(&self) -> &str {
        "gemini"
    }

    fn model_info(&self) -> Option<String> {
        Some(self.model.clone())
    }
}

impl fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiClient")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("api_key", &"***")
            .field("timeout", &self.timeout)
            .field("health_timeout", &self.health_timeout)
            .finish()
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

impl Content {
    fn text(text: &str) -> Self {
        Self {
            parts: vec![Part {
                text: text.to_string(),
            }],
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct GeminiRequest {
    contents: Vec<Content>,
    #[serde(rename = "systemInstruction", skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
}

impl GeminiRequest {
    fn from_request(request: &LLMRequest) -> Self {
        Self {
            contents: vec![Content::text(&request.prompt)],
            system_instruction: request.system.as_deref().map(Content::text),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
    #[serde(rename = "finishReason", default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl GeminiResponse {
    /// `candidates[0].content.parts[0].text`, if present
    fn first_text(&self) -> Option<String> {
        self.candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .and_then(|content| content.parts.first())
            .map(|part| part.text.clone())
    }

    fn finish_reason(&self) -> Option<String> {
        self.candidates
            .first()
            .and_then(|candidate| candidate.finish_reason.clone())
    }
}
