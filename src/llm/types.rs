//! LLM communication types
//!
//! Provider-neutral request/response types shared by every [`LLMClient`](super::LLMClient).

use std::time::Duration;

/// Request to send to the LLM
#[derive(Debug, Clone, PartialEq)]
pub struct LLMRequest {
    /// System-level instruction sent alongside the prompt
    pub system: Option<String>,
    /// User prompt text
    pub prompt: String,
}

impl LLMRequest {
    /// Creates a request with only a user prompt
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            system: None,
            prompt: prompt.into(),
        }
    }

    /// Sets the system instruction
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }
}

/// Response from the LLM
#[derive(Debug, Clone)]
pub struct LLMResponse {
    /// Generated text of the first candidate
    pub content: String,
    /// Provider stop reason, kept for diagnostics only
    pub finish_reason: Option<String>,
    /// Time taken for the request
    pub response_time: Duration,
}

impl LLMResponse {
    /// Creates a new response with just content
    pub fn text(content: impl Into<String>, response_time: Duration) -> Self {
        Self {
            content: content.into(),
            finish_reason: None,
            response_time,
        }
    }

    /// Sets the finish reason
    pub fn with_finish_reason(mut self, reason: impl Into<String>) -> Self {
        self.finish_reason = Some(reason.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let request = LLMRequest::new("Build a todo app").with_system("Be terse");
        assert_eq!(request.prompt, "Build a todo app");
        assert_eq!(request.system.as_deref(), Some("Be terse"));
    }

    #[test]
    fn test_response_finish_reason() {
        let response = LLMResponse::text("<html></html>", Duration::from_millis(5))
            .with_finish_reason("STOP");
        assert_eq!(response.finish_reason.as_deref(), Some("STOP"));
        assert_eq!(response.content, "<html></html>");
    }
}
