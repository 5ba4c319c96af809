use super::error::BackendError;
use super::types::{LLMRequest, LLMResponse};

/// A blocking text-completion backend.
///
/// Implementations perform exactly one request per call and never retry.
pub trait LLMClient: Send + Sync {
    fn complete(&self, request: &LLMRequest) -> Result<LLMResponse, BackendError>;

    fn name(&self) -> &str;

    fn model_info(&self) -> Option<String> {
        None
    }
}
