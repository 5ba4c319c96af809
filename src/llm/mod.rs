//! LLM client abstraction layer
//!
//! A blocking trait seam so the generation pipeline can run against the real Gemini
//! endpoint or a scripted mock.

mod client;
mod error;
mod gemini;
mod mock;
mod types;

pub use client::LLMClient;
pub use error::BackendError;
pub use gemini::{GeminiClient, DEFAULT_HEALTH_TIMEOUT_SECS, DEFAULT_TIMEOUT_SECS};
pub use mock::{MockLLMClient, MockResponse};
pub use types::{LLMRequest, LLMResponse};
