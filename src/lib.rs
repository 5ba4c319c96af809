//! briefcraft - single-file web apps from a project brief
//!
//! Sends a natural-language brief, optional data-URI attachments and evaluation checks to
//! an LLM text-completion endpoint and turns the free-text reply into two files:
//! `index.html` and `README.md`. Round 1 builds from scratch; round 2 revises a previous
//! app given its README.
//!
//! Generation never fails from the caller's point of view. Transport errors, empty
//! replies and malformed output are logged and replaced with deterministic fallback files.
//!
//! # Example Usage
//!
//! ```no_run
//! use briefcraft::{BriefcraftConfig, GenerationRequest, Round};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let orchestrator = BriefcraftConfig::from_env()?.create_orchestrator()?;
//!
//! let request = GenerationRequest::new("Add a dark mode toggle")
//!     .with_round(Round::Revision)
//!     .with_previous_readme("# Timer\nA countdown timer.")
//!     .with_checks(["Toggle persists across reloads"]);
//!
//! let result = orchestrator.generate(&request);
//! std::fs::write("index.html", &result.files.index_html)?;
//! std::fs::write("README.md", &result.files.readme)?;
//! # Ok(())
//! # }
//! ```
//!
//! # Project Structure
//!
//! - [`attachments`]: data-URI decoding and prompt previews
//! - [`generation`]: prompt, response extraction, fallbacks and the orchestrator
//! - [`llm`]: the LLM client seam and the Gemini implementation
//! - [`config`]: environment-driven configuration

pub mod attachments;
pub mod cli;
pub mod config;
pub mod generation;
pub mod llm;
pub mod util;

pub use attachments::{Attachment, DecodedAttachment, StorageScope};
pub use config::{BriefcraftConfig, ConfigError};
pub use generation::{
    GeneratedFiles, GenerationOrchestrator, GenerationReport, GenerationRequest,
    GenerationResult, Round, StageOutcome,
};
pub use llm::{BackendError, GeminiClient, LLMClient};
pub use util::{config_from_env, init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
