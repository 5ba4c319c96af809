//! The generation pipeline: prompt construction, LLM call, response repair and fallbacks

pub mod fallback;
pub mod orchestrator;
pub mod prompt;
pub mod response;
pub mod types;

pub use fallback::{fallback_html, fallback_readme, FALLBACK_NOTE};
pub use orchestrator::{GenerationOrchestrator, GenerationReport, Stage, StageOutcome};
pub use prompt::{PromptBuilder, SYSTEM_INSTRUCTION};
pub use response::{
    is_blank_section, split_sections, strip_code_block, Extracted, ResponseExtractor, README_MARKER,
};
pub use types::{GeneratedFiles, GenerationRequest, GenerationResult, Round, INDEX_HTML, README_MD};
