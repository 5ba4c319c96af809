//! The generation pipeline entry point
//!
//! `BUILD_CONTEXT → CALL_LLM → PARSE_RESPONSE → VALIDATE_CODE → DONE`
//!
//! Every failure is recorded as a [`StageOutcome`] and then absorbed: callers always get a
//! well-formed [`GenerationResult`], with fallback content where a stage failed.

use super::fallback::{fallback_html, fallback_readme};
use super::prompt::PromptBuilder;
use super::response::{is_blank_section, ResponseExtractor};
use super::types::{GeneratedFiles, GenerationRequest, GenerationResult};
use crate::attachments::{AttachmentStore, AttachmentSummarizer, StorageScope};
use crate::llm::{BackendError, LLMClient};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    BuildContext,
    CallLlm,
    ParseResponse,
    ValidateCode,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::BuildContext => "BUILD_CONTEXT",
            Stage::CallLlm => "CALL_LLM",
            Stage::ParseResponse => "PARSE_RESPONSE",
            Stage::ValidateCode => "VALIDATE_CODE",
            Stage::Done => "DONE",
        };
        f.write_str(name)
    }
}

/// What happened at one point of the pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageOutcome {
    /// The LLM returned non-empty text
    Generated { chars: usize },
    /// An attachment was dropped
    AttachmentError { name: String, message: String },
    /// No usable HTTP exchange, non-2xx status, or undecodable body
    TransportError { kind: &'static str, message: String },
    /// 2xx response without generated text
    EmptyGeneration { finish_reason: Option<String> },
    /// No README marker; README synthesized
    MissingSeparator,
    /// README section present but blank; README synthesized
    EmptyReadme,
    /// Markup did not start with `<`; fallback HTML substituted
    InvalidMarkup,
}

/// Everything recorded during one generation call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationReport {
    pub outcomes: Vec<StageOutcome>,
    pub scope_dir: PathBuf,
}

impl GenerationReport {
    fn record(&mut self, outcome: StageOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn llm_failed(&self) -> bool {
        self.outcomes.iter().any(|o| {
            matches!(
                o,
                StageOutcome::TransportError { .. } | StageOutcome::EmptyGeneration { .. }
            )
        })
    }

    pub fn used_fallback_html(&self) -> bool {
        self.llm_failed() || self.outcomes.contains(&StageOutcome::InvalidMarkup)
    }

    pub fn used_fallback_readme(&self) -> bool {
        self.llm_failed()
            || self.outcomes.iter().any(|o| {
                matches!(o, StageOutcome::MissingSeparator | StageOutcome::EmptyReadme)
            })
    }

    pub fn attachment_failures(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, StageOutcome::AttachmentError { .. }))
            .count()
    }
}

/// Drives one request through the pipeline.
///
/// Calls are blocking. Each call decodes attachments into a fresh `<storage_root>/<uuid>`
/// directory unless a scope is passed to [`generate_in_scope`](Self::generate_in_scope).
pub struct GenerationOrchestrator {
    client: Arc<dyn LLMClient>,
    storage_root: PathBuf,
}

impl GenerationOrchestrator {
    pub fn new(client: Arc<dyn LLMClient>, storage_root: impl Into<PathBuf>) -> Self {
        Self {
            client,
            storage_root: storage_root.into(),
        }
    }

    pub fn storage_root(&self) -> &Path {
        &self.storage_root
    }

    /// Runs the pipeline; never fails
    pub fn generate(&self, request: &GenerationRequest) -> GenerationResult {
        self.generate_with_report(request).0
    }

    /// Like [`generate`](Self::generate), also returning what went wrong along the way
    pub fn generate_with_report(
        &self,
        request: &GenerationRequest,
    ) -> (GenerationResult, GenerationReport) {
        let scope = StorageScope::unique(&self.storage_root);
        self.generate_in_scope(request, &scope)
    }

    /// Runs the pipeline with attachments written into `scope`
    pub fn generate_in_scope(
        &self,
        request: &GenerationRequest,
        scope: &StorageScope,
    ) -> (GenerationResult, GenerationReport) {
        let start = Instant::now();
        let mut report = GenerationReport {
            scope_dir: scope.dir().to_path_buf(),
            ..Default::default()
        };

        debug!(stage = %Stage::BuildContext, round = %request.round, "Building context");
        let decoded = AttachmentStore::new(scope.clone()).decode_all(&request.attachments);
        for failure in &decoded.failures {
            report.record(StageOutcome::AttachmentError {
                name: failure.attachment_name().to_string(),
                message: failure.to_string(),
            });
        }
        let attachments = decoded.decoded;
        let summary = AttachmentSummarizer::summarize(&attachments);
        let llm_request = PromptBuilder::build_request(request, &summary);
        let readme_fallback =
            || fallback_readme(&request.brief, &request.checks, &summary, request.round);

        debug!(
            stage = %Stage::CallLlm,
            client = self.client.name(),
            prompt_chars = llm_request.prompt.len(),
            "Calling LLM"
        );
        let text = match self.client.complete(&llm_request) {
            Ok(response) if !response.content.trim().is_empty() => {
                info!(
                    "Generated response via {} in {:.2}s",
                    self.client.name(),
                    response.response_time.as_secs_f64()
                );
                report.record(StageOutcome::Generated {
                    chars: response.content.len(),
                });
                Some(response.content)
            }
            Ok(response) => {
                self.record_failure(
                    &mut report,
                    BackendError::EmptyGeneration {
                        finish_reason: response.finish_reason,
                    },
                );
                None
            }
            Err(e) => {
                self.record_failure(&mut report, e);
                None
            }
        };

        let (code, readme) = match text {
            Some(text) => {
                debug!(stage = %Stage::ParseResponse, "Extracting files");
                let extracted = ResponseExtractor::extract(&text, readme_fallback);
                if extracted.readme_synthesized {
                    report.record(StageOutcome::MissingSeparator);
                    (extracted.code, extracted.readme)
                } else if is_blank_section(&extracted.readme) {
                    warn!("README section is empty, using fallback README");
                    report.record(StageOutcome::EmptyReadme);
                    (extracted.code, readme_fallback())
                } else {
                    (extracted.code, extracted.readme)
                }
            }
            None => (String::new(), readme_fallback()),
        };

        debug!(stage = %Stage::ValidateCode, "Validating markup");
        let index_html = if code.trim().starts_with('<') {
            code
        } else {
            if !report.llm_failed() {
                warn!("Extracted code does not look like HTML, using fallback page");
                report.record(StageOutcome::InvalidMarkup);
            }
            fallback_html(&request.brief)
        };

        info!(
            stage = %Stage::Done,
            attachments = attachments.len(),
            attachment_failures = report.attachment_failures(),
            fallback_html = report.used_fallback_html(),
            fallback_readme = report.used_fallback_readme(),
            "Generation finished in {:.2}s",
            start.elapsed().as_secs_f64()
        );

        let result = GenerationResult {
            files: GeneratedFiles { index_html, readme },
            attachments,
        };
        (result, report)
    }

    fn record_failure(&self, report: &mut GenerationReport, error: BackendError) {
        match error {
            BackendError::EmptyGeneration { finish_reason } => {
                warn!(
                    finish_reason = finish_reason.as_deref().unwrap_or("UNKNOWN"),
                    "LLM returned no text, using fallback output"
                );
                report.record(StageOutcome::EmptyGeneration { finish_reason });
            }
            other => {
                warn!(
                    error_kind = other.kind(),
                    "LLM request failed, using fallback output: {}", other
                );
                report.record(StageOutcome::TransportError {
                    kind: other.kind(),
                    message: other.to_string(),
                });
            }
        }
    }
}

impl fmt::Debug for GenerationOrchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationOrchestrator")
            .field("client", &self.client.name())
            .field("storage_root", &self.storage_root)
            .finish()
    }
}
