//! Output formatting for CLI results

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::PathBuf;

use crate::config::BriefcraftConfig;
use crate::generation::{GenerationReport, GenerationResult, StageOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON format (machine-readable)
    Json,
    /// Human-readable formatted text
    Human,
}

/// Result of the connectivity check
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    pub healthy: bool,
    pub model: String,
    pub endpoint: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats a generation result; `written` lists files saved to disk, if any
    pub fn format_result(
        &self,
        result: &GenerationResult,
        report: &GenerationReport,
        written: &[PathBuf],
    ) -> Result<String> {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(result)
                .context("Failed to serialize generation result to JSON"),
            OutputFormat::Human => Ok(self.format_result_human(result, report, written)),
        }
    }

    pub fn format_health(&self, status: &HealthStatus) -> Result<String> {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(status)
                .context("Failed to serialize health status to JSON"),
            OutputFormat::Human => {
                let mut out = if status.healthy {
                    format!("✓ {} is reachable at {}\n", status.model, status.endpoint)
                } else {
                    format!("✗ {} is not reachable at {}\n", status.model, status.endpoint)
                };
                if let Some(error) = &status.error {
                    out.push_str(&format!("  Error: {}\n", error));
                }
                Ok(out)
            }
        }
    }

    pub fn format_config(&self, config: &BriefcraftConfig) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let map: std::collections::BTreeMap<_, _> =
                    config.to_display_map().into_iter().collect();
                serde_json::to_string_pretty(&map)
                    .context("Failed to serialize configuration to JSON")
            }
            OutputFormat::Human => Ok(config.to_string()),
        }
    }

    fn format_result_human(
        &self,
        result: &GenerationResult,
        report: &GenerationReport,
        written: &[PathBuf],
    ) -> String {
        let mut out = String::new();

        let status = if report.used_fallback_html() || report.used_fallback_readme() {
            "Generated with fallback content"
        } else {
            "Generated"
        };
        out.push_str(&format!("{}\n", status));

        out.push_str("\nFiles:\n");
        for (name, contents) in result.files.entries() {
            out.push_str(&format!("  {:<12} {} bytes\n", name, contents.len()));
        }

        if !result.attachments.is_empty() {
            out.push_str("\nAttachments:\n");
            for attachment in &result.attachments {
                out.push_str(&format!(
                    "  {} ({}, {} bytes) -> {}\n",
                    attachment.name,
                    attachment.mime,
                    attachment.size,
                    attachment.path.display()
                ));
            }
        }

        let issues: Vec<String> = report
            .outcomes
            .iter()
            .filter_map(describe_issue)
            .collect();
        if !issues.is_empty() {
            out.push_str("\nWarnings:\n");
            for issue in issues {
                out.push_str(&format!("  - {}\n", issue));
            }
        }

        if !written.is_empty() {
            out.push_str("\nWritten:\n");
            for path in written {
                out.push_str(&format!("  {}\n", path.display()));
            }
        }

        out
    }
}

fn describe_issue(outcome: &StageOutcome) -> Option<String> {
    match outcome {
        StageOutcome::Generated { .. } => None,
        StageOutcome::AttachmentError { message, .. } => Some(message.clone()),
        StageOutcome::TransportError { message, .. } => Some(format!("LLM call failed: {}", message)),
        StageOutcome::EmptyGeneration { finish_reason } => Some(format!(
            "LLM returned no text (finish reason: {})",
            finish_reason.as_deref().unwrap_or("UNKNOWN")
        )),
        StageOutcome::MissingSeparator => {
            Some("Response had no README section; README was synthesized".to_string())
        }
        StageOutcome::EmptyReadme => {
            Some("README section was empty; README was synthesized".to_string())
        }
        StageOutcome::InvalidMarkup => {
            Some("Response did not contain HTML; fallback page used".to_string())
        }
    }
}
