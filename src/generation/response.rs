//! Splitting raw LLM output into markup and README
//!
//! Two independent steps:
//! 1. [`split_sections`] — strict split on the first [`README_MARKER`].
//! 2. [`strip_code_block`] — permissive removal of Markdown code fences, applied to each part.
//!
//! [`ResponseExtractor::extract`] combines them and synthesizes the README when the marker
//! is absent.

use tracing::{debug, warn};

/// Line separating the markup from the README in the model output
pub const README_MARKER: &str = "---README.md---";

const FENCE: &str = "```";

/// Splits on the first marker occurrence into `(code, readme)`
pub fn split_sections(raw: &str) -> Option<(&str, &str)> {
    raw.split_once(README_MARKER)
}

/// Returns the contents of the first non-blank fenced segment, or the trimmed text.
///
/// A first line that does not start with `<` is taken to be a language tag and dropped.
/// Later fenced blocks are ignored.
pub fn strip_code_block(text: &str) -> String {
    if !text.contains(FENCE) {
        return text.trim().to_string();
    }

    let Some(segment) = text
        .split(FENCE)
        .skip(1)
        .find(|segment| !segment.trim().is_empty())
    else {
        return text.trim().to_string();
    };

    match segment.split_once('\n') {
        Some((first_line, rest)) if !first_line.trim().starts_with('<') => {
            rest.trim().to_string()
        }
        _ => segment.trim().to_string(),
    }
}

/// True when `text` holds nothing but whitespace and fence lines such as "```" or "```markdown"
pub fn is_blank_section(text: &str) -> bool {
    text.lines().all(|line| {
        let line = line.trim();
        if line.is_empty() {
            return true;
        }
        if !line.starts_with(FENCE) {
            return false;
        }
        line.trim_matches('`')
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '+' | '.'))
    })
}

/// Markup and README extracted from one response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extracted {
    pub code: String,
    pub readme: String,
    /// True when the README came from the fallback renderer
    pub readme_synthesized: bool,
}

pub struct ResponseExtractor;

impl ResponseExtractor {
    /// Extracts both parts; `fallback_readme` runs only when the marker is missing
    pub fn extract(raw: &str, fallback_readme: impl FnOnce() -> String) -> Extracted {
        match split_sections(raw) {
            Some((code, readme)) => {
                debug!(
                    "Found README marker (code {} chars, readme {} chars)",
                    code.len(),
                    readme.len()
                );
                Extracted {
                    code: strip_code_block(code),
                    readme: strip_code_block(readme),
                    readme_synthesized: false,
                }
            }
            None => {
                if !raw.trim().is_empty() {
                    warn!("Response has no {} marker, synthesizing README", README_MARKER);
                }
                Extracted {
                    code: strip_code_block(raw),
                    readme: fallback_readme(),
                    readme_synthesized: true,
                }
            }
        }
    }
}
