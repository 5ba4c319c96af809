//! Deterministic output used when the LLM result is unusable
//!
//! Both renderers only interpolate already-owned strings and cannot fail.

use super::types::Round;
use crate::attachments::summary::ESCAPED_NEWLINE;

/// Note appended to every fallback README
pub const FALLBACK_NOTE: &str =
    "This README was generated as a fallback because the LLM did not return a valid response.";

pub fn fallback_readme(
    brief: &str,
    checks: &[String],
    attachment_summary: &str,
    round: Round,
) -> String {
    format!(
        "# Auto-generated README (Round {round})\n\
         \n**Project brief:** {brief}\n\
         \n**Attachments:**\n{attachments}\n\
         \n**Checks to meet:**\n{checks}\n\
         \n## Setup\n\
         1. Open `index.html` in a browser.\n\
         2. No build steps required.\n\
         \n## Notes\n{note}\n",
        round = round,
        brief = brief,
        attachments = attachment_summary,
        checks = checks.join(ESCAPED_NEWLINE),
        note = FALLBACK_NOTE,
    )
}

pub fn fallback_html(brief: &str) -> String {
    format!(
        "\n<html>\n  <head><title>Fallback App</title></head>\n  <body>\n    <h1>Hello (fallback)</h1>\n    \
         <p>This app was generated as a fallback because the LLM failed to produce valid HTML. Brief: {}</p>\n  \
         </body>\n</html>\n",
        brief
    )
}
