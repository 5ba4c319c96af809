//! Prompt construction for the two-part (markup + README) output contract

use super::types::GenerationRequest;
use crate::llm::LLMRequest;

/// System instruction sent with every generation request
pub const SYSTEM_INSTRUCTION: &str = "You are a professional web developer assistant. \
Output must adhere strictly to the requested two-part format: 'index.html' content followed by \
'---README.md---' and then 'README.md' content. All code must be runnable in a single HTML file.";

const OUTPUT_RULES: &str = "### Output format rules:
1. Produce a complete, runnable, single-file HTML web app satisfying the brief.
2. Output must contain **two parts only**:
    - The complete content of the `index.html` file (must be valid HTML).
    - The complete content of the `README.md` file, which starts after a line containing exactly: `---README.md---`
3. If using code blocks, ensure only the required content is inside the block.
4. README.md must include: Overview, Setup, Usage, and (if Round 2) describe improvements made.
5. Do not include any commentary or extra text outside the `index.html` and `---README.md---` sections.
";

pub struct PromptBuilder;

impl PromptBuilder {
    /// Renders the user prompt; identical inputs always give identical output
    pub fn build(request: &GenerationRequest, attachment_summary: &str) -> String {
        let revision_note = request
            .revision_readme()
            .map(|readme| {
                format!(
                    "\n### Previous README.md:\n{}\n\nRevise and enhance this project according to the new brief below. \
                     The code must be modified to satisfy the new requirements.\n",
                    readme
                )
            })
            .unwrap_or_default();

        format!(
            "\nYou are a professional web developer assistant. You must output a single-file HTML application.\n\
             \n### Round\n{round}\n\
             \n### Task\n{brief}\n\
             \n{revision_note}\n\
             \n### Attachments (if any)\n\
             The attached files are available in the repository root. Reference them directly by name (e.g., 'sample.png').\n\
             {attachments}\n\
             \n### Evaluation checks (Ensure the generated app can pass these checks)\n{checks:?}\n\
             \n{rules}",
            round = request.round,
            brief = request.brief,
            revision_note = revision_note,
            attachments = attachment_summary,
            checks = request.checks,
            rules = OUTPUT_RULES,
        )
    }

    /// Prompt plus the fixed system instruction, ready to send
    pub fn build_request(request: &GenerationRequest, attachment_summary: &str) -> LLMRequest {
        LLMRequest::new(Self::build(request, attachment_summary)).with_system(SYSTEM_INSTRUCTION)
    }
}
