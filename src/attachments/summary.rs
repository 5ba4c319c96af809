//! One-line previews of decoded attachments for the prompt
//!
//! Lines are joined with a literal `\n` escape (backslash + `n`) so the whole summary
//! stays a single line when embedded in the prompt.

use super::store::DecodedAttachment;
use std::fs::File;
use std::io::{self, Read};

/// Maximum number of bytes read for a text preview
pub const PREVIEW_BYTES: u64 = 1000;

/// Maximum number of lines shown for a CSV preview
pub const CSV_PREVIEW_LINES: usize = 3;

/// Literal escape used in place of newlines
pub const ESCAPED_NEWLINE: &str = "\\n";

const TEXT_EXTENSIONS: [&str; 4] = [".md", ".txt", ".json", ".csv"];

pub struct AttachmentSummarizer;

impl AttachmentSummarizer {
    /// Summarises every attachment; never fails
    pub fn summarize(attachments: &[DecodedAttachment]) -> String {
        attachments
            .iter()
            .map(Self::summarize_one)
            .collect::<Vec<_>>()
            .join(ESCAPED_NEWLINE)
    }

    pub fn summarize_one(attachment: &DecodedAttachment) -> String {
        let name = &attachment.name;
        let mime = &attachment.mime;

        if !is_text(attachment) {
            return format!(
                "- {} ({}): {} bytes (Binary file, use as-is or encode to b64 if needed)",
                name, mime, attachment.size
            );
        }

        match read_preview(attachment) {
            Ok(preview) => format!("- {} ({}): preview: {}", name, mime, preview),
            Err(e) => format!("- {} ({}): (could not read preview: {})", name, mime, e),
        }
    }
}

fn is_text(attachment: &DecodedAttachment) -> bool {
    attachment.mime.starts_with("text")
        || TEXT_EXTENSIONS
            .iter()
            .any(|ext| attachment.name.ends_with(ext))
}

fn read_preview(attachment: &DecodedAttachment) -> io::Result<String> {
    let mut head = Vec::new();
    File::open(&attachment.path)?
        .take(PREVIEW_BYTES)
        .read_to_end(&mut head)?;
    let text = lossy_text(&head);

    if attachment.name.ends_with(".csv") {
        // A line cut by the byte limit is still shown, truncated.
        Ok(text
            .lines()
            .take(CSV_PREVIEW_LINES)
            .map(str::trim)
            .collect::<Vec<_>>()
            .join(ESCAPED_NEWLINE))
    } else {
        Ok(text
            .replace("\r\n", "\n")
            .replace('\r', "\n")
            .replace('\n', ESCAPED_NEWLINE))
    }
}

/// Decodes UTF-8, dropping invalid sequences (including one split by the byte limit)
fn lossy_text(bytes: &[u8]) -> String {
    let mut text = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        text.push_str(chunk.valid());
    }
    text
}
