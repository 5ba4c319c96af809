//! Request and result types of the generation pipeline

use crate::attachments::{Attachment, DecodedAttachment};
use serde::{Deserialize, Serialize};
use std::fmt;

/// File name of the generated markup
pub const INDEX_HTML: &str = "index.html";

/// File name of the generated README
pub const README_MD: &str = "README.md";

/// Generation pass: initial build or revision of a previous result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Round {
    #[default]
    Initial,
    Revision,
}

impl Round {
    pub fn number(self) -> u8 {
        match self {
            Round::Initial => 1,
            Round::Revision => 2,
        }
    }
}

impl TryFrom<u8> for Round {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Round::Initial),
            2 => Ok(Round::Revision),
            other => Err(format!("invalid round {}: expected 1 or 2", other)),
        }
    }
}

impl From<Round> for u8 {
    fn from(round: Round) -> Self {
        round.number()
    }
}

impl fmt::Display for Round {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// Input to [`GenerationOrchestrator::generate`](super::GenerationOrchestrator::generate)
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub brief: String,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    #[serde(default)]
    pub checks: Vec<String>,
    #[serde(default)]
    pub round: Round,
    /// Only consulted when `round` is [`Round::Revision`]
    #[serde(default)]
    pub previous_readme: Option<String>,
}

impl GenerationRequest {
    pub fn new(brief: impl Into<String>) -> Self {
        Self {
            brief: brief.into(),
            ..Default::default()
        }
    }

    pub fn with_attachments(mut self, attachments: Vec<Attachment>) -> Self {
        self.attachments = attachments;
        self
    }

    pub fn with_checks<I, S>(mut self, checks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.checks = checks.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_round(mut self, round: Round) -> Self {
        self.round = round;
        self
    }

    pub fn with_previous_readme(mut self, readme: impl Into<String>) -> Self {
        self.previous_readme = Some(readme.into());
        self
    }

    /// The previous README, if this is a revision that carries a non-empty one
    pub fn revision_readme(&self) -> Option<&str> {
        match self.round {
            Round::Revision => self.previous_readme.as_deref().filter(|r| !r.is_empty()),
            Round::Initial => None,
        }
    }
}

/// The two generated files
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedFiles {
    #[serde(rename = "index.html")]
    pub index_html: String,
    #[serde(rename = "README.md")]
    pub readme: String,
}

impl GeneratedFiles {
    /// `(file name, contents)` pairs in output order
    pub fn entries(&self) -> [(&'static str, &str); 2] {
        [(INDEX_HTML, &self.index_html), (README_MD, &self.readme)]
    }
}

/// Output of a generation call; always well-formed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub files: GeneratedFiles,
    pub attachments: Vec<DecodedAttachment>,
}
