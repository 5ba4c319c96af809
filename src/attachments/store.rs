//! Decoding of data-URI attachments into a storage scope
//!
//! Each attachment whose `url` starts with `data:` is base64-decoded and written to a
//! file named after the attachment inside a [`StorageScope`]. Failures are per entry:
//! a bad attachment is logged and dropped while the rest are still processed.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

const DATA_PREFIX: &str = "data:";
const DEFAULT_NAME: &str = "attachment";

/// Inbound attachment as supplied by the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
}

impl Attachment {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }

    /// Builds a `data:<mime>;base64,<payload>` attachment from raw bytes
    pub fn from_bytes(name: impl Into<String>, mime: &str, bytes: &[u8]) -> Self {
        Self::new(
            name,
            format!("{}{};base64,{}", DATA_PREFIX, mime, BASE64.encode(bytes)),
        )
    }

    fn effective_name(&self) -> &str {
        if self.name.trim().is_empty() {
            DEFAULT_NAME
        } else {
            &self.name
        }
    }
}

/// An attachment that has been decoded and written to disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedAttachment {
    pub name: String,
    pub path: PathBuf,
    pub mime: String,
    pub size: u64,
}

#[derive(Debug, Error)]
pub enum AttachmentError {
    #[error("attachment '{0}' is not a data URI")]
    MissingDataPrefix(String),

    #[error("attachment '{0}' has no ',' separating header and payload")]
    MalformedDataUri(String),

    #[error("attachment name '{0}' is not a plain file name")]
    InvalidName(String),

    #[error("attachment '{name}' has an invalid base64 payload: {source}")]
    Decode {
        name: String,
        #[source]
        source: base64::DecodeError,
    },

    #[error("failed to write attachment '{name}' to {path}: {source}")]
    Io {
        name: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl AttachmentError {
    pub fn attachment_name(&self) -> &str {
        match self {
            AttachmentError::MissingDataPrefix(name)
            | AttachmentError::MalformedDataUri(name)
            | AttachmentError::InvalidName(name) => name,
            AttachmentError::Decode { name, .. } | AttachmentError::Io { name, .. } => name,
        }
    }
}

/// Directory that decoded attachments are written into.
///
/// A scope created with [`StorageScope::new`] may be shared between calls, in which case
/// files with the same name overwrite each other. [`StorageScope::unique`] gives every call
/// its own subdirectory. Directories are created lazily and never removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageScope {
    dir: PathBuf,
}

impl StorageScope {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// A fresh `<root>/<uuid>` scope
    pub fn unique(root: impl AsRef<Path>) -> Self {
        Self::new(root.as_ref().join(Uuid::new_v4().to_string()))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }
}

/// Writes decoded attachments into a [`StorageScope`]
#[derive(Debug, Clone)]
pub struct AttachmentStore {
    scope: StorageScope,
}

/// Per-entry outcome of [`AttachmentStore::decode_all`]
#[derive(Debug, Default)]
pub struct DecodeReport {
    pub decoded: Vec<DecodedAttachment>,
    pub failures: Vec<AttachmentError>,
    pub skipped: usize,
}

impl AttachmentStore {
    pub fn new(scope: StorageScope) -> Self {
        Self { scope }
    }

    pub fn scope(&self) -> &StorageScope {
        &self.scope
    }

    /// Decodes every data-URI attachment, preserving input order.
    ///
    /// Non-`data:` entries are skipped silently; failing entries are logged and dropped.
    pub fn decode_all(&self, attachments: &[Attachment]) -> DecodeReport {
        let mut report = DecodeReport::default();

        for attachment in attachments {
            match self.decode(attachment) {
                Ok(decoded) => {
                    debug!(
                        "Decoded attachment {} ({}, {} bytes)",
                        decoded.name, decoded.mime, decoded.size
                    );
                    report.decoded.push(decoded);
                }
                Err(AttachmentError::MissingDataPrefix(name)) => {
                    debug!("Skipping attachment {} without data URI", name);
                    report.skipped += 1;
                }
                Err(e) => {
                    warn!(attachment = e.attachment_name(), "Failed to decode attachment: {}", e);
                    report.failures.push(e);
                }
            }
        }

        report
    }

    /// Decodes a single attachment and writes it to `<scope>/<name>`
    pub fn decode(&self, attachment: &Attachment) -> Result<DecodedAttachment, AttachmentError> {
        let name = attachment.effective_name();

        let rest = attachment
            .url
            .strip_prefix(DATA_PREFIX)
            .ok_or_else(|| AttachmentError::MissingDataPrefix(name.to_string()))?;

        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| AttachmentError::MalformedDataUri(name.to_string()))?;

        validate_name(name)?;

        let mime = header.split(';').next().unwrap_or_default().to_string();

        let compact: String = payload
            .chars()
            .filter(|c| !c.is_ascii_whitespace())
            .collect();
        let data = BASE64
            .decode(compact.as_bytes())
            .map_err(|source| AttachmentError::Decode {
                name: name.to_string(),
                source,
            })?;

        let path = self.scope.path_for(name);
        fs::create_dir_all(self.scope.dir())
            .and_then(|_| fs::write(&path, &data))
            .map_err(|source| AttachmentError::Io {
                name: name.to_string(),
                path: path.clone(),
                source,
            })?;

        Ok(DecodedAttachment {
            name: name.to_string(),
            path,
            mime,
            size: data.len() as u64,
        })
    }
}

fn validate_name(name: &str) -> Result<(), AttachmentError> {
    let invalid = name.contains('/')
        || name.contains('\\')
        || name == "."
        || name == ".."
        || name.contains('\0');

    if invalid {
        return Err(AttachmentError::InvalidName(name.to_string()));
    }
    Ok(())
}
