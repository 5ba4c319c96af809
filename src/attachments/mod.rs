//! Attachment ingestion: data-URI decoding and prompt previews

pub mod store;
pub mod summary;

pub use store::{
    Attachment, AttachmentError, AttachmentStore, DecodeReport, DecodedAttachment, StorageScope,
};
pub use summary::AttachmentSummarizer;
