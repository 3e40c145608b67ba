//! Error kinds for the three pipeline phases.
//!
//! Each phase has its own type so callers can match on the phase that failed.
//! Messages name the failure only; the underlying cause stays reachable through
//! `source()`. Nothing here retries or falls back: an error is raised where it
//! happens and travels up unchanged.

use thiserror::Error;

use crate::contract::{ModelError, Stage};

/// Failure while turning an uploaded document into text.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("failed to read document")]
    Io(#[from] std::io::Error),

    #[error("document is not a valid .docx container")]
    InvalidArchive(#[source] zip::result::ZipError),

    #[error("document has no `{0}` part")]
    MissingDocumentPart(String),

    #[error("document part `{part}` is not valid UTF-8")]
    Encoding {
        part: String,
        #[source]
        source: std::string::FromUtf8Error,
    },

    #[error("extraction task did not complete: {0}")]
    Interrupted(String),
}

/// A single model call failed; the whole pipeline is aborted.
#[derive(Debug, Error)]
#[error("{stage} generation failed")]
pub struct GenerationError {
    pub stage: Stage,
    #[source]
    pub source: ModelError,
}

impl GenerationError {
    pub fn new(stage: Stage, source: ModelError) -> Self {
        Self { stage, source }
    }
}

/// Failure while building the zip archive.
#[derive(Debug, Error)]
pub enum PackagingError {
    #[error("duplicate archive entry `{0}`")]
    DuplicateEntry(String),

    #[error("zip writer failed")]
    Zip(#[from] zip::result::ZipError),

    #[error("failed to write archive entry")]
    Io(#[from] std::io::Error),
}
