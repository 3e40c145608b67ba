//! # contract: shared types and the model seam
//!
//! This module holds the plain data that flows through a run and the single
//! trait the pipeline depends on for talking to a language model.
//!
//! ## Model handle
//! - [`LanguageModel`] is the only capability the pipeline needs:
//!   `submit(prompt) -> response`, which may fail.
//! - Model identifier and credential are bound by the implementor; the core
//!   never sees a provider wire protocol.
//! - The trait is annotated for `mockall`, so tests (and downstream crates with
//!   the `test-export-mocks` feature) get a `MockLanguageModel`.
//!
//! ## Data
//! - [`TaskDescription`]: the extracted, non-empty problem statement.
//! - [`Stage`]: which of the three generation requests is meant.
//! - [`GenerationResult`]: the code / readme / requirements triple.

use std::fmt;

use async_trait::async_trait;
use serde::Serialize;

use mockall::automock;

/// Error returned by a model client (boxed so any transport can plug in).
pub type ModelError = Box<dyn std::error::Error + Send + Sync>;

/// Opaque capability for turning a prompt into a response.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Submit one prompt and return the model's textual reply.
    async fn submit(&self, prompt: &str) -> Result<String, ModelError>;
}

/// The plain-text problem statement every generation request is built from.
///
/// Never empty: construction refuses blank text, so holding one is proof the
/// controller checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDescription(String);

impl TaskDescription {
    /// Returns `None` when `text` is empty or whitespace only.
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            None
        } else {
            Some(Self(text))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One of the three independent generation requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Code,
    Readme,
    Requirements,
}

impl Stage {
    /// Presentation order, which is also the sequential execution order.
    pub const ALL: [Stage; 3] = [Stage::Code, Stage::Readme, Stage::Requirements];

    pub fn name(self) -> &'static str {
        match self {
            Stage::Code => "code",
            Stage::Readme => "readme",
            Stage::Requirements => "requirements",
        }
    }

    /// File the stage's output is stored under in the archive.
    pub fn file_name(self) -> &'static str {
        match self {
            Stage::Code => "app.py",
            Stage::Readme => "README.md",
            Stage::Requirements => "requirements.txt",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Output of one pipeline run. All three fields are always populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationResult {
    pub code: String,
    pub readme: String,
    pub requirements: String,
}

impl GenerationResult {
    pub fn get(&self, stage: Stage) -> &str {
        match stage {
            Stage::Code => &self.code,
            Stage::Readme => &self.readme,
            Stage::Requirements => &self.requirements,
        }
    }

    /// The archive mapping: `app.py`, `README.md`, `requirements.txt`, in that order.
    pub fn archive_entries(&self) -> Vec<(&'static str, &str)> {
        Stage::ALL
            .iter()
            .map(|stage| (stage.file_name(), self.get(*stage)))
            .collect()
    }
}
