#![doc = "docforge-core: core pipeline library for docforge."]

//! This crate turns the text of an uploaded document into a small project
//! deliverable: generated application code, a README and a requirements
//! manifest, bundled as a zip archive.
//!
//! # Modules
//! - [`extract`]: `.docx` to plain text, with a self-cleaning temp file for uploads
//! - [`pipeline`]: three independent prompt/response stages from one task
//! - [`sanitize`]: strips code fences from the code stage's reply
//! - [`package`]: deterministic in-memory zip packaging
//! - [`contract`]: the [`LanguageModel`](contract::LanguageModel) seam and shared data types
//!
//! The crate holds no process-wide state and reads no environment; the CLI crate
//! supplies the model client, credentials and configuration.

pub mod contract;
pub mod error;
pub mod extract;
pub mod package;
pub mod pipeline;
pub mod prompts;
pub mod sanitize;

pub use contract::{GenerationResult, LanguageModel, ModelError, Stage, TaskDescription};
pub use error::{ExtractionError, GenerationError, PackagingError};
