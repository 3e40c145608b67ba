//! Session controller: one user-triggered run from uploaded document to archive bytes.
//!
//! The steps are strictly ordered and each one is terminal on failure:
//!   1. the document must exist and be a `.docx`
//!   2. its bytes are staged and converted to text (the staged copy is removed)
//!   3. blank text stops the run before any model call
//!   4. the three generation stages run through the pipeline
//!   5. the result is packaged into a zip
//!
//! Progress messages go to stderr so stdout stays free for rendered output.

use std::path::{Path, PathBuf};

use docforge_core::extract::extract_upload;
use docforge_core::package::package_result;
use docforge_core::pipeline::{generate, PipelineConfig};
use docforge_core::{
    ExtractionError, GenerationError, GenerationResult, LanguageModel, PackagingError,
    TaskDescription,
};
use thiserror::Error;
use tracing::{error, info, Instrument};
use uuid::Uuid;

/// Everything that can stop a session, with a message meant for the user.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Enter a Groq API key (--api-key or GROQ_API_KEY)")]
    MissingCredential,

    #[error("Upload a document: {} does not exist", .0.display())]
    MissingDocument(PathBuf),

    #[error("Unsupported document {}: only .docx files are accepted", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("The document contains no text")]
    EmptyDocument,

    #[error("Failed to read {}", path.display())]
    Upload {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error while reading the document")]
    Extraction(#[from] ExtractionError),

    #[error("Error while generating the project")]
    Generation(#[from] GenerationError),

    #[error("Error while packaging the project")]
    Packaging(#[from] PackagingError),
}

/// What a successful session hands back for rendering and download.
#[derive(Debug)]
pub struct SessionOutcome {
    pub task: TaskDescription,
    pub result: GenerationResult,
    pub archive: Vec<u8>,
}

/// Checks that `path` names an existing `.docx` file.
pub fn check_document(path: &Path) -> Result<(), SessionError> {
    if !path.is_file() {
        error!(path = %path.display(), "Document not found");
        return Err(SessionError::MissingDocument(path.to_path_buf()));
    }
    let is_docx = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("docx"));
    if !is_docx {
        error!(path = %path.display(), "Document is not a .docx file");
        return Err(SessionError::UnsupportedFormat(path.to_path_buf()));
    }
    Ok(())
}

/// Runs extraction, generation and packaging for one document.
pub async fn run_session<M>(
    document: &Path,
    model: &M,
    pipeline: &PipelineConfig,
) -> Result<SessionOutcome, SessionError>
where
    M: LanguageModel + ?Sized,
{
    let span = tracing::info_span!(
        "session",
        run_id = %Uuid::new_v4(),
        document = %document.display()
    );

    async move {
        check_document(document)?;

        eprintln!("Reading document text...");
        let bytes = tokio::fs::read(document).await.map_err(|source| {
            error!(error = ?source, "Failed to read uploaded document");
            SessionError::Upload {
                path: document.to_path_buf(),
                source,
            }
        })?;
        let text = extract_upload(bytes).await?;
        let task = TaskDescription::new(text).ok_or_else(|| {
            error!("Extracted document text is empty");
            SessionError::EmptyDocument
        })?;
        eprintln!("Document read successfully!");
        info!(task_len = task.as_str().len(), "Task description extracted");

        eprintln!("Preparing the agent and prompts...");
        let result = generate(pipeline, model, &task).await?;
        eprintln!("The agent is done!");

        let archive = package_result(&result)?;
        info!(archive_size = archive.len(), "Session completed");

        Ok(SessionOutcome {
            task,
            result,
            archive,
        })
    }
    .instrument(span)
    .await
}
