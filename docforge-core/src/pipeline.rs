//! Generation pipeline: one task description in, code / README / requirements out.
//!
//! The pipeline renders three prompt templates with the same task text, submits
//! each to a [`LanguageModel`] and assembles a [`GenerationResult`]. The three
//! requests never see each other's output, so they can run one after another
//! (the default) or overlapped on the same task.
//!
//! # Failure
//! Fail-fast and all-or-nothing: the first failing stage aborts the run with a
//! [`GenerationError`] naming that stage. There is no retry and no partial
//! result. In concurrent mode the remaining in-flight requests are dropped.
//!
//! # Post-processing
//! Only the code response is sanitized (fence markers removed, trimmed); the
//! README and requirements responses are kept verbatim.

use serde::Deserialize;
use tracing::{debug, error, info};

use crate::contract::{GenerationResult, LanguageModel, Stage, TaskDescription};
use crate::error::GenerationError;
use crate::prompts::PromptSet;
use crate::sanitize::sanitize_code;

/// How the three model calls are scheduled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    /// Code, then README, then requirements.
    #[default]
    Sequential,
    /// All three requests in flight at once.
    Concurrent,
}

/// Everything the pipeline needs besides the task and the model handle.
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    pub prompts: PromptSet,
    pub mode: ExecutionMode,
}

/// Runs the three generation stages and returns the assembled result.
pub async fn generate<M>(
    config: &PipelineConfig,
    model: &M,
    task: &TaskDescription,
) -> Result<GenerationResult, GenerationError>
where
    M: LanguageModel + ?Sized,
{
    info!(
        mode = ?config.mode,
        task_len = task.as_str().len(),
        "[GEN] Starting generation pipeline"
    );

    let (code, readme, requirements) = match config.mode {
        ExecutionMode::Sequential => {
            let code = generate_stage(&config.prompts, model, task, Stage::Code).await?;
            let readme = generate_stage(&config.prompts, model, task, Stage::Readme).await?;
            let requirements =
                generate_stage(&config.prompts, model, task, Stage::Requirements).await?;
            (code, readme, requirements)
        }
        ExecutionMode::Concurrent => futures::try_join!(
            generate_stage(&config.prompts, model, task, Stage::Code),
            generate_stage(&config.prompts, model, task, Stage::Readme),
            generate_stage(&config.prompts, model, task, Stage::Requirements),
        )?,
    };

    info!("[GEN] All stages completed");
    Ok(GenerationResult {
        code,
        readme,
        requirements,
    })
}

/// Renders, submits and post-processes a single stage.
pub async fn generate_stage<M>(
    prompts: &PromptSet,
    model: &M,
    task: &TaskDescription,
    stage: Stage,
) -> Result<String, GenerationError>
where
    M: LanguageModel + ?Sized,
{
    let prompt = prompts.template(stage).render(task);
    debug!(%stage, prompt_len = prompt.len(), "[GEN] Submitting prompt");

    match model.submit(&prompt).await {
        Ok(raw) => {
            info!(%stage, response_len = raw.len(), "[GEN] Stage succeeded");
            Ok(match stage {
                Stage::Code => sanitize_code(&raw),
                Stage::Readme | Stage::Requirements => raw,
            })
        }
        Err(e) => {
            error!(%stage, error = %e, "[GEN][ERROR] Stage failed");
            Err(GenerationError::new(stage, e))
        }
    }
}
