///
/// This module implements the CLI interface for docforge: command parsing,
/// credential and config resolution, and user-visible output.
///
/// All pipeline logic (extraction, generation, packaging) lives in the
/// [`docforge-core`] crate. This module is CLI glue only.
///
/// ## How To Use
/// - From a shell: `docforge generate task.docx` (see `--help`).
/// - Programmatically or from integration tests: call [`run`] with a constructed [`Cli`].
///
/// [`docforge-core`]: ../../docforge-core/
use crate::groq::GroqClient;
use crate::load_config::{load_config, resolve_api_key, DocforgeConfig};
use crate::render::{archive_summary, render_json, render_sections};
use crate::session::{run_session, SessionError};
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use docforge_core::pipeline::ExecutionMode;
use std::path::PathBuf;

/// CLI for docforge: turn a task document into a downloadable project.
#[derive(Parser)]
#[clap(
    name = "docforge",
    version,
    about = "Generate a Streamlit project (app.py, README.md, requirements.txt) from a task described in a .docx"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Read the task from a .docx, generate the project and write it as a zip
    Generate(GenerateArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct GenerateArgs {
    /// Path to the .docx document describing the task
    pub document: PathBuf,

    /// Optional YAML config file (model, endpoint, prompts, execution mode)
    #[clap(long)]
    pub config: Option<PathBuf>,

    /// Groq API key; falls back to the GROQ_API_KEY environment variable
    #[clap(long)]
    pub api_key: Option<String>,

    /// Model identifier, overriding the config file
    #[clap(long)]
    pub model: Option<String>,

    /// Where to write the project archive [default: streamlit_project.zip]
    #[clap(long)]
    pub output: Option<PathBuf>,

    /// Run the three generation requests concurrently
    #[clap(long)]
    pub concurrent: bool,

    /// Print the generated files as JSON instead of sections
    #[clap(long, conflicts_with = "quiet")]
    pub json: bool,

    /// Do not print the generated files
    #[clap(long)]
    pub quiet: bool,
}

impl GenerateArgs {
    /// Command-line flags win over the config file.
    pub fn apply_overrides(&self, config: &mut DocforgeConfig) {
        if let Some(model) = &self.model {
            config.model = model.clone();
        }
        if let Some(output) = &self.output {
            config.output = output.clone();
        }
        if self.concurrent {
            config.pipeline.mode = ExecutionMode::Concurrent;
        }
    }
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    // Emit a top-level 'trace_initialised' event at the very start
    tracing::info!("trace_initialised");

    match cli.command {
        Commands::Generate(args) => generate(args).await,
    }
}

async fn generate(args: GenerateArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => DocforgeConfig::default(),
    };
    args.apply_overrides(&mut config);

    let api_key = resolve_api_key(args.api_key.clone()).ok_or(SessionError::MissingCredential)?;
    let client = GroqClient::new(api_key, config.model.clone()).with_endpoint(config.endpoint.clone());

    tracing::info!(
        command = "generate",
        model = %config.model,
        mode = ?config.pipeline.mode,
        "Starting generation session"
    );
    let outcome = match run_session(&args.document, &client, &config.pipeline).await {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::error!(command = "generate", error = %e, "Generation session failed");
            return Err(e.into());
        }
    };

    if args.json {
        println!("{}", render_json(&outcome.result)?);
    } else if !args.quiet {
        print!("{}", render_sections(&outcome.result));
    }

    std::fs::write(&config.output, &outcome.archive).with_context(|| {
        format!(
            "Failed to write project archive to {}",
            config.output.display()
        )
    })?;
    eprintln!("{}", archive_summary(&config.output, &outcome.archive));
    tracing::info!(command = "generate", output = %config.output.display(), "Generation complete");
    Ok(())
}
