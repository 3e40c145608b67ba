/// `load_config` module: loads an optional YAML config file and injects the API
/// key from the environment.
///
/// The file never holds secrets. Every key is optional:
///
/// ```yaml
/// model: llama-3.3-70b-versatile
/// endpoint: https://api.groq.com/openai/v1/chat/completions
/// execution: sequential   # or: concurrent
/// output: streamlit_project.zip
/// prompts:
///   code: "Write a Streamlit app for: {task}"
///   readme: "Write a README for: {task}"
///   requirements: "List the pip packages for: {task}"
/// ```
///
/// Prompt overrides must contain the `{task}` placeholder; a template without it
/// is rejected here rather than silently sending prompts that ignore the task.
///
/// # Errors
/// All errors use `anyhow::Error` and are surfaced at the CLI boundary.
use anyhow::Result;
use docforge_core::pipeline::{ExecutionMode, PipelineConfig};
use docforge_core::prompts::{PromptSet, PromptTemplate, TASK_PLACEHOLDER};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

use crate::groq::{DEFAULT_ENDPOINT, DEFAULT_MODEL};

/// Environment variable holding the Groq API key.
pub const API_KEY_ENV: &str = "GROQ_API_KEY";

/// File name the archive is written under unless configured otherwise.
pub const DEFAULT_ARCHIVE_NAME: &str = "streamlit_project.zip";

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub execution: ExecutionMode,
    #[serde(default)]
    pub output: Option<PathBuf>,
    #[serde(default)]
    pub prompts: PromptsSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PromptsSection {
    pub code: Option<String>,
    pub readme: Option<String>,
    pub requirements: Option<String>,
}

/// Fully resolved settings for one `generate` run (minus the secret).
#[derive(Debug, Clone)]
pub struct DocforgeConfig {
    pub model: String,
    pub endpoint: String,
    pub output: PathBuf,
    pub pipeline: PipelineConfig,
}

impl Default for DocforgeConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            output: PathBuf::from(DEFAULT_ARCHIVE_NAME),
            pipeline: PipelineConfig::default(),
        }
    }
}

fn template_or_default(
    key: &str,
    raw: Option<String>,
    default: PromptTemplate,
) -> Result<PromptTemplate> {
    match raw {
        None => Ok(default),
        Some(text) => PromptTemplate::new(text).ok_or_else(|| {
            error!(prompt = key, "Prompt override lacks the task placeholder");
            anyhow::anyhow!("prompts.{key} must contain the {TASK_PLACEHOLDER} placeholder")
        }),
    }
}

impl PromptsSection {
    pub fn into_prompt_set(self) -> Result<PromptSet> {
        let defaults = PromptSet::default();
        Ok(PromptSet {
            code: template_or_default("code", self.code, defaults.code)?,
            readme: template_or_default("readme", self.readme, defaults.readme)?,
            requirements: template_or_default(
                "requirements",
                self.requirements,
                defaults.requirements,
            )?,
        })
    }
}

impl FileConfig {
    pub fn resolve(self) -> Result<DocforgeConfig> {
        let defaults = DocforgeConfig::default();
        Ok(DocforgeConfig {
            model: self.model.unwrap_or(defaults.model),
            endpoint: self.endpoint.unwrap_or(defaults.endpoint),
            output: self.output.unwrap_or(defaults.output),
            pipeline: PipelineConfig {
                prompts: self.prompts.into_prompt_set()?,
                mode: self.execution,
            },
        })
    }
}

/// Loads a static YAML config file (no secrets) and resolves it against the defaults.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<DocforgeConfig> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading configuration from file");

    let config_content = match fs::read_to_string(path_ref) {
        Ok(content) => {
            info!(config_path = ?path_ref, "Config file read successfully");
            content
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
            return Err(anyhow::anyhow!(
                "Failed to read config file {:?}: {}",
                path_ref,
                e
            ));
        }
    };

    let raw: FileConfig = match serde_yaml::from_str(&config_content) {
        Ok(conf) => {
            info!(config_path = ?path_ref, "Parsed config YAML successfully");
            conf
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
            return Err(anyhow::anyhow!("Failed to parse config YAML: {e}"));
        }
    };

    let config = raw.resolve()?;
    info!(
        model = %config.model,
        mode = ?config.pipeline.mode,
        output = %config.output.display(),
        "Config loaded and resolved successfully"
    );
    Ok(config)
}

/// The API key from the command line, else from `GROQ_API_KEY`. Blank keys count as missing.
pub fn resolve_api_key(flag: Option<String>) -> Option<String> {
    let key = flag.or_else(|| std::env::var(API_KEY_ENV).ok());
    match key {
        Some(k) if !k.trim().is_empty() => {
            info!("Groq API key found");
            Some(k)
        }
        _ => {
            error!(env = API_KEY_ENV, "No Groq API key provided");
            None
        }
    }
}
