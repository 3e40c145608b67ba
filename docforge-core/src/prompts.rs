//! Prompt templates for the three generation stages.
//!
//! A template is plain text with a `{task}` placeholder. The defaults ask for a
//! Streamlit application, its README and its `requirements.txt`; any of them can
//! be replaced through configuration.

use crate::contract::{Stage, TaskDescription};

/// Placeholder substituted with the task description.
pub const TASK_PLACEHOLDER: &str = "{task}";

pub const DEFAULT_CODE_TEMPLATE: &str = "You are a Senior Python Developer. \
Write high-quality Streamlit code for the following task: {task}. \
Use modern techniques (st.cache_data, splitting the layout into columns). \
Output ONLY the code.";

pub const DEFAULT_README_TEMPLATE: &str = "Write a professional README.md for the project: {task}. \
Include the sections: Description, Installation, How to run.";

pub const DEFAULT_REQUIREMENTS_TEMPLATE: &str = "List the Python libraries required for this project: {task}. \
Output only the library names in requirements.txt format. Be sure to include streamlit.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate(String);

impl PromptTemplate {
    /// Returns `None` if `text` has no `{task}` placeholder.
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        if text.contains(TASK_PLACEHOLDER) {
            Some(Self(text))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Substitutes every `{task}` occurrence with the task text.
    pub fn render(&self, task: &TaskDescription) -> String {
        self.0.replace(TASK_PLACEHOLDER, task.as_str())
    }
}

/// One template per stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptSet {
    pub code: PromptTemplate,
    pub readme: PromptTemplate,
    pub requirements: PromptTemplate,
}

impl PromptSet {
    pub fn template(&self, stage: Stage) -> &PromptTemplate {
        match stage {
            Stage::Code => &self.code,
            Stage::Readme => &self.readme,
            Stage::Requirements => &self.requirements,
        }
    }
}

impl Default for PromptSet {
    fn default() -> Self {
        Self {
            code: PromptTemplate(DEFAULT_CODE_TEMPLATE.to_string()),
            readme: PromptTemplate(DEFAULT_README_TEMPLATE.to_string()),
            requirements: PromptTemplate(DEFAULT_REQUIREMENTS_TEMPLATE.to_string()),
        }
    }
}
