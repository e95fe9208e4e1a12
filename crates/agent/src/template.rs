//! Prompt templates.
//!
//! A prompt file is YAML with an optional `model` block and a `prompt`
//! string holding role-tagged messages:
//!
//! ```yaml
//! model:
//!   name: claude-sonnet-4-20250514
//!   temperature: 0.7
//!   max_tokens: 4096
//! prompt: |
//!   <message role="system">You are ... {{instructions}}</message>
//!   <message role="user">{{payload}}</message>
//! ```

use fobench_core::ModelParams;
use fobench_core::error::TemplateError;
use regex_lite::Regex;
use serde::Deserialize;
use std::path::Path;

const BUILTIN_PROMPT: &str = include_str!("../prompts/AgentPrompt.yaml");

#[derive(Debug, Clone, Deserialize)]
pub struct PromptTemplate {
    /// Model parameters declared by the prompt file, if any
    #[serde(default)]
    pub model: Option<ModelParams>,

    #[serde(default)]
    pub prompt: String,
}

/// A template after variable substitution and role extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedPrompt {
    pub system: String,
    /// Empty when the template has no user block
    pub user: String,
    pub params: Option<ModelParams>,
}

impl PromptTemplate {
    pub fn parse(yaml: &str) -> Result<Self, TemplateError> {
        serde_yaml::from_str(yaml).map_err(|e| TemplateError::Parse(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self, TemplateError> {
        let raw = std::fs::read_to_string(path).map_err(|e| TemplateError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::parse(&raw)
    }

    /// The prompt compiled into this crate.
    pub fn builtin() -> Result<Self, TemplateError> {
        Self::parse(BUILTIN_PROMPT)
    }

    /// Substitute `vars` and split the result into system and user messages.
    ///
    /// A template without a system block is a configuration fault.
    pub fn render(&self, vars: &[(&str, Option<&str>)]) -> Result<RenderedPrompt, TemplateError> {
        let content = substitute(&self.prompt, vars);
        let system = extract_message(&content, "system").ok_or(TemplateError::MissingSystemMessage)?;
        let user = extract_message(&content, "user").unwrap_or_default();
        Ok(RenderedPrompt {
            system,
            user,
            params: self.model.clone(),
        })
    }
}

/// Replace every `{{name}}` for each provided variable. `None` values
/// become the empty string; placeholders with no variable are left alone.
pub fn substitute(template: &str, vars: &[(&str, Option<&str>)]) -> String {
    vars.iter().fold(template.to_string(), |acc, (name, value)| {
        acc.replace(&format!("{{{{{name}}}}}"), value.unwrap_or(""))
    })
}

/// Trimmed body of the first `<message role="{role}">…</message>` block.
pub fn extract_message(content: &str, role: &str) -> Option<String> {
    let pattern = format!(
        r#"(?s)<message role="{}">(.*?)</message>"#,
        regex_lite::escape(role)
    );
    let re = Regex::new(&pattern).ok()?;
    re.captures(content)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
}
