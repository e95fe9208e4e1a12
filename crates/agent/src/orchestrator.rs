//! The conversation orchestrator: one question in, one answer out.
//!
//! For each request:
//!
//! 1. Assemble the reference block and render the system prompt
//! 2. Rehydrate the thread history
//! 3. Call the model with history plus the new user turn
//! 4. Explain the answer's provenance
//! 5. Save the extended history and return
//!
//! There are no retries. A failed model call returns before step 5, so the
//! stored history is untouched.

use crate::context::ContextAssembler;
use crate::explain::explain;
use crate::template::PromptTemplate;
use fobench_core::error::ProviderError;
use fobench_core::{
    DocumentLoader, Error, ModelParams, Provider, ProviderRequest, Result, ThreadId, Turn, Usage,
};
use fobench_store::ThreadStore;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};

pub const DEFAULT_INSTRUCTIONS: &str = "Answer the user's question based on the benchmark data.";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// Everything a caller gets back from one turn.
#[derive(Debug, Clone)]
pub struct AgentReply {
    pub answer: String,
    pub explanation: String,
    pub thread_id: ThreadId,
    /// Loaded reference identifiers, overview (`SKILL.md`) first
    pub documents: Vec<String>,
    pub usage: Usage,
    pub model: String,
}

pub struct Orchestrator {
    /// The model endpoint
    provider: Arc<dyn Provider>,

    threads: Arc<ThreadStore>,

    assembler: ContextAssembler,

    /// Used when no prompt file is set
    template: PromptTemplate,

    /// Re-read on every request, so edits apply without a restart
    prompt_file: Option<PathBuf>,

    /// Reference bodies; without one only the prompt itself is sent
    loader: Option<Arc<dyn DocumentLoader>>,

    /// Used when the prompt template declares no model block
    default_params: ModelParams,

    /// Upper bound on a single model call
    timeout: Duration,
}

impl Orchestrator {
    pub fn new(provider: Arc<dyn Provider>, threads: Arc<ThreadStore>, template: PromptTemplate) -> Self {
        Self {
            provider,
            threads,
            assembler: ContextAssembler::default(),
            template,
            prompt_file: None,
            loader: None,
            default_params: ModelParams::default(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_assembler(mut self, assembler: ContextAssembler) -> Self {
        self.assembler = assembler;
        self
    }

    pub fn with_loader(mut self, loader: Arc<dyn DocumentLoader>) -> Self {
        self.loader = Some(loader);
        self
    }

    /// Load the prompt from `path` on every request instead of the fixed template.
    pub fn with_prompt_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.prompt_file = Some(path.into());
        self
    }

    pub fn with_default_params(mut self, params: ModelParams) -> Self {
        self.default_params = params;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn assembler(&self) -> &ContextAssembler {
        &self.assembler
    }

    pub fn threads(&self) -> &Arc<ThreadStore> {
        &self.threads
    }

    /// Answer `query` within the thread `thread_id` (a new thread when absent).
    pub async fn respond(
        &self,
        query: &str,
        instructions: Option<&str>,
        thread_id: Option<&str>,
    ) -> Result<AgentReply> {
        if query.trim().is_empty() {
            return Err(Error::InvalidInput("query must not be empty".into()));
        }

        let result = self.run(query, instructions, thread_id).await;
        if let Err(e) = &result {
            error!(thread_id = thread_id.unwrap_or("-"), error = %e, "Request failed");
        }
        result
    }

    async fn run(
        &self,
        query: &str,
        instructions: Option<&str>,
        thread_id: Option<&str>,
    ) -> Result<AgentReply> {
        // 1. system prompt
        let template = match &self.prompt_file {
            Some(path) => PromptTemplate::load(path)?,
            None => self.template.clone(),
        };
        let instructions = instructions
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(DEFAULT_INSTRUCTIONS);
        let rendered = template.render(&[
            ("instructions", Some(instructions)),
            ("payload", Some(query)),
        ])?;

        let references = match &self.loader {
            Some(loader) => {
                let overview = loader.overview();
                self.assembler.assemble(query, overview.as_deref(), loader.as_ref())
            }
            None => Default::default(),
        };
        let system = if references.text.is_empty() {
            rendered.system
        } else {
            format!("{}\n\n## Detailed Reference Data\n\n{}", rendered.system, references.text)
        };

        // 2-3. history plus the new turn
        let mut history = self.threads.get(thread_id).await;
        history.push(Turn::user(query));

        let params = rendered.params.unwrap_or_else(|| self.default_params.clone());
        info!(
            model = %params.name,
            messages = history.len(),
            documents = references.loaded.len(),
            "Calling model"
        );

        // 4. model call
        let request = ProviderRequest {
            system,
            messages: history.turns().to_vec(),
            params,
        };
        let response = tokio::time::timeout(self.timeout, self.provider.complete(request))
            .await
            .map_err(|_| {
                ProviderError::Timeout(format!("no response within {}s", self.timeout.as_secs()))
            })??;

        // 5-7. explain, extend, save
        let explanation = explain(&response.text, &references.loaded);
        history.push(Turn::assistant(response.text.clone()));
        let thread_id = self.threads.save(thread_id, &history).await;

        debug!(thread_id = %thread_id, turns = history.len(), "Turn complete");

        Ok(AgentReply {
            answer: response.text,
            explanation,
            thread_id,
            documents: references.loaded,
            usage: response.usage,
            model: response.model,
        })
    }
}
