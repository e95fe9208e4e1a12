//! Scripted providers for tests in this and downstream crates.

use async_trait::async_trait;
use fobench_core::error::ProviderError;
use fobench_core::provider::{Provider, ProviderRequest, ProviderResponse, Usage};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

type Scripted = Result<ProviderResponse, ProviderError>;

/// A provider that replays scripted outcomes and records every request.
///
/// Outcomes are consumed in order; once the queue is empty the `repeat`
/// outcome (if any) is returned for every further call. Panics when neither
/// is available.
pub struct ScriptedProvider {
    queue: Mutex<VecDeque<Scripted>>,
    repeat: Option<Scripted>,
    delay: Option<Duration>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl ScriptedProvider {
    pub fn new(outcomes: Vec<Scripted>) -> Self {
        Self {
            queue: Mutex::new(outcomes.into()),
            repeat: None,
            delay: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Answers every call with `text`.
    pub fn always(text: &str) -> Self {
        let mut p = Self::new(Vec::new());
        p.repeat = Some(Ok(make_text_response(text)));
        p
    }

    /// Fails every call with `error`.
    pub fn failing(error: ProviderError) -> Self {
        let mut p = Self::new(Vec::new());
        p.repeat = Some(Err(error));
        p
    }

    /// Answers once per entry of `texts`, in order.
    pub fn texts(texts: &[&str]) -> Self {
        Self::new(texts.iter().map(|t| Ok(make_text_response(t))).collect())
    }

    /// Sleep before answering each call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Every request seen so far.
    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> Option<ProviderRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted_mock"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let call = {
            let mut requests = self.requests.lock().unwrap();
            requests.push(request);
            requests.len()
        };

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let next = self.queue.lock().unwrap().pop_front();
        match next.or_else(|| self.repeat.clone()) {
            Some(outcome) => outcome,
            None => panic!("ScriptedProvider: no more responses (call #{call})"),
        }
    }
}

/// A plain text response with fixed token counts.
pub fn make_text_response(text: &str) -> ProviderResponse {
    ProviderResponse {
        text: text.into(),
        usage: Usage {
            input_tokens: 10,
            output_tokens: 5,
        },
        model: "mock-model".into(),
    }
}
