//! HTTP API gateway for fobench.
//!
//! Exposes the agent as a job API:
//!
//! | Route | Purpose |
//! |-------|---------|
//! | `GET /discover` | agent card and reference-data summary |
//! | `POST /execute` | run a question to completion |
//! | `POST /execute/async` | start a run, poll `/status` |
//! | `GET /status?id=` | job status and result |
//! | `POST /abort` | abort a pending or running job |
//! | `GET /logs?id=` | job logs |
//! | `GET /health` | liveness |
//!
//! Built on Axum. Agent runs are bounded by a semaphore worker pool.

pub mod jobs;
pub mod validate;
pub mod webhook;

use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method, StatusCode, header};
use axum::{
    Router,
    extract::State,
    response::Json,
    routing::{get, post},
};
use fobench_agent::{Orchestrator, PromptTemplate, SkillDirectory, SkillMetadata};
use fobench_config::{AgentCardConfig, AppConfig, StoreBackendKind};
use fobench_core::{Error as CoreError, KvBackend};
use fobench_store::{InMemoryKv, JobStore, OfflineKv, SqliteKv, ThreadStore};
use serde::Serialize;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{debug, info, warn};

/// How often expired threads and jobs are deleted from storage.
const SWEEP_INTERVAL: Duration = Duration::from_secs(60 * 60);

use crate::webhook::WebhookNotifier;

/// Shared application state for the gateway.
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
    pub jobs: Arc<JobStore>,
    pub notifier: Arc<WebhookNotifier>,
    /// One permit per concurrent agent run
    pub workers: Arc<Semaphore>,
    pub card: AgentCardConfig,
    pub skill: Option<SkillMetadata>,
    /// Fallback for jobs that did not bring their own `webhookUrl`
    pub default_webhook: Option<String>,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(orchestrator: Arc<Orchestrator>, jobs: Arc<JobStore>, notifier: WebhookNotifier) -> Self {
        Self {
            orchestrator,
            jobs,
            notifier: Arc::new(notifier),
            workers: Arc::new(Semaphore::new(4)),
            card: AgentCardConfig::default(),
            skill: None,
            default_webhook: None,
        }
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = Arc::new(Semaphore::new(workers.max(1)));
        self
    }

    pub fn with_card(mut self, card: AgentCardConfig) -> Self {
        self.card = card;
        self
    }

    pub fn with_skill(mut self, skill: Option<SkillMetadata>) -> Self {
        self.skill = skill;
        self
    }

    pub fn with_default_webhook(mut self, url: Option<String>) -> Self {
        self.default_webhook = url;
        self
    }

    /// Wire every collaborator from configuration.
    pub async fn from_config(config: &AppConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let provider = fobench_providers::build_from_config(config)?;

        let (thread_kv, job_kv) = open_backends(config).await;
        let threads = Arc::new(
            ThreadStore::new(thread_kv).with_ttl(fobench_store::days(config.store.thread_ttl_days)),
        );
        let jobs = Arc::new(
            JobStore::new(job_kv).with_ttl(fobench_store::days(config.store.job_ttl_days)),
        );

        let mut orchestrator = Orchestrator::new(provider, threads, PromptTemplate::builtin()?)
            .with_default_params(config.model.params())
            .with_timeout(Duration::from_secs(config.model.timeout_secs));

        match config.skill.resolve_prompt_path(config.environment_mode) {
            Some(path) => {
                info!(path = %path.display(), "Using prompt file");
                orchestrator = orchestrator.with_prompt_file(path);
            }
            None => info!("No prompt file found, using built-in prompt"),
        }

        let skill = match SkillDirectory::resolve(&config.skill.dirs) {
            Some(dir) => {
                let metadata = dir.metadata();
                info!(skill = %metadata.name, path = %dir.root().display(), "Skill loaded");
                orchestrator = orchestrator.with_loader(Arc::new(dir));
                Some(metadata)
            }
            None => {
                warn!("No skill directory found, answering without reference data");
                None
            }
        };

        let notifier = WebhookNotifier::new(Duration::from_secs(config.webhook.timeout_secs))?;

        Ok(Self::new(Arc::new(orchestrator), jobs, notifier)
            .with_workers(config.gateway.workers)
            .with_card(config.agent.clone())
            .with_skill(skill)
            .with_default_webhook(config.webhook.url.clone()))
    }
}

/// Thread and job backends for the configured store kind.
///
/// An unreachable SQLite database degrades to the volatile tier rather than
/// refusing to start.
async fn open_backends(config: &AppConfig) -> (Arc<dyn KvBackend>, Arc<dyn KvBackend>) {
    match config.store.backend {
        StoreBackendKind::Memory => (Arc::new(InMemoryKv::new()), Arc::new(InMemoryKv::new())),
        StoreBackendKind::None => (Arc::new(OfflineKv), Arc::new(OfflineKv)),
        StoreBackendKind::Sqlite => {
            let opened = async {
                let pool = SqliteKv::open_pool(&config.store.path).await?;
                let threads = SqliteKv::from_pool(pool.clone(), &config.store.threads_table).await?;
                let jobs = SqliteKv::from_pool(pool, &config.store.jobs_table).await?;
                Ok::<_, fobench_core::error::StoreError>((threads, jobs))
            }
            .await;
            match opened {
                Ok((threads, jobs)) => (Arc::new(threads), Arc::new(jobs)),
                Err(e) => {
                    warn!(error = %e, "SQLite unavailable, serving from volatile storage");
                    (Arc::new(OfflineKv), Arc::new(OfflineKv))
                }
            }
        }
    }
}

/// Build the Axum router with all gateway routes.
pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/discover", get(discover_handler))
        .route("/execute", post(jobs::execute_handler))
        .route("/execute/async", post(jobs::execute_async_handler))
        .route("/status", get(jobs::status_handler))
        .route("/abort", post(jobs::abort_handler))
        .route("/logs", get(jobs::logs_handler))
        .route("/health", get(health_handler))
        .with_state(state)
        .layer(DefaultBodyLimit::max(1024 * 1024))
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

/// CORS for the configured origins. `*` allows any origin without credentials.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .max_age(Duration::from_secs(3600));

    if origins.iter().any(|o| o == "*") {
        return base.allow_origin(AllowOrigin::any());
    }

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse() {
            Ok(v) => Some(v),
            Err(_) => {
                warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    base.allow_origin(AllowOrigin::list(parsed))
        .allow_credentials(true)
}

/// Periodically delete expired threads and jobs.
///
/// The first sweep runs immediately.
pub fn spawn_sweeper(
    threads: Arc<ThreadStore>,
    jobs: Arc<JobStore>,
    every: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        loop {
            interval.tick().await;
            let threads_removed = threads.purge_expired().await;
            let jobs_removed = jobs.purge_expired().await;
            if threads_removed + jobs_removed > 0 {
                info!(threads = threads_removed, jobs = jobs_removed, "Expired records swept");
            } else {
                debug!("Sweep found nothing expired");
            }
        }
    })
}

/// Start the gateway HTTP server.
pub async fn start(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);
    let state = Arc::new(AppState::from_config(&config).await?);
    spawn_sweeper(
        state.orchestrator.threads().clone(),
        state.jobs.clone(),
        SWEEP_INTERVAL,
    );

    let app = build_router(state).layer(cors_layer(&config.gateway.allow_origins));

    info!(addr = %addr, workers = config.gateway.workers, "Gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// --- Errors ---

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub(crate) fn bad_request(message: impl Into<String>) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

/// Map a core error onto its HTTP status.
pub(crate) fn core_error(e: &CoreError) -> ApiError {
    let status = StatusCode::from_u16(e.class().status_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Json(ErrorResponse {
            error: e.to_string(),
        }),
    )
}

// --- Handlers ---

async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

async fn discover_handler(State(state): State<SharedState>) -> Result<Json<Value>, ApiError> {
    if let Some(path) = &state.card.card_path {
        let card = std::fs::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|raw| serde_json::from_str::<Value>(&raw).map_err(|e| e.to_string()))
            .map_err(|e| {
                warn!(path = %path.display(), error = %e, "Agent card unreadable");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse {
                        error: format!("Failed to load agent configuration: {e}"),
                    }),
                )
            })?;
        return Ok(Json(card));
    }

    let card = &state.card;
    let mut body = json!({
        "name": card.name,
        "description": card.description,
        "maxThreads": card.max_threads,
        "inputs": card.inputs,
        "outputs": card.outputs,
        "referenceData": state.orchestrator.assembler().catalog().summary(),
    });
    if let Some(skill) = &state.skill {
        body["skill"] = json!({ "name": skill.name, "description": skill.description });
    }
    Ok(Json(body))
}
