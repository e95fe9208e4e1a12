//! Job routes: execute, status, abort, logs.
//!
//! A job moves `pending → in_progress → completed | error`, or to `aborted`
//! at any point before it finishes. Abort is advisory: the model call in
//! flight completes, but its result no longer replaces the aborted status.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::response::Json;
use fobench_agent::AgentReply;
use fobench_core::Error as CoreError;
use fobench_store::{AbortOutcome, JobRecord, JobStatus};
use serde_json::{Value, json};
use tracing::{error, info};

use crate::validate::{AbortRequest, AgentInputs, ExecuteRequest, JobQuery, required_id};
use crate::webhook::output;
use crate::{ApiError, SharedState, bad_request, core_error};

/// Status code reported to webhooks for a user abort.
const ABORTED_CODE: u16 = 499;

/// How one run ended.
pub enum RunOutcome {
    Completed(AgentReply),
    Failed(CoreError),
    /// Aborted before or while running
    Aborted,
}

/// Parse and validate an execute body, then record the pending job.
async fn accept(
    state: &SharedState,
    body: Result<Json<ExecuteRequest>, JsonRejection>,
) -> Result<(JobRecord, AgentInputs), ApiError> {
    let Json(request) = body.map_err(|e| bad_request(e.body_text()))?;
    let inputs = request.agent_inputs().map_err(bad_request)?;

    let job = JobRecord::pending(request.job_id(), request.raw_inputs())
        .with_webhook(request.webhook_url.clone().or_else(|| state.default_webhook.clone()));
    state.jobs.save(&job).await;
    info!(job_id = %job.id, "Job accepted");
    Ok((job, inputs))
}

/// Run one job to its end: progress webhooks, the agent turn, the final
/// status and result.
pub async fn run_job(state: &SharedState, job: &JobRecord, inputs: &AgentInputs) -> RunOutcome {
    let url = job.webhook_url.as_deref();
    let notifier = &state.notifier;

    let started = state.jobs.update_status(&job.id, JobStatus::InProgress, None).await;
    if started.is_some_and(|j| j.status == JobStatus::Aborted) {
        return RunOutcome::Aborted;
    }

    notifier
        .progress(
            url,
            &job.id,
            json!({ "title": "Processing...", "info": "Analyzing family office benchmark data..." }),
        )
        .await;

    let reply = state
        .orchestrator
        .respond(
            &inputs.payload,
            inputs.instructions.as_deref(),
            inputs.thread_id.as_deref(),
        )
        .await;

    match reply {
        Ok(reply) => {
            let result = json!({
                "output": reply.answer,
                "explanation": reply.explanation,
                "threadId": reply.thread_id,
                "documents": reply.documents,
                "logs": [format!("Loaded {} reference sections", reply.documents.len())],
            });
            let stored = state
                .jobs
                .update_status(&job.id, JobStatus::Completed, Some(result))
                .await;
            if stored.is_some_and(|j| j.status == JobStatus::Aborted) {
                info!(job_id = %job.id, "Job finished after abort, result discarded");
                return RunOutcome::Aborted;
            }

            notifier
                .progress(url, &job.id, json!({ "output": output("explanation", "longText", reply.explanation.clone()) }))
                .await;
            notifier
                .progress(url, &job.id, json!({ "output": output("threadId", "shortText", reply.thread_id.as_str()) }))
                .await;
            notifier.completed(url, &job.id, &reply.answer).await;

            RunOutcome::Completed(reply)
        }
        Err(e) => {
            error!(job_id = %job.id, error = %e, "Job failed");
            let stored = state
                .jobs
                .update_status(&job.id, JobStatus::Error, Some(json!({ "error": e.to_string() })))
                .await;
            if stored.is_some_and(|j| j.status == JobStatus::Aborted) {
                return RunOutcome::Aborted;
            }
            notifier
                .failed(url, &job.id, &e.to_string(), e.class().status_code())
                .await;
            RunOutcome::Failed(e)
        }
    }
}

pub async fn execute_handler(
    State(state): State<SharedState>,
    body: Result<Json<ExecuteRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let (job, inputs) = accept(&state, body).await?;

    let _permit = state
        .workers
        .acquire()
        .await
        .map_err(|_| core_error(&CoreError::Internal("worker pool closed".into())))?;

    match run_job(&state, &job, &inputs).await {
        RunOutcome::Completed(reply) => Ok(Json(json!({
            "id": job.id,
            "status": JobStatus::Completed,
            "result": output("output", "longText", reply.answer),
            "explanation": reply.explanation,
            "threadId": reply.thread_id,
            "documents": reply.documents,
        }))),
        RunOutcome::Failed(e) => Err(core_error(&e)),
        RunOutcome::Aborted => Ok(Json(json!({
            "id": job.id,
            "status": JobStatus::Aborted,
            "message": "Job was aborted",
        }))),
    }
}

pub async fn execute_async_handler(
    State(state): State<SharedState>,
    body: Result<Json<ExecuteRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let (job, inputs) = accept(&state, body).await?;
    let id = job.id.clone();

    let task_state = state.clone();
    tokio::spawn(async move {
        let Ok(_permit) = task_state.workers.clone().acquire_owned().await else {
            error!(job_id = %job.id, "Worker pool closed, job not run");
            return;
        };
        run_job(&task_state, &job, &inputs).await;
    });

    Ok(Json(json!({ "id": id, "status": JobStatus::Pending, "message": "Job started" })))
}

fn not_found(id: &str) -> Json<Value> {
    Json(json!({ "id": id, "status": "not_found", "message": format!("Job {id} not found") }))
}

pub async fn status_handler(
    State(state): State<SharedState>,
    Query(query): Query<JobQuery>,
) -> Result<Json<Value>, ApiError> {
    let id = required_id(query.id.as_deref()).map_err(bad_request)?;
    let Some(job) = state.jobs.get(id).await else {
        return Ok(not_found(id));
    };
    Ok(Json(json!({
        "id": job.id,
        "status": job.status,
        "result": job.result,
        "created_at": job.created_at,
    })))
}

pub async fn abort_handler(
    State(state): State<SharedState>,
    body: Result<Json<AbortRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(request) = body.map_err(|e| bad_request(e.body_text()))?;
    let id = required_id(request.id.as_deref()).map_err(bad_request)?;

    let job = match state
        .jobs
        .abort(id, json!({ "reason": "User requested abort" }))
        .await
    {
        AbortOutcome::Aborted(job) => job,
        AbortOutcome::AlreadyFinished(status) => {
            return Ok(Json(json!({
                "id": id,
                "status": status,
                "message": format!("Job cannot be aborted - current status: {status}"),
            })));
        }
        AbortOutcome::NotFound => return Ok(not_found(id)),
    };

    state
        .notifier
        .failed(job.webhook_url.as_deref(), id, "Job aborted by user", ABORTED_CODE)
        .await;
    info!(job_id = %id, "Job aborted");

    Ok(Json(json!({ "id": id, "status": JobStatus::Aborted, "message": "Job aborted successfully" })))
}

pub async fn logs_handler(
    State(state): State<SharedState>,
    Query(query): Query<JobQuery>,
) -> Result<Json<Value>, ApiError> {
    let id = required_id(query.id.as_deref()).map_err(bad_request)?;
    let (status, logs) = match state.jobs.get(id).await {
        Some(job) => {
            let logs = job
                .result
                .as_ref()
                .and_then(|r| r.get("logs"))
                .cloned()
                .unwrap_or_else(|| json!([]));
            (json!(job.status), logs)
        }
        None => (json!("not_found"), json!([])),
    };
    Ok(Json(json!({ "id": id, "logs": logs, "status": status })))
}
