//! Outbound job notifications.
//!
//! Every notification is a JSON `POST` of `{id, status, data}` to the job's
//! webhook URL. Delivery problems are logged and reported as `false`; they
//! never fail the job itself.

use serde_json::{Value, json};
use std::time::Duration;
use tracing::{debug, warn};

pub struct WebhookNotifier {
    client: reqwest::Client,
}

impl WebhookNotifier {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    /// POST `{id, status, data}` to `url`.
    ///
    /// No URL counts as delivered.
    pub async fn send(&self, url: Option<&str>, job_id: &str, status: &str, data: Value) -> bool {
        let Some(url) = url.filter(|u| !u.trim().is_empty()) else {
            debug!(job_id, "No webhook URL configured");
            return true;
        };

        let body = json!({ "id": job_id, "status": status, "data": data });
        match self.client.post(url).json(&body).send().await {
            Ok(resp) if resp.status().is_success() => {
                debug!(job_id, status, "Webhook delivered");
                true
            }
            Ok(resp) => {
                let code = resp.status().as_u16();
                let text = resp.text().await.unwrap_or_default();
                warn!(job_id, code, body = %text, "Webhook rejected");
                false
            }
            Err(e) if e.is_timeout() => {
                warn!(job_id, "Webhook timed out");
                false
            }
            Err(e) => {
                warn!(job_id, error = %e, "Webhook failed");
                false
            }
        }
    }

    pub async fn progress(&self, url: Option<&str>, job_id: &str, data: Value) -> bool {
        self.send(url, job_id, "inprogress", data).await
    }

    pub async fn completed(&self, url: Option<&str>, job_id: &str, output: &str) -> bool {
        self.send(url, job_id, "completed", json!({ "output": output }))
            .await
    }

    /// Report a failed job. `code` is the status the failure maps to.
    pub async fn failed(&self, url: Option<&str>, job_id: &str, reason: &str, code: u16) -> bool {
        debug!(job_id, code, "Sending failure webhook");
        self.send(url, job_id, "failed", json!({ "reason": reason }))
            .await
    }
}

/// A named output in the shape clients render.
pub fn output(name: &str, kind: &str, data: impl Into<Value>) -> Value {
    json!({ "name": name, "type": kind, "data": data.into() })
}
