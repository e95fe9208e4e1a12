//! Request bodies and their validation.

use serde::Deserialize;
use serde_json::Value;

/// One named input of an execute request.
#[derive(Debug, Clone, Deserialize)]
pub struct InputItem {
    pub name: String,
    #[serde(default)]
    pub data: Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExecuteRequest {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "webhookUrl", default)]
    pub webhook_url: Option<String>,
    #[serde(default)]
    pub inputs: Vec<InputItem>,
}

/// The inputs the agent understands, pulled out of an [`ExecuteRequest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentInputs {
    pub payload: String,
    pub instructions: Option<String>,
    pub thread_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AbortRequest {
    #[serde(default)]
    pub id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JobQuery {
    #[serde(default)]
    pub id: Option<String>,
}

impl ExecuteRequest {
    /// Check the inputs and extract the agent's arguments.
    ///
    /// `payload` is required and must not be blank; unknown input names are
    /// ignored. The first occurrence of a name wins.
    pub fn agent_inputs(&self) -> Result<AgentInputs, String> {
        let payload = match self.input("payload") {
            None => return Err("Missing required input: payload".into()),
            Some(data) => text(data).filter(|s| !s.trim().is_empty()),
        };
        let payload = payload.ok_or_else(|| "payload input cannot be empty".to_string())?;

        Ok(AgentInputs {
            payload,
            instructions: self.input("instructions").and_then(text),
            thread_id: self.input("threadId").and_then(text),
        })
    }

    fn input(&self, name: &str) -> Option<&Value> {
        self.inputs.iter().find(|i| i.name == name).map(|i| &i.data)
    }

    /// The job id to use: the caller's, or a fresh UUID.
    pub fn job_id(&self) -> String {
        self.id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(String::from)
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string())
    }

    /// The inputs as received, for the job record.
    pub fn raw_inputs(&self) -> Value {
        Value::Array(
            self.inputs
                .iter()
                .map(|i| serde_json::json!({ "name": i.name, "data": i.data }))
                .collect(),
        )
    }
}

/// Non-blank trimmed id from an optional field.
pub fn required_id(id: Option<&str>) -> Result<&str, String> {
    match id.map(str::trim) {
        None => Err("id is required".into()),
        Some("") => Err("id cannot be empty".into()),
        Some(id) => Ok(id),
    }
}

/// Strings pass through; null is absent; anything else is its JSON text.
fn text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(body: Value) -> ExecuteRequest {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn extracts_inputs() {
        let req = request(json!({
            "inputs": [
                { "name": "payload", "data": "CEO pay?" },
                { "name": "instructions", "data": "Be brief" },
                { "name": "threadId", "data": "t-1" },
                { "name": "other", "data": 5 }
            ]
        }));
        assert_eq!(
            req.agent_inputs().unwrap(),
            AgentInputs {
                payload: "CEO pay?".into(),
                instructions: Some("Be brief".into()),
                thread_id: Some("t-1".into()),
            }
        );
    }

    #[test]
    fn payload_is_required() {
        let req = request(json!({ "inputs": [{ "name": "instructions", "data": "x" }] }));
        assert_eq!(req.agent_inputs().unwrap_err(), "Missing required input: payload");

        let req = request(json!({ "inputs": [{ "name": "payload", "data": "  " }] }));
        assert_eq!(req.agent_inputs().unwrap_err(), "payload input cannot be empty");

        let req = request(json!({ "inputs": [{ "name": "payload" }] }));
        assert!(req.agent_inputs().is_err());
    }

    #[test]
    fn job_id_is_generated_when_blank() {
        let req = request(json!({ "id": " ", "inputs": [] }));
        assert_eq!(req.job_id().len(), 36);
        let req = request(json!({ "id": "job-7", "inputs": [] }));
        assert_eq!(req.job_id(), "job-7");
    }

    #[test]
    fn null_optional_inputs_are_absent() {
        let req = request(json!({
            "inputs": [{ "name": "payload", "data": "q" }, { "name": "threadId", "data": null }]
        }));
        assert!(req.agent_inputs().unwrap().thread_id.is_none());
    }

    #[test]
    fn ids() {
        assert!(required_id(None).is_err());
        assert_eq!(required_id(Some(" ")).unwrap_err(), "id cannot be empty");
        assert_eq!(required_id(Some("job-1")).unwrap(), "job-1");
    }
}
