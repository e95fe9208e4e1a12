//! Configuration loading, validation, and management for fobench.
//!
//! Loads configuration from `$FOBENCH_CONFIG` (or `./fobench.toml`) with
//! environment variable overrides. Validates all settings at startup.

use fobench_core::ModelParams;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "FOBENCH_CONFIG";

/// Default config file, relative to the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "fobench.toml";

/// The root configuration structure.
///
/// Maps directly to `fobench.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Anthropic API key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Deployment mode; `dev` enables prompt hot reload from /tmp
    #[serde(default)]
    pub environment_mode: EnvironmentMode,

    /// Model defaults, used when the prompt file has no model block
    #[serde(default)]
    pub model: ModelConfig,

    /// Gateway configuration
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Thread and job storage
    #[serde(default)]
    pub store: StoreConfig,

    /// Skill directory and prompt file locations
    #[serde(default)]
    pub skill: SkillConfig,

    /// Agent card served by discovery
    #[serde(default)]
    pub agent: AgentCardConfig,

    /// Outbound webhook delivery
    #[serde(default)]
    pub webhook: WebhookConfig,
}

/// Redact a secret for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("environment_mode", &self.environment_mode)
            .field("model", &self.model)
            .field("gateway", &self.gateway)
            .field("store", &self.store)
            .field("skill", &self.skill)
            .field("agent", &self.agent)
            .field("webhook", &self.webhook)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvironmentMode {
    #[default]
    Dev,
    Prod,
}

impl std::str::FromStr for EnvironmentMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dev" | "development" => Ok(Self::Dev),
            "prod" | "production" => Ok(Self::Prod),
            other => Err(ConfigError::ValidationError(format!(
                "unknown environment mode '{other}' (expected dev or prod)"
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(default = "fobench_core::provider::default_model")]
    pub name: String,

    #[serde(default = "fobench_core::provider::default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "fobench_core::provider::default_temperature")]
    pub temperature: f32,

    /// Upper bound on a single model call
    #[serde(default = "default_model_timeout")]
    pub timeout_secs: u64,

    /// Override the Anthropic endpoint (proxies, tests)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

fn default_model_timeout() -> u64 {
    300
}

impl ModelConfig {
    pub fn params(&self) -> ModelParams {
        ModelParams {
            name: self.name.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        let params = ModelParams::default();
        Self {
            name: params.name,
            max_tokens: params.max_tokens,
            temperature: params.temperature,
            timeout_secs: default_model_timeout(),
            base_url: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_allow_origins")]
    pub allow_origins: Vec<String>,

    /// Concurrent agent executions
    #[serde(default = "default_workers")]
    pub workers: usize,
}

fn default_port() -> u16 {
    8000
}
fn default_host() -> String {
    "0.0.0.0".into()
}
fn default_allow_origins() -> Vec<String> {
    vec!["http://localhost:3000".into()]
}
fn default_workers() -> usize {
    4
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
            allow_origins: default_allow_origins(),
            workers: default_workers(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackendKind {
    #[default]
    Sqlite,
    Memory,
    /// No durable tier; every request is served from the volatile fallback
    None,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackendKind,

    #[serde(default = "default_store_path")]
    pub path: String,

    #[serde(default = "default_threads_table")]
    pub threads_table: String,

    #[serde(default = "default_jobs_table")]
    pub jobs_table: String,

    #[serde(default = "default_thread_ttl_days")]
    pub thread_ttl_days: u64,

    #[serde(default = "default_job_ttl_days")]
    pub job_ttl_days: u64,
}

fn default_store_path() -> String {
    "sqlite://fobench.db".into()
}
fn default_threads_table() -> String {
    "agent_threads".into()
}
fn default_jobs_table() -> String {
    "agent_jobs".into()
}
fn default_thread_ttl_days() -> u64 {
    30
}
fn default_job_ttl_days() -> u64 {
    7
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackendKind::default(),
            path: default_store_path(),
            threads_table: default_threads_table(),
            jobs_table: default_jobs_table(),
            thread_ttl_days: default_thread_ttl_days(),
            job_ttl_days: default_job_ttl_days(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillConfig {
    /// Candidate skill directories, first existing wins
    #[serde(default = "default_skill_dirs")]
    pub dirs: Vec<PathBuf>,

    #[serde(default = "default_prompt_file")]
    pub prompt_file: String,

    /// Candidate prompt directories, first containing `prompt_file` wins
    #[serde(default = "default_prompt_dirs")]
    pub prompt_dirs: Vec<PathBuf>,

    /// Checked before `prompt_dirs` in dev mode
    #[serde(default = "default_dev_prompt_dir")]
    pub dev_prompt_dir: PathBuf,
}

fn default_skill_dirs() -> Vec<PathBuf> {
    vec!["Skill".into(), "/var/task/Skill".into(), "/tmp/Skill".into()]
}
fn default_prompt_file() -> String {
    "AgentPrompt.yaml".into()
}
fn default_prompt_dirs() -> Vec<PathBuf> {
    vec!["Prompt".into(), "/var/task/Prompt".into()]
}
fn default_dev_prompt_dir() -> PathBuf {
    "/tmp/Prompt".into()
}

impl Default for SkillConfig {
    fn default() -> Self {
        Self {
            dirs: default_skill_dirs(),
            prompt_file: default_prompt_file(),
            prompt_dirs: default_prompt_dirs(),
            dev_prompt_dir: default_dev_prompt_dir(),
        }
    }
}

impl SkillConfig {
    /// First configured skill directory that exists.
    pub fn resolve_skill_dir(&self) -> Option<PathBuf> {
        self.dirs.iter().find(|d| d.is_dir()).cloned()
    }

    /// Locate the prompt file. In dev mode the hot-reload directory wins.
    pub fn resolve_prompt_path(&self, mode: EnvironmentMode) -> Option<PathBuf> {
        let dev = (mode == EnvironmentMode::Dev).then_some(&self.dev_prompt_dir);
        dev.into_iter()
            .chain(self.prompt_dirs.iter())
            .map(|dir| dir.join(&self.prompt_file))
            .find(|p| p.is_file())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentCardConfig {
    #[serde(default = "default_agent_name")]
    pub name: String,

    #[serde(default = "default_agent_description")]
    pub description: String,

    #[serde(default = "default_max_threads")]
    pub max_threads: u32,

    /// An `agent.json` served verbatim by discovery when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_path: Option<PathBuf>,

    #[serde(default = "default_card_inputs")]
    pub inputs: Vec<CardField>,

    #[serde(default = "default_card_outputs")]
    pub outputs: Vec<CardField>,
}

fn default_agent_name() -> String {
    "Agreus Family Office Benchmark Agent".into()
}
fn default_agent_description() -> String {
    "Expert agent for family office compensation benchmarks".into()
}
fn default_max_threads() -> u32 {
    1
}

/// One input or output advertised on the agent card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardField {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub required: bool,
}

impl CardField {
    fn new(name: &str, kind: &str, description: &str, required: bool) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            description: description.into(),
            required,
        }
    }
}

fn default_card_inputs() -> Vec<CardField> {
    vec![
        CardField::new("payload", "longText", "The question about family office compensation", true),
        CardField::new("instructions", "longText", "Optional instructions for the answer", false),
        CardField::new("threadId", "shortText", "Thread to continue", false),
    ]
}
fn default_card_outputs() -> Vec<CardField> {
    vec![
        CardField::new("output", "longText", "The answer", true),
        CardField::new("explanation", "longText", "Where the answer came from", true),
        CardField::new("threadId", "shortText", "Thread to pass on the next request", true),
    ]
}

impl Default for AgentCardConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            description: default_agent_description(),
            max_threads: default_max_threads(),
            card_path: None,
            inputs: default_card_inputs(),
            outputs: default_card_outputs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookConfig {
    /// Used for jobs that did not supply their own `webhookUrl`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default = "default_webhook_timeout")]
    pub timeout_secs: u64,
}

fn default_webhook_timeout() -> u64 {
    30
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            url: None,
            timeout_secs: default_webhook_timeout(),
        }
    }
}

/// Environment overrides: canonical variable first, then parameter-store
/// aliases. Each alias matches as written or upper-cased.
const ENV_API_KEY: &[&str] = &["ANTHROPIC_API_KEY", "anthropic_api_key", "anthropic_key"];
const ENV_HOST: &[&str] = &["APP_HOST", "app_host", "host"];
const ENV_PORT: &[&str] = &["APP_PORT", "app_port", "port"];
const ENV_ORIGINS: &[&str] = &["ALLOW_ORIGINS", "allow_origins", "cors_origins"];
const ENV_MODE: &[&str] = &["ENVIRONMENT_MODE", "environment_mode", "env_mode"];
const ENV_WEBHOOK: &[&str] = &["WEBHOOK_URL", "webhook_url", "callback_url"];
const ENV_AGENT_NAME: &[&str] = &["AGENT_NAME", "agent_name", "name"];
const ENV_DB: &[&str] = &["FOBENCH_DB"];

/// Ten years; longer TTLs are a configuration mistake.
const MAX_TTL_DAYS: u64 = 3650;

impl AppConfig {
    /// Load configuration from `$FOBENCH_CONFIG` or `./fobench.toml`,
    /// then apply process environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));
        let mut config = Self::load_from(&path)?;
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from an environment lookup, then re-validate.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let present = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let get = |names: &[&str]| {
            names.iter().find_map(|n| {
                present(n).or_else(|| {
                    let upper = n.to_ascii_uppercase();
                    (upper != *n).then(|| present(&upper)).flatten()
                })
            })
        };

        if let Some(key) = get(ENV_API_KEY) {
            self.api_key = Some(key);
        }
        if let Some(host) = get(ENV_HOST) {
            self.gateway.host = host;
        }
        if let Some(port) = get(ENV_PORT) {
            self.gateway.port = port.trim().parse().map_err(|_| {
                ConfigError::ValidationError(format!("APP_PORT is not a port number: {port}"))
            })?;
        }
        if let Some(origins) = get(ENV_ORIGINS) {
            self.gateway.allow_origins = origins
                .split(',')
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect();
        }
        if let Some(mode) = get(ENV_MODE) {
            self.environment_mode = mode.parse()?;
        }
        if let Some(url) = get(ENV_WEBHOOK) {
            self.webhook.url = Some(url);
        }
        if let Some(name) = get(ENV_AGENT_NAME) {
            self.agent.name = name;
        }
        if let Some(db) = get(ENV_DB) {
            self.store.path = db;
        }

        self.validate()
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.model.temperature < 0.0 || self.model.temperature > 2.0 {
            return Err(ConfigError::ValidationError(
                "model.temperature must be between 0.0 and 2.0".into(),
            ));
        }
        if self.model.max_tokens == 0 {
            return Err(ConfigError::ValidationError(
                "model.max_tokens must be > 0".into(),
            ));
        }
        if self.gateway.workers == 0 {
            return Err(ConfigError::ValidationError(
                "gateway.workers must be at least 1".into(),
            ));
        }
        if self.gateway.port == 0 {
            return Err(ConfigError::ValidationError(
                "gateway.port must not be 0".into(),
            ));
        }
        if self.store.thread_ttl_days > MAX_TTL_DAYS || self.store.job_ttl_days > MAX_TTL_DAYS {
            return Err(ConfigError::ValidationError(format!(
                "store TTLs must be at most {MAX_TTL_DAYS} days"
            )));
        }
        if self.store.thread_ttl_days == 0 || self.store.job_ttl_days == 0 {
            return Err(ConfigError::ValidationError(
                "store TTLs must be at least one day".into(),
            ));
        }
        Ok(())
    }

    /// Check if an API key is available (from config or environment).
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Generate a default config TOML string (for the `config` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            environment_mode: EnvironmentMode::default(),
            model: ModelConfig::default(),
            gateway: GatewayConfig::default(),
            store: StoreConfig::default(),
            skill: SkillConfig::default(),
            agent: AgentCardConfig::default(),
            webhook: WebhookConfig::default(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert_eq!(config.gateway.port, 8000);
        assert_eq!(config.gateway.host, "0.0.0.0");
        assert_eq!(config.gateway.workers, 4);
        assert_eq!(config.store.thread_ttl_days, 30);
        assert_eq!(config.store.job_ttl_days, 7);
        assert_eq!(config.webhook.timeout_secs, 30);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn upper_cased_aliases_apply() {
        let mut config = AppConfig::default();
        config
            .apply_env(env(&[
                ("ANTHROPIC_KEY", "sk-alias"),
                ("CORS_ORIGINS", "https://a.example, https://b.example"),
                ("ENV_MODE", "prod"),
                ("APP_PORT", "9100"),
            ]))
            .unwrap();
        assert_eq!(config.api_key.as_deref(), Some("sk-alias"));
        assert_eq!(
            config.gateway.allow_origins,
            vec!["https://a.example", "https://b.example"]
        );
        assert_eq!(config.environment_mode, EnvironmentMode::Prod);
        assert_eq!(config.gateway.port, 9100);
    }

    #[test]
    fn first_aliases_and_precedence() {
        let mut config = AppConfig::default();
        config
            .apply_env(env(&[
                ("anthropic_api_key", "sk-lower"),
                ("ANTHROPIC_KEY", "sk-later"),
                ("AGENT_NAME", "Canonical"),
                ("NAME", "Alias"),
                ("WEBHOOK_URL", "http://hook"),
            ]))
            .unwrap();
        assert_eq!(config.api_key.as_deref(), Some("sk-lower"));
        assert_eq!(config.agent.name, "Canonical");
        assert_eq!(config.webhook.url.as_deref(), Some("http://hook"));
    }

    #[test]
    fn oversized_ttl_rejected() {
        let mut config = AppConfig::default();
        config.store.thread_ttl_days = u64::MAX;
        assert!(config.validate().is_err());
    }

    #[test]
    fn agent_card_advertises_payload_input() {
        let card = AgentCardConfig::default();
        let payload = card.inputs.iter().find(|f| f.name == "payload").unwrap();
        assert!(payload.required);
        assert_eq!(payload.kind, "longText");
        assert!(card.outputs.iter().any(|f| f.name == "threadId"));
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.model.name, config.model.name);
        assert_eq!(parsed.gateway.allow_origins, config.gateway.allow_origins);
        assert_eq!(parsed.store.backend, StoreBackendKind::Sqlite);
    }

    #[test]
    fn invalid_temperature_rejected() {
        let mut config = AppConfig::default();
        config.model.temperature = 5.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_workers_rejected() {
        let mut config = AppConfig::default();
        config.gateway.workers = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let config = AppConfig::load_from(Path::new("/nonexistent/fobench.toml")).unwrap();
        assert_eq!(config.environment_mode, EnvironmentMode::Dev);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fobench.toml");
        std::fs::write(
            &path,
            r#"
environment_mode = "prod"

[store]
backend = "memory"

[gateway]
port = 9100
"#,
        )
        .unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.environment_mode, EnvironmentMode::Prod);
        assert_eq!(config.store.backend, StoreBackendKind::Memory);
        assert_eq!(config.gateway.port, 9100);
        assert_eq!(config.gateway.workers, 4);
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fobench.toml");
        std::fs::write(&path, "[gateway\nport = ").unwrap();
        assert!(matches!(
            AppConfig::load_from(&path),
            Err(ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn env_overrides_apply() {
        let mut config = AppConfig::default();
        config
            .apply_env(env(&[
                ("ANTHROPIC_API_KEY", "sk-ant-test"),
                ("APP_PORT", "8080"),
                ("ALLOW_ORIGINS", "https://a.example, https://b.example"),
                ("ENVIRONMENT_MODE", "prod"),
            ]))
            .unwrap();

        assert_eq!(config.api_key.as_deref(), Some("sk-ant-test"));
        assert_eq!(config.gateway.port, 8080);
        assert_eq!(
            config.gateway.allow_origins,
            vec!["https://a.example", "https://b.example"]
        );
        assert_eq!(config.environment_mode, EnvironmentMode::Prod);
    }

    #[test]
    fn env_aliases_are_consulted_after_canonical() {
        let mut config = AppConfig::default();
        config
            .apply_env(env(&[("anthropic_key", "alias-key"), ("callback_url", "http://hook")]))
            .unwrap();
        assert_eq!(config.api_key.as_deref(), Some("alias-key"));
        assert_eq!(config.webhook.url.as_deref(), Some("http://hook"));

        let mut config = AppConfig::default();
        config
            .apply_env(env(&[("ANTHROPIC_API_KEY", "canonical"), ("anthropic_key", "alias")]))
            .unwrap();
        assert_eq!(config.api_key.as_deref(), Some("canonical"));
    }

    #[test]
    fn bad_port_env_is_rejected() {
        let mut config = AppConfig::default();
        assert!(config.apply_env(env(&[("APP_PORT", "eighty")])).is_err());
    }

    #[test]
    fn debug_output_redacts_api_key() {
        let config = AppConfig {
            api_key: Some("sk-ant-secret".into()),
            ..AppConfig::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-ant-secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn dev_mode_prefers_hot_reload_prompt() {
        let dir = tempfile::tempdir().unwrap();
        let dev_dir = dir.path().join("tmp-prompt");
        let bundled = dir.path().join("Prompt");
        std::fs::create_dir_all(&dev_dir).unwrap();
        std::fs::create_dir_all(&bundled).unwrap();
        std::fs::write(dev_dir.join("AgentPrompt.yaml"), "prompt: dev").unwrap();
        std::fs::write(bundled.join("AgentPrompt.yaml"), "prompt: bundled").unwrap();

        let skill = SkillConfig {
            dev_prompt_dir: dev_dir.clone(),
            prompt_dirs: vec![bundled.clone()],
            ..SkillConfig::default()
        };

        assert_eq!(
            skill.resolve_prompt_path(EnvironmentMode::Dev),
            Some(dev_dir.join("AgentPrompt.yaml"))
        );
        assert_eq!(
            skill.resolve_prompt_path(EnvironmentMode::Prod),
            Some(bundled.join("AgentPrompt.yaml"))
        );
    }

    #[test]
    fn skill_dir_resolution_skips_missing() {
        let dir = tempfile::tempdir().unwrap();
        let skill = SkillConfig {
            dirs: vec![dir.path().join("nope"), dir.path().to_path_buf()],
            ..SkillConfig::default()
        };
        assert_eq!(skill.resolve_skill_dir(), Some(dir.path().to_path_buf()));
    }

    #[test]
    fn default_toml_generation() {
        let toml_str = AppConfig::default_toml();
        assert!(toml_str.contains("8000"));
        assert!(toml_str.contains("claude-sonnet-4-20250514"));
    }
}
