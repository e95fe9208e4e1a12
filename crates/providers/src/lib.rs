//! Language-model provider implementations for fobench.
//!
//! All providers implement the `fobench_core::Provider` trait.

pub mod anthropic;

pub use anthropic::AnthropicProvider;

use fobench_config::AppConfig;
use fobench_core::Provider;
use fobench_core::error::ProviderError;
use std::sync::Arc;
use std::time::Duration;

/// Build the configured provider.
///
/// Fails with `NotConfigured` when no API key is available, so a missing
/// key surfaces at startup rather than on the first question.
pub fn build_from_config(config: &AppConfig) -> Result<Arc<dyn Provider>, ProviderError> {
    let api_key = config
        .api_key
        .clone()
        .filter(|k| !k.trim().is_empty())
        .ok_or_else(|| ProviderError::NotConfigured("ANTHROPIC_API_KEY is not set".into()))?;

    let mut provider =
        AnthropicProvider::with_timeout(api_key, Duration::from_secs(config.model.timeout_secs))?;
    if let Some(base_url) = &config.model.base_url {
        provider = provider.with_base_url(base_url);
    }
    Ok(Arc::new(provider))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_is_not_configured() {
        let config = AppConfig::default();
        assert!(matches!(
            build_from_config(&config),
            Err(ProviderError::NotConfigured(_))
        ));
    }

    #[test]
    fn builds_anthropic_with_key() {
        let config = AppConfig {
            api_key: Some("sk-ant-test".into()),
            ..AppConfig::default()
        };
        let provider = build_from_config(&config).unwrap();
        assert_eq!(provider.name(), "anthropic");
    }
}
