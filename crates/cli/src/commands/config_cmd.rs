//! `fobench config`: print or check configuration.

use fobench_config::AppConfig;

pub fn show_default() {
    println!("{}", AppConfig::default_toml());
}

/// Load the active configuration, report problems, and print it with the
/// API key withheld.
pub fn check() -> Result<(), Box<dyn std::error::Error>> {
    println!("Validating configuration...");

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            println!("   Config error: {e}");
            return Err(e.into());
        }
    };
    println!("   Config parsed successfully");

    let mut warnings = Vec::new();
    if !config.has_api_key() {
        warnings.push("No API key set (set ANTHROPIC_API_KEY)".to_string());
    }
    if config.skill.resolve_skill_dir().is_none() {
        warnings.push("No skill directory found; answers will carry no reference data".to_string());
    }
    if config.agent.card_path.as_ref().is_some_and(|p| !p.exists()) {
        warnings.push("agent.card_path does not exist; /discover will fail".to_string());
    }
    for w in &warnings {
        println!("   warning: {w}");
    }

    println!();
    println!("{}", redacted_toml(&config)?);
    Ok(())
}

fn redacted_toml(config: &AppConfig) -> Result<String, toml::ser::Error> {
    let mut shown = config.clone();
    shown.api_key = None;
    toml::to_string_pretty(&shown)
}
