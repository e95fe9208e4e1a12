//! `fobench serve`: start the HTTP job API.

use fobench_config::AppConfig;

pub async fn run(port_override: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    if let Some(port) = port_override {
        config.gateway.port = port;
    }

    println!("fobench gateway");
    println!("   Listening: {}:{}", config.gateway.host, config.gateway.port);
    println!("   Workers:   {}", config.gateway.workers);
    println!("   Store:     {:?} ({})", config.store.backend, config.store.path);

    fobench_gateway::start(config).await?;

    Ok(())
}
