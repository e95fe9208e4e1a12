//! `fobench ask`: answer one question from the command line.

use fobench_config::AppConfig;
use fobench_gateway::AppState;

pub async fn run(
    message: String,
    instructions: Option<String>,
    thread: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    if !config.has_api_key() {
        eprintln!();
        eprintln!("  ERROR: No API key configured!");
        eprintln!();
        eprintln!("  Set the environment variable:");
        eprintln!("    export ANTHROPIC_API_KEY='sk-ant-...'");
        eprintln!();
        eprintln!("  Or add `api_key` to fobench.toml.");
        eprintln!();
        return Err("No API key found. See above for setup instructions.".into());
    }

    let state = AppState::from_config(&config).await?;
    let reply = state
        .orchestrator
        .respond(&message, instructions.as_deref(), thread.as_deref())
        .await?;

    println!("{}", reply.answer);
    println!();
    println!("Explanation: {}", reply.explanation);
    println!("Thread:      {}", reply.thread_id);
    if !reply.documents.is_empty() {
        println!("Documents:   {}", reply.documents.join(", "));
    }
    tracing::debug!(
        model = %reply.model,
        input_tokens = reply.usage.input_tokens,
        output_tokens = reply.usage.output_tokens,
        "Usage"
    );

    Ok(())
}
