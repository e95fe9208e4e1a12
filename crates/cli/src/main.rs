//! fobench CLI, the main entry point.
//!
//! Commands:
//! - `serve`  - Start the HTTP job API
//! - `ask`    - Ask the benchmark agent a single question
//! - `config` - Print the default configuration (or check the current one)

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "fobench",
    about = "fobench: family-office compensation benchmark agent",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP job API
    Serve {
        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Ask the agent one question
    Ask {
        /// The question
        #[arg(short, long)]
        message: String,

        /// Extra instructions for the answer
        #[arg(short, long)]
        instructions: Option<String>,

        /// Continue an existing conversation thread
        #[arg(short, long)]
        thread: Option<String>,
    },

    /// Print the default configuration
    Config {
        /// Load and validate the active configuration instead
        #[arg(long)]
        check: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Serve { port } => commands::serve::run(port).await?,
        Commands::Ask {
            message,
            instructions,
            thread,
        } => commands::ask::run(message, instructions, thread).await?,
        Commands::Config { check: false } => commands::config_cmd::show_default(),
        Commands::Config { check: true } => commands::config_cmd::check()?,
    }

    Ok(())
}
