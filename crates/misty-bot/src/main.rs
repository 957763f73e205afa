//! Misty volume bot - Entry Point
//!
//! `serve` (default) runs the dashboard; `start` runs the bot until Ctrl-C;
//! `stop` stops the bot in this process.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;

use misty_bot::{AppConfig, Application};

/// Misty volume bot
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (can also be set via MISTY_CONFIG env var)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// Run the dashboard and control API
    Serve,
    /// Start the bot and run until Ctrl-C
    Start,
    /// Stop the bot
    Stop,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = AppConfig::resolve_path(args.config);
    let config = AppConfig::load(&config_path)?;

    let logs = misty_telemetry::init_logging(&config.telemetry)?;
    info!("Starting Misty bot v{}", env!("CARGO_PKG_VERSION"));
    info!(
        config_path = %config_path,
        port = config.dashboard.port,
        rollback_on_failure = config.lifecycle.rollback_on_failure,
        "Configuration loaded"
    );

    let app = Application::new(config, Some(logs));

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => app.serve().await?,
        Command::Start => app.run().await?,
        Command::Stop => {
            let before = app.stop().await?;
            info!(state_before = %before, "Stop command completed (bot runs in-process only)");
        }
    }

    Ok(())
}
