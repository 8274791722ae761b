//! Docuchat CLI entry point.
//!
//! Binary name: `docuchat`
//!
//! Parses CLI arguments, sets up tracing, builds the session, then
//! dispatches to the interactive chat loop or the one-shot `ask` command.

mod cli;
mod state;

use clap::Parser;

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = docuchat_observe::tracing_setup::verbosity_filter(cli.verbose, cli.quiet);
    docuchat_observe::tracing_setup::init_tracing(filter, cli.otel)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let result = run(cli).await;

    docuchat_observe::tracing_setup::shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let state = AppState::init(cli.config.as_deref()).await?;

    match cli.command {
        Commands::Chat { file } => {
            cli::chat::loop_runner::run_chat_loop(&state, file.as_deref()).await?;
        }
        Commands::Ask { file, prompt, json } => {
            cli::ask::ask(&state, &file, &prompt, json).await?;
        }
    }

    Ok(())
}
