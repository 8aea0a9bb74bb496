//! studyflow - Educational tool orchestration for tutoring chats
//!
//! Usage:
//!   studyflow orchestrate "Make flashcards for Spanish vocabulary"
//!   studyflow analyze "Explain photosynthesis" --style visual
//!   studyflow tools                  List tools and parameters
//!   studyflow health                 Probe configured tool backends
//!   studyflow llm test               Check the language-model connection
//!   studyflow --help                 Show all commands

use anyhow::Result;
use clap::Parser;

use studyflow::cli::output::OutputMode;
use studyflow::cli::Cli;
use studyflow::init::AppContext;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Tracing to stderr so --json output stays clean
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("studyflow=info".parse()?),
        )
        .init();

    let mode = OutputMode::from_json_flag(cli.json);
    let ctx = AppContext::new(cli.data_path.clone())?;
    studyflow::cli::execute(&cli.command, &ctx, mode).await?;

    Ok(())
}
