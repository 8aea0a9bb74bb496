//! CLI interface for studyflow.

pub mod handlers;
pub mod output;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use output::OutputMode;

/// studyflow - Pick, parameterize and run educational tools for a tutoring chat
#[derive(Parser)]
#[command(name = "studyflow", version, about, long_about = None)]
pub struct Cli {
    /// Override data directory (default: ~/.studyflow)
    #[arg(long, env = "STUDYFLOW_DATA_PATH", global = true)]
    pub data_path: Option<PathBuf>,

    /// Output as JSON instead of human-readable format
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Inputs shared by `orchestrate` and `analyze`.
#[derive(Args, Debug, Clone)]
pub struct RequestArgs {
    /// The student's current message
    pub message: String,

    /// Teaching style: direct, socratic, visual, flipped_classroom
    #[arg(long, default_value = "direct")]
    pub style: String,

    /// Student profile file (YAML or JSON)
    #[arg(long)]
    pub profile: Option<PathBuf>,

    /// Prior conversation turns (YAML or JSON list)
    #[arg(long)]
    pub history: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Select, parameterize and run tools for a message
    Orchestrate(RequestArgs),

    /// Show tool selection and parameters without running any tool
    Analyze(RequestArgs),

    /// List the available tools and their parameters
    Tools,

    /// Probe configured tool backends
    Health,

    /// Language-model settings and connectivity
    Llm {
        #[command(subcommand)]
        command: LlmCommands,
    },

    /// Show the effective configuration
    Config,
}

#[derive(Subcommand)]
pub enum LlmCommands {
    /// Show the configured model
    Info,
    /// Send a test prompt to the model
    Test,
}

pub async fn execute(
    command: &Commands,
    ctx: &crate::init::AppContext,
    mode: OutputMode,
) -> anyhow::Result<()> {
    match command {
        Commands::Orchestrate(args) => handlers::request::handle_orchestrate(ctx, args, mode).await?,
        Commands::Analyze(args) => handlers::request::handle_analyze(ctx, args, mode).await?,
        Commands::Tools => handlers::system::handle_tools(mode)?,
        Commands::Health => handlers::system::handle_health(ctx, mode).await?,
        Commands::Llm { command } => match command {
            LlmCommands::Info => handlers::system::handle_llm_info(ctx, mode)?,
            LlmCommands::Test => handlers::system::handle_llm_test(ctx, mode).await?,
        },
        Commands::Config => handlers::system::handle_config(ctx, mode)?,
    }

    Ok(())
}
