//! Courtside - a basketball AI chat assistant
//!
//! Chats with a completion API over a bounded, token-budgeted
//! conversation history and crunches basketball stats offline.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use courtside::cli::{self, stats::StatsCommand};
use courtside::config;

/// Courtside - your basketball AI assistant
#[derive(Parser)]
#[command(name = "courtside")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Basketball AI chat assistant", long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive chat
    Chat {
        /// Initial prompt
        prompt: Option<String>,

        /// Conversation id (random when omitted)
        #[arg(short, long)]
        session: Option<String>,

        /// Prefix answers with a summary of the conversation so far
        #[arg(long)]
        show_context: bool,
    },

    /// Ask a single question
    Ask {
        /// The question to ask
        question: String,

        /// Earlier turn to seed the conversation with, as ROLE=TEXT
        /// (repeatable; ROLE is user or assistant)
        #[arg(short, long = "turn", value_name = "ROLE=TEXT")]
        turns: Vec<String>,
    },

    /// Basketball statistics helpers
    Stats {
        #[command(subcommand)]
        command: StatsCommand,
    },

    /// Show configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Initialize configuration file
        #[arg(long)]
        init: bool,
    },

    /// Show version and system info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging; RUST_LOG overrides the verbosity flag
    let level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Config init must work even when an existing file is invalid
    if let Some(Commands::Config { init: true, .. }) = &cli.command {
        return config::init_config(cli.config.as_deref());
    }

    // Load configuration
    let config = config::load_config(cli.config.as_deref())?;

    info!("Courtside v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Some(Commands::Chat { prompt, session, show_context }) => {
            cli::chat::run(config, prompt, session, show_context).await?;
        }
        Some(Commands::Ask { question, turns }) => {
            cli::ask::run(config, &question, &turns).await?;
        }
        Some(Commands::Stats { command }) => {
            cli::stats::run(command)?;
        }
        Some(Commands::Config { show, .. }) => {
            if show {
                config::show_config(&config)?;
            }
        }
        Some(Commands::Info) => {
            cli::info::run(&config)?;
        }
        None => {
            // Default: Start interactive chat
            cli::chat::run(config, None, None, false).await?;
        }
    }

    Ok(())
}
