//! Selene CLI: a thin harness over the context engine.
//!
//! Commands:
//! - `chunk`: Split a document into retrievable chunks
//! - `render`: Assemble notes and threads under a use-case budget
//! - `history`: Compress a conversation transcript
//! - `config`: Show the effective configuration

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use selene_core::UseCase;

mod commands;

#[derive(Parser)]
#[command(
    name = "selene",
    about = "Selene — context assembly and retrieval engine",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file to use instead of ~/.selene/context.toml
    #[arg(short, long, global = true, env = "SELENE_CONTEXT_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Split a text file into chunks and print them as JSON
    Chunk {
        /// Document to split
        file: PathBuf,

        /// Document id recorded on each chunk (defaults to the file stem)
        #[arg(long)]
        document_id: Option<String>,
    },

    /// Assemble a JSON list of notes and threads into prompt context
    Render {
        /// JSON array of entities, each tagged with "kind": "note" | "thread"
        file: PathBuf,

        /// Use-case whose token budget applies
        #[arg(short, long, default_value = "briefing")]
        use_case: UseCase,

        /// Print the text together with assembly stats as JSON
        #[arg(long)]
        json: bool,
    },

    /// Compress a JSON list of chat messages
    History {
        /// JSON array of messages ({"role": ..., "content": ...})
        file: PathBuf,

        /// Turns kept verbatim (overrides config)
        #[arg(long)]
        recent_turns: Option<usize>,

        /// Token budget for the whole history (overrides config)
        #[arg(long)]
        budget: Option<usize>,
    },

    /// Show configuration
    Config {
        /// Print the built-in defaults instead of the effective config
        #[arg(long)]
        defaults: bool,

        /// Print the default config file path
        #[arg(long)]
        path: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = cli.config.as_deref();
    match cli.command {
        Commands::Chunk { file, document_id } => commands::chunk::run(config, &file, document_id)?,
        Commands::Render {
            file,
            use_case,
            json,
        } => commands::render::run(config, &file, use_case, json)?,
        Commands::History {
            file,
            recent_turns,
            budget,
        } => commands::history::run(config, &file, recent_turns, budget)?,
        Commands::Config { defaults, path } => commands::config_cmd::run(config, defaults, path)?,
    }

    Ok(())
}
