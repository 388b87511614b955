//! CLI command definitions and parsing
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "ragindex",
    version,
    author = "neur0map",
    about = "Build and query a persisted vector index for retrieval-augmented QA",
    long_about = "ragindex splits source documents into overlapping chunks, embeds them and keeps \
                  them in an incrementally updated vector index. Questions are answered from the \
                  chunks closest to them, optionally through a local language model."
)]
pub struct Cli {
    /// Global config file path (defaults to ~/.config/ragindex/config.toml)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Configuration profile to apply
    #[arg(short, long, global = true)]
    pub profile: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add new document chunks to the index
    Build {
        /// Source directory (defaults to paths.data_dir)
        #[arg(short, long, value_name = "DIR")]
        source: Option<PathBuf>,

        /// Index location (defaults to paths.index_dir)
        #[arg(short, long, value_name = "DIR")]
        index: Option<PathBuf>,

        /// Delete the existing index before building
        #[arg(long)]
        reset: bool,
    },

    /// Show the chunks closest to a question
    Query {
        /// Question text
        question: String,

        /// Number of chunks to retrieve (defaults to retrieval.top_k)
        #[arg(short, long)]
        k: Option<usize>,

        /// Index location (defaults to paths.index_dir)
        #[arg(short, long, value_name = "DIR")]
        index: Option<PathBuf>,

        /// Show results in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Answer a question from retrieved context using the configured LLM
    Ask {
        /// Question to ask
        question: String,

        /// Number of context chunks to retrieve (defaults to retrieval.top_k)
        #[arg(short, long)]
        k: Option<usize>,

        /// Index location (defaults to paths.index_dir)
        #[arg(short, long, value_name = "DIR")]
        index: Option<PathBuf>,
    },

    /// Show index statistics
    Status {
        /// Index location (defaults to paths.index_dir)
        #[arg(short, long, value_name = "DIR")]
        index: Option<PathBuf>,

        /// Show status in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Validate configuration file
    Validate {
        /// Path to config file (defaults to standard location)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Initialize default configuration
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

impl Cli {
    /// Parse CLI arguments from command line
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
