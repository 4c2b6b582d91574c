//! CLI commands and argument parsing

use crate::config::TOKEN_ENV_VAR;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Listing feed CLI
#[derive(Parser, Debug)]
#[command(name = "listing-feed")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Feed configuration file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Search endpoint (overrides the config file)
    #[arg(short, long, global = true)]
    pub endpoint: Option<String>,

    /// Bearer credential (overrides the config file)
    #[arg(long, global = true, env = TOKEN_ENV_VAR, hide_env_values = true)]
    pub token: Option<String>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch a single page of listings
    Fetch {
        /// Cursor to fetch below (empty = first page)
        #[arg(long, default_value = "")]
        cursor: String,

        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Load the feed page by page until it is exhausted
    Browse {
        /// Maximum number of pages to load (0 = until exhausted)
        #[arg(long, default_value = "0")]
        pages: usize,

        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Show the effective configuration
    Config,
}

/// Filter overrides
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Category filter (repeatable)
    #[arg(long = "category")]
    pub categories: Vec<String>,

    /// Free-text search
    #[arg(long)]
    pub search: Option<String>,

    /// Sort key
    #[arg(long)]
    pub sort: Option<String>,

    /// Minimum price
    #[arg(long)]
    pub min: Option<String>,

    /// Maximum price
    #[arg(long)]
    pub max: Option<String>,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one listing per line)
    Json,
    /// Human-readable output
    Pretty,
}
