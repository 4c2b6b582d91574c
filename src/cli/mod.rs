//! CLI module
//!
//! Command-line interface acting as a headless presentation layer.
//!
//! # Commands
//!
//! - `fetch` - Fetch a single page below a cursor
//! - `browse` - Drive the feed controller page by page
//! - `config` - Show the effective configuration

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
