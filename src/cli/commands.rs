//! CLI command definitions using clap.
//!
//! Defines the main CLI structure and subcommands:
//! - run: execute one run cycle (the default)
//! - stream: listen for quote events
//! - fetch: populate the lyric corpus from the wiki

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// stanzabot - posts a random lyric stanza now and then
#[derive(Parser, Debug)]
#[command(name = "stanzabot")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Print to stdout instead of posting
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Post now instead of waiting for randomness
    #[arg(short, long, global = true)]
    pub force: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Main subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Execute one run cycle (the default when no subcommand is given)
    Run,

    /// Listen for quote events and queue favorites for the next cycle
    Stream,

    /// Populate the lyric corpus from the wiki
    Fetch {
        /// Override the wiki base URL
        #[arg(long)]
        base_url: Option<String>,

        /// Fetch one track by title instead of the whole discography
        #[arg(long)]
        track: Option<String>,
    },
}
