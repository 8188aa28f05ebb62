//! CLI module for stanzabot - command-line interface and subcommands.
//!
//! Provides the main entry point with subcommands for the run cycle,
//! streaming mode, and corpus fetching.

pub mod commands;

pub use commands::Cli;
