//! Command-line interface for animecat.

use clap::{Parser, Subcommand};

/// animecat - anime catalog backend
/// Serves the catalog form and its JSON API
#[derive(Parser, Debug)]
#[command(name = "animecat")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Start the HTTP server (default)
    #[command(alias = "daemon")]
    Serve,

    /// Create default config file
    Init,

    /// Load and validate the config, then exit
    CheckConfig,
}

impl Cli {
    /// The command to run, `serve` when none was given.
    #[must_use]
    pub fn command(&self) -> Commands {
        self.command.unwrap_or(Commands::Serve)
    }
}
