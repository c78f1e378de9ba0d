//! CLI argument definitions using clap.
//!
//! Commands:
//! - atlasd init --config <path>
//! - atlasd serve --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// atlasd - a small, strict, self-hostable world-data CRUD service
#[derive(Parser, Debug)]
#[command(name = "atlasd")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Initialize the data directory
    Init {
        /// Path to configuration file
        #[arg(long, default_value = "./atlasd.json")]
        config: PathBuf,
    },

    /// Start the HTTP server
    Serve {
        /// Path to configuration file
        #[arg(long, default_value = "./atlasd.json")]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
