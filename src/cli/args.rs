//! CLI argument definitions using clap
//!
//! Commands:
//! - launchboard serve --config <path>
//! - launchboard tick --config <path>
//! - launchboard weeks --config <path> [--plan premium]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// launchboard - weekly launch competitions with community voting
#[derive(Parser, Debug)]
#[command(name = "launchboard")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve JSON requests on stdin/stdout with the scheduler running
    Serve {
        /// Path to configuration file
        #[arg(long, default_value = "./launchboard.json")]
        config: PathBuf,
    },

    /// Run one scheduler maintenance pass and exit
    Tick {
        /// Path to configuration file
        #[arg(long, default_value = "./launchboard.json")]
        config: PathBuf,
    },

    /// Print upcoming weeks and their remaining capacity
    Weeks {
        /// Path to configuration file
        #[arg(long, default_value = "./launchboard.json")]
        config: PathBuf,

        /// Plan tier to compute capacity for
        #[arg(long, default_value = "standard")]
        plan: String,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
