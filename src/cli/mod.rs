//! Command-line interface for supercheck.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **find**: Find callsigns that partially match a string
//! - **update**: Refresh the local copy of the Super Check Partial database
//!
//! ## Usage
//!
//! ```text
//! # Find callsigns in the local MASTER.SCP, refreshed automatically
//! supercheck find dneo
//!
//! # Use a call history file and show the exchange next to each callsign
//! supercheck find -c WAG.txt --field Exch1 dney
//!
//! # Best match last, one callsign per line
//! supercheck find dneo --lines --reverse
//!
//! # JSON output with scores and alignments
//! supercheck --format json find dneo
//!
//! # Download a fresh MASTER.SCP
//! supercheck update
//! ```

use clap::{Parser, Subcommand};

pub mod find;
pub mod update;

#[derive(Parser)]
#[command(name = "supercheck")]
#[command(version)]
#[command(about = "Find callsigns that partially match a noisy copy")]
#[command(
    long_about = "supercheck uses the Super Check Partial callsign database from http://www.supercheckpartial.com/ to find callsigns that are similar to a given string.\n\nInstead of the Super Check Partial database, it can also use N1MM Logger+ call history files and show their fields next to the callsigns.\n\nThe local copy of MASTER.SCP is stored in ~/.config/hamradio and updated automatically when a newer version is available."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Find callsigns that partially match the given string
    Find(find::FindArgs),

    /// Update the local copy of the Super Check Partial database
    Update(update::UpdateArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}
