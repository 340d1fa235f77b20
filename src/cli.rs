//! Command-line interface for voznav
//!
//! Provides argument parsing using clap derive macros.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

use crate::commands::Role;

/// Voice-driven accessibility engine
#[derive(Parser, Debug)]
#[command(name = "voznav", version, about = "Voice-driven accessibility engine")]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Suppress output (quiet mode)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Parse a duration string such as `1.8s`, `500ms`, or a bare number of
/// seconds.
fn parse_duration(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    if let Ok(secs) = s.parse::<u64>() {
        return Ok(Duration::from_secs(secs));
    }
    humantime::parse_duration(s).map_err(|e| e.to_string())
}

/// Role selector for the command-table listing.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CliRole {
    Candidate,
    Company,
    Admin,
}

impl From<CliRole> for Role {
    fn from(role: CliRole) -> Self {
        match role {
            CliRole::Candidate => Role::Candidate,
            CliRole::Company => Role::Company,
            CliRole::Admin => Role::Admin,
        }
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the speech diagnostics routine and print the report
    Diagnose {
        /// Grace period to wait for an immediate recognition error
        #[arg(long, value_name = "DURATION", default_value = "1.8s", value_parser = parse_duration)]
        grace: Duration,

        /// Hard stop for the recognition probe
        #[arg(long, value_name = "DURATION", default_value = "5s", value_parser = parse_duration)]
        timeout: Duration,
    },

    /// Inspect or reset the persisted preference record
    Prefs {
        /// Action to perform
        #[command(subcommand)]
        action: PrefsAction,
    },

    /// List the effective voice-command table for a role
    Commands {
        /// Role whose table to show
        #[arg(long, value_name = "ROLE", value_enum, default_value = "candidate")]
        role: CliRole,
    },
}

/// Preference record actions
#[derive(Subcommand, Debug)]
pub enum PrefsAction {
    /// Print the stored record as JSON
    Show,
    /// Reset the stored record to defaults
    Reset,
    /// Print the storage file path
    Path,
}
