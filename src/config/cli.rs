//! CLI argument parsing using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// alertmanager-relay: forward alert events to AlertManager
///
/// Translates alert events into AlertManager's label/annotation format and
/// posts them to the configured endpoint. Payloads that cannot be delivered
/// are written to the retry folder.
#[derive(Debug, Parser)]
#[command(name = "alertmanager-relay")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run (defaults to `check`)
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to configuration file
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// AlertManager endpoint URL
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// Folder receiving payloads that could not be delivered
    #[arg(long = "retry-folder", value_name = "DIR", global = true)]
    pub retry_folder: Option<String>,

    /// Enable the service (a config file cannot be overridden to disabled)
    #[arg(long, global = true)]
    pub enable: bool,

    /// Enable verbose logging
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

/// Subcommands for alertmanager-relay
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Generate a default configuration file
    Init {
        /// Output path for the configuration file
        #[arg(long, short, default_value = super::defaults::CONFIG_FILE)]
        output: PathBuf,
    },

    /// Validate the configuration and print it
    Check,

    /// Send a synthetic empty alert to the configured endpoint
    Test {
        /// Message recorded in the test options (not part of the payload)
        #[arg(long)]
        message: Option<String>,
    },

    /// Send one alert event read as JSON from a file or stdin
    Send {
        /// Event file (reads stdin when omitted)
        #[arg(long, short)]
        event: Option<PathBuf>,
    },
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parses CLI arguments from an iterator (useful for testing).
    pub fn parse_from_iter<I, T>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(iter)
    }
}
