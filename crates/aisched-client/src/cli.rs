//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use aisched_providers::Mode;

use crate::sinks::LinkHandling;

/// aisched - Turn selected text into a calendar event
#[derive(Debug, Parser)]
#[command(name = "aisched")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "AISCHED_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v')]
    pub debug: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,

    /// Log filter directive, e.g. `aisched_providers=trace` (overrides RUST_LOG)
    #[arg(long, value_name = "DIRECTIVE")]
    pub log_filter: Option<String>,

    // --- Trigger ---
    /// Text describing the event (read from stdin when omitted)
    #[arg(long, short)]
    pub text: Option<String>,

    /// Page the text came from, linked from the event description
    #[arg(long, default_value = "")]
    pub page_url: String,

    // --- Overrides ---
    /// Model to use (overrides config)
    #[arg(long, short)]
    pub model: Option<String>,

    /// What to produce: newTab, ical or auto (overrides config)
    #[arg(long)]
    pub mode: Option<Mode>,

    /// Directory for calendar files (overrides config)
    #[arg(long)]
    pub download_dir: Option<PathBuf>,

    // --- Link handling ---
    /// Copy the calendar link to the clipboard instead of opening it
    #[arg(long, group = "link_handling")]
    pub copy: bool,

    /// Only print the calendar link, or a calendar file as a `data:` URL
    #[arg(long, group = "link_handling")]
    pub print: bool,

    /// Do not show desktop notifications
    #[arg(long)]
    pub no_notify: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Returns what to do with a calendar link based on CLI flags.
    pub fn link_handling(&self) -> LinkHandling {
        if self.copy {
            LinkHandling::Copy
        } else if self.print {
            LinkHandling::Print
        } else {
            LinkHandling::Open
        }
    }
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// List supported models
    Models,
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Dump current configuration (API key masked)
    Dump,

    /// Validate configuration
    Validate,

    /// Show configuration file path
    Path,

    /// Store the API key (read from stdin when omitted)
    SetKey {
        /// API key, or a `pass::` / `env::` reference
        key: Option<String>,
    },

    /// Set a configuration value, e.g. `model gpt-4o` or `http.timeout 30`
    Set {
        /// Dotted key
        key: String,
        /// New value
        value: String,
    },
}
