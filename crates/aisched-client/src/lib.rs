//! CLI, configuration, artifact sinks, action orchestration
//!
//! This crate provides the `aisched` command-line interface.

pub mod busy;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod secret;
pub mod sinks;

pub use cli::Cli;
pub use error::{ClientError, ClientResult};
pub use pipeline::{ActionSettings, Pipeline, Trigger};
