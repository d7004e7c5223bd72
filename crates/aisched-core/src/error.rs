//! Error types for event decoding and compilation.

use thiserror::Error;

/// Result type for event operations.
pub type EventResult<T> = Result<T, EventError>;

/// Errors raised while turning a model's function call into a calendar artifact.
#[derive(Debug, Error)]
pub enum EventError {
    /// The model invoked a function this crate does not know how to compile.
    #[error("unknown function `{0}`")]
    UnknownFunction(String),

    /// The function arguments did not match the expected shape.
    #[error("malformed arguments for `{function}`: {source}")]
    MalformedArguments {
        function: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// A compact `YYYYMMDD` date that is not a real calendar date.
    #[error("invalid date `{0}`")]
    InvalidDate(String),
}

impl EventError {
    /// Creates a malformed arguments error for the given function.
    pub fn malformed(function: &'static str, source: serde_json::Error) -> Self {
        Self::MalformedArguments { function, source }
    }
}
