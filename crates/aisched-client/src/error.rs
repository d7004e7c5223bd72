//! Client error types.

use std::fmt;

use aisched_core::EventError;
use aisched_providers::ProviderError;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur in the client.
#[derive(Debug)]
pub enum ClientError {
    /// Configuration error.
    Config(String),
    /// Nothing usable was given to turn into an event.
    Input(String),
    /// Provider error, including credential problems.
    Provider(ProviderError),
    /// The model's answer could not be compiled.
    Event(EventError),
    /// IO error.
    Io(std::io::Error),
    /// Action failed (open, copy, write).
    Action(String),
}

impl ClientError {
    /// Returns true if the user must (re-)enter an API key.
    pub fn is_credential_problem(&self) -> bool {
        matches!(self, Self::Provider(e) if e.is_credential_problem())
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "configuration error: {}", msg),
            Self::Input(msg) => write!(f, "invalid input: {}", msg),
            Self::Provider(err) => write!(f, "provider error: {}", err),
            Self::Event(err) => write!(f, "event error: {}", err),
            Self::Io(err) => write!(f, "IO error: {}", err),
            Self::Action(msg) => write!(f, "action failed: {}", msg),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Provider(err) => Some(err),
            Self::Event(err) => Some(err),
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<ProviderError> for ClientError {
    fn from(err: ProviderError) -> Self {
        Self::Provider(err)
    }
}

impl From<EventError> for ClientError {
    fn from(err: EventError) -> Self {
        Self::Event(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credential_problems() {
        let missing: ClientError = ProviderError::missing_credential("no key").into();
        assert!(missing.is_credential_problem());
        let rejected: ClientError = ProviderError::invalid_credential("bad key").into();
        assert!(rejected.is_credential_problem());
    }

    #[test]
    fn other_errors_are_generic() {
        let unsupported: ClientError = ProviderError::unsupported_model("x").into();
        assert!(!unsupported.is_credential_problem());
        let date: ClientError = EventError::InvalidDate("20241399".into()).into();
        assert!(!date.is_credential_problem());
        assert!(!ClientError::Config("bad".into()).is_credential_problem());
    }

    #[test]
    fn display_wraps_provider_message() {
        let err: ClientError = ProviderError::unsupported_model("gpt-5").into();
        assert!(err.to_string().contains("Unsupported model: gpt-5"));
    }
}
