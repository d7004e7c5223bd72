//! Error types for LLM provider operations.
//!
//! This module defines the errors that can occur while building a request,
//! talking to a model vendor, or parsing its response.

use std::fmt;
use thiserror::Error;

use aisched_core::EventError;

/// The category of a provider error.
///
/// Callers branch on this to decide what the user sees: credential problems
/// send the user back to key entry, everything else is a generic failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderErrorCode {
    /// No API key is configured.
    MissingCredential,
    /// The vendor rejected the API key.
    InvalidCredential,
    /// The model identifier is not in the registry.
    UnsupportedModel,
    /// Network error - connection failed, timeout, DNS resolution, etc.
    NetworkError,
    /// The vendor returned an error object other than a credential rejection.
    ServerError,
    /// The response could not be turned into a normalized event.
    InvalidResponse,
    /// Internal error - unexpected state, bug.
    InternalError,
}

impl ProviderErrorCode {
    /// Returns true if the user must (re-)enter an API key.
    pub fn is_credential_problem(&self) -> bool {
        matches!(self, Self::MissingCredential | Self::InvalidCredential)
    }

    /// Returns a machine-readable name for this error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingCredential => "missing_credential",
            Self::InvalidCredential => "invalid_credential",
            Self::UnsupportedModel => "unsupported_model",
            Self::NetworkError => "network_error",
            Self::ServerError => "server_error",
            Self::InvalidResponse => "invalid_response",
            Self::InternalError => "internal_error",
        }
    }
}

impl fmt::Display for ProviderErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An error that occurred while interacting with an LLM provider.
#[derive(Debug, Error)]
pub struct ProviderError {
    /// The error code categorizing this error.
    code: ProviderErrorCode,
    /// A human-readable message describing the error.
    message: String,
    /// The adapter family that generated this error (e.g., "openai", "gemini").
    provider: Option<String>,
    /// The underlying cause of this error, if any.
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl ProviderError {
    /// Creates a new provider error with the given code and message.
    pub fn new(code: ProviderErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            provider: None,
            source: None,
        }
    }

    /// Creates a missing credential error.
    pub fn missing_credential(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::MissingCredential, message)
    }

    /// Creates an invalid credential error.
    pub fn invalid_credential(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::InvalidCredential, message)
    }

    /// Creates an unsupported model error.
    pub fn unsupported_model(model: &str) -> Self {
        Self::new(
            ProviderErrorCode::UnsupportedModel,
            format!("Unsupported model: {}", model),
        )
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::NetworkError, message)
    }

    /// Creates a server error.
    pub fn server(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::ServerError, message)
    }

    /// Creates an invalid response error.
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::InvalidResponse, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::InternalError, message)
    }

    /// Sets the provider name for this error.
    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    /// Sets the source error for this error.
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    /// Returns the error code.
    pub fn code(&self) -> ProviderErrorCode {
        self.code
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the provider name, if set.
    pub fn provider(&self) -> Option<&str> {
        self.provider.as_deref()
    }

    /// Returns true if the user must (re-)enter an API key.
    pub fn is_credential_problem(&self) -> bool {
        self.code.is_credential_problem()
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref provider) = self.provider {
            write!(f, "[{}] ", provider)?;
        }
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl From<EventError> for ProviderError {
    fn from(err: EventError) -> Self {
        Self::invalid_response(err.to_string()).with_source(err)
    }
}

/// A specialized Result type for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credential_codes() {
        assert!(ProviderErrorCode::MissingCredential.is_credential_problem());
        assert!(ProviderErrorCode::InvalidCredential.is_credential_problem());
        assert!(!ProviderErrorCode::UnsupportedModel.is_credential_problem());
        assert!(!ProviderErrorCode::NetworkError.is_credential_problem());
        assert!(!ProviderErrorCode::ServerError.is_credential_problem());
    }

    #[test]
    fn error_code_display() {
        assert_eq!(
            ProviderErrorCode::InvalidCredential.as_str(),
            "invalid_credential"
        );
        assert_eq!(ProviderErrorCode::UnsupportedModel.to_string(), "unsupported_model");
    }

    #[test]
    fn unsupported_model_message() {
        let err = ProviderError::unsupported_model("gpt-5");
        assert_eq!(err.code(), ProviderErrorCode::UnsupportedModel);
        assert_eq!(err.message(), "Unsupported model: gpt-5");
    }

    #[test]
    fn provider_error_display() {
        let err = ProviderError::invalid_credential("API key rejected").with_provider("gemini");
        let display = format!("{}", err);
        assert!(display.contains("[gemini]"));
        assert!(display.contains("invalid_credential"));
        assert!(display.contains("API key rejected"));
    }

    #[test]
    fn event_error_becomes_invalid_response() {
        use std::error::Error;
        let err: ProviderError = EventError::UnknownFunction("nope".into()).into();
        assert_eq!(err.code(), ProviderErrorCode::InvalidResponse);
        assert!(err.message().contains("nope"));
        assert!(err.source().is_some());
    }
}
