//! ProviderAdapter trait definition.
//!
//! An adapter translates between the normalized request/response shapes and
//! one vendor's chat-completion wire format. Adapters never do I/O: `build`
//! produces a [`ProviderRequest`] for a [`crate::Transport`] and `parse`
//! consumes the JSON body it returned.

use serde_json::Value;

use aisched_core::NormalizedResponse;

use crate::error::{ProviderError, ProviderResult};
use crate::request::{ProviderRequest, RequestParams};

/// Translates normalized requests and responses for one vendor family.
pub trait ProviderAdapter: Send + Sync {
    /// Returns the adapter family name (e.g., "openai", "gemini").
    fn name(&self) -> &'static str;

    /// Builds the vendor request for `params`.
    fn build(&self, params: &RequestParams, api_key: &str, model: &str) -> ProviderRequest;

    /// Parses a vendor response body.
    ///
    /// # Errors
    ///
    /// - `InvalidCredential` if the body matches a credential rejection
    /// - `ServerError` for any other vendor error object
    /// - `InvalidResponse` if no function call can be extracted
    fn parse(&self, body: &Value) -> ProviderResult<NormalizedResponse>;
}

/// Returns true if `body` carries one of the known credential rejections.
///
/// Signatures are checked regardless of which vendor sent the body:
/// `error.type == "invalid_request_error"`,
/// `error.details[0].reason == "API_KEY_INVALID"` and `error.code == 403`.
pub fn is_credential_rejection(body: &Value) -> bool {
    let Some(error) = vendor_error(body) else {
        return false;
    };

    let invalid_request = error.get("type").and_then(Value::as_str) == Some("invalid_request_error");
    let key_invalid = error
        .pointer("/details/0/reason")
        .and_then(Value::as_str)
        == Some("API_KEY_INVALID");
    let forbidden = error.get("code").and_then(Value::as_i64) == Some(403);

    invalid_request || key_invalid || forbidden
}

/// Fails if `body` is a vendor error object.
///
/// Run by every adapter before looking for a function call.
pub fn check_vendor_error(body: &Value, provider: &str) -> ProviderResult<()> {
    let Some(error) = vendor_error(body) else {
        return Ok(());
    };

    let message = vendor_message(error);
    if is_credential_rejection(body) {
        return Err(ProviderError::invalid_credential(message).with_provider(provider));
    }
    Err(ProviderError::server(message).with_provider(provider))
}

/// Returns the `error` member of `body`, ignoring an explicit `null`.
pub(crate) fn vendor_error(body: &Value) -> Option<&Value> {
    body.get("error").filter(|e| !e.is_null())
}

fn vendor_message(error: &Value) -> String {
    error
        .get("message")
        .and_then(Value::as_str)
        .or_else(|| error.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| error.to_string())
}
