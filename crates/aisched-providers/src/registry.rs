//! Model registry and request dispatch.
//!
//! The registry is a closed, static table from model identifier to adapter
//! family. Lookups are exact and case-sensitive; an unknown model is an
//! error, never a fallback to some default adapter.

use serde_json::Value;
use tracing::{debug, info};

use aisched_core::NormalizedResponse;

use crate::adapter::ProviderAdapter;
use crate::error::{ProviderError, ProviderResult};
use crate::gemini::GeminiAdapter;
use crate::openai::OpenAiAdapter;
use crate::request::{ProviderRequest, RequestParams};
use crate::transport::Transport;

/// Model used when the configuration names none.
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Adapter family a model belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdapterFamily {
    /// OpenAI chat completions.
    OpenAi,
    /// Gemini generateContent.
    Gemini,
}

impl AdapterFamily {
    /// Returns the adapter for this family.
    pub fn adapter(self) -> &'static dyn ProviderAdapter {
        match self {
            Self::OpenAi => &OpenAiAdapter,
            Self::Gemini => &GeminiAdapter,
        }
    }
}

static REGISTRY: &[(&str, AdapterFamily)] = &[
    ("gpt-3.5-turbo", AdapterFamily::OpenAi),
    ("gpt-4o-mini", AdapterFamily::OpenAi),
    ("gpt-4o", AdapterFamily::OpenAi),
    ("gemini-pro", AdapterFamily::Gemini),
    ("gemini-1.5-flash-latest", AdapterFamily::Gemini),
];

/// Returns every registered model with its family, in registry order.
pub fn supported_models() -> impl Iterator<Item = (&'static str, AdapterFamily)> {
    REGISTRY.iter().copied()
}

/// Returns the adapter family of `model`.
///
/// # Errors
///
/// Returns `UnsupportedModel` if `model` is not registered.
pub fn family(model: &str) -> ProviderResult<AdapterFamily> {
    REGISTRY
        .iter()
        .find(|(name, _)| *name == model)
        .map(|(_, family)| *family)
        .ok_or_else(|| ProviderError::unsupported_model(model))
}

/// Returns the adapter serving `model`.
///
/// # Errors
///
/// Returns `UnsupportedModel` if `model` is not registered.
pub fn resolve(model: &str) -> ProviderResult<&'static dyn ProviderAdapter> {
    family(model).map(AdapterFamily::adapter)
}

/// Builds the vendor request for `model`.
pub fn build_request(
    params: &RequestParams,
    api_key: &str,
    model: &str,
) -> ProviderResult<ProviderRequest> {
    let adapter = resolve(model)?;
    Ok(adapter.build(params, api_key, model))
}

/// Parses a vendor response for `model`.
pub fn parse_response(body: &Value, model: &str) -> ProviderResult<NormalizedResponse> {
    resolve(model)?.parse(body)
}

/// Builds, sends and parses one request. No retries.
pub async fn execute(
    transport: &dyn Transport,
    params: &RequestParams,
    api_key: &str,
    model: &str,
) -> ProviderResult<NormalizedResponse> {
    let adapter = resolve(model)?;
    let request = adapter.build(params, api_key, model);
    debug!(body = %request.options.body, "request body");

    let body = transport.send(&request).await?;
    let response = adapter.parse(&body)?;
    info!(
        provider = adapter.name(),
        function = response.function_used().as_str(),
        "model responded"
    );
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderErrorCode;
    use crate::mode::{Mode, select};
    use crate::transport::BoxFuture;
    use chrono::NaiveDate;
    use serde_json::json;
    use std::sync::Mutex;

    struct CannedTransport {
        body: Value,
        seen: Mutex<Vec<String>>,
    }

    impl CannedTransport {
        fn new(body: Value) -> Self {
            Self {
                body,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl Transport for CannedTransport {
        fn send<'a>(&'a self, request: &'a ProviderRequest) -> BoxFuture<'a, ProviderResult<Value>> {
            self.seen.lock().unwrap().push(request.endpoint.clone());
            let body = self.body.clone();
            Box::pin(async move { Ok(body) })
        }
    }

    fn params() -> RequestParams {
        select("x", Mode::NewTab, NaiveDate::from_ymd_opt(2024, 6, 3).unwrap())
    }

    #[test]
    fn every_registered_model_resolves() {
        for (model, family) in supported_models() {
            let adapter = resolve(model).unwrap();
            let expected = match family {
                AdapterFamily::OpenAi => "openai",
                AdapterFamily::Gemini => "gemini",
            };
            assert_eq!(adapter.name(), expected, "{model}");
        }
        assert_eq!(supported_models().count(), 5);
    }

    #[test]
    fn default_model_is_registered() {
        assert_eq!(family(DEFAULT_MODEL).unwrap(), AdapterFamily::OpenAi);
    }

    #[test]
    fn lookup_is_exact() {
        for model in ["GPT-4o", "gpt-4", "gemini", " gpt-4o", ""] {
            let err = resolve(model).err().unwrap();
            assert_eq!(err.code(), ProviderErrorCode::UnsupportedModel, "{model:?}");
        }
    }

    #[test]
    fn build_request_rejects_unknown_model() {
        let err = build_request(&params(), "k", "claude").unwrap_err();
        assert_eq!(err.message(), "Unsupported model: claude");
    }

    #[test]
    fn build_request_dispatches_by_family() {
        let openai = build_request(&params(), "k", "gpt-4o-mini").unwrap();
        assert!(openai.endpoint.starts_with("https://api.openai.com/"));
        let gemini = build_request(&params(), "k", "gemini-1.5-flash-latest").unwrap();
        assert!(gemini.endpoint.contains("gemini-1.5-flash-latest:generateContent"));
    }

    #[test]
    fn parse_response_rejects_unknown_model() {
        let err = parse_response(&json!({}), "llama").unwrap_err();
        assert_eq!(err.code(), ProviderErrorCode::UnsupportedModel);
    }

    #[tokio::test]
    async fn execute_round_trip() {
        let transport = CannedTransport::new(json!({
            "candidates": [{ "content": { "parts": [{
                "functionCall": { "name": "get_event_information", "args": { "title": "Lunch", "start_date": "20240604" } }
            }] } }]
        }));
        let response = execute(&transport, &params(), "k", "gemini-pro").await.unwrap();
        assert_eq!(
            response.function_used(),
            aisched_core::FunctionUsed::GetEventInformation
        );
        assert_eq!(transport.seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn execute_unknown_model_sends_nothing() {
        let transport = CannedTransport::new(json!({}));
        let err = execute(&transport, &params(), "k", "gpt-5").await.unwrap_err();
        assert_eq!(err.code(), ProviderErrorCode::UnsupportedModel);
        assert!(transport.seen.lock().unwrap().is_empty());
    }
}
