//! Gemini `generateContent` adapter.

use serde_json::{Map, Value, json};
use tracing::debug;
use url::form_urlencoded;

use aisched_core::NormalizedResponse;

use crate::adapter::{ProviderAdapter, check_vendor_error};
use crate::error::{ProviderError, ProviderResult};
use crate::request::{FunctionChoice, ProviderRequest, RequestParams};

/// Base URL for model endpoints.
pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

const PROVIDER: &str = "gemini";

/// Adapter for Gemini function calling.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeminiAdapter;

impl GeminiAdapter {
    /// Returns the `generateContent` endpoint for `model`, keyed by query parameter.
    pub fn endpoint(model: &str, api_key: &str) -> String {
        let key: String = form_urlencoded::byte_serialize(api_key.as_bytes()).collect();
        format!("{}/{}:generateContent?key={}", GEMINI_API_BASE, model, key)
    }

    fn function_declarations(params: &RequestParams) -> Vec<Value> {
        params
            .functions
            .iter()
            .map(|f| {
                json!({
                    "name": f.name(),
                    "description": f.description,
                    "parameters": uppercase_schema_types(&f.parameters),
                })
            })
            .collect()
    }

    fn function_calling_config(choice: FunctionChoice) -> Value {
        match choice {
            FunctionChoice::Auto => json!({ "mode": "AUTO" }),
            FunctionChoice::Required(function) => json!({
                "mode": "ANY",
                "allowed_function_names": [function.as_str()],
            }),
        }
    }
}

/// Gemini expects OpenAPI type names in upper case (`OBJECT`, `STRING`, ...).
fn uppercase_schema_types(schema: &Value) -> Value {
    match schema {
        Value::Object(map) => {
            let converted: Map<String, Value> = map
                .iter()
                .map(|(key, value)| {
                    let value = match (key.as_str(), value) {
                        ("type", Value::String(t)) => Value::String(t.to_ascii_uppercase()),
                        _ => uppercase_schema_types(value),
                    };
                    (key.clone(), value)
                })
                .collect();
            Value::Object(converted)
        }
        Value::Array(items) => Value::Array(items.iter().map(uppercase_schema_types).collect()),
        other => other.clone(),
    }
}

impl ProviderAdapter for GeminiAdapter {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    fn build(&self, params: &RequestParams, api_key: &str, model: &str) -> ProviderRequest {
        let body = json!({
            "contents": [{
                "role": "user",
                "parts": [
                    { "text": params.system_prompt },
                    { "text": params.user_text },
                ]
            }],
            "tools": [{
                "function_declarations": Self::function_declarations(params),
            }],
            "tool_config": {
                "function_calling_config": Self::function_calling_config(params.choice),
            },
        });

        ProviderRequest::post_json(Self::endpoint(model, api_key), body)
    }

    fn parse(&self, body: &Value) -> ProviderResult<NormalizedResponse> {
        check_vendor_error(body, PROVIDER)?;

        let parts = body
            .pointer("/candidates/0/content/parts")
            .and_then(Value::as_array)
            .ok_or_else(|| {
                let reason = body
                    .pointer("/promptFeedback/blockReason")
                    .and_then(Value::as_str)
                    .unwrap_or("no candidates");
                ProviderError::invalid_response(format!("response has no content: {}", reason))
                    .with_provider(PROVIDER)
            })?;

        let call = parts
            .iter()
            .find_map(|part| part.get("functionCall"))
            .ok_or_else(|| {
                ProviderError::invalid_response("model did not call a function")
                    .with_provider(PROVIDER)
            })?;

        let name = call.get("name").and_then(Value::as_str).ok_or_else(|| {
            ProviderError::invalid_response("function call has no name").with_provider(PROVIDER)
        })?;
        debug!(function = name, "gemini function call");

        let args = call.get("args").cloned().unwrap_or_else(|| json!({}));
        NormalizedResponse::from_call(name, args)
            .map_err(|e| ProviderError::from(e).with_provider(PROVIDER))
    }
}
