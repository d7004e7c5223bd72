//! OpenAI chat-completions adapter.

use serde_json::{Value, json};
use tracing::debug;

use aisched_core::NormalizedResponse;

use crate::adapter::{ProviderAdapter, check_vendor_error};
use crate::error::{ProviderError, ProviderResult};
use crate::request::{FunctionChoice, ProviderRequest, RequestParams};

/// Chat-completions endpoint.
pub const OPENAI_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

const PROVIDER: &str = "openai";

/// Adapter for OpenAI-style chat completions with tool calling.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenAiAdapter;

impl OpenAiAdapter {
    fn tools(params: &RequestParams) -> Vec<Value> {
        params
            .functions
            .iter()
            .map(|f| {
                json!({
                    "type": "function",
                    "function": {
                        "name": f.name(),
                        "description": f.description,
                        "parameters": f.parameters,
                    }
                })
            })
            .collect()
    }

    fn tool_choice(choice: FunctionChoice) -> Value {
        match choice {
            FunctionChoice::Auto => json!("auto"),
            FunctionChoice::Required(function) => json!({
                "type": "function",
                "function": { "name": function.as_str() }
            }),
        }
    }
}

impl ProviderAdapter for OpenAiAdapter {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    fn build(&self, params: &RequestParams, api_key: &str, model: &str) -> ProviderRequest {
        let body = json!({
            "model": model,
            "messages": [
                { "role": "system", "content": params.system_prompt },
                { "role": "user", "content": params.user_text },
            ],
            "tools": Self::tools(params),
            "tool_choice": Self::tool_choice(params.choice),
        });

        ProviderRequest::post_json(OPENAI_ENDPOINT, body)
            .with_header("Authorization", format!("Bearer {}", api_key))
    }

    fn parse(&self, body: &Value) -> ProviderResult<NormalizedResponse> {
        check_vendor_error(body, PROVIDER)?;

        let message = body.pointer("/choices/0/message").ok_or_else(|| {
            ProviderError::invalid_response("response has no choices").with_provider(PROVIDER)
        })?;

        // Legacy `function_call` is still returned by some deployments.
        let call = message
            .pointer("/tool_calls/0/function")
            .or_else(|| message.get("function_call"))
            .ok_or_else(|| {
                ProviderError::invalid_response("model did not call a function")
                    .with_provider(PROVIDER)
            })?;

        let name = call.get("name").and_then(Value::as_str).ok_or_else(|| {
            ProviderError::invalid_response("function call has no name").with_provider(PROVIDER)
        })?;
        debug!(function = name, "openai function call");

        let parsed = match call.get("arguments") {
            Some(Value::String(raw)) => NormalizedResponse::from_call_json(name, raw),
            Some(args) => NormalizedResponse::from_call(name, args.clone()),
            None => NormalizedResponse::from_call(name, json!({})),
        };
        parsed.map_err(|e| ProviderError::from(e).with_provider(PROVIDER))
    }
}
