//! Normalized request parameters and the vendor request they compile to.

use std::collections::BTreeMap;

use serde_json::Value;
use url::Url;

use aisched_core::FunctionUsed;

/// A function the model may call, described by a JSON schema.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDeclaration {
    /// Which function this declares.
    pub function: FunctionUsed,
    /// Natural-language description shown to the model.
    pub description: String,
    /// JSON schema of the arguments.
    pub parameters: Value,
}

impl FunctionDeclaration {
    /// Returns the wire name of the declared function.
    pub fn name(&self) -> &'static str {
        self.function.as_str()
    }
}

/// How strongly the model is steered toward a function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionChoice {
    /// The model picks among the offered functions.
    Auto,
    /// The model must call this function.
    Required(FunctionUsed),
}

/// Mode-dependent parameters consumed by [`crate::ProviderAdapter::build`].
#[derive(Debug, Clone, PartialEq)]
pub struct RequestParams {
    /// Instructions preceding the user text.
    pub system_prompt: String,
    /// The text the user selected.
    pub user_text: String,
    /// Functions offered to the model.
    pub functions: Vec<FunctionDeclaration>,
    /// Whether the model may choose.
    pub choice: FunctionChoice,
}

/// HTTP details of a vendor request.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestOptions {
    /// HTTP method.
    pub method: String,
    /// Request headers, sorted by name.
    pub headers: BTreeMap<String, String>,
    /// JSON request body.
    pub body: Value,
}

/// A fully built vendor request, passed verbatim to the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderRequest {
    /// Target URL.
    pub endpoint: String,
    /// Method, headers and body.
    pub options: RequestOptions,
}

impl ProviderRequest {
    /// Creates a JSON `POST` request.
    pub fn post_json(endpoint: impl Into<String>, body: Value) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        Self {
            endpoint: endpoint.into(),
            options: RequestOptions {
                method: "POST".to_string(),
                headers,
                body,
            },
        }
    }

    /// Builder method to add a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.headers.insert(name.into(), value.into());
        self
    }

    /// Returns the endpoint with any `key` query parameter masked, for logs.
    pub fn redacted_endpoint(&self) -> String {
        let Ok(mut url) = Url::parse(&self.endpoint) else {
            return self.endpoint.clone();
        };
        if !url.query_pairs().any(|(k, _)| k == "key") {
            return self.endpoint.clone();
        }
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| {
                let v = if k == "key" { "***".to_string() } else { v.into_owned() };
                (k.into_owned(), v)
            })
            .collect();
        url.query_pairs_mut().clear().extend_pairs(pairs);
        url.to_string()
    }
}
