//! Model provider adapters and request dispatch.
//!
//! This crate turns selected text into a vendor request and a vendor
//! response back into a [`NormalizedResponse`]:
//!
//! - [`select`] - builds [`RequestParams`] for a [`Mode`]
//! - [`ProviderAdapter`] - the trait each vendor family implements
//! - [`resolve`] - maps a model identifier to its adapter
//! - [`Transport`] - sends the built request
//! - [`ProviderError`] - error types for provider operations
//!
//! # Architecture
//!
//! ```text
//!   text + Mode ──select()──▶ RequestParams
//!                                  │
//!                     resolve(model) ──▶ &dyn ProviderAdapter
//!                                  │
//!                                  ▼ build()
//!                           ProviderRequest ──▶ Transport ──▶ JSON body
//!                                                                │
//!                                                                ▼ parse()
//!                                                      NormalizedResponse
//! ```
//!
//! # Example
//!
//! ```ignore
//! use aisched_providers::{HttpTransport, Mode, execute, select};
//!
//! let transport = HttpTransport::new(DEFAULT_TIMEOUT)?;
//! let params = select(text, Mode::NewTab, today);
//! let response = execute(&transport, &params, api_key, "gpt-4o").await?;
//! ```
//!
//! [`NormalizedResponse`]: aisched_core::NormalizedResponse

pub mod adapter;
pub mod error;
pub mod gemini;
pub mod mode;
pub mod openai;
pub mod registry;
pub mod request;
pub mod transport;

// Re-export main types at crate root
pub use adapter::{ProviderAdapter, is_credential_rejection};
pub use error::{ProviderError, ProviderErrorCode, ProviderResult};
pub use gemini::GeminiAdapter;
pub use mode::{Mode, UnknownMode, select};
pub use openai::OpenAiAdapter;
pub use registry::{
    AdapterFamily, DEFAULT_MODEL, build_request, execute, parse_response, resolve,
    supported_models,
};
pub use request::{FunctionChoice, FunctionDeclaration, ProviderRequest, RequestOptions, RequestParams};
pub use transport::{BoxFuture, DEFAULT_TIMEOUT, HttpTransport, Transport};
