//! Client for the hosted LLM proxy chat completions API.
//!
//! This crate implements the [`Provider`] trait from `chatline-types` on top
//! of `reqwest`, sending the static authentication headers the proxy
//! expects and piping streamed responses through the `chatline-sse`
//! assembler.
//!
//! # Usage
//!
//! ```no_run
//! use chatline_provider::ProxyClient;
//!
//! let provider = ProxyClient::new("your-api-key")
//!     .client_id("your-client-id")
//!     .model("claude-3-5-sonnet-20241022");
//! ```
//!
//! # Features
//!
//! - Non-streaming completion with a fallback reply when the body has no message
//! - Streaming completion as [`StreamEvent`]s, ending in the assembled result
//! - Configuration via builder methods or a deserializable [`ProxyConfig`]
//! - Error mapping from HTTP status codes to [`ProviderError`] variants

pub mod client;
pub mod config;
pub(crate) mod error;
pub mod mapping;
pub(crate) mod streaming;

pub use client::ProxyClient;
pub use config::ProxyConfig;

// Re-export chatline-types for convenience
pub use chatline_types::{Provider, ProviderError, StreamEvent, StreamHandle};
