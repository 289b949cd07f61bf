//! Core traits: Provider, RenderSink.

use std::future::Future;

use crate::error::ProviderError;
use crate::stream::StreamHandle;
use crate::types::{ChatRequest, ChatResponse};

/// LLM provider trait.
///
/// Uses RPITIT (return position impl trait in trait), so it is not object-safe;
/// use generics `<P: Provider>` to compose.
///
/// # Example
///
/// ```ignore
/// struct MyProvider;
///
/// impl Provider for MyProvider {
///     fn complete(&self, request: ChatRequest)
///         -> impl Future<Output = Result<ChatResponse, ProviderError>> + Send
///     {
///         async { todo!() }
///     }
///
///     fn complete_stream(&self, request: ChatRequest)
///         -> impl Future<Output = Result<StreamHandle, ProviderError>> + Send
///     {
///         async { todo!() }
///     }
/// }
/// ```
pub trait Provider: Send + Sync {
    /// Send a completion request and get a full response.
    fn complete(
        &self,
        request: ChatRequest,
    ) -> impl Future<Output = Result<ChatResponse, ProviderError>> + Send;

    /// Send a completion request and get a stream of events.
    ///
    /// Returns an error only when the request fails before a successful
    /// response starts; later problems arrive as events on the stream.
    fn complete_stream(
        &self,
        request: ChatRequest,
    ) -> impl Future<Output = Result<StreamHandle, ProviderError>> + Send;
}

/// Receives rendered text while a response is being streamed.
///
/// Called once per processed fragment with a live preview, then once more
/// with the final text.
pub trait RenderSink {
    /// Replace the displayed text.
    fn render(&mut self, text: &str);
}

impl<F> RenderSink for F
where
    F: FnMut(&str),
{
    fn render(&mut self, text: &str) {
        self(text)
    }
}
