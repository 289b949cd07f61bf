//! SSE streaming support for the proxy's chat completions endpoint.
//!
//! The response body is split into lines and fed through a fresh
//! [`StreamAssembler`](chatline_sse::StreamAssembler); see
//! [`chatline_sse::event_stream`] for the event contract.

use chatline_sse::{event_stream, sse_lines};
use chatline_types::StreamHandle;
use reqwest::Response;

/// Wrap an HTTP response body into a [`StreamHandle`].
///
/// The handle owns the response. The body is released when the handle is
/// dropped, whether the stream finished, hit `[DONE]` early, or failed.
pub(crate) fn stream_completion(response: Response) -> StreamHandle {
    let lines = sse_lines(response.bytes_stream());
    StreamHandle {
        receiver: Box::pin(event_stream(lines)),
    }
}
