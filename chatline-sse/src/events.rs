//! Async adapter from a line stream to [`StreamEvent`]s.

use std::fmt::Display;

use chatline_types::StreamEvent;
use futures::{Stream, StreamExt};

use crate::assembler::StreamAssembler;

/// Drive a fresh [`StreamAssembler`] over a fallible line stream.
///
/// Emits one [`StreamEvent::Fragment`] per delta and always ends with a
/// single [`StreamEvent::Complete`]. No line is pulled after the `[DONE]`
/// sentinel. A line-source error is reported as [`StreamEvent::Error`]
/// and ends input; the partial result still follows.
pub fn event_stream<S, E>(lines: S) -> impl Stream<Item = StreamEvent> + Send + 'static
where
    S: Stream<Item = Result<String, E>> + Send + 'static,
    E: Display + Send + 'static,
{
    async_stream::stream! {
        let mut assembler = StreamAssembler::new();
        let mut lines = std::pin::pin!(lines);

        while !assembler.is_done() {
            let Some(line_result) = lines.next().await else {
                break;
            };
            match line_result {
                Ok(line) => {
                    for fragment in assembler.push_line(&line) {
                        yield StreamEvent::Fragment(fragment);
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "response stream interrupted");
                    yield StreamEvent::Error(format!("stream read error: {e}"));
                    break;
                }
            }
        }

        yield StreamEvent::Complete(assembler.finish());
    }
}
