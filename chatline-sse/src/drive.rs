//! Drive an assembler to completion, optionally rendering as it goes.

use chatline_types::{AccumulatedResponse, Assembled, RenderSink};
use futures::{Stream, StreamExt};

use crate::assembler::{StreamAssembler, fragments};
use crate::render::Preview;

/// Assemble a complete line sequence without rendering.
pub fn assemble<I>(lines: I) -> Assembled
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut iter = fragments(lines);
    iter.by_ref().for_each(drop);
    iter.finish()
}

/// Assemble a line sequence, rendering once per fragment and once at the end.
///
/// Each live render shows everything up to and including that fragment,
/// followed by the cursor. The final render has no cursor.
pub fn assemble_lines<I, K>(lines: I, preview: &Preview, sink: &mut K) -> Assembled
where
    I: IntoIterator,
    I::Item: AsRef<str>,
    K: RenderSink + ?Sized,
{
    let mut shown = AccumulatedResponse::default();
    let mut iter = fragments(lines);
    for fragment in iter.by_ref() {
        shown.apply(&fragment);
        sink.render(&preview.live(&shown));
    }
    let assembled = iter.finish();
    sink.render(&preview.finished(&assembled.response));
    assembled
}

/// Async counterpart of [`assemble_lines`] for a line stream.
///
/// The stream is not polled again once the sentinel has been seen.
pub async fn assemble_stream<S, K>(lines: S, preview: &Preview, sink: &mut K) -> Assembled
where
    S: Stream,
    S::Item: AsRef<str>,
    K: RenderSink + ?Sized,
{
    let mut assembler = StreamAssembler::new();
    let mut shown = AccumulatedResponse::default();
    let mut lines = std::pin::pin!(lines);

    while !assembler.is_done() {
        let Some(line) = lines.next().await else {
            break;
        };
        for fragment in assembler.push_line(line.as_ref()) {
            shown.apply(&fragment);
            sink.render(&preview.live(&shown));
        }
    }

    let assembled = assembler.finish();
    sink.render(&preview.finished(&assembled.response));
    assembled
}
