//! Split a chunked response body into text lines.

use bytes::Bytes;
use futures::{Stream, StreamExt};

/// Turn a byte-chunk stream into a stream of lines.
///
/// Lines are split on `\n` with a trailing `\r` removed. Bytes are buffered
/// until a full line is available, so a multi-byte character split across
/// chunks decodes correctly; invalid UTF-8 is replaced rather than fatal.
/// A non-blank trailing line without a newline is flushed at the end.
///
/// The first transport error is forwarded and ends the stream.
pub fn sse_lines<S, E>(byte_stream: S) -> impl Stream<Item = Result<String, E>> + Send + 'static
where
    S: Stream<Item = Result<Bytes, E>> + Send + 'static,
    E: Send + 'static,
{
    async_stream::stream! {
        let mut bytes_stream = std::pin::pin!(byte_stream);
        let mut buf: Vec<u8> = Vec::new();
        // Bytes of `buf` already known to hold no newline
        let mut scanned = 0;

        while let Some(chunk_result) = bytes_stream.next().await {
            let chunk = match chunk_result {
                Ok(b) => b,
                Err(e) => {
                    yield Err(e);
                    return;
                }
            };

            buf.extend_from_slice(&chunk);

            // Emit every complete line, keeping the tail for the next chunk
            let mut start = 0;
            while let Some(offset) = buf[scanned..].iter().position(|&b| b == b'\n') {
                let newline_pos = scanned + offset;
                let line = decode_line(&buf[start..newline_pos]);
                start = newline_pos + 1;
                scanned = start;
                yield Ok(line);
            }
            buf.drain(..start);
            scanned = buf.len();
        }

        if !buf.is_empty() {
            let line = decode_line(&buf);
            if !line.trim().is_empty() {
                yield Ok(line);
            }
        }
    }
}

fn decode_line(raw: &[u8]) -> String {
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    String::from_utf8_lossy(raw).into_owned()
}
