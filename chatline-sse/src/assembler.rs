//! Line-driven SSE assembler.
//!
//! The upstream stream format is:
//! ```text
//! data: {"choices":[{"delta":{"role":"assistant","content":""}}]}
//!
//! data: {"choices":[{"delta":{"content":"text"}}]}
//!
//! data: {"choices":[{"delta":{"reasoning_content":"why"}}]}
//!
//! data: [DONE]
//! ```
//!
//! Every `data: ` line is one complete JSON event. Blank lines, comments,
//! and `event:` lines carry nothing and are skipped.

use std::collections::VecDeque;

use chatline_types::{AccumulatedResponse, Assembled, Fragment, StreamIssue, Termination};
use serde_json::Value;

/// Prefix of every payload-carrying line.
pub const DATA_PREFIX: &str = "data: ";

/// Payload that ends the stream.
pub const DONE_SENTINEL: &str = "[DONE]";

/// Lifecycle of a [`StreamAssembler`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AssemblerState {
    /// Accepting lines.
    #[default]
    Streaming,
    /// The `[DONE]` sentinel was seen. Terminal.
    Done,
}

/// Accumulates one SSE response, line by line.
///
/// One assembler serves exactly one stream. It is not restartable: once
/// [`AssemblerState::Done`] is reached every further line is ignored.
#[derive(Debug, Default)]
pub struct StreamAssembler {
    state: AssemblerState,
    response: AccumulatedResponse,
    issues: Vec<StreamIssue>,
    /// Lines consumed so far, including ignored ones.
    line_no: usize,
}

impl StreamAssembler {
    /// A fresh assembler in the streaming state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> AssemblerState {
        self.state
    }

    /// Whether the sentinel has been seen.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.state == AssemblerState::Done
    }

    /// Text accumulated so far.
    #[must_use]
    pub fn accumulated(&self) -> &AccumulatedResponse {
        &self.response
    }

    /// Problems recovered from so far.
    #[must_use]
    pub fn issues(&self) -> &[StreamIssue] {
        &self.issues
    }

    /// Process one line and return the fragments it produced.
    ///
    /// Content comes before reasoning when one event carries both.
    pub fn push_line(&mut self, line: &str) -> Vec<Fragment> {
        if self.is_done() {
            return Vec::new();
        }
        self.line_no += 1;

        let Some(data) = line.strip_prefix(DATA_PREFIX) else {
            return Vec::new();
        };

        if data.trim() == DONE_SENTINEL {
            tracing::trace!(line = self.line_no, "stream sentinel reached");
            self.state = AssemblerState::Done;
            return Vec::new();
        }

        let json: Value = match serde_json::from_str(data) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(line = self.line_no, error = %e, "skipping malformed SSE event");
                self.issues.push(StreamIssue::MalformedEvent {
                    line: self.line_no,
                    reason: e.to_string(),
                });
                return Vec::new();
            }
        };

        if let Some(error) = json.get("error").filter(|e| !e.is_null()) {
            let message = error["message"]
                .as_str()
                .map_or_else(|| error.to_string(), str::to_string);
            tracing::warn!(line = self.line_no, %message, "error object inside stream");
            self.issues.push(StreamIssue::ErrorPayload {
                line: self.line_no,
                message,
            });
            return Vec::new();
        }

        let delta = match first_delta(&json) {
            Ok(delta) => delta,
            Err(field) => {
                tracing::debug!(line = self.line_no, field, "event without delta");
                self.issues.push(StreamIssue::MissingField {
                    line: self.line_no,
                    field,
                });
                return Vec::new();
            }
        };

        let mut fragments = Vec::new();

        if let Some(content) = delta["content"].as_str()
            && !content.is_empty()
        {
            self.response.primary.push_str(content);
            fragments.push(Fragment::content(content));
        }

        if let Some(reasoning) = delta["reasoning_content"].as_str()
            && !reasoning.is_empty()
        {
            self.response.secondary.push_str(reasoning);
            fragments.push(Fragment::reasoning(reasoning));
        }

        fragments
    }

    /// End the stream and return the authoritative result.
    ///
    /// An assembler that never saw the sentinel finishes with
    /// [`Termination::EndOfInput`]; the partial text is kept.
    #[must_use]
    pub fn finish(self) -> Assembled {
        let termination = match self.state {
            AssemblerState::Done => Termination::Sentinel,
            AssemblerState::Streaming => Termination::EndOfInput,
        };
        if termination == Termination::EndOfInput {
            tracing::debug!(
                lines = self.line_no,
                "stream ended without [DONE]; returning partial response"
            );
        }
        Assembled {
            response: self.response,
            termination,
            issues: self.issues,
        }
    }
}

/// Locate `choices[0].delta`, or name the missing piece.
fn first_delta(json: &Value) -> Result<&Value, &'static str> {
    let choice = json
        .get("choices")
        .and_then(Value::as_array)
        .and_then(|choices| choices.first())
        .ok_or("choices")?;
    choice
        .get("delta")
        .filter(|delta| delta.is_object())
        .ok_or("choices[0].delta")
}

/// Lazily assemble a sequence of lines into fragments.
///
/// Lines are pulled only as fragments are requested, and none are pulled
/// after the sentinel.
pub fn fragments<I>(lines: I) -> Fragments<I::IntoIter>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    Fragments {
        lines: lines.into_iter(),
        assembler: StreamAssembler::new(),
        pending: VecDeque::new(),
    }
}

/// Iterator returned by [`fragments`].
#[derive(Debug)]
pub struct Fragments<I> {
    lines: I,
    assembler: StreamAssembler,
    pending: VecDeque<Fragment>,
}

impl<I> Fragments<I> {
    /// Text accumulated from the fragments yielded so far and any queued behind them.
    #[must_use]
    pub fn accumulated(&self) -> &AccumulatedResponse {
        self.assembler.accumulated()
    }

    /// Stop pulling lines and return the result so far.
    #[must_use]
    pub fn finish(self) -> Assembled {
        self.assembler.finish()
    }
}

impl<I> Iterator for Fragments<I>
where
    I: Iterator,
    I::Item: AsRef<str>,
{
    type Item = Fragment;

    fn next(&mut self) -> Option<Fragment> {
        loop {
            if let Some(fragment) = self.pending.pop_front() {
                return Some(fragment);
            }
            if self.assembler.is_done() {
                return None;
            }
            let line = self.lines.next()?;
            self.pending.extend(self.assembler.push_line(line.as_ref()));
        }
    }
}

#[cfg(test)]
mod tests {
    use chatline_types::FragmentField;

    use super::*;

    fn feed(assembler: &mut StreamAssembler, sse: &str) -> Vec<Fragment> {
        sse.lines().flat_map(|l| assembler.push_line(l)).collect()
    }

    #[test]
    fn parse_content_deltas() {
        let mut assembler = StreamAssembler::new();
        let sse = "\
data: {\"id\":\"chatcmpl-abc\",\"choices\":[{\"index\":0,\"delta\":{\"role\":\"assistant\",\"content\":\"\"},\"finish_reason\":null}]}

data: {\"id\":\"chatcmpl-abc\",\"choices\":[{\"index\":0,\"delta\":{\"content\":\"Hello \"},\"finish_reason\":null}]}

data: {\"id\":\"chatcmpl-abc\",\"choices\":[{\"index\":0,\"delta\":{\"content\":\"world\"},\"finish_reason\":null}]}

data: {\"id\":\"chatcmpl-abc\",\"choices\":[{\"index\":0,\"delta\":{},\"finish_reason\":\"stop\"}]}

data: [DONE]
";
        let deltas: Vec<String> = feed(&mut assembler, sse)
            .into_iter()
            .map(|f| f.delta)
            .collect();
        assert_eq!(deltas, vec!["Hello ", "world"]);
        assert!(assembler.is_done());
        assert!(assembler.issues().is_empty());
        assert_eq!(assembler.accumulated().primary, "Hello world");
    }

    #[test]
    fn reasoning_goes_to_secondary() {
        let mut assembler = StreamAssembler::new();
        let fragments =
            assembler.push_line(r#"data: {"choices":[{"delta":{"reasoning_content":"hmm"}}]}"#);
        assert_eq!(fragments, vec![Fragment::reasoning("hmm")]);
        assert_eq!(assembler.accumulated().secondary, "hmm");
        assert!(assembler.accumulated().primary.is_empty());
    }

    #[test]
    fn content_precedes_reasoning_in_one_event() {
        let mut assembler = StreamAssembler::new();
        let fragments = assembler.push_line(
            r#"data: {"choices":[{"delta":{"reasoning_content":"r","content":"c"}}]}"#,
        );
        let fields: Vec<FragmentField> = fragments.iter().map(|f| f.field).collect();
        assert_eq!(fields, vec![FragmentField::Content, FragmentField::Reasoning]);
    }

    #[test]
    fn non_data_lines_are_ignored() {
        let mut assembler = StreamAssembler::new();
        for line in [": keep-alive", "event: message", "", "data:{\"x\":1}", "id: 7"] {
            assert!(assembler.push_line(line).is_empty());
        }
        assert!(assembler.issues().is_empty());
        assert_eq!(assembler.state(), AssemblerState::Streaming);
    }

    #[test]
    fn malformed_json_is_recorded_and_skipped() {
        let mut assembler = StreamAssembler::new();
        assembler.push_line(r#"data: {"choices":[{"delta":{"content":"a"}}]}"#);
        assert!(assembler.push_line("data: not-json").is_empty());
        assembler.push_line(r#"data: {"choices":[{"delta":{"content":"b"}}]}"#);

        assert_eq!(assembler.accumulated().primary, "ab");
        assert!(matches!(
            assembler.issues(),
            [StreamIssue::MalformedEvent { line: 2, .. }]
        ));
    }

    #[test]
    fn missing_choices_is_a_noop() {
        let mut assembler = StreamAssembler::new();
        assert!(assembler.push_line(r#"data: {"id":"x"}"#).is_empty());
        assert!(assembler.push_line(r#"data: {"choices":[]}"#).is_empty());
        assert!(assembler.push_line(r#"data: {"choices":[{"index":0}]}"#).is_empty());
        assert_eq!(
            assembler.issues(),
            &[
                StreamIssue::MissingField { line: 1, field: "choices" },
                StreamIssue::MissingField { line: 2, field: "choices" },
                StreamIssue::MissingField { line: 3, field: "choices[0].delta" },
            ]
        );
        assert!(assembler.accumulated().is_empty());
    }

    #[test]
    fn non_string_fields_are_ignored() {
        let mut assembler = StreamAssembler::new();
        let fragments = assembler
            .push_line(r#"data: {"choices":[{"delta":{"content":null,"reasoning_content":5}}]}"#);
        assert!(fragments.is_empty());
        assert!(assembler.issues().is_empty());
    }

    #[test]
    fn error_object_is_recorded_not_raised() {
        let mut assembler = StreamAssembler::new();
        let fragments = assembler.push_line(
            r#"data: {"error":{"message":"Rate limit exceeded","type":"rate_limit_error"}}"#,
        );
        assert!(fragments.is_empty());
        assert!(matches!(
            assembler.issues(),
            [StreamIssue::ErrorPayload { message, .. }] if message.contains("Rate limit")
        ));
        assert_eq!(assembler.state(), AssemblerState::Streaming);
    }

    #[test]
    fn sentinel_is_terminal() {
        let mut assembler = StreamAssembler::new();
        assembler.push_line("data: [DONE]");
        assert!(assembler.is_done());
        let after = assembler.push_line(r#"data: {"choices":[{"delta":{"content":"late"}}]}"#);
        assert!(after.is_empty());
        assert!(assembler.accumulated().is_empty());

        let assembled = assembler.finish();
        assert_eq!(assembled.termination, Termination::Sentinel);
    }

    #[test]
    fn sentinel_tolerates_surrounding_whitespace() {
        let mut assembler = StreamAssembler::new();
        assembler.push_line("data:  [DONE] \r");
        assert!(assembler.is_done());
    }

    #[test]
    fn finish_without_sentinel_keeps_partial_text() {
        let mut assembler = StreamAssembler::new();
        assembler.push_line(r#"data: {"choices":[{"delta":{"content":"partial"}}]}"#);
        let assembled = assembler.finish();
        assert!(assembled.terminated_early());
        assert_eq!(assembled.response.primary, "partial");
    }

    #[test]
    fn fragments_stop_pulling_after_sentinel() {
        let mut pulled = 0;
        let lines = [
            r#"data: {"choices":[{"delta":{"content":"x"}}]}"#,
            "data: [DONE]",
            r#"data: {"choices":[{"delta":{"content":"y"}}]}"#,
        ]
        .into_iter()
        .inspect(|_| pulled += 1);

        let mut iter = fragments(lines);
        let collected: Vec<Fragment> = iter.by_ref().collect();
        assert_eq!(collected, vec![Fragment::content("x")]);
        let assembled = iter.finish();
        assert_eq!(assembled.response.primary, "x");
        assert_eq!(pulled, 2);
    }
}
