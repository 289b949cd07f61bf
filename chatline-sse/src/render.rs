//! Display rendering for a response that is still being typed.

use chatline_types::AccumulatedResponse;

/// Glyph appended to live renders.
pub const CURSOR: &str = "▌";

const REASONING_OPEN: &str = "\n\n<details><summary>Reasoning</summary>\n\n";
const REASONING_CLOSE: &str = "\n\n</details>";

/// Renders an [`AccumulatedResponse`] for display.
///
/// The answer comes first. Non-empty reasoning follows inside a delimited
/// block. Live renders end with a cursor glyph; the final render does not.
///
/// ```
/// use chatline_sse::Preview;
/// use chatline_types::AccumulatedResponse;
///
/// let acc = AccumulatedResponse { primary: "Hi".into(), secondary: String::new() };
/// let preview = Preview::new().cursor("_");
/// assert_eq!(preview.live(&acc), "Hi_");
/// assert_eq!(preview.finished(&acc), "Hi");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    cursor: String,
    reasoning_open: String,
    reasoning_close: String,
}

impl Default for Preview {
    fn default() -> Self {
        Self {
            cursor: CURSOR.into(),
            reasoning_open: REASONING_OPEN.into(),
            reasoning_close: REASONING_CLOSE.into(),
        }
    }
}

impl Preview {
    /// Default markers: `▌` cursor and a `<details>` reasoning block.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the cursor glyph.
    #[must_use]
    pub fn cursor(mut self, cursor: impl Into<String>) -> Self {
        self.cursor = cursor.into();
        self
    }

    /// Override the text placed before and after the reasoning block.
    #[must_use]
    pub fn reasoning_delimiters(mut self, open: impl Into<String>, close: impl Into<String>) -> Self {
        self.reasoning_open = open.into();
        self.reasoning_close = close.into();
        self
    }

    /// Render with the trailing cursor.
    #[must_use]
    pub fn live(&self, response: &AccumulatedResponse) -> String {
        let mut out = self.body(response);
        out.push_str(&self.cursor);
        out
    }

    /// Render without the cursor.
    #[must_use]
    pub fn finished(&self, response: &AccumulatedResponse) -> String {
        self.body(response)
    }

    fn body(&self, response: &AccumulatedResponse) -> String {
        let mut out = response.primary.clone();
        if !response.secondary.is_empty() {
            out.push_str(&self.reasoning_open);
            out.push_str(&response.secondary);
            out.push_str(&self.reasoning_close);
        }
        out
    }
}
