//! Incremental assembly of chat completion SSE streams.
//!
//! The [`StreamAssembler`] turns `data: {...}` lines into ordered
//! [`Fragment`]s while accumulating the full response:
//!
//! ```text
//! data: {"choices":[{"delta":{"content":"Hel"}}]}
//! data: {"choices":[{"delta":{"reasoning_content":"thinking"}}]}
//! data: {"choices":[{"delta":{"content":"lo"}}]}
//! data: [DONE]
//! ```
//!
//! Content problems (bad JSON, missing fields) are recorded and skipped,
//! never raised. The assembler does no I/O; [`sse_lines`] and
//! [`event_stream`] adapt an HTTP body into its input, and the drivers in
//! [`drive`] feed a [`RenderSink`](chatline_types::RenderSink) a live preview.
//!
//! # Usage
//!
//! ```
//! use chatline_sse::assemble;
//!
//! let assembled = assemble([
//!     r#"data: {"choices":[{"delta":{"content":"Hi"}}]}"#,
//!     "data: [DONE]",
//! ]);
//! assert_eq!(assembled.response.primary, "Hi");
//! assert!(!assembled.terminated_early());
//! ```

pub mod assembler;
pub mod drive;
pub mod events;
pub mod lines;
pub mod render;

pub use assembler::{AssemblerState, Fragments, StreamAssembler, fragments};
pub use drive::{assemble, assemble_lines, assemble_stream};
pub use events::event_stream;
pub use lines::sse_lines;
pub use render::Preview;

pub use chatline_types::{AccumulatedResponse, Assembled, Fragment, FragmentField, StreamIssue};
