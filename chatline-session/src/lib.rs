//! Conversation bookkeeping and turn driving for chatline.
//!
//! This crate provides:
//! - [`Conversation`] and [`ConversationStore`]: caller-owned, in-memory chat history
//! - [`send_streaming`]: one streamed turn, rendered live into a [`RenderSink`](chatline_types::RenderSink)
//! - [`send`]: one non-streamed turn
//!
//! There is no global state. The caller owns the store and lends it to each
//! turn, so independent stores can drive independent conversations.

pub mod store;
pub mod turn;

pub use store::*;
pub use turn::*;
