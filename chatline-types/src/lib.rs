//! Shared types and traits for chatline.
//!
//! Everything the other chatline crates exchange lives here: the chat
//! message model, the incremental stream model produced by the SSE
//! assembler, the error taxonomy, and the [`Provider`] / [`RenderSink`]
//! seams.

pub mod error;
pub mod stream;
pub mod traits;
pub mod types;

pub use error::*;
pub use stream::*;
pub use traits::*;
pub use types::*;
