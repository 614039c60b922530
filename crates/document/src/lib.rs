//! Line-indexed text document with stable positions, grouped undo, and
//! synchronous change notification.
//!
//! [`Document`] stores text as a vector of lines whose concatenation is
//! the document; all coordinates are in `char`s and all inputs clamp.
//! [`Position`] handles track a point across edits, [`CharCursor`]
//! streams characters forward with snapshot/restore, and listeners
//! observe every mutation as an inclusive [`LineRange`].

mod cursor;
mod document;
mod error;
mod line;
mod position;
mod types;
mod undo;

pub use cursor::{CharCursor, CursorState};
pub use document::{Document, ListenerId, WORD_BREAK_SCAN_LIMIT};
pub use error::DocumentError;
pub use line::Line;
pub use position::Position;
pub use types::{LineRange, NewlineStyle};
