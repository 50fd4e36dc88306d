//! Markdown source editing.
//!
//! A rope-backed text buffer with cursor and selection, plus the snippet
//! inserter used by the toolbar and formatting shortcuts.

mod buffer;
pub mod snippets;

pub use buffer::{Cursor, Direction, EditorBuffer};
pub use snippets::{Snippet, Template, Wrap};
