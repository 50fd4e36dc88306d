// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. table::TableDialog)
    clippy::module_name_repetitions
)]

//! # Hangeuldown
//!
//! A terminal markdown editor with a live preview, tuned for Korean text.
//!
//! Hangeuldown edits markdown in the terminal with:
//! - A side-by-side preview that follows the cursor
//! - Syntax-highlighted code blocks, math, footnotes and GFM tables
//! - A table dialog and toolbar snippets for common markdown
//! - Light and dark themes, remembered between sessions
//! - Autosave to a local store, markdown download and HTML export
//!
//! ## Architecture
//!
//! Hangeuldown uses The Elm Architecture (TEA) pattern:
//! - **Model**: Application state
//! - **Message**: Events and actions
//! - **Update**: Pure state transitions
//! - **View**: Render to terminal
//!
//! ## Modules
//!
//! - [`app`]: Main application loop and state
//! - [`editor`]: Text buffer and snippet insertion
//! - [`table`]: Table dialog, preview grid and markdown generation
//! - [`document`]: Markdown parsing and preview rendering
//! - [`ui`]: Terminal UI components
//! - [`highlight`]: Syntax highlighting
//! - [`theme`]: Light/dark state
//! - [`storage`]: Persistent key-value store
//! - [`files`]: Markdown download, HTML export and file opening
//! - [`config`]: Flag files and CLI defaults

pub mod app;
pub mod config;
pub mod document;
pub mod editor;
pub mod files;
pub mod highlight;
pub mod perf;
pub mod storage;
pub mod table;
pub mod theme;
pub mod ui;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::{App, Message, Model};
    pub use crate::document::Document;
    pub use crate::editor::EditorBuffer;
    pub use crate::table::{TableDialog, TableSpec};
    pub use crate::theme::{Theme, ThemeController};
}
