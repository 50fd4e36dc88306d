//! Application state and main event loop.
//!
//! This module implements The Elm Architecture (TEA):
//! - [`Model`]: The complete application state
//! - [`Message`]: All possible events and actions
//! - [`update`]: Pure function for state transitions
//! - [`App::run`]: Main event loop with rendering

mod effects;
mod event_loop;
mod input;
mod model;
mod update;

pub use model::{Model, ToastLevel, UNTITLED};
pub use update::{Message, Motion, update};

use std::path::PathBuf;

use crate::config::ThemeMode;

/// Main application struct that owns the terminal and runs the event loop.
pub struct App {
    file_path: Option<PathBuf>,
    storage_path: PathBuf,
    output_dir: PathBuf,
    theme: Option<ThemeMode>,
    config_global_path: Option<PathBuf>,
    config_local_path: Option<PathBuf>,
}

impl App {
    /// Create an application persisting to `storage_path`.
    pub fn new(storage_path: PathBuf) -> Self {
        Self {
            file_path: None,
            storage_path,
            output_dir: PathBuf::from("."),
            theme: None,
            config_global_path: None,
            config_local_path: None,
        }
    }

    /// Open this file instead of the stored content.
    #[must_use]
    pub fn with_file(mut self, path: Option<PathBuf>) -> Self {
        self.file_path = path;
        self
    }

    /// Directory downloads and exports are written to.
    #[must_use]
    pub fn with_output_dir(mut self, dir: PathBuf) -> Self {
        self.output_dir = dir;
        self
    }

    /// Override the persisted theme for this session (and persist it).
    #[must_use]
    pub const fn with_theme(mut self, theme: Option<ThemeMode>) -> Self {
        self.theme = theme;
        self
    }

    /// Set config paths to show in help.
    #[must_use]
    pub fn with_config_paths(
        mut self,
        global_path: Option<PathBuf>,
        local_path: Option<PathBuf>,
    ) -> Self {
        self.config_global_path = global_path;
        self.config_local_path = local_path;
        self
    }
}
