//! Light/dark appearance state.
//!
//! The controller only owns the current value. Everything that draws with
//! it (the palette in [`crate::ui::style`], syntect in
//! [`crate::highlight`]) takes a [`Theme`] argument, so a toggle takes effect
//! on the next render without any shared flag.

use crate::storage::{KeyValueStore, StorageError, THEME_KEY};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Persisted string form.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Parse a persisted value. Anything other than `"dark"` is light.
    pub fn from_stored(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("dark") => Self::Dark,
            _ => Self::Light,
        }
    }

    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    pub const fn is_dark(self) -> bool {
        matches!(self, Self::Dark)
    }
}

/// Which of the two toolbar icons is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeIcons {
    pub sun_visible: bool,
    pub moon_visible: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ThemeController {
    theme: Theme,
}

impl ThemeController {
    pub const fn new(theme: Theme) -> Self {
        Self { theme }
    }

    /// Read the persisted theme. A missing or unreadable entry is light.
    pub fn restore(store: &dyn KeyValueStore) -> Self {
        let stored = match store.get(THEME_KEY) {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(error = %err, "failed to read persisted theme");
                None
            }
        };
        Self::new(Theme::from_stored(stored.as_deref()))
    }

    pub const fn theme(&self) -> Theme {
        self.theme
    }

    pub const fn set(&mut self, theme: Theme) {
        self.theme = theme;
    }

    /// Flip light and dark, returning the new value.
    pub fn toggle(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        tracing::debug!(theme = self.theme.as_str(), "theme toggled");
        self.theme
    }

    /// Sun shows in light mode, moon in dark mode.
    pub const fn icons(&self) -> ThemeIcons {
        ThemeIcons {
            sun_visible: !self.theme.is_dark(),
            moon_visible: self.theme.is_dark(),
        }
    }

    pub const fn as_str(&self) -> &'static str {
        self.theme.as_str()
    }

    pub fn persist(&self, store: &mut dyn KeyValueStore) -> Result<(), StorageError> {
        store.set(THEME_KEY, self.as_str())
    }
}
