//! Terminal UI components.
//!
//! This module contains all UI-related code including:
//! - [`layout`]: Screen regions, shared by drawing and mouse hit-testing
//! - [`viewport`]: Preview scroll position
//! - [`toolbar`]: The clickable button row
//! - [`style`]: Light and dark palettes

pub mod style;
pub mod toolbar;
pub mod viewport;

mod overlays;
mod render;
mod status;

pub use overlays::{DialogHit, DialogLayout, table_dialog_hit, table_dialog_layout};
pub use render::{line_number_width, render};
pub(crate) use render::{byte_col_at, editor_geometry};

use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::widgets::{Block, Borders};

/// Blank columns between the preview border and its text.
pub const PREVIEW_LEFT_PADDING: u16 = 1;

/// Screen regions for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppLayout {
    pub toolbar: Rect,
    pub editor: Rect,
    pub preview: Rect,
    pub status: Rect,
}

impl AppLayout {
    /// Text area of the editor pane, inside its border.
    pub fn editor_inner(&self) -> Rect {
        pane_inner(self.editor)
    }

    /// Text area of the preview pane, inside its border and padding.
    pub fn preview_inner(&self) -> Rect {
        let inner = pane_inner(self.preview);
        Rect {
            x: inner.x + PREVIEW_LEFT_PADDING.min(inner.width),
            width: inner.width.saturating_sub(PREVIEW_LEFT_PADDING),
            ..inner
        }
    }
}

/// Toolbar on top, status bar at the bottom, editor and preview side by side.
pub fn layout(area: Rect) -> AppLayout {
    let rows = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(3),
        Constraint::Length(1),
    ])
    .split(area);
    let panes = Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[1]);
    AppLayout {
        toolbar: rows[0],
        editor: panes[0],
        preview: panes[1],
        status: rows[2],
    }
}

/// Layout for a terminal of `width` x `height`.
pub fn layout_for_size(width: u16, height: u16) -> AppLayout {
    layout(Rect::new(0, 0, width, height))
}

fn pane_inner(pane: Rect) -> Rect {
    Block::default().borders(Borders::ALL).inner(pane)
}

pub(crate) const fn point_in_rect(col: u16, row: u16, rect: Rect) -> bool {
    col >= rect.x
        && col < rect.x.saturating_add(rect.width)
        && row >= rect.y
        && row < rect.y.saturating_add(rect.height)
}
