use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::document::Document;
use crate::editor::EditorBuffer;
use crate::storage::{CONTENT_KEY, KeyValueStore, MemoryStore};
use crate::table::TableDialog;
use crate::theme::ThemeController;
use crate::ui::AppLayout;
use crate::ui::viewport::Viewport;

/// Title shown for a buffer that was not opened from a file.
pub const UNTITLED: &str = "새 문서";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
struct Toast {
    level: ToastLevel,
    message: String,
    expires_at: Instant,
}

/// The complete application state.
///
/// All state lives here - no global or scattered state.
pub struct Model {
    /// Markdown source being edited
    pub buffer: EditorBuffer,
    /// Rendered preview of `buffer`
    pub document: Document,
    /// Preview scroll position
    pub viewport: Viewport,
    /// First buffer line shown in the editor pane
    pub editor_scroll: usize,
    pub theme: ThemeController,
    /// Open insert-table dialog, if any
    pub table_dialog: Option<TableDialog>,
    /// Path typed into the open-file prompt while it is showing
    pub open_prompt: Option<String>,
    /// Whether help overlay is visible
    pub help_visible: bool,
    toast: Option<Toast>,
    /// Persistent key-value store for `content` and `theme`
    pub(super) store: Box<dyn KeyValueStore>,
    /// Where downloads and exports are written
    pub output_dir: PathBuf,
    /// File name of the last opened document
    pub document_name: Option<String>,
    /// Buffer revision the preview was last rendered from
    rendered_revision: Option<u64>,
    /// Buffer revision last written to the store
    persisted_revision: Option<u64>,
    /// Terminal size in cells
    pub size: (u16, u16),
    /// Global config path shown in help
    pub config_global_path: Option<PathBuf>,
    /// Local override path shown in help
    pub config_local_path: Option<PathBuf>,
    /// Whether the app should quit
    pub should_quit: bool,
    pub(super) quit_confirmed: bool,
}

impl Model {
    /// Build the model and render the first preview.
    ///
    /// The content is taken as already persisted, so the first write only
    /// happens once the buffer changes.
    pub fn new(
        content: &str,
        store: Box<dyn KeyValueStore>,
        theme: ThemeController,
        terminal_size: (u16, u16),
    ) -> Self {
        let mut model = Self {
            buffer: EditorBuffer::from_text(content),
            theme,
            store,
            size: terminal_size,
            ..Self::default()
        };
        let preview = model.layout().preview_inner();
        model.viewport = Viewport::new(preview.width, preview.height, 0);
        model.persisted_revision = Some(model.buffer.revision());
        model.reflow_preview();
        model
    }

    /// Screen regions for the current terminal size.
    pub fn layout(&self) -> AppLayout {
        crate::ui::layout_for_size(self.size.0, self.size.1)
    }

    pub fn document_name(&self) -> &str {
        self.document_name.as_deref().unwrap_or(UNTITLED)
    }

    /// Whether a dialog, prompt or help covers the panes.
    pub const fn has_overlay(&self) -> bool {
        self.table_dialog.is_some() || self.open_prompt.is_some() || self.help_visible
    }

    /// Re-render the preview if the buffer changed since the last render.
    pub(super) fn refresh_preview(&mut self) {
        if self.rendered_revision == Some(self.buffer.revision()) {
            return;
        }
        self.reflow_preview();
    }

    /// Re-render the preview unconditionally (e.g. after a resize).
    pub(super) fn reflow_preview(&mut self) {
        let width = self.viewport.width().max(1);
        let text = self.buffer.text();
        match crate::document::parse_with_layout(&text, width) {
            Ok(document) => {
                self.document = document;
                self.viewport.set_total_lines(self.document.line_count());
                self.rendered_revision = Some(self.buffer.revision());
                tracing::debug!(
                    revision = self.buffer.revision(),
                    lines = self.document.line_count(),
                    "preview rendered"
                );
            }
            Err(err) => {
                tracing::warn!(error = %err, "preview render failed");
                self.show_toast(
                    ToastLevel::Warning,
                    format!("미리보기를 만들지 못했습니다: {err}"),
                );
            }
        }
    }

    /// Scroll the preview to the cursor's relative position in the source.
    pub(super) fn sync_preview_to_cursor(&mut self) {
        self.viewport
            .follow(self.buffer.cursor().line, self.buffer.line_count());
    }

    /// Scroll the editor pane so the cursor line is on screen.
    pub(super) fn ensure_cursor_visible(&mut self) {
        let height = usize::from(self.layout().editor_inner().height.max(1));
        let line = self.buffer.cursor().line;
        if line < self.editor_scroll {
            self.editor_scroll = line;
        } else if line >= self.editor_scroll + height {
            self.editor_scroll = line + 1 - height;
        }
    }

    pub(super) fn scroll_editor_down(&mut self, n: usize) {
        let max = self.buffer.line_count().saturating_sub(1);
        self.editor_scroll = (self.editor_scroll + n).min(max);
    }

    pub(super) fn resize(&mut self, width: u16, height: u16) {
        self.size = (width, height);
        let preview = self.layout().preview_inner();
        self.viewport.resize(preview.width, preview.height);
        self.reflow_preview();
        self.ensure_cursor_visible();
    }

    /// Write `content` to the store when the buffer changed since the last
    /// write. A failed write is reported once, not retried.
    pub(super) fn persist_content_if_changed(&mut self) {
        let revision = self.buffer.revision();
        if self.persisted_revision == Some(revision) {
            return;
        }
        self.persisted_revision = Some(revision);
        if let Err(err) = self.store.set(CONTENT_KEY, &self.buffer.text()) {
            tracing::warn!(error = %err, "failed to persist content");
            self.show_toast(ToastLevel::Error, format!("내용을 보관하지 못했습니다: {err}"));
        }
    }

    /// Write `content` to the store even if this revision was written before.
    pub(super) fn persist_content(&mut self) {
        self.persisted_revision = None;
        self.persist_content_if_changed();
    }

    pub(super) fn persist_theme(&mut self) {
        if let Err(err) = self.theme.persist(self.store.as_mut()) {
            tracing::warn!(error = %err, "failed to persist theme");
            self.show_toast(ToastLevel::Error, format!("테마를 보관하지 못했습니다: {err}"));
        }
    }

    /// Highlight code blocks in and around the visible preview range.
    pub fn ensure_highlight_overscan(&mut self) {
        let height = self.viewport.height() as usize;
        let start = self.viewport.offset().saturating_sub(height);
        let end = self.viewport.offset() + height * 2;
        self.document
            .ensure_highlight_for_range(start..end, self.theme.theme());
    }

    pub(super) fn show_toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.toast = Some(Toast {
            level,
            message: message.into(),
            expires_at: Instant::now() + Duration::from_secs(4),
        });
    }

    pub(super) fn expire_toast(&mut self, now: Instant) -> bool {
        if self
            .toast
            .as_ref()
            .is_some_and(|toast| toast.expires_at <= now)
        {
            self.toast = None;
            return true;
        }
        false
    }

    pub fn active_toast(&self) -> Option<(&str, ToastLevel)> {
        self.toast
            .as_ref()
            .map(|toast| (toast.message.as_str(), toast.level))
    }

    /// Read back a stored value, for tests and diagnostics.
    pub fn stored(&self, key: &str) -> Option<String> {
        self.store.get(key).ok().flatten()
    }
}

// Implement Default for Model to allow std::mem::take
impl Default for Model {
    fn default() -> Self {
        Self {
            buffer: EditorBuffer::empty(),
            document: Document::empty(),
            viewport: Viewport::new(80, 24, 0),
            editor_scroll: 0,
            theme: ThemeController::default(),
            table_dialog: None,
            open_prompt: None,
            help_visible: false,
            toast: None,
            store: Box::new(MemoryStore::new()),
            output_dir: PathBuf::from("."),
            document_name: None,
            rendered_revision: None,
            persisted_revision: None,
            size: (80, 24),
            config_global_path: None,
            config_local_path: None,
            should_quit: false,
            quit_confirmed: false,
        }
    }
}
