use std::path::Path;

use crate::app::{App, Message, Model, ToastLevel};
use crate::files::{self, Download};

impl App {
    /// Run the I/O a message asks for, after `update` has applied it.
    ///
    /// Every failure is logged and surfaced as a toast; nothing here is
    /// fatal and nothing is retried.
    pub(super) fn handle_message_side_effects(model: &mut Model, msg: &Message) {
        match msg {
            Message::SaveMarkdown => {
                let date = chrono::Utc::now().date_naive();
                let download = files::markdown_download(&model.buffer.text(), date);
                if write_download(model, &download) {
                    model.buffer.mark_clean();
                }
            }
            Message::ExportHtml => {
                let download = files::html_export(&model.buffer.text());
                write_download(model, &download);
            }
            Message::OpenFile(path) => open_file(model, path),
            Message::ToggleTheme => model.persist_theme(),
            _ => {}
        }
        model.persist_content_if_changed();
    }
}

fn write_download(model: &mut Model, download: &Download) -> bool {
    match download.write_to(&model.output_dir) {
        Ok(path) => {
            model.show_toast(
                ToastLevel::Info,
                format!("저장했습니다: {}", path.display()),
            );
            true
        }
        Err(err) => {
            tracing::warn!(
                file = %download.file_name,
                error = ?err,
                "download failed"
            );
            crate::perf::log_event("download.error", format!("{err:#}"));
            model.show_toast(ToastLevel::Error, format!("저장하지 못했습니다: {err}"));
            false
        }
    }
}

/// Replace the buffer with `path`. The buffer is left alone on failure.
fn open_file(model: &mut Model, path: &Path) {
    match files::read_document(path) {
        Ok(text) => {
            model.buffer.set_text(&text);
            model.buffer.mark_clean();
            model.editor_scroll = 0;
            model.document_name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned());
            model.refresh_preview();
            model.viewport.go_to_line(0);
            tracing::info!(path = %path.display(), "document opened");
            model.show_toast(ToastLevel::Info, format!("열었습니다: {}", path.display()));
        }
        Err(err) => {
            tracing::warn!(path = %path.display(), error = ?err, "open failed");
            model.show_toast(ToastLevel::Error, format!("열지 못했습니다: {err}"));
        }
    }
}
