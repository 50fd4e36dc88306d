use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::app::{Model, ToastLevel};

use super::style::Palette;
use super::toolbar::{MOON_ICON, SUN_ICON};

pub fn render_status_bar(model: &Model, frame: &mut Frame, area: Rect, palette: &Palette) {
    if let Some((message, level)) = model.active_toast() {
        render_toast_bar(message, level, frame, area, palette);
        return;
    }

    let buffer = &model.buffer;
    let cursor = buffer.cursor();
    let line = buffer.line_at(cursor.line).unwrap_or_default();
    let column = line[..cursor.col.min(line.len())].chars().count() + 1;
    let dirty = if buffer.is_dirty() { " [수정됨]" } else { "" };
    let icons = model.theme.icons();
    let theme = if icons.sun_visible {
        format!("{SUN_ICON} 라이트")
    } else {
        format!("{MOON_ICON} 다크")
    };

    let document = &model.document;
    let status = format!(
        " {}{dirty}  줄 {}/{}, 열 {column}  제목 {} · 링크 {} · 이미지 {} · 각주 {}  {theme}  F1 도움말",
        model.document_name(),
        cursor.line + 1,
        buffer.line_count(),
        document.headings().len(),
        document.links().len(),
        document.images().len(),
        document.footnote_count(),
    );
    let bar = Paragraph::new(status)
        .style(Style::default().bg(palette.status_bg).fg(palette.status_fg));
    frame.render_widget(bar, area);
}

fn render_toast_bar(
    message: &str,
    level: ToastLevel,
    frame: &mut Frame,
    area: Rect,
    palette: &Palette,
) {
    let (prefix, style) = match level {
        ToastLevel::Info => (
            "[알림]",
            Style::default().bg(palette.status_bg).fg(palette.status_fg),
        ),
        ToastLevel::Warning => (
            "[주의]",
            Style::default().bg(palette.warn_bg).fg(Color::Black),
        ),
        ToastLevel::Error => (
            "[오류]",
            Style::default().bg(palette.error_bg).fg(Color::White),
        ),
    };
    let toast = Paragraph::new(format!(" {prefix} {message}")).style(style);
    frame.render_widget(toast, area);
}
