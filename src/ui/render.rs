use std::ops::Range;

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph};
use unicode_width::UnicodeWidthChar;

use crate::app::Model;
use crate::editor::EditorBuffer;

use super::style::{Palette, style_for_inline, style_for_line_type};
use super::toolbar::{ToolbarAction, toolbar_buttons};
use super::{PREVIEW_LEFT_PADDING, layout, overlays, status};

/// Render the complete UI.
pub fn render(model: &Model, frame: &mut Frame) {
    let palette = Palette::for_theme(model.theme.theme());
    let area = frame.area();
    let regions = layout(area);

    frame.render_widget(Clear, area);
    frame.render_widget(Block::default().style(palette.base()), area);

    render_toolbar(model, frame, regions.toolbar, &palette);
    render_editor(model, frame, regions.editor, &palette);
    render_preview(model, frame, regions.preview, &palette);
    status::render_status_bar(model, frame, regions.status, &palette);

    if model.table_dialog.is_some() {
        overlays::render_table_dialog(model, frame, area);
    }
    if model.open_prompt.is_some() {
        overlays::render_open_prompt(model, frame, area);
    }
    if model.help_visible {
        overlays::render_help_overlay(model, frame, area);
    }
}

fn render_toolbar(model: &Model, frame: &mut Frame, area: Rect, palette: &Palette) {
    let base = Style::default().bg(palette.toolbar_bg).fg(palette.toolbar_fg);
    frame.render_widget(Block::default().style(base), area);

    for button in toolbar_buttons(area, model.theme.icons()) {
        let style = match button.action {
            ToolbarAction::Bold => base.add_modifier(Modifier::BOLD),
            ToolbarAction::Italic => base.add_modifier(Modifier::ITALIC),
            ToolbarAction::Strikethrough => base.add_modifier(Modifier::CROSSED_OUT),
            ToolbarAction::Theme | ToolbarAction::Help => base.fg(palette.accent),
            _ => base,
        };
        frame.render_widget(
            Paragraph::new(Span::styled(format!(" {} ", button.label), style)),
            button.area,
        );
    }
}

/// Where the editor text sits inside the editor pane for the current frame.
///
/// Shared with mouse handling so a click maps to the character drawn there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct EditorGeometry {
    /// Area holding the text, right of the gutter.
    pub text: Rect,
    /// First buffer line on screen.
    pub scroll: usize,
    /// Display columns hidden on the left.
    pub hscroll: usize,
}

pub(crate) fn editor_geometry(buffer: &EditorBuffer, scroll: usize, inner: Rect) -> EditorGeometry {
    let gutter = line_number_width(buffer.line_count()) + 1;
    let text = Rect {
        x: inner.x + gutter.min(inner.width),
        width: inner.width.saturating_sub(gutter),
        ..inner
    };
    let cursor = buffer.cursor();
    let line = buffer.line_at(cursor.line).unwrap_or_default();
    let cursor_x = display_col(&line, cursor.col);
    let width = usize::from(text.width.max(1));
    let hscroll = (cursor_x + 1).saturating_sub(width);
    EditorGeometry {
        text,
        scroll,
        hscroll,
    }
}

fn render_editor(model: &Model, frame: &mut Frame, area: Rect, palette: &Palette) {
    let buffer = &model.buffer;
    let title = format!(" {} ", model.document_name());
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.accent))
        .style(palette.base());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let geometry = editor_geometry(buffer, model.editor_scroll, inner);
    let gutter_width = usize::from(geometry.text.x - inner.x).saturating_sub(1);
    let width = usize::from(geometry.text.width);
    let selected = palette.base().bg(palette.selection_bg);

    let end = (geometry.scroll + usize::from(inner.height)).min(buffer.line_count());
    let content: Vec<Line> = (geometry.scroll..end)
        .map(|line_idx| {
            let text = buffer.line_at(line_idx).unwrap_or_default();
            let mut spans = vec![Span::styled(
                format!("{:>gutter_width$} ", line_idx + 1),
                palette.base().fg(palette.gutter),
            )];
            let selection = selected_bytes(buffer, line_idx, text.len());
            spans.extend(visible_segments(&text, geometry.hscroll, width, selection).into_iter().map(
                |(segment, is_selected)| {
                    Span::styled(segment, if is_selected { selected } else { palette.base() })
                },
            ));
            Line::from(spans)
        })
        .collect();
    frame.render_widget(Paragraph::new(content), inner);

    if model.has_overlay() {
        return;
    }
    let cursor = buffer.cursor();
    if cursor.line < geometry.scroll || cursor.line >= end {
        return;
    }
    let line = buffer.line_at(cursor.line).unwrap_or_default();
    let x = cursor_offset_in(
        display_col(&line, cursor.col).saturating_sub(geometry.hscroll),
        geometry.text.width,
    );
    #[allow(clippy::cast_possible_truncation)]
    frame.set_cursor_position((
        geometry.text.x + x,
        inner.y + (cursor.line - geometry.scroll) as u16,
    ));
}

/// Clamp a display column to the last cell of a text area `width` wide.
fn cursor_offset_in(x: usize, width: u16) -> u16 {
    let last = width.saturating_sub(1);
    u16::try_from(x).map_or(last, |x| x.min(last))
}

/// Byte range of `line_idx` covered by the selection.
fn selected_bytes(buffer: &EditorBuffer, line_idx: usize, line_len: usize) -> Option<Range<usize>> {
    let (start, end) = buffer.selection()?;
    if line_idx < start.line || line_idx > end.line {
        return None;
    }
    let from = if line_idx == start.line { start.col } else { 0 };
    let to = if line_idx == end.line { end.col } else { line_len };
    (from < to).then_some(from..to)
}

/// Slice a line to the display window `hscroll..hscroll + width`, split into
/// runs by selection state.
fn visible_segments(
    line: &str,
    hscroll: usize,
    width: usize,
    selection: Option<Range<usize>>,
) -> Vec<(String, bool)> {
    let mut segments: Vec<(String, bool)> = Vec::new();
    let mut col = 0usize;
    for (byte, ch) in line.char_indices() {
        let w = char_columns(ch);
        if col < hscroll {
            col += w;
            continue;
        }
        if col + w > hscroll + width {
            break;
        }
        col += w;
        let is_selected = selection.as_ref().is_some_and(|r| r.contains(&byte));
        let shown = if ch == '\t' { ' ' } else { ch };
        match segments.last_mut() {
            Some((text, sel)) if *sel == is_selected => text.push(shown),
            _ => segments.push((shown.to_string(), is_selected)),
        }
    }
    segments
}

fn char_columns(ch: char) -> usize {
    if ch == '\t' {
        1
    } else {
        ch.width().unwrap_or(0)
    }
}

/// Display column of byte offset `byte_col` in `line`.
fn display_col(line: &str, byte_col: usize) -> usize {
    line.char_indices()
        .take_while(|(byte, _)| *byte < byte_col)
        .map(|(_, ch)| char_columns(ch))
        .sum()
}

/// Byte offset of the character drawn at display column `x`.
///
/// A click on the right half of a wide character still lands before it.
pub(crate) fn byte_col_at(line: &str, x: usize) -> usize {
    let mut col = 0usize;
    for (byte, ch) in line.char_indices() {
        let w = char_columns(ch);
        if x < col + w.max(1) {
            return byte;
        }
        col += w;
    }
    line.len()
}

fn render_preview(model: &Model, frame: &mut Frame, area: Rect, palette: &Palette) {
    let viewport = &model.viewport;
    let more = match (viewport.can_scroll_up(), viewport.can_scroll_down()) {
        (true, true) => " ▲▼",
        (true, false) => " ▲",
        (false, true) => " ▼",
        (false, false) => "",
    };
    let title = format!(" 미리보기 {}%{more} ", viewport.scroll_percent());
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.border))
        .padding(Padding::left(PREVIEW_LEFT_PADDING))
        .style(palette.base());

    let range = viewport.visible_range();
    let visible = model.document.visible_lines(range.start, range.len());
    let content: Vec<Line> = visible
        .iter()
        .map(|line| {
            let line_style = style_for_line_type(palette, line.line_type());
            match line.spans() {
                Some(spans) => Line::from(
                    spans
                        .iter()
                        .map(|span| {
                            Span::styled(
                                span.text().to_string(),
                                style_for_inline(palette, line_style, span.style()),
                            )
                        })
                        .collect::<Vec<_>>(),
                ),
                None => Line::styled(line.content().to_string(), line_style),
            }
        })
        .collect();

    frame.render_widget(Paragraph::new(content).block(block), area);
}

/// Calculate the width needed for line numbers.
pub const fn line_number_width(total_lines: usize) -> u16 {
    if total_lines < 10 {
        1
    } else if total_lines < 100 {
        2
    } else if total_lines < 1_000 {
        3
    } else if total_lines < 10_000 {
        4
    } else if total_lines < 100_000 {
        5
    } else {
        6
    }
}
