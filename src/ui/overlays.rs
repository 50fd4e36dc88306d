use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::app::Model;
use crate::table::{Alignment, DialogField, TableDialog};

use super::point_in_rect;
use super::style::Palette;

const INSERT_LABEL: &str = "[ 삽입 ]";
const CANCEL_LABEL: &str = "[ 취소 ]";

/// Regions of the insert-table dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialogLayout {
    pub popup: Rect,
    pub rows: Rect,
    pub cols: Rect,
    pub header: Rect,
    pub align: Rect,
    pub grid: Rect,
    pub insert: Rect,
    pub cancel: Rect,
}

/// Where a click landed relative to the dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogHit {
    Field(DialogField),
    Inside,
    /// On the backdrop.
    Outside,
}

pub fn table_dialog_layout(area: Rect) -> DialogLayout {
    let popup = centered_popup_rect(64, 22, area);
    let inner = Rect::new(
        popup.x + 2,
        popup.y + 1,
        popup.width.saturating_sub(4),
        popup.height.saturating_sub(2),
    );
    let line = |offset: u16| {
        let y = (inner.y + offset).min(inner.y + inner.height.saturating_sub(1));
        Rect::new(inner.x, y, inner.width, 1)
    };
    let button_y = inner.y + inner.height.saturating_sub(1);
    #[allow(clippy::cast_possible_truncation)]
    let button_width = INSERT_LABEL.width() as u16;
    DialogLayout {
        popup,
        rows: line(1),
        cols: line(2),
        header: line(3),
        align: line(4),
        grid: Rect::new(
            inner.x,
            inner.y + 6,
            inner.width,
            inner.height.saturating_sub(8),
        ),
        insert: Rect::new(inner.x, button_y, button_width.min(inner.width), 1),
        cancel: Rect::new(
            inner.x + button_width + 2,
            button_y,
            button_width.min(inner.width.saturating_sub(button_width + 2)),
            1,
        ),
    }
}

pub fn table_dialog_hit(layout: &DialogLayout, col: u16, row: u16) -> DialogHit {
    if !point_in_rect(col, row, layout.popup) {
        return DialogHit::Outside;
    }
    let fields = [
        (layout.rows, DialogField::Rows),
        (layout.cols, DialogField::Cols),
        (layout.header, DialogField::Header),
        (layout.align, DialogField::Align),
        (layout.insert, DialogField::Insert),
        (layout.cancel, DialogField::Cancel),
    ];
    fields
        .into_iter()
        .find(|(rect, _)| point_in_rect(col, row, *rect))
        .map_or(DialogHit::Inside, |(_, field)| DialogHit::Field(field))
}

pub fn render_table_dialog(model: &Model, frame: &mut Frame, area: Rect) {
    let Some(dialog) = model.table_dialog.as_ref() else {
        return;
    };
    let palette = Palette::for_theme(model.theme.theme());
    let layout = table_dialog_layout(area);
    let base = Style::default().bg(palette.dialog_bg).fg(palette.fg);
    let focused = |field: DialogField| {
        if dialog.focus() == field {
            base.bg(palette.selection_bg).add_modifier(Modifier::BOLD)
        } else {
            base
        }
    };

    let block = Block::default()
        .title(" 표 삽입 ")
        .borders(Borders::ALL)
        .border_style(base.fg(palette.accent))
        .style(base);
    frame.render_widget(Clear, layout.popup);
    frame.render_widget(block, layout.popup);

    let text_field = |label: &str, value: &str, field: DialogField| {
        Line::from(vec![
            Span::styled(format!("{label:<6}"), base),
            Span::styled(format!(" {value:<6}"), focused(field)),
        ])
    };
    frame.render_widget(
        Paragraph::new(text_field("행", dialog.rows_input(), DialogField::Rows)),
        layout.rows,
    );
    frame.render_widget(
        Paragraph::new(text_field("열", dialog.cols_input(), DialogField::Cols)),
        layout.cols,
    );

    let check = if dialog.has_header() { "[x]" } else { "[ ]" };
    frame.render_widget(
        Paragraph::new(Span::styled(
            format!("{check} 머리글 행"),
            focused(DialogField::Header),
        )),
        layout.header,
    );
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("정렬   ", base),
            Span::styled(
                format!("◀ {} ▶", dialog.align().label()),
                focused(DialogField::Align),
            ),
        ])),
        layout.align,
    );

    let grid = grid_lines(dialog, &palette, base, layout.grid.height as usize);
    frame.render_widget(Paragraph::new(grid).style(base), layout.grid);

    frame.render_widget(
        Paragraph::new(Span::styled(INSERT_LABEL, focused(DialogField::Insert))),
        layout.insert,
    );
    frame.render_widget(
        Paragraph::new(Span::styled(CANCEL_LABEL, focused(DialogField::Cancel))),
        layout.cancel,
    );
}

/// The live preview grid, one line per table row.
fn grid_lines(
    dialog: &TableDialog,
    palette: &Palette,
    base: Style,
    max_rows: usize,
) -> Vec<Line<'static>> {
    let grid = dialog.grid();
    let cell_width = grid
        .cells()
        .iter()
        .map(|cell| cell.label.width())
        .max()
        .unwrap_or(0);
    let total_rows = grid.rows().count();
    let shown = if total_rows > max_rows {
        max_rows.saturating_sub(1)
    } else {
        total_rows
    };

    let mut lines: Vec<Line<'static>> = grid
        .rows()
        .take(shown)
        .map(|row| {
            let mut spans = vec![Span::styled("│", base.fg(palette.border))];
            for cell in row {
                let style = if cell.is_header {
                    base.bg(palette.header_cell_bg).add_modifier(Modifier::BOLD)
                } else {
                    base
                };
                spans.push(Span::styled(
                    format!(" {} ", align_label(&cell.label, cell_width, dialog.align())),
                    style,
                ));
                spans.push(Span::styled("│", base.fg(palette.border)));
            }
            Line::from(spans)
        })
        .collect();
    if shown < total_rows {
        lines.push(Line::styled(
            format!("… 외 {}행", total_rows - shown),
            base.fg(palette.dim),
        ));
    }
    lines
}

fn align_label(label: &str, width: usize, align: Alignment) -> String {
    let pad = width.saturating_sub(label.width());
    match align {
        Alignment::Left => format!("{label}{}", " ".repeat(pad)),
        Alignment::Right => format!("{}{label}", " ".repeat(pad)),
        Alignment::Center => {
            let left = pad / 2;
            format!("{}{label}{}", " ".repeat(left), " ".repeat(pad - left))
        }
    }
}

pub fn render_open_prompt(model: &Model, frame: &mut Frame, area: Rect) {
    let Some(input) = model.open_prompt.as_deref() else {
        return;
    };
    let palette = Palette::for_theme(model.theme.theme());
    let base = Style::default().bg(palette.dialog_bg).fg(palette.fg);
    let popup = centered_popup_rect(64, 6, area);

    let lines = vec![
        Line::from(vec![
            Span::styled("경로: ", base.add_modifier(Modifier::BOLD)),
            Span::styled(input.to_string(), base),
            Span::styled(" ", base.bg(palette.fg)),
        ]),
        Line::raw(""),
        Line::styled("Enter 열기 · Esc 취소", base.fg(palette.dim)),
    ];
    let block = Block::default()
        .title(" 파일 열기 ")
        .borders(Borders::ALL)
        .border_style(base.fg(palette.accent))
        .padding(Padding::horizontal(1))
        .style(base);
    frame.render_widget(Clear, popup);
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}

pub fn render_help_overlay(model: &Model, frame: &mut Frame, area: Rect) {
    let palette = Palette::for_theme(model.theme.theme());
    let base = Style::default().bg(palette.dialog_bg).fg(palette.fg);
    let section = base.fg(palette.accent).add_modifier(Modifier::BOLD);
    let popup = centered_popup_rect(
        area.width.saturating_sub(8).max(44),
        area.height.saturating_sub(4).max(12),
        area,
    );

    let global_cfg = model
        .config_global_path
        .as_ref()
        .map_or_else(|| "<없음>".to_string(), |p| p.display().to_string());
    let local_cfg = model
        .config_local_path
        .as_ref()
        .map_or_else(|| "<없음>".to_string(), |p| p.display().to_string());

    let entry = |keys: &str, what: &str| Line::styled(format!("  {keys:<18}{what}"), base);
    let lines = vec![
        Line::styled("서식", section),
        entry("Ctrl+B", "굵게"),
        entry("Ctrl+I / Alt+I", "기울임"),
        entry("Alt+S", "취소선"),
        entry("Alt+C", "인라인 코드"),
        entry("Ctrl+K / Alt+M", "링크 / 이미지"),
        Line::raw(""),
        Line::styled("삽입", section),
        entry("Ctrl+T", "표 만들기"),
        entry("Alt+T", "표 틀"),
        entry("Alt+F", "코드 블록"),
        entry("Alt+H", "수식"),
        entry("Alt+N", "각주"),
        entry("Alt+D", "접기 영역"),
        entry("Alt+R / Alt+Q", "구분선 / 인용"),
        Line::raw(""),
        Line::styled("파일", section),
        entry("Ctrl+S", "마크다운 저장"),
        entry("Ctrl+O", "파일 열기"),
        entry("Ctrl+E", "HTML 내보내기"),
        Line::raw(""),
        Line::styled("기타", section),
        entry("Ctrl+D", "라이트/다크 전환"),
        entry("PageUp/PageDown", "미리보기 스크롤"),
        entry("Alt+↑ / Alt+↓", "미리보기 세 줄 이동"),
        entry("Shift+방향키", "선택"),
        entry("Ctrl+A", "전체 선택"),
        entry("Ctrl+Q", "종료"),
        entry("F1", "도움말"),
        Line::raw(""),
        Line::styled("설정", section),
        Line::styled(format!("  전역: {global_cfg}"), base),
        Line::styled(format!("  로컬: {local_cfg}"), base),
        Line::styled(
            format!("  저장 위치: {}", model.output_dir.display()),
            base,
        ),
    ];

    let block = Block::default()
        .title(" 도움말 (아무 키나 누르면 닫힘) ")
        .borders(Borders::ALL)
        .border_style(base.fg(palette.accent))
        .padding(Padding::uniform(1))
        .style(base);
    frame.render_widget(Clear, popup);
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}

fn centered_popup_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(w) / 2);
    let y = area.y + (area.height.saturating_sub(h) / 2);
    Rect::new(x, y, w, h)
}
