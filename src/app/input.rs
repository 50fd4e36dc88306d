use std::path::PathBuf;

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::Frame;
use ratatui::layout::Rect;

use crate::app::update::Motion;
use crate::app::{App, Message, Model};
use crate::editor::{Snippet, Template, Wrap};
use crate::table::DialogField;
use crate::ui::toolbar::{ToolbarAction, toolbar_hit};
use crate::ui::{DialogHit, point_in_rect, table_dialog_hit, table_dialog_layout};

/// Lines moved per mouse wheel notch or Alt+arrow.
const SCROLL_STEP: usize = 3;

impl App {
    pub(super) fn handle_event(event: &Event, model: &Model) -> Option<Message> {
        match event {
            Event::Key(key) => Self::handle_key(*key, model),
            Event::Mouse(mouse) => Self::handle_mouse(*mouse, model),
            Event::Resize(w, h) => Some(Message::Resize(*w, *h)),
            Event::Paste(text) => Some(Message::Paste(text.replace("\r\n", "\n"))),
            _ => None,
        }
    }

    pub(super) fn handle_key(key: KeyEvent, model: &Model) -> Option<Message> {
        if key.kind == KeyEventKind::Release {
            return None;
        }
        if model.help_visible {
            return match key.code {
                KeyCode::F(1) => Some(Message::ToggleHelp),
                _ => Some(Message::HideHelp),
            };
        }
        if let Some(input) = model.open_prompt.as_deref() {
            return prompt_key(key, input);
        }
        if let Some(dialog) = model.table_dialog.as_ref() {
            return dialog_key(key, dialog.focus());
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);
        let shift = key.modifiers.contains(KeyModifiers::SHIFT);

        if ctrl && !alt {
            if let KeyCode::Char(c) = key.code {
                return ctrl_shortcut(c.to_ascii_lowercase());
            }
        }
        if alt && !ctrl {
            match key.code {
                KeyCode::Char(c) => return alt_shortcut(c.to_ascii_lowercase()),
                KeyCode::Up => return Some(Message::PreviewScrollUp(SCROLL_STEP)),
                KeyCode::Down => return Some(Message::PreviewScrollDown(SCROLL_STEP)),
                _ => {}
            }
        }

        let motion = |m: Motion| Some(Message::Move(m, shift));
        match key.code {
            KeyCode::F(1) => Some(Message::ToggleHelp),
            KeyCode::PageUp => Some(Message::PreviewPageUp),
            KeyCode::PageDown => Some(Message::PreviewPageDown),

            KeyCode::Left if ctrl => motion(Motion::WordLeft),
            KeyCode::Right if ctrl => motion(Motion::WordRight),
            KeyCode::Home if ctrl => motion(Motion::DocStart),
            KeyCode::End if ctrl => motion(Motion::DocEnd),
            KeyCode::Left => motion(Motion::Left),
            KeyCode::Right => motion(Motion::Right),
            KeyCode::Up => motion(Motion::Up),
            KeyCode::Down => motion(Motion::Down),
            KeyCode::Home => motion(Motion::Home),
            KeyCode::End => motion(Motion::End),

            KeyCode::Enter => Some(Message::SplitLine),
            KeyCode::Backspace => Some(Message::DeleteBack),
            KeyCode::Delete => Some(Message::DeleteForward),
            KeyCode::Tab => Some(Message::InsertTab),
            KeyCode::Char(c) if !ctrl && !alt => Some(Message::InsertChar(c)),
            _ => None,
        }
    }

    pub(super) fn handle_mouse(mouse: MouseEvent, model: &Model) -> Option<Message> {
        let screen = Rect::new(0, 0, model.size.0, model.size.1);
        let left_down = matches!(mouse.kind, MouseEventKind::Down(MouseButton::Left));

        if model.help_visible {
            return left_down.then_some(Message::HideHelp);
        }
        if model.open_prompt.is_some() {
            return None;
        }
        if model.table_dialog.is_some() {
            if !left_down {
                return None;
            }
            let layout = table_dialog_layout(screen);
            return match table_dialog_hit(&layout, mouse.column, mouse.row) {
                DialogHit::Outside | DialogHit::Field(DialogField::Cancel) => {
                    Some(Message::CloseTableDialog)
                }
                DialogHit::Field(DialogField::Insert) => Some(Message::InsertTable),
                DialogHit::Field(DialogField::Header) => Some(Message::DialogToggleHeader),
                DialogHit::Field(DialogField::Align) => Some(Message::DialogCycleAlign(true)),
                DialogHit::Field(field) => Some(Message::DialogFocus(field)),
                DialogHit::Inside => None,
            };
        }

        let layout = model.layout();
        let editor = layout.editor_inner();
        let in_editor = point_in_rect(mouse.column, mouse.row, editor);
        let in_preview = point_in_rect(mouse.column, mouse.row, layout.preview);

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(action) =
                    toolbar_hit(layout.toolbar, model.theme.icons(), mouse.column, mouse.row)
                {
                    return Some(message_for_toolbar(action));
                }
                in_editor.then(|| editor_click(model, editor, mouse.column, mouse.row, false))
            }
            MouseEventKind::Drag(MouseButton::Left) if in_editor => {
                Some(editor_click(model, editor, mouse.column, mouse.row, true))
            }
            MouseEventKind::ScrollUp if in_editor => Some(Message::EditorScrollUp(SCROLL_STEP)),
            MouseEventKind::ScrollDown if in_editor => {
                Some(Message::EditorScrollDown(SCROLL_STEP))
            }
            MouseEventKind::ScrollUp if in_preview => Some(Message::PreviewScrollUp(SCROLL_STEP)),
            MouseEventKind::ScrollDown if in_preview => {
                Some(Message::PreviewScrollDown(SCROLL_STEP))
            }
            _ => None,
        }
    }

    pub(super) fn view(model: &Model, frame: &mut Frame) {
        crate::ui::render(model, frame);
    }
}

fn ctrl_shortcut(c: char) -> Option<Message> {
    match c {
        's' => Some(Message::SaveMarkdown),
        'o' => Some(Message::OpenPrompt),
        'e' => Some(Message::ExportHtml),
        'b' => Some(Message::Snippet(Snippet::Wrap(Wrap::Bold))),
        'i' => Some(Message::Snippet(Snippet::Wrap(Wrap::Italic))),
        'k' => Some(Message::Snippet(Snippet::Link)),
        't' => Some(Message::OpenTableDialog),
        'd' => Some(Message::ToggleTheme),
        'a' => Some(Message::SelectAll),
        'q' | 'c' => Some(Message::Quit),
        _ => None,
    }
}

fn alt_shortcut(c: char) -> Option<Message> {
    let snippet = match c {
        'i' => Snippet::Wrap(Wrap::Italic),
        's' => Snippet::Wrap(Wrap::Strikethrough),
        'c' => Snippet::Wrap(Wrap::InlineCode),
        'm' => Snippet::Image,
        'f' => Snippet::Template(Template::CodeFence),
        'h' => Snippet::Template(Template::Math),
        'n' => Snippet::Template(Template::Footnote),
        'd' => Snippet::Template(Template::Details),
        'r' => Snippet::Template(Template::HorizontalRule),
        'q' => Snippet::Template(Template::Quote),
        't' => Snippet::Template(Template::Table),
        _ => return None,
    };
    Some(Message::Snippet(snippet))
}

fn prompt_key(key: KeyEvent, input: &str) -> Option<Message> {
    let plain = !key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);
    match key.code {
        KeyCode::Esc => Some(Message::PromptCancel),
        KeyCode::Enter => {
            let path = input.trim();
            if path.is_empty() {
                Some(Message::PromptCancel)
            } else {
                Some(Message::OpenFile(PathBuf::from(path)))
            }
        }
        KeyCode::Backspace => Some(Message::PromptBackspace),
        KeyCode::Char(c) if plain => Some(Message::PromptInput(c)),
        _ => None,
    }
}

fn dialog_key(key: KeyEvent, focus: DialogField) -> Option<Message> {
    let activate = || match focus {
        DialogField::Cancel => Message::CloseTableDialog,
        _ => Message::InsertTable,
    };
    match key.code {
        KeyCode::Esc => Some(Message::CloseTableDialog),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(Message::CloseTableDialog)
        }
        KeyCode::Tab | KeyCode::Down => Some(Message::DialogFocusNext),
        KeyCode::BackTab | KeyCode::Up => Some(Message::DialogFocusPrev),
        KeyCode::Enter => Some(activate()),
        KeyCode::Char(' ') => Some(match focus {
            DialogField::Insert | DialogField::Cancel => activate(),
            DialogField::Align => Message::DialogCycleAlign(true),
            DialogField::Rows | DialogField::Cols | DialogField::Header => {
                Message::DialogToggleHeader
            }
        }),
        KeyCode::Left if focus == DialogField::Align => Some(Message::DialogCycleAlign(false)),
        KeyCode::Right if focus == DialogField::Align => Some(Message::DialogCycleAlign(true)),
        KeyCode::Backspace if focus.is_text() => Some(Message::DialogBackspace),
        KeyCode::Char(c) if focus.is_text() => Some(Message::DialogInput(c)),
        _ => None,
    }
}

pub(super) const fn message_for_toolbar(action: ToolbarAction) -> Message {
    match action {
        ToolbarAction::Bold => Message::Snippet(Snippet::Wrap(Wrap::Bold)),
        ToolbarAction::Italic => Message::Snippet(Snippet::Wrap(Wrap::Italic)),
        ToolbarAction::Strikethrough => Message::Snippet(Snippet::Wrap(Wrap::Strikethrough)),
        ToolbarAction::InlineCode => Message::Snippet(Snippet::Wrap(Wrap::InlineCode)),
        ToolbarAction::Link => Message::Snippet(Snippet::Link),
        ToolbarAction::Image => Message::Snippet(Snippet::Image),
        ToolbarAction::Table => Message::OpenTableDialog,
        ToolbarAction::CodeFence => Message::Snippet(Snippet::Template(Template::CodeFence)),
        ToolbarAction::Math => Message::Snippet(Snippet::Template(Template::Math)),
        ToolbarAction::Footnote => Message::Snippet(Snippet::Template(Template::Footnote)),
        ToolbarAction::Details => Message::Snippet(Snippet::Template(Template::Details)),
        ToolbarAction::HorizontalRule => {
            Message::Snippet(Snippet::Template(Template::HorizontalRule))
        }
        ToolbarAction::Quote => Message::Snippet(Snippet::Template(Template::Quote)),
        ToolbarAction::Save => Message::SaveMarkdown,
        ToolbarAction::Open => Message::OpenPrompt,
        ToolbarAction::Export => Message::ExportHtml,
        ToolbarAction::Theme => Message::ToggleTheme,
        ToolbarAction::Help => Message::ToggleHelp,
    }
}

/// Buffer position under a click in the editor text area.
fn editor_click(model: &Model, editor: Rect, column: u16, row: u16, extend: bool) -> Message {
    let geometry = crate::ui::editor_geometry(&model.buffer, model.editor_scroll, editor);
    let last_line = model.buffer.line_count().saturating_sub(1);
    let line = (geometry.scroll + usize::from(row - editor.y)).min(last_line);
    let text = model.buffer.line_at(line).unwrap_or_default();
    let col = if column < geometry.text.x {
        0
    } else {
        let x = usize::from(column - geometry.text.x) + geometry.hscroll;
        crate::ui::byte_col_at(&text, x)
    };
    Message::MoveTo { line, col, extend }
}
