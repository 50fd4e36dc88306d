use std::path::PathBuf;

use crate::app::{Model, ToastLevel};
use crate::editor::{Direction, Snippet, snippets};
use crate::table::{DialogField, TableDialog};

/// Indentation inserted by the Tab key.
const TAB_INSERT: &str = "  ";

/// Cursor motions; each may extend the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    WordLeft,
    WordRight,
    DocStart,
    DocEnd,
}

/// All possible events and actions in the application.
///
/// These represent user input, system events, and internal actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // Editing
    /// Insert a character at the cursor
    InsertChar(char),
    /// Insert indentation (Tab)
    InsertTab,
    /// Bracketed paste, replacing any selection
    Paste(String),
    /// Split line at cursor (Enter)
    SplitLine,
    /// Delete selection or character before cursor (Backspace)
    DeleteBack,
    /// Delete selection or character at cursor (Delete)
    DeleteForward,
    /// Move the cursor, extending the selection when the flag is set
    Move(Motion, bool),
    /// Move cursor to a buffer position, e.g. from a mouse click or drag
    MoveTo {
        line: usize,
        col: usize,
        extend: bool,
    },
    SelectAll,
    /// Toolbar or shortcut insertion
    Snippet(Snippet),
    /// Scroll editor pane up by n lines
    EditorScrollUp(usize),
    /// Scroll editor pane down by n lines
    EditorScrollDown(usize),

    // Preview
    PreviewScrollUp(usize),
    PreviewScrollDown(usize),
    PreviewPageUp,
    PreviewPageDown,

    // Table dialog
    OpenTableDialog,
    CloseTableDialog,
    DialogFocus(DialogField),
    DialogFocusNext,
    DialogFocusPrev,
    DialogInput(char),
    DialogBackspace,
    DialogToggleHeader,
    /// Cycle alignment forward (`true`) or backward
    DialogCycleAlign(bool),
    /// Splice the generated table at the cursor and close the dialog
    InsertTable,

    /// Flip light/dark and persist the choice
    ToggleTheme,

    // Files
    /// Write `document_<date>.md` to the output directory
    SaveMarkdown,
    /// Write `document.html` to the output directory
    ExportHtml,
    /// Show the open-file prompt
    OpenPrompt,
    PromptInput(char),
    PromptBackspace,
    PromptCancel,
    /// Replace the buffer with a file's contents
    OpenFile(PathBuf),

    /// Toggle help overlay
    ToggleHelp,
    /// Hide help overlay
    HideHelp,
    /// Terminal resized
    Resize(u16, u16),
    /// Quit the application
    Quit,
}

impl Message {
    /// Whether the message can change the cursor or the text.
    const fn touches_cursor(&self) -> bool {
        matches!(
            self,
            Self::InsertChar(_)
                | Self::InsertTab
                | Self::Paste(_)
                | Self::SplitLine
                | Self::DeleteBack
                | Self::DeleteForward
                | Self::Move(..)
                | Self::MoveTo { .. }
                | Self::SelectAll
                | Self::Snippet(_)
                | Self::InsertTable
        )
    }
}

/// Pure function that updates the model based on a message.
///
/// This is the core of TEA - all state transitions happen here.
/// File and store I/O happen afterwards in the side-effect handler.
pub fn update(mut model: Model, msg: Message) -> Model {
    // A second Quit only counts if nothing happened in between.
    if !matches!(msg, Message::Quit) {
        model.quit_confirmed = false;
    }
    let moves_cursor = msg.touches_cursor();

    match msg {
        // Editing
        Message::InsertChar(ch) => model.buffer.insert_char(ch),
        Message::InsertTab => model.buffer.insert_str(TAB_INSERT),
        Message::Paste(text) => model.buffer.insert_str(&text),
        Message::SplitLine => model.buffer.split_line(),
        Message::DeleteBack => {
            model.buffer.delete_back();
        }
        Message::DeleteForward => {
            model.buffer.delete_forward();
        }
        Message::Move(motion, extend) => {
            model.buffer.set_selecting(extend);
            apply_motion(&mut model, motion);
        }
        Message::MoveTo { line, col, extend } => {
            model.buffer.set_selecting(extend);
            model.buffer.move_to(line, col);
        }
        Message::SelectAll => model.buffer.select_all(),
        Message::Snippet(snippet) => snippets::apply(&mut model.buffer, snippet),
        Message::EditorScrollUp(n) => {
            model.editor_scroll = model.editor_scroll.saturating_sub(n);
        }
        Message::EditorScrollDown(n) => model.scroll_editor_down(n),

        // Preview
        Message::PreviewScrollUp(n) => model.viewport.scroll_up(n),
        Message::PreviewScrollDown(n) => model.viewport.scroll_down(n),
        Message::PreviewPageUp => model.viewport.page_up(),
        Message::PreviewPageDown => model.viewport.page_down(),

        // Table dialog
        Message::OpenTableDialog => {
            model.table_dialog = Some(TableDialog::new());
            tracing::debug!("table dialog opened");
        }
        Message::CloseTableDialog => {
            model.table_dialog = None;
        }
        Message::DialogFocus(field) => with_dialog(&mut model, |d| d.set_focus(field)),
        Message::DialogFocusNext => with_dialog(&mut model, TableDialog::focus_next),
        Message::DialogFocusPrev => with_dialog(&mut model, TableDialog::focus_prev),
        Message::DialogInput(ch) => with_dialog(&mut model, |d| {
            d.input_char(ch);
        }),
        Message::DialogBackspace => with_dialog(&mut model, |d| {
            d.backspace();
        }),
        Message::DialogToggleHeader => with_dialog(&mut model, |d| {
            d.set_focus(DialogField::Header);
            d.toggle_header();
        }),
        Message::DialogCycleAlign(forward) => with_dialog(&mut model, |d| {
            d.set_focus(DialogField::Align);
            d.cycle_align(forward);
        }),
        Message::InsertTable => {
            if let Some(dialog) = model.table_dialog.take() {
                let spec = dialog.spec();
                model.buffer.clear_selection();
                model.buffer.insert_str(&dialog.markdown());
                tracing::info!(
                    rows = spec.rows(),
                    cols = spec.cols(),
                    header = spec.has_header,
                    "table inserted"
                );
            }
        }

        Message::ToggleTheme => {
            model.theme.toggle();
        }

        // Files
        Message::OpenPrompt => {
            model.open_prompt = Some(String::new());
        }
        Message::PromptInput(ch) => {
            if let Some(input) = model.open_prompt.as_mut() {
                input.push(ch);
            }
        }
        Message::PromptBackspace => {
            if let Some(input) = model.open_prompt.as_mut() {
                input.pop();
            }
        }
        Message::PromptCancel | Message::OpenFile(_) => {
            model.open_prompt = None;
        }
        // Written out by the side-effect handler
        Message::SaveMarkdown | Message::ExportHtml => {}

        Message::ToggleHelp => {
            model.help_visible = !model.help_visible;
        }
        Message::HideHelp => {
            model.help_visible = false;
        }
        Message::Resize(width, height) => model.resize(width, height),
        Message::Quit => {
            if model.buffer.is_dirty() && !model.quit_confirmed {
                model.show_toast(
                    ToastLevel::Warning,
                    "저장하지 않은 변경이 있습니다. 다시 누르면 종료합니다 (내용은 자동 보관됨)",
                );
                model.quit_confirmed = true;
                return model;
            }
            model.should_quit = true;
        }
    }

    if moves_cursor {
        model.refresh_preview();
        model.ensure_cursor_visible();
        model.sync_preview_to_cursor();
    }

    model
}

fn apply_motion(model: &mut Model, motion: Motion) {
    let buffer = &mut model.buffer;
    match motion {
        Motion::Left => buffer.move_cursor(Direction::Left),
        Motion::Right => buffer.move_cursor(Direction::Right),
        Motion::Up => buffer.move_cursor(Direction::Up),
        Motion::Down => buffer.move_cursor(Direction::Down),
        Motion::Home => buffer.move_home(),
        Motion::End => buffer.move_end(),
        Motion::WordLeft => buffer.move_word_left(),
        Motion::WordRight => buffer.move_word_right(),
        Motion::DocStart => buffer.move_to_start(),
        Motion::DocEnd => buffer.move_to_end(),
    }
}

fn with_dialog(model: &mut Model, edit: impl FnOnce(&mut TableDialog)) {
    if let Some(dialog) = model.table_dialog.as_mut() {
        edit(dialog);
    }
}
