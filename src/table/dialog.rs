use super::{
    Alignment, MAX_DIMENSION, PreviewGrid, TableSpec, compute_preview_grid, serialize_table,
};

/// Longest text a rows/cols field holds: the digits of [`MAX_DIMENSION`].
const MAX_INPUT_LEN: usize = 3;

/// Focusable controls of the table dialog, in Tab order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DialogField {
    #[default]
    Rows,
    Cols,
    Header,
    Align,
    Insert,
    Cancel,
}

impl DialogField {
    const ORDER: [Self; 6] = [
        Self::Rows,
        Self::Cols,
        Self::Header,
        Self::Align,
        Self::Insert,
        Self::Cancel,
    ];

    fn index(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    #[must_use]
    pub fn next(self) -> Self {
        Self::ORDER[(self.index() + 1) % Self::ORDER.len()]
    }

    #[must_use]
    pub fn prev(self) -> Self {
        Self::ORDER[(self.index() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }

    pub const fn is_text(self) -> bool {
        matches!(self, Self::Rows | Self::Cols)
    }
}

/// State of an open insert-table dialog.
///
/// The dialog only exists while open; closing it drops the value. Every
/// field edit rebuilds the preview grid before returning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDialog {
    rows_input: String,
    cols_input: String,
    has_header: bool,
    align: Alignment,
    focus: DialogField,
    grid: PreviewGrid,
}

impl TableDialog {
    pub fn new() -> Self {
        let mut dialog = Self {
            rows_input: "3".to_string(),
            cols_input: "3".to_string(),
            has_header: true,
            align: Alignment::Left,
            focus: DialogField::Rows,
            grid: PreviewGrid::default(),
        };
        dialog.recompute();
        dialog
    }

    pub fn rows_input(&self) -> &str {
        &self.rows_input
    }

    pub fn cols_input(&self) -> &str {
        &self.cols_input
    }

    pub const fn has_header(&self) -> bool {
        self.has_header
    }

    pub const fn align(&self) -> Alignment {
        self.align
    }

    pub const fn focus(&self) -> DialogField {
        self.focus
    }

    pub const fn grid(&self) -> &PreviewGrid {
        &self.grid
    }

    /// The normalized spec for the current field values.
    pub fn spec(&self) -> TableSpec {
        TableSpec::from_input(&self.rows_input, &self.cols_input, self.has_header, self.align)
    }

    /// Markdown that insertion would splice into the buffer.
    pub fn markdown(&self) -> String {
        serialize_table(&self.spec())
    }

    pub const fn set_focus(&mut self, field: DialogField) {
        self.focus = field;
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }

    /// Type into the focused rows/cols field.
    ///
    /// Only characters a number input would accept are kept, and a field
    /// stops growing at [`MAX_INPUT_LEN`] characters. Returns `false` when
    /// the keystroke was ignored.
    pub fn input_char(&mut self, ch: char) -> bool {
        if !(ch.is_ascii_digit() || ch == '-') {
            return false;
        }
        let Some(field) = self.focused_text_mut() else {
            return false;
        };
        if field.len() >= MAX_INPUT_LEN {
            return false;
        }
        field.push(ch);
        self.recompute();
        true
    }

    pub fn backspace(&mut self) -> bool {
        let Some(field) = self.focused_text_mut() else {
            return false;
        };
        if field.pop().is_none() {
            return false;
        }
        self.recompute();
        true
    }

    pub fn toggle_header(&mut self) {
        self.has_header = !self.has_header;
        self.recompute();
    }

    pub fn cycle_align(&mut self, forward: bool) {
        self.align = if forward {
            self.align.next()
        } else {
            self.align.prev()
        };
        self.recompute();
    }

    fn focused_text_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            DialogField::Rows => Some(&mut self.rows_input),
            DialogField::Cols => Some(&mut self.cols_input),
            _ => None,
        }
    }

    fn recompute(&mut self) {
        self.grid = compute_preview_grid(&self.spec());
    }
}

impl Default for TableDialog {
    fn default() -> Self {
        Self::new()
    }
}
