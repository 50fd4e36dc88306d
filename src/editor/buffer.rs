use ropey::Rope;

/// Cursor position in the editor buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    /// Zero-based line index.
    pub line: usize,
    /// Zero-based column (byte offset within the line).
    pub col: usize,
    /// Remembered column for vertical movement (sticky column).
    col_memory: usize,
}

impl Cursor {
    /// Create a cursor at line 0, column 0.
    pub const fn new() -> Self {
        Self {
            line: 0,
            col: 0,
            col_memory: 0,
        }
    }

    /// Create a cursor at a specific position.
    pub const fn at(line: usize, col: usize) -> Self {
        Self {
            line,
            col,
            col_memory: col,
        }
    }

    /// Update column and reset column memory to match.
    const fn set_col(&mut self, col: usize) {
        self.col = col;
        self.col_memory = col;
    }

    const fn key(self) -> (usize, usize) {
        (self.line, self.col)
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Self::new()
    }
}

/// Direction for cursor movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// A text buffer backed by a rope data structure.
///
/// Besides the cursor the buffer tracks an optional selection anchor and a
/// revision number. Every mutation bumps the revision, which is how the rest
/// of the app notices that the text changed.
pub struct EditorBuffer {
    rope: Rope,
    cursor: Cursor,
    anchor: Option<Cursor>,
    dirty: bool,
    revision: u64,
}

impl EditorBuffer {
    /// Create a new buffer from a string.
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            cursor: Cursor::new(),
            anchor: None,
            dirty: false,
            revision: 0,
        }
    }

    /// Create an empty buffer.
    pub fn empty() -> Self {
        Self::from_text("")
    }

    /// The current cursor position.
    pub const fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Whether the buffer has been modified since creation or last save.
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Mark the buffer as clean (e.g., after saving).
    pub const fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Monotonic change counter.
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Total number of lines in the buffer.
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Get the content of a line (without trailing newline).
    pub fn line_at(&self, line_idx: usize) -> Option<String> {
        if line_idx >= self.rope.len_lines() {
            return None;
        }
        let s = self.rope.line(line_idx).to_string();
        Some(s.trim_end_matches('\n').trim_end_matches('\r').to_string())
    }

    /// Length of a line in bytes (without trailing newline).
    pub fn line_len(&self, line_idx: usize) -> usize {
        self.line_at(line_idx).map_or(0, |s| s.len())
    }

    /// The full text content of the buffer.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    /// Replace the whole text, moving the cursor to the start.
    pub fn set_text(&mut self, text: &str) {
        self.rope = Rope::from_str(text);
        self.cursor = Cursor::new();
        self.anchor = None;
        self.touch();
    }

    // --- Selection ---

    /// Ordered `(start, end)` of the selection, or `None` when nothing is
    /// selected. An anchor equal to the cursor is no selection.
    pub fn selection(&self) -> Option<(Cursor, Cursor)> {
        let anchor = self.anchor?;
        match anchor.key().cmp(&self.cursor.key()) {
            std::cmp::Ordering::Less => Some((anchor, self.cursor)),
            std::cmp::Ordering::Greater => Some((self.cursor, anchor)),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn has_selection(&self) -> bool {
        self.selection().is_some()
    }

    pub fn selected_text(&self) -> Option<String> {
        let (start, end) = self.selection()?;
        let range = self.char_idx_of(start)..self.char_idx_of(end);
        Some(self.rope.slice(range).to_string())
    }

    /// Start (or keep) a selection when `selecting`, otherwise drop it.
    ///
    /// Called before a movement so that Shift+arrow extends from where the
    /// cursor was.
    pub const fn set_selecting(&mut self, selecting: bool) {
        if selecting {
            if self.anchor.is_none() {
                self.anchor = Some(self.cursor);
            }
        } else {
            self.anchor = None;
        }
    }

    pub const fn clear_selection(&mut self) {
        self.anchor = None;
    }

    pub fn select_all(&mut self) {
        self.anchor = Some(Cursor::new());
        self.move_to_end();
    }

    /// Select the character range `start..end` (char offsets), leaving the
    /// cursor at `end`.
    pub fn select_chars(&mut self, start: usize, end: usize) {
        let len = self.rope.len_chars();
        self.anchor = Some(self.position_of(start.min(len)));
        self.cursor = self.position_of(end.min(len));
    }

    /// Replace the selection with `text`, or insert at the cursor when
    /// nothing is selected. The selection is cleared either way.
    pub fn replace_selection(&mut self, text: &str) {
        self.delete_selection();
        self.anchor = None;
        self.insert_str(text);
    }

    /// Delete the selected text. Returns `true` if anything was removed.
    pub fn delete_selection(&mut self) -> bool {
        let Some((start, end)) = self.selection() else {
            return false;
        };
        let start_idx = self.char_idx_of(start);
        let end_idx = self.char_idx_of(end);
        self.rope.remove(start_idx..end_idx);
        self.cursor = self.position_of(start_idx);
        self.anchor = None;
        self.touch();
        true
    }

    /// Place the cursor at a char offset, dropping any selection.
    pub fn move_to_offset(&mut self, char_idx: usize) {
        self.anchor = None;
        self.cursor = self.position_of(char_idx);
    }

    /// Char offset of the cursor from the start of the buffer.
    pub fn cursor_offset(&self) -> usize {
        self.char_idx_of(self.cursor)
    }

    // --- Editing ---

    /// Insert a character at the cursor, replacing any selection.
    pub fn insert_char(&mut self, ch: char) {
        self.delete_selection();
        let char_idx = self.cursor_offset();
        self.rope.insert_char(char_idx, ch);
        if ch == '\n' {
            self.cursor.line += 1;
            self.cursor.set_col(0);
        } else {
            self.cursor.set_col(self.cursor.col + ch.len_utf8());
        }
        self.touch();
    }

    /// Insert a string at the cursor, replacing any selection.
    pub fn insert_str(&mut self, s: &str) {
        if s.is_empty() {
            return;
        }
        self.delete_selection();
        let char_idx = self.cursor_offset();
        self.rope.insert(char_idx, s);
        self.cursor = self.position_of(char_idx + s.chars().count());
        self.touch();
    }

    /// Split the current line at the cursor (Enter key).
    pub fn split_line(&mut self) {
        self.insert_char('\n');
    }

    /// Delete the selection, or the character before the cursor (Backspace).
    ///
    /// Returns `true` if anything was deleted.
    pub fn delete_back(&mut self) -> bool {
        if self.delete_selection() {
            return true;
        }
        self.anchor = None;
        let char_idx = self.cursor_offset();
        if char_idx == 0 {
            return false;
        }
        self.rope.remove(char_idx - 1..char_idx);
        self.cursor = self.position_of(char_idx - 1);
        self.touch();
        true
    }

    /// Delete the selection, or the character at the cursor (Delete key).
    ///
    /// Returns `true` if anything was deleted.
    pub fn delete_forward(&mut self) -> bool {
        if self.delete_selection() {
            return true;
        }
        self.anchor = None;
        let char_idx = self.cursor_offset();
        if char_idx >= self.rope.len_chars() {
            return false;
        }
        self.rope.remove(char_idx..=char_idx);
        self.touch();
        true
    }

    // --- Movement ---

    /// Move the cursor in the given direction.
    pub fn move_cursor(&mut self, direction: Direction) {
        match direction {
            Direction::Left => self.move_left(),
            Direction::Right => self.move_right(),
            Direction::Up => self.move_up(),
            Direction::Down => self.move_down(),
        }
    }

    /// Move cursor to the beginning of the line (Home).
    pub const fn move_home(&mut self) {
        self.cursor.set_col(0);
    }

    /// Move cursor to the end of the line (End).
    pub fn move_end(&mut self) {
        let len = self.line_len(self.cursor.line);
        self.cursor.set_col(len);
    }

    /// Move cursor one word to the left (Ctrl+Left).
    pub fn move_word_left(&mut self) {
        if self.cursor.col == 0 {
            if self.cursor.line > 0 {
                self.cursor.line -= 1;
                self.cursor.set_col(self.line_len(self.cursor.line));
            }
            return;
        }

        let line = self.line_at(self.cursor.line).unwrap_or_default();
        let before = &line[..self.cursor.col.min(line.len())];
        let trimmed = before.trim_end();

        if trimmed.is_empty() {
            self.cursor.set_col(0);
            return;
        }

        let pos = trimmed
            .rfind(|c: char| !c.is_alphanumeric() && c != '_')
            .map_or(0, |i| i + trimmed[i..].chars().next().map_or(1, char::len_utf8));
        self.cursor.set_col(pos);
    }

    /// Move cursor one word to the right (Ctrl+Right).
    pub fn move_word_right(&mut self) {
        let line_len = self.line_len(self.cursor.line);

        if self.cursor.col >= line_len {
            if self.cursor.line + 1 < self.line_count() {
                self.cursor.line += 1;
                self.cursor.set_col(0);
            }
            return;
        }

        let line = self.line_at(self.cursor.line).unwrap_or_default();
        let after = &line[self.cursor.col..];

        let word_end = after
            .find(|c: char| !c.is_alphanumeric() && c != '_')
            .unwrap_or(after.len());

        let rest = &after[word_end..];
        let space_end = rest
            .find(|c: char| c.is_alphanumeric() || c == '_')
            .unwrap_or(rest.len());

        self.cursor.set_col(self.cursor.col + word_end + space_end);
    }

    /// Move cursor to a specific line and column.
    pub fn move_to(&mut self, line: usize, col: usize) {
        let max_line = self.line_count().saturating_sub(1);
        self.cursor.line = line.min(max_line);
        let max_col = self.line_len(self.cursor.line);
        self.cursor.set_col(self.floor_char_boundary(self.cursor.line, col.min(max_col)));
    }

    /// Move cursor to the start of the buffer (Ctrl+Home).
    pub const fn move_to_start(&mut self) {
        self.cursor.line = 0;
        self.cursor.set_col(0);
    }

    /// Move cursor to the end of the buffer (Ctrl+End).
    pub fn move_to_end(&mut self) {
        let last_line = self.line_count().saturating_sub(1);
        self.cursor.line = last_line;
        self.cursor.set_col(self.line_len(last_line));
    }

    // --- Private helpers ---

    const fn touch(&mut self) {
        self.dirty = true;
        self.revision += 1;
    }

    /// Convert a cursor position to a ropey char index.
    fn char_idx_of(&self, cursor: Cursor) -> usize {
        let line_idx = cursor.line.min(self.rope.len_lines().saturating_sub(1));
        let line_start = self.rope.line_to_char(line_idx);
        let line = self.rope.line(line_idx);
        let byte_col = cursor.col.min(line.len_bytes());
        line_start + line.byte_to_char(byte_col)
    }

    /// Convert a ropey char index to a cursor position.
    fn position_of(&self, char_idx: usize) -> Cursor {
        let char_idx = char_idx.min(self.rope.len_chars());
        let line = self.rope.char_to_line(char_idx);
        let line_start = self.rope.line_to_char(line);
        let col = self.rope.line(line).char_to_byte(char_idx - line_start);
        Cursor::at(line, col)
    }

    fn floor_char_boundary(&self, line_idx: usize, col: usize) -> usize {
        let line = self.line_at(line_idx).unwrap_or_default();
        let mut col = col.min(line.len());
        while col > 0 && !line.is_char_boundary(col) {
            col -= 1;
        }
        col
    }

    fn move_left(&mut self) {
        if self.cursor.col > 0 {
            let line = self.line_at(self.cursor.line).unwrap_or_default();
            let before = &line[..self.cursor.col.min(line.len())];
            let prev_char_len = before.chars().next_back().map_or(1, char::len_utf8);
            self.cursor.set_col(self.cursor.col - prev_char_len);
        } else if self.cursor.line > 0 {
            self.cursor.line -= 1;
            self.cursor.set_col(self.line_len(self.cursor.line));
        }
    }

    fn move_right(&mut self) {
        let line_len = self.line_len(self.cursor.line);
        if self.cursor.col < line_len {
            let line = self.line_at(self.cursor.line).unwrap_or_default();
            let next_char_len = line[self.cursor.col..]
                .chars()
                .next()
                .map_or(1, char::len_utf8);
            self.cursor.set_col(self.cursor.col + next_char_len);
        } else if self.cursor.line + 1 < self.line_count() {
            self.cursor.line += 1;
            self.cursor.set_col(0);
        }
    }

    fn move_up(&mut self) {
        if self.cursor.line > 0 {
            self.cursor.line -= 1;
            self.restore_col_memory();
        }
    }

    fn move_down(&mut self) {
        if self.cursor.line + 1 < self.line_count() {
            self.cursor.line += 1;
            self.restore_col_memory();
        }
    }

    fn restore_col_memory(&mut self) {
        let max_col = self.line_len(self.cursor.line);
        self.cursor.col =
            self.floor_char_boundary(self.cursor.line, self.cursor.col_memory.min(max_col));
    }
}

impl std::fmt::Debug for EditorBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorBuffer")
            .field(
                "rope",
                &format_args!("Rope({} lines)", self.rope.len_lines()),
            )
            .field("cursor", &self.cursor)
            .field("anchor", &self.anchor)
            .field("revision", &self.revision)
            .field("dirty", &self.dirty)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // --- Construction and basic queries ---

    #[test]
    fn test_empty_buffer_has_one_line() {
        let buf = EditorBuffer::empty();
        assert_eq!(buf.line_count(), 1);
        assert_eq!(buf.line_at(0), Some(String::new()));
    }

    #[test]
    fn test_from_text_trailing_newline() {
        let buf = EditorBuffer::from_text("hello\n");
        assert_eq!(buf.line_count(), 2);
        assert_eq!(buf.line_at(1), Some(String::new()));
    }

    #[test]
    fn test_line_at_out_of_bounds_returns_none() {
        let buf = EditorBuffer::from_text("hello");
        assert_eq!(buf.line_at(1), None);
    }

    // --- Revision and dirty tracking ---

    #[test]
    fn test_new_buffer_is_clean_at_revision_zero() {
        let buf = EditorBuffer::from_text("hello");
        assert!(!buf.is_dirty());
        assert_eq!(buf.revision(), 0);
    }

    #[test]
    fn test_every_mutation_bumps_revision() {
        let mut buf = EditorBuffer::from_text("hello");
        buf.insert_char('!');
        buf.split_line();
        buf.delete_back();
        buf.set_text("new");
        assert_eq!(buf.revision(), 4);
        assert!(buf.is_dirty());
    }

    #[test]
    fn test_noop_edits_keep_revision() {
        let mut buf = EditorBuffer::from_text("hello");
        buf.insert_str("");
        assert!(!buf.delete_back());
        buf.move_cursor(Direction::Right);
        assert_eq!(buf.revision(), 0);
    }

    #[test]
    fn test_set_text_resets_cursor_and_selection() {
        let mut buf = EditorBuffer::from_text("hello");
        buf.select_all();
        buf.set_text("안녕\n세상");
        assert_eq!(buf.cursor(), Cursor::at(0, 0));
        assert!(!buf.has_selection());
        assert_eq!(buf.text(), "안녕\n세상");
    }

    // --- Insertion ---

    #[test]
    fn test_insert_char_in_middle() {
        let mut buf = EditorBuffer::from_text("hllo");
        buf.move_cursor(Direction::Right);
        buf.insert_char('e');
        assert_eq!(buf.line_at(0), Some("hello".to_string()));
        assert_eq!(buf.cursor(), Cursor::at(0, 2));
    }

    #[test]
    fn test_insert_hangul_advances_by_bytes() {
        let mut buf = EditorBuffer::from_text("");
        buf.insert_char('한');
        buf.insert_char('글');
        assert_eq!(buf.cursor(), Cursor::at(0, 6));
        assert_eq!(buf.cursor_offset(), 2);
    }

    #[test]
    fn test_insert_str_multiline_moves_cursor_to_end() {
        let mut buf = EditorBuffer::from_text("ab");
        buf.move_to(0, 1);
        buf.insert_str("x\nyz");
        assert_eq!(buf.text(), "ax\nyzb");
        assert_eq!(buf.cursor(), Cursor::at(1, 2));
    }

    #[test]
    fn test_split_line_in_middle() {
        let mut buf = EditorBuffer::from_text("hello world");
        buf.move_to(0, 5);
        buf.split_line();
        assert_eq!(buf.line_at(0), Some("hello".to_string()));
        assert_eq!(buf.line_at(1), Some(" world".to_string()));
        assert_eq!(buf.cursor(), Cursor::at(1, 0));
    }

    // --- Deletion ---

    #[test]
    fn test_delete_back_joins_lines() {
        let mut buf = EditorBuffer::from_text("hello\nworld");
        buf.move_to(1, 0);
        buf.delete_back();
        assert_eq!(buf.line_at(0), Some("helloworld".to_string()));
        assert_eq!(buf.cursor(), Cursor::at(0, 5));
    }

    #[test]
    fn test_delete_back_multibyte() {
        let mut buf = EditorBuffer::from_text("한글");
        buf.move_end();
        buf.delete_back();
        assert_eq!(buf.text(), "한");
        assert_eq!(buf.cursor(), Cursor::at(0, 3));
    }

    #[test]
    fn test_delete_forward_at_end_is_noop() {
        let mut buf = EditorBuffer::from_text("hello");
        buf.move_end();
        assert!(!buf.delete_forward());
    }

    #[test]
    fn test_delete_forward_joins_lines() {
        let mut buf = EditorBuffer::from_text("hello\nworld");
        buf.move_to(0, 5);
        buf.delete_forward();
        assert_eq!(buf.text(), "helloworld");
        assert_eq!(buf.cursor(), Cursor::at(0, 5));
    }

    // --- Selection ---

    #[test]
    fn test_shift_movement_extends_selection() {
        let mut buf = EditorBuffer::from_text("hello world");
        buf.set_selecting(true);
        buf.move_word_right();
        assert_eq!(buf.selected_text().as_deref(), Some("hello "));
        buf.set_selecting(false);
        assert!(!buf.has_selection());
    }

    #[test]
    fn test_backwards_selection_is_ordered() {
        let mut buf = EditorBuffer::from_text("abc\ndef");
        buf.move_to(1, 2);
        buf.set_selecting(true);
        buf.move_cursor(Direction::Up);
        let (start, end) = buf.selection().unwrap();
        assert_eq!(start.key(), (0, 2));
        assert_eq!(end.key(), (1, 2));
        assert_eq!(buf.selected_text().as_deref(), Some("c\nde"));
    }

    #[test]
    fn test_typing_replaces_selection() {
        let mut buf = EditorBuffer::from_text("hello world");
        buf.select_chars(0, 5);
        buf.insert_char('J');
        assert_eq!(buf.text(), "J world");
        assert!(!buf.has_selection());
    }

    #[test]
    fn test_backspace_deletes_selection_only() {
        let mut buf = EditorBuffer::from_text("abcdef");
        buf.select_chars(1, 4);
        assert!(buf.delete_back());
        assert_eq!(buf.text(), "aef");
        assert_eq!(buf.cursor(), Cursor::at(0, 1));
    }

    #[test]
    fn test_replace_selection_without_selection_inserts() {
        let mut buf = EditorBuffer::from_text("ab");
        buf.move_end();
        buf.replace_selection("cd");
        assert_eq!(buf.text(), "abcd");
    }

    #[test]
    fn test_select_all_covers_whole_text() {
        let mut buf = EditorBuffer::from_text("줄 하나\n줄 둘");
        buf.select_all();
        assert_eq!(buf.selected_text().as_deref(), Some("줄 하나\n줄 둘"));
    }

    #[test]
    fn test_select_chars_with_hangul() {
        let mut buf = EditorBuffer::from_text("**텍스트**");
        buf.select_chars(2, 5);
        assert_eq!(buf.selected_text().as_deref(), Some("텍스트"));
        assert_eq!(buf.cursor(), Cursor::at(0, 11));
    }

    // --- Movement ---

    #[test]
    fn test_column_memory_across_short_line() {
        let mut buf = EditorBuffer::from_text("hello\nhi\nworld");
        buf.move_to(0, 4);
        buf.move_cursor(Direction::Down);
        assert_eq!(buf.cursor().col, 2);
        buf.move_cursor(Direction::Down);
        assert_eq!(buf.cursor().col, 4);
    }

    #[test]
    fn test_vertical_move_lands_on_char_boundary() {
        let mut buf = EditorBuffer::from_text("abcd\n한글");
        buf.move_to(0, 4);
        buf.move_cursor(Direction::Down);
        assert_eq!(buf.cursor().col, 3);
    }

    #[test]
    fn test_move_word_left_from_middle_of_word() {
        let mut buf = EditorBuffer::from_text("hello world");
        buf.move_to(0, 8);
        buf.move_word_left();
        assert_eq!(buf.cursor().col, 6);
    }

    #[test]
    fn test_move_word_right_at_end_of_line_wraps() {
        let mut buf = EditorBuffer::from_text("hello\nworld");
        buf.move_to(0, 5);
        buf.move_word_right();
        assert_eq!(buf.cursor(), Cursor::at(1, 0));
    }

    #[test]
    fn test_move_to_clamps() {
        let mut buf = EditorBuffer::from_text("hello");
        buf.move_to(100, 100);
        assert_eq!(buf.cursor(), Cursor::at(0, 5));
    }

    #[test]
    fn test_move_to_end() {
        let mut buf = EditorBuffer::from_text("hello\nworld");
        buf.move_to_end();
        assert_eq!(buf.cursor(), Cursor::at(1, 5));
    }
}
