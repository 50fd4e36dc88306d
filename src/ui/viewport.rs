//! Scroll state for the preview pane.
//!
//! The [`Viewport`] tracks the visible window over the rendered preview
//! lines. It scrolls on its own (PageUp/PageDown, mouse wheel) and is also
//! pulled along proportionally when the editor cursor moves.

use std::ops::Range;

/// Manages the visible portion of the rendered preview.
///
/// # Example
///
/// ```
/// use hangeuldown::ui::viewport::Viewport;
///
/// let mut vp = Viewport::new(40, 20, 100);
/// assert_eq!(vp.visible_range(), 0..20);
///
/// vp.scroll_down(10);
/// assert_eq!(vp.visible_range(), 10..30);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewport {
    width: u16,
    height: u16,
    offset: usize,
    total_lines: usize,
}

impl Viewport {
    pub const fn new(width: u16, height: u16, total_lines: usize) -> Self {
        Self {
            width,
            height,
            offset: 0,
            total_lines,
        }
    }

    pub const fn offset(&self) -> usize {
        self.offset
    }

    pub const fn width(&self) -> u16 {
        self.width
    }

    pub const fn height(&self) -> u16 {
        self.height
    }

    pub const fn total_lines(&self) -> usize {
        self.total_lines
    }

    /// Lines on screen, clamped to the document.
    pub fn visible_range(&self) -> Range<usize> {
        let start = self.offset;
        let end = (self.offset + self.height as usize).min(self.total_lines);
        start..end.max(start)
    }

    /// Scroll position as 0-100.
    pub fn scroll_percent(&self) -> u8 {
        let max_offset = self.max_offset();
        if max_offset == 0 {
            return 100;
        }
        #[allow(
            clippy::cast_precision_loss,
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss
        )]
        {
            ((self.offset as f64 / max_offset as f64) * 100.0).round() as u8
        }
    }

    pub const fn can_scroll_up(&self) -> bool {
        self.offset > 0
    }

    pub const fn can_scroll_down(&self) -> bool {
        self.offset < self.max_offset()
    }

    pub const fn scroll_up(&mut self, n: usize) {
        self.offset = self.offset.saturating_sub(n);
    }

    pub fn scroll_down(&mut self, n: usize) {
        self.offset = (self.offset + n).min(self.max_offset());
    }

    pub const fn page_up(&mut self) {
        self.scroll_up(self.height as usize);
    }

    pub fn page_down(&mut self) {
        self.scroll_down(self.height as usize);
    }

    /// Put `line` at the top of the viewport (clamped).
    pub fn go_to_line(&mut self, line: usize) {
        self.offset = line.min(self.max_offset());
    }

    /// Scroll to the same relative position as `line` within `of_lines`.
    ///
    /// Used to keep the preview roughly in step with the editor cursor,
    /// since source and rendered lines do not map one to one.
    pub fn follow(&mut self, line: usize, of_lines: usize) {
        let last = of_lines.saturating_sub(1);
        if last == 0 {
            self.offset = 0;
            return;
        }
        let max_offset = self.max_offset();
        self.offset = (line.min(last) * max_offset + last / 2) / last;
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.offset = self.offset.min(self.max_offset());
    }

    /// Update the line count after a re-render.
    pub fn set_total_lines(&mut self, total: usize) {
        self.total_lines = total;
        self.offset = self.offset.min(self.max_offset());
    }

    const fn max_offset(&self) -> usize {
        self.total_lines.saturating_sub(self.height as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visible_range_with_short_document() {
        let vp = Viewport::new(80, 24, 10);
        assert_eq!(vp.visible_range(), 0..10);
    }

    #[test]
    fn test_scroll_down_clamps_to_max() {
        let mut vp = Viewport::new(80, 24, 100);
        vp.scroll_down(1000);
        assert_eq!(vp.offset(), 76);
        assert!(!vp.can_scroll_down());
    }

    #[test]
    fn test_scroll_up_clamps_to_zero() {
        let mut vp = Viewport::new(80, 24, 100);
        vp.scroll_down(10);
        vp.scroll_up(100);
        assert_eq!(vp.offset(), 0);
        assert!(!vp.can_scroll_up());
    }

    #[test]
    fn test_page_down_then_up() {
        let mut vp = Viewport::new(80, 24, 100);
        vp.page_down();
        assert_eq!(vp.offset(), 24);
        vp.page_up();
        assert_eq!(vp.offset(), 0);
    }

    #[test]
    fn test_follow_maps_cursor_proportionally() {
        let mut vp = Viewport::new(40, 10, 110);
        vp.follow(0, 51);
        assert_eq!(vp.offset(), 0);
        vp.follow(25, 51);
        assert_eq!(vp.offset(), 50);
        vp.follow(50, 51);
        assert_eq!(vp.offset(), 100);
        vp.follow(500, 51);
        assert_eq!(vp.offset(), 100);
    }

    #[test]
    fn test_follow_single_line_source_stays_at_top() {
        let mut vp = Viewport::new(40, 10, 110);
        vp.scroll_down(30);
        vp.follow(0, 1);
        assert_eq!(vp.offset(), 0);
    }

    #[test]
    fn test_shrinking_document_clamps_offset() {
        let mut vp = Viewport::new(80, 24, 100);
        vp.scroll_down(70);
        vp.set_total_lines(30);
        assert_eq!(vp.offset(), 6);
    }

    #[test]
    fn test_scroll_percent() {
        let mut vp = Viewport::new(80, 10, 30);
        assert_eq!(vp.scroll_percent(), 0);
        vp.scroll_down(10);
        assert_eq!(vp.scroll_percent(), 50);
        assert_eq!(Viewport::new(80, 10, 5).scroll_percent(), 100);
    }
}
