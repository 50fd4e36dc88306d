//! Core document types.

use std::collections::HashSet;
use std::ops::Range;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::theme::Theme;

/// Result of parsing markdown, ready to be assembled into a `Document`.
#[derive(Debug, Clone, Default)]
pub struct ParsedDocument {
    /// Rendered lines for display
    pub lines: Vec<RenderedLine>,
    /// Heading references for the outline
    pub headings: Vec<HeadingRef>,
    /// Image references
    pub images: Vec<ImageRef>,
    /// Link references
    pub links: Vec<LinkRef>,
    /// Labels of footnote definitions
    pub footnotes: HashSet<String>,
    /// Code blocks for lazy syntax highlighting
    pub code_blocks: Vec<CodeBlockRef>,
}

/// A parsed and rendered markdown document.
#[derive(Debug, Clone)]
pub struct Document {
    lines: Vec<RenderedLine>,
    headings: Vec<HeadingRef>,
    images: Vec<ImageRef>,
    links: Vec<LinkRef>,
    footnotes: HashSet<String>,
    code_blocks: Vec<CodeBlockRef>,
    /// Theme the highlighted code blocks were coloured with
    highlight_theme: Option<Theme>,
}

impl Document {
    /// Create an empty document.
    pub fn empty() -> Self {
        Self::from_parsed(ParsedDocument::default())
    }

    /// Create a new document from parsed results.
    pub(crate) fn from_parsed(result: ParsedDocument) -> Self {
        Self {
            lines: result.lines,
            headings: result.headings,
            images: result.images,
            links: result.links,
            footnotes: result.footnotes,
            code_blocks: result.code_blocks,
            highlight_theme: None,
        }
    }

    /// Get the total number of rendered lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Get all headings.
    pub fn headings(&self) -> &[HeadingRef] {
        &self.headings
    }

    /// Get all image references.
    pub fn images(&self) -> &[ImageRef] {
        &self.images
    }

    /// Get all link references.
    pub fn links(&self) -> &[LinkRef] {
        &self.links
    }

    pub fn footnote_count(&self) -> usize {
        self.footnotes.len()
    }

    /// Get visible lines for rendering.
    ///
    /// Returns lines from `offset` to `offset + count`.
    pub fn visible_lines(&self, offset: usize, count: usize) -> Vec<&RenderedLine> {
        self.lines.iter().skip(offset).take(count).collect()
    }

    /// Get a specific rendered line by index.
    pub fn line_at(&self, index: usize) -> Option<&RenderedLine> {
        self.lines.get(index)
    }

    /// Lazily apply syntax highlighting to code blocks intersecting `range`.
    ///
    /// Blocks already highlighted with a different theme are redone.
    pub fn ensure_highlight_for_range(&mut self, range: Range<usize>, theme: Theme) {
        if self.highlight_theme != Some(theme) {
            for block in &mut self.code_blocks {
                block.highlighted = false;
            }
            self.highlight_theme = Some(theme);
        }

        for block in &mut self.code_blocks {
            if block.highlighted
                || block.line_range.end <= range.start
                || block.line_range.start >= range.end
            {
                continue;
            }

            let highlighted = crate::highlight::highlight_code(
                block.language.as_deref(),
                &block.raw_lines.join("\n"),
                theme,
            );

            for (line_idx, spans) in (block.line_range.start..block.line_range.end).zip(highlighted)
            {
                if line_idx >= self.lines.len() {
                    break;
                }
                let trimmed_spans = truncate_spans_to_width(&spans, block.content_width);
                let trimmed_len = spans_width(&trimmed_spans);
                let padding = " "
                    .repeat(block.content_width.saturating_sub(trimmed_len) + block.right_padding);

                let mut line_spans = Vec::new();
                line_spans.push(InlineSpan::new("│ ".to_string(), InlineStyle::default()));
                line_spans.extend(trimmed_spans);
                line_spans.push(InlineSpan::new(
                    format!("{padding} │"),
                    InlineStyle::default(),
                ));
                let content = spans_to_string(&line_spans);
                self.lines[line_idx] =
                    RenderedLine::with_spans(content, LineType::CodeBlock, line_spans);
            }

            block.highlighted = true;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlockRef {
    pub line_range: Range<usize>,
    pub language: Option<String>,
    pub raw_lines: Vec<String>,
    pub highlighted: bool,
    pub content_width: usize,
    pub right_padding: usize,
}

/// A single rendered line with styling information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedLine {
    content: String,
    line_type: LineType,
    spans: Vec<InlineSpan>,
}

impl RenderedLine {
    /// Create a new rendered line.
    pub const fn new(content: String, line_type: LineType) -> Self {
        Self {
            content,
            line_type,
            spans: Vec::new(),
        }
    }

    /// Create a new rendered line with inline spans.
    pub const fn with_spans(content: String, line_type: LineType, spans: Vec<InlineSpan>) -> Self {
        Self {
            content,
            line_type,
            spans,
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub const fn line_type(&self) -> &LineType {
        &self.line_type
    }

    /// Get inline spans, if present.
    pub fn spans(&self) -> Option<&[InlineSpan]> {
        if self.spans.is_empty() {
            None
        } else {
            Some(&self.spans)
        }
    }
}

/// Inline style flags for a text span.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InlineStyle {
    pub emphasis: bool,
    pub strong: bool,
    pub code: bool,
    pub strikethrough: bool,
    pub link: bool,
    pub math: bool,
    pub fg: Option<InlineColor>,
    pub bg: Option<InlineColor>,
}

/// RGB color for inline styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InlineColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// A styled inline span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineSpan {
    text: String,
    style: InlineStyle,
}

impl InlineSpan {
    pub const fn new(text: String, style: InlineStyle) -> Self {
        Self { text, style }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub const fn style(&self) -> InlineStyle {
        self.style
    }
}

/// Type of a rendered line, used for styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineType {
    /// Normal paragraph text
    Paragraph,
    /// Heading with level (1-6)
    Heading(u8),
    /// Code block line
    CodeBlock,
    /// Block quote line
    BlockQuote,
    /// List item with nesting level
    ListItem(usize),
    /// Table row
    Table,
    /// Horizontal rule
    HorizontalRule,
    /// Image placeholder
    Image,
    /// Display math block
    Math,
    /// Raw HTML block, shown with tags stripped
    Html,
    /// Empty line
    Empty,
}

/// Reference to a heading in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingRef {
    /// Heading level (1-6)
    pub level: u8,
    /// Heading text (plain, no formatting)
    pub text: String,
    /// Line number in rendered document
    pub line: usize,
}

/// Reference to an image in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    pub alt: String,
    pub src: String,
    /// Rendered line showing the placeholder
    pub line: usize,
}

/// Reference to a link in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRef {
    pub text: String,
    pub url: String,
    /// Line number in rendered document
    pub line: usize,
}

pub(crate) fn spans_to_string(spans: &[InlineSpan]) -> String {
    let mut content = String::new();
    for span in spans {
        content.push_str(span.text());
    }
    content
}

/// Terminal column width of a span list.
pub(crate) fn spans_width(spans: &[InlineSpan]) -> usize {
    spans.iter().map(|s| s.text().width()).sum()
}

/// Cut spans so they occupy at most `max_width` terminal columns.
///
/// A wide character that would straddle the limit is dropped.
pub(crate) fn truncate_spans_to_width(spans: &[InlineSpan], max_width: usize) -> Vec<InlineSpan> {
    let mut out = Vec::new();
    let mut remaining = max_width;
    for span in spans {
        if remaining == 0 {
            break;
        }
        let mut taken = String::new();
        for ch in span.text().chars() {
            let w = ch.width().unwrap_or(0);
            if w > remaining {
                remaining = 0;
                break;
            }
            taken.push(ch);
            remaining -= w;
        }
        if !taken.is_empty() {
            out.push(InlineSpan::new(taken, span.style()));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_with_lines(contents: &[&str]) -> Document {
        let lines = contents
            .iter()
            .map(|c| RenderedLine::new((*c).to_string(), LineType::Paragraph))
            .collect();
        Document::from_parsed(ParsedDocument {
            lines,
            ..ParsedDocument::default()
        })
    }

    #[test]
    fn test_empty_document() {
        let doc = Document::empty();
        assert_eq!(doc.line_count(), 0);
        assert!(doc.headings().is_empty());
    }

    #[test]
    fn test_rendered_line_without_spans() {
        let line = RenderedLine::new("Hello".to_string(), LineType::Paragraph);
        assert_eq!(line.content(), "Hello");
        assert!(line.spans().is_none());
    }

    #[test]
    fn test_visible_lines() {
        let doc = doc_with_lines(&["Line 1", "Line 2", "Line 3", "Line 4"]);
        let visible = doc.visible_lines(1, 2);
        assert_eq!(visible.len(), 2);
        assert_eq!(visible[0].content(), "Line 2");
        assert_eq!(visible[1].content(), "Line 3");
    }

    #[test]
    fn test_visible_lines_beyond_end() {
        let doc = doc_with_lines(&["Line 1", "Line 2"]);
        assert_eq!(doc.visible_lines(0, 10).len(), 2);
        assert!(doc.visible_lines(5, 10).is_empty());
    }

    #[test]
    fn test_truncate_spans_counts_wide_characters_twice() {
        let spans = vec![
            InlineSpan::new("한글".to_string(), InlineStyle::default()),
            InlineSpan::new("abc".to_string(), InlineStyle::default()),
        ];
        let truncated = truncate_spans_to_width(&spans, 5);
        assert_eq!(spans_to_string(&truncated), "한글a");
        assert_eq!(spans_width(&truncated), 5);
    }

    #[test]
    fn test_truncate_spans_drops_straddling_wide_char() {
        let spans = vec![InlineSpan::new("가나다".to_string(), InlineStyle::default())];
        let truncated = truncate_spans_to_width(&spans, 3);
        assert_eq!(spans_to_string(&truncated), "가");
    }
}
