//! Markdown parsing with comrak.

use anyhow::Result;
use comrak::nodes::{AstNode, ListDelimType, ListType, NodeValue, TableAlignment};
use comrak::{Arena, Options, parse_document};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::math;
use super::types::{
    CodeBlockRef, Document, HeadingRef, ImageRef, InlineSpan, InlineStyle, LineType, LinkRef,
    ParsedDocument, RenderedLine, spans_to_string, spans_width, truncate_spans_to_width,
};

const CODE_RIGHT_PADDING: usize = 3;

/// Parse markdown source into a Document.
///
/// # Example
///
/// ```
/// use hangeuldown::document::Document;
///
/// let doc = Document::parse("# 안녕\n\n세상").unwrap();
/// assert_eq!(doc.headings().len(), 1);
/// ```
impl Document {
    pub fn parse(source: &str) -> Result<Self> {
        parse(source)
    }

    pub fn parse_with_layout(source: &str, width: u16) -> Result<Self> {
        parse_with_layout(source, width)
    }
}

/// Parse markdown source into a Document wrapped at 80 columns.
pub fn parse(source: &str) -> Result<Document> {
    parse_with_layout(source, 80)
}

/// Parse markdown source into a Document with layout and wrapping.
pub fn parse_with_layout(source: &str, width: u16) -> Result<Document> {
    let _scope = crate::perf::scope("document.parse_with_layout");
    let arena = Arena::new();
    let mut options = Options::default();
    enable_extensions(&mut options);
    let source = math::normalize_delimiters(source);
    let root = parse_document(&arena, &source, &options);

    let mut renderer = Renderer {
        out: ParsedDocument::default(),
        wrap_width: usize::from(width.max(1)),
    };
    renderer.node(root, 0, None);

    Ok(Document::from_parsed(renderer.out))
}

/// GFM plus the extensions the editor relies on: footnotes, dollar math,
/// shortcodes. Shared by the preview and the HTML export.
pub(crate) fn enable_extensions(options: &mut Options) {
    options.extension.strikethrough = true;
    options.extension.table = true;
    options.extension.autolink = true;
    options.extension.tasklist = true;
    options.extension.footnotes = true;
    options.extension.superscript = true;
    options.extension.math_dollars = true;
    options.extension.shortcodes = true;
}

struct Renderer {
    out: ParsedDocument,
    wrap_width: usize,
}

impl Renderer {
    fn push(&mut self, content: String, line_type: LineType) {
        self.out.lines.push(RenderedLine::new(content, line_type));
    }

    fn push_blank(&mut self) {
        self.push(String::new(), LineType::Empty);
    }

    fn push_wrapped(
        &mut self,
        spans: &[InlineSpan],
        line_type: LineType,
        prefix_first: &str,
        prefix_next: &str,
    ) {
        for line_spans in wrap_spans(spans, self.wrap_width, prefix_first, prefix_next) {
            let content = spans_to_string(&line_spans);
            self.out
                .lines
                .push(RenderedLine::with_spans(content, line_type, line_spans));
        }
    }

    fn children<'a>(&mut self, node: &'a AstNode<'a>, depth: usize, marker: Option<&str>) {
        for child in node.children() {
            self.node(child, depth, marker);
        }
    }

    fn node<'a>(&mut self, node: &'a AstNode<'a>, depth: usize, list_marker: Option<&str>) {
        match &node.data.borrow().value {
            NodeValue::Document => self.children(node, depth, list_marker),

            NodeValue::Heading(heading) => {
                let text = extract_text(node);

                // Keep headings visually separated with two rows above.
                ensure_trailing_empty_lines(&mut self.out.lines, 2);
                self.out.headings.push(HeadingRef {
                    level: heading.level,
                    text: text.clone(),
                    line: self.out.lines.len(),
                });

                let prefix = "#".repeat(usize::from(heading.level));
                self.push(format!("{prefix} {text}"), LineType::Heading(heading.level));
                self.push_blank();
            }

            NodeValue::Paragraph => self.paragraph(node),

            NodeValue::CodeBlock(code_block) => {
                let language = code_block
                    .info
                    .split_whitespace()
                    .next()
                    .filter(|s| !s.is_empty())
                    .map(ToString::to_string);
                self.code_block(language, &code_block.literal);
            }

            NodeValue::List(list) => {
                let list_depth = depth + 1;
                let delimiter = match list.delimiter {
                    ListDelimType::Paren => ')',
                    ListDelimType::Period => '.',
                };
                let list_len = node.children().count();
                let number_width = (list.start + list_len.saturating_sub(1)).to_string().len();

                for (index, child) in node.children().enumerate() {
                    let marker = match list.list_type {
                        ListType::Bullet => "• ".to_string(),
                        ListType::Ordered => {
                            let number = list.start + index;
                            format!("{number:>number_width$}{delimiter} ")
                        }
                    };
                    self.node(child, list_depth, Some(&marker));
                }
                if depth == 0 {
                    self.push_blank();
                }
            }

            NodeValue::Item(_) => self.list_item(node, depth, list_marker, None),

            NodeValue::TaskItem(symbol) => {
                let task = if symbol.is_some() { "✓" } else { "□" };
                self.list_item(node, depth, list_marker, Some(task));
            }

            NodeValue::BlockQuote => {
                self.blockquote(node, 1);
                self.push_blank();
            }

            NodeValue::ThematicBreak => {
                let width = self.wrap_width.clamp(3, 40);
                self.push("─".repeat(width), LineType::HorizontalRule);
                self.push_blank();
            }

            NodeValue::Table(_) => {
                for line in render_table(node, self.wrap_width) {
                    self.push(line, LineType::Table);
                }
                self.push_blank();
            }

            NodeValue::FootnoteDefinition(def) => {
                self.out.footnotes.insert(def.name.clone());
                let label = format!("[^{}]: ", def.name);
                let continuation = " ".repeat(label.width());
                let spans = collect_inline_spans(node);
                self.push_wrapped(&spans, LineType::Paragraph, &label, &continuation);
                self.push_blank();
            }

            NodeValue::HtmlBlock(html) => {
                let lines = html_block_lines(&html.literal);
                if !lines.is_empty() {
                    for line in lines {
                        self.push(line, LineType::Html);
                    }
                    self.push_blank();
                }
            }

            NodeValue::Math(block) => {
                self.push(format!("  {}", math::to_unicode(&block.literal)), LineType::Math);
            }

            _ => self.children(node, depth, list_marker),
        }
    }

    fn paragraph<'a>(&mut self, node: &'a AstNode<'a>) {
        if let Some(blocks) = display_math_only(node) {
            for literal in blocks {
                self.push(format!("  {}", math::to_unicode(&literal)), LineType::Math);
            }
            self.push_blank();
            return;
        }

        let images = collect_paragraph_images(node);
        if !images.is_empty() && paragraph_is_images_only(node) {
            for (alt, src) in images {
                let line = self.out.lines.len();
                let label = if alt.is_empty() { &src } else { &alt };
                self.push(format!("[이미지: {label}]"), LineType::Image);
                self.out.images.push(ImageRef { alt, src, line });
            }
            self.push_blank();
            return;
        }

        let spans = collect_inline_spans(node);
        let base_line = self.out.lines.len();
        collect_inline_elements(node, base_line, &mut self.out.images, &mut self.out.links);
        self.push_wrapped(&spans, LineType::Paragraph, "", "");
        self.push_blank();
    }

    fn code_block(&mut self, language: Option<String>, literal: &str) {
        let content_width = literal
            .lines()
            .map(UnicodeWidthStr::width)
            .max()
            .unwrap_or(0)
            .min(self.wrap_width.saturating_sub(4).max(1));
        let title = language.as_deref().unwrap_or("code");
        let label = format!(" {title} ");
        let frame_inner_width = content_width + 2 + CODE_RIGHT_PADDING;
        let visible_label = truncate_text(&label, frame_inner_width);
        self.push(
            format!(
                "┌{visible_label}{}┐",
                "─".repeat(frame_inner_width.saturating_sub(visible_label.width()))
            ),
            LineType::CodeBlock,
        );

        let body_start = self.out.lines.len();
        let raw_lines: Vec<String> = literal.lines().map(ToString::to_string).collect();
        for raw_line in &raw_lines {
            let plain_style = InlineStyle {
                code: true,
                ..InlineStyle::default()
            };
            let spans = vec![InlineSpan::new(raw_line.clone(), plain_style)];
            let trimmed_spans = truncate_spans_to_width(&spans, content_width);
            let padding = " ".repeat(
                content_width.saturating_sub(spans_width(&trimmed_spans)) + CODE_RIGHT_PADDING,
            );

            let mut line_spans = vec![InlineSpan::new("│ ".to_string(), InlineStyle::default())];
            line_spans.extend(trimmed_spans);
            line_spans.push(InlineSpan::new(
                format!("{padding} │"),
                InlineStyle::default(),
            ));
            let content = spans_to_string(&line_spans);
            self.out
                .lines
                .push(RenderedLine::with_spans(content, LineType::CodeBlock, line_spans));
        }
        let body_end = self.out.lines.len();

        self.out.code_blocks.push(CodeBlockRef {
            line_range: body_start..body_end,
            language,
            raw_lines,
            highlighted: false,
            content_width,
            right_padding: CODE_RIGHT_PADDING,
        });

        self.push(
            format!("└{}┘", "─".repeat(frame_inner_width)),
            LineType::CodeBlock,
        );
        self.push_blank();
    }

    fn list_item<'a>(
        &mut self,
        node: &'a AstNode<'a>,
        depth: usize,
        list_marker: Option<&str>,
        task: Option<&str>,
    ) {
        let indent = "  ".repeat(depth.saturating_sub(1));
        let marker = task.map_or_else(
            || list_marker.unwrap_or("- ").to_string(),
            |task| format!("{task} "),
        );
        let prefix_first = format!("{indent}{marker}");
        let prefix_next = format!("{indent}{}", " ".repeat(marker.width()));
        let mut rendered_paragraphs = 0usize;

        for child in node.children() {
            if matches!(child.data.borrow().value, NodeValue::Paragraph) {
                if rendered_paragraphs > 0 {
                    self.push(String::new(), LineType::ListItem(depth));
                }
                let spans = collect_inline_spans(child);
                let base_line = self.out.lines.len();
                collect_inline_elements(
                    child,
                    base_line,
                    &mut self.out.images,
                    &mut self.out.links,
                );
                let prefix = if rendered_paragraphs > 0 {
                    &prefix_next
                } else {
                    &prefix_first
                };
                self.push_wrapped(&spans, LineType::ListItem(depth), prefix, &prefix_next);
                rendered_paragraphs += 1;
            } else {
                self.node(child, depth, None);
            }
        }

        if rendered_paragraphs == 0 {
            let spans = collect_inline_spans(node);
            self.push_wrapped(&spans, LineType::ListItem(depth), &prefix_first, &prefix_next);
        }
    }

    fn blockquote<'a>(&mut self, node: &'a AstNode<'a>, quote_depth: usize) {
        let prefix = quote_prefix(quote_depth);

        for child in node.children() {
            match &child.data.borrow().value {
                NodeValue::Paragraph => {
                    let spans = collect_inline_spans(child);
                    let base_line = self.out.lines.len();
                    collect_inline_elements(
                        child,
                        base_line,
                        &mut self.out.images,
                        &mut self.out.links,
                    );
                    self.push_wrapped(&spans, LineType::BlockQuote, &prefix, &prefix);
                }
                NodeValue::BlockQuote => self.blockquote(child, quote_depth + 1),
                _ => {
                    let text = extract_text(child);
                    for raw_line in text.lines() {
                        let spans =
                            vec![InlineSpan::new(raw_line.to_string(), InlineStyle::default())];
                        self.push_wrapped(&spans, LineType::BlockQuote, &prefix, &prefix);
                    }
                }
            }
        }
    }
}

fn ensure_trailing_empty_lines(lines: &mut Vec<RenderedLine>, count: usize) {
    if lines.is_empty() {
        return;
    }
    let existing = lines
        .iter()
        .rev()
        .take_while(|line| matches!(line.line_type(), LineType::Empty))
        .count();
    for _ in existing..count {
        lines.push(RenderedLine::new(String::new(), LineType::Empty));
    }
}

fn quote_prefix(depth: usize) -> String {
    let mut prefix = String::from("  ");
    for _ in 0..depth {
        prefix.push_str("│ ");
    }
    prefix
}

/// Display-math literals when a paragraph holds nothing but `$$…$$` blocks.
fn display_math_only<'a>(node: &'a AstNode<'a>) -> Option<Vec<String>> {
    let mut blocks = Vec::new();
    for child in node.children() {
        match &child.data.borrow().value {
            NodeValue::Math(m) if m.display_math => blocks.push(m.literal.clone()),
            NodeValue::SoftBreak | NodeValue::LineBreak => {}
            NodeValue::Text(t) if t.trim().is_empty() => {}
            _ => return None,
        }
    }
    (!blocks.is_empty()).then_some(blocks)
}

/// Visible text of a raw HTML block: tags removed, `<summary>` marked.
fn html_block_lines(literal: &str) -> Vec<String> {
    literal
        .lines()
        .filter_map(|line| {
            let text = strip_tags(line);
            let text = text.trim();
            if text.is_empty() {
                None
            } else if line.contains("<summary") {
                Some(format!("▸ {text}"))
            } else {
                Some(text.to_string())
            }
        })
        .collect()
}

fn strip_tags(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut in_tag = false;
    for ch in line.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out
}

fn render_table<'a>(table_node: &'a AstNode<'a>, wrap_width: usize) -> Vec<String> {
    let (alignments, mut rows, has_header) = collect_table_rows(table_node);
    let num_cols = rows.iter().map(Vec::len).max().unwrap_or(0);
    if num_cols == 0 {
        return Vec::new();
    }

    for row in &mut rows {
        row.resize(num_cols, String::new());
    }

    let mut col_widths = vec![1_usize; num_cols];
    for row in &rows {
        for (idx, cell) in row.iter().enumerate() {
            col_widths[idx] = col_widths[idx].max(cell.width());
        }
    }

    // Row width is 1 + sum(col_width + 3); shrink the widest column until it fits.
    let max_table_width = wrap_width.max(4);
    while 1 + col_widths.iter().sum::<usize>() + (3 * num_cols) > max_table_width {
        let Some((widest_idx, _)) = col_widths.iter().enumerate().max_by_key(|(_, w)| **w) else {
            break;
        };
        if col_widths[widest_idx] <= 1 {
            break;
        }
        col_widths[widest_idx] -= 1;
    }

    let mid = render_table_border(&col_widths, '├', '┼', '┤');
    let mut lines = vec![render_table_border(&col_widths, '┌', '┬', '┐')];
    for (idx, row) in rows.iter().enumerate() {
        lines.push(render_table_row(row, &col_widths, &alignments));
        if has_header && idx == 0 && rows.len() > 1 {
            lines.push(mid.clone());
        }
    }
    lines.push(render_table_border(&col_widths, '└', '┴', '┘'));
    lines
}

type TableRows = (Vec<TableAlignment>, Vec<Vec<String>>, bool);

fn collect_table_rows<'a>(table_node: &'a AstNode<'a>) -> TableRows {
    let alignments = match &table_node.data.borrow().value {
        NodeValue::Table(table) => table.alignments.clone(),
        _ => Vec::new(),
    };

    let mut rows = Vec::new();
    let mut has_header = false;
    for row_node in table_node.children() {
        let NodeValue::TableRow(is_header) = row_node.data.borrow().value else {
            continue;
        };
        has_header |= is_header;

        let cells = row_node
            .children()
            .filter(|cell| matches!(cell.data.borrow().value, NodeValue::TableCell))
            .map(|cell| {
                extract_text(cell)
                    .split_whitespace()
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect();
        rows.push(cells);
    }

    (alignments, rows, has_header)
}

fn render_table_border(widths: &[usize], left: char, middle: char, right: char) -> String {
    let inner = widths
        .iter()
        .map(|width| "─".repeat(width + 2))
        .collect::<Vec<_>>()
        .join(&middle.to_string());
    format!("{left}{inner}{right}")
}

fn render_table_row(cells: &[String], widths: &[usize], alignments: &[TableAlignment]) -> String {
    let mut out = String::from("│");
    for (idx, width) in widths.iter().enumerate() {
        let content = truncate_text(cells.get(idx).map_or("", String::as_str), *width);
        let padding = width.saturating_sub(content.width());

        out.push(' ');
        match alignments.get(idx).copied().unwrap_or(TableAlignment::None) {
            TableAlignment::Right => {
                out.push_str(&" ".repeat(padding));
                out.push_str(&content);
            }
            TableAlignment::Center => {
                let left = padding / 2;
                out.push_str(&" ".repeat(left));
                out.push_str(&content);
                out.push_str(&" ".repeat(padding - left));
            }
            TableAlignment::Left | TableAlignment::None => {
                out.push_str(&content);
                out.push_str(&" ".repeat(padding));
            }
        }
        out.push_str(" │");
    }
    out
}

fn truncate_text(text: &str, max_width: usize) -> String {
    let mut out = String::new();
    let mut width = 0usize;
    for ch in text.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width > max_width {
            break;
        }
        out.push(ch);
        width += ch_width;
    }
    out
}

fn extract_text<'a>(node: &'a AstNode<'a>) -> String {
    let mut text = String::new();
    extract_text_recursive(node, &mut text);
    text
}

fn extract_text_recursive<'a>(node: &'a AstNode<'a>, text: &mut String) {
    match &node.data.borrow().value {
        NodeValue::Text(t) => text.push_str(t),
        NodeValue::Code(c) => {
            text.push('`');
            text.push_str(&c.literal);
            text.push('`');
        }
        NodeValue::Math(m) => text.push_str(&math::to_unicode(&m.literal)),
        NodeValue::Superscript => {
            let mut inner = String::new();
            for child in node.children() {
                extract_text_recursive(child, &mut inner);
            }
            text.push_str(&math::render_script_text(&inner, true));
        }
        NodeValue::FootnoteReference(reference) => {
            text.push_str(&format!("[^{}]", reference.name));
        }
        NodeValue::ShortCode(code) => text.push_str(&code.emoji),
        NodeValue::SoftBreak | NodeValue::LineBreak => text.push('\n'),
        _ => {
            for child in node.children() {
                extract_text_recursive(child, text);
            }
        }
    }
}

fn collect_inline_spans<'a>(node: &'a AstNode<'a>) -> Vec<InlineSpan> {
    let mut spans = Vec::new();
    collect_inline_spans_recursive(node, InlineStyle::default(), &mut spans);
    spans
}

fn collect_inline_spans_recursive<'a>(
    node: &'a AstNode<'a>,
    style: InlineStyle,
    spans: &mut Vec<InlineSpan>,
) {
    let styled_children = |next: InlineStyle, spans: &mut Vec<InlineSpan>| {
        for child in node.children() {
            collect_inline_spans_recursive(child, next, spans);
        }
    };

    match &node.data.borrow().value {
        NodeValue::List(_) | NodeValue::Item(_) | NodeValue::TaskItem(_) => {}
        NodeValue::Text(t) => spans.push(InlineSpan::new(t.clone(), style)),
        NodeValue::Code(code) => {
            let code_style = InlineStyle {
                code: true,
                emphasis: false,
                strong: false,
                strikethrough: false,
                ..style
            };
            spans.push(InlineSpan::new(code.literal.clone(), code_style));
        }
        NodeValue::Math(m) => {
            let math_style = InlineStyle {
                math: true,
                ..style
            };
            spans.push(InlineSpan::new(math::to_unicode(&m.literal), math_style));
        }
        NodeValue::Emph => styled_children(
            InlineStyle {
                emphasis: true,
                ..style
            },
            spans,
        ),
        NodeValue::Strong => styled_children(
            InlineStyle {
                strong: true,
                ..style
            },
            spans,
        ),
        NodeValue::Strikethrough => styled_children(
            InlineStyle {
                strikethrough: true,
                ..style
            },
            spans,
        ),
        NodeValue::Link(_) => styled_children(InlineStyle { link: true, ..style }, spans),
        NodeValue::Superscript => {
            let mut inner = String::new();
            for child in node.children() {
                inner.push_str(&extract_text(child));
            }
            spans.push(InlineSpan::new(
                math::render_script_text(&inner, true),
                style,
            ));
        }
        NodeValue::Image(image) => {
            let alt = extract_text(node);
            let label = if alt.is_empty() { &image.url } else { &alt };
            spans.push(InlineSpan::new(
                format!("[이미지: {label}]"),
                InlineStyle {
                    emphasis: true,
                    ..style
                },
            ));
        }
        NodeValue::FootnoteReference(reference) => {
            spans.push(InlineSpan::new(format!("[^{}]", reference.name), style));
        }
        NodeValue::ShortCode(code) => spans.push(InlineSpan::new(code.emoji.clone(), style)),
        NodeValue::SoftBreak | NodeValue::LineBreak => {
            spans.push(InlineSpan::new(" ".to_string(), style));
        }
        _ => styled_children(style, spans),
    }
}

fn wrap_spans(
    spans: &[InlineSpan],
    width: usize,
    prefix_first: &str,
    prefix_next: &str,
) -> Vec<Vec<InlineSpan>> {
    let start_line = |prefix: &str| -> (Vec<InlineSpan>, usize) {
        if prefix.is_empty() {
            (Vec::new(), 0)
        } else {
            (
                vec![InlineSpan::new(prefix.to_string(), InlineStyle::default())],
                prefix.width(),
            )
        }
    };

    let mut lines: Vec<Vec<InlineSpan>> = Vec::new();
    let (mut current, mut current_len) = start_line(prefix_first);
    let mut has_word = false;
    let room = width
        .saturating_sub(prefix_first.width().max(prefix_next.width()))
        .max(1);

    for token in spans
        .iter()
        .flat_map(split_inline_tokens)
        .flat_map(|token| break_long_token(token, room))
    {
        let token_len = token.text().width();
        let token_is_ws = token.text().chars().all(char::is_whitespace);

        if current_len + token_len > width && has_word {
            lines.push(std::mem::take(&mut current));
            (current, current_len) = start_line(prefix_next);
            has_word = false;
        }

        if token_is_ws && !has_word {
            // Drop leading whitespace at wrapped line starts.
            continue;
        }

        current_len += token_len;
        current.push(token);
        has_word = true;
    }

    lines.push(current);
    lines
}

fn split_inline_tokens(span: &InlineSpan) -> Vec<InlineSpan> {
    let mut out = Vec::new();
    let mut buf = String::new();
    let mut ws_state: Option<bool> = None;

    for ch in span.text().chars() {
        let is_ws = ch.is_whitespace();
        if ws_state.is_some_and(|state| state != is_ws) {
            out.push(InlineSpan::new(std::mem::take(&mut buf), span.style()));
        }
        buf.push(ch);
        ws_state = Some(is_ws);
    }

    if !buf.is_empty() {
        out.push(InlineSpan::new(buf, span.style()));
    }
    out
}

/// Split a word wider than `width` into pieces that each fit.
fn break_long_token(token: InlineSpan, width: usize) -> Vec<InlineSpan> {
    if token.text().width() <= width {
        return vec![token];
    }
    let mut pieces = Vec::new();
    let mut buf = String::new();
    let mut buf_width = 0;
    for ch in token.text().chars() {
        let w = ch.width().unwrap_or(0);
        if buf_width + w > width && !buf.is_empty() {
            pieces.push(InlineSpan::new(std::mem::take(&mut buf), token.style()));
            buf_width = 0;
        }
        buf.push(ch);
        buf_width += w;
    }
    if !buf.is_empty() {
        pieces.push(InlineSpan::new(buf, token.style()));
    }
    pieces
}

/// Collect images from a paragraph node, returning (alt, src) pairs.
fn collect_paragraph_images<'a>(node: &'a AstNode<'a>) -> Vec<(String, String)> {
    let mut images = Vec::new();
    for descendant in node.descendants() {
        if let NodeValue::Image(image) = &descendant.data.borrow().value {
            images.push((extract_text(descendant), image.url.clone()));
        }
    }
    images
}

fn paragraph_is_images_only<'a>(node: &'a AstNode<'a>) -> bool {
    node.children().all(|child| match &child.data.borrow().value {
        NodeValue::Image(_) | NodeValue::SoftBreak | NodeValue::LineBreak => true,
        NodeValue::Text(t) => t.trim().is_empty(),
        _ => false,
    })
}

fn collect_inline_elements<'a>(
    node: &'a AstNode<'a>,
    base_line: usize,
    images: &mut Vec<ImageRef>,
    links: &mut Vec<LinkRef>,
) {
    match &node.data.borrow().value {
        NodeValue::Image(image) => images.push(ImageRef {
            alt: extract_text(node),
            src: image.url.clone(),
            line: base_line,
        }),
        NodeValue::Link(link) => links.push(LinkRef {
            text: extract_text(node),
            url: link.url.clone(),
            line: base_line,
        }),
        _ => {
            for child in node.children() {
                collect_inline_elements(child, base_line, images, links);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contents(doc: &Document) -> Vec<String> {
        doc.visible_lines(0, doc.line_count())
            .iter()
            .map(|l| l.content().to_string())
            .collect()
    }

    #[test]
    fn test_parse_empty_document() {
        let doc = parse("").unwrap();
        assert_eq!(doc.line_count(), 0);
    }

    #[test]
    fn test_parse_simple_paragraph() {
        let doc = parse("안녕하세요 world").unwrap();
        assert!(contents(&doc).iter().any(|l| l.contains("안녕하세요")));
    }

    #[test]
    fn test_parse_multiple_headings() {
        let doc = parse("# 하나\n\n## 둘\n\n### 셋").unwrap();
        let levels: Vec<u8> = doc.headings().iter().map(|h| h.level).collect();
        assert_eq!(levels, vec![1, 2, 3]);
        assert_eq!(doc.headings()[0].text, "하나");
    }

    #[test]
    fn test_heading_has_two_rows_above() {
        let doc = parse("문단\n\n## 제목").unwrap();
        let heading_line = doc.headings()[0].line;
        let lines = doc.visible_lines(0, heading_line);
        assert!(lines[heading_line - 1].content().is_empty());
        assert!(lines[heading_line - 2].content().is_empty());
    }

    #[test]
    fn test_parse_link_and_image() {
        let doc = parse("[링크](https://url.com)\n\n![설명](https://url.com/image.png)").unwrap();
        assert_eq!(doc.links().len(), 1);
        assert_eq!(doc.links()[0].url, "https://url.com");
        assert_eq!(doc.images().len(), 1);
        assert!(contents(&doc).iter().any(|l| l == "[이미지: 설명]"));
    }

    #[test]
    fn test_parse_blockquote_uses_bar_prefix() {
        let doc = parse("> 인용문").unwrap();
        let lines = doc.visible_lines(0, 10);
        assert!(lines.iter().any(|l| *l.line_type() == LineType::BlockQuote));
        assert!(lines.iter().any(|l| l.content().starts_with("  │ ")));
    }

    #[test]
    fn test_gfm_table_renders_box_with_alignment() {
        let doc = parse("| 제목1 | 제목2 |\n|:---:|---:|\n| 가 | 나 |\n").unwrap();
        let table: Vec<String> = doc
            .visible_lines(0, 10)
            .iter()
            .filter(|l| *l.line_type() == LineType::Table)
            .map(|l| l.content().to_string())
            .collect();
        assert_eq!(table.len(), 5);
        assert!(table[0].starts_with('┌'));
        assert!(table[1].contains("제목1"));
        assert!(table[2].starts_with('├'));
        assert_eq!(table[1].width(), table[3].width());
    }

    #[test]
    fn test_gfm_table_respects_layout_width() {
        let md = "| 아주 긴 제목 | 더 긴 제목입니다 |\n|---|---|\n| 내용 | 내용 |\n";
        let doc = Document::parse_with_layout(md, 20).unwrap();
        for line in doc.visible_lines(0, 10) {
            if *line.line_type() == LineType::Table {
                assert!(line.content().width() <= 20, "too wide: {}", line.content());
            }
        }
    }

    #[test]
    fn test_paragraph_wraps_hangul_by_display_width() {
        let md = "가나다라 마바사아 자차카타 파하가나";
        let doc = Document::parse_with_layout(md, 20).unwrap();
        let paragraph: Vec<_> = doc
            .visible_lines(0, 10)
            .into_iter()
            .filter(|l| *l.line_type() == LineType::Paragraph)
            .collect();
        assert!(paragraph.len() > 1);
        assert!(paragraph.iter().all(|l| l.content().width() <= 20));
    }

    #[test]
    fn test_word_wider_than_pane_is_broken() {
        let md = "가".repeat(30);
        let doc = Document::parse_with_layout(&md, 20).unwrap();
        let lines: Vec<_> = doc
            .visible_lines(0, 10)
            .into_iter()
            .filter(|l| *l.line_type() == LineType::Paragraph)
            .collect();
        assert_eq!(lines.len(), 3);
        assert!(lines.iter().all(|l| l.content().width() <= 20));
        let joined: String = lines.iter().map(|l| l.content()).collect();
        assert_eq!(joined, md);
    }

    #[test]
    fn test_inline_styles_create_spans() {
        let doc = parse("**굵게** *기울임* ~~취소~~ `코드`").unwrap();
        let spans = doc.line_at(0).and_then(|l| l.spans()).unwrap();
        assert!(spans.iter().any(|s| s.style().strong && s.text() == "굵게"));
        assert!(spans.iter().any(|s| s.style().emphasis));
        assert!(spans.iter().any(|s| s.style().strikethrough));
        assert!(spans.iter().any(|s| s.style().code && s.text() == "코드"));
    }

    #[test]
    fn test_inline_math_is_converted() {
        let doc = parse("인라인 수식: $E = mc^2$").unwrap();
        let spans = doc.line_at(0).and_then(|l| l.spans()).unwrap();
        assert!(spans.iter().any(|s| s.style().math && s.text().contains("mc²")));
    }

    #[test]
    fn test_display_math_paragraph_becomes_math_line() {
        let doc = parse("$$\\int_{a}^{b} f(x)dx$$").unwrap();
        let line = doc.line_at(0).unwrap();
        assert_eq!(*line.line_type(), LineType::Math);
        assert!(line.content().contains("∫ₐᵇ"));
    }

    #[test]
    fn test_bracket_display_math_becomes_math_line() {
        let doc = parse(r"\[ x^2 + y_1 \]").unwrap();
        let line = doc.line_at(0).unwrap();
        assert_eq!(*line.line_type(), LineType::Math);
        assert!(line.content().contains("x² + y₁"));
        assert!(!line.content().contains('\\'));
    }

    #[test]
    fn test_paren_inline_math_is_converted() {
        let doc = parse(r"인라인 \( \alpha^2 \) 수식").unwrap();
        let spans = doc.line_at(0).and_then(|l| l.spans()).unwrap();
        assert!(spans.iter().any(|s| s.style().math && s.text().contains("α²")));
        assert!(!contents(&doc)[0].contains(r"\("));
    }

    #[test]
    fn test_bracket_math_inside_code_span_stays_literal() {
        let doc = parse(r"`\(x\)`").unwrap();
        assert!(contents(&doc)[0].contains(r"\(x\)"));
    }

    #[test]
    fn test_footnote_reference_and_definition_render() {
        let doc = parse("본문[^1]\n\n[^1]: 각주 내용\n").unwrap();
        let lines = contents(&doc);
        assert!(lines.iter().any(|l| l.contains("본문[^1]")));
        assert!(lines.iter().any(|l| l.starts_with("[^1]: 각주 내용")));
        assert_eq!(doc.footnote_count(), 1);
    }

    #[test]
    fn test_details_block_shows_summary() {
        let md = "<details>\n<summary>자세히 보기</summary>\n\n접힌 내용\n\n</details>\n";
        let doc = parse(md).unwrap();
        let lines = contents(&doc);
        assert!(lines.iter().any(|l| l == "▸ 자세히 보기"));
        assert!(lines.iter().any(|l| l.contains("접힌 내용")));
        assert!(!lines.iter().any(|l| l.contains("<details>")));
    }

    #[test]
    fn test_shortcode_renders_emoji() {
        let doc = parse("좋아요 :smile:").unwrap();
        assert!(contents(&doc)[0].contains('😄'));
    }

    #[test]
    fn test_code_block_renders_ascii_box() {
        let doc = parse("```javascript\nconsole.log('hi');\n```").unwrap();
        let lines = contents(&doc);
        assert!(lines[0].starts_with("┌ javascript "));
        assert!(lines[1].starts_with("│ console.log('hi');"));
        assert!(lines[2].starts_with('└'));
    }

    #[test]
    fn test_code_block_is_plain_until_range_is_highlighted() {
        let mut doc = parse("```rust\nfn main() {}\n```").unwrap();
        let before = doc.line_at(1).and_then(|l| l.spans()).unwrap().to_vec();
        assert!(before.iter().all(|s| s.style().fg.is_none()));

        doc.ensure_highlight_for_range(0..10, crate::theme::Theme::Dark);
        let after = doc.line_at(1).and_then(|l| l.spans()).unwrap();
        assert!(after.iter().any(|s| s.style().fg.is_some()));
    }

    #[test]
    fn test_ordered_and_task_list_markers() {
        let doc = parse("1. 첫째\n2. 둘째\n\n- [x] 완료\n- [ ] 미완료").unwrap();
        let lines = contents(&doc);
        assert!(lines.iter().any(|l| l.starts_with("1. 첫째")));
        assert!(lines.iter().any(|l| l.starts_with("✓ 완료")));
        assert!(lines.iter().any(|l| l.starts_with("□ 미완료")));
    }

    #[test]
    fn test_nested_list_indents_children() {
        let doc = parse("- 부모\n  - 자식").unwrap();
        let lines = contents(&doc);
        assert!(lines.iter().any(|l| l.starts_with("• 부모")));
        assert!(lines.iter().any(|l| l.starts_with("  • 자식")));
    }

    #[test]
    fn test_thematic_break_is_rule() {
        let doc = parse("위\n\n---\n\n아래").unwrap();
        assert!(
            doc.visible_lines(0, 10)
                .iter()
                .any(|l| *l.line_type() == LineType::HorizontalRule)
        );
    }

    #[test]
    fn test_generated_table_previews_all_rows() {
        use crate::table::{Alignment, TableSpec, serialize_table};
        let md = serialize_table(&TableSpec::new(3, 2, true, Alignment::Center));
        let doc = parse(&md).unwrap();
        let rows = doc
            .visible_lines(0, 20)
            .iter()
            .filter(|l| l.content().starts_with('│'))
            .count();
        assert_eq!(rows, 3);
    }
}
