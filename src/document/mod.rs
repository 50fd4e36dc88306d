//! Markdown document parsing and rendering.
//!
//! This module handles:
//! - Parsing markdown with comrak
//! - Extracting document structure (headings, links, images, footnotes)
//! - Rendering to styled, width-aware lines for the preview pane

pub mod math;
mod parser;
mod types;

pub(crate) use parser::enable_extensions;
pub use parser::{parse, parse_with_layout};
pub use types::{
    Document, HeadingRef, ImageRef, InlineColor, InlineSpan, InlineStyle, LineType, LinkRef,
    RenderedLine,
};

/// Document shown when nothing has been saved yet.
pub const WELCOME_MARKDOWN: &str = include_str!("../welcome.md");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_welcome_document_parses_every_feature() {
        let doc = parse(WELCOME_MARKDOWN).unwrap();
        assert_eq!(doc.headings()[0].text, "한글다운 마크다운 에디터");
        assert_eq!(doc.links().len(), 2);

        let types: Vec<LineType> = (0..doc.line_count())
            .filter_map(|i| doc.line_at(i).map(|l| *l.line_type()))
            .collect();
        assert!(types.contains(&LineType::Table));
        assert!(types.contains(&LineType::CodeBlock));
        assert!(types.contains(&LineType::Math));
        assert!(types.contains(&LineType::BlockQuote));
    }
}
