use hangeuldown::document::{Document, LineType};
use hangeuldown::files::html_export;
use hangeuldown::table::{Alignment, DialogField, TableDialog, TableSpec, serialize_table};
use proptest::prelude::*;

fn table_lines(doc: &Document) -> Vec<String> {
    (0..doc.line_count())
        .filter_map(|i| doc.line_at(i))
        .filter(|line| *line.line_type() == LineType::Table)
        .map(|line| line.content().to_string())
        .collect()
}

#[test]
fn test_dialog_markdown_renders_as_preview_table() {
    let mut dialog = TableDialog::new();
    dialog.set_focus(DialogField::Rows);
    dialog.backspace();
    dialog.input_char('4');
    dialog.set_focus(DialogField::Cols);
    dialog.backspace();
    dialog.input_char('2');

    let doc = Document::parse_with_layout(&dialog.markdown(), 60).unwrap();
    let lines = table_lines(&doc);
    assert!(lines.iter().any(|l| l.contains("제목1") && l.contains("제목2")));
    assert!(lines.iter().any(|l| l.contains("내용3-2")));
    assert!(!lines.iter().any(|l| l.contains("내용4-1")));
}

#[test]
fn test_headerless_table_is_plain_text_in_preview() {
    let markdown = serialize_table(&TableSpec::new(2, 2, false, Alignment::Left));
    let doc = Document::parse_with_layout(&markdown, 60).unwrap();
    assert!(table_lines(&doc).is_empty());
}

#[test]
fn test_exported_table_keeps_alignment() {
    let markdown = serialize_table(&TableSpec::new(2, 3, true, Alignment::Right));
    let body = html_export(&markdown).body;
    assert!(body.contains("<th align=\"right\">제목1</th>"));
    assert!(body.contains("<td align=\"right\">내용1-3</td>"));
}

proptest! {
    #[test]
    fn prop_exported_table_has_one_html_row_per_table_row(
        rows in 1usize..12,
        cols in 1usize..8,
    ) {
        let markdown = serialize_table(&TableSpec::new(rows, cols, true, Alignment::Center));
        let body = html_export(&markdown).body;
        prop_assert_eq!(body.matches("<tr>").count(), rows);
        prop_assert_eq!(body.matches("<th align=\"center\">").count(), cols);
        prop_assert_eq!(body.matches("<td align=\"center\">").count(), (rows - 1) * cols);
    }
}
