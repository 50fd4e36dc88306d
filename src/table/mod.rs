//! Table generation for the insert-table dialog.
//!
//! A [`TableSpec`] is built from the dialog fields on every edit. Two pure
//! functions derive everything else from it:
//! - [`compute_preview_grid`]: the cell grid shown inside the dialog
//! - [`serialize_table`]: the GFM pipe-table text spliced into the buffer
//!
//! The two are independent; the markdown never depends on the grid.

pub mod dialog;

pub use dialog::{DialogField, TableDialog};

use std::num::IntErrorKind;

/// Value used for a rows/cols field that is empty, non-numeric, or not positive.
pub const DEFAULT_DIMENSION: usize = 3;

/// Largest accepted row or column count; bigger values are clamped to it.
pub const MAX_DIMENSION: usize = 100;

/// Column alignment written into the separator row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

impl Alignment {
    /// Separator token for one column.
    pub const fn marker(self) -> &'static str {
        match self {
            Self::Left => "---",
            Self::Center => ":---:",
            Self::Right => "---:",
        }
    }

    /// Label shown in the dialog.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Left => "왼쪽",
            Self::Center => "가운데",
            Self::Right => "오른쪽",
        }
    }

    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Left => Self::Center,
            Self::Center => Self::Right,
            Self::Right => Self::Left,
        }
    }

    #[must_use]
    pub const fn prev(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Center => Self::Left,
            Self::Right => Self::Center,
        }
    }
}

/// User-chosen table dimensions and options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSpec {
    rows: usize,
    cols: usize,
    pub has_header: bool,
    pub align: Alignment,
}

impl TableSpec {
    /// Build a spec from already-numeric dimensions.
    ///
    /// Zero becomes [`DEFAULT_DIMENSION`] and anything above
    /// [`MAX_DIMENSION`] is clamped, so both dimensions stay in
    /// `1..=MAX_DIMENSION`.
    pub const fn new(rows: usize, cols: usize, has_header: bool, align: Alignment) -> Self {
        Self {
            rows: clamp_dimension(rows),
            cols: clamp_dimension(cols),
            has_header,
            align,
        }
    }

    /// Build a spec from the raw text of the dialog's rows/cols fields.
    pub fn from_input(rows: &str, cols: &str, has_header: bool, align: Alignment) -> Self {
        Self::new(
            normalize_dimension(rows),
            normalize_dimension(cols),
            has_header,
            align,
        )
    }

    pub const fn rows(&self) -> usize {
        self.rows
    }

    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// Number of body rows once the header row (if any) is taken out.
    pub const fn data_rows(&self) -> usize {
        if self.has_header {
            self.rows - 1
        } else {
            self.rows
        }
    }
}

impl Default for TableSpec {
    fn default() -> Self {
        Self::new(DEFAULT_DIMENSION, DEFAULT_DIMENSION, true, Alignment::Left)
    }
}

const fn clamp_dimension(value: usize) -> usize {
    if value == 0 {
        DEFAULT_DIMENSION
    } else if value > MAX_DIMENSION {
        MAX_DIMENSION
    } else {
        value
    }
}

/// Parse one dimension field.
///
/// Empty, non-numeric, zero and negative input all yield
/// [`DEFAULT_DIMENSION`]. Zero is deliberately folded into the default
/// rather than rejected. Positive values, however large, are clamped to
/// [`MAX_DIMENSION`].
pub fn normalize_dimension(raw: &str) -> usize {
    match raw.trim().parse::<i64>() {
        Ok(value) if value > 0 => {
            clamp_dimension(usize::try_from(value).unwrap_or(MAX_DIMENSION))
        }
        Err(err) if *err.kind() == IntErrorKind::PosOverflow => MAX_DIMENSION,
        _ => DEFAULT_DIMENSION,
    }
}

/// One cell of the dialog's preview grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridCell {
    pub row: usize,
    pub col: usize,
    pub is_header: bool,
    pub label: String,
}

/// Row-major cells of the preview grid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreviewGrid {
    cols: usize,
    cells: Vec<GridCell>,
}

impl PreviewGrid {
    pub fn cells(&self) -> &[GridCell] {
        &self.cells
    }

    pub const fn cols(&self) -> usize {
        self.cols
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterate the grid one row at a time.
    pub fn rows(&self) -> impl Iterator<Item = &[GridCell]> {
        self.cells.chunks(self.cols.max(1))
    }
}

/// Compute the preview grid for a spec.
///
/// Header cells are labelled `제목{n}`; body cells `{row}행{col}열`, where
/// the row is the raw zero-based index and the column is one-based.
pub fn compute_preview_grid(spec: &TableSpec) -> PreviewGrid {
    let mut cells = Vec::with_capacity(spec.rows().saturating_mul(spec.cols()));
    for row in 0..spec.rows() {
        for col in 0..spec.cols() {
            let is_header = spec.has_header && row == 0;
            let label = if is_header {
                format!("제목{}", col + 1)
            } else {
                format!("{row}행{}열", col + 1)
            };
            cells.push(GridCell {
                row,
                col,
                is_header,
                label,
            });
        }
    }
    PreviewGrid {
        cols: spec.cols(),
        cells,
    }
}

/// Serialize a spec to a GFM pipe table, trailing newline included.
///
/// Without a header there is no separator row either, so the alignment is
/// ignored. Data rows are numbered from 1 whether or not a header exists.
pub fn serialize_table(spec: &TableSpec) -> String {
    let mut out = String::new();

    if spec.has_header {
        let header: Vec<String> = (1..=spec.cols()).map(|c| format!("제목{c}")).collect();
        push_row(&mut out, &header);

        let marker = spec.align.marker();
        out.push('|');
        for _ in 0..spec.cols() {
            out.push_str(marker);
            out.push('|');
        }
        out.push('\n');
    }

    for r in 1..=spec.data_rows() {
        let row: Vec<String> = (1..=spec.cols()).map(|c| format!("내용{r}-{c}")).collect();
        push_row(&mut out, &row);
    }

    out
}

fn push_row(out: &mut String, cells: &[String]) {
    out.push('|');
    for cell in cells {
        out.push(' ');
        out.push_str(cell);
        out.push_str(" |");
    }
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use comrak::nodes::{AstNode, NodeValue};
    use comrak::{Arena, Options, parse_document};
    use proptest::prelude::*;

    fn gfm_table_shape(markdown: &str) -> Option<(usize, usize)> {
        let arena = Arena::new();
        let mut options = Options::default();
        options.extension.table = true;
        let root = parse_document(&arena, markdown, &options);
        let table = root
            .descendants()
            .find(|node| matches!(node.data.borrow().value, NodeValue::Table(_)))?;
        let rows: Vec<&AstNode<'_>> = table
            .children()
            .filter(|row| matches!(row.data.borrow().value, NodeValue::TableRow(_)))
            .collect();
        let cols = rows.first().map_or(0, |row| row.children().count());
        Some((rows.len(), cols))
    }

    // --- Dimension normalization ---

    #[test]
    fn test_normalize_dimension_accepts_positive_numbers() {
        assert_eq!(normalize_dimension("5"), 5);
        assert_eq!(normalize_dimension(" 12 "), 12);
        assert_eq!(normalize_dimension("1"), 1);
    }

    #[test]
    fn test_normalize_dimension_defaults_invalid_input() {
        assert_eq!(normalize_dimension(""), 3);
        assert_eq!(normalize_dimension("abc"), 3);
        assert_eq!(normalize_dimension("-4"), 3);
        assert_eq!(normalize_dimension("2.5"), 3);
    }

    #[test]
    fn test_normalize_dimension_folds_zero_into_default() {
        // Zero is not an error: it silently becomes the default like any
        // other unusable value.
        assert_eq!(normalize_dimension("0"), 3);
        assert_eq!(TableSpec::new(0, 0, true, Alignment::Left).rows(), 3);
    }

    #[test]
    fn test_normalize_dimension_clamps_large_values() {
        assert_eq!(normalize_dimension("100"), 100);
        assert_eq!(normalize_dimension("101"), MAX_DIMENSION);
        assert_eq!(normalize_dimension("99999999"), MAX_DIMENSION);
        assert_eq!(normalize_dimension("999999999999999999999999"), MAX_DIMENSION);
        assert_eq!(normalize_dimension("-999999999999999999999999"), 3);
    }

    #[test]
    fn test_spec_clamps_numeric_dimensions() {
        let spec = TableSpec::new(usize::MAX, usize::MAX, true, Alignment::Left);
        assert_eq!(spec.rows(), MAX_DIMENSION);
        assert_eq!(spec.cols(), MAX_DIMENSION);
        assert_eq!(
            compute_preview_grid(&spec).len(),
            MAX_DIMENSION * MAX_DIMENSION
        );
    }

    #[test]
    fn test_from_input_normalizes_each_field_independently() {
        let spec = TableSpec::from_input("", "7", false, Alignment::Right);
        assert_eq!(spec.rows(), 3);
        assert_eq!(spec.cols(), 7);
        assert!(!spec.has_header);
        assert_eq!(spec.align, Alignment::Right);
    }

    // --- Preview grid ---

    #[test]
    fn test_grid_labels_with_header() {
        let grid = compute_preview_grid(&TableSpec::new(2, 2, true, Alignment::Left));
        let labels: Vec<&str> = grid.cells().iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["제목1", "제목2", "1행1열", "1행2열"]);
    }

    #[test]
    fn test_grid_labels_without_header_start_at_row_zero() {
        let grid = compute_preview_grid(&TableSpec::new(2, 1, false, Alignment::Left));
        let labels: Vec<&str> = grid.cells().iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["0행1열", "1행1열"]);
        assert!(grid.cells().iter().all(|c| !c.is_header));
    }

    #[test]
    fn test_grid_rows_iterator_chunks_by_columns() {
        let grid = compute_preview_grid(&TableSpec::new(3, 4, true, Alignment::Left));
        let rows: Vec<_> = grid.rows().collect();
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|row| row.len() == 4));
    }

    // --- Serialization ---

    #[test]
    fn test_serialize_three_by_three_with_header() {
        let spec = TableSpec::new(3, 3, true, Alignment::Left);
        let expected = "\
| 제목1 | 제목2 | 제목3 |
|---|---|---|
| 내용1-1 | 내용1-2 | 내용1-3 |
| 내용2-1 | 내용2-2 | 내용2-3 |
";
        assert_eq!(serialize_table(&spec), expected);
    }

    #[test]
    fn test_serialize_without_header_ignores_alignment() {
        let spec = TableSpec::new(2, 2, false, Alignment::Center);
        let text = serialize_table(&spec);
        assert_eq!(text, "| 내용1-1 | 내용1-2 |\n| 내용2-1 | 내용2-2 |\n");
        assert!(!text.contains(":---:"));
    }

    #[test]
    fn test_serialize_alignment_markers() {
        let center = serialize_table(&TableSpec::new(2, 2, true, Alignment::Center));
        assert!(center.contains("|:---:|:---:|\n"));
        let right = serialize_table(&TableSpec::new(2, 2, true, Alignment::Right));
        assert!(right.contains("|---:|---:|\n"));
    }

    #[test]
    fn test_serialize_single_row_header_has_no_data_rows() {
        let text = serialize_table(&TableSpec::new(1, 2, true, Alignment::Left));
        assert_eq!(text.lines().count(), 2);
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn test_alignment_cycles() {
        assert_eq!(Alignment::Left.next().next().next(), Alignment::Left);
        assert_eq!(Alignment::Left.prev(), Alignment::Right);
    }

    proptest! {
        #[test]
        fn prop_grid_has_rows_times_cols_in_row_major_order(
            rows in 1usize..20,
            cols in 1usize..20,
            has_header in any::<bool>(),
        ) {
            let spec = TableSpec::new(rows, cols, has_header, Alignment::Left);
            let grid = compute_preview_grid(&spec);
            prop_assert_eq!(grid.len(), rows * cols);
            for (idx, cell) in grid.cells().iter().enumerate() {
                prop_assert_eq!(cell.row, idx / cols);
                prop_assert_eq!(cell.col, idx % cols);
            }
        }

        #[test]
        fn prop_only_first_row_is_header(rows in 1usize..20, cols in 1usize..20) {
            let grid = compute_preview_grid(&TableSpec::new(rows, cols, true, Alignment::Center));
            for cell in grid.cells() {
                prop_assert_eq!(cell.is_header, cell.row == 0);
            }
        }

        #[test]
        fn prop_serialized_header_table_parses_as_gfm(
            rows in 1usize..12,
            cols in 1usize..12,
            align in prop_oneof![
                Just(Alignment::Left),
                Just(Alignment::Center),
                Just(Alignment::Right),
            ],
        ) {
            let text = serialize_table(&TableSpec::new(rows, cols, true, align));
            prop_assert_eq!(gfm_table_shape(&text), Some((rows, cols)));
        }

        #[test]
        fn prop_headerless_table_has_rows_data_lines(rows in 1usize..12, cols in 1usize..12) {
            let text = serialize_table(&TableSpec::new(rows, cols, false, Alignment::Right));
            prop_assert_eq!(text.lines().count(), rows);
            prop_assert!(text.lines().all(|line| line.matches(" |").count() == cols));
        }
    }
}
