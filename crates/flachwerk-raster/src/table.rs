// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Styled table structure — the abstract table the compositor paints.
//
// Built fresh for every render from the normalized sheet, the resolved
// layout, and the merge index. Cells covered by a merge are absent; the
// merge's start cell carries the row/col span instead.

use flachwerk_core::config::TableStyle;
use flachwerk_sheet::extract::SheetData;
use flachwerk_sheet::layout::{MergeIndex, TableDimensions};
use flachwerk_sheet::style::{CellStyle, resolve_cell_style};

/// One cell scheduled for painting.
#[derive(Debug, Clone)]
pub struct StyledCell {
    pub text: String,
    pub style: CellStyle,
    pub row: usize,
    pub col: usize,
    pub row_span: usize,
    pub col_span: usize,
}

/// A fully laid-out, styled table in unscaled pixels.
#[derive(Debug, Clone, Default)]
pub struct StyledTable {
    /// Cumulative column edges, length `cols + 1`, starting at 0.
    pub col_offsets: Vec<f64>,
    /// Cumulative row edges, length `rows + 1`, starting at 0.
    pub row_offsets: Vec<f64>,
    pub cells: Vec<StyledCell>,
    pub width: f64,
    pub height: f64,
}

impl StyledTable {
    /// Distinct font families referenced by cells that will draw text.
    pub fn text_families(&self) -> Vec<&str> {
        let mut families: Vec<&str> = self
            .cells
            .iter()
            .filter(|cell| !cell.text.is_empty())
            .map(|cell| cell.style.font.name.as_str())
            .collect();
        families.sort_unstable();
        families.dedup();
        families
    }
}

fn edges(sizes: &[f64]) -> Vec<f64> {
    let mut offsets = Vec::with_capacity(sizes.len() + 1);
    let mut total = 0.0;
    offsets.push(0.0);
    for size in sizes {
        total += size;
        offsets.push(total);
    }
    offsets
}

/// Build the styled table for one render.
///
/// Style resolution happens here, per cell, on every call — resolved
/// attributes are never cached across renders.
pub fn build_table(
    data: &SheetData,
    dims: &TableDimensions,
    merges: &MergeIndex,
    style: &TableStyle,
) -> StyledTable {
    let mut cells = Vec::new();
    for row in &data.cells {
        for cell in row {
            if merges.is_covered(cell.row, cell.col) {
                continue;
            }
            let (row_span, col_span) = match merges.span_at(cell.row, cell.col) {
                Some(merge) => (merge.row_span(), merge.col_span()),
                None => (1, 1),
            };
            cells.push(StyledCell {
                text: cell.text.clone(),
                style: resolve_cell_style(cell.style.as_ref(), style),
                row: cell.row,
                col: cell.col,
                row_span,
                col_span,
            });
        }
    }

    StyledTable {
        col_offsets: edges(&dims.col_widths),
        row_offsets: edges(&dims.row_heights),
        cells,
        width: dims.width,
        height: dims.height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flachwerk_sheet::extract::{Merge, extract};
    use flachwerk_sheet::layout::{layout, merge_index};
    use flachwerk_sheet::raw::{RawCell, RawSheet};

    fn two_by_two() -> (SheetData, TableDimensions) {
        let mut sheet = RawSheet::new();
        sheet.set_cell(0, 0, RawCell::text("a"));
        sheet.set_cell(0, 1, RawCell::text("b"));
        sheet.set_cell(1, 0, RawCell::text("c"));
        sheet.set_cell(1, 1, RawCell::text("d"));
        let data = extract(&sheet);
        let dims = layout(&data, &TableStyle::default());
        (data, dims)
    }

    #[test]
    fn covered_cells_are_absent_and_start_carries_span() {
        let (mut data, dims) = two_by_two();
        data.merges = vec![Merge { start: (0, 0), end: (0, 1) }];
        let index = merge_index(&data.merges);
        let table = build_table(&data, &dims, &index, &TableStyle::default());

        assert_eq!(table.cells.len(), 3);
        let start = table
            .cells
            .iter()
            .find(|c| c.row == 0 && c.col == 0)
            .unwrap();
        assert_eq!(start.col_span, 2);
        assert_eq!(start.row_span, 1);
        assert!(!table.cells.iter().any(|c| c.row == 0 && c.col == 1));
    }

    #[test]
    fn offsets_are_cumulative_edges() {
        let (data, dims) = two_by_two();
        let table = build_table(&data, &dims, &MergeIndex::default(), &TableStyle::default());
        assert_eq!(table.col_offsets, vec![0.0, 64.0, 128.0]);
        assert_eq!(table.row_offsets, vec![0.0, 24.0, 48.0]);
        assert_eq!(table.width, 128.0);
        assert_eq!(table.height, 48.0);
    }

    #[test]
    fn text_families_deduplicate() {
        let (data, dims) = two_by_two();
        let table = build_table(&data, &dims, &MergeIndex::default(), &TableStyle::default());
        assert_eq!(table.text_families(), vec!["IBM Plex Sans"]);
    }
}
