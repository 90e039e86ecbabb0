// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Sheet data extraction — raw sparse sheet to a normalized rectangular grid.

use tracing::debug;

use flachwerk_core::config::PX_PER_PT;

use crate::raw::{ColSpec, RawCellKind, RawRange, RawSheet, RawStyle, RowSpec};

/// One normalized grid cell. Coordinates are range-relative.
#[derive(Debug, Clone, Default)]
pub struct Cell {
    pub text: String,
    /// Raw style descriptor; resolved at render time, every time.
    pub style: Option<RawStyle>,
    pub row: usize,
    pub col: usize,
    pub has_value: bool,
    pub has_style: bool,
    pub has_cell: bool,
}

/// A merge in range-relative coordinates, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Merge {
    pub start: (usize, usize),
    pub end: (usize, usize),
}

impl Merge {
    pub fn row_span(&self) -> usize {
        self.end.0 - self.start.0 + 1
    }

    pub fn col_span(&self) -> usize {
        self.end.1 - self.start.1 + 1
    }
}

/// Normalized sheet: rectangular cell grid bounded to the populated range,
/// merges inside the grid, and per-column/row size hints.
///
/// Invariant: every row has length `col_count`, and every merge lies within
/// `[0, row_count) x [0, col_count)`.
#[derive(Debug, Clone, Default)]
pub struct SheetData {
    pub cells: Vec<Vec<Cell>>,
    pub merges: Vec<Merge>,
    pub col_widths: Vec<Option<f64>>,
    pub row_heights: Vec<Option<f64>>,
}

impl SheetData {
    pub fn row_count(&self) -> usize {
        self.cells.len()
    }

    pub fn col_count(&self) -> usize {
        self.cells.first().map(|row| row.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Convert a column sizing hint to pixels.
///
/// Pixel hints pass through verbatim; character hints use the legacy
/// `floor(chars * 7 + 5)` conversion.
pub fn col_spec_to_px(spec: Option<&ColSpec>) -> Option<f64> {
    let spec = spec?;
    if let Some(px) = spec.px {
        return Some(px);
    }
    spec.chars.map(|chars| (chars * 7.0 + 5.0).floor())
}

/// Convert a row sizing hint to pixels (`points * 96/72`).
pub fn row_spec_to_px(spec: Option<&RowSpec>) -> Option<f64> {
    let spec = spec?;
    if let Some(px) = spec.px {
        return Some(px);
    }
    spec.points.map(|points| points * PX_PER_PT)
}

/// Determine the populated range: the declared range when present, otherwise
/// the bounding box of all addressed cells. `None` when nothing is populated.
pub fn sheet_range(sheet: &RawSheet) -> Option<RawRange> {
    if let Some(range) = sheet.range {
        return Some(range);
    }
    let mut bounds: Option<((u32, u32), (u32, u32))> = None;
    for &(row, col) in sheet.cells.keys() {
        bounds = Some(match bounds {
            None => ((row, col), (row, col)),
            Some((min, max)) => (
                (min.0.min(row), min.1.min(col)),
                (max.0.max(row), max.1.max(col)),
            ),
        });
    }
    bounds.map(|(start, end)| RawRange { start, end })
}

/// Extract a normalized [`SheetData`] from a raw sheet.
pub fn extract(sheet: &RawSheet) -> SheetData {
    let Some(range) = sheet_range(sheet) else {
        return SheetData::default();
    };
    let row_count = (range.end.0 - range.start.0 + 1) as usize;
    let col_count = (range.end.1 - range.start.1 + 1) as usize;

    let mut cells = Vec::with_capacity(row_count);
    for row_index in 0..row_count {
        let mut row = Vec::with_capacity(col_count);
        for col_index in 0..col_count {
            let address = (
                range.start.0 + row_index as u32,
                range.start.1 + col_index as u32,
            );
            let raw = sheet.cells.get(&address);

            let mut text = String::new();
            let mut has_value = false;
            let has_cell = raw.is_some();
            let mut has_style = false;
            if let Some(raw) = raw {
                if let Some(formatted) = &raw.formatted {
                    text = formatted.clone();
                    has_value = true;
                } else if let Some(value) = &raw.value {
                    text = value.clone();
                    has_value = true;
                } else if raw.formula.is_some() {
                    has_value = true;
                }
                if raw.kind.is_some_and(|kind| kind != RawCellKind::Blank) {
                    has_value = true;
                }
                has_style = raw.style.as_ref().is_some_and(|s| !s.is_empty());
            }

            row.push(Cell {
                text,
                style: raw.and_then(|r| r.style.clone()),
                row: row_index,
                col: col_index,
                has_value,
                has_style,
                has_cell,
            });
        }
        cells.push(row);
    }

    // Rebase merges to range-relative coordinates; a merge with any corner
    // outside the final grid is dropped whole, never clipped.
    let merges = sheet
        .merges
        .iter()
        .filter_map(|merge| {
            let start_row = merge.start.0 as i64 - range.start.0 as i64;
            let start_col = merge.start.1 as i64 - range.start.1 as i64;
            let end_row = merge.end.0 as i64 - range.start.0 as i64;
            let end_col = merge.end.1 as i64 - range.start.1 as i64;
            if start_row >= 0
                && start_col >= 0
                && end_row >= start_row
                && end_col >= start_col
                && end_row < row_count as i64
                && end_col < col_count as i64
            {
                Some(Merge {
                    start: (start_row as usize, start_col as usize),
                    end: (end_row as usize, end_col as usize),
                })
            } else {
                None
            }
        })
        .collect::<Vec<_>>();

    let col_widths = (0..col_count)
        .map(|index| col_spec_to_px(sheet.cols.get(&(range.start.1 + index as u32))))
        .collect();
    let row_heights = (0..row_count)
        .map(|index| row_spec_to_px(sheet.rows.get(&(range.start.0 + index as u32))))
        .collect();

    debug!(rows = row_count, cols = col_count, merges = merges.len(), "sheet extracted");

    SheetData {
        cells,
        merges,
        col_widths,
        row_heights,
    }
}

/// Keep only the first `max_rows` rows, preserving order.
///
/// Merges that do not lie fully inside the kept rows are dropped, not
/// clipped. Used by the preview path.
pub fn slice_rows(data: &SheetData, max_rows: usize) -> SheetData {
    let rows = data.row_count();
    if rows <= max_rows {
        return data.clone();
    }

    let kept = max_rows.min(rows);
    let cells = data.cells[..kept].to_vec();
    let merges = data
        .merges
        .iter()
        .copied()
        .filter(|merge| merge.start.0 < kept && merge.end.0 < kept)
        .collect();

    SheetData {
        cells,
        merges,
        col_widths: data.col_widths.clone(),
        row_heights: data.row_heights[..kept].to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raw::{RawCell, RawStyle};

    fn sheet_with(cells: &[((u32, u32), RawCell)]) -> RawSheet {
        let mut sheet = RawSheet::new();
        for ((row, col), cell) in cells {
            sheet.set_cell(*row, *col, cell.clone());
        }
        sheet
    }

    #[test]
    fn empty_sheet_extracts_to_empty_grid() {
        let data = extract(&RawSheet::new());
        assert!(data.is_empty());
        assert_eq!(data.col_count(), 0);
    }

    #[test]
    fn range_scan_uses_min_max_of_addressed_cells() {
        let sheet = sheet_with(&[
            ((2, 1), RawCell::text("a")),
            ((4, 3), RawCell::text("b")),
        ]);
        let data = extract(&sheet);
        assert_eq!(data.row_count(), 3);
        assert_eq!(data.col_count(), 3);
        assert_eq!(data.cells[0][0].text, "a");
        assert_eq!(data.cells[2][2].text, "b");
        assert!(!data.cells[1][1].has_cell);
    }

    #[test]
    fn declared_range_wins_over_scan() {
        let mut sheet = sheet_with(&[((0, 0), RawCell::text("x"))]);
        sheet.range = Some(RawRange::new((0, 0), (1, 1)));
        let data = extract(&sheet);
        assert_eq!(data.row_count(), 2);
        assert_eq!(data.col_count(), 2);
    }

    #[test]
    fn text_priority_formatted_then_value_then_formula() {
        let mut cell = RawCell::text("raw");
        cell.formatted = Some("fmt".into());
        let sheet = sheet_with(&[((0, 0), cell)]);
        assert_eq!(extract(&sheet).cells[0][0].text, "fmt");

        let formula_only = RawCell {
            formula: Some("A1+A2".into()),
            ..RawCell::default()
        };
        let sheet = sheet_with(&[((0, 0), formula_only)]);
        let cell = &extract(&sheet).cells[0][0];
        assert_eq!(cell.text, "");
        assert!(cell.has_value);
    }

    #[test]
    fn style_only_cell_sets_flags() {
        let cell = RawCell::default().with_style(RawStyle {
            font: Some(crate::raw::RawFont { bold: true, ..Default::default() }),
            ..RawStyle::default()
        });
        let sheet = sheet_with(&[((0, 0), cell)]);
        let extracted = extract(&sheet);
        let cell = &extracted.cells[0][0];
        assert!(cell.has_cell);
        assert!(cell.has_style);
        assert!(!cell.has_value);
    }

    #[test]
    fn merges_are_rebased_and_out_of_bounds_ones_dropped() {
        let mut sheet = sheet_with(&[
            ((1, 1), RawCell::text("a")),
            ((2, 2), RawCell::text("b")),
        ]);
        // Inside after rebase: (1,1)-(2,2) becomes (0,0)-(1,1).
        sheet.merges.push(RawRange::new((1, 1), (2, 2)));
        // Starts before the populated range: dropped.
        sheet.merges.push(RawRange::new((0, 0), (1, 1)));
        // Ends past the populated range: dropped, not clipped.
        sheet.merges.push(RawRange::new((2, 2), (5, 2)));

        let data = extract(&sheet);
        assert_eq!(data.merges.len(), 1);
        assert_eq!(data.merges[0].start, (0, 0));
        assert_eq!(data.merges[0].end, (1, 1));
    }

    #[test]
    fn column_hint_conversion_laws() {
        assert_eq!(
            col_spec_to_px(Some(&ColSpec { px: None, chars: Some(10.0) })),
            Some(75.0)
        );
        assert_eq!(
            col_spec_to_px(Some(&ColSpec { px: Some(120.0), chars: Some(10.0) })),
            Some(120.0)
        );
        assert_eq!(
            row_spec_to_px(Some(&RowSpec { px: None, points: Some(12.0) })),
            Some(16.0)
        );
        assert_eq!(col_spec_to_px(None), None);
        assert_eq!(row_spec_to_px(None), None);
    }

    #[test]
    fn slice_keeps_first_rows_in_order() {
        let sheet = sheet_with(&[
            ((0, 0), RawCell::text("r0")),
            ((1, 0), RawCell::text("r1")),
            ((2, 0), RawCell::text("r2")),
        ]);
        let data = extract(&sheet);
        let sliced = slice_rows(&data, 2);
        assert_eq!(sliced.row_count(), 2);
        assert_eq!(sliced.cells[0][0].text, "r0");
        assert_eq!(sliced.cells[1][0].text, "r1");
        assert_eq!(sliced.row_heights.len(), 2);
    }

    #[test]
    fn slice_drops_boundary_crossing_merges() {
        let mut sheet = sheet_with(&[
            ((0, 0), RawCell::text("a")),
            ((3, 1), RawCell::text("b")),
        ]);
        sheet.merges.push(RawRange::new((0, 0), (1, 1))); // inside the slice
        sheet.merges.push(RawRange::new((1, 0), (3, 0))); // crosses the boundary
        let data = extract(&sheet);
        assert_eq!(data.merges.len(), 2);

        let sliced = slice_rows(&data, 2);
        assert_eq!(sliced.merges.len(), 1);
        assert_eq!(sliced.merges[0].end, (1, 1));

        // Re-slicing at or past the row count is the identity and never
        // reintroduces a dropped merge.
        let resliced = slice_rows(&sliced, 10);
        assert_eq!(resliced.merges.len(), 1);
    }
}
