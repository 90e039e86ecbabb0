// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Table layout — final pixel dimensions for every column and row, plus the
// merge index used at render time.

use std::collections::{HashMap, HashSet};

use flachwerk_core::config::TableStyle;

use crate::extract::{Merge, SheetData};
use crate::style::font_size_of;

/// Resolved pixel dimensions for a table.
///
/// Derived on every request; never cached across mutations of the grid.
#[derive(Debug, Clone, Default)]
pub struct TableDimensions {
    pub col_widths: Vec<f64>,
    pub row_heights: Vec<f64>,
    pub width: f64,
    pub height: f64,
}

/// Merge lookup for rendering: spans at start coordinates, everything else
/// inside a merge is skipped entirely.
#[derive(Debug, Clone, Default)]
pub struct MergeIndex {
    pub starts: HashMap<(usize, usize), Merge>,
    pub covered: HashSet<(usize, usize)>,
}

impl MergeIndex {
    pub fn is_covered(&self, row: usize, col: usize) -> bool {
        self.covered.contains(&(row, col))
    }

    pub fn span_at(&self, row: usize, col: usize) -> Option<&Merge> {
        self.starts.get(&(row, col))
    }
}

/// Build the merge index from range-relative merges.
pub fn merge_index(merges: &[Merge]) -> MergeIndex {
    let mut index = MergeIndex::default();
    for merge in merges {
        index.starts.insert(merge.start, *merge);
        for row in merge.start.0..=merge.end.0 {
            for col in merge.start.1..=merge.end.1 {
                if (row, col) == merge.start {
                    continue;
                }
                index.covered.insert((row, col));
            }
        }
    }
    index
}

/// Compute final pixel dimensions for every column and row.
///
/// Columns: explicit hint verbatim, else the configured minimum. Rows:
/// explicit hint verbatim, else the tallest font in the row (floored at the
/// base font size) plus vertical padding on both sides. Non-positive hints
/// count as absent.
pub fn layout(data: &SheetData, style: &TableStyle) -> TableDimensions {
    let col_widths: Vec<f64> = (0..data.col_count())
        .map(|index| {
            data.col_widths
                .get(index)
                .copied()
                .flatten()
                .filter(|width| *width > 0.0)
                .unwrap_or(style.min_col_width)
        })
        .collect();

    let row_heights: Vec<f64> = data
        .cells
        .iter()
        .enumerate()
        .map(|(index, row)| {
            if let Some(preset) = data
                .row_heights
                .get(index)
                .copied()
                .flatten()
                .filter(|height| *height > 0.0)
            {
                return preset;
            }
            let tallest = row
                .iter()
                .map(|cell| font_size_of(cell.style.as_ref(), style))
                .fold(style.font_size, f64::max);
            tallest + style.padding_y * 2.0
        })
        .collect();

    let width = col_widths.iter().sum();
    let height = row_heights.iter().sum();

    TableDimensions {
        col_widths,
        row_heights,
        width,
        height,
    }
}
