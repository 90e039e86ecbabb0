// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// flachwerk-sheet — Spreadsheet normalization for the Flachwerk engine.
//
// Provides the raw workbook model (the decoder boundary), the color/style
// resolver with the legacy indexed and theme palettes, the sheet data
// extractor, row slicing, and the table layout builder.

pub mod extract;
pub mod layout;
pub mod palette;
pub mod raw;
pub mod style;
pub mod xlsx;

pub use extract::{Cell, Merge, SheetData, extract, slice_rows};
pub use layout::{MergeIndex, TableDimensions, layout, merge_index};
pub use raw::{ColorSpec, RawCell, RawSheet, RawStyle, RawWorkbook};
pub use style::{CellBorder, CellStyle, resolve_cell_style, resolve_color};
