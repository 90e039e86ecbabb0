// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// XLSX loading via calamine.
//
// Calamine exposes values, formulas, merged regions, and the used range, but
// not style records or column/row metrics, so those fields of the raw model
// stay empty here. Decoders with style access populate `RawWorkbook`
// directly; this loader is the bundled default.

use std::io::Cursor;
use std::path::Path;

use calamine::{Data, Reader, Xlsx, open_workbook};
use tracing::{debug, info, instrument, warn};

use flachwerk_core::error::{FlachwerkError, Result};

use crate::raw::{RawCell, RawCellKind, RawRange, RawSheet, RawWorkbook};

/// Load a workbook from a byte buffer.
#[instrument(skip_all, fields(bytes_len = data.len()))]
pub fn load_workbook_bytes(data: &[u8]) -> Result<RawWorkbook> {
    let workbook: Xlsx<_> = Xlsx::new(Cursor::new(data.to_vec()))
        .map_err(|err| FlachwerkError::Parse(format!("failed to read workbook: {err}")))?;
    build_workbook(workbook)
}

/// Load a workbook from the filesystem.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn load_workbook_path(path: impl AsRef<Path>) -> Result<RawWorkbook> {
    let workbook: Xlsx<_> = open_workbook(path.as_ref()).map_err(|err| {
        FlachwerkError::Parse(format!(
            "failed to open {}: {err}",
            path.as_ref().display()
        ))
    })?;
    build_workbook(workbook)
}

fn build_workbook<RS: std::io::Read + std::io::Seek>(mut workbook: Xlsx<RS>) -> Result<RawWorkbook> {
    if let Err(err) = workbook.load_merged_regions() {
        // Merges are optional metadata; a sheet without them still flattens.
        warn!(%err, "could not load merged regions");
    }

    let sheet_names = workbook.sheet_names().to_vec();
    info!(sheets = sheet_names.len(), "workbook opened");

    let mut raw = RawWorkbook::default();
    for name in sheet_names {
        let range = workbook
            .worksheet_range(&name)
            .map_err(|err| FlachwerkError::Sheet(format!("sheet '{name}': {err}")))?;

        let mut sheet = RawSheet::new();

        if let (Some(start), Some(end)) = (range.start(), range.end()) {
            sheet.range = Some(RawRange::new(start, end));
            for (row_offset, row) in range.rows().enumerate() {
                for (col_offset, data) in row.iter().enumerate() {
                    if matches!(data, Data::Empty) {
                        continue;
                    }
                    let address = (start.0 + row_offset as u32, start.1 + col_offset as u32);
                    sheet.set_cell(address.0, address.1, data_to_cell(data));
                }
            }
        }

        if let Ok(formulas) = workbook.worksheet_formula(&name) {
            if let Some(start) = formulas.start() {
                for (row_offset, row) in formulas.rows().enumerate() {
                    for (col_offset, formula) in row.iter().enumerate() {
                        if formula.is_empty() {
                            continue;
                        }
                        let address = (start.0 + row_offset as u32, start.1 + col_offset as u32);
                        sheet
                            .cells
                            .entry(address)
                            .or_default()
                            .formula = Some(formula.clone());
                    }
                }
            }
        }

        for (_, _, dimensions) in workbook.merged_regions_by_sheet(&name) {
            sheet
                .merges
                .push(RawRange::new(dimensions.start, dimensions.end));
        }

        debug!(
            sheet = %name,
            cells = sheet.cells.len(),
            merges = sheet.merges.len(),
            "sheet loaded"
        );
        raw.sheets.push((name, sheet));
    }

    Ok(raw)
}

/// Map a calamine value to a raw cell. Number formats are not available at
/// this layer, so `formatted` stays empty and `value` carries the display
/// rendering of the raw value.
fn data_to_cell(data: &Data) -> RawCell {
    let (value, kind) = match data {
        Data::Empty => (None, None),
        Data::String(s) => (Some(s.clone()), Some(RawCellKind::Text)),
        Data::Float(f) => (Some(f.to_string()), Some(RawCellKind::Number)),
        Data::Int(i) => (Some(i.to_string()), Some(RawCellKind::Number)),
        Data::Bool(b) => (
            Some(if *b { "TRUE".into() } else { "FALSE".into() }),
            Some(RawCellKind::Bool),
        ),
        Data::DateTime(dt) => (Some(dt.as_f64().to_string()), Some(RawCellKind::DateTime)),
        Data::DateTimeIso(s) => (Some(s.clone()), Some(RawCellKind::DateTime)),
        Data::DurationIso(s) => (Some(s.clone()), Some(RawCellKind::Text)),
        Data::Error(e) => (Some(format!("{e}")), Some(RawCellKind::Error)),
    };
    RawCell {
        value,
        kind,
        ..RawCell::default()
    }
}
