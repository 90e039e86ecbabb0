// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Spreadsheet export — one single-page PDF per sheet.
//
// Combined mode flattens the currently selected sheet; separate mode walks
// every sheet in workbook order and yields one file per sheet, named by the
// sanitized sheet name. Both paths perform a single assembler attempt: the
// render scale is policy-clamped before any pixels exist, so the sheet path
// does not route through the embed retry controller (see DESIGN.md).

use tracing::{info, instrument};

use flachwerk_core::error::Result;
use flachwerk_core::sanitize::sanitize_name;
use flachwerk_core::types::{ExportMode, SourceKind};
use flachwerk_raster::{
    FontCatalog, build_table, rasterize_table, sheet_scale, shrink_to_budget,
};
use flachwerk_sheet::extract::extract;
use flachwerk_sheet::layout::{layout, merge_index};
use flachwerk_sheet::raw::RawSheet;
use flachwerk_document::PageAssembler;

use crate::session::ExportSession;

/// One produced output file.
#[derive(Debug, Clone)]
pub struct ExportedFile {
    /// Sanitized file stem (no extension).
    pub stem: String,
    pub bytes: Vec<u8>,
}

/// Flatten one sheet into a single-page PDF.
#[instrument(skip_all, fields(sheet = name))]
fn build_sheet_pdf(
    session: &ExportSession,
    catalog: &mut FontCatalog,
    name: &str,
    sheet: &RawSheet,
) -> Result<Vec<u8>> {
    let config = session.config();
    let data = extract(sheet);
    let dims = layout(&data, &config.table_style);
    let scale = sheet_scale(config.scale, dims.width, dims.height, &config.limits);
    info!(
        width = dims.width,
        height = dims.height,
        scale,
        "rendering sheet"
    );

    let index = merge_index(&data.merges);
    let table = build_table(&data, &dims, &index, &config.table_style);
    let bitmap = rasterize_table(catalog, &table, &config.table_style, scale)?;
    let bitmap = shrink_to_budget(bitmap, &config.limits);

    let title = config.title.clone().unwrap_or_else(|| name.to_string());
    let mut assembler = PageAssembler::new(&title);
    assembler.append_bitmap(&bitmap)?;
    Ok(assembler.finish())
}

/// Export the currently selected sheet (combined mode).
pub fn export_selected_sheet(
    session: &ExportSession,
    catalog: &mut FontCatalog,
) -> Result<ExportedFile> {
    let loaded = session.workbook()?;
    let ticket = session.ticket(SourceKind::Spreadsheet);
    let name = session.selected_sheet().unwrap_or("sheet").to_string();
    let empty = RawSheet::new();
    let sheet = loaded.workbook.sheet(&name).unwrap_or(&empty);
    info!(export = %ticket.id, sheet = %name, "combined export started");
    let bytes = build_sheet_pdf(session, catalog, &name, sheet)?;
    Ok(ExportedFile {
        stem: sanitize_name(&name),
        bytes,
    })
}

/// Export one sheet by name, regardless of the current selection.
pub fn export_sheet_by_name(
    session: &ExportSession,
    catalog: &mut FontCatalog,
    name: &str,
) -> Result<ExportedFile> {
    let loaded = session.workbook()?;
    let sheet = loaded
        .workbook
        .sheet(name)
        .ok_or_else(|| flachwerk_core::error::FlachwerkError::Sheet(format!(
            "no sheet named '{name}'"
        )))?;
    let bytes = build_sheet_pdf(session, catalog, name, sheet)?;
    Ok(ExportedFile {
        stem: sanitize_name(name),
        bytes,
    })
}

/// Export every sheet as its own file (separate mode), in workbook order.
pub fn export_all_sheets(
    session: &ExportSession,
    catalog: &mut FontCatalog,
) -> Result<Vec<ExportedFile>> {
    export_all_sheets_with(session, catalog, &mut |_| Ok(()))
}

/// Separate-mode export with a per-file sink.
///
/// Files are handed to `on_file` as they are produced, so an abort partway
/// through leaves the already-delivered files with the caller; only the
/// in-progress sheet is lost.
pub fn export_all_sheets_with(
    session: &ExportSession,
    catalog: &mut FontCatalog,
    on_file: &mut dyn FnMut(&ExportedFile) -> Result<()>,
) -> Result<Vec<ExportedFile>> {
    let loaded = session.workbook()?;
    let ticket = session.ticket(SourceKind::Spreadsheet);
    info!(
        export = %ticket.id,
        sheets = loaded.workbook.sheets.len(),
        "separate export started"
    );
    let mut files = Vec::with_capacity(loaded.workbook.sheets.len());
    for (name, sheet) in &loaded.workbook.sheets {
        let bytes = build_sheet_pdf(session, catalog, name, sheet)?;
        let file = ExportedFile {
            stem: sanitize_name(name),
            bytes,
        };
        on_file(&file)?;
        files.push(file);
    }
    info!(export = %ticket.id, files = files.len(), "separate export complete");
    Ok(files)
}

/// Export according to the configured [`ExportMode`].
pub fn export_sheets(
    session: &ExportSession,
    catalog: &mut FontCatalog,
) -> Result<Vec<ExportedFile>> {
    match session.config().mode {
        ExportMode::Combined => Ok(vec![export_selected_sheet(session, catalog)?]),
        ExportMode::Separate => export_all_sheets(session, catalog),
    }
}
