// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Preview coordination — latest request wins.
//
// Previews run through the same rasterization path at a low base scale over
// a 40-row slice. Each request is stamped with a monotonically increasing
// generation; a completed preview whose generation is stale (superseded by a
// newer request) is discarded without being surfaced. Exports never pass
// through here.

use std::sync::atomic::{AtomicU64, Ordering};

use tracing::debug;

use flachwerk_core::error::Result;
use flachwerk_raster::{
    FontCatalog, RasterBitmap, build_table, rasterize_table, sheet_scale,
};
use flachwerk_sheet::extract::{extract, slice_rows};
use flachwerk_sheet::layout::{layout, merge_index};

use crate::session::ExportSession;

/// Rows shown in a preview.
pub const PREVIEW_ROWS: usize = 40;
/// Base render scale for previews; lower fidelity than any export preset.
pub const PREVIEW_BASE_SCALE: f64 = 1.2;

/// Generation stamp for one preview request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewTicket {
    generation: u64,
}

/// Monotonic generation counter deciding which preview result may be shown.
#[derive(Debug, Default)]
pub struct PreviewCoordinator {
    latest: AtomicU64,
}

impl PreviewCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp a new request, superseding all earlier ones.
    pub fn begin(&self) -> PreviewTicket {
        let generation = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        PreviewTicket { generation }
    }

    /// Whether a ticket still represents the newest request.
    pub fn is_current(&self, ticket: PreviewTicket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.generation
    }

    /// Gate a completed preview: stale results are dropped, never drawn.
    pub fn complete(&self, ticket: PreviewTicket, bitmap: RasterBitmap) -> Option<RasterBitmap> {
        if self.is_current(ticket) {
            Some(bitmap)
        } else {
            debug!(generation = ticket.generation, "stale preview discarded");
            None
        }
    }

    /// Render a preview of the session's selected sheet.
    ///
    /// Returns `Ok(None)` when there is nothing to draw (no sheet selected,
    /// empty sheet) or when the result came back stale.
    pub fn render_preview(
        &self,
        session: &ExportSession,
        catalog: &mut FontCatalog,
    ) -> Result<Option<RasterBitmap>> {
        let ticket = self.begin();

        let Ok(loaded) = session.workbook() else {
            return Ok(None);
        };
        let Some(name) = session.selected_sheet() else {
            return Ok(None);
        };
        let Some(sheet) = loaded.workbook.sheet(name) else {
            return Ok(None);
        };

        let config = session.config();
        let data = extract(sheet);
        if data.is_empty() {
            return Ok(None);
        }
        let data = slice_rows(&data, PREVIEW_ROWS);
        let dims = layout(&data, &config.table_style);
        let scale = sheet_scale(PREVIEW_BASE_SCALE, dims.width, dims.height, &config.limits);
        let index = merge_index(&data.merges);
        let table = build_table(&data, &dims, &index, &config.table_style);
        let bitmap = rasterize_table(catalog, &table, &config.table_style, scale)?;

        Ok(self.complete(ticket, bitmap))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn bitmap() -> RasterBitmap {
        RasterBitmap::filled(4, 4, Rgba([255, 255, 255, 255])).unwrap()
    }

    #[test]
    fn generations_increase_monotonically() {
        let coordinator = PreviewCoordinator::new();
        let first = coordinator.begin();
        let second = coordinator.begin();
        assert!(second.generation > first.generation);
    }

    #[test]
    fn current_ticket_passes_its_result_through() {
        let coordinator = PreviewCoordinator::new();
        let ticket = coordinator.begin();
        assert!(coordinator.complete(ticket, bitmap()).is_some());
    }

    #[test]
    fn superseded_ticket_is_dropped() {
        let coordinator = PreviewCoordinator::new();
        let stale = coordinator.begin();
        let _newer = coordinator.begin();
        assert!(coordinator.complete(stale, bitmap()).is_none());
    }
}
