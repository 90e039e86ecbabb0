// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// External-document flattening — every source page becomes one full-bleed
// image page in the output.
//
// Pages are processed strictly in order, one at a time. Each page goes
// through the two-stage policy (render-scale clamp, post-render shrink) and
// is embedded through the retry controller.

use tracing::{info, instrument};

use flachwerk_core::error::Result;
use flachwerk_core::types::{ExportProgress, ExportStage, SourceKind};
use flachwerk_document::{PageAssembler, PageSource, RetryPolicy, embed_with_retry};
use flachwerk_raster::{document_render_scale, shrink_to_budget};

use crate::session::ExportSession;

/// Flatten every page of a source into one output document.
#[instrument(skip_all, fields(pages = source.page_count()))]
pub fn flatten_document(
    source: &mut dyn PageSource,
    session: &ExportSession,
    on_progress: &mut dyn FnMut(ExportProgress),
) -> Result<Vec<u8>> {
    let config = session.config();
    let ticket = session.ticket(SourceKind::Document);
    let total = source.page_count();
    info!(export = %ticket.id, pages = total, "flattening started");
    let title = config.title.clone().unwrap_or_else(|| "document".into());
    let mut assembler = PageAssembler::new(&title);
    let retry = RetryPolicy::default();

    for index in 0..total {
        let page_number = index + 1;
        on_progress(ExportProgress::page(
            ExportStage::Rendering,
            page_number,
            total,
            format!("Rendering page {page_number} of {total}..."),
        ));

        let (base_width, base_height) = source.base_size(index)?;
        let decision =
            document_render_scale(config.scale, base_width, base_height, &config.limits);
        if decision.degraded {
            on_progress(ExportProgress::page(
                ExportStage::Rendering,
                page_number,
                total,
                format!(
                    "Rendering page {page_number} of {total} at {:.1}x (scaled down to fit memory)...",
                    decision.scale
                ),
            ));
        }

        let bitmap = source.render(index, decision.scale)?;
        let bitmap = shrink_to_budget(bitmap, &config.limits);

        on_progress(ExportProgress::page(
            ExportStage::Assembling,
            page_number,
            total,
            format!("Embedding page {page_number} of {total}..."),
        ));
        embed_with_retry(&retry, bitmap, |b| assembler.append_bitmap(b))?;
    }

    let bytes = assembler.finish();
    info!(pages = total, bytes = bytes.len(), "document flattened");
    on_progress(ExportProgress::stage(ExportStage::Complete, "PDF ready."));
    Ok(bytes)
}

/// Flatten the session's loaded document through the bundled pdfium source.
///
/// Without the `pdfium` feature this fails fast once the document is known
/// to be present; probing and session handling stay available either way.
pub fn flatten_loaded_document(
    session: &ExportSession,
    on_progress: &mut dyn FnMut(ExportProgress),
) -> Result<Vec<u8>> {
    let loaded = session.document()?;

    #[cfg(feature = "pdfium")]
    {
        let mut source = flachwerk_document::PdfiumSource::from_bytes(loaded.bytes.clone())?;
        flatten_document(&mut source, session, on_progress)
    }

    #[cfg(not(feature = "pdfium"))]
    {
        let _ = loaded;
        Err(flachwerk_core::error::FlachwerkError::FeatureUnavailable(
            "pdfium",
        ))
    }
}
