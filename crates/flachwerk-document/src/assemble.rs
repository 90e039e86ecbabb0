// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page assembler — embeds bitmaps as full-bleed image pages using `printpdf`.
//
// printpdf 0.8 uses a data-oriented API: pages are `PdfPage` structs holding
// `Vec<Op>` operation lists, serialised via `PdfDocument::save()`. Each
// bitmap becomes one page sized to the bitmap exactly (pixels at 96 dpi,
// so points = pixels * 72/96), with the image at the lower-left origin.

use printpdf::{
    Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Pt, RawImage, XObjectTransform,
};
use tracing::{debug, info, instrument};

use flachwerk_core::config::PX_PER_PT;
use flachwerk_core::error::{EncodeStage, FlachwerkError, Result};
use flachwerk_raster::RasterBitmap;

/// The canonical PNG signature prefix.
const PNG_SIGNATURE: [u8; 4] = [0x89, b'P', b'N', b'G'];

/// Embed dpi chosen so an image of N pixels spans exactly N * 72/96 points.
const EMBED_DPI: f32 = 96.0;

const MM_PER_PT: f32 = 25.4 / 72.0;

/// Reject an encoded stream that does not start with the PNG signature.
pub fn validate_png_signature(bytes: &[u8]) -> Result<()> {
    if bytes.len() < PNG_SIGNATURE.len() || bytes[..PNG_SIGNATURE.len()] != PNG_SIGNATURE {
        return Err(FlachwerkError::ImageEncode {
            stage: EncodeStage::SignatureCheck,
            detail: "encoded stream does not carry the PNG signature".into(),
        });
    }
    Ok(())
}

/// Accumulates full-bleed image pages and serialises them into one PDF.
///
/// Pages are appended strictly in call order; the document is built
/// incrementally and never reordered.
pub struct PageAssembler {
    document: PdfDocument,
    pages: Vec<PdfPage>,
}

impl PageAssembler {
    pub fn new(title: &str) -> Self {
        Self {
            document: PdfDocument::new(title),
            pages: Vec::new(),
        }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Encode a bitmap as PNG and append it as the next page.
    #[instrument(skip_all, fields(width = bitmap.width(), height = bitmap.height()))]
    pub fn append_bitmap(&mut self, bitmap: &RasterBitmap) -> Result<()> {
        let png = bitmap.to_png_bytes()?;
        self.append_png(&png)
    }

    /// Append already-encoded PNG bytes as the next page.
    ///
    /// The stream is validated against the canonical signature before any
    /// decoding; a non-conforming stream never reaches the document.
    pub fn append_png(&mut self, png: &[u8]) -> Result<()> {
        validate_png_signature(png)?;

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let raw = RawImage::decode_from_bytes(png, &mut warnings).map_err(|err| {
            FlachwerkError::ImageEncode {
                stage: EncodeStage::PdfEmbed,
                detail: format!("{err}"),
            }
        })?;

        let width_pt = raw.width as f64 / PX_PER_PT;
        let height_pt = raw.height as f64 / PX_PER_PT;

        let image_id = self.document.add_image(&raw);
        let ops = vec![Op::UseXobject {
            id: image_id,
            transform: XObjectTransform {
                translate_x: Some(Pt(0.0)),
                translate_y: Some(Pt(0.0)),
                scale_x: None,
                scale_y: None,
                dpi: Some(EMBED_DPI),
                rotate: None,
            },
        }];

        self.pages.push(PdfPage::new(
            Mm(width_pt as f32 * MM_PER_PT),
            Mm(height_pt as f32 * MM_PER_PT),
            ops,
        ));

        debug!(
            page = self.pages.len(),
            width_pt,
            height_pt,
            "page appended"
        );
        Ok(())
    }

    /// Serialise the accumulated document.
    #[instrument(skip(self), fields(pages = self.pages.len()))]
    pub fn finish(mut self) -> Vec<u8> {
        info!(pages = self.pages.len(), "serialising output document");
        self.document.with_pages(self.pages);
        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        self.document.save(&PdfSaveOptions::default(), &mut warnings)
    }
}
