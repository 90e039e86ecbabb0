// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page source abstraction for the external-document path.
//
// A page source exposes an ordered sequence of pages, each with a base
// (scale-1) pixel viewport and a render operation at arbitrary scale. The
// engine stays renderer-agnostic; the bundled implementation uses pdfium
// behind the `pdfium` feature gate.

use flachwerk_core::error::Result;
use flachwerk_raster::RasterBitmap;

/// An ordered sequence of renderable pages.
pub trait PageSource {
    fn page_count(&self) -> usize;

    /// Base viewport in pixels at scale 1 (the page at 96 dpi), 0-based.
    fn base_size(&mut self, index: usize) -> Result<(f64, f64)>;

    /// Render a page at the given scale into a bitmap whose dimensions match
    /// `base_size * scale`.
    fn render(&mut self, index: usize, scale: f64) -> Result<RasterBitmap>;
}

#[cfg(feature = "pdfium")]
pub use pdfium_source::PdfiumSource;

#[cfg(feature = "pdfium")]
mod pdfium_source {
    use pdfium_render::prelude::*;
    use tracing::{debug, instrument};

    use flachwerk_core::config::PX_PER_PT;
    use flachwerk_core::error::{FlachwerkError, Result};
    use flachwerk_raster::RasterBitmap;

    use super::PageSource;

    /// Renders pages of an in-memory PDF through the pdfium library.
    ///
    /// The document handle borrows the pdfium binding, so each operation
    /// reloads from the owned byte buffer and keeps the borrow local. Loads
    /// are cheap relative to rendering, and only one page is ever in flight.
    pub struct PdfiumSource {
        pdfium: Pdfium,
        bytes: Vec<u8>,
        page_count: usize,
    }

    impl PdfiumSource {
        /// Bind to the system pdfium library and validate the buffer.
        #[instrument(skip_all, fields(bytes_len = bytes.len()))]
        pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
            let bindings = Pdfium::bind_to_system_library().map_err(|err| {
                tracing::warn!(%err, "pdfium system library not loadable");
                FlachwerkError::FeatureUnavailable("pdfium")
            })?;
            let pdfium = Pdfium::new(bindings);
            let page_count = {
                let document = pdfium
                    .load_pdf_from_byte_slice(&bytes, None)
                    .map_err(|err| FlachwerkError::Parse(format!("pdfium: {err}")))?;
                document.pages().len() as usize
            };
            debug!(page_count, "pdfium source ready");
            Ok(Self {
                pdfium,
                bytes,
                page_count,
            })
        }
    }

    impl PageSource for PdfiumSource {
        fn page_count(&self) -> usize {
            self.page_count
        }

        fn base_size(&mut self, index: usize) -> Result<(f64, f64)> {
            let document = self
                .pdfium
                .load_pdf_from_byte_slice(&self.bytes, None)
                .map_err(|err| FlachwerkError::Parse(format!("pdfium: {err}")))?;
            let page = document
                .pages()
                .get(index as u16)
                .map_err(|err| FlachwerkError::Pdf(format!("page {index}: {err}")))?;
            Ok((
                page.width().value as f64 * PX_PER_PT,
                page.height().value as f64 * PX_PER_PT,
            ))
        }

        fn render(&mut self, index: usize, scale: f64) -> Result<RasterBitmap> {
            let document = self
                .pdfium
                .load_pdf_from_byte_slice(&self.bytes, None)
                .map_err(|err| FlachwerkError::Parse(format!("pdfium: {err}")))?;
            let page = document
                .pages()
                .get(index as u16)
                .map_err(|err| FlachwerkError::Pdf(format!("page {index}: {err}")))?;

            // Points scale to device pixels by 96/72 first, then the caller's
            // multiplier on top.
            let config = PdfRenderConfig::new()
                .scale_page_by_factor((scale * PX_PER_PT) as f32);
            let rendered = page
                .render_with_config(&config)
                .map_err(|err| FlachwerkError::Raster(format!("pdfium render: {err}")))?;
            RasterBitmap::from_image(rendered.as_image().to_rgba8())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flachwerk_core::error::FlachwerkError;
    use image::Rgba;

    /// Synthetic source rendering solid-gray pages.
    struct SolidSource {
        pages: Vec<(f64, f64)>,
    }

    impl PageSource for SolidSource {
        fn page_count(&self) -> usize {
            self.pages.len()
        }

        fn base_size(&mut self, index: usize) -> Result<(f64, f64)> {
            self.pages
                .get(index)
                .copied()
                .ok_or_else(|| FlachwerkError::Pdf(format!("page {index} out of range")))
        }

        fn render(&mut self, index: usize, scale: f64) -> Result<RasterBitmap> {
            let (w, h) = self.base_size(index)?;
            RasterBitmap::filled(
                (w * scale).ceil() as u32,
                (h * scale).ceil() as u32,
                Rgba([128, 128, 128, 255]),
            )
        }
    }

    #[test]
    fn trait_objects_render_in_order() {
        let mut source = SolidSource {
            pages: vec![(100.0, 50.0), (40.0, 40.0)],
        };
        assert_eq!(source.page_count(), 2);
        let first = source.render(0, 2.0).unwrap();
        assert_eq!((first.width(), first.height()), (200, 100));
        let second = source.render(1, 1.0).unwrap();
        assert_eq!((second.width(), second.height()), (40, 40));
    }

    #[test]
    fn zero_size_page_render_is_fatal() {
        let mut source = SolidSource {
            pages: vec![(0.0, 0.0)],
        };
        assert!(matches!(
            source.render(0, 4.0),
            Err(FlachwerkError::ZeroSizeRender { .. })
        ));
    }
}
