// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Transient raster bitmap produced by the rasterization engine.
//
// A bitmap is owned by exactly one pipeline stage at a time: created here,
// possibly shrunk by the policy or the retry controller, consumed into one
// output page, then discarded.

use image::{Rgba, RgbaImage, imageops};
use tracing::debug;

use flachwerk_core::error::{EncodeStage, FlachwerkError, Result};

/// Pixel surface with exclusive ownership semantics.
#[derive(Debug, Clone)]
pub struct RasterBitmap {
    image: RgbaImage,
}

impl RasterBitmap {
    /// Allocate a surface filled with the given color.
    ///
    /// A zero-size request is a fatal error for the unit of work that asked
    /// for it; it is never retried.
    pub fn filled(width: u32, height: u32, color: Rgba<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(FlachwerkError::ZeroSizeRender { width, height });
        }
        Ok(Self {
            image: RgbaImage::from_pixel(width, height, color),
        })
    }

    /// Wrap an already-rendered image.
    pub fn from_image(image: RgbaImage) -> Result<Self> {
        if image.width() == 0 || image.height() == 0 {
            return Err(FlachwerkError::ZeroSizeRender {
                width: image.width(),
                height: image.height(),
            });
        }
        Ok(Self { image })
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn as_image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn as_image_mut(&mut self) -> &mut RgbaImage {
        &mut self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Downscale by a linear factor, flooring each dimension at one pixel.
    pub fn shrink(self, factor: f64) -> Self {
        let width = ((self.width() as f64 * factor).floor() as u32).max(1);
        let height = ((self.height() as f64 * factor).floor() as u32).max(1);
        debug!(
            from_w = self.width(),
            from_h = self.height(),
            width,
            height,
            "shrinking bitmap"
        );
        Self {
            image: imageops::resize(&self.image, width, height, imageops::FilterType::Lanczos3),
        }
    }

    /// Encode as PNG bytes.
    pub fn to_png_bytes(&self) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        let mut cursor = std::io::Cursor::new(&mut buffer);
        self.image
            .write_to(&mut cursor, image::ImageFormat::Png)
            .map_err(|err| FlachwerkError::ImageEncode {
                stage: EncodeStage::PngEncode,
                detail: err.to_string(),
            })?;
        Ok(buffer)
    }
}
