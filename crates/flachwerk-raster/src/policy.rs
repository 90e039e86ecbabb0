// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scale/size policy.
//
// Three independent limits bound every rasterization: the per-image pixel
// budget (a byte-cost proxy), the raster-surface dimension ceiling, and the
// absolute scale multiplier cap.

use tracing::{debug, warn};

use flachwerk_core::config::RenderLimits;

use crate::bitmap::RasterBitmap;

/// Maximum safe render scale for a table of the given unscaled pixel size.
///
/// `scale = min(requested, image_limit/width, image_limit/height, max_scale)`.
/// Degenerate dimensions do not constrain the scale; they fail later as a
/// zero-size render.
pub fn sheet_scale(requested: f64, width: f64, height: f64, limits: &RenderLimits) -> f64 {
    let image_limit = limits.max_image_px as f64;
    let width_scale = if width > 0.0 { image_limit / width } else { requested };
    let height_scale = if height > 0.0 { image_limit / height } else { requested };
    requested
        .min(width_scale)
        .min(height_scale)
        .min(limits.max_scale)
}

/// Outcome of clamping the render scale for an external page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleDecision {
    pub scale: f64,
    /// True when the requested scale had to be reduced to keep the raster
    /// surface under the dimension ceiling.
    pub degraded: bool,
}

/// First stage of the external-document policy: clamp the render scale so the
/// raw raster surface stays under the surface ceiling.
pub fn document_render_scale(
    requested: f64,
    base_width: f64,
    base_height: f64,
    limits: &RenderLimits,
) -> ScaleDecision {
    let ceiling = limits.max_surface_px as f64;
    let width_scale = if base_width > 0.0 { ceiling / base_width } else { requested };
    let height_scale = if base_height > 0.0 { ceiling / base_height } else { requested };
    let scale = requested.min(width_scale).min(height_scale);
    let degraded = scale < requested;
    if degraded {
        warn!(requested, scale, "render scale reduced to fit the raster surface");
    }
    ScaleDecision { scale, degraded }
}

/// Second stage: shrink a rendered bitmap (aspect preserved) so neither
/// dimension exceeds the per-image pixel budget. A no-op when already within
/// budget.
pub fn shrink_to_budget(bitmap: RasterBitmap, limits: &RenderLimits) -> RasterBitmap {
    let max_px = limits.max_image_px as f64;
    let ratio = (max_px / bitmap.width() as f64)
        .min(max_px / bitmap.height() as f64)
        .min(1.0);
    if ratio >= 1.0 {
        return bitmap;
    }
    debug!(ratio, "shrinking bitmap to image budget");
    bitmap.shrink(ratio)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn limits() -> RenderLimits {
        RenderLimits::default()
    }

    #[test]
    fn sheet_scale_respects_all_three_limits() {
        let limits = limits();
        for &(w, h, s) in &[
            (150.0, 24.0, 2.0),
            (10_000.0, 500.0, 6.0),
            (64.0, 24.0, 500.0),
            (30_001.0, 30_001.0, 1.0),
        ] {
            let scale = sheet_scale(s, w, h, &limits);
            assert!(scale * w <= limits.max_image_px as f64 + 1e-6);
            assert!(scale * h <= limits.max_image_px as f64 + 1e-6);
            assert!(scale <= limits.max_scale);
            assert!(scale <= s);
        }
    }

    #[test]
    fn sheet_scale_passes_through_when_unconstrained() {
        assert_eq!(sheet_scale(2.0, 150.0, 24.0, &limits()), 2.0);
    }

    #[test]
    fn sheet_scale_caps_at_max_multiplier() {
        assert_eq!(sheet_scale(500.0, 10.0, 10.0, &limits()), 90.0);
    }

    #[test]
    fn document_scale_degrades_when_surface_would_overflow() {
        let decision = document_render_scale(30.0, 1000.0, 800.0, &limits());
        assert!(decision.degraded);
        assert_eq!(decision.scale, 16.0);
    }

    #[test]
    fn document_scale_is_exact_when_it_fits() {
        let decision = document_render_scale(10.0, 600.0, 800.0, &limits());
        assert!(!decision.degraded);
        assert_eq!(decision.scale, 10.0);
    }

    #[test]
    fn shrink_to_budget_is_noop_within_budget() {
        let bitmap = RasterBitmap::filled(100, 50, Rgba([0, 0, 0, 255])).unwrap();
        let result = shrink_to_budget(bitmap, &limits());
        assert_eq!((result.width(), result.height()), (100, 50));
    }

    #[test]
    fn shrink_to_budget_preserves_aspect() {
        let small = RenderLimits {
            max_image_px: 50,
            ..RenderLimits::default()
        };
        let bitmap = RasterBitmap::filled(100, 40, Rgba([0, 0, 0, 255])).unwrap();
        let result = shrink_to_budget(bitmap, &small);
        assert_eq!((result.width(), result.height()), (50, 20));
    }
}
