// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Export configuration: table styling, render limits, resolution presets.

use serde::{Deserialize, Serialize};

use crate::types::{ExportMode, SourceKind};

/// Pixels per point at the 96 dpi reference used for page sizing.
pub const PX_PER_PT: f64 = 96.0 / 72.0;

/// Visual defaults applied to rendered tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableStyle {
    /// Font family used when a cell style names none.
    pub font_family: String,
    /// Base font size in pixels.
    pub font_size: f64,
    /// Horizontal cell padding in pixels.
    pub padding_x: f64,
    /// Vertical cell padding in pixels.
    pub padding_y: f64,
    /// Grid line color used when a cell has no border spec.
    pub grid_color: String,
    /// Text color used when a font spec carries none.
    pub text_color: String,
    /// Width given to columns without an explicit hint.
    pub min_col_width: f64,
}

impl Default for TableStyle {
    fn default() -> Self {
        Self {
            font_family: "IBM Plex Sans".into(),
            font_size: 12.0,
            padding_x: 8.0,
            padding_y: 6.0,
            grid_color: "#c7d2de".into(),
            text_color: "#1f2a37".into(),
            min_col_width: 64.0,
        }
    }
}

/// Hard limits bounding every rasterization.
///
/// `max_image_px` is a byte-budget proxy on the embedded image;
/// `max_surface_px` is an independent ceiling on the raw raster surface
/// (relevant for very large source pages); `max_scale` caps quality
/// regardless of size.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RenderLimits {
    /// Maximum pixels along either dimension of an embedded image.
    pub max_image_px: u32,
    /// Maximum pixels along either dimension of a raster surface.
    pub max_surface_px: u32,
    /// Absolute ceiling on the render scale multiplier.
    pub max_scale: f64,
}

impl Default for RenderLimits {
    fn default() -> Self {
        Self {
            max_image_px: 30_000,
            max_surface_px: 16_000,
            max_scale: 90.0,
        }
    }
}

/// Resolution multiplier presets offered per source kind.
///
/// Spreadsheet sources get the higher set (table detail needs it); document
/// sources get the lower set because their pages are already dense raster
/// content at scale 1.
pub fn resolution_presets(kind: SourceKind) -> &'static [u32] {
    match kind {
        SourceKind::Spreadsheet => &[30, 45, 60, 75, 90],
        SourceKind::Document => &[10, 15, 20, 25, 30],
    }
}

/// Advisory cost tier for a chosen resolution multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionWarning {
    None,
    /// Export time and file size may increase noticeably.
    Elevated,
    /// Slow and memory-heavy; expect large files.
    Heavy,
}

pub fn resolution_warning(multiplier: u32) -> ResolutionWarning {
    if multiplier >= 60 {
        ResolutionWarning::Heavy
    } else if multiplier >= 45 {
        ResolutionWarning::Elevated
    } else {
        ResolutionWarning::None
    }
}

/// Options for one export operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    pub mode: ExportMode,
    /// Requested render scale multiplier.
    pub scale: f64,
    pub table_style: TableStyle,
    pub limits: RenderLimits,
    /// Extra font files or directories searched before the system locations.
    pub font_paths: Vec<std::path::PathBuf>,
    /// Title written into the output document metadata.
    pub title: Option<String>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            mode: ExportMode::Combined,
            scale: 6.0,
            table_style: TableStyle::default(),
            limits: RenderLimits::default(),
            font_paths: Vec::new(),
            title: None,
        }
    }
}
