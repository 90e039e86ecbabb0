// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// flachwerk-raster — Rasterization for the Flachwerk engine.
//
// Provides the transient raster bitmap, the font catalog with its readiness
// barrier, the scale/size policy, and the table compositor that turns a
// laid-out, styled table into pixels.

pub mod bitmap;
pub mod compose;
pub mod fonts;
pub mod policy;
pub mod table;

pub use bitmap::RasterBitmap;
pub use compose::rasterize_table;
pub use fonts::FontCatalog;
pub use policy::{document_render_scale, sheet_scale, shrink_to_budget};
pub use table::{StyledCell, StyledTable, build_table};
