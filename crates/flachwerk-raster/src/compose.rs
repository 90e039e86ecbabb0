// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Table compositor — paints a styled table into pixels at a given scale.
//
// Painting order: white background, cell fills, borders, text. Cells never
// overlap (merged regions are already collapsed into their start cell), so
// each layer only touches its own rectangles.

use ab_glyph::PxScale;
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_text_mut};
use imageproc::rect::Rect;
use tracing::{debug, instrument};

use flachwerk_core::config::TableStyle;
use flachwerk_core::error::Result;
use flachwerk_sheet::raw::{HorizontalAlign, VerticalAlign};
use flachwerk_sheet::style::CellBorder;

use crate::bitmap::RasterBitmap;
use crate::fonts::FontCatalog;
use crate::table::{StyledCell, StyledTable};

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Parse `#rrggbb` / `#rgb` into a pixel, falling back to opaque black.
fn hex_to_rgba(hex: &str) -> Rgba<u8> {
    let digits = hex.trim_start_matches('#');
    let expanded: String;
    let digits = if digits.len() == 3 {
        expanded = digits.chars().flat_map(|c| [c, c]).collect();
        &expanded
    } else {
        digits
    };
    if digits.len() != 6 {
        return Rgba([0, 0, 0, 255]);
    }
    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&digits[range], 16).unwrap_or(0)
    };
    Rgba([channel(0..2), channel(2..4), channel(4..6), 255])
}

/// Pixel rectangle of a cell (with its span) at the given scale.
fn cell_rect(table: &StyledTable, cell: &StyledCell, scale: f64) -> (i32, i32, i32, i32) {
    let x0 = (table.col_offsets[cell.col] * scale).round() as i32;
    let x1 = (table.col_offsets[cell.col + cell.col_span] * scale).round() as i32;
    let y0 = (table.row_offsets[cell.row] * scale).round() as i32;
    let y1 = (table.row_offsets[cell.row + cell.row_span] * scale).round() as i32;
    (x0, y0, x1, y1)
}

fn fill_rect(image: &mut RgbaImage, x0: i32, y0: i32, w: i32, h: i32, color: Rgba<u8>) {
    if w <= 0 || h <= 0 {
        return;
    }
    draw_filled_rect_mut(image, Rect::at(x0, y0).of_size(w as u32, h as u32), color);
}

fn paint_border(
    image: &mut RgbaImage,
    (x0, y0, x1, y1): (i32, i32, i32, i32),
    border: &CellBorder,
    style: &TableStyle,
    stroke: i32,
) {
    let grid = hex_to_rgba(&style.grid_color);
    let sides: [(Option<Rgba<u8>>, i32, i32, i32, i32); 4] = match border {
        CellBorder::DefaultGrid => [
            (Some(grid), x0, y0, x1 - x0, stroke),          // top
            (Some(grid), x1 - stroke, y0, stroke, y1 - y0), // right
            (Some(grid), x0, y1 - stroke, x1 - x0, stroke), // bottom
            (Some(grid), x0, y0, stroke, y1 - y0),          // left
        ],
        CellBorder::Sides { top, right, bottom, left } => [
            (top.as_deref().map(hex_to_rgba), x0, y0, x1 - x0, stroke),
            (right.as_deref().map(hex_to_rgba), x1 - stroke, y0, stroke, y1 - y0),
            (bottom.as_deref().map(hex_to_rgba), x0, y1 - stroke, x1 - x0, stroke),
            (left.as_deref().map(hex_to_rgba), x0, y0, stroke, y1 - y0),
        ],
    };
    for (color, x, y, w, h) in sides {
        if let Some(color) = color {
            fill_rect(image, x, y, w, h, color);
        }
    }
}

fn paint_text(
    image: &mut RgbaImage,
    catalog: &FontCatalog,
    cell: &StyledCell,
    (x0, y0, x1, y1): (i32, i32, i32, i32),
    style: &TableStyle,
    scale: f64,
) {
    let Some(face) = catalog.draw_face(&cell.style.font.name) else {
        return;
    };
    let face = face.clone();

    let px = (cell.style.font.size * scale) as f32;
    let family = cell.style.font.name.as_str();
    let color = hex_to_rgba(&cell.style.font.color);
    let pad_x = (style.padding_x * scale) as f32;
    let pad_y = (style.padding_y * scale) as f32;
    let avail = (x1 - x0) as f32 - pad_x * 2.0;

    let lines = if cell.style.alignment.wrap {
        catalog.wrap(family, px, &cell.text, avail.max(px))
    } else {
        vec![cell.text.clone()]
    };

    let line_height = catalog.line_height(family, px);
    let total_height = line_height * lines.len() as f32;
    let cell_height = (y1 - y0) as f32;
    let mut y = match cell.style.alignment.vertical {
        VerticalAlign::Top => y0 as f32 + pad_y,
        VerticalAlign::Middle => y0 as f32 + (cell_height - total_height) / 2.0,
        VerticalAlign::Bottom => y1 as f32 - pad_y - total_height,
    };

    for line in &lines {
        if !line.is_empty() {
            let line_width = catalog.measure(family, px, line);
            let x = match cell.style.alignment.horizontal {
                HorizontalAlign::Left => x0 as f32 + pad_x,
                HorizontalAlign::Center => x0 as f32 + ((x1 - x0) as f32 - line_width) / 2.0,
                HorizontalAlign::Right => x1 as f32 - pad_x - line_width,
            };
            let scale_px = PxScale::from(px);
            draw_text_mut(image, color, x as i32, y as i32, scale_px, &face, line);
            if cell.style.font.bold {
                // Synthetic bold: re-draw offset by one device pixel.
                draw_text_mut(image, color, x as i32 + 1, y as i32, scale_px, &face, line);
            }
        }
        y += line_height;
    }
}

/// Rasterize a styled table at the given scale.
///
/// Resolves every referenced font face before compositing (the readiness
/// barrier), so text metrics are stable for the whole surface. A zero-size
/// surface is fatal for this unit of work.
#[instrument(skip_all, fields(cells = table.cells.len(), scale))]
pub fn rasterize_table(
    catalog: &mut FontCatalog,
    table: &StyledTable,
    style: &TableStyle,
    scale: f64,
) -> Result<RasterBitmap> {
    catalog.ensure_ready(table.text_families())?;

    let width = (table.width * scale).ceil() as u32;
    let height = (table.height * scale).ceil() as u32;
    let mut bitmap = RasterBitmap::filled(width, height, WHITE)?;
    let image = bitmap.as_image_mut();
    let stroke = (scale.round() as i32).max(1);

    for cell in &table.cells {
        if let Some(fill) = &cell.style.fill {
            let (x0, y0, x1, y1) = cell_rect(table, cell, scale);
            fill_rect(image, x0, y0, x1 - x0, y1 - y0, hex_to_rgba(fill));
        }
    }
    for cell in &table.cells {
        let rect = cell_rect(table, cell, scale);
        paint_border(image, rect, &cell.style.border, style, stroke);
    }
    for cell in &table.cells {
        if cell.text.is_empty() {
            continue;
        }
        let rect = cell_rect(table, cell, scale);
        paint_text(image, catalog, cell, rect, style, scale);
    }

    debug!(width, height, "table rasterized");
    Ok(bitmap)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flachwerk_sheet::extract::{Merge, extract};
    use flachwerk_sheet::layout::{layout, merge_index};
    use flachwerk_sheet::raw::{ColSpec, ColorSpec, RawCell, RawFill, RawSheet, RawStyle};

    use crate::table::build_table;

    fn solid_fill(hex: &str) -> RawStyle {
        RawStyle {
            fill: Some(RawFill {
                pattern: Some("solid".into()),
                fg_color: Some(ColorSpec::Rgb(hex.into())),
                bg_color: None,
            }),
            ..RawStyle::default()
        }
    }

    fn render(sheet: &RawSheet, scale: f64) -> Result<RasterBitmap> {
        let style = TableStyle::default();
        let data = extract(sheet);
        let dims = layout(&data, &style);
        let index = merge_index(&data.merges);
        let table = build_table(&data, &dims, &index, &style);
        let mut catalog = FontCatalog::new(Vec::new());
        rasterize_table(&mut catalog, &table, &style, scale)
    }

    #[test]
    fn surface_matches_layout_times_scale() {
        let mut sheet = RawSheet::new();
        sheet.set_cell(0, 0, RawCell::default());
        sheet.set_cell(0, 1, RawCell::default());
        sheet.cols.insert(0, ColSpec { px: Some(100.0), chars: None });
        sheet.cols.insert(1, ColSpec { px: Some(50.0), chars: None });

        let bitmap = render(&sheet, 2.0).unwrap();
        // 150px wide, one 24px default row, at 2x.
        assert_eq!((bitmap.width(), bitmap.height()), (300, 48));
    }

    #[test]
    fn empty_table_is_a_zero_size_error() {
        let sheet = RawSheet::new();
        assert!(matches!(
            render(&sheet, 2.0),
            Err(flachwerk_core::error::FlachwerkError::ZeroSizeRender { .. })
        ));
    }

    #[test]
    fn solid_fill_reaches_the_pixels() {
        let mut sheet = RawSheet::new();
        sheet.set_cell(0, 0, RawCell::default().with_style(solid_fill("FF0000")));
        let bitmap = render(&sheet, 1.0).unwrap();
        // Center of the single 64x24 cell.
        let pixel = bitmap.as_image().get_pixel(32, 12);
        assert_eq!(pixel.0, [255, 0, 0, 255]);
    }

    #[test]
    fn default_grid_border_is_painted() {
        let mut sheet = RawSheet::new();
        sheet.set_cell(0, 0, RawCell::default());
        let bitmap = render(&sheet, 1.0).unwrap();
        // Top-left corner carries the default grid color (#c7d2de).
        let pixel = bitmap.as_image().get_pixel(0, 0);
        assert_eq!(pixel.0, [0xc7, 0xd2, 0xde, 255]);
        // The interior stays white.
        let pixel = bitmap.as_image().get_pixel(32, 12);
        assert_eq!(pixel.0, [255, 255, 255, 255]);
    }

    #[test]
    fn merge_start_fill_spans_covered_cells() {
        let mut sheet = RawSheet::new();
        sheet.set_cell(0, 0, RawCell::default().with_style(solid_fill("00FF00")));
        sheet.set_cell(0, 1, RawCell::default());
        sheet.set_cell(1, 0, RawCell::default());
        sheet.set_cell(1, 1, RawCell::default());
        sheet.merges.push(flachwerk_sheet::raw::RawRange::new((0, 0), (0, 1)));

        let style = TableStyle::default();
        let data = extract(&sheet);
        assert_eq!(data.merges, vec![Merge { start: (0, 0), end: (0, 1) }]);
        let dims = layout(&data, &style);
        let index = merge_index(&data.merges);
        let table = build_table(&data, &dims, &index, &style);
        let mut catalog = FontCatalog::new(Vec::new());
        let bitmap = rasterize_table(&mut catalog, &table, &style, 1.0).unwrap();

        // A point well inside the second column of the first row is painted
        // by the merge start's fill.
        let pixel = bitmap.as_image().get_pixel(96, 12);
        assert_eq!(pixel.0, [0, 255, 0, 255]);
    }
}
