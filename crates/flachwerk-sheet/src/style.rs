// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Color and style resolution — raw descriptors to concrete render attributes.
//
// All functions here are pure. Resolved styles are derived on demand and
// never cached across mutations of the source grid.

use flachwerk_core::config::TableStyle;

use crate::palette::{INDEXED_PALETTE, THEME_PALETTE, apply_tint};
use crate::raw::{ColorSpec, HorizontalAlign, RawBorderSide, RawStyle, VerticalAlign};

/// Resolve a color descriptor to a lowercase `#rrggbb` string.
///
/// Direct RGB specs may carry a 2-digit alpha prefix, which is dropped.
/// Out-of-range palette indices and theme ids fall back to black. An
/// unparseable direct spec resolves to nothing.
pub fn resolve_color(spec: Option<&ColorSpec>) -> Option<String> {
    match spec? {
        ColorSpec::Rgb(raw) => {
            let digits = raw.trim_start_matches('#');
            let cleaned = if digits.len() == 8 { &digits[2..] } else { digits };
            if cleaned.len() == 6 || cleaned.len() == 3 {
                Some(format!("#{}", cleaned.to_ascii_lowercase()))
            } else {
                None
            }
        }
        ColorSpec::Indexed(index) => {
            let hex = INDEXED_PALETTE.get(*index as usize).copied().unwrap_or("000000");
            Some(format!("#{}", hex.to_ascii_lowercase()))
        }
        ColorSpec::Theme { theme, tint } => {
            let base = THEME_PALETTE.get(*theme as usize).copied().unwrap_or("000000");
            Some(format!("#{}", apply_tint(base, *tint).to_ascii_lowercase()))
        }
    }
}

/// Concrete font attributes for one cell.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedFont {
    pub name: String,
    pub size: f64,
    pub bold: bool,
    pub italic: bool,
    pub color: String,
}

/// Concrete alignment for one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedAlignment {
    pub horizontal: HorizontalAlign,
    pub vertical: VerticalAlign,
    pub wrap: bool,
}

/// Borders for one cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellBorder {
    /// No border spec at all: the uniform 1px grid border is drawn.
    DefaultGrid,
    /// Explicit spec: each present side is 1px solid in its resolved color,
    /// absent sides are not drawn.
    Sides {
        top: Option<String>,
        right: Option<String>,
        bottom: Option<String>,
        left: Option<String>,
    },
}

/// Fully resolved render attributes for one cell.
#[derive(Debug, Clone, PartialEq)]
pub struct CellStyle {
    pub font: ResolvedFont,
    /// Background color; `None` renders transparent.
    pub fill: Option<String>,
    pub alignment: ResolvedAlignment,
    pub border: CellBorder,
}

/// Font size a style descriptor implies, without resolving the rest.
/// Used by the layout builder for default row heights.
pub fn font_size_of(style: Option<&RawStyle>, table: &TableStyle) -> f64 {
    style
        .and_then(|s| s.font.as_ref())
        .and_then(|f| f.size)
        .unwrap_or(table.font_size)
}

fn resolve_font(style: Option<&RawStyle>, table: &TableStyle) -> ResolvedFont {
    let font = style.and_then(|s| s.font.as_ref());
    ResolvedFont {
        name: font
            .and_then(|f| f.name.clone())
            .unwrap_or_else(|| table.font_family.clone()),
        size: font.and_then(|f| f.size).unwrap_or(table.font_size),
        bold: font.map(|f| f.bold).unwrap_or(false),
        italic: font.map(|f| f.italic).unwrap_or(false),
        color: font
            .and_then(|f| resolve_color(f.color.as_ref()))
            .unwrap_or_else(|| table.text_color.clone()),
    }
}

fn resolve_fill(style: Option<&RawStyle>) -> Option<String> {
    let fill = style.and_then(|s| s.fill.as_ref())?;
    if fill.pattern.as_deref().is_some_and(|p| p != "solid") {
        return None;
    }
    resolve_color(fill.fg_color.as_ref()).or_else(|| resolve_color(fill.bg_color.as_ref()))
}

fn resolve_alignment(style: Option<&RawStyle>) -> ResolvedAlignment {
    let alignment = style.and_then(|s| s.alignment.as_ref());
    ResolvedAlignment {
        horizontal: alignment
            .and_then(|a| a.horizontal)
            .unwrap_or(HorizontalAlign::Left),
        vertical: alignment
            .and_then(|a| a.vertical)
            .unwrap_or(VerticalAlign::Middle),
        wrap: alignment.map(|a| a.wrap_text).unwrap_or(false),
    }
}

fn resolve_border_side(side: Option<&RawBorderSide>, table: &TableStyle) -> Option<String> {
    let side = side?;
    Some(resolve_color(side.color.as_ref()).unwrap_or_else(|| table.grid_color.clone()))
}

fn resolve_border(style: Option<&RawStyle>, table: &TableStyle) -> CellBorder {
    match style.and_then(|s| s.border.as_ref()) {
        None => CellBorder::DefaultGrid,
        Some(border) => CellBorder::Sides {
            top: resolve_border_side(border.top.as_ref(), table),
            right: resolve_border_side(border.right.as_ref(), table),
            bottom: resolve_border_side(border.bottom.as_ref(), table),
            left: resolve_border_side(border.left.as_ref(), table),
        },
    }
}

/// Resolve a raw style descriptor into concrete render attributes.
pub fn resolve_cell_style(style: Option<&RawStyle>, table: &TableStyle) -> CellStyle {
    CellStyle {
        font: resolve_font(style, table),
        fill: resolve_fill(style),
        alignment: resolve_alignment(style),
        border: resolve_border(style, table),
    }
}
