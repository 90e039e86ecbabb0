// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Raw workbook model — the input boundary between a spreadsheet decoder and
// the flattening engine.
//
// Coordinates are absolute (row, col), 0-based. Everything is sparse and
// optional: a decoder populates what it can, and the extractor normalizes
// from here. Styles stay in descriptor form; resolution to concrete render
// attributes happens later and is recomputed on every request.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Inclusive rectangular range in absolute coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRange {
    pub start: (u32, u32),
    pub end: (u32, u32),
}

impl RawRange {
    pub fn new(start: (u32, u32), end: (u32, u32)) -> Self {
        Self { start, end }
    }
}

/// Color descriptor as stored by spreadsheet formats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ColorSpec {
    /// Direct RGB hex digits, optionally alpha-prefixed ("FF1F2A37").
    Rgb(String),
    /// Index into the 64-entry legacy palette.
    Indexed(u32),
    /// Theme palette id plus a tint in [-1, 1].
    Theme { theme: u32, tint: f64 },
}

/// Font descriptor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawFont {
    pub name: Option<String>,
    pub size: Option<f64>,
    pub bold: bool,
    pub italic: bool,
    pub color: Option<ColorSpec>,
}

/// Fill descriptor. Only a solid pattern produces a rendered background.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawFill {
    /// Pattern type keyword; absent means solid.
    pub pattern: Option<String>,
    pub fg_color: Option<ColorSpec>,
    pub bg_color: Option<ColorSpec>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HorizontalAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerticalAlign {
    Top,
    Middle,
    Bottom,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawAlignment {
    pub horizontal: Option<HorizontalAlign>,
    pub vertical: Option<VerticalAlign>,
    pub wrap_text: bool,
}

/// One side of a border descriptor. Presence of the side means the side is
/// drawn; the color may still be absent (resolved to the grid default).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawBorderSide {
    pub color: Option<ColorSpec>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawBorder {
    pub top: Option<RawBorderSide>,
    pub right: Option<RawBorderSide>,
    pub bottom: Option<RawBorderSide>,
    pub left: Option<RawBorderSide>,
}

/// Style descriptor attached to a cell.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawStyle {
    pub font: Option<RawFont>,
    pub fill: Option<RawFill>,
    pub alignment: Option<RawAlignment>,
    pub border: Option<RawBorder>,
}

impl RawStyle {
    /// True when no component is set at all.
    pub fn is_empty(&self) -> bool {
        self.font.is_none()
            && self.fill.is_none()
            && self.alignment.is_none()
            && self.border.is_none()
    }
}

/// Value type marker recorded by the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RawCellKind {
    Text,
    Number,
    Bool,
    DateTime,
    Error,
    /// Cell exists but holds no value (style-only).
    Blank,
}

/// A single addressed cell.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawCell {
    /// Display string with the number format applied, when the decoder has it.
    pub formatted: Option<String>,
    /// Raw value rendered as text.
    pub value: Option<String>,
    /// Formula source, without result.
    pub formula: Option<String>,
    pub kind: Option<RawCellKind>,
    pub style: Option<RawStyle>,
}

impl RawCell {
    /// Convenience constructor for a plain text cell.
    pub fn text(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            kind: Some(RawCellKind::Text),
            ..Self::default()
        }
    }

    pub fn with_style(mut self, style: RawStyle) -> Self {
        self.style = Some(style);
        self
    }
}

/// Column sizing hint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ColSpec {
    /// Width in pixels, used verbatim.
    pub px: Option<f64>,
    /// Width in characters, converted by the extractor.
    pub chars: Option<f64>,
}

/// Row sizing hint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RowSpec {
    /// Height in pixels, used verbatim.
    pub px: Option<f64>,
    /// Height in points, converted by the extractor.
    pub points: Option<f64>,
}

/// One sheet as delivered by the decoder.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawSheet {
    /// Declared used range, when the decoder knows it.
    pub range: Option<RawRange>,
    pub cells: HashMap<(u32, u32), RawCell>,
    pub merges: Vec<RawRange>,
    pub cols: HashMap<u32, ColSpec>,
    pub rows: HashMap<u32, RowSpec>,
}

impl RawSheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_cell(&mut self, row: u32, col: u32, cell: RawCell) {
        self.cells.insert((row, col), cell);
    }
}

/// A parsed workbook: named sheets in workbook order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawWorkbook {
    pub sheets: Vec<(String, RawSheet)>,
}

impl RawWorkbook {
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn sheet(&self, name: &str) -> Option<&RawSheet> {
        self.sheets
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, sheet)| sheet)
    }
}
