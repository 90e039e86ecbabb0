// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Legacy color palettes and tint arithmetic.
//
// Both tables are fixed by the file format; resolution over them is pure.

/// The 64-entry indexed palette inherited from legacy spreadsheet files.
pub const INDEXED_PALETTE: [&str; 64] = [
    "000000", "FFFFFF", "FF0000", "00FF00", "0000FF", "FFFF00", "FF00FF", "00FFFF",
    "000000", "FFFFFF", "FF0000", "00FF00", "0000FF", "FFFF00", "FF00FF", "00FFFF",
    "800000", "008000", "000080", "808000", "800080", "008080", "C0C0C0", "808080",
    "9999FF", "993366", "FFFFCC", "CCFFFF", "660066", "FF8080", "0066CC", "CCCCFF",
    "000080", "FF00FF", "FFFF00", "00FFFF", "800080", "800000", "008080", "0000FF",
    "00CCFF", "CCFFFF", "CCFFCC", "FFFF99", "99CCFF", "FF99CC", "CC99FF", "FFCC99",
    "3366FF", "33CCCC", "99CC00", "FFCC00", "FF9900", "FF6600", "666699", "969696",
    "003366", "339966", "003300", "333300", "993300", "993366", "333399", "333333",
];

/// The 12-entry theme palette (standard Office theme order).
pub const THEME_PALETTE: [&str; 12] = [
    "FFFFFF", "000000", "1F497D", "4F81BD", "C0504D", "9BBB59",
    "8064A2", "4BACC6", "F79646", "0000FF", "800080", "00B050",
];

/// Apply a tint to a 6-digit hex color (no `#` prefix).
///
/// Positive tints mix toward white, negative toward black:
/// `c' = round(c + (mix - c) * |t|)` with `mix = 255` for `t > 0`, else `0`.
/// A zero tint is the identity and returns the input unchanged.
pub fn apply_tint(hex: &str, tint: f64) -> String {
    if tint == 0.0 || !tint.is_finite() {
        return hex.to_string();
    }
    let Ok(num) = u32::from_str_radix(hex, 16) else {
        return hex.to_string();
    };
    let r = (num >> 16) & 0xFF;
    let g = (num >> 8) & 0xFF;
    let b = num & 0xFF;

    let mix: f64 = if tint > 0.0 { 255.0 } else { 0.0 };
    let factor = tint.abs();
    let channel = |value: u32| -> u32 {
        let adjusted = value as f64 + (mix - value as f64) * factor;
        adjusted.round().clamp(0.0, 255.0) as u32
    };

    format!("{:02x}{:02x}{:02x}", channel(r), channel(g), channel(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_tint_is_identity() {
        for hex in THEME_PALETTE {
            assert_eq!(apply_tint(hex, 0.0), hex);
        }
    }

    #[test]
    fn positive_tint_mixes_toward_white() {
        assert_eq!(apply_tint("000000", 1.0), "ffffff");
        assert_eq!(apply_tint("000000", 0.5), "808080");
    }

    #[test]
    fn negative_tint_mixes_toward_black() {
        assert_eq!(apply_tint("FFFFFF", -1.0), "000000");
        assert_eq!(apply_tint("FFFFFF", -0.5), "808080");
    }

    #[test]
    fn palettes_have_fixed_sizes() {
        assert_eq!(INDEXED_PALETTE.len(), 64);
        assert_eq!(THEME_PALETTE.len(), 12);
    }
}
