// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Font catalog with an explicit readiness barrier.
//
// Text metrics must be stable before compositing starts, so every family a
// table references is resolved and cached up front by `ensure_ready` — a
// synchronization barrier, not a timing heuristic. Faces come from the
// configured paths first, then from the standard system font directories.
// A family with no matching face falls back to the first usable face found,
// so metrics stay consistent within one rasterization.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use ab_glyph::{Font, FontArc, PxScale, ScaleFont};
use tracing::{debug, warn};

use flachwerk_core::error::{FlachwerkError, Result};

const FONT_EXTENSIONS: [&str; 2] = ["ttf", "otf"];
const SCAN_DEPTH: usize = 3;

fn system_font_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![
        PathBuf::from("/usr/share/fonts"),
        PathBuf::from("/usr/local/share/fonts"),
        PathBuf::from("/System/Library/Fonts"),
        PathBuf::from("C:\\Windows\\Fonts"),
    ];
    if let Ok(home) = std::env::var("HOME") {
        dirs.push(Path::new(&home).join(".fonts"));
        dirs.push(Path::new(&home).join(".local/share/fonts"));
    }
    dirs
}

fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Cached font faces keyed by requested family name.
pub struct FontCatalog {
    search_paths: Vec<PathBuf>,
    faces: HashMap<String, FontArc>,
    /// Lazily discovered font files, sorted for deterministic resolution.
    candidates: Option<Vec<PathBuf>>,
}

impl FontCatalog {
    /// Create a catalog searching `extra_paths` (files or directories) before
    /// the system locations.
    pub fn new(extra_paths: Vec<PathBuf>) -> Self {
        Self {
            search_paths: extra_paths,
            faces: HashMap::new(),
            candidates: None,
        }
    }

    /// Resolve and cache a face for every family, before any pixel is
    /// painted. Errors only when a family is requested and no usable face
    /// exists anywhere.
    pub fn ensure_ready<'a>(&mut self, families: impl IntoIterator<Item = &'a str>) -> Result<()> {
        for family in families {
            if self.faces.contains_key(family) {
                continue;
            }
            let face = self.locate(family)?;
            self.faces.insert(family.to_string(), face);
        }
        Ok(())
    }

    fn locate(&mut self, family: &str) -> Result<FontArc> {
        let wanted = normalize(family);
        let candidates = self.collect_candidates();

        let matched = candidates
            .iter()
            .find(|path| {
                let stem = path
                    .file_stem()
                    .map(|s| normalize(&s.to_string_lossy()))
                    .unwrap_or_default();
                stem.contains(&wanted) || wanted.contains(&stem)
            })
            .cloned();

        let chosen = match matched {
            Some(path) => Some(path),
            None => {
                // No face for this family; fall back to the first usable one.
                candidates.first().cloned()
            }
        };

        for path in chosen.into_iter().chain(candidates.iter().cloned()) {
            match std::fs::read(&path) {
                Ok(data) => match FontArc::try_from_vec(data) {
                    Ok(face) => {
                        debug!(family, path = %path.display(), "font face resolved");
                        return Ok(face);
                    }
                    Err(err) => warn!(path = %path.display(), %err, "unreadable font face"),
                },
                Err(err) => warn!(path = %path.display(), %err, "cannot read font file"),
            }
        }

        Err(FlachwerkError::Raster(format!(
            "no usable font face found for family '{family}'"
        )))
    }

    fn collect_candidates(&mut self) -> Vec<PathBuf> {
        if let Some(found) = &self.candidates {
            return found.clone();
        }
        let mut found = Vec::new();
        for path in self.search_paths.clone() {
            if path.is_file() {
                found.push(path);
            } else {
                scan_dir(&path, SCAN_DEPTH, &mut found);
            }
        }
        for dir in system_font_dirs() {
            scan_dir(&dir, SCAN_DEPTH, &mut found);
        }
        found.sort();
        found.dedup();
        self.candidates = Some(found.clone());
        found
    }

    fn face(&self, family: &str) -> Option<&FontArc> {
        self.faces
            .get(family)
            .or_else(|| self.faces.values().next())
    }

    /// Advance width of a single line at the given pixel size.
    ///
    /// Falls back to a fixed per-character estimate when no face is cached,
    /// so layout remains total.
    pub fn measure(&self, family: &str, px: f32, text: &str) -> f32 {
        match self.face(family) {
            Some(face) => {
                let scaled = face.as_scaled(PxScale::from(px));
                text.chars()
                    .map(|c| scaled.h_advance(face.glyph_id(c)))
                    .sum()
            }
            None => text.chars().count() as f32 * px * 0.6,
        }
    }

    /// Line box height at the given pixel size.
    pub fn line_height(&self, family: &str, px: f32) -> f32 {
        match self.face(family) {
            Some(face) => {
                let scaled = face.as_scaled(PxScale::from(px));
                scaled.height() + scaled.line_gap()
            }
            None => px * 1.2,
        }
    }

    /// Face used for drawing text of the given family.
    pub fn draw_face(&self, family: &str) -> Option<&FontArc> {
        self.face(family)
    }

    /// Greedy word wrap bounded by a pixel width. Words wider than the bound
    /// are force-broken by character.
    pub fn wrap(&self, family: &str, px: f32, text: &str, max_width: f32) -> Vec<String> {
        let mut lines = Vec::new();
        let mut current = String::new();

        for word in text.split_whitespace() {
            if !current.is_empty() {
                let candidate = format!("{current} {word}");
                if self.measure(family, px, &candidate) <= max_width {
                    current = candidate;
                    continue;
                }
                lines.push(std::mem::take(&mut current));
            }
            if self.measure(family, px, word) <= max_width {
                current = word.to_string();
                continue;
            }
            // Force-break the oversized word.
            let mut chunk = String::new();
            for ch in word.chars() {
                chunk.push(ch);
                if self.measure(family, px, &chunk) > max_width && chunk.chars().count() > 1 {
                    chunk.pop();
                    lines.push(chunk.clone());
                    chunk.clear();
                    chunk.push(ch);
                }
            }
            current = chunk;
        }
        if !current.is_empty() {
            lines.push(current);
        }
        if lines.is_empty() {
            lines.push(String::new());
        }
        lines
    }
}

fn scan_dir(dir: &Path, depth: usize, found: &mut Vec<PathBuf>) {
    if depth == 0 {
        return;
    }
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            scan_dir(&path, depth - 1, found);
        } else if path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| FONT_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        {
            found.push(path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_family_set_is_always_ready() {
        let mut catalog = FontCatalog::new(Vec::new());
        assert!(catalog.ensure_ready(std::iter::empty()).is_ok());
    }

    #[test]
    fn measure_is_total_without_faces() {
        let catalog = FontCatalog::new(Vec::new());
        assert!(catalog.measure("Nonexistent", 12.0, "abc") > 0.0);
        assert!(catalog.line_height("Nonexistent", 12.0) > 0.0);
    }

    #[test]
    fn wrap_splits_on_measured_width() {
        let catalog = FontCatalog::new(Vec::new());
        // With the fallback estimate (0.6 * px per char) a 60px bound at
        // 10px font fits 10 characters per line.
        let lines = catalog.wrap("Nonexistent", 10.0, "aaaa bbbb cccc", 60.0);
        assert_eq!(lines, vec!["aaaa bbbb", "cccc"]);
    }

    #[test]
    fn wrap_force_breaks_oversized_words() {
        let catalog = FontCatalog::new(Vec::new());
        let lines = catalog.wrap("Nonexistent", 10.0, "aaaaaaaaaaaaaaa", 60.0);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(line.chars().count() <= 10);
        }
    }

    #[test]
    fn system_resolution_when_fonts_exist() {
        // Only asserts when the host actually has fonts; otherwise the
        // catalog correctly reports the failure.
        let mut catalog = FontCatalog::new(Vec::new());
        match catalog.ensure_ready(["DejaVu Sans"]) {
            Ok(()) => {
                assert!(catalog.draw_face("DejaVu Sans").is_some());
                assert!(catalog.measure("DejaVu Sans", 12.0, "hello") > 0.0);
            }
            Err(err) => {
                assert!(err.to_string().contains("font"));
            }
        }
    }
}
