// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document probe — page count and page sizes of an existing PDF, via lopdf.
//
// The probe is the parse gate for the external-document path: a buffer that
// fails here is treated as absent by the session. It also supplies the
// base (scale-1) viewport of each page without rendering anything.

use lopdf::{Document, Object};
use tracing::{debug, instrument, warn};

use flachwerk_core::config::PX_PER_PT;
use flachwerk_core::error::{FlachwerkError, Result};

/// Default media box applied when a page chain declares none (US Letter).
const FALLBACK_MEDIA_BOX: (f64, f64) = (612.0, 792.0);

/// Parsed summary of an existing PDF.
pub struct DocumentProbe {
    /// Page sizes in points, in page order 1..N.
    page_sizes: Vec<(f64, f64)>,
}

impl DocumentProbe {
    /// Parse a PDF from memory.
    #[instrument(skip_all, fields(bytes_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let document = Document::load_mem(data)
            .map_err(|err| FlachwerkError::Parse(format!("failed to load PDF: {err}")))?;

        let pages = document.get_pages();
        if pages.is_empty() {
            return Err(FlachwerkError::Parse("PDF has no pages".into()));
        }

        let mut page_sizes = Vec::with_capacity(pages.len());
        for (&number, &page_id) in &pages {
            let size = media_box(&document, page_id).unwrap_or_else(|| {
                warn!(page = number, "no media box found, using fallback size");
                FALLBACK_MEDIA_BOX
            });
            page_sizes.push(size);
        }

        debug!(pages = page_sizes.len(), "document probed");
        Ok(Self { page_sizes })
    }

    pub fn page_count(&self) -> usize {
        self.page_sizes.len()
    }

    /// Page size in points (width, height), 0-based index.
    pub fn page_size_pt(&self, index: usize) -> Option<(f64, f64)> {
        self.page_sizes.get(index).copied()
    }

    /// Base (scale-1) pixel viewport of a page: the page rendered at 96 dpi.
    pub fn base_viewport_px(&self, index: usize) -> Option<(f64, f64)> {
        self.page_size_pt(index)
            .map(|(w, h)| (w * PX_PER_PT, h * PX_PER_PT))
    }
}

/// Resolve a page's /MediaBox, walking the /Parent chain for inherited
/// values. Returns (width, height) in points.
fn media_box(document: &Document, page_id: lopdf::ObjectId) -> Option<(f64, f64)> {
    let mut current = page_id;
    for _ in 0..16 {
        let dict = document.get_dictionary(current).ok()?;
        if let Ok(object) = dict.get(b"MediaBox") {
            return parse_media_box(document, object);
        }
        match dict.get(b"Parent") {
            Ok(Object::Reference(parent)) => current = *parent,
            _ => return None,
        }
    }
    None
}

fn parse_media_box(document: &Document, object: &Object) -> Option<(f64, f64)> {
    let array = match object {
        Object::Array(array) => array.clone(),
        Object::Reference(id) => match document.get_object(*id).ok()? {
            Object::Array(array) => array.clone(),
            _ => return None,
        },
        _ => return None,
    };
    if array.len() != 4 {
        return None;
    }
    let value = |obj: &Object| -> Option<f64> {
        match obj {
            Object::Integer(i) => Some(*i as f64),
            Object::Real(r) => Some(*r as f64),
            _ => None,
        }
    };
    let x0 = value(&array[0])?;
    let y0 = value(&array[1])?;
    let x1 = value(&array[2])?;
    let y1 = value(&array[3])?;
    Some(((x1 - x0).abs(), (y1 - y0).abs()))
}

#[cfg(test)]
mod tests {
    use super::*;
    // Bring the macro into scope so its trailing-comma arm's unqualified
    // recursive `dictionary!` call resolves at these call sites.
    use lopdf::dictionary;

    #[test]
    fn malformed_bytes_are_a_parse_error() {
        let result = DocumentProbe::from_bytes(b"not a pdf at all");
        assert!(matches!(result, Err(FlachwerkError::Parse(_))));
    }

    #[test]
    fn probes_a_minimal_document() {
        // Tiny valid single-page PDF assembled by lopdf itself.
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let page_id = doc.add_object(lopdf::dictionary! {
            "Type" => "Page",
            "Parent" => Object::Reference(pages_id),
            "MediaBox" => Object::Array(vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(300),
                Object::Integer(150),
            ]),
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(lopdf::dictionary! {
                "Type" => "Pages",
                "Kids" => Object::Array(vec![Object::Reference(page_id)]),
                "Count" => Object::Integer(1),
            }),
        );
        let catalog_id = doc.add_object(lopdf::dictionary! {
            "Type" => "Catalog",
            "Pages" => Object::Reference(pages_id),
        });
        doc.trailer.set("Root", Object::Reference(catalog_id));

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();

        let probe = DocumentProbe::from_bytes(&bytes).unwrap();
        assert_eq!(probe.page_count(), 1);
        assert_eq!(probe.page_size_pt(0), Some((300.0, 150.0)));
        // 96 dpi viewport: points * 96/72.
        assert_eq!(probe.base_viewport_px(0), Some((400.0, 200.0)));
    }

    #[test]
    fn inherited_media_box_is_found_on_the_parent() {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let page_id = doc.add_object(lopdf::dictionary! {
            "Type" => "Page",
            "Parent" => Object::Reference(pages_id),
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(lopdf::dictionary! {
                "Type" => "Pages",
                "Kids" => Object::Array(vec![Object::Reference(page_id)]),
                "Count" => Object::Integer(1),
                "MediaBox" => Object::Array(vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(612),
                    Object::Integer(792),
                ]),
            }),
        );
        let catalog_id = doc.add_object(lopdf::dictionary! {
            "Type" => "Catalog",
            "Pages" => Object::Reference(pages_id),
        });
        doc.trailer.set("Root", Object::Reference(catalog_id));

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();

        let probe = DocumentProbe::from_bytes(&bytes).unwrap();
        assert_eq!(probe.page_size_pt(0), Some((612.0, 792.0)));
    }
}
