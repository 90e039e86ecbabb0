// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// End-to-end assembly: bitmaps in, a probed PDF out.

use image::Rgba;

use flachwerk_document::{DocumentProbe, PageAssembler, RetryPolicy, embed_with_retry};
use flachwerk_raster::RasterBitmap;

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

#[test]
fn pages_come_out_in_order_and_sized_in_points() {
    let mut assembler = PageAssembler::new("flachwerk test");
    assembler
        .append_bitmap(&RasterBitmap::filled(300, 48, WHITE).unwrap())
        .unwrap();
    assembler
        .append_bitmap(&RasterBitmap::filled(96, 96, WHITE).unwrap())
        .unwrap();
    assert_eq!(assembler.page_count(), 2);

    let bytes = assembler.finish();
    let probe = DocumentProbe::from_bytes(&bytes).unwrap();
    assert_eq!(probe.page_count(), 2);

    // Page size in points is pixels / (96/72).
    let (w, h) = probe.page_size_pt(0).unwrap();
    assert!((w - 225.0).abs() < 0.5, "width {w}");
    assert!((h - 36.0).abs() < 0.5, "height {h}");

    let (w, h) = probe.page_size_pt(1).unwrap();
    assert!((w - 72.0).abs() < 0.5, "width {w}");
    assert!((h - 72.0).abs() < 0.5, "height {h}");
}

#[test]
fn output_bytes_form_a_parseable_pdf_on_disk() {
    let mut assembler = PageAssembler::new("flachwerk test");
    assembler
        .append_bitmap(&RasterBitmap::filled(64, 64, WHITE).unwrap())
        .unwrap();
    let bytes = assembler.finish();
    assert!(bytes.starts_with(b"%PDF"));

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.pdf");
    std::fs::write(&path, &bytes).unwrap();
    let reread = std::fs::read(&path).unwrap();
    assert!(DocumentProbe::from_bytes(&reread).is_ok());
}

#[test]
fn retry_controller_embeds_through_a_real_assembler() {
    let mut assembler = PageAssembler::new("flachwerk test");
    let bitmap = RasterBitmap::filled(128, 128, WHITE).unwrap();
    embed_with_retry(&RetryPolicy::default(), bitmap, |b| {
        assembler.append_bitmap(b)
    })
    .unwrap();
    assert_eq!(assembler.page_count(), 1);
}
