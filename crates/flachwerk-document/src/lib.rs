// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// flachwerk-document — PDF handling for the Flachwerk engine.
//
// Provides the document probe (page count and sizes of an existing PDF), the
// page source abstraction for rendering external pages, the page assembler
// that embeds bitmaps as full-bleed image pages, and the retry/degradation
// controller for embed failures.

pub mod assemble;
pub mod probe;
pub mod retry;
pub mod source;

pub use assemble::PageAssembler;
pub use probe::DocumentProbe;
pub use retry::{RetryPolicy, embed_with_retry};
pub use source::PageSource;

#[cfg(feature = "pdfium")]
pub use source::PdfiumSource;
