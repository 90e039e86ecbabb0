// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// flachwerk-engine — Export orchestration for Flachwerk.
//
// The engine is stateless between calls: every operation receives an
// `ExportSession` owned by the caller for the session's duration. Sheets and
// pages are processed strictly one at a time, so at most one full-resolution
// bitmap is resident at any moment. Exports have no cancellation point; only
// the lightweight preview path discards superseded results.

pub mod flatten;
pub mod preview;
pub mod session;
pub mod sheet_export;

pub use flatten::{flatten_document, flatten_loaded_document};
pub use preview::{PreviewCoordinator, PreviewTicket};
pub use session::{ExportSession, LoadedDocument, LoadedWorkbook};
pub use sheet_export::{
    ExportedFile, export_all_sheets, export_all_sheets_with, export_selected_sheet,
    export_sheet_by_name, export_sheets,
};
