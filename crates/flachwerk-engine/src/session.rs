// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Export session — the explicit context object owning loaded sources.
//
// The caller owns the session for its duration; the engine itself keeps no
// state between calls. A source that fails to parse is recorded as absent,
// so subsequent exports report a missing source rather than operating on a
// half-loaded buffer.

use sha2::{Digest, Sha256};
use tracing::{info, instrument, warn};

use flachwerk_core::config::ExportConfig;
use flachwerk_core::error::{FlachwerkError, Result};
use flachwerk_core::types::{ExportTicket, SourceKind};
use flachwerk_document::DocumentProbe;
use flachwerk_sheet::raw::RawWorkbook;
use flachwerk_sheet::xlsx;

/// A workbook accepted into the session.
pub struct LoadedWorkbook {
    pub workbook: RawWorkbook,
    /// SHA-256 of the source bytes, when loaded from bytes.
    pub fingerprint: Option<String>,
    pub name: Option<String>,
}

/// An external document accepted into the session.
pub struct LoadedDocument {
    pub bytes: Vec<u8>,
    pub probe: DocumentProbe,
    pub fingerprint: String,
    pub name: Option<String>,
}

fn fingerprint(bytes: &[u8]) -> String {
    Sha256::digest(bytes)
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

/// Context for one export session.
pub struct ExportSession {
    config: ExportConfig,
    workbook: Option<LoadedWorkbook>,
    document: Option<LoadedDocument>,
    selected_sheet: Option<String>,
}

impl ExportSession {
    pub fn new(config: ExportConfig) -> Self {
        Self {
            config,
            workbook: None,
            document: None,
            selected_sheet: None,
        }
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut ExportConfig {
        &mut self.config
    }

    /// Open a fresh ticket for one export operation.
    pub fn ticket(&self, source: SourceKind) -> ExportTicket {
        ExportTicket::new(source)
    }

    // -- Spreadsheet source ---------------------------------------------------

    /// Parse and accept workbook bytes. On failure the workbook slot is
    /// cleared and the parse error returned.
    #[instrument(skip_all, fields(bytes_len = bytes.len()))]
    pub fn load_workbook_bytes(&mut self, bytes: &[u8], name: Option<String>) -> Result<()> {
        match xlsx::load_workbook_bytes(bytes) {
            Ok(workbook) => {
                self.accept_workbook(LoadedWorkbook {
                    workbook,
                    fingerprint: Some(fingerprint(bytes)),
                    name,
                });
                Ok(())
            }
            Err(err) => {
                warn!(%err, "workbook rejected");
                self.workbook = None;
                self.selected_sheet = None;
                Err(err)
            }
        }
    }

    /// Accept an already-decoded raw workbook (style-complete decoders enter
    /// here).
    pub fn load_workbook(&mut self, workbook: RawWorkbook, name: Option<String>) {
        self.accept_workbook(LoadedWorkbook {
            workbook,
            fingerprint: None,
            name,
        });
    }

    fn accept_workbook(&mut self, loaded: LoadedWorkbook) {
        self.selected_sheet = loaded
            .workbook
            .sheets
            .first()
            .map(|(name, _)| name.clone());
        info!(
            sheets = loaded.workbook.sheets.len(),
            selected = self.selected_sheet.as_deref().unwrap_or(""),
            "workbook loaded"
        );
        self.workbook = Some(loaded);
    }

    pub fn workbook(&self) -> Result<&LoadedWorkbook> {
        self.workbook
            .as_ref()
            .ok_or(FlachwerkError::MissingSource(SourceKind::Spreadsheet))
    }

    /// Select the sheet the combined export and the preview operate on.
    pub fn select_sheet(&mut self, name: &str) -> Result<()> {
        let loaded = self
            .workbook
            .as_ref()
            .ok_or(FlachwerkError::MissingSource(SourceKind::Spreadsheet))?;
        if loaded.workbook.sheet(name).is_none() {
            return Err(FlachwerkError::Sheet(format!("no sheet named '{name}'")));
        }
        self.selected_sheet = Some(name.to_string());
        Ok(())
    }

    pub fn selected_sheet(&self) -> Option<&str> {
        self.selected_sheet.as_deref()
    }

    // -- Document source ------------------------------------------------------

    /// Probe and accept an external document. On failure the document slot is
    /// cleared and the parse error returned.
    #[instrument(skip_all, fields(bytes_len = bytes.len()))]
    pub fn load_document(&mut self, bytes: Vec<u8>, name: Option<String>) -> Result<()> {
        match DocumentProbe::from_bytes(&bytes) {
            Ok(probe) => {
                info!(pages = probe.page_count(), "document loaded");
                self.document = Some(LoadedDocument {
                    fingerprint: fingerprint(&bytes),
                    bytes,
                    probe,
                    name,
                });
                Ok(())
            }
            Err(err) => {
                warn!(%err, "document rejected");
                self.document = None;
                Err(err)
            }
        }
    }

    pub fn document(&self) -> Result<&LoadedDocument> {
        self.document
            .as_ref()
            .ok_or(FlachwerkError::MissingSource(SourceKind::Document))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flachwerk_sheet::raw::{RawCell, RawSheet};

    fn workbook_with(names: &[&str]) -> RawWorkbook {
        let mut workbook = RawWorkbook::default();
        for name in names {
            let mut sheet = RawSheet::new();
            sheet.set_cell(0, 0, RawCell::text(*name));
            workbook.sheets.push((name.to_string(), sheet));
        }
        workbook
    }

    #[test]
    fn empty_session_reports_missing_sources() {
        let session = ExportSession::new(ExportConfig::default());
        assert!(matches!(
            session.workbook(),
            Err(FlachwerkError::MissingSource(SourceKind::Spreadsheet))
        ));
        assert!(matches!(
            session.document(),
            Err(FlachwerkError::MissingSource(SourceKind::Document))
        ));
    }

    #[test]
    fn loading_selects_the_first_sheet() {
        let mut session = ExportSession::new(ExportConfig::default());
        session.load_workbook(workbook_with(&["Alpha", "Beta"]), None);
        assert_eq!(session.selected_sheet(), Some("Alpha"));
        session.select_sheet("Beta").unwrap();
        assert_eq!(session.selected_sheet(), Some("Beta"));
        assert!(session.select_sheet("Gamma").is_err());
    }

    #[test]
    fn malformed_document_leaves_the_slot_absent() {
        let mut session = ExportSession::new(ExportConfig::default());
        let err = session
            .load_document(b"definitely not a pdf".to_vec(), None)
            .unwrap_err();
        assert!(matches!(err, FlachwerkError::Parse(_)));
        assert!(session.document().is_err());
    }

    #[test]
    fn malformed_workbook_leaves_the_slot_absent() {
        let mut session = ExportSession::new(ExportConfig::default());
        session.load_workbook(workbook_with(&["Keep"]), None);
        let err = session
            .load_workbook_bytes(b"not a zip archive", None)
            .unwrap_err();
        assert!(matches!(err, FlachwerkError::Parse(_)));
        assert!(session.workbook().is_err());
        assert_eq!(session.selected_sheet(), None);
    }
}
