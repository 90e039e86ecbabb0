// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// User-facing status messages for export outcomes.
//
// Every engine error maps to a single terminal status line plus an optional
// suggestion. The encode-exhausted case is deliberately distinguished from
// generic failure so callers can surface the "lower resolution" advice.

use crate::error::FlachwerkError;
use crate::types::SourceKind;

/// A status line suitable for direct display.
#[derive(Debug, Clone)]
pub struct StatusMessage {
    /// Short summary of what happened.
    pub message: String,
    /// What the user should try next, when there is something to try.
    pub suggestion: Option<String>,
    /// Whether the export is over (failed or finished) as opposed to merely
    /// blocked on input.
    pub terminal: bool,
}

/// Map an error to the status shown when an export ends with it.
pub fn status_for_error(err: &FlachwerkError) -> StatusMessage {
    match err {
        FlachwerkError::MissingSource(SourceKind::Spreadsheet) => StatusMessage {
            message: "Please load a workbook first.".into(),
            suggestion: None,
            terminal: false,
        },
        FlachwerkError::MissingSource(SourceKind::Document) => StatusMessage {
            message: "Please load a PDF first.".into(),
            suggestion: None,
            terminal: false,
        },

        FlachwerkError::Parse(detail) => StatusMessage {
            message: format!("Failed to read the source file. {detail}").trim().to_string(),
            suggestion: None,
            terminal: true,
        },

        FlachwerkError::ImageEncode { .. } | FlachwerkError::EmbedExhausted { .. } => {
            StatusMessage {
                message: "PDF generation failed while embedding the page image.".into(),
                suggestion: Some("Try a lower resolution.".into()),
                terminal: true,
            }
        }

        _ => StatusMessage {
            message: "PDF generation failed.".into(),
            suggestion: None,
            terminal: true,
        },
    }
}

/// Status shown when an export completes.
pub fn status_ready() -> StatusMessage {
    StatusMessage {
        message: "PDF ready.".into(),
        suggestion: None,
        terminal: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EncodeStage;

    #[test]
    fn encode_failures_carry_resolution_advice() {
        let err = FlachwerkError::EmbedExhausted { attempts: 3 };
        let status = status_for_error(&err);
        assert!(status.terminal);
        assert_eq!(status.suggestion.as_deref(), Some("Try a lower resolution."));

        let err = FlachwerkError::ImageEncode {
            stage: EncodeStage::PngEncode,
            detail: "buffer".into(),
        };
        assert!(status_for_error(&err).suggestion.is_some());
    }

    #[test]
    fn missing_source_is_not_terminal() {
        let status = status_for_error(&FlachwerkError::MissingSource(SourceKind::Spreadsheet));
        assert!(!status.terminal);
        assert_eq!(status.message, "Please load a workbook first.");
    }

    #[test]
    fn generic_failures_get_generic_message() {
        let status = status_for_error(&FlachwerkError::Raster("font".into()));
        assert_eq!(status.message, "PDF generation failed.");
        assert!(status.suggestion.is_none());
    }
}
