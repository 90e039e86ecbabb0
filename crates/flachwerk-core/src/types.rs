// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Flachwerk flattening engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for one export operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExportId(pub Uuid);

impl ExportId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ExportId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ExportId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which kind of source an export operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceKind {
    /// Spreadsheet workbook (table rasterization path).
    Spreadsheet,
    /// Existing paginated document (page flattening path).
    Document,
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Spreadsheet => write!(f, "spreadsheet"),
            Self::Document => write!(f, "document"),
        }
    }
}

/// Spreadsheet export mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportMode {
    /// One output document containing the currently selected sheet.
    Combined,
    /// One output file per sheet, named after the sanitized sheet name.
    Separate,
}

/// Stamp attached to every export operation for logging and reporting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportTicket {
    pub id: ExportId,
    pub source: SourceKind,
    pub started_at: DateTime<Utc>,
}

impl ExportTicket {
    pub fn new(source: SourceKind) -> Self {
        Self {
            id: ExportId::new(),
            source,
            started_at: Utc::now(),
        }
    }
}

/// Stages of an export operation, for progress reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportStage {
    /// Reading and normalizing the source.
    Preparing,
    /// Rasterizing a sheet or page.
    Rendering,
    /// Encoding and appending a page to the output document.
    Assembling,
    /// Output bytes produced.
    Complete,
    /// Export aborted with a terminal error.
    Failed,
}

/// Progress event handed to the caller-supplied callback.
#[derive(Debug, Clone)]
pub struct ExportProgress {
    pub stage: ExportStage,
    /// Current unit of work (1-based page or sheet index), if applicable.
    pub current: Option<usize>,
    /// Total units of work, if known.
    pub total: Option<usize>,
    /// Human-readable status line ("Rendering page 3 of 12...").
    pub message: String,
}

impl ExportProgress {
    pub fn stage(stage: ExportStage, message: impl Into<String>) -> Self {
        Self {
            stage,
            current: None,
            total: None,
            message: message.into(),
        }
    }

    pub fn page(stage: ExportStage, current: usize, total: usize, message: impl Into<String>) -> Self {
        Self {
            stage,
            current: Some(current),
            total: Some(total),
            message: message.into(),
        }
    }
}
