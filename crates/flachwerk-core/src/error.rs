// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Flachwerk.

use thiserror::Error;

use crate::types::SourceKind;

/// Pipeline stage at which an image encode/embed failure occurred.
///
/// Carried inside [`FlachwerkError::ImageEncode`] so that retry decisions
/// switch on a tagged variant instead of matching message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeStage {
    /// Compressing the bitmap into PNG bytes.
    PngEncode,
    /// Validating the canonical PNG signature on the encoded stream.
    SignatureCheck,
    /// Decoding the validated stream into a PDF image resource.
    PdfEmbed,
}

impl std::fmt::Display for EncodeStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::PngEncode => "png-encode",
            Self::SignatureCheck => "signature-check",
            Self::PdfEmbed => "pdf-embed",
        };
        write!(f, "{name}")
    }
}

/// Top-level error type for all Flachwerk operations.
#[derive(Debug, Error)]
pub enum FlachwerkError {
    // -- Input errors --
    #[error("no {0} source loaded")]
    MissingSource(SourceKind),

    #[error("failed to parse source: {0}")]
    Parse(String),

    // -- Render errors --
    #[error("rendered surface has zero size ({width}x{height})")]
    ZeroSizeRender { width: u32, height: u32 },

    #[error("rasterization failed: {0}")]
    Raster(String),

    #[error("sheet decoding failed: {0}")]
    Sheet(String),

    // -- Assembly errors --
    #[error("image encoding failed at {stage}: {detail}")]
    ImageEncode { stage: EncodeStage, detail: String },

    #[error("embedding failed after {attempts} attempts")]
    EmbedExhausted { attempts: u32 },

    #[error("PDF operation failed: {0}")]
    Pdf(String),

    // -- Environment --
    #[error("feature not compiled into this build: {0}")]
    FeatureUnavailable(&'static str),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl FlachwerkError {
    /// Whether this error is an image encode/embed failure — the only class
    /// the retry controller is allowed to act on.
    pub fn is_encode_failure(&self) -> bool {
        matches!(self, Self::ImageEncode { .. })
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, FlachwerkError>;
