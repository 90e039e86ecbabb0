// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Flachwerk — Core types and error definitions shared across all crates.

pub mod config;
pub mod error;
pub mod sanitize;
pub mod status;
pub mod types;

pub use config::{ExportConfig, RenderLimits, TableStyle};
pub use error::{EncodeStage, FlachwerkError};
pub use sanitize::sanitize_name;
pub use types::*;
