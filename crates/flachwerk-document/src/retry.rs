// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Retry/degradation controller for page embedding.
//
// Only failures tagged as image-encode failures are retried, and each retry
// shrinks the bitmap by a fixed linear factor first. Everything else
// propagates immediately. Classification switches on the error variant,
// never on message text.

use tracing::{info, warn};

use flachwerk_core::error::{FlachwerkError, Result};
use flachwerk_raster::RasterBitmap;

/// Retry configuration.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    /// Linear shrink factor applied between attempts.
    pub shrink_factor: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            shrink_factor: 0.7,
        }
    }
}

/// How a failed attempt is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RetryDecision {
    /// Shrink the bitmap and try again.
    ShrinkAndRetry,
    /// Not an encode failure — propagate unchanged.
    Propagate,
}

fn classify(err: &FlachwerkError) -> RetryDecision {
    if err.is_encode_failure() {
        RetryDecision::ShrinkAndRetry
    } else {
        RetryDecision::Propagate
    }
}

/// Embed a bitmap through `embed`, shrinking and retrying on encode failures.
///
/// Consumes the bitmap: each retry hands the embedder a smaller surface. The
/// attempt budget spent, it raises a page-scoped fatal error.
pub fn embed_with_retry<F>(
    policy: &RetryPolicy,
    bitmap: RasterBitmap,
    mut embed: F,
) -> Result<()>
where
    F: FnMut(&RasterBitmap) -> Result<()>,
{
    let mut current = bitmap;
    for attempt in 1..=policy.max_attempts {
        match embed(&current) {
            Ok(()) => {
                if attempt > 1 {
                    info!(attempt, "embed succeeded after shrink");
                }
                return Ok(());
            }
            Err(err) => match classify(&err) {
                RetryDecision::Propagate => return Err(err),
                RetryDecision::ShrinkAndRetry => {
                    if attempt == policy.max_attempts {
                        warn!(attempts = policy.max_attempts, "embed retries exhausted");
                        return Err(FlachwerkError::EmbedExhausted {
                            attempts: policy.max_attempts,
                        });
                    }
                    warn!(
                        attempt,
                        width = current.width(),
                        height = current.height(),
                        %err,
                        "embed failed, shrinking and retrying"
                    );
                    current = current.shrink(policy.shrink_factor);
                }
            },
        }
    }
    // Only reachable with a zero-attempt policy.
    Err(FlachwerkError::EmbedExhausted {
        attempts: policy.max_attempts,
    })
}
