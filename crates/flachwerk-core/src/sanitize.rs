// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// File-stem sanitizer for sheet-derived output names.

/// Sanitize a sheet name into a file stem.
///
/// Every run of characters outside `[A-Za-z0-9_-]` collapses to a single
/// underscore, and consecutive underscores (including pre-existing ones)
/// collapse as well. The result may start or end with an underscore when the
/// input did, or when it began/ended with disallowed characters.
pub fn sanitize_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for ch in name.chars() {
        let mapped = if ch.is_ascii_alphanumeric() || ch == '-' {
            ch
        } else {
            '_'
        };
        if mapped == '_' && out.ends_with('_') {
            continue;
        }
        out.push(mapped);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_disallowed_runs_with_one_underscore() {
        assert_eq!(sanitize_name("Q1 Report!"), "Q1_Report_");
        assert_eq!(sanitize_name("a  &  b"), "a_b");
    }

    #[test]
    fn collapses_existing_underscores() {
        assert_eq!(sanitize_name("a__b___c"), "a_b_c");
    }

    #[test]
    fn keeps_allowed_characters() {
        assert_eq!(sanitize_name("Sheet-1_ok"), "Sheet-1_ok");
    }

    #[test]
    fn empty_input_stays_empty() {
        assert_eq!(sanitize_name(""), "");
    }
}
