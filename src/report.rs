//! Result presentation and persistence
//!
//! Consumes the engine's final outcome; never touches search state.

use std::fmt::Write as _;
use std::path::Path;

use crate::engine::AuditOutcome;
use crate::error::Result;
use crate::monitor::utils::{format_duration, format_number, format_rate};

/// Sort key putting numeric identifiers first in numeric order, everything
/// else after in lexicographic order.
fn identifier_key(identifier: &str) -> (u8, u64, &str) {
    match identifier.parse::<u64>() {
        Ok(value) => (0, value, identifier),
        Err(_) => (1, 0, identifier),
    }
}

/// Render the end-of-run summary as printed to the operator
pub fn render_summary(outcome: &AuditOutcome) -> String {
    let mut out = String::new();
    let line = "=".repeat(60);

    let _ = writeln!(out, "{line}");
    let _ = writeln!(out, "FINAL RESULTS");
    let _ = writeln!(out, "{line}");
    let _ = writeln!(
        out,
        "Cracked: {}/{} passwords",
        outcome.cracked_count, outcome.total_count
    );
    let _ = writeln!(
        out,
        "Time: {}",
        format_duration(std::time::Duration::from_secs_f64(outcome.elapsed_seconds))
    );
    let _ = writeln!(out, "Total attempts: {}", format_number(outcome.attempts));
    let _ = writeln!(out, "Rate: {}", format_rate(outcome.rate()));

    let mut entries: Vec<_> = outcome.entries.iter().collect();
    entries.sort_by_key(|entry| identifier_key(&entry.identifier));

    let missing: Vec<&str> = entries
        .iter()
        .filter(|entry| entry.plaintext.is_none())
        .map(|entry| entry.identifier.as_str())
        .collect();
    if !missing.is_empty() {
        let _ = writeln!(out, "\nMissing {}: {}", missing.len(), missing.join(", "));
    }

    let _ = writeln!(out, "\nRECOVERED:");
    for entry in &entries {
        if let Some(plaintext) = &entry.plaintext {
            let _ = writeln!(out, "  {:>8}: {}", entry.identifier, plaintext);
        }
    }

    out
}

/// Print the summary to stdout
pub fn print_summary(outcome: &AuditOutcome) {
    print!("{}", render_summary(outcome));
}

/// Render cracked entries as plain `identifier plaintext` lines
pub fn render_plain(outcome: &AuditOutcome) -> String {
    let mut entries: Vec<_> = outcome.entries.iter().collect();
    entries.sort_by_key(|entry| identifier_key(&entry.identifier));

    let mut out = String::new();
    for entry in entries {
        if let Some(plaintext) = &entry.plaintext {
            let _ = writeln!(out, "{} {}", entry.identifier, plaintext);
        }
    }
    out
}

/// Write the full outcome as pretty JSON
pub fn write_json<P: AsRef<Path>>(outcome: &AuditOutcome, path: P) -> Result<()> {
    let json = serde_json::to_string_pretty(outcome)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Write cracked entries as a plain text file
pub fn write_plain<P: AsRef<Path>>(outcome: &AuditOutcome, path: P) -> Result<()> {
    std::fs::write(path, render_plain(outcome))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::AuditEntry;

    fn outcome() -> AuditOutcome {
        AuditOutcome {
            entries: vec![
                AuditEntry {
                    identifier: "10".to_string(),
                    plaintext: Some("summer2024".to_string()),
                },
                AuditEntry {
                    identifier: "2".to_string(),
                    plaintext: Some("hello".to_string()),
                },
                AuditEntry {
                    identifier: "7".to_string(),
                    plaintext: None,
                },
            ],
            attempts: 1_234_567,
            elapsed_seconds: 61.0,
            cracked_count: 2,
            total_count: 3,
        }
    }

    #[test]
    fn test_summary_lists_counts_and_missing() {
        let summary = render_summary(&outcome());
        assert!(summary.contains("Cracked: 2/3 passwords"));
        assert!(summary.contains("Total attempts: 1,234,567"));
        assert!(summary.contains("Missing 1: 7"));
        assert!(summary.contains("hello"));
        assert!(summary.contains("summer2024"));
    }

    #[test]
    fn test_plain_output_is_numerically_sorted() {
        let plain = render_plain(&outcome());
        assert_eq!(plain, "2 hello\n10 summer2024\n");
    }

    #[test]
    fn test_summary_without_missing_section() {
        let mut outcome = outcome();
        outcome.entries.retain(|entry| entry.plaintext.is_some());
        outcome.total_count = 2;
        let summary = render_summary(&outcome);
        assert!(!summary.contains("Missing"));
    }
}
