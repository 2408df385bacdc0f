//! Restic status stream parsing.
//!
//! With `--json`, restic emits one JSON object per line on stdout. Records
//! stay untyped (`serde_json::Value`); the only field this crate relies on
//! is the `message_type` discriminator, and the only record it cares about
//! is the terminal `"summary"` one. Lines that fail to decode are skipped,
//! since the engine may emit partial or non-JSON final lines.

use serde_json::Value;
use tracing::debug;

/// Discriminator value marking the terminal status record of a backup run.
pub const SUMMARY_KIND: &str = "summary";

/// Decode stdout into status records, one per non-empty line.
pub fn parse_records(stdout: &str) -> Vec<Value> {
    let mut records = Vec::new();
    for line in stdout.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str(line) {
            Ok(record) => records.push(record),
            Err(err) => debug!("skipping undecodable status line: {}", err),
        }
    }
    records
}

/// Find the summary record in a backup invocation's stdout.
///
/// Exactly one summary is expected per successful run; if the engine ever
/// emits more than one, the last wins. `None` is not an error: a zero-exit
/// backup without a summary is still a success, just without statistics.
pub fn find_summary(stdout: &str) -> Option<Value> {
    parse_records(stdout)
        .into_iter()
        .filter(|record| {
            record.get("message_type").and_then(Value::as_str) == Some(SUMMARY_KIND)
        })
        .next_back()
}

/// Human-readable statistics pulled from a summary record, for completion
/// log lines. Every field is optional in the engine's schema.
pub fn summary_detail(summary: &Value) -> Option<String> {
    let mut parts = Vec::new();

    if let Some(id) = summary.get("snapshot_id").and_then(Value::as_str) {
        parts.push(format!("snapshot {}", id));
    }
    if let Some(new) = summary.get("files_new").and_then(Value::as_u64) {
        parts.push(format!("{} new files", new));
    }
    if let Some(changed) = summary.get("files_changed").and_then(Value::as_u64) {
        parts.push(format!("{} changed files", changed));
    }
    if let Some(bytes) = summary.get("total_bytes_processed").and_then(Value::as_u64) {
        parts.push(format!("{} bytes processed", bytes));
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATUS_LINE: &str = r#"{"message_type":"status","percent_done":0.5}"#;
    const SUMMARY_LINE: &str = r#"{"message_type":"summary","snapshot_id":"a1b2c3","files_new":12,"files_changed":3,"total_bytes_processed":4096}"#;

    #[test]
    fn test_parse_records_skips_empty_lines() {
        let stdout = format!("\n{}\n\n{}\n", STATUS_LINE, SUMMARY_LINE);
        let records = parse_records(&stdout);
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_parse_records_skips_undecodable_lines() {
        let stdout = format!("{}\nnot json at all\n{}\n{{\"trunc", STATUS_LINE, SUMMARY_LINE);
        let records = parse_records(&stdout);
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_find_summary_last_line() {
        let stdout = format!("{}\n{}\n", STATUS_LINE, SUMMARY_LINE);
        let summary = find_summary(&stdout).expect("summary expected");
        assert_eq!(summary["snapshot_id"], "a1b2c3");
    }

    #[test]
    fn test_find_summary_first_line() {
        let stdout = format!("{}\n{}\n", SUMMARY_LINE, STATUS_LINE);
        assert!(find_summary(&stdout).is_some());
    }

    #[test]
    fn test_find_summary_middle_line() {
        let stdout = format!("{}\n{}\n{}\n", STATUS_LINE, SUMMARY_LINE, STATUS_LINE);
        assert!(find_summary(&stdout).is_some());
    }

    #[test]
    fn test_find_summary_none_present() {
        let stdout = format!("{}\n{}\n", STATUS_LINE, STATUS_LINE);
        assert!(find_summary(&stdout).is_none());
    }

    #[test]
    fn test_find_summary_empty_stdout() {
        assert!(find_summary("").is_none());
    }

    #[test]
    fn test_find_summary_last_wins() {
        let first = r#"{"message_type":"summary","snapshot_id":"first"}"#;
        let last = r#"{"message_type":"summary","snapshot_id":"last"}"#;
        let stdout = format!("{}\n{}\n", first, last);
        let summary = find_summary(&stdout).unwrap();
        assert_eq!(summary["snapshot_id"], "last");
    }

    #[test]
    fn test_records_without_discriminator_ignored() {
        let stdout = r#"{"percent_done":1.0}
{"message_type":"summary","files_new":1}
"#;
        assert!(find_summary(stdout).is_some());
    }

    #[test]
    fn test_summary_detail_full() {
        let summary = find_summary(SUMMARY_LINE).unwrap();
        let detail = summary_detail(&summary).unwrap();
        assert!(detail.contains("snapshot a1b2c3"));
        assert!(detail.contains("12 new files"));
        assert!(detail.contains("3 changed files"));
        assert!(detail.contains("4096 bytes processed"));
    }

    #[test]
    fn test_summary_detail_empty_summary() {
        let summary: Value = serde_json::from_str(r#"{"message_type":"summary"}"#).unwrap();
        assert!(summary_detail(&summary).is_none());
    }
}
