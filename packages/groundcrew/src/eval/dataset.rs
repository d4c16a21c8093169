//! FEVER-style JSONL datasets.
//!
//! One object per line: `{"claim": "...", "label": "SUPPORTS"}`. Labels may
//! also be integers (0 = SUPPORTS, 1 = REFUTES, 2 = NOT ENOUGH INFO).

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{GroundCrewError, Result};
use crate::types::FeverLabel;

/// A labelled claim.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeverSample {
    pub claim: String,
    pub label: FeverLabel,
}

impl FeverSample {
    pub fn new(claim: impl Into<String>, label: FeverLabel) -> Self {
        Self {
            claim: claim.into(),
            label,
        }
    }
}

#[derive(Deserialize)]
struct RawSample {
    claim: String,
    label: Value,
}

fn parse_label(value: &Value) -> std::result::Result<FeverLabel, String> {
    match value {
        Value::String(s) => s.parse().map_err(|e| format!("{}", e)),
        Value::Number(n) => n
            .as_i64()
            .and_then(FeverLabel::from_index)
            .ok_or_else(|| format!("label index {} is not 0, 1 or 2", n)),
        other => Err(format!("label must be a string or integer, got {}", other)),
    }
}

/// Parse JSONL text. Blank lines are skipped; line numbers in errors are 1-based.
pub fn parse_dataset(raw: &str) -> Result<Vec<FeverSample>> {
    let mut samples = Vec::new();

    for (idx, line) in raw.lines().enumerate() {
        let line_no = idx + 1;
        if line.trim().is_empty() {
            continue;
        }

        let sample: RawSample =
            serde_json::from_str(line).map_err(|e| GroundCrewError::Dataset {
                line: line_no,
                reason: e.to_string(),
            })?;

        let label = parse_label(&sample.label).map_err(|reason| GroundCrewError::Dataset {
            line: line_no,
            reason,
        })?;

        samples.push(FeverSample::new(sample.claim, label));
    }

    Ok(samples)
}

/// Read a JSONL file, keeping at most `limit` samples.
pub fn load_dataset(path: impl AsRef<Path>, limit: Option<usize>) -> Result<Vec<FeverSample>> {
    let raw = std::fs::read_to_string(path)?;
    let mut samples = parse_dataset(&raw)?;
    if let Some(limit) = limit {
        samples.truncate(limit);
    }
    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parses_string_and_integer_labels() {
        let raw = r#"{"claim": "A", "label": "SUPPORTS"}

{"claim": "B", "label": 1}
{"claim": "C", "label": "NOT ENOUGH INFO"}
{"claim": "D", "label": 2}
"#;
        let samples = parse_dataset(raw).unwrap();
        assert_eq!(
            samples,
            vec![
                FeverSample::new("A", FeverLabel::Supports),
                FeverSample::new("B", FeverLabel::Refutes),
                FeverSample::new("C", FeverLabel::NotEnoughInfo),
                FeverSample::new("D", FeverLabel::NotEnoughInfo),
            ]
        );
    }

    #[test]
    fn test_malformed_line_reports_line_number() {
        let raw = "{\"claim\": \"A\", \"label\": 0}\nnot json\n";
        match parse_dataset(raw) {
            Err(GroundCrewError::Dataset { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected dataset error, got {:?}", other),
        }
    }

    #[test]
    fn test_bad_label_is_rejected() {
        for raw in [
            r#"{"claim": "A", "label": 7}"#,
            r#"{"claim": "A", "label": "MAYBE"}"#,
            r#"{"claim": "A", "label": "mixed"}"#,
            r#"{"claim": "A", "label": null}"#,
        ] {
            assert!(
                matches!(parse_dataset(raw), Err(GroundCrewError::Dataset { line: 1, .. })),
                "{} should be rejected",
                raw
            );
        }
    }

    #[test]
    fn test_load_respects_limit() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        for i in 0..5 {
            writeln!(file, r#"{{"claim": "claim {}", "label": 0}}"#, i).unwrap();
        }
        let samples = load_dataset(file.path(), Some(3)).unwrap();
        assert_eq!(samples.len(), 3);
        assert_eq!(samples[2].claim, "claim 2");
    }
}
