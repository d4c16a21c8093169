//! Accuracy metrics and the persisted evaluation report.

use std::path::Path;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::dataset::FeverSample;
use crate::error::Result;
use crate::types::{truncate_chars, FeverLabel, PipelineState};

/// Justifications are cut to this many characters in the report.
pub const JUSTIFICATION_MAX_CHARS: usize = 200;

pub const HIGH_CONFIDENCE: &str = "high (>0.8)";
pub const MEDIUM_CONFIDENCE: &str = "medium (0.5-0.8)";
pub const LOW_CONFIDENCE: &str = "low (<0.5)";

/// Outcome for one dataset sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleResult {
    pub claim: String,
    pub true_label: FeverLabel,
    pub predicted_label: FeverLabel,
    pub correct: bool,
    pub confidence: f32,
    pub justification: String,
    pub error: Option<String>,
}

impl SampleResult {
    /// Score a finished run. The first verdict is the prediction; a run with
    /// no verdicts predicts NOT ENOUGH INFO with zero confidence.
    pub fn from_state(sample: &FeverSample, state: &PipelineState) -> Self {
        let (predicted_label, confidence, justification) = match state.verdicts.first() {
            Some(v) => (
                v.status.to_fever_label(),
                v.confidence.value(),
                truncate_chars(&v.justification, JUSTIFICATION_MAX_CHARS).to_string(),
            ),
            None => (
                FeverLabel::NotEnoughInfo,
                0.0,
                "No verdict generated".to_string(),
            ),
        };

        Self {
            claim: sample.claim.clone(),
            true_label: sample.label,
            predicted_label,
            correct: predicted_label == sample.label,
            confidence,
            justification,
            error: state.error.clone(),
        }
    }
}

/// Correct / total for a slice of results.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LabelMetrics {
    pub accuracy: f64,
    pub correct: usize,
    pub total: usize,
}

impl LabelMetrics {
    fn from_counts(correct: usize, total: usize) -> Self {
        Self {
            accuracy: ratio(correct, total),
            correct,
            total,
        }
    }
}

/// Accuracy of the predictions that fell into one confidence bucket.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CalibrationBucket {
    pub accuracy: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvalMetadata {
    pub timestamp: DateTime<Utc>,
    pub dataset: String,
    pub num_samples: usize,
    pub model: String,
    pub workers: usize,
    pub evidence_domain: Option<String>,
}

/// Everything written to `results.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub metadata: EvalMetadata,
    pub overall_metrics: LabelMetrics,

    /// Only labels present in the dataset appear here.
    pub per_label_metrics: IndexMap<String, LabelMetrics>,

    pub confidence_calibration: IndexMap<String, CalibrationBucket>,
    pub individual_results: Vec<SampleResult>,
}

fn ratio(correct: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        correct as f64 / total as f64
    }
}

/// Bucket name for a confidence value.
pub fn confidence_bucket(confidence: f32) -> &'static str {
    if confidence > 0.8 {
        HIGH_CONFIDENCE
    } else if confidence >= 0.5 {
        MEDIUM_CONFIDENCE
    } else {
        LOW_CONFIDENCE
    }
}

/// Compute metrics over `results`.
pub fn summarize(metadata: EvalMetadata, results: Vec<SampleResult>) -> EvaluationReport {
    let correct = results.iter().filter(|r| r.correct).count();
    let overall_metrics = LabelMetrics::from_counts(correct, results.len());

    let mut per_label_metrics = IndexMap::new();
    for label in FeverLabel::ALL {
        let of_label: Vec<&SampleResult> =
            results.iter().filter(|r| r.true_label == label).collect();
        if of_label.is_empty() {
            continue;
        }
        let correct = of_label.iter().filter(|r| r.correct).count();
        per_label_metrics.insert(
            label.as_str().to_string(),
            LabelMetrics::from_counts(correct, of_label.len()),
        );
    }

    let mut counts: IndexMap<&'static str, (usize, usize)> = IndexMap::new();
    for bucket in [HIGH_CONFIDENCE, MEDIUM_CONFIDENCE, LOW_CONFIDENCE] {
        counts.insert(bucket, (0, 0));
    }
    for r in &results {
        if let Some((correct, total)) = counts.get_mut(confidence_bucket(r.confidence)) {
            *total += 1;
            if r.correct {
                *correct += 1;
            }
        }
    }
    let confidence_calibration = counts
        .into_iter()
        .map(|(name, (correct, total))| {
            (
                name.to_string(),
                CalibrationBucket {
                    accuracy: ratio(correct, total),
                    count: total,
                },
            )
        })
        .collect();

    EvaluationReport {
        metadata,
        overall_metrics,
        per_label_metrics,
        confidence_calibration,
        individual_results: results,
    }
}

impl EvaluationReport {
    /// Write pretty-printed JSON, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}

/// Misclassifications sharing the same `true -> predicted` pair.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorPattern {
    /// e.g. `SUPPORTS → NOT ENOUGH INFO`
    pub transition: String,
    pub examples: Vec<SampleResult>,
}

impl ErrorPattern {
    pub fn count(&self) -> usize {
        self.examples.len()
    }
}

/// Group incorrect results by transition, most frequent first.
pub fn analyze_errors(report: &EvaluationReport) -> Vec<ErrorPattern> {
    let mut groups: IndexMap<String, Vec<SampleResult>> = IndexMap::new();
    for r in report.individual_results.iter().filter(|r| !r.correct) {
        let key = format!("{} → {}", r.true_label, r.predicted_label);
        groups.entry(key).or_default().push(r.clone());
    }

    let mut patterns: Vec<ErrorPattern> = groups
        .into_iter()
        .map(|(transition, examples)| ErrorPattern {
            transition,
            examples,
        })
        .collect();
    patterns.sort_by(|a, b| b.count().cmp(&a.count()));
    patterns
}
