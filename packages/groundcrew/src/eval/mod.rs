//! FEVER-style benchmark harness.
//!
//! - [`dataset`] - JSONL loading
//! - [`harness`] - concurrent runs over a worker pool
//! - [`metrics`] - accuracy, per-label and calibration metrics, error analysis

pub mod dataset;
pub mod harness;
pub mod metrics;

pub use dataset::{load_dataset, parse_dataset, FeverSample};
pub use harness::{evaluate_samples, run_evaluation, EvalOptions, DEFAULT_WORKERS};
pub use metrics::{
    analyze_errors, confidence_bucket, summarize, CalibrationBucket, ErrorPattern, EvalMetadata,
    EvaluationReport, LabelMetrics, SampleResult, HIGH_CONFIDENCE, JUSTIFICATION_MAX_CHARS,
    LOW_CONFIDENCE, MEDIUM_CONFIDENCE,
};
