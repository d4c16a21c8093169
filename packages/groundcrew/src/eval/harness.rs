//! Concurrent benchmark runner.
//!
//! Each sample gets its own pipeline run; up to `workers` runs are in flight
//! at once. Results arrive in completion order and are put back in dataset
//! order before scoring.

use std::collections::BTreeMap;

use chrono::Utc;
use futures::stream::{self, StreamExt};
use tracing::info;

use super::dataset::FeverSample;
use super::metrics::{summarize, EvalMetadata, EvaluationReport, SampleResult};
use crate::pipeline::FactChecker;
use crate::traits::llm::LanguageModel;
use crate::traits::searcher::WebSearcher;

pub const DEFAULT_WORKERS: usize = 10;

/// Settings for an evaluation run.
#[derive(Debug, Clone)]
pub struct EvalOptions {
    /// Concurrent pipeline runs (minimum 1).
    pub workers: usize,

    /// Dataset name recorded in the report metadata.
    pub dataset: String,
}

impl Default for EvalOptions {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            dataset: "FEVER".to_string(),
        }
    }
}

/// Run every sample through `checker`, returning results in dataset order.
pub async fn evaluate_samples<L, S>(
    checker: &FactChecker<L, S>,
    samples: &[FeverSample],
    workers: usize,
) -> Vec<SampleResult>
where
    L: LanguageModel,
    S: WebSearcher,
{
    let total = samples.len();
    let mut runs = stream::iter(samples.iter().enumerate())
        .map(|(index, sample)| async move {
            let mut metadata = BTreeMap::new();
            metadata.insert("sample_index".to_string(), index.to_string());
            let state = checker.run_with_metadata(&sample.claim, metadata).await;
            (index, SampleResult::from_state(sample, &state))
        })
        .buffer_unordered(workers.max(1));

    let mut results: Vec<(usize, SampleResult)> = Vec::with_capacity(total);
    let mut correct = 0;
    while let Some((index, result)) = runs.next().await {
        if result.correct {
            correct += 1;
        }
        results.push((index, result));

        let done = results.len();
        if done % 10 == 0 || done == total {
            info!(
                done,
                total,
                accuracy = correct as f64 / done as f64,
                "Evaluation progress"
            );
        }
    }

    results.sort_by_key(|(index, _)| *index);
    results.into_iter().map(|(_, result)| result).collect()
}

/// Evaluate and summarize into a report.
pub async fn run_evaluation<L, S>(
    checker: &FactChecker<L, S>,
    samples: &[FeverSample],
    options: &EvalOptions,
) -> EvaluationReport
where
    L: LanguageModel,
    S: WebSearcher,
{
    let workers = options.workers.max(1);
    info!(samples = samples.len(), workers, "Starting evaluation");

    let results = evaluate_samples(checker, samples, workers).await;
    let metadata = EvalMetadata {
        timestamp: Utc::now(),
        dataset: options.dataset.clone(),
        num_samples: samples.len(),
        model: checker.config().model_name.clone(),
        workers,
        evidence_domain: checker.config().evidence_domain.clone(),
    };

    let report = summarize(metadata, results);
    info!(
        accuracy = report.overall_metrics.accuracy,
        correct = report.overall_metrics.correct,
        total = report.overall_metrics.total,
        "Evaluation complete"
    );
    report
}
