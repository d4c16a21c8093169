//! `groundcrew eval`: benchmark against a FEVER-style dataset.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use groundcrew::eval::{
    analyze_errors, load_dataset, run_evaluation, EvalOptions, EvaluationReport, DEFAULT_WORKERS,
};
use groundcrew::types::truncate_chars;
use groundcrew::{FactCheckConfig, FactChecker, ProviderCredentials};

use super::ConfigArgs;

const RULE_WIDTH: usize = 70;
const CLAIM_PREVIEW_CHARS: usize = 100;

#[derive(Args, Debug)]
pub struct EvalArgs {
    /// JSONL file with one {"claim", "label"} object per line
    #[arg(long, value_name = "FILE", required_unless_present = "analyze")]
    pub dataset: Option<PathBuf>,

    /// Number of samples to evaluate
    #[arg(short = 'n', long = "num-samples", default_value_t = 100)]
    pub num_samples: usize,

    /// Concurrent pipeline runs
    #[arg(long, default_value_t = DEFAULT_WORKERS)]
    pub workers: usize,

    /// Results file (written by a run, read by --analyze)
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "fever_evaluation_results.json"
    )]
    pub output: PathBuf,

    /// Print error patterns from an existing results file
    #[arg(long)]
    pub analyze: bool,

    #[command(flatten)]
    pub config: ConfigArgs,
}

pub async fn run(args: EvalArgs, config: FactCheckConfig) -> Result<()> {
    if args.analyze {
        let report = EvaluationReport::load(&args.output)
            .with_context(|| format!("Failed to load results from {}", args.output.display()))?;
        println!("{}", format_analysis(&report));
        return Ok(());
    }

    let Some(dataset) = &args.dataset else {
        anyhow::bail!("--dataset is required unless --analyze is given");
    };

    let credentials = ProviderCredentials::from_env().context("Missing API credentials")?;
    let samples = load_dataset(dataset, Some(args.num_samples))
        .with_context(|| format!("Failed to load dataset {}", dataset.display()))?;
    println!(
        "{} {} samples from {} with {} workers",
        "Evaluating".bold(),
        samples.len(),
        dataset.display(),
        args.workers.max(1)
    );

    let checker = FactChecker::from_credentials(&credentials, config);
    let options = EvalOptions {
        workers: args.workers,
        dataset: dataset_name(dataset),
    };
    let report = run_evaluation(&checker, &samples, &options).await;

    report
        .save(&args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    println!("{}", format_summary(&report));
    println!("{} {}", "Saved results to".green(), args.output.display());
    Ok(())
}

fn dataset_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "FEVER".to_string())
}

fn percent(value: f64) -> String {
    format!("{:.1}%", value * 100.0)
}

/// Overall, per-label and calibration metrics.
pub fn format_summary(report: &EvaluationReport) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let overall = &report.overall_metrics;
    let mut out = vec![
        rule.clone(),
        format!("EVALUATION RESULTS ({})", report.metadata.dataset)
            .bold()
            .to_string(),
        rule.clone(),
        format!("Model: {}", report.metadata.model),
        format!(
            "Accuracy: {} ({}/{})",
            percent(overall.accuracy),
            overall.correct,
            overall.total
        ),
        String::new(),
        "Per-label accuracy:".to_string(),
    ];

    for (label, metrics) in &report.per_label_metrics {
        out.push(format!(
            "  {:<16} {:>6} ({}/{})",
            label,
            percent(metrics.accuracy),
            metrics.correct,
            metrics.total
        ));
    }

    out.push(String::new());
    out.push("Confidence calibration:".to_string());
    for (bucket, metrics) in &report.confidence_calibration {
        out.push(format!(
            "  {:<16} {:>6} ({} samples)",
            bucket,
            percent(metrics.accuracy),
            metrics.count
        ));
    }
    out.push(rule);
    out.join("\n")
}

/// Error patterns, most frequent first, with one example each.
pub fn format_analysis(report: &EvaluationReport) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let overall = &report.overall_metrics;
    let mut out = vec![
        rule.clone(),
        "ERROR ANALYSIS".bold().to_string(),
        rule.clone(),
        format!(
            "Accuracy: {} ({}/{})",
            percent(overall.accuracy),
            overall.correct,
            overall.total
        ),
        String::new(),
        "Error Patterns:".to_string(),
    ];

    let patterns = analyze_errors(report);
    if patterns.is_empty() {
        out.push("  none".to_string());
    }
    for pattern in &patterns {
        out.push(String::new());
        out.push(format!("{}: {} cases", pattern.transition.yellow(), pattern.count()));
        if let Some(example) = pattern.examples.first() {
            out.push(format!(
                "  Example: {}...",
                truncate_chars(&example.claim, CLAIM_PREVIEW_CHARS)
            ));
            out.push(format!("  Confidence: {:.2}", example.confidence));
        }
    }
    out.push(rule);
    out.join("\n")
}
