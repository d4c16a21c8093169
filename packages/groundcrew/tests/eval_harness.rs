//! Benchmark harness tests against the mock providers.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use groundcrew::eval::{
    analyze_errors, evaluate_samples, load_dataset, run_evaluation, EvalOptions, EvaluationReport,
    FeverSample, HIGH_CONFIDENCE, LOW_CONFIDENCE, MEDIUM_CONFIDENCE,
};
use groundcrew::testing::{MockLanguageModel, MockWebSearcher};
use groundcrew::{
    FactCheckConfig, FactChecker, FeverLabel, GenerationRequest, LanguageModel, SearchHit,
};

const ALPHA: &str = "Alpha Centauri is the closest star system to the Sun.";
const BRAVO: &str = "Mount Everest is in the Andes.";
const CHARLIE: &str = "A forgotten poet wrote exactly 412 sonnets.";

fn hit(url: &str, content: &str) -> Vec<SearchHit> {
    vec![SearchHit::new(url, content).with_score(0.9)]
}

fn fixture() -> (FactChecker<MockLanguageModel, MockWebSearcher>, Vec<FeverSample>) {
    let llm = MockLanguageModel::new()
        .with_verdict(ALPHA, "supported", 0.9, "Astronomy references agree.")
        .with_verdict(BRAVO, "refuted", 0.95, "Everest is in the Himalayas.");
    let searcher = MockWebSearcher::new()
        .with_results("Alpha Centauri", hit("https://en.wikipedia.org/wiki/Alpha_Centauri", "Nearest stellar system, 4.37 light-years away."))
        .with_results("Everest", hit("https://en.wikipedia.org/wiki/Mount_Everest", "Located in the Mahalangur Himal range."));

    let samples = vec![
        FeverSample::new(ALPHA, FeverLabel::Supports),
        FeverSample::new(BRAVO, FeverLabel::Supports),
        FeverSample::new(CHARLIE, FeverLabel::NotEnoughInfo),
    ];
    (
        FactChecker::new(llm, searcher, FactCheckConfig::default()),
        samples,
    )
}

#[tokio::test]
async fn test_predictions_follow_first_verdict() {
    let (checker, samples) = fixture();

    let results = evaluate_samples(&checker, &samples, 2).await;

    assert_eq!(results.len(), 3);
    assert_eq!(results[0].predicted_label, FeverLabel::Supports);
    assert!(results[0].correct);
    assert_eq!(results[1].predicted_label, FeverLabel::Refutes);
    assert!(!results[1].correct);
    assert_eq!(results[2].predicted_label, FeverLabel::NotEnoughInfo);
    assert_eq!(results[2].confidence, 0.0);
    assert!(results[2].correct);
}

/// Delays each run by its sample number so later samples finish first.
#[derive(Clone, Default)]
struct StaggeredModel {
    inner: MockLanguageModel,
    finished: Arc<Mutex<Vec<u64>>>,
}

const STAGGERED_SAMPLES: u64 = 25;

fn sample_number(prompt: &str) -> Option<u64> {
    prompt
        .split('#')
        .nth(1)
        .and_then(|rest| rest.get(..2))
        .and_then(|digits| digits.parse().ok())
}

#[async_trait]
impl LanguageModel for StaggeredModel {
    async fn generate_json(&self, request: &GenerationRequest) -> groundcrew::Result<String> {
        if request.schema_name == "ClaimsList" {
            if let Some(n) = sample_number(&request.user) {
                let delay = (STAGGERED_SAMPLES - n) * 2;
                tokio::time::sleep(Duration::from_millis(delay)).await;
            }
        }
        self.inner.generate_json(request).await
    }

    async fn complete(&self, system: &str, user: &str) -> groundcrew::Result<String> {
        if let Some(n) = sample_number(user) {
            self.finished.lock().unwrap().push(n);
        }
        self.inner.complete(system, user).await
    }
}

#[tokio::test]
async fn test_results_keep_dataset_order_with_many_workers() {
    let samples: Vec<FeverSample> = (0..STAGGERED_SAMPLES)
        .map(|i| FeverSample::new(format!("Numbered claim #{:02}.", i), FeverLabel::NotEnoughInfo))
        .collect();
    let expected: Vec<&str> = samples.iter().map(|s| s.claim.as_str()).collect();

    for workers in [1, 4, 50] {
        let llm = StaggeredModel::default();
        let finished = llm.finished.clone();
        let checker = FactChecker::new(llm, MockWebSearcher::new(), FactCheckConfig::default());

        let results = evaluate_samples(&checker, &samples, workers).await;

        let completion = finished.lock().unwrap().clone();
        let in_order: Vec<u64> = (0..STAGGERED_SAMPLES).collect();
        if workers == 1 {
            assert_eq!(completion, in_order);
        } else {
            assert_ne!(completion, in_order, "runs should finish out of order");
        }

        let claims: Vec<&str> = results.iter().map(|r| r.claim.as_str()).collect();
        assert_eq!(claims, expected, "workers = {}", workers);
    }
}

#[tokio::test]
async fn test_zero_workers_still_runs() {
    let (checker, samples) = fixture();
    let results = evaluate_samples(&checker, &samples, 0).await;
    assert_eq!(results.len(), samples.len());
}

#[tokio::test]
async fn test_report_metrics() {
    let (checker, samples) = fixture();
    let options = EvalOptions {
        workers: 3,
        dataset: "fever-dev".to_string(),
    };

    let report = run_evaluation(&checker, &samples, &options).await;

    assert_eq!(report.metadata.dataset, "fever-dev");
    assert_eq!(report.metadata.num_samples, 3);
    assert_eq!(report.metadata.workers, 3);
    assert_eq!(report.metadata.model, checker.config().model_name);

    assert_eq!(report.overall_metrics.correct, 2);
    assert_eq!(report.overall_metrics.total, 3);
    assert!((report.overall_metrics.accuracy - 2.0 / 3.0).abs() < 1e-9);

    let supports = &report.per_label_metrics["SUPPORTS"];
    assert_eq!((supports.correct, supports.total), (1, 2));
    assert_eq!(report.per_label_metrics["NOT ENOUGH INFO"].accuracy, 1.0);
    assert!(!report.per_label_metrics.contains_key("REFUTES"));

    let high = &report.confidence_calibration[HIGH_CONFIDENCE];
    assert_eq!((high.count, high.accuracy), (2, 0.5));
    let medium = &report.confidence_calibration[MEDIUM_CONFIDENCE];
    assert_eq!((medium.count, medium.accuracy), (0, 0.0));
    let low = &report.confidence_calibration[LOW_CONFIDENCE];
    assert_eq!((low.count, low.accuracy), (1, 1.0));

    let patterns = analyze_errors(&report);
    assert_eq!(patterns.len(), 1);
    assert_eq!(patterns[0].transition, "SUPPORTS → REFUTES");
    assert_eq!(patterns[0].examples[0].claim, BRAVO);
}

#[tokio::test]
async fn test_report_saves_and_loads() {
    let (checker, samples) = fixture();
    let report = run_evaluation(&checker, &samples, &EvalOptions::default()).await;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("results").join("eval.json");
    report.save(&path).unwrap();

    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(raw.contains("\"overall_metrics\""));
    assert!(raw.contains("\"NOT ENOUGH INFO\""));

    let loaded = EvaluationReport::load(&path).unwrap();
    assert_eq!(loaded, report);
}

#[tokio::test]
async fn test_dataset_file_drives_evaluation() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fever.jsonl");
    std::fs::write(
        &path,
        format!(
            "{{\"claim\": \"{}\", \"label\": \"SUPPORTS\"}}\n\n{{\"claim\": \"{}\", \"label\": 2}}\n{{\"claim\": \"{}\", \"label\": 1}}\n",
            ALPHA, CHARLIE, BRAVO
        ),
    )
    .unwrap();

    let samples = load_dataset(&path, Some(2)).unwrap();
    assert_eq!(samples.len(), 2);
    assert_eq!(samples[1].label, FeverLabel::NotEnoughInfo);

    let (checker, _) = fixture();
    let report = run_evaluation(&checker, &samples, &EvalOptions::default()).await;
    assert_eq!(report.overall_metrics.correct, 2);
}
