//! End-to-end pipeline tests against the mock providers.

use std::collections::BTreeMap;

use groundcrew::{
    fetch_and_check,
    testing::{MockLanguageModel, MockScraper, MockWebSearcher, RecordingObserver},
    Claim, FactCheckConfig, FactChecker, PipelineStage, PipelineState, PipelineStep, SearchDepth,
    SearchHit, VerdictStatus, VerificationPolicy,
};

const EARTH: &str = "The Earth is round.";
const MILLWALL: &str = "Millwall was founded by two men.";

fn earth_hits() -> Vec<SearchHit> {
    vec![
        SearchHit::new(
            "https://en.wikipedia.org/wiki/Spherical_Earth",
            "The Earth is an oblate spheroid, as confirmed by satellite imagery.",
        )
        .with_score(0.92),
        SearchHit::new(
            "https://www.nasa.gov/earth",
            "Photographs from orbit show Earth's round shape.",
        )
        .with_score(0.81),
    ]
}

fn checker(
    llm: MockLanguageModel,
    searcher: MockWebSearcher,
) -> FactChecker<MockLanguageModel, MockWebSearcher> {
    FactChecker::new(llm, searcher, FactCheckConfig::default())
}

#[tokio::test]
async fn test_supported_claim_with_confirming_evidence() {
    let llm = MockLanguageModel::new()
        .with_claims(&[(EARTH, 9)])
        .with_queries(EARTH, &["earth shape evidence"])
        .with_completeness(EARTH, true, 0.95, &[])
        .with_verdict(EARTH, "supported", 0.95, "Multiple sources confirm it.")
        .with_report("The claim is supported.");
    let searcher = MockWebSearcher::new().with_results("earth shape", earth_hits());

    let state = checker(llm, searcher).run(EARTH).await;

    assert!(!state.claims.is_empty());
    assert_eq!(state.verdicts[0].status, VerdictStatus::Supported);
    assert!(state.verdicts[0].confidence.value() > 0.8);
    assert_eq!(state.error, None);
    assert_eq!(state.stage, PipelineStage::Reported);
    assert_eq!(state.final_report, "The claim is supported.");
}

#[tokio::test]
async fn test_indirect_evidence_is_not_enough_info_under_strict_policy() {
    let llm = MockLanguageModel::new()
        .with_claims(&[(MILLWALL, 7)])
        .with_completeness(MILLWALL, false, 0.4, &["explicit number of founders"])
        .with_verdict(MILLWALL, "supported", 0.9, "Two names are listed.");
    let searcher = MockWebSearcher::new().with_default_results(vec![SearchHit::new(
        "https://en.wikipedia.org/wiki/Millwall_F.C.",
        "Founded by Arnold Hills and Dave Taylor.",
    )
    .with_score(0.88)]);

    let checker = checker(llm.clone(), searcher);
    let state = checker.run(MILLWALL).await;

    let verdict = &state.verdicts[0];
    assert_eq!(verdict.status, VerdictStatus::NotEnoughInfo);
    assert!(verdict.justification.contains("explicit number of founders"));
    assert_eq!(verdict.confidence.value(), 0.4);
    assert_eq!(llm.generation_count("VerdictOutput"), 0);
    assert_eq!(state.error, None);
}

#[tokio::test]
async fn test_zero_search_results_yield_not_enough_info() {
    let llm = MockLanguageModel::new().with_claims(&[(EARTH, 5)]);
    let checker = checker(llm.clone(), MockWebSearcher::new());

    let state = checker.run(EARTH).await;

    assert!(state.evidence_map[EARTH].is_empty());
    let verdict = &state.verdicts[0];
    assert_eq!(verdict.status, VerdictStatus::NotEnoughInfo);
    assert!(verdict.confidence.value() <= 0.3);
    assert_eq!(verdict.justification, "No evidence was found for this claim.");
    assert_eq!(state.error, None);
    assert_eq!(llm.generation_count("EvidenceCompletenessCheck"), 0);
    assert_eq!(llm.generation_count("VerdictOutput"), 0);
}

#[tokio::test]
async fn test_extraction_failure_falls_back_to_whole_input() {
    let input = "Paris is the capital of France and has 2 million residents.";
    let llm = MockLanguageModel::new().fail_schema("ClaimsList", "connection refused");

    let state = checker(llm, MockWebSearcher::new()).run(input).await;

    let error = state.error.as_deref().unwrap_or_default();
    assert!(error.contains("claim extraction"));
    assert!(error.contains("connection refused"));
    assert_eq!(state.claims, vec![Claim::new(input, 5)]);
    assert_eq!(state.stage, PipelineStage::Failed);
    // later stages still run
    assert_eq!(state.verdicts.len(), 1);
    assert!(!state.final_report.is_empty());
}

#[tokio::test]
async fn test_blank_input_skips_extraction_call() {
    let llm = MockLanguageModel::new();
    let checker = checker(llm.clone(), MockWebSearcher::new());

    let state = checker.run("   ").await;

    assert_eq!(llm.generation_count("ClaimsList"), 0);
    assert_eq!(llm.generation_count("SearchQueries"), 0);
    assert_eq!(state.claims.len(), 1);
    assert_eq!(state.claims[0].priority, 5);
    assert_eq!(state.verdicts[0].status, VerdictStatus::NotEnoughInfo);
    assert_eq!(state.error, None);
}

#[tokio::test]
async fn test_subjective_input_without_claims_uses_input() {
    let input = "I think pineapple on pizza is delicious.";
    let llm = MockLanguageModel::new().with_claims(&[]);

    let state = checker(llm, MockWebSearcher::new()).run(input).await;

    assert_eq!(state.claims, vec![Claim::new(input, 5)]);
    assert_eq!(state.error, None);
}

#[tokio::test]
async fn test_claims_sorted_by_priority() {
    let llm = MockLanguageModel::new().with_claims(&[
        ("Minor claim.", 2),
        ("Major claim.", 9),
        ("Middle claim.", 5),
    ]);

    let state = checker(llm, MockWebSearcher::new())
        .run("Minor claim. Major claim. Middle claim.")
        .await;

    let texts: Vec<&str> = state.claims.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, vec!["Major claim.", "Middle claim.", "Minor claim."]);
    let verdict_claims: Vec<&str> = state.verdicts.iter().map(|v| v.claim.as_str()).collect();
    assert_eq!(verdict_claims, texts);
    let evidence_keys: Vec<&str> = state.evidence_map.keys().map(String::as_str).collect();
    assert_eq!(evidence_keys, texts);
}

#[tokio::test]
async fn test_low_confidence_verdict_is_downgraded() {
    let llm = MockLanguageModel::new()
        .with_claims(&[(EARTH, 9)])
        .with_verdict(EARTH, "refuted", 0.55, "Weak contrary hints.");
    let searcher = MockWebSearcher::new().with_default_results(earth_hits());

    let state = checker(llm, searcher).run(EARTH).await;

    let verdict = &state.verdicts[0];
    assert_eq!(verdict.status, VerdictStatus::NotEnoughInfo);
    assert_eq!(verdict.confidence.value(), 0.55);
    assert!(verdict.justification.starts_with("Low confidence"));
    assert!(verdict.justification.contains("Original: refuted"));
    assert!(verdict.justification.contains("Weak contrary hints."));
}

#[tokio::test]
async fn test_lenient_policy_skips_completeness_and_threshold() {
    let llm = MockLanguageModel::new()
        .with_claims(&[(EARTH, 9)])
        .with_completeness(EARTH, false, 0.1, &["everything"])
        .with_verdict(EARTH, "supported", 0.55, "Probably.");
    let searcher = MockWebSearcher::new().with_default_results(earth_hits());
    let config = FactCheckConfig::default().with_verification(VerificationPolicy::lenient());

    let checker = FactChecker::new(llm.clone(), searcher, config);
    let state = checker.run(EARTH).await;

    assert_eq!(state.verdicts[0].status, VerdictStatus::Supported);
    assert_eq!(llm.generation_count("EvidenceCompletenessCheck"), 0);
}

#[tokio::test]
async fn test_failed_completeness_check_proceeds_to_verdict() {
    let llm = MockLanguageModel::new()
        .with_claims(&[(EARTH, 9)])
        .fail_schema("EvidenceCompletenessCheck", "timeout")
        .with_verdict(EARTH, "supported", 0.9, "Confirmed.");
    let searcher = MockWebSearcher::new().with_default_results(earth_hits());

    let state = checker(llm, searcher).run(EARTH).await;

    assert_eq!(state.verdicts[0].status, VerdictStatus::Supported);
    assert_eq!(state.error, None);
}

#[tokio::test]
async fn test_invalid_label_becomes_fallback_verdict() {
    let llm = MockLanguageModel::new()
        .with_claims(&[(EARTH, 9)])
        .with_verdict(EARTH, "probably true", 0.9, "Sure.");
    let searcher = MockWebSearcher::new().with_default_results(earth_hits());

    let state = checker(llm, searcher).run(EARTH).await;

    let verdict = &state.verdicts[0];
    assert_eq!(verdict.status, VerdictStatus::NotEnoughInfo);
    assert_eq!(verdict.confidence.value(), 0.0);
    assert!(!verdict.evidence_used.is_empty());
    let error = state.error.as_deref().unwrap_or_default();
    assert!(error.contains("verification"));
    assert!(error.contains("unknown verdict label"));
}

#[tokio::test]
async fn test_out_of_range_confidence_becomes_fallback_verdict() {
    let llm = MockLanguageModel::new()
        .with_claims(&[(EARTH, 9)])
        .with_verdict(EARTH, "supported", 1.5, "Very sure.");
    let searcher = MockWebSearcher::new().with_default_results(earth_hits());

    let state = checker(llm, searcher).run(EARTH).await;

    assert_eq!(state.verdicts[0].status, VerdictStatus::NotEnoughInfo);
    assert_eq!(state.verdicts[0].confidence.value(), 0.0);
    assert!(state.error.is_some());
}

#[tokio::test]
async fn test_failed_search_does_not_abort_claim() {
    let llm = MockLanguageModel::new()
        .with_claims(&[(EARTH, 9)])
        .with_queries(EARTH, &["broken query", "earth shape"])
        .with_verdict(EARTH, "supported", 0.9, "Confirmed.");
    let searcher = MockWebSearcher::new()
        .fail_query("broken")
        .with_results("earth shape", earth_hits());

    let checker = checker(llm, searcher.clone());
    let state = checker.run(EARTH).await;

    assert_eq!(searcher.calls().len(), 2);
    assert_eq!(state.evidence_map[EARTH].len(), 2);
    assert_eq!(state.verdicts[0].status, VerdictStatus::Supported);
    assert!(state
        .error
        .as_deref()
        .unwrap_or_default()
        .contains("evidence retrieval"));
}

#[tokio::test]
async fn test_query_generation_failure_searches_claim_text() {
    let llm = MockLanguageModel::new()
        .with_claims(&[(EARTH, 9)])
        .fail_schema("SearchQueries", "rate limited");
    let searcher = MockWebSearcher::new();

    let checker = checker(llm, searcher.clone());
    let state = checker.run(EARTH).await;

    let calls = searcher.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].query, EARTH);
    assert!(state.error.as_deref().unwrap_or_default().contains("rate limited"));
}

#[tokio::test]
async fn test_search_requests_follow_config() {
    let llm = MockLanguageModel::new()
        .with_claims(&[(EARTH, 9)])
        .with_queries(EARTH, &["one", "two", "three"]);
    let searcher = MockWebSearcher::new();
    let config = FactCheckConfig::fast().wikipedia_only();

    let checker = FactChecker::new(llm, searcher.clone(), config);
    checker.run(EARTH).await;

    let calls = searcher.calls();
    assert_eq!(calls.len(), 1, "fast preset allows one query per claim");
    assert_eq!(calls[0].query, "one");
    assert_eq!(calls[0].max_results, 2);
    assert_eq!(calls[0].depth, SearchDepth::Basic);
    assert_eq!(calls[0].include_domains, vec!["wikipedia.org".to_string()]);
}

#[tokio::test]
async fn test_evidence_is_truncated_ranked_and_capped() {
    let hits: Vec<SearchHit> = (0..8)
        .map(|i| {
            SearchHit::new(format!("https://site{}.example", i), "é".repeat(900))
                .with_score(i as f32 / 10.0)
        })
        .collect();
    let llm = MockLanguageModel::new()
        .with_claims(&[(EARTH, 9)])
        .with_queries(EARTH, &["a", "b"]);
    let searcher = MockWebSearcher::new().with_default_results(hits);
    let config = FactCheckConfig {
        max_search_results_per_query: 10,
        ..FactCheckConfig::default()
    };

    let state = FactChecker::new(llm, searcher, config).run(EARTH).await;

    let evidence = &state.evidence_map[EARTH];
    assert_eq!(evidence.len(), 5);
    assert_eq!(evidence[0].source, "https://site7.example");
    for pair in evidence.windows(2) {
        assert!(pair[0].relevance_score >= pair[1].relevance_score);
    }
    for ev in evidence {
        assert_eq!(ev.snippet.chars().count(), 500);
    }
    assert_eq!(state.verdicts[0].evidence_used.len(), 3);
}

#[tokio::test]
async fn test_same_source_kept_across_claims() {
    let llm = MockLanguageModel::new().with_claims(&[("Claim one.", 5), ("Claim two.", 5)]);
    let searcher = MockWebSearcher::new().with_default_results(earth_hits());

    let state = checker(llm, searcher).run("Claim one. Claim two.").await;

    assert_eq!(state.evidence_map["Claim one."].len(), 2);
    assert_eq!(state.evidence_map["Claim two."].len(), 2);
}

#[tokio::test]
async fn test_report_failure_renders_plain_report() {
    let llm = MockLanguageModel::new()
        .with_claims(&[(EARTH, 9)])
        .fail_report("service unavailable");

    let state = checker(llm, MockWebSearcher::new()).run(EARTH).await;

    assert!(state.final_report.starts_with("FACT-CHECK REPORT"));
    assert!(state.final_report.contains(EARTH));
    assert!(state
        .error
        .as_deref()
        .unwrap_or_default()
        .contains("report generation"));
}

#[tokio::test]
async fn test_blank_report_renders_plain_report() {
    let llm = MockLanguageModel::new()
        .with_claims(&[(EARTH, 9)])
        .with_report("  \n ");

    let state = checker(llm, MockWebSearcher::new()).run(EARTH).await;

    assert!(state.final_report.starts_with("FACT-CHECK REPORT"));
    assert!(state.error.is_some());
}

#[tokio::test]
async fn test_observer_sees_each_step() {
    let observer = RecordingObserver::new();
    let llm = MockLanguageModel::new().with_claims(&[(EARTH, 9)]);
    let checker = checker(llm, MockWebSearcher::new())
        .with_observer(observer.clone())
        .with_metadata("source", "unit-test");

    checker.run(EARTH).await;

    let events = observer.events();
    let steps: Vec<PipelineStep> = events.iter().map(|e| e.step).collect();
    assert_eq!(
        steps,
        vec![
            PipelineStep::ExtractClaims,
            PipelineStep::RetrieveEvidence,
            PipelineStep::VerifyClaims,
            PipelineStep::GenerateReport,
        ]
    );
    assert!(events.iter().all(|e| e.run_id == events[0].run_id));
    assert!(events.iter().all(|e| !e.step_failed));
    assert_eq!(events[3].stage, PipelineStage::Reported);
    assert_eq!(events[0].metadata["source"], "unit-test");
}

#[tokio::test]
async fn test_runs_are_deterministic() {
    let llm = MockLanguageModel::new()
        .with_claims(&[(EARTH, 9)])
        .with_verdict(EARTH, "supported", 0.9, "Confirmed.");
    let searcher = MockWebSearcher::new().with_default_results(earth_hits());
    let checker = checker(llm, searcher);

    let first = checker.run(EARTH).await;
    let first_calls = checker.llm().calls().len();
    checker.llm().clear_calls();

    let second = checker.run(EARTH).await;
    assert_eq!(first, second);
    assert_eq!(checker.llm().calls().len(), first_calls);
}

#[tokio::test]
async fn test_state_round_trips_through_json() {
    let llm = MockLanguageModel::new()
        .with_claims(&[(EARTH, 9)])
        .with_verdict(EARTH, "supported", 0.9, "Confirmed.");
    let searcher = MockWebSearcher::new().with_default_results(earth_hits());
    let state = checker(llm, searcher).run(EARTH).await;

    let json = serde_json::to_string(&state).unwrap();
    let back: PipelineState = serde_json::from_str(&json).unwrap();
    assert_eq!(back, state);
    assert!(json.contains("\"status\":\"supported\""));
}

#[tokio::test]
async fn test_per_run_metadata_is_carried() {
    let checker = checker(MockLanguageModel::new(), MockWebSearcher::new())
        .with_metadata("team", "desk");
    let mut extra = BTreeMap::new();
    extra.insert("request_id".to_string(), "42".to_string());

    let state = checker.run_with_metadata(EARTH, extra).await;

    assert_eq!(state.metadata["team"], "desk");
    assert_eq!(state.metadata["request_id"], "42");
}

#[tokio::test]
async fn test_fetch_and_check_uses_page_content() {
    let url = "https://news.example/article";
    let scraper = MockScraper::new().with_page(url, EARTH);
    let llm = MockLanguageModel::new().with_claims(&[(EARTH, 9)]);
    let checker = checker(llm, MockWebSearcher::new());

    let state = fetch_and_check(url, &scraper, &checker).await;

    assert_eq!(state.input_text, EARTH);
    assert_eq!(state.metadata["source_url"], url);
    assert_eq!(state.stage, PipelineStage::Reported);
}

#[tokio::test]
async fn test_fetch_and_check_records_scrape_failure() {
    let scraper = MockScraper::new();
    let checker = checker(MockLanguageModel::new(), MockWebSearcher::new());

    let state = fetch_and_check("https://missing.example", &scraper, &checker).await;
    assert!(state.error.as_deref().unwrap_or_default().contains("source fetch"));
    assert!(state.claims.is_empty());

    let state = fetch_and_check("not a url", &scraper, &checker).await;
    assert!(state.error.as_deref().unwrap_or_default().contains("invalid URL"));
    assert_eq!(scraper.calls().len(), 1);
}
