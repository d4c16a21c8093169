//! Configuration for a fact-checking run.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ConfigError, Result};

/// Domain used by Wikipedia-only mode.
pub const WIKIPEDIA_DOMAIN: &str = "wikipedia.org";

/// Search provider depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchDepth {
    Basic,
    #[default]
    Advanced,
}

impl SearchDepth {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchDepth::Basic => "basic",
            SearchDepth::Advanced => "advanced",
        }
    }
}

impl fmt::Display for SearchDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchDepth {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "basic" => Ok(SearchDepth::Basic),
            "advanced" => Ok(SearchDepth::Advanced),
            _ => Err(ConfigError::InvalidSearchDepth(s.to_string())),
        }
    }
}

/// Instructions given to the verdict call under the strict policy.
pub const STRICT_INSTRUCTIONS: &str = r#"Before answering "supported" or "refuted" you MUST confirm:
1. The evidence DIRECTLY addresses the SPECIFIC details in the claim
2. The evidence is COMPLETE enough to verify ALL parts of the claim
3. You are NOT making assumptions or inferences beyond what the evidence explicitly states

Default to "not_enough_info" when:
- Evidence is related but doesn't address the specific claim details
- Evidence provides general context but not the specific facts claimed
- Any part of the claim is not directly confirmed or refuted by the evidence
- Evidence is tangential or only partially relevant
- You cannot find direct confirmation (absence of evidence is not refutation)

Common pitfalls:
- Claim: "Founded by two men" | Evidence: "Founded by Arnold Hills and Dave Taylor"
  -> not_enough_info (doesn't explicitly confirm "two")
- Claim: "Worked on a sitcom in 2007" | Evidence: "Worked on TV shows in 2007"
  -> not_enough_info (doesn't confirm "sitcom")
- Claim: "Person X is in Movie Y" | Evidence: lists other movies
  -> not_enough_info (absence isn't refutation)

Be conservative: when in doubt, choose "not_enough_info" over making assumptions."#;

/// Instructions given to the verdict call under the lenient policy.
pub const LENIENT_INSTRUCTIONS: &str = r#"Judge the claim on the weight of the evidence.
Use "supported" or "refuted" when the evidence clearly points one way, "mixed" when credible
sources disagree, and "not_enough_info" only when the evidence does not bear on the claim."#;

/// How conservative the verifier is about `not_enough_info`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerificationPolicy {
    /// Run an evidence-completeness check before asking for a verdict.
    pub two_stage: bool,

    /// Completeness score below which the claim is `not_enough_info`.
    pub completeness_threshold: f32,

    /// Decisive verdicts below this confidence are routed to `not_enough_info`.
    pub confidence_threshold: Option<f32>,

    /// Prompt text appended to the verdict instructions.
    pub strictness_instructions: String,
}

impl VerificationPolicy {
    /// Two-stage check with both thresholds at 0.7.
    pub fn strict() -> Self {
        Self {
            two_stage: true,
            completeness_threshold: 0.7,
            confidence_threshold: Some(0.7),
            strictness_instructions: STRICT_INSTRUCTIONS.to_string(),
        }
    }

    /// Single verdict call, model confidence taken at face value.
    pub fn lenient() -> Self {
        Self {
            two_stage: false,
            completeness_threshold: 0.0,
            confidence_threshold: None,
            strictness_instructions: LENIENT_INSTRUCTIONS.to_string(),
        }
    }

    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        check_unit("completeness_threshold", self.completeness_threshold)?;
        if let Some(threshold) = self.confidence_threshold {
            check_unit("confidence_threshold", threshold)?;
        }
        Ok(())
    }
}

impl Default for VerificationPolicy {
    fn default() -> Self {
        Self::strict()
    }
}

/// Settings for one fact-checking run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactCheckConfig {
    /// Chat model name.
    pub model_name: String,

    /// Sampling temperature, 0.0 to 2.0.
    pub temperature: f32,

    /// Search results per query, 1 to 10.
    pub max_search_results_per_query: usize,

    /// Queries per claim, 1 to 5.
    pub max_queries_per_claim: usize,

    pub search_depth: SearchDepth,

    /// Evidence kept per claim, 1 to 20.
    pub max_evidence_per_claim: usize,

    /// Snippet length in characters, 100 to 2000.
    pub snippet_max_length: usize,

    /// Evidence passed to the verdict call and recorded on the verdict, 1 to 10.
    pub evidence_for_verdict: usize,

    /// Restrict search to one domain (e.g. `wikipedia.org`).
    pub evidence_domain: Option<String>,

    pub verification: VerificationPolicy,

    /// Raise log verbosity to debug.
    pub verbose: bool,
}

impl Default for FactCheckConfig {
    fn default() -> Self {
        Self::balanced()
    }
}

impl FactCheckConfig {
    /// Default preset: gpt-4o-mini, advanced search, 3 results x 2 queries, 5 evidence.
    pub fn balanced() -> Self {
        Self {
            model_name: "gpt-4o-mini".to_string(),
            temperature: 0.0,
            max_search_results_per_query: 3,
            max_queries_per_claim: 2,
            search_depth: SearchDepth::Advanced,
            max_evidence_per_claim: 5,
            snippet_max_length: 500,
            evidence_for_verdict: 3,
            evidence_domain: None,
            verification: VerificationPolicy::strict(),
            verbose: false,
        }
    }

    /// Slower and more thorough.
    pub fn high_quality() -> Self {
        Self {
            model_name: "gpt-4".to_string(),
            max_search_results_per_query: 5,
            max_queries_per_claim: 3,
            max_evidence_per_claim: 10,
            ..Self::balanced()
        }
    }

    /// Fewer calls, basic search.
    pub fn fast() -> Self {
        Self {
            max_search_results_per_query: 2,
            max_queries_per_claim: 1,
            max_evidence_per_claim: 3,
            search_depth: SearchDepth::Basic,
            ..Self::balanced()
        }
    }

    /// Look up a preset by name: `balanced`, `quality` (or `high_quality`), `fast`.
    pub fn preset(name: &str) -> std::result::Result<Self, ConfigError> {
        match name.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "balanced" | "default" => Ok(Self::balanced()),
            "quality" | "high_quality" => Ok(Self::high_quality()),
            "fast" => Ok(Self::fast()),
            _ => Err(ConfigError::UnknownPreset(name.to_string())),
        }
    }

    /// Load from a JSON file. Missing fields take the balanced defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Overlay the fields present in a JSON file onto this config. Nested
    /// objects merge key by key; the result is not validated.
    pub fn merge_json_file(self, path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        self.merge_json(&raw)
    }

    pub fn merge_json(self, raw: &str) -> Result<Self> {
        let overlay: Value = serde_json::from_str(raw)?;
        let mut base = serde_json::to_value(&self)?;
        merge_values(&mut base, overlay);
        Ok(serde_json::from_value(base)?)
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model_name = model.into();
        self
    }

    pub fn with_evidence_domain(mut self, domain: impl Into<String>) -> Self {
        self.evidence_domain = Some(domain.into());
        self
    }

    /// Restrict evidence to `wikipedia.org`.
    pub fn wikipedia_only(self) -> Self {
        self.with_evidence_domain(WIKIPEDIA_DOMAIN)
    }

    pub fn with_verification(mut self, policy: VerificationPolicy) -> Self {
        self.verification = policy;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Reject out-of-range values.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.model_name.trim().is_empty() {
            return Err(ConfigError::Empty("model_name"));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::out_of_range(
                "temperature",
                self.temperature,
                0.0,
                2.0,
            ));
        }
        check_range(
            "max_search_results_per_query",
            self.max_search_results_per_query,
            1,
            10,
        )?;
        check_range("max_queries_per_claim", self.max_queries_per_claim, 1, 5)?;
        check_range("max_evidence_per_claim", self.max_evidence_per_claim, 1, 20)?;
        check_range("snippet_max_length", self.snippet_max_length, 100, 2000)?;
        check_range("evidence_for_verdict", self.evidence_for_verdict, 1, 10)?;
        if let Some(domain) = &self.evidence_domain {
            if domain.trim().is_empty() {
                return Err(ConfigError::Empty("evidence_domain"));
            }
        }
        self.verification.validate()
    }
}

fn check_range(
    field: &'static str,
    value: usize,
    min: usize,
    max: usize,
) -> std::result::Result<(), ConfigError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::out_of_range(field, value, min, max))
    }
}

fn check_unit(field: &'static str, value: f32) -> std::result::Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::out_of_range(field, value, 0.0, 1.0))
    }
}

fn merge_values(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                merge_values(base.entry(key).or_insert(Value::Null), value);
            }
        }
        (base, overlay) => *base = overlay,
    }
}
