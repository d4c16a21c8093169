//! Verification: classify each claim against its evidence.
//!
//! Under the strict policy this is two calls per claim. The first asks whether
//! the evidence covers every detail of the claim; only complete evidence goes
//! on to the verdict call. Decisive verdicts under the confidence threshold
//! are downgraded to `not_enough_info`.

use schemars::JsonSchema;
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::prompts::{format_claim_evidence_prompt, format_verdict_system, COMPLETENESS_SYSTEM};
use crate::error::{Result, ValidationError};
use crate::traits::llm::{LanguageModel, StructuredGeneration, Validate};
use crate::types::{
    Confidence, Evidence, FactCheckConfig, PipelineState, PipelineStep, Verdict, VerdictStatus,
};

/// Justification used when a claim has no evidence at all.
pub const NO_EVIDENCE_JUSTIFICATION: &str = "No evidence was found for this claim.";

/// First-stage output: does the evidence cover every element of the claim?
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct EvidenceCompletenessCheck {
    pub is_complete: bool,

    /// 0 (nothing relevant) to 1 (every element addressed).
    pub completeness_score: f32,

    /// Parts of the claim the evidence does not address.
    pub missing_elements: Vec<String>,
}

impl Validate for EvidenceCompletenessCheck {
    fn validate(&self) -> std::result::Result<(), ValidationError> {
        if (0.0..=1.0).contains(&self.completeness_score) {
            Ok(())
        } else {
            Err(ValidationError::ScoreOutOfRange {
                field: "completeness_score",
                value: self.completeness_score,
            })
        }
    }
}

/// Second-stage output: the verdict itself.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct VerdictOutput {
    /// One of supported, refuted, mixed, not_enough_info.
    #[schemars(with = "VerdictStatus")]
    pub status: String,

    /// 0 to 1, lower for partial or indirect evidence.
    pub confidence: f32,

    pub justification: String,
}

impl VerdictOutput {
    pub fn status(&self) -> std::result::Result<VerdictStatus, ValidationError> {
        self.status.parse()
    }

    pub fn confidence(&self) -> std::result::Result<Confidence, ValidationError> {
        Confidence::new(self.confidence)
    }
}

impl Validate for VerdictOutput {
    fn validate(&self) -> std::result::Result<(), ValidationError> {
        self.status()?;
        self.confidence()?;
        Ok(())
    }
}

/// Verify one claim. Errors are returned; [`verify_claims`] turns them into
/// fallback verdicts.
pub async fn verify_claim<L>(
    llm: &L,
    claim: &str,
    evidence: &[Evidence],
    config: &FactCheckConfig,
) -> Result<Verdict>
where
    L: LanguageModel + ?Sized,
{
    let used: Vec<Evidence> = evidence
        .iter()
        .take(config.evidence_for_verdict)
        .cloned()
        .collect();

    if used.is_empty() {
        return Ok(Verdict::not_enough_info(
            claim,
            Confidence::ZERO,
            NO_EVIDENCE_JUSTIFICATION,
            used,
        ));
    }

    let policy = &config.verification;
    let user = format_claim_evidence_prompt(claim, &used);

    if policy.two_stage {
        match llm
            .generate::<EvidenceCompletenessCheck>(COMPLETENESS_SYSTEM, &user)
            .await
        {
            Ok(check)
                if !check.is_complete
                    || check.completeness_score < policy.completeness_threshold =>
            {
                debug!(
                    claim = %claim,
                    score = check.completeness_score,
                    "Evidence incomplete"
                );
                let missing = if check.missing_elements.is_empty() {
                    "unspecified".to_string()
                } else {
                    check.missing_elements.join(", ")
                };
                return Ok(Verdict::not_enough_info(
                    claim,
                    Confidence::new(check.completeness_score)?,
                    format!("Evidence is incomplete. Missing: {}", missing),
                    used,
                ));
            }
            Ok(_) => {}
            Err(e) => {
                warn!(claim = %claim, error = %e, "Completeness check failed, continuing to verdict");
            }
        }
    }

    let system = format_verdict_system(&policy.strictness_instructions);
    let output = llm.generate::<VerdictOutput>(&system, &user).await?;
    let status = output.status()?;
    let confidence = output.confidence()?;

    if let Some(threshold) = policy.confidence_threshold {
        if status != VerdictStatus::NotEnoughInfo && confidence.value() < threshold {
            debug!(claim = %claim, %status, confidence = confidence.value(), "Low confidence, downgrading");
            return Ok(Verdict::not_enough_info(
                claim,
                confidence,
                format!(
                    "Low confidence ({:.2} < {:.2}). Original: {}. {}",
                    confidence.value(),
                    threshold,
                    status,
                    output.justification
                ),
                used,
            ));
        }
    }

    Ok(Verdict {
        claim: claim.to_string(),
        status,
        confidence,
        justification: output.justification,
        evidence_used: used,
    })
}

/// Run the verifier over every claim, in order.
pub async fn verify_claims<L>(
    llm: &L,
    config: &FactCheckConfig,
    mut state: PipelineState,
) -> PipelineState
where
    L: LanguageModel + ?Sized,
{
    let claims: Vec<String> = state.claims.iter().map(|c| c.text.clone()).collect();

    for claim in claims {
        let evidence = state.evidence_map.get(&claim).cloned().unwrap_or_default();

        let verdict = match verify_claim(llm, &claim, &evidence, config).await {
            Ok(verdict) => verdict,
            Err(e) => {
                warn!(claim = %claim, error = %e, "Verification failed, recording fallback verdict");
                state.record_error(
                    PipelineStep::VerifyClaims,
                    format!("claim {:?}: {}", claim, e),
                );
                Verdict::not_enough_info(
                    claim.as_str(),
                    Confidence::ZERO,
                    format!("Error processing verdict: {}", e),
                    evidence
                        .into_iter()
                        .take(config.evidence_for_verdict)
                        .collect(),
                )
            }
        };

        debug!(claim = %claim, status = %verdict.status, "Verdict");
        state.verdicts.push(verdict);
    }

    info!(
        verdicts = state.verdicts.len(),
        supported = state.count_status(VerdictStatus::Supported),
        refuted = state.count_status(VerdictStatus::Refuted),
        not_enough_info = state.count_status(VerdictStatus::NotEnoughInfo),
        "Verified claims"
    );
    state.advance(PipelineStep::VerifyClaims.completes());
    state
}
