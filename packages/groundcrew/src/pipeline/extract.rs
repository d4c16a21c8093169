//! Claim extraction: input text to a prioritized list of claims.

use schemars::JsonSchema;
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::prompts::{format_extract_claims_prompt, EXTRACT_CLAIMS_SYSTEM};
use crate::traits::llm::{LanguageModel, StructuredGeneration, Validate};
use crate::types::{Claim, PipelineState, PipelineStep};

/// Structured output of the extraction call.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ClaimsList {
    /// Factual claims found in the text.
    pub claims: Vec<ClaimCandidate>,
}

/// A claim as returned by the model, before clamping.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ClaimCandidate {
    /// The claim as a standalone sentence.
    pub text: String,

    /// Priority from 1 to 10, higher is more important.
    pub priority: i64,
}

// Priorities are clamped rather than rejected.
impl Validate for ClaimsList {}

/// Drop blank claims, clamp priorities, sort by priority descending (stable).
pub fn normalize_claims(list: ClaimsList) -> Vec<Claim> {
    let mut claims: Vec<Claim> = list
        .claims
        .into_iter()
        .filter_map(|c| {
            let text = c.text.trim();
            (!text.is_empty()).then(|| Claim::new(text, c.priority))
        })
        .collect();

    claims.sort_by(|a, b| b.priority.cmp(&a.priority));
    claims
}

/// Run the claim extractor.
///
/// Never leaves `claims` empty: a blank input, an empty model answer or a
/// failed call all fall back to the whole input as one claim.
pub async fn extract_claims<L>(llm: &L, mut state: PipelineState) -> PipelineState
where
    L: LanguageModel + ?Sized,
{
    if state.input_text.trim().is_empty() {
        debug!("Blank input, skipping extraction call");
        state.claims = vec![Claim::with_default_priority(state.input_text.clone())];
        state.advance(PipelineStep::ExtractClaims.completes());
        return state;
    }

    let prompt = format_extract_claims_prompt(&state.input_text);
    state.claims = match llm.generate::<ClaimsList>(EXTRACT_CLAIMS_SYSTEM, &prompt).await {
        Ok(list) => {
            let claims = normalize_claims(list);
            if claims.is_empty() {
                info!("No checkable claims found, using the whole input");
                vec![Claim::with_default_priority(state.input_text.clone())]
            } else {
                claims
            }
        }
        Err(e) => {
            warn!(error = %e, "Claim extraction failed, using the whole input");
            state.record_error(PipelineStep::ExtractClaims, &e);
            vec![Claim::with_default_priority(state.input_text.clone())]
        }
    };

    info!(claims = state.claims.len(), "Extracted claims");
    state.advance(PipelineStep::ExtractClaims.completes());
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn candidate(text: &str, priority: i64) -> ClaimCandidate {
        ClaimCandidate {
            text: text.to_string(),
            priority,
        }
    }

    #[test]
    fn test_normalize_sorts_stably_and_drops_blanks() {
        let claims = normalize_claims(ClaimsList {
            claims: vec![
                candidate("low", 2),
                candidate("first high", 9),
                candidate("   ", 10),
                candidate("second high", 9),
                candidate("clamped", 42),
            ],
        });

        let texts: Vec<&str> = claims.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["clamped", "first high", "second high", "low"]);
        assert_eq!(claims[0].priority, 10);
    }

    proptest! {
        #[test]
        fn prop_normalized_priorities_in_range_and_sorted(
            raw in proptest::collection::vec(("[a-z]{1,8}", -50i64..50), 0..20)
        ) {
            let list = ClaimsList {
                claims: raw.iter().map(|(t, p)| candidate(t, *p)).collect(),
            };
            let claims = normalize_claims(list);
            prop_assert_eq!(claims.len(), raw.len());
            for claim in &claims {
                prop_assert!((1..=10).contains(&claim.priority));
            }
            for pair in claims.windows(2) {
                prop_assert!(pair[0].priority >= pair[1].priority);
            }
        }
    }
}
