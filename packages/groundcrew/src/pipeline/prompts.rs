//! LLM prompts for the fact-checking pipeline.
//!
//! Each stage has a fixed system prompt plus a user template with `{...}`
//! placeholders filled by the matching `format_*` function.

use crate::types::{Evidence, PipelineState};

/// System prompt for claim extraction.
pub const EXTRACT_CLAIMS_SYSTEM: &str = r#"You are an expert claim extraction agent for fact-checking.
Your task is to identify specific factual claims that can be verified from the given text.

Focus on:
- Factual statements that can be true or false
- Statistical claims, dates, numbers
- Claims about events, people, or entities
- Statements that require evidence to verify

Avoid:
- Opinions or subjective statements
- Questions
- General statements without specific facts

Rewrite each claim as a standalone sentence (resolve pronouns) and assign a priority
from 1 to 10, higher meaning more important to check."#;

/// User template for claim extraction.
pub const EXTRACT_CLAIMS_PROMPT: &str = r#"Extract factual claims from this text:

{text}"#;

/// System prompt for search query generation.
pub const SEARCH_QUERIES_SYSTEM: &str = r#"You are an expert at formulating search queries for fact-checking.
Given a claim, create 1-3 effective web search queries that would help verify or refute it.
Prefer specific names, dates and figures from the claim over paraphrase."#;

/// User template for search query generation.
pub const SEARCH_QUERIES_PROMPT: &str = r#"Claim: {claim}

Generate search queries that will find relevant evidence."#;

/// System prompt for the evidence-completeness check.
pub const COMPLETENESS_SYSTEM: &str = r#"You are evaluating whether evidence is COMPLETE enough to verify a claim.

Determine if the evidence contains ALL necessary information to verify EVERY specific detail in the claim.

Analyze:
1. Does the evidence DIRECTLY address EACH specific element of the claim?
2. Is ANY information missing, implied, or unclear?
3. Could you make a definitive judgment based ONLY on this evidence?

Examples of INCOMPLETE evidence:
- Claim: "Founded by TWO men" | Evidence: "Founded by Arnold Hills and Dave Taylor" -> INCOMPLETE (doesn't say "two")
- Claim: "Worked on a SITCOM in 2007" | Evidence: "Worked on TV shows in 2007" -> INCOMPLETE (doesn't confirm "sitcom")
- Claim: "Person X is in Movie Y" | Evidence: lists other movies -> INCOMPLETE (doesn't mention Movie Y)

Be strict: if you can't verify EVERY word of the claim, mark it incomplete.
completeness_score runs from 0 (nothing relevant) to 1 (every element confirmed or contradicted)."#;

/// System prompt for the verdict call. `{instructions}` is the policy text.
pub const VERDICT_SYSTEM: &str = r#"You are an expert fact-checker responsible for verifying claims against evidence.

Classify the claim as one of:
- "supported": the evidence confirms the claim
- "refuted": the evidence contradicts the claim
- "mixed": credible evidence points both ways
- "not_enough_info": the evidence does not settle the claim

{instructions}

Give a confidence from 0 to 1 (lower for partial or indirect evidence) and a justification
explaining whether the evidence DIRECTLY addresses every part of the claim."#;

/// User template shared by the completeness and verdict calls.
pub const CLAIM_EVIDENCE_PROMPT: &str = r#"Claim: {claim}

Evidence:
{evidence}"#;

/// System prompt for report generation.
pub const REPORT_SYSTEM: &str = r#"You are an expert at communicating fact-check results clearly.
Create a comprehensive, well-structured report that presents the fact-check findings.

The report should:
- Be clear and accessible to general readers
- Present each claim with its verdict and evidence
- Explain the reasoning behind each verdict
- Provide an overall summary

Use clear formatting with sections and bullet points where appropriate."#;

/// User template for report generation.
pub const REPORT_PROMPT: &str = r#"Original Text: {text}

Fact-Check Results:{verdicts}

Generate a comprehensive fact-check report:"#;

/// Substitute `{name}` placeholders in one pass over the template.
///
/// Values are inserted verbatim and never rescanned. Unknown `{...}` runs are kept.
fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let value = after.find('}').and_then(|close| {
            values
                .iter()
                .find(|(name, _)| *name == &after[..close])
                .map(|(_, value)| (close, *value))
        });
        match value {
            Some((close, value)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Format the claim extraction prompt.
pub fn format_extract_claims_prompt(text: &str) -> String {
    fill(EXTRACT_CLAIMS_PROMPT, &[("text", text)])
}

/// Format the search query prompt.
pub fn format_search_queries_prompt(claim: &str) -> String {
    fill(SEARCH_QUERIES_PROMPT, &[("claim", claim)])
}

/// Format the verdict system prompt with the policy's instructions.
pub fn format_verdict_system(instructions: &str) -> String {
    fill(VERDICT_SYSTEM, &[("instructions", instructions.trim())])
}

/// Format the claim + evidence prompt used by both verification calls.
pub fn format_claim_evidence_prompt(claim: &str, evidence: &[Evidence]) -> String {
    fill(
        CLAIM_EVIDENCE_PROMPT,
        &[("claim", claim), ("evidence", &format_evidence(evidence))],
    )
}

/// Render evidence as `Source:`/`Snippet:` blocks separated by blank lines.
pub fn format_evidence(evidence: &[Evidence]) -> String {
    evidence
        .iter()
        .map(|ev| format!("Source: {}\nSnippet: {}", ev.source, ev.snippet))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Format the report prompt from the verdicts on `state`.
pub fn format_report_prompt(state: &PipelineState) -> String {
    fill(
        REPORT_PROMPT,
        &[("text", &state.input_text), ("verdicts", &format_verdicts(state))],
    )
}

/// Verdict summary: status upper-cased, confidence as a percentage, top two sources.
pub fn format_verdicts(state: &PipelineState) -> String {
    let mut out = String::new();
    for (i, verdict) in state.verdicts.iter().enumerate() {
        out.push_str(&format!("\n\nClaim {}: {}\n", i + 1, verdict.claim));
        out.push_str(&format!(
            "Status: {}\n",
            verdict.status.as_str().to_uppercase()
        ));
        out.push_str(&format!("Confidence: {}\n", verdict.confidence));
        out.push_str(&format!("Justification: {}\n", verdict.justification));
        if !verdict.evidence_used.is_empty() {
            out.push_str("Key Evidence:\n");
            for ev in verdict.evidence_used.iter().take(2) {
                out.push_str(&format!("  - {}\n", ev.source));
            }
        }
    }
    out
}
