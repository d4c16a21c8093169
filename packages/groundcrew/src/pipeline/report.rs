//! Report generation.

use tracing::{info, warn};

use super::prompts::{format_report_prompt, REPORT_SYSTEM};
use crate::traits::llm::LanguageModel;
use crate::types::{truncate_chars, PipelineState, PipelineStep, VerdictStatus};

/// Ask the model for a narrative report. Falls back to
/// [`render_plain_report`] so `final_report` is never empty.
pub async fn generate_report<L>(llm: &L, mut state: PipelineState) -> PipelineState
where
    L: LanguageModel + ?Sized,
{
    let prompt = format_report_prompt(&state);

    state.final_report = match llm.complete(REPORT_SYSTEM, &prompt).await {
        Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
        Ok(_) => {
            warn!("Model returned an empty report, rendering locally");
            state.record_error(PipelineStep::GenerateReport, "model returned an empty report");
            render_plain_report(&state)
        }
        Err(e) => {
            warn!(error = %e, "Report generation failed, rendering locally");
            state.record_error(PipelineStep::GenerateReport, &e);
            render_plain_report(&state)
        }
    };

    info!(chars = state.final_report.len(), "Generated report");
    state.advance(PipelineStep::GenerateReport.completes());
    state
}

/// Plain-text report built from the verdicts alone.
pub fn render_plain_report(state: &PipelineState) -> String {
    let mut out = String::from("FACT-CHECK REPORT\n=================\n\n");

    let input = truncate_chars(state.input_text.trim(), 200);
    let ellipsis = if input.len() < state.input_text.trim().len() {
        "..."
    } else {
        ""
    };
    out.push_str(&format!("Input: {}{}\n\n", input, ellipsis));

    out.push_str(&format!(
        "Summary: {} claim(s) checked: {} supported, {} refuted, {} mixed, {} not enough info.\n",
        state.verdicts.len(),
        state.count_status(VerdictStatus::Supported),
        state.count_status(VerdictStatus::Refuted),
        state.count_status(VerdictStatus::Mixed),
        state.count_status(VerdictStatus::NotEnoughInfo),
    ));

    for (i, verdict) in state.verdicts.iter().enumerate() {
        out.push_str(&format!("\n{}. {}\n", i + 1, verdict.claim));
        out.push_str(&format!(
            "   Verdict: {} ({} confidence)\n",
            verdict.status.as_str().to_uppercase(),
            verdict.confidence
        ));
        out.push_str(&format!("   {}\n", verdict.justification));
        if !verdict.evidence_used.is_empty() {
            out.push_str("   Sources:\n");
            for ev in verdict.evidence_used.iter().take(2) {
                out.push_str(&format!("   - {}\n", ev.source));
            }
        }
    }

    out
}
