//! Stage-level telemetry hook.
//!
//! Observers see one [`StageEvent`] per completed step. They cannot change
//! the run; a slow observer only slows the caller down.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::types::{PipelineStage, PipelineStep};

/// Emitted after each pipeline step finishes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageEvent {
    pub run_id: Uuid,
    pub step: PipelineStep,

    /// Stage the state is in after the step (may be `Failed`).
    pub stage: PipelineStage,

    pub claims: usize,
    pub evidence: usize,
    pub verdicts: usize,
    pub elapsed_ms: u64,

    /// Whether this step recorded an error.
    pub step_failed: bool,

    pub metadata: BTreeMap<String, String>,
}

pub trait PipelineObserver: Send + Sync {
    fn on_event(&self, event: &StageEvent);
}

/// Logs each event at info level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl PipelineObserver for TracingObserver {
    fn on_event(&self, event: &StageEvent) {
        info!(
            run_id = %event.run_id,
            step = %event.step,
            stage = ?event.stage,
            claims = event.claims,
            evidence = event.evidence,
            verdicts = event.verdicts,
            elapsed_ms = event.elapsed_ms,
            step_failed = event.step_failed,
            "Pipeline step complete"
        );
    }
}
