use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::pipeline::bundle::{FailureKind, Stage};

// Allowed: IDs, Stages, Durations, Counts, Enums
// Forbidden: Text, Image bytes, Audio

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunPhase {
    Idle,
    Extracting,
    ExtractionFailed,
    Extracted,
    Done,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TelemetryEvent {
    RunTransition {
        run_id: Uuid,
        from: RunPhase,
        to: RunPhase,
    },

    StageStarted {
        run_id: Uuid,
        stage: Stage,
    },

    StageSucceeded {
        run_id: Uuid,
        stage: Stage,
        elapsed_ms: u64,
    },

    StageFailed {
        run_id: Uuid,
        stage: Stage,
        kind: FailureKind,
        elapsed_ms: u64,
    },

    RunFinished {
        run_id: Uuid,
        artifacts: usize,
        failures: usize,
        elapsed_ms: u64,
    },
}
