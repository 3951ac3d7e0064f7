use std::collections::{BTreeMap, VecDeque};

use super::event::{RunPhase, TelemetryEvent};
use crate::pipeline::bundle::Stage;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TelemetrySnapshot {
    pub runs: RunStats,
    pub stages: BTreeMap<Stage, StageStats>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunStats {
    pub finished: u64,
    /// Runs that ended with all four artifacts and no failures.
    pub complete: u64,
    pub extraction_failed: u64,
    pub avg_elapsed_ms: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StageStats {
    pub started: u64,
    pub succeeded: u64,
    pub failed: u64,
    pub avg_latency_ms: f64,
}

impl TelemetrySnapshot {
    pub fn stage(&self, stage: Stage) -> StageStats {
        self.stages.get(&stage).cloned().unwrap_or_default()
    }
}

pub fn compute_snapshot(events: &VecDeque<TelemetryEvent>) -> TelemetrySnapshot {
    let mut snap = TelemetrySnapshot::default();
    let mut run_elapsed_total = 0u64;
    let mut stage_latency_total: BTreeMap<Stage, u64> = BTreeMap::new();

    for event in events {
        match event {
            TelemetryEvent::StageStarted { stage, .. } => {
                snap.stages.entry(*stage).or_default().started += 1;
            }
            TelemetryEvent::StageSucceeded { stage, elapsed_ms, .. } => {
                snap.stages.entry(*stage).or_default().succeeded += 1;
                *stage_latency_total.entry(*stage).or_default() += elapsed_ms;
            }
            TelemetryEvent::StageFailed { stage, elapsed_ms, .. } => {
                snap.stages.entry(*stage).or_default().failed += 1;
                *stage_latency_total.entry(*stage).or_default() += elapsed_ms;
            }
            TelemetryEvent::RunFinished { artifacts, failures, elapsed_ms, .. } => {
                snap.runs.finished += 1;
                if *artifacts == 4 && *failures == 0 {
                    snap.runs.complete += 1;
                }
                run_elapsed_total += elapsed_ms;
            }
            TelemetryEvent::RunTransition { to: RunPhase::ExtractionFailed, .. } => {
                snap.runs.extraction_failed += 1;
            }
            _ => {}
        }
    }

    if snap.runs.finished > 0 {
        snap.runs.avg_elapsed_ms = run_elapsed_total as f64 / snap.runs.finished as f64;
    }

    for (stage, stats) in snap.stages.iter_mut() {
        let resolved = stats.succeeded + stats.failed;
        if resolved > 0 {
            let total = stage_latency_total.get(stage).copied().unwrap_or_default();
            stats.avg_latency_ms = total as f64 / resolved as f64;
        }
    }

    snap
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::bundle::FailureKind;
    use uuid::Uuid;

    fn started(run_id: Uuid, stage: Stage) -> TelemetryEvent {
        TelemetryEvent::StageStarted { run_id, stage }
    }

    fn finished(
        run_id: Uuid,
        artifacts: usize,
        failures: usize,
        elapsed_ms: u64,
    ) -> TelemetryEvent {
        TelemetryEvent::RunFinished {
            run_id,
            artifacts,
            failures,
            elapsed_ms,
        }
    }

    #[test]
    fn test_stage_counts_and_latency() {
        let run_id = Uuid::new_v4();
        let events: VecDeque<_> = vec![
            started(run_id, Stage::Translation),
            TelemetryEvent::StageSucceeded {
                run_id,
                stage: Stage::Translation,
                elapsed_ms: 30,
            },
            started(run_id, Stage::Translation),
            TelemetryEvent::StageFailed {
                run_id,
                stage: Stage::Translation,
                kind: FailureKind::TranslationTransportError,
                elapsed_ms: 10,
            },
        ]
        .into();

        let snap = compute_snapshot(&events);
        let stats = snap.stage(Stage::Translation);
        assert_eq!(stats.started, 2);
        assert_eq!(stats.succeeded, 1);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.avg_latency_ms, 20.0);
        assert_eq!(snap.stage(Stage::Extraction), StageStats::default());
    }

    #[test]
    fn test_run_stats() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let events: VecDeque<_> = vec![
            finished(a, 4, 0, 100),
            TelemetryEvent::RunTransition {
                run_id: b,
                from: RunPhase::Extracting,
                to: RunPhase::ExtractionFailed,
            },
            finished(b, 0, 1, 50),
        ]
        .into();

        let snap = compute_snapshot(&events);
        assert_eq!(snap.runs.finished, 2);
        assert_eq!(snap.runs.complete, 1);
        assert_eq!(snap.runs.extraction_failed, 1);
        assert_eq!(snap.runs.avg_elapsed_ms, 75.0);
    }
}
