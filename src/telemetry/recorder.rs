use std::collections::VecDeque;

use super::event::TelemetryEvent;
use super::metrics::{compute_snapshot, TelemetrySnapshot};

const MAX_EVENTS: usize = 10_000;

/// Bounded in-memory event buffer. Oldest events are dropped first.
#[derive(Debug)]
pub struct TelemetryRecorder {
    buffer: VecDeque<TelemetryEvent>,
    capacity: usize,
}

impl Default for TelemetryRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl TelemetryRecorder {
    pub fn new() -> Self {
        Self::with_capacity(MAX_EVENTS)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: VecDeque::with_capacity(capacity.min(MAX_EVENTS)),
            capacity: capacity.max(1),
        }
    }

    pub fn record(&mut self, event: TelemetryEvent) {
        if self.buffer.len() >= self.capacity {
            self.buffer.pop_front();
        }
        self.buffer.push_back(event);
    }

    pub fn events(&self) -> impl Iterator<Item = &TelemetryEvent> {
        self.buffer.iter()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn snapshot(&self) -> TelemetrySnapshot {
        compute_snapshot(&self.buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::bundle::Stage;
    use uuid::Uuid;

    #[test]
    fn test_oldest_events_dropped() {
        let mut recorder = TelemetryRecorder::with_capacity(2);
        assert!(recorder.is_empty());
        let run_id = Uuid::new_v4();
        for stage in [Stage::Extraction, Stage::Translation, Stage::TargetSynthesis] {
            recorder.record(TelemetryEvent::StageStarted { run_id, stage });
        }
        assert_eq!(recorder.len(), 2);
        let first = recorder.events().next().unwrap();
        assert!(matches!(
            first,
            TelemetryEvent::StageStarted { stage: Stage::Translation, .. }
        ));
    }
}
