//! Pipeline telemetry.
//!
//! # PRIVACY INVARIANT
//! Telemetry events must **NEVER** contain user content (image bytes, text, audio).
//! Only run ids, stages, failure kinds, durations and counts are allowed.
//!
//! Telemetry is a read-only side channel: the orchestrator never consults it
//! when deciding what to do next.

pub mod event;
pub mod metrics;
pub mod recorder;

pub use event::{RunPhase, TelemetryEvent};
pub use metrics::{compute_snapshot, RunStats, StageStats, TelemetrySnapshot};
pub use recorder::TelemetryRecorder;
