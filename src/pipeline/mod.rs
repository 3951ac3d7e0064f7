pub mod bundle;
pub mod orchestrator;
pub mod output;
pub mod policy;

pub use bundle::{
    ArtifactBundle, BundleReport, FailureKind, Stage, StageFailure, TranslationOutcome,
};
pub use orchestrator::PipelineOrchestrator;
pub use policy::{CallPolicy, Retryable};
