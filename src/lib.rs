pub mod artifact;
pub mod config;
pub mod error;
pub mod languages;
pub mod pipeline;
pub mod services;
pub mod telemetry;
pub mod time;
pub mod validation;

// Re-export specific items for convenient access
pub use artifact::{AudioBytes, Text};
pub use config::Config;
pub use pipeline::{ArtifactBundle, PipelineOrchestrator, Stage, StageFailure};
