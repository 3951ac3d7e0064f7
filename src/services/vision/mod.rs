//! Text extraction over an asynchronous read service.
//!
//! The remote side is a submit-then-poll protocol: [`ReadBackend`] exposes the
//! two raw steps, [`poll::PollingExtractor`] drives them to a terminal status.

pub mod client;
pub mod poll;

use async_trait::async_trait;

use crate::artifact::Text;
use crate::error::ExtractionError;

pub use client::AzureReadBackend;
pub use poll::{next_action, PollAction, PollPolicy, PollingExtractor};

/// Opaque id of an in-flight read job. Lives for one `extract` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationHandle(String);

impl OperationHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Recognised lines of one page, in reading order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageLines {
    pub page: u32,
    pub lines: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadStatus {
    NotStarted,
    Running,
    Succeeded(Vec<PageLines>),
    Failed(String),
}

impl ReadStatus {
    pub fn label(&self) -> &str {
        match self {
            ReadStatus::NotStarted => "notStarted",
            ReadStatus::Running => "running",
            ReadStatus::Succeeded(_) => "succeeded",
            ReadStatus::Failed(status) => status,
        }
    }
}

/// The two raw steps of the remote read protocol.
#[async_trait]
pub trait ReadBackend: Send + Sync {
    async fn submit(&self, image: &[u8]) -> Result<OperationHandle, ExtractionError>;
    async fn status(&self, handle: &OperationHandle) -> Result<ReadStatus, ExtractionError>;
}

#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract(&self, image: &[u8]) -> Result<Text, ExtractionError>;
}

/// Joins lines in document order (page, then line) with newlines and trims.
/// Empty output is `NoTextFound`.
pub fn collect_text(mut pages: Vec<PageLines>) -> Result<Text, ExtractionError> {
    pages.sort_by_key(|p| p.page);
    let joined = pages
        .iter()
        .flat_map(|p| p.lines.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join("\n");
    Text::new(joined.trim(), "en").ok_or(ExtractionError::NoTextFound)
}
