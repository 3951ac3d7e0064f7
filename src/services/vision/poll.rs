use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::{collect_text, ReadBackend, ReadStatus, TextExtractor};
use crate::artifact::Text;
use crate::config::PipelineConfig;
use crate::error::ExtractionError;
use crate::time::{Sleeper, TokioSleeper};

/// Fixed-interval, bounded polling. Not a backoff: read jobs are short-lived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            max_attempts: 10,
        }
    }
}

impl From<&PipelineConfig> for PollPolicy {
    fn from(config: &PipelineConfig) -> Self {
        Self {
            interval: config.poll_interval(),
            max_attempts: config.max_poll_attempts,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollAction {
    RetryAfter(Duration),
    Done(Result<Text, ExtractionError>),
    GiveUp,
}

/// Decides what to do after the `attempts_so_far`-th status read.
pub fn next_action(status: ReadStatus, attempts_so_far: u32, policy: &PollPolicy) -> PollAction {
    match status {
        ReadStatus::Succeeded(pages) => PollAction::Done(collect_text(pages)),
        ReadStatus::Failed(status) => PollAction::Done(Err(ExtractionError::Failed { status })),
        ReadStatus::NotStarted | ReadStatus::Running => {
            if attempts_so_far >= policy.max_attempts {
                PollAction::GiveUp
            } else {
                PollAction::RetryAfter(policy.interval)
            }
        }
    }
}

/// Drives a [`ReadBackend`] from submission to a terminal status.
/// Holds no per-call state; the handle is dropped when `extract` returns.
pub struct PollingExtractor {
    backend: Arc<dyn ReadBackend>,
    sleeper: Arc<dyn Sleeper>,
    policy: PollPolicy,
}

impl PollingExtractor {
    pub fn new(backend: Arc<dyn ReadBackend>, policy: PollPolicy) -> Self {
        Self {
            backend,
            sleeper: Arc::new(TokioSleeper),
            policy,
        }
    }

    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }
}

#[async_trait]
impl TextExtractor for PollingExtractor {
    async fn extract(&self, image: &[u8]) -> Result<Text, ExtractionError> {
        let handle = self.backend.submit(image).await?;
        debug!("Read operation submitted: {}", handle.as_str());

        let mut attempts = 0;
        loop {
            let status = self.backend.status(&handle).await?;
            attempts += 1;
            debug!("Poll {}/{}: {}", attempts, self.policy.max_attempts, status.label());

            match next_action(status, attempts, &self.policy) {
                PollAction::RetryAfter(delay) => self.sleeper.sleep(delay).await,
                PollAction::Done(Ok(text)) => {
                    info!("Text extracted after {} status checks", attempts);
                    return Ok(text);
                }
                PollAction::Done(Err(e)) => {
                    warn!("Text extraction ended without text: {}", e);
                    return Err(e);
                }
                PollAction::GiveUp => {
                    warn!("Read operation still in progress after {} checks", attempts);
                    return Err(ExtractionError::Timeout { attempts });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::vision::PageLines;

    fn policy(max_attempts: u32) -> PollPolicy {
        PollPolicy {
            interval: Duration::from_millis(250),
            max_attempts,
        }
    }

    #[test]
    fn test_in_progress_retries_at_fixed_interval() {
        let p = policy(3);
        assert_eq!(
            next_action(ReadStatus::NotStarted, 1, &p),
            PollAction::RetryAfter(Duration::from_millis(250))
        );
        assert_eq!(
            next_action(ReadStatus::Running, 2, &p),
            PollAction::RetryAfter(Duration::from_millis(250))
        );
    }

    #[test]
    fn test_gives_up_when_budget_spent() {
        assert_eq!(next_action(ReadStatus::Running, 3, &policy(3)), PollAction::GiveUp);
    }

    #[test]
    fn test_terminal_status_wins_on_last_attempt() {
        let status = ReadStatus::Succeeded(vec![PageLines {
            page: 1,
            lines: vec!["late".to_string()],
        }]);
        match next_action(status, 3, &policy(3)) {
            PollAction::Done(Ok(text)) => assert_eq!(text.as_str(), "late"),
            other => panic!("unexpected action {:?}", other),
        }
    }

    #[test]
    fn test_failed_status_carries_label() {
        assert_eq!(
            next_action(ReadStatus::Failed("failed".to_string()), 1, &policy(10)),
            PollAction::Done(Err(ExtractionError::Failed {
                status: "failed".to_string()
            }))
        );
    }
}
