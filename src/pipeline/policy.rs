use std::future::Future;
use std::time::Duration;
use tracing::warn;

use crate::config::PipelineConfig;
use crate::error::{SynthesisError, TranslationError};
use crate::time::Sleeper;

/// Errors that may succeed when the same call is repeated.
pub trait Retryable {
    fn is_retryable(&self) -> bool;
}

/// Client errors other than throttling are permanent.
fn is_permanent_status(status: u16) -> bool {
    (400..500).contains(&status) && status != 429
}

impl Retryable for TranslationError {
    fn is_retryable(&self) -> bool {
        match self {
            TranslationError::Transport { status, .. } => !status.is_some_and(is_permanent_status),
            TranslationError::Deadline { .. } => true,
            TranslationError::EmptyResponse | TranslationError::UnknownLanguage(_) => false,
        }
    }
}

impl Retryable for SynthesisError {
    fn is_retryable(&self) -> bool {
        match self {
            SynthesisError::Rejected { status, .. } => !is_permanent_status(*status),
            SynthesisError::Failed(_) | SynthesisError::Deadline { .. } => true,
            SynthesisError::NoVoice(_) => false,
        }
    }
}

/// Deadline and retry budget applied by the orchestrator to translation and
/// synthesis calls. Extraction has its own bounded poll instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallPolicy {
    pub timeout: Option<Duration>,
    pub retries: u32,
    pub retry_delay: Duration,
}

impl Default for CallPolicy {
    fn default() -> Self {
        Self {
            timeout: None,
            retries: 0,
            retry_delay: Duration::from_secs(1),
        }
    }
}

impl From<&PipelineConfig> for CallPolicy {
    fn from(config: &PipelineConfig) -> Self {
        Self {
            timeout: config.stage_timeout(),
            retries: config.stage_retries,
            retry_delay: config.poll_interval(),
        }
    }
}

impl CallPolicy {
    /// Runs `op` under the deadline, repeating retryable failures up to
    /// `retries` more times. `on_deadline` builds the error for an expired call.
    pub async fn call<T, E, F, Fut>(
        &self,
        sleeper: &dyn Sleeper,
        label: &str,
        mut op: F,
        on_deadline: impl Fn(u64) -> E,
    ) -> Result<T, E>
    where
        E: Retryable + std::fmt::Display,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut attempt = 0;
        loop {
            let result = match self.timeout {
                Some(limit) => match tokio::time::timeout(limit, op()).await {
                    Ok(result) => result,
                    Err(_) => Err(on_deadline(limit.as_millis() as u64)),
                },
                None => op().await,
            };

            match result {
                Ok(value) => return Ok(value),
                Err(e) if attempt < self.retries && e.is_retryable() => {
                    attempt += 1;
                    warn!("{} failed ({}), retry {}/{}", label, e, attempt, self.retries);
                    sleeper.sleep(self.retry_delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
