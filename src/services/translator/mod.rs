pub mod client;

use async_trait::async_trait;

use crate::artifact::Text;
use crate::error::TranslationError;

pub use client::AzureTranslator;

/// Single round-trip translation. Performs no retries of its own.
#[async_trait]
pub trait Translator: Send + Sync {
    /// `source` of None lets the remote service detect the language.
    async fn translate(
        &self,
        text: &Text,
        target: &str,
        source: Option<&str>,
    ) -> Result<Text, TranslationError>;
}
