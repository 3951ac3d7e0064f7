use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::error::ConfigError;
use crate::languages::{self, SOURCE_LOCALE};

pub const DEFAULT_TRANSLATOR_ENDPOINT: &str = "https://api.cognitive.microsofttranslator.com";

/// Root configuration. Every client receives its own section at construction;
/// nothing here is read from globals after start-up.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub vision: VisionConfig,
    pub translator: TranslatorConfig,
    pub speech: SpeechConfig,
    pub pipeline: PipelineConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct VisionConfig {
    pub endpoint: Option<String>,
    pub key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TranslatorConfig {
    pub endpoint: String,
    pub key: Option<String>,
    pub region: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct SpeechConfig {
    pub key: Option<String>,
    pub region: Option<String>,
    /// Overrides the region-derived synthesis URL.
    pub endpoint: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PipelineConfig {
    pub poll_interval_ms: u64,
    pub max_poll_attempts: u32,
    /// Per-call deadline for translation and synthesis. None means the
    /// orchestrator imposes no deadline of its own.
    pub stage_timeout_ms: Option<u64>,
    /// Extra attempts for translation and synthesis after the first failure.
    pub stage_retries: u32,
    pub source_locale: String,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_TRANSLATOR_ENDPOINT.to_string(),
            key: None,
            region: None,
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 1000,
            max_poll_attempts: 10,
            stage_timeout_ms: None,
            stage_retries: 0,
            source_locale: SOURCE_LOCALE.to_string(),
        }
    }
}

impl PipelineConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn stage_timeout(&self) -> Option<Duration> {
        self.stage_timeout_ms.map(Duration::from_millis)
    }
}

impl Config {
    /// Load configuration from a TOML file. Missing fields use defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Like [`Config::load`], but a missing file yields the defaults.
    /// Invalid TOML is still an error.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        match Self::load(path) {
            Ok(config) => Ok(config),
            Err(ConfigError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                Ok(Self::default())
            }
            Err(e) => Err(e),
        }
    }

    /// Apply environment variable overrides.
    ///
    /// Supported variables:
    /// - AZURE_VISION_ENDPOINT, AZURE_VISION_KEY
    /// - AZURE_TRANSLATOR_KEY, AZURE_TRANSLATOR_REGION, AZURE_TRANSLATOR_ENDPOINT
    /// - AZURE_SPEECH_KEY, AZURE_SPEECH_REGION
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|name| std::env::var(name).ok())
    }

    /// Override source used by [`Config::with_env_overrides`]; empty values are ignored.
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("AZURE_VISION_ENDPOINT") {
            self.vision.endpoint = Some(v);
        }
        if let Some(v) = get("AZURE_VISION_KEY") {
            self.vision.key = Some(v);
        }
        if let Some(v) = get("AZURE_TRANSLATOR_KEY") {
            self.translator.key = Some(v);
        }
        if let Some(v) = get("AZURE_TRANSLATOR_REGION") {
            self.translator.region = Some(v);
        }
        if let Some(v) = get("AZURE_TRANSLATOR_ENDPOINT") {
            self.translator.endpoint = v;
        }
        if let Some(v) = get("AZURE_SPEECH_KEY") {
            self.speech.key = Some(v);
        }
        if let Some(v) = get("AZURE_SPEECH_REGION") {
            self.speech.region = Some(v);
        }
        self
    }

    /// Reports the first missing credential. This is the only condition that
    /// prevents the pipeline from being built at all.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.vision.endpoint.is_none() {
            return Err(ConfigError::Missing("AZURE_VISION_ENDPOINT"));
        }
        if self.vision.key.is_none() {
            return Err(ConfigError::Missing("AZURE_VISION_KEY"));
        }
        if self.translator.key.is_none() {
            return Err(ConfigError::Missing("AZURE_TRANSLATOR_KEY"));
        }
        if self.translator.region.is_none() {
            return Err(ConfigError::Missing("AZURE_TRANSLATOR_REGION"));
        }
        if self.speech.key.is_none() {
            return Err(ConfigError::Missing("AZURE_SPEECH_KEY"));
        }
        if self.speech.region.is_none() && self.speech.endpoint.is_none() {
            return Err(ConfigError::Missing("AZURE_SPEECH_REGION"));
        }
        if self.pipeline.max_poll_attempts == 0 {
            return Err(ConfigError::Missing("pipeline.max_poll_attempts"));
        }
        if languages::by_speech_locale(&self.pipeline.source_locale).is_none() {
            return Err(ConfigError::UnsupportedLocale(self.pipeline.source_locale.clone()));
        }
        Ok(())
    }
}
