use thiserror::Error;

/// Failures of the text extraction leaf. Every variant is recoverable at the
/// stage boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    #[error("no text could be extracted from the image")]
    NoTextFound,

    #[error("extraction did not finish after {attempts} status checks")]
    Timeout { attempts: u32 },

    #[error("extraction failed with status: {status}")]
    Failed { status: String },

    #[error("extraction transport error: {0}")]
    Transport(String),

    #[error("extraction protocol error: {0}")]
    Protocol(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslationError {
    /// Network or HTTP-level failure. The response body is kept for diagnostics.
    #[error("translation transport error ({status:?}): {body}")]
    Transport { status: Option<u16>, body: String },

    #[error("translation response carried no translation")]
    EmptyResponse,

    #[error("unsupported target language: {0}")]
    UnknownLanguage(String),

    #[error("translation did not finish within {timeout_ms}ms")]
    Deadline { timeout_ms: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SynthesisError {
    #[error("speech synthesis failed: {0}")]
    Failed(String),

    /// The endpoint answered with a non-success status.
    #[error("speech synthesis rejected ({status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("no voice configured for locale {0}")]
    NoVoice(String),

    #[error("speech synthesis did not finish within {timeout_ms}ms")]
    Deadline { timeout_ms: u64 },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing credential or setting: {0}")]
    Missing(&'static str),

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("no voice available for source locale {0}")]
    UnsupportedLocale(String),

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("unsupported image format, use JPEG, PNG or BMP")]
    UnsupportedFormat,

    #[error("image is {size} bytes, maximum is {max} bytes")]
    TooLarge { size: usize, max: usize },

    #[error("image is {width}x{height}px, maximum dimension is {max}px")]
    DimensionsTooLarge { width: u32, height: u32, max: u32 },

    #[error("invalid image file: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_display_names_attempts() {
        let err = ExtractionError::Timeout { attempts: 10 };
        assert_eq!(err.to_string(), "extraction did not finish after 10 status checks");
    }

    #[test]
    fn test_transport_display_keeps_body() {
        let err = TranslationError::Transport {
            status: Some(500),
            body: "upstream down".to_string(),
        };
        assert!(err.to_string().contains("upstream down"));
        assert!(err.to_string().contains("500"));
    }

    #[test]
    fn test_missing_config_display() {
        let err = ConfigError::Missing("AZURE_SPEECH_KEY");
        assert_eq!(err.to_string(), "missing credential or setting: AZURE_SPEECH_KEY");
    }

    #[test]
    fn test_http_builder_error_is_config_error() {
        let err = crate::services::http_client()
            .unwrap()
            .get("not a url")
            .build()
            .unwrap_err();
        let err = ConfigError::from(err);
        assert!(matches!(err, ConfigError::HttpClient(_)));
        assert!(err.to_string().starts_with("failed to build HTTP client"));
    }
}
