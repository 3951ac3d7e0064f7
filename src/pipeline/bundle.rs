use serde::{Deserialize, Serialize};

use crate::artifact::{AudioBytes, Text};
use crate::error::{ExtractionError, SynthesisError, TranslationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    Extraction,
    SourceSynthesis,
    Translation,
    TargetSynthesis,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FailureKind {
    NoTextFound,
    ExtractionTimeout,
    ExtractionFailed,
    TranslationTransportError,
    TranslationEmptyResponse,
    UnsupportedLanguage,
    SynthesisFailed,
}

/// One recorded stage failure. Failures are accumulated, never discarded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageFailure {
    pub stage: Stage,
    pub kind: FailureKind,
    pub reason: String,
}

impl StageFailure {
    pub fn extraction(e: &ExtractionError) -> Self {
        let kind = match e {
            ExtractionError::NoTextFound => FailureKind::NoTextFound,
            ExtractionError::Timeout { .. } => FailureKind::ExtractionTimeout,
            ExtractionError::Failed { .. }
            | ExtractionError::Transport(_)
            | ExtractionError::Protocol(_) => FailureKind::ExtractionFailed,
        };
        Self {
            stage: Stage::Extraction,
            kind,
            reason: e.to_string(),
        }
    }

    pub fn translation(e: &TranslationError) -> Self {
        let kind = match e {
            TranslationError::Transport { .. } | TranslationError::Deadline { .. } => {
                FailureKind::TranslationTransportError
            }
            TranslationError::EmptyResponse => FailureKind::TranslationEmptyResponse,
            TranslationError::UnknownLanguage(_) => FailureKind::UnsupportedLanguage,
        };
        Self {
            stage: Stage::Translation,
            kind,
            reason: e.to_string(),
        }
    }

    /// `stage` is either source or target synthesis.
    pub fn synthesis(stage: Stage, e: &SynthesisError) -> Self {
        Self {
            stage,
            kind: FailureKind::SynthesisFailed,
            reason: e.to_string(),
        }
    }
}

/// Outcome of the translation sub-flow. Target audio only exists inside
/// `Translated`, so it can never be present without translated text.
#[derive(Debug, Clone)]
pub enum TranslationOutcome {
    Failed(StageFailure),
    Translated {
        text: Text,
        audio: Result<AudioBytes, StageFailure>,
    },
}

/// Aggregate, partially populated result of one run. Built once by the
/// orchestrator and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct ArtifactBundle {
    extracted_text: Option<Text>,
    original_audio: Option<AudioBytes>,
    translated_text: Option<Text>,
    translated_audio: Option<AudioBytes>,
    failures: Vec<StageFailure>,
}

impl ArtifactBundle {
    /// Extraction failed: nothing but the failure is recorded.
    pub fn extraction_failed(failure: StageFailure) -> Self {
        Self {
            failures: vec![failure],
            ..Default::default()
        }
    }

    /// Merge the two independent sub-flows that follow a successful extraction.
    pub fn assemble(
        extracted: Text,
        source_audio: Result<AudioBytes, StageFailure>,
        translation: TranslationOutcome,
    ) -> Self {
        let mut bundle = Self {
            extracted_text: Some(extracted),
            ..Default::default()
        };

        match source_audio {
            Ok(audio) => bundle.original_audio = Some(audio),
            Err(failure) => bundle.failures.push(failure),
        }

        match translation {
            TranslationOutcome::Failed(failure) => bundle.failures.push(failure),
            TranslationOutcome::Translated { text, audio } => {
                bundle.translated_text = Some(text);
                match audio {
                    Ok(audio) => bundle.translated_audio = Some(audio),
                    Err(failure) => bundle.failures.push(failure),
                }
            }
        }

        bundle
    }

    pub fn extracted_text(&self) -> Option<&Text> {
        self.extracted_text.as_ref()
    }

    pub fn original_audio(&self) -> Option<&AudioBytes> {
        self.original_audio.as_ref()
    }

    pub fn translated_text(&self) -> Option<&Text> {
        self.translated_text.as_ref()
    }

    pub fn translated_audio(&self) -> Option<&AudioBytes> {
        self.translated_audio.as_ref()
    }

    pub fn failures(&self) -> &[StageFailure] {
        &self.failures
    }

    pub fn failure_for(&self, stage: Stage) -> Option<&StageFailure> {
        self.failures.iter().find(|f| f.stage == stage)
    }

    /// Every artifact present and no failures.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty() && self.artifact_count() == 4
    }

    pub fn artifact_count(&self) -> usize {
        [
            self.extracted_text.is_some(),
            self.original_audio.is_some(),
            self.translated_text.is_some(),
            self.translated_audio.is_some(),
        ]
        .iter()
        .filter(|present| **present)
        .count()
    }

    pub fn report(&self) -> BundleReport {
        BundleReport {
            extracted_text: self.extracted_text.as_ref().map(|t| t.as_str().to_string()),
            translated_text: self.translated_text.as_ref().map(|t| t.as_str().to_string()),
            translated_language: self.translated_text.as_ref().map(|t| t.language().to_string()),
            original_audio_bytes: self.original_audio.as_ref().map(AudioBytes::len),
            translated_audio_bytes: self.translated_audio.as_ref().map(AudioBytes::len),
            failures: self.failures.clone(),
        }
    }
}

/// JSON-friendly summary of a bundle. Audio is reported by size only.
#[derive(Debug, Clone, Serialize)]
pub struct BundleReport {
    pub extracted_text: Option<String>,
    pub translated_text: Option<String>,
    pub translated_language: Option<String>,
    pub original_audio_bytes: Option<usize>,
    pub translated_audio_bytes: Option<usize>,
    pub failures: Vec<StageFailure>,
}
