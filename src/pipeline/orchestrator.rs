use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use super::bundle::{ArtifactBundle, Stage, StageFailure, TranslationOutcome};
use super::policy::CallPolicy;
use crate::artifact::{AudioBytes, Text};
use crate::config::{Config, PipelineConfig};
use crate::error::{ConfigError, SynthesisError, TranslationError};
use crate::languages::{self, LanguageProfile};
use crate::services::speech::{AzureSpeech, SpeechSynthesizer};
use crate::services::translator::{AzureTranslator, Translator};
use crate::services::vision::{AzureReadBackend, PollPolicy, PollingExtractor, TextExtractor};
use crate::telemetry::{RunPhase, TelemetryEvent, TelemetryRecorder, TelemetrySnapshot};
use crate::time::{Sleeper, TokioSleeper};

/// Drives one image through extraction, translation and both syntheses.
///
/// A run never fails as a whole: every stage error becomes a [`StageFailure`]
/// on the returned bundle. After extraction the source-audio and translation
/// sub-flows run concurrently and each owns its own bundle fields, so they
/// are merged only after both have resolved.
pub struct PipelineOrchestrator {
    extractor: Arc<dyn TextExtractor>,
    translator: Arc<dyn Translator>,
    synthesizer: Arc<dyn SpeechSynthesizer>,
    sleeper: Arc<dyn Sleeper>,
    policy: CallPolicy,
    source_locale: String,
    telemetry: Mutex<TelemetryRecorder>,
}

impl PipelineOrchestrator {
    pub fn new(
        extractor: Arc<dyn TextExtractor>,
        translator: Arc<dyn Translator>,
        synthesizer: Arc<dyn SpeechSynthesizer>,
        config: &PipelineConfig,
    ) -> Self {
        Self {
            extractor,
            translator,
            synthesizer,
            sleeper: Arc::new(TokioSleeper),
            policy: CallPolicy::from(config),
            source_locale: config.source_locale.clone(),
            telemetry: Mutex::new(TelemetryRecorder::new()),
        }
    }

    /// Builds the remote clients. Missing credentials are the one fatal,
    /// start-up time condition.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        config.validate()?;
        let backend = Arc::new(AzureReadBackend::new(&config.vision)?);
        let extractor = PollingExtractor::new(backend, PollPolicy::from(&config.pipeline));
        let translator = AzureTranslator::new(&config.translator)?;
        let synthesizer = AzureSpeech::new(&config.speech)?;
        info!("Remote clients initialized");

        Ok(Self::new(
            Arc::new(extractor),
            Arc::new(translator),
            Arc::new(synthesizer),
            &config.pipeline,
        ))
    }

    /// Sleeper used between retries.
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn telemetry(&self) -> TelemetrySnapshot {
        self.telemetry
            .lock()
            .map(|recorder| recorder.snapshot())
            .unwrap_or_default()
    }

    /// Caller-facing entry point. `target_language` is a display name from
    /// the language table ("Spanish"). An unknown name fails only the
    /// translation sub-flow.
    pub async fn run(&self, image: &[u8], target_language: &str) -> ArtifactBundle {
        let target = languages::by_display_name(target_language).ok_or(target_language);
        self.execute(image, target).await
    }

    pub async fn run_profile(&self, image: &[u8], profile: &LanguageProfile) -> ArtifactBundle {
        self.execute(image, Ok(profile)).await
    }

    async fn execute(
        &self,
        image: &[u8],
        target: Result<&LanguageProfile, &str>,
    ) -> ArtifactBundle {
        let run_id = Uuid::new_v4();
        let span = info_span!("pipeline_run", %run_id);

        async move {
            let started = Instant::now();
            self.transition(run_id, RunPhase::Idle, RunPhase::Extracting);

            let extracted = self
                .timed(run_id, Stage::Extraction, async {
                    self.extractor
                        .extract(image)
                        .await
                        .map_err(|e| StageFailure::extraction(&e))
                })
                .await;

            let bundle = match extracted {
                Err(failure) => {
                    self.transition(run_id, RunPhase::Extracting, RunPhase::ExtractionFailed);
                    ArtifactBundle::extraction_failed(failure)
                }
                Ok(text) => {
                    self.transition(run_id, RunPhase::Extracting, RunPhase::Extracted);
                    info!("Extracted text: {}", text.preview(50));

                    let (source_audio, translation) = tokio::join!(
                        self.source_flow(run_id, &text),
                        self.translation_flow(run_id, &text, target),
                    );

                    self.transition(run_id, RunPhase::Extracted, RunPhase::Done);
                    ArtifactBundle::assemble(text, source_audio, translation)
                }
            };

            let elapsed_ms = started.elapsed().as_millis() as u64;
            info!(
                "Run finished in {}ms: {} artifacts, {} failures",
                elapsed_ms,
                bundle.artifact_count(),
                bundle.failures().len()
            );
            self.record(TelemetryEvent::RunFinished {
                run_id,
                artifacts: bundle.artifact_count(),
                failures: bundle.failures().len(),
                elapsed_ms,
            });
            bundle
        }
        .instrument(span)
        .await
    }

    async fn source_flow(&self, run_id: Uuid, text: &Text) -> Result<AudioBytes, StageFailure> {
        self.timed(
            run_id,
            Stage::SourceSynthesis,
            self.synthesize(Stage::SourceSynthesis, text, &self.source_locale),
        )
        .await
    }

    /// Translation, then (only on success) target-locale synthesis.
    async fn translation_flow(
        &self,
        run_id: Uuid,
        text: &Text,
        target: Result<&LanguageProfile, &str>,
    ) -> TranslationOutcome {
        let translated = self
            .timed(run_id, Stage::Translation, self.translate(text, target))
            .await;
        let (translated, profile) = match translated {
            Ok(pair) => pair,
            Err(failure) => return TranslationOutcome::Failed(failure),
        };

        info!("Translation ({}): {}", profile.display_name, translated.preview(50));
        let audio = self
            .timed(
                run_id,
                Stage::TargetSynthesis,
                self.synthesize(Stage::TargetSynthesis, &translated, profile.speech_locale),
            )
            .await;
        TranslationOutcome::Translated {
            text: translated,
            audio,
        }
    }

    async fn translate<'p>(
        &self,
        text: &Text,
        target: Result<&'p LanguageProfile, &str>,
    ) -> Result<(Text, &'p LanguageProfile), StageFailure> {
        let profile = target.map_err(|name| {
            StageFailure::translation(&TranslationError::UnknownLanguage(name.to_string()))
        })?;

        let translator = self.translator.as_ref();
        let code = profile.translation_code;
        let translated = self
            .policy
            .call(
                self.sleeper.as_ref(),
                "translation",
                move || translator.translate(text, code, None),
                |timeout_ms| TranslationError::Deadline { timeout_ms },
            )
            .await
            .map_err(|e| StageFailure::translation(&e))?;
        Ok((translated, profile))
    }

    async fn synthesize(
        &self,
        stage: Stage,
        text: &Text,
        locale: &str,
    ) -> Result<AudioBytes, StageFailure> {
        let synthesizer = self.synthesizer.as_ref();
        self.policy
            .call(
                self.sleeper.as_ref(),
                "speech synthesis",
                move || synthesizer.synthesize(text, locale),
                |timeout_ms| SynthesisError::Deadline { timeout_ms },
            )
            .await
            .and_then(|audio| {
                if audio.is_empty() {
                    Err(SynthesisError::Failed("empty audio stream".to_string()))
                } else {
                    Ok(audio)
                }
            })
            .map_err(|e| StageFailure::synthesis(stage, &e))
    }

    /// Wraps one stage with start/finish telemetry.
    async fn timed<T, Fut>(&self, run_id: Uuid, stage: Stage, fut: Fut) -> Result<T, StageFailure>
    where
        Fut: Future<Output = Result<T, StageFailure>>,
    {
        self.record(TelemetryEvent::StageStarted { run_id, stage });
        let started = Instant::now();
        let result = fut.await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match &result {
            Ok(_) => {
                debug!("{:?} succeeded in {}ms", stage, elapsed_ms);
                self.record(TelemetryEvent::StageSucceeded {
                    run_id,
                    stage,
                    elapsed_ms,
                });
            }
            Err(failure) => {
                warn!("{:?} failed: {}", stage, failure.reason);
                self.record(TelemetryEvent::StageFailed {
                    run_id,
                    stage,
                    kind: failure.kind,
                    elapsed_ms,
                });
            }
        }
        result
    }

    fn transition(&self, run_id: Uuid, from: RunPhase, to: RunPhase) {
        debug!("{:?} -> {:?}", from, to);
        self.record(TelemetryEvent::RunTransition { run_id, from, to });
    }

    fn record(&self, event: TelemetryEvent) {
        if let Ok(mut recorder) = self.telemetry.lock() {
            recorder.record(event);
        }
    }
}
