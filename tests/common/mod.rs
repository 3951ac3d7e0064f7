#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use lingualens::artifact::{AudioBytes, Text};
use lingualens::config::PipelineConfig;
use lingualens::error::{ExtractionError, SynthesisError, TranslationError};
use lingualens::services::speech::SpeechSynthesizer;
use lingualens::services::translator::Translator;
use lingualens::services::vision::{
    OperationHandle, PageLines, PollPolicy, PollingExtractor, ReadBackend, ReadStatus,
};
use lingualens::time::Sleeper;
use lingualens::PipelineOrchestrator;

/// Records requested delays instead of sleeping.
#[derive(Default)]
pub struct RecordingSleeper {
    pub delays: Mutex<Vec<Duration>>,
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.delays.lock().unwrap().push(duration);
    }
}

impl RecordingSleeper {
    pub fn recorded(&self) -> Vec<Duration> {
        self.delays.lock().unwrap().clone()
    }
}

/// Read backend that replays a scripted status sequence. The last status
/// repeats once the script runs out.
pub struct ScriptedBackend {
    pub submit_error: Option<ExtractionError>,
    statuses: Mutex<VecDeque<ReadStatus>>,
    last: Mutex<Option<ReadStatus>>,
    pub submits: AtomicU32,
    pub polls: AtomicU32,
}

impl ScriptedBackend {
    pub fn new(statuses: Vec<ReadStatus>) -> Self {
        Self {
            submit_error: None,
            statuses: Mutex::new(statuses.into()),
            last: Mutex::new(None),
            submits: AtomicU32::new(0),
            polls: AtomicU32::new(0),
        }
    }

    pub fn always(status: ReadStatus) -> Self {
        Self::new(vec![status])
    }

    pub fn failing_submit(error: ExtractionError) -> Self {
        Self {
            submit_error: Some(error),
            ..Self::new(Vec::new())
        }
    }
}

#[async_trait]
impl ReadBackend for ScriptedBackend {
    async fn submit(&self, _image: &[u8]) -> Result<OperationHandle, ExtractionError> {
        self.submits.fetch_add(1, Ordering::SeqCst);
        match &self.submit_error {
            Some(e) => Err(e.clone()),
            None => Ok(OperationHandle::new("op-1")),
        }
    }

    async fn status(&self, _handle: &OperationHandle) -> Result<ReadStatus, ExtractionError> {
        self.polls.fetch_add(1, Ordering::SeqCst);
        let next = self.statuses.lock().unwrap().pop_front();
        let mut last = self.last.lock().unwrap();
        match next {
            Some(status) => {
                *last = Some(status.clone());
                Ok(status)
            }
            None => last
                .clone()
                .ok_or_else(|| ExtractionError::Protocol("empty script".to_string())),
        }
    }
}

pub fn succeeded(lines: &[&str]) -> ReadStatus {
    ReadStatus::Succeeded(vec![PageLines {
        page: 1,
        lines: lines.iter().map(|l| l.to_string()).collect(),
    }])
}

pub fn extractor(
    backend: Arc<ScriptedBackend>,
    sleeper: Arc<RecordingSleeper>,
) -> PollingExtractor {
    PollingExtractor::new(backend, PollPolicy::default()).with_sleeper(sleeper)
}

pub enum TranslatorBehavior {
    Reply(&'static str),
    Fail(TranslationError),
    /// Fail with the given error this many times, then reply.
    Flaky(u32, TranslationError, &'static str),
}

pub struct FakeTranslator {
    behavior: TranslatorBehavior,
    pub calls: AtomicU32,
    pub targets: Mutex<Vec<String>>,
    pub gate: Option<Arc<tokio::sync::Barrier>>,
}

impl FakeTranslator {
    pub fn new(behavior: TranslatorBehavior) -> Self {
        Self {
            behavior,
            calls: AtomicU32::new(0),
            targets: Mutex::new(Vec::new()),
            gate: None,
        }
    }

    pub fn replying(reply: &'static str) -> Self {
        Self::new(TranslatorBehavior::Reply(reply))
    }

    pub fn with_gate(mut self, gate: Arc<tokio::sync::Barrier>) -> Self {
        self.gate = Some(gate);
        self
    }
}

#[async_trait]
impl Translator for FakeTranslator {
    async fn translate(
        &self,
        _text: &Text,
        target: &str,
        _source: Option<&str>,
    ) -> Result<Text, TranslationError> {
        if let Some(gate) = &self.gate {
            gate.wait().await;
        }
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        self.targets.lock().unwrap().push(target.to_string());
        match &self.behavior {
            TranslatorBehavior::Reply(reply) => {
                Text::new(*reply, target).ok_or(TranslationError::EmptyResponse)
            }
            TranslatorBehavior::Fail(e) => Err(e.clone()),
            TranslatorBehavior::Flaky(failures, e, reply) => {
                if call < *failures {
                    Err(e.clone())
                } else {
                    Text::new(*reply, target).ok_or(TranslationError::EmptyResponse)
                }
            }
        }
    }
}

/// Synthesizer that returns a small WAV-looking payload, failing for the
/// listed locales.
pub struct FakeSynthesizer {
    pub failing_locales: Vec<&'static str>,
    pub empty_locales: Vec<&'static str>,
    pub locales: Mutex<Vec<String>>,
    /// Barrier awaited only when synthesizing the given locale.
    pub gate: Option<(&'static str, Arc<tokio::sync::Barrier>)>,
    pub delay: Option<Duration>,
}

impl FakeSynthesizer {
    pub fn ok() -> Self {
        Self {
            failing_locales: Vec::new(),
            empty_locales: Vec::new(),
            locales: Mutex::new(Vec::new()),
            gate: None,
            delay: None,
        }
    }

    pub fn failing(locales: &[&'static str]) -> Self {
        Self {
            failing_locales: locales.to_vec(),
            ..Self::ok()
        }
    }

    pub fn with_gate(mut self, locale: &'static str, gate: Arc<tokio::sync::Barrier>) -> Self {
        self.gate = Some((locale, gate));
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.locales.lock().unwrap().clone()
    }
}

#[async_trait]
impl SpeechSynthesizer for FakeSynthesizer {
    async fn synthesize(&self, text: &Text, locale: &str) -> Result<AudioBytes, SynthesisError> {
        self.locales.lock().unwrap().push(locale.to_string());
        if let Some((gated, gate)) = &self.gate {
            if *gated == locale {
                gate.wait().await;
            }
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing_locales.iter().any(|l| *l == locale) {
            return Err(SynthesisError::Failed(format!("synthesis down for {}", locale)));
        }
        if self.empty_locales.iter().any(|l| *l == locale) {
            return Ok(AudioBytes::new(Vec::new(), locale));
        }
        let mut data = b"RIFF".to_vec();
        data.extend_from_slice(text.as_str().as_bytes());
        Ok(AudioBytes::new(data, locale))
    }
}

pub struct Harness {
    pub backend: Arc<ScriptedBackend>,
    pub sleeper: Arc<RecordingSleeper>,
    pub translator: Arc<FakeTranslator>,
    pub synthesizer: Arc<FakeSynthesizer>,
    pub orchestrator: PipelineOrchestrator,
}

pub fn harness(
    backend: ScriptedBackend,
    translator: FakeTranslator,
    synthesizer: FakeSynthesizer,
    config: PipelineConfig,
) -> Harness {
    let backend = Arc::new(backend);
    let sleeper = Arc::new(RecordingSleeper::default());
    let translator = Arc::new(translator);
    let synthesizer = Arc::new(synthesizer);
    let orchestrator = PipelineOrchestrator::new(
        Arc::new(extractor(backend.clone(), sleeper.clone())),
        translator.clone(),
        synthesizer.clone(),
        &config,
    )
    .with_sleeper(sleeper.clone());

    Harness {
        backend,
        sleeper,
        translator,
        synthesizer,
        orchestrator,
    }
}

pub const IMAGE: &[u8] = b"\x89PNG fake image bytes";
