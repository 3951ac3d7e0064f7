use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use tracing::{error, info};

use super::{check_wav_format, SpeechSynthesizer};
use crate::artifact::{AudioBytes, Text};
use crate::config::SpeechConfig;
use crate::error::{ConfigError, SynthesisError};
use crate::languages::{self, SOURCE_LOCALE};

const KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";
const FORMAT_HEADER: &str = "X-Microsoft-OutputFormat";
const OUTPUT_FORMAT: &str = "riff-24khz-16bit-mono-pcm";

#[derive(Clone)]
pub struct AzureSpeech {
    client: Client,
    endpoint: String,
    key: String,
}

impl AzureSpeech {
    pub fn new(config: &SpeechConfig) -> Result<Self, ConfigError> {
        let key = config
            .key
            .clone()
            .ok_or(ConfigError::Missing("AZURE_SPEECH_KEY"))?;
        let endpoint = match (&config.endpoint, &config.region) {
            (Some(endpoint), _) => endpoint.trim_end_matches('/').to_string(),
            (None, Some(region)) => format!(
                "https://{}.tts.speech.microsoft.com/cognitiveservices/v1",
                region
            ),
            (None, None) => return Err(ConfigError::Missing("AZURE_SPEECH_REGION")),
        };
        Ok(Self {
            client: crate::services::http_client()?,
            endpoint,
            key,
        })
    }

    /// Synthesise with an explicit voice name instead of the locale default.
    pub async fn synthesize_with_voice(
        &self,
        text: &Text,
        locale: &str,
        voice: &str,
    ) -> Result<AudioBytes, SynthesisError> {
        let ssml = build_ssml(text.as_str(), locale, voice);

        let response = self
            .client
            .post(&self.endpoint)
            .header(KEY_HEADER, &self.key)
            .header(CONTENT_TYPE, "application/ssml+xml")
            .header(FORMAT_HEADER, OUTPUT_FORMAT)
            .body(ssml)
            .send()
            .await
            .map_err(|e| SynthesisError::Failed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Speech synthesis failed with status {}: {}", status, body);
            return Err(SynthesisError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let data = response
            .bytes()
            .await
            .map_err(|e| SynthesisError::Failed(e.to_string()))?
            .to_vec();
        if data.is_empty() {
            return Err(SynthesisError::Failed("empty audio stream".to_string()));
        }
        check_wav_format(&data)?;

        info!("Text-to-speech conversion successful using voice: {}", voice);
        Ok(AudioBytes::new(data, locale))
    }

    /// Self-check: synthesise a short English phrase.
    pub async fn verify(&self) -> bool {
        let Some(probe) = Text::new("Testing speech service.", "en") else {
            return false;
        };
        match self.synthesize(&probe, SOURCE_LOCALE).await {
            Ok(_) => true,
            Err(e) => {
                error!("Service verification failed: {}", e);
                false
            }
        }
    }
}

#[async_trait]
impl SpeechSynthesizer for AzureSpeech {
    async fn synthesize(&self, text: &Text, locale: &str) -> Result<AudioBytes, SynthesisError> {
        let profile = languages::by_speech_locale(locale)
            .ok_or_else(|| SynthesisError::NoVoice(locale.to_string()))?;
        self.synthesize_with_voice(text, profile.speech_locale, profile.voice)
            .await
    }
}

fn build_ssml(text: &str, locale: &str, voice: &str) -> String {
    format!(
        concat!(
            "<speak version='1.0' xml:lang='{locale}'>",
            "<voice xml:lang='{locale}' name='{voice}'>{body}</voice>",
            "</speak>"
        ),
        locale = escape_xml(locale),
        voice = escape_xml(voice),
        body = escape_xml(text),
    )
}

fn escape_xml(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
