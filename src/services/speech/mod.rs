pub mod client;

use async_trait::async_trait;
use std::io::Cursor;

use crate::artifact::{AudioBytes, Text};
use crate::error::SynthesisError;

pub use client::AzureSpeech;

pub const SAMPLE_RATE: u32 = 24_000;
pub const CHANNELS: u16 = 1;
pub const BITS_PER_SAMPLE: u16 = 16;

/// Blocking-from-the-caller synthesis: returns once audio is ready or failed.
/// Output format is fixed regardless of locale.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, text: &Text, locale: &str) -> Result<AudioBytes, SynthesisError>;
}

/// Confirms the stream is RIFF/WAV, mono, 24 kHz, 16-bit PCM.
pub fn check_wav_format(bytes: &[u8]) -> Result<(), SynthesisError> {
    let reader = hound::WavReader::new(Cursor::new(bytes))
        .map_err(|e| SynthesisError::Failed(format!("not a WAV stream: {}", e)))?;
    let spec = reader.spec();
    if spec.channels != CHANNELS
        || spec.sample_rate != SAMPLE_RATE
        || spec.bits_per_sample != BITS_PER_SAMPLE
        || spec.sample_format != hound::SampleFormat::Int
    {
        return Err(SynthesisError::Failed(format!(
            "unexpected audio format: {}ch {}Hz {}bit",
            spec.channels, spec.sample_rate, spec.bits_per_sample
        )));
    }
    Ok(())
}

#[cfg(test)]
pub(crate) fn test_wav(sample_rate: u32, channels: u16) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: BITS_PER_SAMPLE,
        sample_format: hound::SampleFormat::Int,
    };
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
        for i in 0..480 {
            writer.write_sample((i % 64) as i16).unwrap();
        }
        writer.finalize().unwrap();
    }
    cursor.into_inner()
}
