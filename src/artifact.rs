use serde::Serialize;

/// Non-empty text plus the language it is written in. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Text {
    content: String,
    language: String,
}

impl Text {
    /// Returns None for empty or whitespace-only content.
    pub fn new(content: impl Into<String>, language: impl Into<String>) -> Option<Self> {
        let content = content.into();
        if content.trim().is_empty() {
            return None;
        }
        Some(Self {
            content,
            language: language.into(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.content
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// First `max` characters, for log lines.
    pub fn preview(&self, max: usize) -> String {
        let mut preview: String = self.content.chars().take(max).collect();
        if self.content.chars().count() > max {
            preview.push_str("...");
        }
        preview
    }
}

/// Synthesised WAV stream (mono, 24 kHz, 16-bit PCM) and the locale it was spoken in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioBytes {
    data: Vec<u8>,
    locale: String,
}

impl AudioBytes {
    pub fn new(data: Vec<u8>, locale: impl Into<String>) -> Self {
        Self {
            data,
            locale: locale.into(),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
