use serde::Serialize;

/// Locale used for the spoken rendition of the extracted (source) text.
pub const SOURCE_LOCALE: &str = "en-US";

/// Static mapping from a display name to the codes each remote service expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LanguageProfile {
    pub display_name: &'static str,
    pub translation_code: &'static str,
    pub speech_locale: &'static str,
    pub voice: &'static str,
}

pub const LANGUAGES: &[LanguageProfile] = &[
    LanguageProfile {
        display_name: "English",
        translation_code: "en",
        speech_locale: "en-US",
        voice: "en-US-JennyMultilingualNeural",
    },
    LanguageProfile {
        display_name: "Spanish",
        translation_code: "es",
        speech_locale: "es-ES",
        voice: "es-ES-ElviraNeural",
    },
    LanguageProfile {
        display_name: "French",
        translation_code: "fr",
        speech_locale: "fr-FR",
        voice: "fr-FR-DeniseNeural",
    },
    LanguageProfile {
        display_name: "Arabic",
        translation_code: "ar",
        speech_locale: "ar-SA",
        voice: "ar-SA-ZariyahNeural",
    },
    LanguageProfile {
        display_name: "German",
        translation_code: "de",
        speech_locale: "de-DE",
        voice: "de-DE-KatjaNeural",
    },
];

/// Resolve a display name ("Spanish") to its profile. Matching ignores ASCII case.
pub fn by_display_name(name: &str) -> Option<&'static LanguageProfile> {
    let name = name.trim();
    LANGUAGES
        .iter()
        .find(|p| p.display_name.eq_ignore_ascii_case(name))
}

pub fn by_speech_locale(locale: &str) -> Option<&'static LanguageProfile> {
    LANGUAGES
        .iter()
        .find(|p| p.speech_locale.eq_ignore_ascii_case(locale))
}

pub fn display_names() -> impl Iterator<Item = &'static str> {
    LANGUAGES.iter().map(|p| p.display_name)
}
