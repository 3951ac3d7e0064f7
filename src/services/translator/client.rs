use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{error, info};

use super::Translator;
use crate::artifact::Text;
use crate::config::TranslatorConfig;
use crate::error::{ConfigError, TranslationError};

const API_VERSION: &str = "3.0";
const KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";
const REGION_HEADER: &str = "Ocp-Apim-Subscription-Region";

#[derive(Clone)]
pub struct AzureTranslator {
    client: Client,
    endpoint: String,
    key: String,
    region: String,
}

#[derive(Serialize)]
struct TranslateItem<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct TranslateResult {
    #[serde(default)]
    translations: Vec<Translation>,
}

#[derive(Deserialize)]
struct Translation {
    text: Option<String>,
}

#[derive(Deserialize)]
struct LanguagesResponse {
    #[serde(default)]
    translation: BTreeMap<String, LanguageEntry>,
}

#[derive(Deserialize)]
struct LanguageEntry {
    name: String,
}

impl AzureTranslator {
    pub fn new(config: &TranslatorConfig) -> Result<Self, ConfigError> {
        let key = config
            .key
            .clone()
            .ok_or(ConfigError::Missing("AZURE_TRANSLATOR_KEY"))?;
        let region = config
            .region
            .clone()
            .ok_or(ConfigError::Missing("AZURE_TRANSLATOR_REGION"))?;
        Ok(Self {
            client: crate::services::http_client()?,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            key,
            region,
        })
    }

    /// Languages the service can translate into, as code -> English name.
    pub async fn available_languages(&self) -> Result<BTreeMap<String, String>, TranslationError> {
        let response = self
            .client
            .get(format!("{}/languages", self.endpoint))
            .query(&[("api-version", API_VERSION), ("scope", "translation")])
            .send()
            .await
            .map_err(transport)?;

        let body = read_success_body(response).await?;
        parse_languages(&body)
    }
}

#[async_trait]
impl Translator for AzureTranslator {
    async fn translate(
        &self,
        text: &Text,
        target: &str,
        source: Option<&str>,
    ) -> Result<Text, TranslationError> {
        let mut params = vec![("api-version", API_VERSION), ("to", target)];
        if let Some(source) = source {
            params.push(("from", source));
        }

        info!("Sending translation request for text: {}", text.preview(50));
        let response = self
            .client
            .post(format!("{}/translate", self.endpoint))
            .query(&params)
            .header(KEY_HEADER, &self.key)
            .header(REGION_HEADER, &self.region)
            .json(&[TranslateItem { text: text.as_str() }])
            .send()
            .await
            .map_err(transport)?;

        let body = read_success_body(response).await?;
        let translated = parse_translation(&body, target)?;
        info!("Text translated successfully to {}", target);
        Ok(translated)
    }
}

fn transport(e: reqwest::Error) -> TranslationError {
    TranslationError::Transport {
        status: e.status().map(|s| s.as_u16()),
        body: e.to_string(),
    }
}

/// Non-success statuses become `Transport` with the response body kept.
async fn read_success_body(response: reqwest::Response) -> Result<String, TranslationError> {
    let status = response.status();
    let body = response.text().await.map_err(transport)?;
    if !status.is_success() {
        error!("Translator HTTP error {}: {}", status, body);
        return Err(TranslationError::Transport {
            status: Some(status.as_u16()),
            body,
        });
    }
    Ok(body)
}

fn parse_translation(body: &str, target: &str) -> Result<Text, TranslationError> {
    let results: Vec<TranslateResult> =
        serde_json::from_str(body).map_err(|_| TranslationError::EmptyResponse)?;

    results
        .into_iter()
        .next()
        .and_then(|r| r.translations.into_iter().next())
        .and_then(|t| t.text)
        .and_then(|t| Text::new(t, target))
        .ok_or(TranslationError::EmptyResponse)
}

fn parse_languages(body: &str) -> Result<BTreeMap<String, String>, TranslationError> {
    let parsed: LanguagesResponse =
        serde_json::from_str(body).map_err(|_| TranslationError::EmptyResponse)?;
    Ok(parsed
        .translation
        .into_iter()
        .map(|(code, entry)| (code, entry.name))
        .collect())
}
