use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::Deserialize;

use super::{OperationHandle, PageLines, ReadBackend, ReadStatus};
use crate::config::VisionConfig;
use crate::error::{ConfigError, ExtractionError};

const READ_PATH: &str = "vision/v3.2/read/analyze";
const RESULTS_PATH: &str = "vision/v3.2/read/analyzeResults";
const KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";
const OPERATION_HEADER: &str = "Operation-Location";

/// Read API client. Holds credentials only; no per-request state.
#[derive(Clone)]
pub struct AzureReadBackend {
    client: Client,
    endpoint: String,
    key: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReadResultResponse {
    status: String,
    analyze_result: Option<AnalyzeResult>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeResult {
    #[serde(default)]
    read_results: Vec<ReadPage>,
}

#[derive(Deserialize)]
struct ReadPage {
    #[serde(default)]
    page: u32,
    #[serde(default)]
    lines: Vec<ReadLine>,
}

#[derive(Deserialize)]
struct ReadLine {
    text: String,
}

impl AzureReadBackend {
    pub fn new(config: &VisionConfig) -> Result<Self, ConfigError> {
        let endpoint = config
            .endpoint
            .clone()
            .ok_or(ConfigError::Missing("AZURE_VISION_ENDPOINT"))?;
        let key = config
            .key
            .clone()
            .ok_or(ConfigError::Missing("AZURE_VISION_KEY"))?;
        Ok(Self {
            client: crate::services::http_client()?,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            key,
        })
    }
}

#[async_trait]
impl ReadBackend for AzureReadBackend {
    async fn submit(&self, image: &[u8]) -> Result<OperationHandle, ExtractionError> {
        let response = self
            .client
            .post(format!("{}/{}", self.endpoint, READ_PATH))
            .header(KEY_HEADER, &self.key)
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(image.to_vec())
            .send()
            .await
            .map_err(|e| ExtractionError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ExtractionError::Transport(format!("{}: {}", status, body)));
        }

        let location = response
            .headers()
            .get(OPERATION_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                ExtractionError::Protocol("missing Operation-Location header".to_string())
            })?;
        handle_from_location(location)
    }

    async fn status(&self, handle: &OperationHandle) -> Result<ReadStatus, ExtractionError> {
        let response = self
            .client
            .get(format!("{}/{}/{}", self.endpoint, RESULTS_PATH, handle.as_str()))
            .header(KEY_HEADER, &self.key)
            .send()
            .await
            .map_err(|e| ExtractionError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ExtractionError::Transport(e.to_string()))?;
        if !status.is_success() {
            return Err(ExtractionError::Transport(format!("{}: {}", status, body)));
        }
        parse_read_status(&body)
    }
}

/// The operation id is the last path segment of the Operation-Location URL.
fn handle_from_location(location: &str) -> Result<OperationHandle, ExtractionError> {
    location
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|id| !id.is_empty())
        .map(OperationHandle::new)
        .ok_or_else(|| ExtractionError::Protocol(format!("bad Operation-Location: {}", location)))
}

fn parse_read_status(body: &str) -> Result<ReadStatus, ExtractionError> {
    let parsed: ReadResultResponse =
        serde_json::from_str(body).map_err(|e| ExtractionError::Protocol(e.to_string()))?;

    match parsed.status.as_str() {
        "notStarted" => Ok(ReadStatus::NotStarted),
        "running" => Ok(ReadStatus::Running),
        "failed" => Ok(ReadStatus::Failed(parsed.status)),
        "succeeded" => {
            let pages = parsed
                .analyze_result
                .map(|r| r.read_results)
                .unwrap_or_default()
                .into_iter()
                .map(|p| PageLines {
                    page: p.page,
                    lines: p.lines.into_iter().map(|l| l.text).collect(),
                })
                .collect();
            Ok(ReadStatus::Succeeded(pages))
        }
        other => Err(ExtractionError::Protocol(format!("unknown read status: {}", other))),
    }
}
