//! Azure Document Intelligence layout client.

use std::ops::ControlFlow;
use std::thread;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::layout::AnalyzeResult;
use super::{OcrService, Result};
use crate::error::OcrError;
use crate::models::config::OcrConfig;

const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";
const OPERATION_LOCATION_HEADER: &str = "Operation-Location";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OperationStatus {
    status: String,
    #[serde(default)]
    analyze_result: Option<AnalyzeResult>,
    #[serde(default)]
    error: Option<ServiceError>,
}

#[derive(Debug, Deserialize)]
struct ServiceError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

/// Decide whether a polled operation is finished.
///
/// `Continue` means the analysis is still queued or running.
fn poll_outcome(op: OperationStatus) -> ControlFlow<Result<AnalyzeResult>> {
    match op.status.as_str() {
        "succeeded" => ControlFlow::Break(op.analyze_result.ok_or_else(|| {
            OcrError::MalformedResponse("succeeded without analyzeResult".into())
        })),
        "failed" | "canceled" => {
            let reason = op
                .error
                .map(|e| format!("{}: {}", e.code, e.message))
                .unwrap_or_else(|| op.status.clone());
            ControlFlow::Break(Err(OcrError::AnalysisFailed(reason)))
        }
        _ => ControlFlow::Continue(()),
    }
}

/// Runs the layout model with key/value pair detection and renders the
/// result with [`AnalyzeResult::to_text`].
pub struct DocumentIntelligenceClient {
    client: Client,
    config: OcrConfig,
}

impl DocumentIntelligenceClient {
    pub fn new(config: OcrConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("leumi/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    fn analyze_url(&self) -> String {
        format!(
            "{}/documentintelligence/documentModels/{}:analyze?api-version={}&features=keyValuePairs",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model_id,
            self.config.api_version
        )
    }

    /// Submit the document and return the operation URL to poll.
    fn submit(&self, bytes: &[u8], content_type: &str) -> Result<String> {
        let url = self.analyze_url();
        debug!(url = %url, bytes = bytes.len(), "submitting document for analysis");

        let resp = self
            .client
            .post(&url)
            .header(SUBSCRIPTION_KEY_HEADER, &self.config.api_key)
            .header(CONTENT_TYPE, content_type)
            .body(bytes.to_vec())
            .send()?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            warn!(status = status.as_u16(), "document analysis request rejected");
            return Err(OcrError::Service {
                status: status.as_u16(),
                body,
            });
        }

        resp.headers()
            .get(OPERATION_LOCATION_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| OcrError::MalformedResponse("missing Operation-Location header".into()))
    }

    /// Poll the operation until it finishes or the attempt limit is reached.
    fn wait_for_result(&self, location: &str) -> Result<AnalyzeResult> {
        let interval = Duration::from_millis(self.config.poll_interval_ms);

        for attempt in 1..=self.config.max_polls {
            let resp = self
                .client
                .get(location)
                .header(SUBSCRIPTION_KEY_HEADER, &self.config.api_key)
                .send()?;

            let status = resp.status();
            if !status.is_success() {
                let body = resp.text().unwrap_or_default();
                warn!(status = status.as_u16(), "polling document analysis failed");
                return Err(OcrError::Service {
                    status: status.as_u16(),
                    body,
                });
            }

            let op: OperationStatus = resp
                .json()
                .map_err(|e| OcrError::MalformedResponse(e.to_string()))?;
            debug!(attempt, status = %op.status, "document analysis status");

            if let ControlFlow::Break(outcome) = poll_outcome(op) {
                return outcome;
            }
            thread::sleep(interval);
        }

        Err(OcrError::Timeout {
            attempts: self.config.max_polls,
        })
    }
}

impl OcrService for DocumentIntelligenceClient {
    fn analyze(&self, bytes: &[u8], content_type: &str) -> Result<String> {
        let location = self.submit(bytes, content_type)?;
        let result = self.wait_for_result(&location)?;

        info!(
            pages = result.pages.len(),
            paragraphs = result.paragraphs.len(),
            key_value_pairs = result.key_value_pairs.len(),
            "document analysis finished"
        );
        if result.is_blank() {
            warn!("document analysis recognized no text");
        }
        Ok(result.to_text())
    }
}
