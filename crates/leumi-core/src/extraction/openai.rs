//! Azure OpenAI chat-completions extractor.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::prompt::system_prompt;
use super::response::parse_response;
use super::{FieldExtractor, Result};
use crate::error::ExtractionError;
use crate::models::config::ExtractionConfig;
use crate::models::record::ExtractedFieldMap;
use crate::schema::FieldSchema;

const API_KEY_HEADER: &str = "api-key";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

/// Cut `text` to at most `max_chars` characters, marking the cut with `...`.
pub fn truncate_input(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}

/// Sends the OCR text with a schema-derived system prompt to a chat
/// deployment and parses the JSON reply.
pub struct AzureOpenAiExtractor {
    client: Client,
    config: ExtractionConfig,
}

impl AzureOpenAiExtractor {
    pub fn new(config: ExtractionConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("leumi/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            self.config.endpoint.trim_end_matches('/'),
            self.config.deployment,
            self.config.api_version
        )
    }

    fn complete(&self, system: &str, user: &str) -> Result<String> {
        let request = ChatRequest {
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let url = self.completions_url();
        debug!(url = %url, deployment = %self.config.deployment, "requesting completion");

        let resp = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, &self.config.api_key)
            .json(&request)
            .send()?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            warn!(status = status.as_u16(), "completion request rejected");
            return Err(ExtractionError::Service {
                status: status.as_u16(),
                body,
            });
        }

        let reply: ChatResponse = resp
            .json()
            .map_err(|e| ExtractionError::MalformedResponse(e.to_string()))?;

        reply
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or(ExtractionError::EmptyResponse)
    }
}

impl FieldExtractor for AzureOpenAiExtractor {
    fn extract(&self, text: &str, schema: &FieldSchema) -> Result<ExtractedFieldMap> {
        let input = truncate_input(text, self.config.max_input_chars);
        let user = format!("Extract the required fields from this OCR text:\n\n{}", input);

        let raw = self.complete(&system_prompt(schema), &user)?;
        let fields = parse_response(&raw, schema)?;

        info!(fields = fields.len(), "extracted fields");
        Ok(fields)
    }
}
