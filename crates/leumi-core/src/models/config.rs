//! Configuration structures for the claim-form pipeline.

use serde::{Deserialize, Serialize};

use crate::error::LeumiError;

/// Main configuration for the leumi pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LeumiConfig {
    /// Document analysis (OCR) service configuration.
    pub ocr: OcrConfig,

    /// Field extraction (language model) configuration.
    pub extraction: ExtractionConfig,

    /// Field validation thresholds.
    pub validation: ValidationConfig,
}

/// Azure Document Intelligence configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Service endpoint, e.g. `https://<resource>.cognitiveservices.azure.com`.
    pub endpoint: String,

    /// Subscription key.
    pub api_key: String,

    /// Analysis model.
    pub model_id: String,

    /// REST API version.
    pub api_version: String,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,

    /// Delay between polls of the analysis operation.
    pub poll_interval_ms: u64,

    /// Maximum number of polls before giving up.
    pub max_polls: u32,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            api_key: String::new(),
            model_id: "prebuilt-layout".to_string(),
            api_version: "2024-11-30".to_string(),
            timeout_secs: 60,
            poll_interval_ms: 1000,
            max_polls: 60,
        }
    }
}

/// Azure OpenAI configuration for field extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Service endpoint, e.g. `https://<resource>.openai.azure.com`.
    pub endpoint: String,

    /// API key.
    pub api_key: String,

    /// Chat model deployment name.
    pub deployment: String,

    /// REST API version.
    pub api_version: String,

    /// Sampling temperature.
    pub temperature: f32,

    /// Maximum tokens in the completion.
    pub max_tokens: u32,

    /// OCR text beyond this many characters is truncated before prompting.
    pub max_input_chars: usize,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            api_key: String::new(),
            deployment: "gpt-4o".to_string(),
            api_version: "2024-02-01".to_string(),
            temperature: 0.0,
            max_tokens: 2000,
            max_input_chars: 8000,
            timeout_secs: 60,
        }
    }
}

/// Thresholds used by the field validators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Earliest plausible year for any date on the form.
    pub min_year: i32,

    /// Latest plausible year, relative to the reference year.
    pub max_future_years: i32,

    /// Accident descriptions shorter than this are flagged.
    pub min_description_chars: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            min_year: 1900,
            max_future_years: 1,
            min_description_chars: 10,
        }
    }
}

impl LeumiConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }

    /// Override service settings from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_vars(|name| std::env::var(name).ok());
    }

    /// Override service settings from a variable lookup.
    pub fn apply_vars<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let set = |target: &mut String, name: &str| {
            if let Some(value) = lookup(name).filter(|v| !v.trim().is_empty()) {
                *target = value.trim().to_string();
            }
        };

        set(&mut self.ocr.endpoint, "DOCUMENT_INTELLIGENCE_ENDPOINT");
        set(&mut self.ocr.api_key, "DOCUMENT_INTELLIGENCE_KEY");
        set(&mut self.extraction.endpoint, "AZURE_OPENAI_ENDPOINT");
        set(&mut self.extraction.api_key, "AZURE_OPENAI_KEY");
        set(&mut self.extraction.api_version, "AZURE_OPENAI_VERSION");
        set(&mut self.extraction.deployment, "AZURE_OPENAI_DEPLOYMENT_NAME");
    }

    /// Check that both services have an endpoint and a key.
    pub fn validate_credentials(&self) -> Result<(), LeumiError> {
        let missing: Vec<&str> = [
            ("DOCUMENT_INTELLIGENCE_ENDPOINT", &self.ocr.endpoint),
            ("DOCUMENT_INTELLIGENCE_KEY", &self.ocr.api_key),
            ("AZURE_OPENAI_ENDPOINT", &self.extraction.endpoint),
            ("AZURE_OPENAI_KEY", &self.extraction.api_key),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(LeumiError::Config(format!(
                "missing required settings: {}",
                missing.join(", ")
            )))
        }
    }
}
