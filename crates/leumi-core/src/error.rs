//! Error types for the leumi-core library.
//!
//! Only failures that halt the pipeline live here. Per-field problems are
//! reported as [`ValidationIssue`](crate::models::record::ValidationIssue)s.

use thiserror::Error;

/// Main error type for the leumi library.
#[derive(Error, Debug)]
pub enum LeumiError {
    /// The OCR step produced no text.
    #[error("empty input: OCR produced no text")]
    EmptyInput,

    /// Document analysis (OCR) failed.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// Field extraction failed or returned an unusable structure.
    #[error("extraction failed: {0}")]
    Extraction(#[from] ExtractionError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised by the document analysis service.
#[derive(Error, Debug)]
pub enum OcrError {
    /// Transport-level failure.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// The service answered with a non-success status.
    #[error("service returned {status}: {body}")]
    Service { status: u16, body: String },

    /// The analysis operation finished in the `failed` state.
    #[error("analysis failed: {0}")]
    AnalysisFailed(String),

    /// The analysis operation did not finish within the polling budget.
    #[error("analysis did not complete after {attempts} polls")]
    Timeout { attempts: u32 },

    /// The service response could not be decoded.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

/// Errors raised by the field extraction (language model) collaborator.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// Transport-level failure.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// The service answered with a non-success status.
    #[error("service returned {status}: {body}")]
    Service { status: u16, body: String },

    /// The model returned no content.
    #[error("model returned an empty response")]
    EmptyResponse,

    /// The model output is not valid JSON.
    #[error("response is not valid JSON: {0}")]
    MalformedResponse(String),

    /// The model output is JSON, but not an object of fields.
    #[error("response is not a JSON object")]
    NotAnObject,
}

#[cfg(feature = "azure")]
impl From<reqwest::Error> for OcrError {
    fn from(err: reqwest::Error) -> Self {
        OcrError::Http(err.to_string())
    }
}

#[cfg(feature = "azure")]
impl From<reqwest::Error> for ExtractionError {
    fn from(err: reqwest::Error) -> Self {
        ExtractionError::Http(err.to_string())
    }
}

/// Result type for the leumi library.
pub type Result<T> = std::result::Result<T, LeumiError>;
