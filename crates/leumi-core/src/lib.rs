//! Core library for Israeli National Insurance claim-form processing.
//!
//! This crate provides:
//! - The claim-form field schema with bilingual labels
//! - OCR and language-model extraction behind swappable traits
//!   (Azure Document Intelligence and Azure OpenAI clients with the `azure` feature)
//! - Normalization of dates, times, digit strings and enumerations
//! - Rule-based validation (ID check digit, phones, dates, address)
//! - Completeness scoring

pub mod error;
pub mod extraction;
pub mod models;
pub mod normalize;
pub mod ocr;
pub mod pipeline;
pub mod schema;
pub mod scoring;
pub mod validation;

pub use error::{ExtractionError, LeumiError, OcrError, Result};
pub use extraction::FieldExtractor;
pub use models::config::{ExtractionConfig, LeumiConfig, OcrConfig, ValidationConfig};
pub use models::record::{
    ExtractedFieldMap, FieldValue, NormalizedRecord, NormalizedValue, Severity, ValidationIssue,
    ValidationResult,
};
pub use ocr::OcrService;
pub use pipeline::{ClaimPipeline, ClaimValidator};
pub use schema::{Category, FieldDefinition, FieldKey, FieldSchema, FieldType};

#[cfg(feature = "azure")]
pub use extraction::AzureOpenAiExtractor;
#[cfg(feature = "azure")]
pub use ocr::DocumentIntelligenceClient;
