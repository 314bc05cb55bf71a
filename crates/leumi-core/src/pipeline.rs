//! End-to-end claim processing: OCR, extraction, normalization, validation
//! and scoring.

use std::time::Instant;

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::error::{LeumiError, Result};
use crate::extraction::FieldExtractor;
use crate::models::config::ValidationConfig;
use crate::models::record::{ExtractedFieldMap, ValidationResult};
use crate::normalize::normalize_record;
use crate::ocr::OcrService;
use crate::schema::FieldSchema;
use crate::scoring::completeness_score;
use crate::validation::{ValidationContext, Validators};

/// The offline tail of the pipeline: normalize, validate, score.
#[derive(Debug, Clone)]
pub struct ClaimValidator {
    schema: FieldSchema,
    config: ValidationConfig,
    validators: Validators,
    reference_date: NaiveDate,
}

impl ClaimValidator {
    pub fn new(schema: FieldSchema, config: ValidationConfig, reference_date: NaiveDate) -> Self {
        Self {
            validators: Validators::for_schema(&schema),
            schema,
            config,
            reference_date,
        }
    }

    pub fn schema(&self) -> &FieldSchema {
        &self.schema
    }

    pub fn reference_date(&self) -> NaiveDate {
        self.reference_date
    }

    pub fn validate(&self, fields: &ExtractedFieldMap) -> ValidationResult {
        let record = normalize_record(&self.schema, fields);

        let ctx = ValidationContext {
            schema: &self.schema,
            record: &record,
            config: &self.config,
            reference_date: self.reference_date,
        };
        let issues = self.validators.run(&ctx);
        let score = completeness_score(&self.schema, &record, &issues);

        info!(issues = issues.len(), score, "record validated");
        ValidationResult::new(record, issues, score)
    }
}

impl Default for ClaimValidator {
    /// Standard schema, default thresholds, today as the reference date.
    fn default() -> Self {
        Self::new(
            FieldSchema::national_insurance(),
            ValidationConfig::default(),
            chrono::Local::now().date_naive(),
        )
    }
}

/// Processes one claim document at a time.
///
/// Everything the pipeline depends on is handed in at construction; it keeps
/// no mutable state between documents.
pub struct ClaimPipeline {
    validator: ClaimValidator,
    ocr: Box<dyn OcrService>,
    extractor: Box<dyn FieldExtractor>,
}

impl ClaimPipeline {
    pub fn new(
        validator: ClaimValidator,
        ocr: impl OcrService + 'static,
        extractor: impl FieldExtractor + 'static,
    ) -> Self {
        Self {
            validator,
            ocr: Box::new(ocr),
            extractor: Box::new(extractor),
        }
    }

    pub fn schema(&self) -> &FieldSchema {
        self.validator.schema()
    }

    /// Run the whole pipeline on a document.
    pub fn process(&self, bytes: &[u8], content_type: &str) -> Result<ValidationResult> {
        let start = Instant::now();
        info!(bytes = bytes.len(), content_type, "analyzing document");

        let text = self.ocr.analyze(bytes, content_type)?;
        debug!(chars = text.chars().count(), "OCR finished");

        let result = self.process_text(&text)?;
        info!(
            elapsed_ms = start.elapsed().as_millis() as u64,
            score = result.completeness_score(),
            "document processed"
        );
        Ok(result)
    }

    /// Run extraction and validation on already recognized text.
    ///
    /// Blank text fails with [`LeumiError::EmptyInput`] before the
    /// extractor is called.
    pub fn process_text(&self, text: &str) -> Result<ValidationResult> {
        if text.trim().is_empty() {
            return Err(LeumiError::EmptyInput);
        }

        let fields = self.extractor.extract(text, self.validator.schema())?;
        info!(fields = fields.len(), "fields extracted");

        Ok(self.validate_fields(&fields))
    }

    /// Normalize, validate and score raw field values.
    pub fn validate_fields(&self, fields: &ExtractedFieldMap) -> ValidationResult {
        self.validator.validate(fields)
    }
}
