//! Field extraction from recognized text.

#[cfg(feature = "azure")]
mod openai;
pub mod prompt;
pub mod response;

#[cfg(feature = "azure")]
pub use openai::AzureOpenAiExtractor;
pub use response::{parse_response, strip_code_fences};

use crate::error::ExtractionError;
use crate::models::record::ExtractedFieldMap;
use crate::schema::FieldSchema;

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Maps OCR text to raw field values.
///
/// Keys the schema does not know are dropped. A schema field missing from
/// the output is absent, not an error.
pub trait FieldExtractor: Send + Sync {
    fn extract(&self, text: &str, schema: &FieldSchema) -> Result<ExtractedFieldMap>;
}

impl<T: FieldExtractor + ?Sized> FieldExtractor for Box<T> {
    fn extract(&self, text: &str, schema: &FieldSchema) -> Result<ExtractedFieldMap> {
        (**self).extract(text, schema)
    }
}

impl<T: FieldExtractor + ?Sized> FieldExtractor for std::sync::Arc<T> {
    fn extract(&self, text: &str, schema: &FieldSchema) -> Result<ExtractedFieldMap> {
        (**self).extract(text, schema)
    }
}
