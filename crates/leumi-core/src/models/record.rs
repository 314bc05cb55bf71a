//! Per-document data: extracted fields, normalized record, issues and result.

use std::collections::HashMap;
use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

use crate::schema::FieldKey;

/// Raw field values as returned by the extraction collaborator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedFieldMap {
    values: HashMap<FieldKey, String>,
}

impl ExtractedFieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a raw value, replacing any previous one.
    pub fn insert(&mut self, key: FieldKey, value: impl Into<String>) {
        self.values.insert(key, value.into());
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, key: FieldKey, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: FieldKey) -> Option<&str> {
        self.values.get(&key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(FieldKey, String)> for ExtractedFieldMap {
    fn from_iter<I: IntoIterator<Item = (FieldKey, String)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// A normalized value of the field's declared type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizedValue {
    Text(String),
    Digits(String),
    Date(NaiveDate),
    Time(NaiveTime),
    Choice(&'static str),
}

impl NormalizedValue {
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            NormalizedValue::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// Digit or text content; `None` for dates, times and choices.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            NormalizedValue::Text(s) | NormalizedValue::Digits(s) => Some(s.as_str()),
            NormalizedValue::Choice(s) => Some(*s),
            _ => None,
        }
    }
}

impl fmt::Display for NormalizedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NormalizedValue::Text(s) | NormalizedValue::Digits(s) => f.write_str(s),
            NormalizedValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            NormalizedValue::Time(t) => write!(f, "{}", t.format("%H:%M")),
            NormalizedValue::Choice(c) => f.write_str(c),
        }
    }
}

impl Serialize for NormalizedValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Entry of a [`NormalizedRecord`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Provided and normalized.
    Present(NormalizedValue),
    /// Not provided.
    Absent,
    /// Provided but could not be normalized to the declared type.
    Unparseable { raw: String },
}

impl FieldValue {
    pub fn is_present(&self) -> bool {
        matches!(self, FieldValue::Present(_))
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, FieldValue::Absent)
    }

    pub fn value(&self) -> Option<&NormalizedValue> {
        match self {
            FieldValue::Present(v) => Some(v),
            _ => None,
        }
    }

    /// Text that reproduces this entry when normalized again.
    pub fn source_text(&self) -> Option<String> {
        match self {
            FieldValue::Present(v) => Some(v.to_string()),
            FieldValue::Absent => None,
            FieldValue::Unparseable { raw } => Some(raw.clone()),
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Present(v) => v.serialize(serializer),
            FieldValue::Absent | FieldValue::Unparseable { .. } => serializer.serialize_none(),
        }
    }
}

/// One entry per schema field, in schema order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedRecord {
    entries: Vec<(FieldKey, FieldValue)>,
}

impl NormalizedRecord {
    pub(crate) fn from_entries(entries: Vec<(FieldKey, FieldValue)>) -> Self {
        Self { entries }
    }

    /// Entry for `key`, or `None` if the key is not part of the schema.
    pub fn get(&self, key: FieldKey) -> Option<&FieldValue> {
        self.entries.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    /// Normalized value for `key`, if present.
    pub fn value(&self, key: FieldKey) -> Option<&NormalizedValue> {
        self.get(key).and_then(FieldValue::value)
    }

    pub fn date(&self, key: FieldKey) -> Option<NaiveDate> {
        self.value(key).and_then(NormalizedValue::as_date)
    }

    pub fn is_present(&self, key: FieldKey) -> bool {
        self.get(key).is_some_and(FieldValue::is_present)
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldKey, &FieldValue)> {
        self.entries.iter().map(|(k, v)| (*k, v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render the record back into raw field text.
    pub fn to_field_map(&self) -> ExtractedFieldMap {
        self.entries
            .iter()
            .filter_map(|(k, v)| v.source_text().map(|text| (*k, text)))
            .collect()
    }
}

impl Serialize for NormalizedRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key.as_str(), value)?;
        }
        map.end()
    }
}

/// Severity of a validation issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => f.write_str("error"),
            Severity::Warning => f.write_str("warning"),
        }
    }
}

/// A problem found on one field. Never fatal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub field: FieldKey,
    pub severity: Severity,
    pub message: String,
}

impl ValidationIssue {
    pub fn error(field: FieldKey, message: impl Into<String>) -> Self {
        Self {
            field,
            severity: Severity::Error,
            message: message.into(),
        }
    }

    pub fn warning(field: FieldKey, message: impl Into<String>) -> Self {
        Self {
            field,
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.field, self.message)
    }
}

/// Final output of one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationResult {
    #[serde(rename = "fields")]
    record: NormalizedRecord,
    issues: Vec<ValidationIssue>,
    completeness_score: f64,
}

impl ValidationResult {
    pub(crate) fn new(
        record: NormalizedRecord,
        issues: Vec<ValidationIssue>,
        completeness_score: f64,
    ) -> Self {
        Self {
            record,
            issues,
            completeness_score,
        }
    }

    pub fn record(&self) -> &NormalizedRecord {
        &self.record
    }

    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    pub fn completeness_score(&self) -> f64 {
        self.completeness_score
    }

    pub fn errors(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| i.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| !i.is_error())
    }

    pub fn has_errors(&self) -> bool {
        self.issues.iter().any(ValidationIssue::is_error)
    }

    /// Short human-readable digest listing at most five issues.
    pub fn summary(&self) -> String {
        if self.issues.is_empty() {
            return "All validations passed successfully.".to_string();
        }

        let mut summary = format!("Found {} validation issues:\n", self.issues.len());
        for issue in self.issues.iter().take(5) {
            summary.push_str(&format!("- {}: {}\n", issue.field, issue.message));
        }
        if self.issues.len() > 5 {
            summary.push_str(&format!("... and {} more issues.", self.issues.len() - 5));
        }
        summary
    }
}
