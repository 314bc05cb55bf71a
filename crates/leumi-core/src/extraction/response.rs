//! Parsing of language-model JSON responses into field maps.
//!
//! Responses follow the nested layout of the claim form (`address.street`,
//! `medicalInstitutionFields.healthFundMember`, dates as
//! `{"day", "month", "year"}` objects). Flat snake_case keys and Hebrew
//! labels are accepted as well.

use serde_json::{Map, Value};

use super::Result;
use crate::error::ExtractionError;
use crate::models::record::ExtractedFieldMap;
use crate::schema::{FieldDefinition, FieldSchema};

/// Remove a surrounding markdown code fence, with or without a language tag.
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    // Drop the info string ("json") up to the first newline.
    let body = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest.trim_start_matches("json"),
    };
    body.trim_end().trim_end_matches("```").trim()
}

/// Parse a raw model response into the raw values of `schema`'s fields.
pub fn parse_response(raw: &str, schema: &FieldSchema) -> Result<ExtractedFieldMap> {
    let body = strip_code_fences(raw);
    if body.is_empty() {
        return Err(ExtractionError::EmptyResponse);
    }

    let value: Value =
        serde_json::from_str(body).map_err(|e| ExtractionError::MalformedResponse(e.to_string()))?;
    match value {
        Value::Object(map) => Ok(flatten(&map, schema)),
        _ => Err(ExtractionError::NotAnObject),
    }
}

/// Pick each schema field out of a parsed response object.
pub fn flatten(object: &Map<String, Value>, schema: &FieldSchema) -> ExtractedFieldMap {
    schema
        .iter()
        .filter_map(|def| {
            lookup(object, def)
                .and_then(scalar_text)
                .map(|text| (def.key, text))
        })
        .collect()
}

fn lookup<'a>(object: &'a Map<String, Value>, def: &FieldDefinition) -> Option<&'a Value> {
    object
        .get(def.key.as_str())
        .or_else(|| follow_path(object, def.json_path))
        .or_else(|| find_label(object, def.label.he))
}

fn follow_path<'a>(object: &'a Map<String, Value>, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let first = object.get(segments.next()?)?;
    segments.try_fold(first, |value, segment| value.as_object()?.get(segment))
}

/// Depth-first search for a Hebrew label key.
fn find_label<'a>(object: &'a Map<String, Value>, label: &str) -> Option<&'a Value> {
    if let Some(value) = object.get(label) {
        return Some(value);
    }
    object
        .values()
        .filter_map(Value::as_object)
        .find_map(|nested| find_label(nested, label))
}

/// Text of a leaf value; `None` for nulls, blanks and non-scalar values.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Object(map) => date_parts(map),
        Value::Null | Value::Array(_) => None,
    }
}

/// Join a `{"day", "month", "year"}` object as `day/month/year`.
fn date_parts(map: &Map<String, Value>) -> Option<String> {
    let part = |name: &str| map.get(name).and_then(scalar_text).unwrap_or_default();
    let (day, month, year) = (part("day"), part("month"), part("year"));

    if day.is_empty() && month.is_empty() && year.is_empty() {
        return None;
    }
    Some(format!("{}/{}/{}", day, month, year))
}
