//! System prompt for language-model extraction.

use serde_json::{json, Map, Value};

use crate::schema::{FieldSchema, FieldType};

const INSTRUCTIONS: &str = "\
You extract fields from OCR text of an Israeli National Insurance (ביטוח לאומי) \
work-injury claim form. The form may be filled in Hebrew or English.

Rules:
- Return only a JSON object with exactly the structure below, no commentary.
- Use an empty string for any field that is not filled in on the form.
- Copy values as written; do not translate or correct them.
- Dates are split into day, month and year as written on the form.
- Text after the *Key-Value Pairs:* marker are label/value pairs detected on the form; \
prefer them when they agree with the page text.";

/// Empty response skeleton following the nested JSON paths of `schema`.
pub fn response_template(schema: &FieldSchema) -> Value {
    let mut root = Map::new();

    'fields: for def in schema.iter() {
        let leaf = match def.field_type {
            FieldType::Date => json!({"day": "", "month": "", "year": ""}),
            _ => json!(""),
        };

        let mut segments: Vec<&str> = def.json_path.split('.').collect();
        let Some(last) = segments.pop() else {
            continue;
        };

        let mut node = &mut root;
        for segment in segments {
            let entry = node
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            match entry {
                Value::Object(map) => node = map,
                // A leaf already sits on this path.
                _ => continue 'fields,
            }
        }
        node.insert(last.to_string(), leaf);
    }

    Value::Object(root)
}

/// Build the system prompt: instructions, the field glossary with both
/// labels, and the JSON template to fill.
pub fn system_prompt(schema: &FieldSchema) -> String {
    let glossary: Vec<String> = schema
        .iter()
        .map(|def| format!("- {}: {} / {}", def.json_path, def.label.he, def.label.en))
        .collect();

    let template = serde_json::to_string_pretty(&response_template(schema)).unwrap_or_default();

    format!(
        "{}\n\nFields (JSON path: Hebrew label / English label):\n{}\n\nJSON structure:\n{}",
        INSTRUCTIONS,
        glossary.join("\n"),
        template
    )
}
