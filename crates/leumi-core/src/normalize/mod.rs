//! Per-field normalization of extracted values.
//!
//! Normalization never fails: a value that cannot be brought into its
//! declared type is kept as [`FieldValue::Unparseable`] for the validators
//! to report.

pub mod dates;
pub mod patterns;
pub mod text;

pub use dates::{parse_date, parse_time};
pub use text::{clean_text, fold_digits};

use tracing::debug;

use crate::models::record::{ExtractedFieldMap, FieldValue, NormalizedRecord, NormalizedValue};
use crate::schema::{DigitFormat, FieldSchema, FieldType};

use patterns::DIGIT_SEPARATORS;

/// Normalize every schema field of `fields`, in schema order.
///
/// Keys of `fields` outside the schema are ignored; schema keys missing from
/// `fields` become [`FieldValue::Absent`].
pub fn normalize_record(schema: &FieldSchema, fields: &ExtractedFieldMap) -> NormalizedRecord {
    let entries = schema
        .iter()
        .map(|def| {
            let value = normalize_field(def.field_type, fields.get(def.key));
            if let FieldValue::Unparseable { raw } = &value {
                debug!(field = %def.key, raw = %raw, "value could not be normalized");
            }
            (def.key, value)
        })
        .collect();

    NormalizedRecord::from_entries(entries)
}

/// Normalize a single raw value according to its declared type.
pub fn normalize_field(field_type: FieldType, raw: Option<&str>) -> FieldValue {
    let cleaned = match raw.map(clean_text) {
        Some(s) if !s.is_empty() => s,
        _ => return FieldValue::Absent,
    };

    let value = match field_type {
        FieldType::Text => Some(NormalizedValue::Text(cleaned.clone())),
        FieldType::Digits(format) => normalize_digits(&cleaned, format).map(NormalizedValue::Digits),
        FieldType::Date => parse_date(&cleaned).map(NormalizedValue::Date),
        FieldType::Time => parse_time(&cleaned).map(NormalizedValue::Time),
        FieldType::Choice(choices) => choices
            .iter()
            .find(|c| c.matches(&cleaned))
            .map(|c| NormalizedValue::Choice(c.value)),
    };

    match value {
        Some(v) => FieldValue::Present(v),
        None => FieldValue::Unparseable { raw: cleaned },
    }
}

/// Strip separators from a digit string; `None` if anything else remains.
pub fn normalize_digits(input: &str, format: DigitFormat) -> Option<String> {
    let folded = fold_digits(input);
    let digits = DIGIT_SEPARATORS.replace_all(&folded, "").to_string();

    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    match format {
        DigitFormat::Plain => Some(digits),
        DigitFormat::Phone => Some(domestic_phone(digits)),
    }
}

/// Rewrite `972…` / `00972…` international numbers to the domestic `0…` form.
fn domestic_phone(digits: String) -> String {
    let national = digits
        .strip_prefix("00972")
        .or_else(|| digits.strip_prefix("972"))
        .filter(|rest| (8..=9).contains(&rest.len()) && !rest.starts_with('0'))
        .map(|rest| format!("0{}", rest));

    national.unwrap_or(digits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldKey, GENDERS, HEALTH_FUNDS};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn digits(s: &str) -> FieldValue {
        FieldValue::Present(NormalizedValue::Digits(s.to_string()))
    }

    #[test]
    fn test_absent_and_empty_are_absent() {
        assert_eq!(normalize_field(FieldType::Text, None), FieldValue::Absent);
        assert_eq!(normalize_field(FieldType::Text, Some("")), FieldValue::Absent);
        assert_eq!(normalize_field(FieldType::Date, Some("  \u{200F} ")), FieldValue::Absent);
    }

    #[test]
    fn test_digit_strings_keep_leading_zeros() {
        let id = FieldType::Digits(DigitFormat::Plain);
        assert_eq!(normalize_field(id, Some("012-345 678")), digits("012345678"));
        assert_eq!(normalize_field(id, Some("０１２３")), digits("0123"));
    }

    #[test]
    fn test_digit_strings_reject_letters() {
        let id = FieldType::Digits(DigitFormat::Plain);
        assert_eq!(
            normalize_field(id, Some("12a45")),
            FieldValue::Unparseable { raw: "12a45".into() }
        );
        assert!(matches!(
            normalize_field(id, Some("--")),
            FieldValue::Unparseable { .. }
        ));
    }

    #[test]
    fn test_phone_international_prefix() {
        let phone = FieldType::Digits(DigitFormat::Phone);
        assert_eq!(normalize_field(phone, Some("+972-52-123-4567")), digits("0521234567"));
        assert_eq!(normalize_field(phone, Some("00972 2 555 1234")), digits("025551234"));
        assert_eq!(normalize_field(phone, Some("(052) 1234567")), digits("0521234567"));
        // Too short to be an international number; left alone
        assert_eq!(normalize_field(phone, Some("9721234")), digits("9721234"));
    }

    #[test]
    fn test_dates_normalize_to_same_value() {
        let expected = FieldValue::Present(NormalizedValue::Date(
            NaiveDate::from_ymd_opt(1990, 3, 15).unwrap(),
        ));
        for input in ["15/03/1990", "15-03-1990", "15.03.1990", "15 במרץ 1990"] {
            assert_eq!(normalize_field(FieldType::Date, Some(input)), expected);
        }
        assert!(matches!(
            normalize_field(FieldType::Date, Some("sometime in spring")),
            FieldValue::Unparseable { .. }
        ));
    }

    #[test]
    fn test_choices() {
        assert_eq!(
            normalize_field(FieldType::Choice(GENDERS), Some(" נקבה ")),
            FieldValue::Present(NormalizedValue::Choice("female"))
        );
        assert_eq!(
            normalize_field(FieldType::Choice(HEALTH_FUNDS), Some("מכבי")),
            FieldValue::Present(NormalizedValue::Choice("maccabi"))
        );
        assert!(matches!(
            normalize_field(FieldType::Choice(GENDERS), Some("other")),
            FieldValue::Unparseable { .. }
        ));
    }

    #[test]
    fn test_record_has_entry_for_every_schema_key() {
        let schema = FieldSchema::national_insurance();
        let fields = ExtractedFieldMap::new().with(FieldKey::FirstName, "  דוד  ");
        let record = normalize_record(&schema, &fields);

        assert_eq!(record.len(), schema.len());
        for def in schema.iter() {
            assert!(record.get(def.key).is_some());
        }
        assert_eq!(
            record.value(FieldKey::FirstName),
            Some(&NormalizedValue::Text("דוד".into()))
        );
        assert_eq!(record.get(FieldKey::LastName), Some(&FieldValue::Absent));
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let schema = FieldSchema::national_insurance();
        let fields = ExtractedFieldMap::new()
            .with(FieldKey::LastName, " כהן ")
            .with(FieldKey::IdNumber, "12345678-2")
            .with(FieldKey::Gender, "ז")
            .with(FieldKey::DateOfBirth, "15.3.90")
            .with(FieldKey::MobilePhone, "+972 54 765 4321")
            .with(FieldKey::TimeOfInjury, "08.15:30")
            .with(FieldKey::DateOfInjury, "not a date")
            .with(FieldKey::HealthFundMember, "כללית");

        let once = normalize_record(&schema, &fields);
        let twice = normalize_record(&schema, &once.to_field_map());
        assert_eq!(once, twice);
    }
}
