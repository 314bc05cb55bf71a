//! Completeness scoring.

use std::collections::HashSet;

use crate::models::record::{NormalizedRecord, ValidationIssue};
use crate::schema::{FieldKey, FieldSchema};

/// Fraction of required fields that are present and carry no error.
///
/// Warnings do not count against a field. A schema with no required fields
/// scores `1.0`. The result is always within `[0.0, 1.0]`.
pub fn completeness_score(
    schema: &FieldSchema,
    record: &NormalizedRecord,
    issues: &[ValidationIssue],
) -> f64 {
    let required: Vec<FieldKey> = schema.required().map(|def| def.key).collect();
    if required.is_empty() {
        return 1.0;
    }

    let with_errors: HashSet<FieldKey> = issues
        .iter()
        .filter(|issue| issue.is_error())
        .map(|issue| issue.field)
        .collect();

    let satisfied = required
        .iter()
        .filter(|key| record.is_present(**key) && !with_errors.contains(*key))
        .count();

    satisfied as f64 / required.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::ExtractedFieldMap;
    use crate::normalize::normalize_record;
    use pretty_assertions::assert_eq;

    fn three_required() -> FieldSchema {
        FieldSchema::new(vec![
            FieldKey::LastName.definition().required(),
            FieldKey::FirstName.definition().required(),
            FieldKey::IdNumber.definition().required(),
            FieldKey::MobilePhone.definition(),
        ])
        .unwrap()
    }

    #[test]
    fn test_all_required_present() {
        let schema = three_required();
        let map = ExtractedFieldMap::new()
            .with(FieldKey::LastName, "לוי")
            .with(FieldKey::FirstName, "אבי")
            .with(FieldKey::IdNumber, "123456782");
        let record = normalize_record(&schema, &map);
        assert_eq!(completeness_score(&schema, &record, &[]), 1.0);
    }

    #[test]
    fn test_error_excludes_field_but_warning_does_not() {
        let schema = three_required();
        let map = ExtractedFieldMap::new()
            .with(FieldKey::FirstName, "אבי")
            .with(FieldKey::IdNumber, "123456789");
        let record = normalize_record(&schema, &map);
        let issues = vec![
            ValidationIssue::error(FieldKey::LastName, "required field missing"),
            ValidationIssue::error(FieldKey::IdNumber, "bad check digit"),
            ValidationIssue::warning(FieldKey::FirstName, "odd"),
            ValidationIssue::warning(FieldKey::MobilePhone, "no phone number provided"),
        ];

        let score = completeness_score(&schema, &record, &issues);
        assert!((score - 1.0 / 3.0).abs() < 1e-9, "{}", score);
    }

    #[test]
    fn test_new_error_on_clean_field_lowers_score() {
        let schema = three_required();
        let map = ExtractedFieldMap::new()
            .with(FieldKey::LastName, "לוי")
            .with(FieldKey::FirstName, "אבי")
            .with(FieldKey::IdNumber, "123456782");
        let record = normalize_record(&schema, &map);

        let mut issues = vec![ValidationIssue::warning(FieldKey::FirstName, "odd")];
        let before = completeness_score(&schema, &record, &issues);
        issues.push(ValidationIssue::error(FieldKey::LastName, "bad"));
        let after = completeness_score(&schema, &record, &issues);

        assert!(after < before, "{} !< {}", after, before);
    }

    #[test]
    fn test_no_required_fields_scores_one() {
        let schema = FieldSchema::new(vec![FieldKey::Signature.definition()]).unwrap();
        let record = normalize_record(&schema, &ExtractedFieldMap::new());
        assert_eq!(completeness_score(&schema, &record, &[]), 1.0);
    }

    #[test]
    fn test_empty_record_scores_zero() {
        let schema = FieldSchema::national_insurance();
        let record = normalize_record(&schema, &ExtractedFieldMap::new());
        assert_eq!(completeness_score(&schema, &record, &[]), 0.0);
    }

    #[test]
    fn test_adding_a_valid_field_never_lowers_score() {
        let schema = three_required();
        let mut map = ExtractedFieldMap::new();
        let mut last = {
            let record = normalize_record(&schema, &map);
            completeness_score(&schema, &record, &[])
        };

        for (key, value) in [
            (FieldKey::MobilePhone, "0501234567"),
            (FieldKey::LastName, "לוי"),
            (FieldKey::IdNumber, "123456782"),
            (FieldKey::FirstName, "אבי"),
        ] {
            map.insert(key, value);
            let record = normalize_record(&schema, &map);
            let score = completeness_score(&schema, &record, &[]);
            assert!(score >= last, "{} < {} after {}", score, last, key);
            assert!((0.0..=1.0).contains(&score));
            last = score;
        }
        assert_eq!(last, 1.0);
    }
}
