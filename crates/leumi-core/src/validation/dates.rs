//! Date plausibility and ordering checks.

use chrono::Datelike;

use super::ValidationContext;
use crate::models::record::{FieldValue, NormalizedValue, ValidationIssue};
use crate::schema::{FieldKey, FieldType};

/// Rule for every date field of the schema, plus the cross-field ordering
/// constraints between birth, injury, filling and clinic receipt dates.
pub fn check(ctx: &ValidationContext<'_>) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    let min_year = ctx.config.min_year;
    let max_year = ctx
        .reference_date
        .year()
        .saturating_add(ctx.config.max_future_years);

    for def in ctx.schema.iter().filter(|d| d.field_type == FieldType::Date) {
        match ctx.record.get(def.key) {
            Some(FieldValue::Unparseable { raw }) => {
                issues.push(ValidationIssue::error(
                    def.key,
                    format!("'{}' is not a recognizable date", raw),
                ));
            }
            Some(FieldValue::Present(NormalizedValue::Date(date))) => {
                let year = date.year();
                if year < min_year {
                    issues.push(ValidationIssue::error(
                        def.key,
                        format!("year {} is before {}", year, min_year),
                    ));
                } else if year > max_year {
                    issues.push(ValidationIssue::error(
                        def.key,
                        format!("year {} is after {}", year, max_year),
                    ));
                }
            }
            _ => {}
        }
    }

    let birth = ctx.record.date(FieldKey::DateOfBirth);
    let injury = ctx.record.date(FieldKey::DateOfInjury);
    let filled = ctx.record.date(FieldKey::FormFillingDate);
    let received = ctx.record.date(FieldKey::FormReceiptDateAtClinic);

    if let (Some(injury), Some(filled)) = (injury, filled) {
        if injury > filled {
            issues.push(ValidationIssue::error(
                FieldKey::DateOfInjury,
                format!(
                    "date of injury {} is after the form filling date {}",
                    injury, filled
                ),
            ));
        }
    }

    if let (Some(birth), Some(injury)) = (birth, injury) {
        if birth > injury {
            issues.push(ValidationIssue::error(
                FieldKey::DateOfBirth,
                format!("date of birth {} is after the date of injury {}", birth, injury),
            ));
        }
    }

    if let (Some(filled), Some(received)) = (filled, received) {
        if received < filled {
            issues.push(ValidationIssue::warning(
                FieldKey::FormReceiptDateAtClinic,
                format!(
                    "clinic receipt date {} is before the form filling date {}",
                    received, filled
                ),
            ));
        }
    }

    issues
}
