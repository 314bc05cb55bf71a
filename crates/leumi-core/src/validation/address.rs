//! Address completeness and postal code checks.

use super::ValidationContext;
use crate::models::record::{FieldValue, ValidationIssue};
use crate::schema::FieldKey;

/// Subfields of the claimant's address.
pub const ADDRESS_FIELDS: [FieldKey; 7] = [
    FieldKey::Street,
    FieldKey::HouseNumber,
    FieldKey::Entrance,
    FieldKey::Apartment,
    FieldKey::City,
    FieldKey::PostalCode,
    FieldKey::PoBox,
];

/// Israeli postal codes have 7 digits since 2013.
pub const POSTAL_CODE_LENGTH: usize = 7;
const LEGACY_POSTAL_CODE_LENGTH: usize = 5;

/// Address-section rule.
///
/// The section is optional: no issue when every subfield is absent. Once
/// anything is filled in, street and city are both expected.
pub fn check(ctx: &ValidationContext<'_>) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    let any_provided = ADDRESS_FIELDS
        .iter()
        .filter_map(|k| ctx.record.get(*k))
        .any(|v| !v.is_absent());
    if !any_provided {
        return issues;
    }

    let missing: Vec<FieldKey> = [FieldKey::Street, FieldKey::City]
        .into_iter()
        .filter(|k| ctx.schema.contains(*k) && !ctx.record.is_present(*k))
        .collect();

    if let Some(first) = missing.first() {
        let names: Vec<&str> = missing.iter().map(|k| k.definition().label.en).collect();
        issues.push(ValidationIssue::warning(
            *first,
            format!("incomplete address: missing {}", names.join(" and ").to_lowercase()),
        ));
    }

    match ctx.record.get(FieldKey::PostalCode) {
        Some(FieldValue::Present(v)) => {
            let len = v.as_str().map(str::len).unwrap_or_default();
            if len == LEGACY_POSTAL_CODE_LENGTH {
                issues.push(ValidationIssue::warning(
                    FieldKey::PostalCode,
                    "legacy 5-digit postal code; current codes have 7 digits",
                ));
            } else if len != POSTAL_CODE_LENGTH {
                issues.push(ValidationIssue::error(
                    FieldKey::PostalCode,
                    format!("postal code has {} digits; expected {}", len, POSTAL_CODE_LENGTH),
                ));
            }
        }
        Some(FieldValue::Unparseable { raw }) => {
            issues.push(ValidationIssue::error(
                FieldKey::PostalCode,
                format!("postal code '{}' is not numeric", raw),
            ));
        }
        _ => {}
    }

    if let Some(FieldValue::Unparseable { raw }) = ctx.record.get(FieldKey::PoBox) {
        issues.push(ValidationIssue::warning(
            FieldKey::PoBox,
            format!("P.O. box '{}' is not numeric", raw),
        ));
    }

    issues
}
