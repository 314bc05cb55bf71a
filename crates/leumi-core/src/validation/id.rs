//! Israeli ID number (Teudat Zehut) validation.

use super::ValidationContext;
use crate::models::record::{FieldValue, ValidationIssue};
use crate::schema::FieldKey;

/// Length of an Israeli ID number including the check digit.
pub const ID_LENGTH: usize = 9;

/// Left-pad an ID of up to 9 digits with zeros.
///
/// Returns `None` for empty input, non-digit content or more than 9 digits.
pub fn pad_id(id: &str) -> Option<String> {
    if id.is_empty() || id.len() > ID_LENGTH || !id.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    Some(format!("{:0>width$}", id, width = ID_LENGTH))
}

/// Validate an Israeli ID number using the check-digit algorithm.
///
/// Digits are weighted 1, 2, 1, 2, … from the left; two-digit products are
/// reduced by 9; the sum must be divisible by 10. Shorter IDs are
/// left-padded with zeros first. Spaces and dashes are ignored.
pub fn validate_israeli_id(id: &str) -> bool {
    let compact: String = id
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect();

    match pad_id(&compact) {
        Some(padded) => checksum_holds(&padded),
        None => false,
    }
}

fn checksum_holds(padded: &str) -> bool {
    let sum: u32 = padded
        .chars()
        .filter_map(|c| c.to_digit(10))
        .enumerate()
        .map(|(i, d)| {
            let product = d * (i as u32 % 2 + 1);
            if product > 9 { product - 9 } else { product }
        })
        .sum();

    sum % 10 == 0
}

/// Personal-section rule for [`FieldKey::IdNumber`].
pub fn check(ctx: &ValidationContext<'_>) -> Vec<ValidationIssue> {
    let key = FieldKey::IdNumber;

    match ctx.record.get(key) {
        Some(FieldValue::Unparseable { raw }) => vec![ValidationIssue::error(
            key,
            format!("ID number contains non-digit characters: '{}'", raw),
        )],
        Some(FieldValue::Present(value)) => {
            let digits = value.as_str().unwrap_or_default();
            if digits.len() > ID_LENGTH {
                vec![ValidationIssue::error(
                    key,
                    format!(
                        "ID number has {} digits; at most {} are allowed",
                        digits.len(),
                        ID_LENGTH
                    ),
                )]
            } else if !validate_israeli_id(digits) {
                let shown = pad_id(digits).unwrap_or_else(|| digits.to_string());
                vec![ValidationIssue::error(
                    key,
                    format!("ID number {} fails the check digit", shown),
                )]
            } else {
                Vec::new()
            }
        }
        _ => Vec::new(),
    }
}
