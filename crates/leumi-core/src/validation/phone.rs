//! Israeli phone number validation.
//!
//! Landline: 9 digits, `0` followed by an area code digit
//! ([`LANDLINE_AREA_CODES`]). Mobile: 10 digits, `05` followed by a carrier
//! digit ([`MOBILE_CARRIER_DIGITS`]). `07x` numbers are not accepted as
//! landlines.

use super::ValidationContext;
use crate::models::record::{FieldValue, ValidationIssue};
use crate::schema::FieldKey;

/// Second digit of a landline number: 02 Jerusalem, 03 Tel Aviv, 04 Haifa
/// and the north, 08 the south, 09 the Sharon.
pub const LANDLINE_AREA_CODES: [char; 5] = ['2', '3', '4', '8', '9'];

/// Third digit of a mobile number: 050, 052, 053, 054, 055, 058.
pub const MOBILE_CARRIER_DIGITS: [char; 6] = ['0', '2', '3', '4', '5', '8'];

/// Kind of a well-formed Israeli phone number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhoneKind {
    Landline,
    Mobile,
}

pub fn is_landline(digits: &str) -> bool {
    let chars: Vec<char> = digits.chars().collect();
    chars.len() == 9
        && chars.iter().all(|c| c.is_ascii_digit())
        && chars[0] == '0'
        && LANDLINE_AREA_CODES.contains(&chars[1])
}

pub fn is_mobile(digits: &str) -> bool {
    let chars: Vec<char> = digits.chars().collect();
    chars.len() == 10
        && chars.iter().all(|c| c.is_ascii_digit())
        && chars[0] == '0'
        && chars[1] == '5'
        && MOBILE_CARRIER_DIGITS.contains(&chars[2])
}

/// Contact-section rule for both phone fields.
pub fn check(ctx: &ValidationContext<'_>) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    let phones = [
        (FieldKey::LandlinePhone, PhoneKind::Landline),
        (FieldKey::MobilePhone, PhoneKind::Mobile),
    ];

    let in_schema: Vec<(FieldKey, PhoneKind, &FieldValue)> = phones
        .iter()
        .filter_map(|(key, kind)| ctx.record.get(*key).map(|v| (*key, *kind, v)))
        .collect();

    if in_schema.is_empty() {
        return issues;
    }

    if in_schema.iter().all(|(_, _, v)| v.is_absent()) {
        let (last_key, _, _) = in_schema[in_schema.len() - 1];
        issues.push(ValidationIssue::warning(last_key, "no phone number provided"));
        return issues;
    }

    for (key, kind, value) in in_schema {
        match value {
            FieldValue::Unparseable { raw } => {
                issues.push(ValidationIssue::error(
                    key,
                    format!("'{}' is not a phone number", raw),
                ));
            }
            FieldValue::Present(v) => {
                let digits = v.as_str().unwrap_or_default();
                let valid = match kind {
                    PhoneKind::Landline => is_landline(digits),
                    PhoneKind::Mobile => is_mobile(digits),
                };
                if !valid {
                    issues.push(ValidationIssue::error(key, invalid_message(digits, kind)));
                }
            }
            FieldValue::Absent => {}
        }
    }

    issues
}

fn invalid_message(digits: &str, kind: PhoneKind) -> String {
    match kind {
        PhoneKind::Landline => format!(
            "{} is not a valid landline number (expected 9 digits: 0 and area code 2, 3, 4, 8 or 9)",
            digits
        ),
        PhoneKind::Mobile => format!(
            "{} is not a valid mobile number (expected 10 digits starting with 050, 052, 053, 054, 055 or 058)",
            digits
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landline_numbers() {
        for n in ["021234567", "031234567", "041234567", "081234567", "091234567"] {
            assert!(is_landline(n), "{}", n);
        }
        assert!(!is_landline("071234567")); // 07x excluded
        assert!(!is_landline("011234567"));
        assert!(!is_landline("0212345678")); // 10 digits
        assert!(!is_landline("21234567"));
    }

    #[test]
    fn test_mobile_numbers() {
        for n in ["0501234567", "0521234567", "0531234567", "0541234567", "0551234567", "0581234567"] {
            assert!(is_mobile(n), "{}", n);
        }
        assert!(!is_mobile("0561234567"));
        assert!(!is_mobile("0591234567"));
        assert!(!is_mobile("052123456")); // 9 digits
        assert!(!is_mobile("0721234567"));
    }
}
