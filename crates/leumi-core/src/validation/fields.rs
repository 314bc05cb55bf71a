//! Presence, enum and free-text rules.

use super::ValidationContext;
use crate::models::record::{FieldValue, ValidationIssue};
use crate::schema::FieldKey;

/// Every required field must be provided.
pub fn check_required(ctx: &ValidationContext<'_>) -> Vec<ValidationIssue> {
    ctx.schema
        .required()
        .filter(|def| matches!(ctx.record.get(def.key), Some(FieldValue::Absent)))
        .map(|def| {
            ValidationIssue::error(
                def.key,
                format!("required field missing ({} / {})", def.label.en, def.label.he),
            )
        })
        .collect()
}

pub fn check_gender(ctx: &ValidationContext<'_>) -> Vec<ValidationIssue> {
    match ctx.record.get(FieldKey::Gender) {
        Some(FieldValue::Unparseable { raw }) => vec![ValidationIssue::error(
            FieldKey::Gender,
            format!("unrecognized gender '{}'", raw),
        )],
        _ => Vec::new(),
    }
}

/// Time of injury must parse; the description should say something.
pub fn check_accident(ctx: &ValidationContext<'_>) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if let Some(FieldValue::Unparseable { raw }) = ctx.record.get(FieldKey::TimeOfInjury) {
        issues.push(ValidationIssue::error(
            FieldKey::TimeOfInjury,
            format!("'{}' is not a time of day (expected HH:MM)", raw),
        ));
    }

    if let Some(FieldValue::Present(v)) = ctx.record.get(FieldKey::AccidentDescription) {
        let chars = v.as_str().map(|s| s.chars().count()).unwrap_or_default();
        if chars < ctx.config.min_description_chars {
            issues.push(ValidationIssue::warning(
                FieldKey::AccidentDescription,
                format!("accident description is very short ({} characters)", chars),
            ));
        }
    }

    issues
}

pub fn check_health_fund(ctx: &ValidationContext<'_>) -> Vec<ValidationIssue> {
    match ctx.record.get(FieldKey::HealthFundMember) {
        Some(FieldValue::Unparseable { raw }) => vec![ValidationIssue::warning(
            FieldKey::HealthFundMember,
            format!("unknown health fund '{}'", raw),
        )],
        _ => Vec::new(),
    }
}
