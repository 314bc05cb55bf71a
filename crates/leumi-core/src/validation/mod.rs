//! Rule-based validation of normalized claim records.

pub mod address;
pub mod dates;
pub mod fields;
pub mod id;
pub mod phone;

pub use id::validate_israeli_id;
pub use phone::{is_landline, is_mobile, PhoneKind};

use chrono::NaiveDate;
use tracing::debug;

use crate::models::config::ValidationConfig;
use crate::models::record::{NormalizedRecord, ValidationIssue};
use crate::schema::{Category, FieldSchema};

/// Everything a rule may look at.
#[derive(Debug, Clone, Copy)]
pub struct ValidationContext<'a> {
    pub schema: &'a FieldSchema,
    pub record: &'a NormalizedRecord,
    pub config: &'a ValidationConfig,
    /// "Today" for date plausibility checks.
    pub reference_date: NaiveDate,
}

/// A named validation rule.
///
/// A rule is selected when the schema contains at least one of its
/// categories. An empty category list means the rule always applies.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    pub categories: &'static [Category],
    pub check: fn(&ValidationContext<'_>) -> Vec<ValidationIssue>,
}

impl Rule {
    fn applies_to(&self, categories: &[Category]) -> bool {
        self.categories.is_empty() || self.categories.iter().any(|c| categories.contains(c))
    }
}

/// All known rules, in evaluation order.
pub const RULES: &[Rule] = &[
    Rule {
        name: "required",
        categories: &[],
        check: fields::check_required,
    },
    Rule {
        name: "id_number",
        categories: &[Category::Personal],
        check: id::check,
    },
    Rule {
        name: "gender",
        categories: &[Category::Personal],
        check: fields::check_gender,
    },
    Rule {
        name: "dates",
        categories: &[Category::Personal, Category::Accident, Category::Form],
        check: dates::check,
    },
    Rule {
        name: "phones",
        categories: &[Category::Contact],
        check: phone::check,
    },
    Rule {
        name: "address",
        categories: &[Category::Address],
        check: address::check,
    },
    Rule {
        name: "accident",
        categories: &[Category::Accident],
        check: fields::check_accident,
    },
    Rule {
        name: "health_fund",
        categories: &[Category::Medical],
        check: fields::check_health_fund,
    },
];

/// The rules selected for one schema.
#[derive(Debug, Clone)]
pub struct Validators {
    rules: Vec<Rule>,
}

impl Validators {
    /// Select the rules whose categories appear in `schema`.
    pub fn for_schema(schema: &FieldSchema) -> Self {
        let categories = schema.categories();
        let rules: Vec<Rule> = RULES
            .iter()
            .filter(|r| r.applies_to(&categories))
            .copied()
            .collect();
        debug!(
            "Selected {} validation rules for categories [{}]: {:?}",
            rules.len(),
            categories
                .iter()
                .map(|c| c.to_string())
                .collect::<Vec<_>>()
                .join(", "),
            rules.iter().map(|r| r.name).collect::<Vec<_>>()
        );
        Self { rules }
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name).collect()
    }

    /// Run every selected rule.
    ///
    /// Issues are ordered by the position of their field in the schema;
    /// issues on the same field keep rule order.
    pub fn run(&self, ctx: &ValidationContext<'_>) -> Vec<ValidationIssue> {
        let mut issues: Vec<ValidationIssue> =
            self.rules.iter().flat_map(|rule| (rule.check)(ctx)).collect();

        issues.retain(|issue| ctx.schema.contains(issue.field));
        issues.sort_by_key(|issue| ctx.schema.position(issue.field).unwrap_or(usize::MAX));
        issues
    }
}

/// Validate a record with every rule applicable to `schema`.
pub fn validate_record(
    schema: &FieldSchema,
    record: &NormalizedRecord,
    config: &ValidationConfig,
    reference_date: NaiveDate,
) -> Vec<ValidationIssue> {
    let ctx = ValidationContext {
        schema,
        record,
        config,
        reference_date,
    };
    Validators::for_schema(schema).run(&ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::{ExtractedFieldMap, Severity};
    use crate::normalize::normalize_record;
    use crate::schema::FieldKey;
    use pretty_assertions::assert_eq;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
    }

    fn complete_form() -> ExtractedFieldMap {
        ExtractedFieldMap::new()
            .with(FieldKey::LastName, "כהן")
            .with(FieldKey::FirstName, "דנה")
            .with(FieldKey::IdNumber, "123456782")
            .with(FieldKey::Gender, "נקבה")
            .with(FieldKey::DateOfBirth, "03/04/1985")
            .with(FieldKey::DateOfInjury, "10/02/2025")
            .with(FieldKey::TimeOfInjury, "08:30")
            .with(FieldKey::AccidentDescription, "החלקתי על רצפה רטובה במטבח")
            .with(FieldKey::InjuredBodyPart, "יד שמאל")
            .with(FieldKey::FormFillingDate, "12/02/2025")
            .with(FieldKey::MobilePhone, "050-1234567")
    }

    fn validate(schema: &FieldSchema, map: &ExtractedFieldMap) -> Vec<ValidationIssue> {
        let record = normalize_record(schema, map);
        validate_record(schema, &record, &ValidationConfig::default(), today())
    }

    fn fields_of(issues: &[ValidationIssue]) -> Vec<(FieldKey, Severity)> {
        issues.iter().map(|i| (i.field, i.severity)).collect()
    }

    #[test]
    fn test_complete_form_has_no_issues() {
        let schema = FieldSchema::national_insurance();
        let issues = validate(&schema, &complete_form());
        assert!(issues.is_empty(), "{:?}", issues);
    }

    #[test]
    fn test_missing_required_fields() {
        let schema = FieldSchema::national_insurance();
        let mut map = complete_form();
        map.insert(FieldKey::LastName, "");
        let issues = validate(&schema, &map);

        assert_eq!(fields_of(&issues), vec![(FieldKey::LastName, Severity::Error)]);
        assert!(issues[0].message.contains("Last name"));
        assert!(issues[0].message.contains("שם משפחה"));
    }

    #[test]
    fn test_invalid_id_number() {
        let schema = FieldSchema::national_insurance();
        let map = complete_form().with(FieldKey::IdNumber, "123456789");
        let issues = validate(&schema, &map);

        assert_eq!(fields_of(&issues), vec![(FieldKey::IdNumber, Severity::Error)]);
        assert!(issues[0].message.contains("123456789"));
    }

    #[test]
    fn test_short_id_is_padded_before_check() {
        let schema = FieldSchema::national_insurance();
        let map = complete_form().with(FieldKey::IdNumber, "18");
        assert!(validate(&schema, &map).is_empty());
    }

    #[test]
    fn test_too_long_id_is_rejected() {
        let schema = FieldSchema::national_insurance();
        let map = complete_form().with(FieldKey::IdNumber, "1234567890");
        let issues = validate(&schema, &map);
        assert_eq!(fields_of(&issues), vec![(FieldKey::IdNumber, Severity::Error)]);
    }

    #[test]
    fn test_unknown_gender() {
        let schema = FieldSchema::national_insurance();
        let map = complete_form().with(FieldKey::Gender, "אחר");
        let issues = validate(&schema, &map);
        assert_eq!(fields_of(&issues), vec![(FieldKey::Gender, Severity::Error)]);
    }

    #[test]
    fn test_injury_after_filling_date() {
        let schema = FieldSchema::national_insurance();
        let map = complete_form()
            .with(FieldKey::DateOfInjury, "20/02/2025")
            .with(FieldKey::FormFillingDate, "12/02/2025");
        let issues = validate(&schema, &map);

        assert_eq!(fields_of(&issues), vec![(FieldKey::DateOfInjury, Severity::Error)]);
        assert!(issues[0].message.contains("after the form filling date"));
    }

    #[test]
    fn test_same_day_injury_and_filling_is_fine() {
        let schema = FieldSchema::national_insurance();
        let map = complete_form()
            .with(FieldKey::DateOfInjury, "12/02/2025")
            .with(FieldKey::FormFillingDate, "12/02/2025");
        assert!(validate(&schema, &map).is_empty());
    }

    #[test]
    fn test_birth_after_injury() {
        let schema = FieldSchema::national_insurance();
        let map = complete_form().with(FieldKey::DateOfBirth, "11/02/2025");
        let issues = validate(&schema, &map);
        assert_eq!(fields_of(&issues), vec![(FieldKey::DateOfBirth, Severity::Error)]);
    }

    #[test]
    fn test_implausible_years() {
        let schema = FieldSchema::national_insurance();
        let map = complete_form().with(FieldKey::DateOfBirth, "01/01/1850");
        let issues = validate(&schema, &map);
        assert_eq!(fields_of(&issues), vec![(FieldKey::DateOfBirth, Severity::Error)]);

        // Reference year 2025, one year of slack.
        let map = complete_form()
            .with(FieldKey::FormFillingDate, "01/01/2027")
            .with(FieldKey::DateOfInjury, "01/01/2026");
        let issues = validate(&schema, &map);
        assert_eq!(fields_of(&issues), vec![(FieldKey::FormFillingDate, Severity::Error)]);
    }

    #[test]
    fn test_huge_future_allowance_does_not_overflow() {
        let schema = FieldSchema::national_insurance();
        let config = ValidationConfig {
            max_future_years: i32::MAX,
            ..Default::default()
        };
        let record = normalize_record(&schema, &complete_form());
        let issues = validate_record(&schema, &record, &config, today());
        assert!(issues.is_empty(), "{:?}", issues);
    }

    #[test]
    fn test_unparseable_date() {
        let schema = FieldSchema::national_insurance();
        let map = complete_form().with(FieldKey::DateOfInjury, "yesterday");
        let issues = validate(&schema, &map);
        assert_eq!(fields_of(&issues), vec![(FieldKey::DateOfInjury, Severity::Error)]);
        assert!(issues[0].message.contains("yesterday"));
    }

    #[test]
    fn test_receipt_before_filling_is_warning() {
        let schema = FieldSchema::national_insurance();
        let map = complete_form().with(FieldKey::FormReceiptDateAtClinic, "11/02/2025");
        let issues = validate(&schema, &map);
        assert_eq!(
            fields_of(&issues),
            vec![(FieldKey::FormReceiptDateAtClinic, Severity::Warning)]
        );
    }

    #[test]
    fn test_no_phone_warns_once() {
        let schema = FieldSchema::national_insurance();
        let mut map = complete_form();
        map.insert(FieldKey::MobilePhone, "");
        let issues = validate(&schema, &map);

        assert_eq!(fields_of(&issues), vec![(FieldKey::MobilePhone, Severity::Warning)]);
    }

    #[test]
    fn test_invalid_phones() {
        let schema = FieldSchema::national_insurance();
        let map = complete_form()
            .with(FieldKey::LandlinePhone, "07-1234567")
            .with(FieldKey::MobilePhone, "056-1234567");
        let issues = validate(&schema, &map);
        assert_eq!(
            fields_of(&issues),
            vec![
                (FieldKey::LandlinePhone, Severity::Error),
                (FieldKey::MobilePhone, Severity::Error),
            ]
        );
    }

    #[test]
    fn test_international_mobile_is_valid() {
        let schema = FieldSchema::national_insurance();
        let map = complete_form().with(FieldKey::MobilePhone, "+972-50-123-4567");
        assert!(validate(&schema, &map).is_empty());
    }

    #[test]
    fn test_partial_address_warns() {
        let schema = FieldSchema::national_insurance();
        let map = complete_form().with(FieldKey::HouseNumber, "12");
        let issues = validate(&schema, &map);

        assert_eq!(fields_of(&issues), vec![(FieldKey::Street, Severity::Warning)]);
        assert!(issues[0].message.contains("street and city"));
    }

    #[test]
    fn test_postal_codes() {
        let schema = FieldSchema::national_insurance();
        let base = complete_form()
            .with(FieldKey::Street, "הרצל")
            .with(FieldKey::City, "חיפה");

        assert!(validate(&schema, &base.clone().with(FieldKey::PostalCode, "3303012")).is_empty());

        let issues = validate(&schema, &base.clone().with(FieldKey::PostalCode, "33030"));
        assert_eq!(fields_of(&issues), vec![(FieldKey::PostalCode, Severity::Warning)]);

        let issues = validate(&schema, &base.with(FieldKey::PostalCode, "330"));
        assert_eq!(fields_of(&issues), vec![(FieldKey::PostalCode, Severity::Error)]);
    }

    #[test]
    fn test_time_and_short_description() {
        let schema = FieldSchema::national_insurance();
        let map = complete_form()
            .with(FieldKey::TimeOfInjury, "25:00")
            .with(FieldKey::AccidentDescription, "נפלתי");
        let issues = validate(&schema, &map);
        assert_eq!(
            fields_of(&issues),
            vec![
                (FieldKey::TimeOfInjury, Severity::Error),
                (FieldKey::AccidentDescription, Severity::Warning),
            ]
        );
    }

    #[test]
    fn test_unknown_health_fund_is_warning() {
        let schema = FieldSchema::national_insurance();
        let map = complete_form().with(FieldKey::HealthFundMember, "kupa");
        let issues = validate(&schema, &map);
        assert_eq!(fields_of(&issues), vec![(FieldKey::HealthFundMember, Severity::Warning)]);
    }

    #[test]
    fn test_issues_follow_schema_order() {
        let schema = FieldSchema::national_insurance();
        let map = ExtractedFieldMap::new();
        let issues = validate(&schema, &map);

        let positions: Vec<usize> = issues
            .iter()
            .map(|i| schema.position(i.field).unwrap())
            .collect();
        let mut sorted = positions.clone();
        sorted.sort();
        assert_eq!(positions, sorted);
        assert_eq!(issues.iter().filter(|i| i.is_error()).count(), 9);
    }

    #[test]
    fn test_rule_selection_follows_categories() {
        let schema = FieldSchema::new(vec![
            FieldKey::LastName.definition().required(),
            FieldKey::IdNumber.definition(),
        ])
        .unwrap();
        let validators = Validators::for_schema(&schema);
        assert_eq!(
            validators.rule_names(),
            vec!["required", "id_number", "gender", "dates"]
        );

        let full = Validators::for_schema(&FieldSchema::national_insurance());
        assert_eq!(full.rule_names().len(), RULES.len());
    }

    #[test]
    fn test_custom_schema_without_phones() {
        let schema = FieldSchema::new(vec![FieldKey::IdNumber.definition().required()])
            .unwrap();
        let map = ExtractedFieldMap::new().with(FieldKey::IdNumber, "123456782");
        assert!(validate(&schema, &map).is_empty());
    }
}
