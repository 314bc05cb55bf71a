//! Field schema of the National Insurance work-injury claim form.
//!
//! Every field the form can carry has a [`FieldKey`]; its category, type,
//! bilingual label and language-model JSON path are fixed per key. A
//! [`FieldSchema`] selects a set of keys and decides which of them are required.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LeumiError;

/// Identifier of a form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKey {
    LastName,
    FirstName,
    IdNumber,
    Gender,
    DateOfBirth,
    Street,
    HouseNumber,
    Entrance,
    Apartment,
    City,
    PostalCode,
    PoBox,
    LandlinePhone,
    MobilePhone,
    JobType,
    DateOfInjury,
    TimeOfInjury,
    AccidentLocation,
    AccidentAddress,
    AccidentDescription,
    InjuredBodyPart,
    Signature,
    FormFillingDate,
    FormReceiptDateAtClinic,
    HealthFundMember,
    NatureOfAccident,
    MedicalDiagnoses,
}

impl FieldKey {
    /// All keys, in form order.
    pub const ALL: [FieldKey; 27] = [
        FieldKey::LastName,
        FieldKey::FirstName,
        FieldKey::IdNumber,
        FieldKey::Gender,
        FieldKey::DateOfBirth,
        FieldKey::Street,
        FieldKey::HouseNumber,
        FieldKey::Entrance,
        FieldKey::Apartment,
        FieldKey::City,
        FieldKey::PostalCode,
        FieldKey::PoBox,
        FieldKey::LandlinePhone,
        FieldKey::MobilePhone,
        FieldKey::JobType,
        FieldKey::DateOfInjury,
        FieldKey::TimeOfInjury,
        FieldKey::AccidentLocation,
        FieldKey::AccidentAddress,
        FieldKey::AccidentDescription,
        FieldKey::InjuredBodyPart,
        FieldKey::Signature,
        FieldKey::FormFillingDate,
        FieldKey::FormReceiptDateAtClinic,
        FieldKey::HealthFundMember,
        FieldKey::NatureOfAccident,
        FieldKey::MedicalDiagnoses,
    ];

    /// Snake-case identifier used in exports.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKey::LastName => "last_name",
            FieldKey::FirstName => "first_name",
            FieldKey::IdNumber => "id_number",
            FieldKey::Gender => "gender",
            FieldKey::DateOfBirth => "date_of_birth",
            FieldKey::Street => "street",
            FieldKey::HouseNumber => "house_number",
            FieldKey::Entrance => "entrance",
            FieldKey::Apartment => "apartment",
            FieldKey::City => "city",
            FieldKey::PostalCode => "postal_code",
            FieldKey::PoBox => "po_box",
            FieldKey::LandlinePhone => "landline_phone",
            FieldKey::MobilePhone => "mobile_phone",
            FieldKey::JobType => "job_type",
            FieldKey::DateOfInjury => "date_of_injury",
            FieldKey::TimeOfInjury => "time_of_injury",
            FieldKey::AccidentLocation => "accident_location",
            FieldKey::AccidentAddress => "accident_address",
            FieldKey::AccidentDescription => "accident_description",
            FieldKey::InjuredBodyPart => "injured_body_part",
            FieldKey::Signature => "signature",
            FieldKey::FormFillingDate => "form_filling_date",
            FieldKey::FormReceiptDateAtClinic => "form_receipt_date_at_clinic",
            FieldKey::HealthFundMember => "health_fund_member",
            FieldKey::NatureOfAccident => "nature_of_accident",
            FieldKey::MedicalDiagnoses => "medical_diagnoses",
        }
    }

    /// The fixed definition of this field, not required by default.
    pub fn definition(self) -> FieldDefinition {
        use Category::*;
        use FieldType::{Date, Digits, Text, Time};

        let (category, field_type, en, he, json_path) = match self {
            FieldKey::LastName => (Personal, Text, "Last name", "שם משפחה", "lastName"),
            FieldKey::FirstName => (Personal, Text, "First name", "שם פרטי", "firstName"),
            FieldKey::IdNumber => (
                Personal,
                Digits(DigitFormat::Plain),
                "ID number",
                "מספר זהות",
                "idNumber",
            ),
            FieldKey::Gender => (Personal, FieldType::Choice(GENDERS), "Gender", "מין", "gender"),
            FieldKey::DateOfBirth => (Personal, Date, "Date of birth", "תאריך לידה", "dateOfBirth"),
            FieldKey::Street => (Address, Text, "Street", "רחוב", "address.street"),
            FieldKey::HouseNumber => (
                Address,
                Text,
                "House number",
                "מספר בית",
                "address.houseNumber",
            ),
            FieldKey::Entrance => (Address, Text, "Entrance", "כניסה", "address.entrance"),
            FieldKey::Apartment => (Address, Text, "Apartment", "דירה", "address.apartment"),
            FieldKey::City => (Address, Text, "City", "ישוב", "address.city"),
            FieldKey::PostalCode => (
                Address,
                Digits(DigitFormat::Plain),
                "Postal code",
                "מיקוד",
                "address.postalCode",
            ),
            FieldKey::PoBox => (
                Address,
                Digits(DigitFormat::Plain),
                "P.O. box",
                "תא דואר",
                "address.poBox",
            ),
            FieldKey::LandlinePhone => (
                Contact,
                Digits(DigitFormat::Phone),
                "Landline phone",
                "טלפון קווי",
                "landlinePhone",
            ),
            FieldKey::MobilePhone => (
                Contact,
                Digits(DigitFormat::Phone),
                "Mobile phone",
                "טלפון נייד",
                "mobilePhone",
            ),
            FieldKey::JobType => (Accident, Text, "Job type", "סוג העבודה", "jobType"),
            FieldKey::DateOfInjury => (
                Accident,
                Date,
                "Date of injury",
                "תאריך הפגיעה",
                "dateOfInjury",
            ),
            FieldKey::TimeOfInjury => (
                Accident,
                Time,
                "Time of injury",
                "שעת הפגיעה",
                "timeOfInjury",
            ),
            FieldKey::AccidentLocation => (
                Accident,
                Text,
                "Accident location",
                "מקום התאונה",
                "accidentLocation",
            ),
            FieldKey::AccidentAddress => (
                Accident,
                Text,
                "Accident address",
                "כתובת מקום התאונה",
                "accidentAddress",
            ),
            FieldKey::AccidentDescription => (
                Accident,
                Text,
                "Accident description",
                "נסיבות הפגיעה / תאור התאונה",
                "accidentDescription",
            ),
            FieldKey::InjuredBodyPart => (
                Accident,
                Text,
                "Injured body part",
                "האיבר שנפגע",
                "injuredBodyPart",
            ),
            FieldKey::Signature => (Form, Text, "Signature", "חתימה", "signature"),
            FieldKey::FormFillingDate => (
                Form,
                Date,
                "Form filling date",
                "תאריך מילוי הטופס",
                "formFillingDate",
            ),
            FieldKey::FormReceiptDateAtClinic => (
                Form,
                Date,
                "Form receipt date at clinic",
                "תאריך קבלת הטופס בקופה",
                "formReceiptDateAtClinic",
            ),
            FieldKey::HealthFundMember => (
                Medical,
                FieldType::Choice(HEALTH_FUNDS),
                "Health fund",
                "חבר בקופת חולים",
                "medicalInstitutionFields.healthFundMember",
            ),
            FieldKey::NatureOfAccident => (
                Medical,
                Text,
                "Nature of accident",
                "מהות התאונה",
                "medicalInstitutionFields.natureOfAccident",
            ),
            FieldKey::MedicalDiagnoses => (
                Medical,
                Text,
                "Medical diagnoses",
                "אבחנות רפואיות",
                "medicalInstitutionFields.medicalDiagnoses",
            ),
        };

        FieldDefinition {
            key: self,
            category,
            field_type,
            required: false,
            label: Label { en, he },
            json_path,
        }
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldKey {
    type Err = LeumiError;

    /// Parse a snake-case identifier.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| LeumiError::Config(format!("unknown field key '{}'", s)))
    }
}

/// Section of the form a field belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Personal,
    Address,
    Contact,
    Accident,
    Form,
    Medical,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Personal,
        Category::Address,
        Category::Contact,
        Category::Accident,
        Category::Form,
        Category::Medical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Personal => "personal",
            Category::Address => "address",
            Category::Contact => "contact",
            Category::Accident => "accident",
            Category::Form => "form",
            Category::Medical => "medical",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declared value type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// Free text.
    Text,
    /// Calendar date, canonical `YYYY-MM-DD`.
    Date,
    /// Digits only, leading zeros kept.
    Digits(DigitFormat),
    /// One of a closed set of values.
    Choice(&'static [Choice]),
    /// Time of day, canonical `HH:MM`.
    Time,
}

/// Flavour of a digit-string field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigitFormat {
    Plain,
    /// Israeli phone number; an international `972` prefix becomes `0`.
    Phone,
}

/// A canonical enum value and the spellings that map to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Choice {
    pub value: &'static str,
    pub aliases: &'static [&'static str],
}

impl Choice {
    /// Whether `input` (already trimmed) names this choice.
    pub fn matches(&self, input: &str) -> bool {
        let lower = input.to_lowercase();
        lower == self.value || self.aliases.iter().any(|a| *a == lower)
    }
}

pub const GENDERS: &[Choice] = &[
    Choice {
        value: "male",
        aliases: &["זכר", "ז", "m", "ז'", "man"],
    },
    Choice {
        value: "female",
        aliases: &["נקבה", "נ", "f", "נ'", "woman"],
    },
];

pub const HEALTH_FUNDS: &[Choice] = &[
    Choice {
        value: "clalit",
        aliases: &["כללית", "שירותי בריאות כללית", "clalit health services"],
    },
    Choice {
        value: "maccabi",
        aliases: &["מכבי", "מכבי שירותי בריאות", "macabi"],
    },
    Choice {
        value: "meuhedet",
        aliases: &["מאוחדת", "קופת חולים מאוחדת", "meuchedet"],
    },
    Choice {
        value: "leumit",
        aliases: &["לאומית", "קופת חולים לאומית"],
    },
];

/// Bilingual display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Label {
    pub en: &'static str,
    pub he: &'static str,
}

/// A single field of the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDefinition {
    pub key: FieldKey,
    pub category: Category,
    pub field_type: FieldType,
    pub required: bool,
    pub label: Label,
    /// Dotted path of the field in the language-model JSON response.
    pub json_path: &'static str,
}

impl FieldDefinition {
    /// Mark the field as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Set whether the field is required.
    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }
}

/// Ordered set of field definitions with unique keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSchema {
    fields: Vec<FieldDefinition>,
}

impl FieldSchema {
    /// Build a schema; fails if a key appears twice.
    pub fn new(fields: Vec<FieldDefinition>) -> Result<Self, LeumiError> {
        let mut seen = HashSet::new();
        for field in &fields {
            if !seen.insert(field.key) {
                return Err(LeumiError::Config(format!(
                    "duplicate field in schema: {}",
                    field.key
                )));
            }
        }
        Ok(Self { fields })
    }

    /// The standard National Insurance work-injury form (BL/250).
    pub fn national_insurance() -> Self {
        const REQUIRED: [FieldKey; 9] = [
            FieldKey::LastName,
            FieldKey::FirstName,
            FieldKey::IdNumber,
            FieldKey::Gender,
            FieldKey::DateOfBirth,
            FieldKey::DateOfInjury,
            FieldKey::AccidentDescription,
            FieldKey::InjuredBodyPart,
            FieldKey::FormFillingDate,
        ];

        let fields = FieldKey::ALL
            .iter()
            .map(|key| key.definition().with_required(REQUIRED.contains(key)))
            .collect();
        Self { fields }
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldDefinition> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, key: FieldKey) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.key == key)
    }

    pub fn contains(&self, key: FieldKey) -> bool {
        self.get(key).is_some()
    }

    /// Declaration index of `key`, used to order issues.
    pub fn position(&self, key: FieldKey) -> Option<usize> {
        self.fields.iter().position(|f| f.key == key)
    }

    /// Required fields in declaration order.
    pub fn required(&self) -> impl Iterator<Item = &FieldDefinition> {
        self.fields.iter().filter(|f| f.required)
    }

    /// Categories present in the schema, in [`Category::ALL`] order.
    pub fn categories(&self) -> Vec<Category> {
        Category::ALL
            .iter()
            .copied()
            .filter(|c| self.fields.iter().any(|f| f.category == *c))
            .collect()
    }
}

impl Default for FieldSchema {
    fn default() -> Self {
        Self::national_insurance()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_schema_covers_every_key_once() {
        let schema = FieldSchema::national_insurance();
        assert_eq!(schema.len(), FieldKey::ALL.len());
        for (i, key) in FieldKey::ALL.iter().enumerate() {
            assert_eq!(schema.position(*key), Some(i));
        }
    }

    #[test]
    fn test_standard_schema_required_set() {
        let schema = FieldSchema::national_insurance();
        let required: Vec<FieldKey> = schema.required().map(|f| f.key).collect();
        assert_eq!(required.len(), 9);
        assert!(required.contains(&FieldKey::IdNumber));
        assert!(!required.contains(&FieldKey::MobilePhone));
        assert!(!required.contains(&FieldKey::Street));
    }

    #[test]
    fn test_duplicate_keys_rejected() {
        let result = FieldSchema::new(vec![
            FieldKey::IdNumber.definition(),
            FieldKey::IdNumber.definition().required(),
        ]);
        assert!(matches!(result, Err(LeumiError::Config(_))));
    }

    #[test]
    fn test_key_round_trip_through_str() {
        for key in FieldKey::ALL {
            assert_eq!(key.as_str().parse::<FieldKey>().unwrap(), key);
        }
        assert_eq!(" id_number ".parse::<FieldKey>().unwrap(), FieldKey::IdNumber);
        assert!(matches!("nope".parse::<FieldKey>(), Err(LeumiError::Config(_))));
    }

    #[test]
    fn test_key_serializes_as_snake_case() {
        let json = serde_json::to_string(&FieldKey::FormReceiptDateAtClinic).unwrap();
        assert_eq!(json, "\"form_receipt_date_at_clinic\"");
    }

    #[test]
    fn test_choice_matching_is_case_insensitive() {
        assert!(GENDERS[0].matches("Male"));
        assert!(GENDERS[0].matches("זכר"));
        assert!(GENDERS[1].matches("F"));
        assert!(!GENDERS[1].matches("זכר"));
    }

    #[test]
    fn test_category_display_matches_serde_name() {
        for category in Category::ALL {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category));
        }
    }

    #[test]
    fn test_categories_follow_declaration_order() {
        let schema = FieldSchema::new(vec![
            FieldKey::MobilePhone.definition(),
            FieldKey::IdNumber.definition(),
        ])
        .unwrap();
        assert_eq!(schema.categories(), vec![Category::Personal, Category::Contact]);
    }
}
