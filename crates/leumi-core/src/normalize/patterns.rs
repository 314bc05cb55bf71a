//! Common regex patterns for claim-form field normalization.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    pub static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();

    // Separators allowed inside digit strings (ID, phone, postal code)
    pub static ref DIGIT_SEPARATORS: Regex = Regex::new(r"[\s\-./()+_]").unwrap();

    // Date patterns
    pub static ref DATE_ISO: Regex = Regex::new(
        r"^(\d{4})[./\-](\d{1,2})[./\-](\d{1,2})$"
    ).unwrap();

    pub static ref DATE_DMY: Regex = Regex::new(
        r"^(\d{1,2})\s*[./\-\s]\s*(\d{1,2})\s*[./\-\s]\s*(\d{4}|\d{2})$"
    ).unwrap();

    // Boxed form digits: DDMMYYYY, possibly spaced one digit per box
    pub static ref DATE_BOXED: Regex = Regex::new(r"^(\d{2})(\d{2})(\d{4})$").unwrap();

    // "15 במרץ 1990", "15 March, 1990"
    pub static ref DATE_TEXTUAL: Regex = Regex::new(
        r"^(\d{1,2})\s*(?:-\s*)?(\p{L}+)\.?\s*,?\s*(?:-\s*)?(\d{4})$"
    ).unwrap();

    // HH:MM, HH.MM, HH:MM:SS
    pub static ref TIME: Regex = Regex::new(
        r"^(\d{1,2})\s*[:.]\s*(\d{2})(?:\s*:\s*(\d{2}))?$"
    ).unwrap();
}
