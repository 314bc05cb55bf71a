//! Date and time parsing for claim-form fields.

use chrono::{NaiveDate, NaiveTime};

use super::patterns::{DATE_BOXED, DATE_DMY, DATE_ISO, DATE_TEXTUAL, TIME};
use super::text::fold_digits;

/// Parse a date written in any of the forms seen on the claim form.
///
/// Accepted: `DD/MM/YYYY` with `/`, `-`, `.` or space separators (2-digit
/// years allowed), ISO `YYYY-MM-DD`, boxed `DDMMYYYY`, and day + month
/// name + year with Hebrew or English month names.
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    let s = fold_digits(input.trim());

    if let Some(caps) = DATE_ISO.captures(&s) {
        let year: i32 = caps[1].parse().ok()?;
        let month: u32 = caps[2].parse().ok()?;
        let day: u32 = caps[3].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    if let Some(caps) = DATE_DMY.captures(&s) {
        let day: u32 = caps[1].parse().ok()?;
        let month: u32 = caps[2].parse().ok()?;
        let year = parse_year(&caps[3])?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();
    if let Some(caps) = DATE_BOXED.captures(&compact) {
        let day: u32 = caps[1].parse().ok()?;
        let month: u32 = caps[2].parse().ok()?;
        let year: i32 = caps[3].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    if let Some(caps) = DATE_TEXTUAL.captures(&s) {
        let day: u32 = caps[1].parse().ok()?;
        let month = month_to_number(&caps[2])?;
        let year: i32 = caps[3].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    None
}

/// Parse a time of day; seconds are validated and dropped.
pub fn parse_time(input: &str) -> Option<NaiveTime> {
    let s = fold_digits(input.trim());
    let caps = TIME.captures(&s)?;

    let hour: u32 = caps[1].parse().ok()?;
    let minute: u32 = caps[2].parse().ok()?;
    if let Some(sec) = caps.get(3) {
        let sec: u32 = sec.as_str().parse().ok()?;
        if sec > 59 {
            return None;
        }
    }

    NaiveTime::from_hms_opt(hour, minute, 0)
}

fn parse_year(s: &str) -> Option<i32> {
    let year: i32 = s.parse().ok()?;
    if s.len() <= 2 {
        // Two-digit year: assume 2000s for 00-50, 1900s for 51-99
        if year <= 50 {
            Some(2000 + year)
        } else {
            Some(1900 + year)
        }
    } else {
        Some(year)
    }
}

fn month_to_number(name: &str) -> Option<u32> {
    let lower = name.to_lowercase();
    hebrew_month(&lower)
        // "במרץ" - month name with the prefix bet ("in March")
        .or_else(|| lower.strip_prefix('ב').and_then(hebrew_month))
        .or_else(|| english_month(&lower))
}

fn hebrew_month(name: &str) -> Option<u32> {
    let month = match name {
        "ינואר" => 1,
        "פברואר" => 2,
        "מרץ" | "מרס" => 3,
        "אפריל" => 4,
        "מאי" => 5,
        "יוני" => 6,
        "יולי" => 7,
        "אוגוסט" => 8,
        "ספטמבר" => 9,
        "אוקטובר" => 10,
        "נובמבר" => 11,
        "דצמבר" => 12,
        _ => return None,
    };
    Some(month)
}

fn english_month(name: &str) -> Option<u32> {
    let month = match name {
        "january" | "jan" => 1,
        "february" | "feb" => 2,
        "march" | "mar" => 3,
        "april" | "apr" => 4,
        "may" => 5,
        "june" | "jun" => 6,
        "july" | "jul" => 7,
        "august" | "aug" => 8,
        "september" | "sept" | "sep" => 9,
        "october" | "oct" => 10,
        "november" | "nov" => 11,
        "december" | "dec" => 12,
        _ => return None,
    };
    Some(month)
}
