//! Character-level cleanup shared by every field type.

use super::patterns::WHITESPACE;

/// Remove bidirectional control marks, collapse whitespace and trim.
///
/// OCR of right-to-left forms routinely leaves LRM/RLM and embedding marks
/// around numbers.
pub fn clean_text(input: &str) -> String {
    let stripped: String = input.chars().filter(|c| !is_bidi_control(*c)).collect();
    WHITESPACE.replace_all(&stripped, " ").trim().to_string()
}

/// Replace full-width and Arabic-Indic digits with ASCII digits.
pub fn fold_digits(input: &str) -> String {
    input.chars().map(|c| ascii_digit(c).unwrap_or(c)).collect()
}

fn ascii_digit(c: char) -> Option<char> {
    let base = match c {
        '\u{FF10}'..='\u{FF19}' => 0xFF10,
        '\u{0660}'..='\u{0669}' => 0x0660,
        '\u{06F0}'..='\u{06F9}' => 0x06F0,
        _ => return None,
    };
    char::from_digit(c as u32 - base, 10)
}

fn is_bidi_control(c: char) -> bool {
    matches!(
        c,
        '\u{200E}' | '\u{200F}' | '\u{202A}'..='\u{202E}' | '\u{2066}'..='\u{2069}' | '\u{FEFF}'
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_text_collapses_whitespace() {
        assert_eq!(clean_text("  דוד \t  כהן\n"), "דוד כהן");
    }

    #[test]
    fn test_clean_text_strips_bidi_marks() {
        assert_eq!(clean_text("\u{200F}052-1234567\u{200E}"), "052-1234567");
    }

    #[test]
    fn test_fold_digits() {
        assert_eq!(fold_digits("０５２"), "052");
        assert_eq!(fold_digits("١٢٣"), "123");
        assert_eq!(fold_digits("۴۵"), "45");
        assert_eq!(fold_digits("abc 12"), "abc 12");
    }
}
