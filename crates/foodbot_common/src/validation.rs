//! Input sanitising for everything a user or admin can type.
//!
//! All functions return `None` for input that must be rejected; callers turn
//! that into a validation error with their own wording.

use chrono::NaiveDate;

pub const PERSONAL_NUMBER_MAX: usize = 20;
pub const CARD_ID_MAX: usize = 50;
pub const NAME_MAX: usize = 100;
pub const NAME_MIN: usize = 2;

/// Prefix printed on QR badges in front of the personal number.
pub const KIOSK_QR_PREFIX: &str = "FOODBOT:";

/// Trim, truncate to `max_chars` and escape angle brackets.
///
/// Empty input (after trimming) yields `None`.
pub fn sanitize_string(value: &str, max_chars: usize) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    let truncated: String = trimmed.chars().take(max_chars).collect();
    Some(truncated.replace('<', "&lt;").replace('>', "&gt;"))
}

/// Alphanumeric plus hyphen, 1..=20 characters.
pub fn validate_personal_number(value: &str) -> Option<String> {
    let cleaned = sanitize_string(value, PERSONAL_NUMBER_MAX)?;
    cleaned
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-')
        .then_some(cleaned)
}

/// Hex digits only, 1..=50 characters, normalised to uppercase.
pub fn validate_card_id(value: &str) -> Option<String> {
    let cleaned = sanitize_string(value, CARD_ID_MAX)?;
    cleaned
        .chars()
        .all(|c| c.is_ascii_hexdigit())
        .then(|| cleaned.to_ascii_uppercase())
}

/// Letters (including umlauts), spaces, dots and hyphens; 2..=100 characters.
pub fn validate_name(value: &str) -> Option<String> {
    let cleaned = sanitize_string(value, NAME_MAX)?;
    if cleaned.chars().count() < NAME_MIN {
        return None;
    }
    cleaned
        .chars()
        .all(|c| c.is_alphabetic() || c.is_whitespace() || c == '.' || c == '-')
        .then_some(cleaned)
}

/// `YYYY-MM-DD`.
pub fn validate_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

/// Strip the badge prefix from raw kiosk input, if present.
pub fn strip_kiosk_prefix(raw: &str) -> &str {
    let trimmed = raw.trim();
    trimmed.strip_prefix(KIOSK_QR_PREFIX).unwrap_or(trimmed).trim()
}

/// Truncate to `max_chars` characters without splitting a code point.
pub fn truncate_chars(value: &str, max_chars: usize) -> String {
    value.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_personal_number() {
        assert_eq!(validate_personal_number(" 4711 "), Some("4711".to_string()));
        assert_eq!(validate_personal_number("FW-12"), Some("FW-12".to_string()));
        assert_eq!(validate_personal_number("12 34"), None);
        assert_eq!(validate_personal_number(""), None);
        assert_eq!(
            validate_personal_number("123456789012345678901234").map(|s| s.len()),
            Some(20)
        );
    }

    #[test]
    fn test_card_id_uppercased() {
        assert_eq!(validate_card_id("04a2bc"), Some("04A2BC".to_string()));
        assert_eq!(validate_card_id("xyz"), None);
    }

    #[test]
    fn test_name() {
        assert_eq!(validate_name("Jörg Müller"), Some("Jörg Müller".to_string()));
        assert_eq!(validate_name("A"), None);
        assert_eq!(validate_name("Robert'); DROP"), None);
    }

    #[test]
    fn test_strip_kiosk_prefix() {
        assert_eq!(strip_kiosk_prefix("FOODBOT:4711"), "4711");
        assert_eq!(strip_kiosk_prefix("  4711\n"), "4711");
    }

    #[test]
    fn test_validate_date() {
        assert!(validate_date("2026-02-30").is_none());
        assert_eq!(
            validate_date("2026-02-03"),
            NaiveDate::from_ymd_opt(2026, 2, 3)
        );
    }

    proptest! {
        #[test]
        fn test_sanitized_never_contains_angle_brackets(input in ".{0,200}") {
            if let Some(cleaned) = sanitize_string(&input, 100) {
                prop_assert!(!cleaned.contains('<'));
                prop_assert!(!cleaned.contains('>'));
            }
        }

        #[test]
        fn test_card_id_is_always_upper_hex(input in "[0-9a-fA-F]{1,60}") {
            let card = validate_card_id(&input).unwrap();
            prop_assert!(card.len() <= CARD_ID_MAX);
            prop_assert!(card.chars().all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
        }
    }
}
