//! Phone number validation and normalization.
//!
//! Numbers are recognized in their Russian shapes (`8XXXXXXXXXX`,
//! `7XXXXXXXXXX`, or ten digits without a trunk prefix) and rewritten into
//! the canonical `+7XXXXXXXXXX` form. Anything else is passed through.

use std::sync::OnceLock;

use regex::Regex;

/// Minimum number of digits for input to be treated as a phone number.
pub const MIN_PHONE_DIGITS: usize = 10;

static NON_DIGITS: OnceLock<Regex> = OnceLock::new();

fn digits_of(text: &str) -> String {
    NON_DIGITS
        .get_or_init(|| Regex::new(r"\D+").expect("valid regex"))
        .replace_all(text, "")
        .into_owned()
}

/// Normalize raw user input into `+<country><digits>` when it has a
/// recognizable shape, otherwise return the input trimmed.
pub fn normalize(raw: &str) -> String {
    let mut digits = digits_of(raw);
    let count = digits.chars().count();

    if count == 11 && digits.starts_with('8') {
        digits.replace_range(..1, "7");
    }

    if count == 11 && digits.starts_with('7') {
        return format!("+{}", digits);
    }

    if count == 10 {
        return format!("+7{}", digits);
    }

    raw.trim().to_string()
}

/// Shape check used before [`normalize`]: at least ten digits, ignoring any
/// separators around them.
pub fn looks_like_phone(raw: &str) -> bool {
    digits_of(raw).chars().count() >= MIN_PHONE_DIGITS
}
