//! Phone number normalization for the Ghanaian numbering plan.
//!
//! Numbers are stored as `233` followed by the 9-digit subscriber number. Local
//! input (`024 123 4567`), bare subscriber numbers (`241234567`) and international
//! input (`+233 24 123 4567`) all map to the same stored form.

/// Country calling code prefixed to local numbers.
pub const COUNTRY_CODE: &str = "233";

/// Length of a subscriber number without trunk prefix or country code.
const SUBSCRIBER_DIGITS: usize = 9;

/// Normalizes a phone number to `233XXXXXXXXX`.
///
/// All non-digit characters are stripped. A leading trunk `0` is replaced by the
/// country code and a bare 9-digit subscriber number gets the country code
/// prefixed. Anything else is returned as its digits, so an empty input yields
/// an empty string.
#[must_use]
pub fn standardize_phone(raw: &str) -> String {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();

    if let Some(rest) = digits.strip_prefix('0') {
        format!("{COUNTRY_CODE}{rest}")
    } else if digits.len() == SUBSCRIBER_DIGITS {
        format!("{COUNTRY_CODE}{digits}")
    } else {
        digits
    }
}

/// Number of digits in `raw`.
#[must_use]
pub fn digit_count(raw: &str) -> usize {
    raw.chars().filter(char::is_ascii_digit).count()
}

/// Masks all but the last 3 characters of `phone` with `*`, keeping its length.
#[must_use]
pub fn mask_phone(phone: &str) -> String {
    let len = phone.chars().count();
    let visible = len.min(3);
    let tail: String = phone.chars().skip(len - visible).collect();
    format!("{}{tail}", "*".repeat(len - visible))
}
