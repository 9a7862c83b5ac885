//! Scrubs personally identifying substrings from resume text before it leaves the
//! process. Heuristic by nature: emails, long digit runs (IDs, account and phone
//! numbers without separators), and separated phone numbers.

use once_cell::sync::Lazy;
use regex::Regex;

pub const EMAIL_PLACEHOLDER: &str = "[REDACTED_EMAIL]";
pub const NUMBER_PLACEHOLDER: &str = "[REDACTED_NUMBER]";
pub const PHONE_PLACEHOLDER: &str = "[REDACTED_PHONE]";

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").expect("email pattern is valid")
});

static LONG_DIGITS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d{6,}").expect("digit-run pattern is valid"));

static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\+\d{1,3}[\s.-]?)?\(?\b\d{3}\)?[\s.-]?\d{3}[\s.-]\d{4}\b")
        .expect("phone pattern is valid")
});

/// Idempotent: placeholders contain no digits or `@`, so a second pass finds nothing.
/// Emails go first so digits inside an address are not split off on their own.
pub fn redact_sensitive(text: &str) -> String {
    let text = EMAIL_RE.replace_all(text, EMAIL_PLACEHOLDER);
    let text = LONG_DIGITS_RE.replace_all(&text, NUMBER_PLACEHOLDER);
    PHONE_RE.replace_all(&text, PHONE_PLACEHOLDER).into_owned()
}
