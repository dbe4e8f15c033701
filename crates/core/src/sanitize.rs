//! Input limits and sanitizers for user-supplied text.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;

pub const MAX_USERNAME_LEN: usize = 100;
pub const MAX_PASSWORD_LEN: usize = 100;
pub const MIN_PASSWORD_LEN: usize = 8;
pub const MAX_RECEPTION_NO_LEN: usize = 50;
pub const MAX_SEARCH_TERM_LEN: usize = 100;
pub const MAX_NAME_LEN: usize = 200;
pub const MAX_NOTE_LEN: usize = 1000;

/// Characters stripped from search terms and reception numbers.
const UNSAFE_CHARS: &[char] = &['\'', '"', '\\', ';', '=', '|', '&', '<', '>'];

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));
static JS_PROTOCOL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)javascript:").expect("valid regex"));
static EVENT_HANDLER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)on\w+=").expect("valid regex"));

/// First `max_chars` characters of `s` (not bytes: Thai text is multi-byte).
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Strip markup, `javascript:` and inline event handlers, then truncate and trim.
pub fn sanitize_text(text: &str, max_chars: usize) -> String {
    let text = TAG_RE.replace_all(text, "");
    let text = JS_PROTOCOL_RE.replace_all(&text, "");
    let text = EVENT_HANDLER_RE.replace_all(&text, "");
    truncate_chars(&text, max_chars).trim().to_string()
}

/// Remove quote, escape and operator characters, then truncate and trim.
pub fn sanitize_search_input(input: &str, max_chars: usize) -> String {
    let cleaned: String = input.chars().filter(|c| !UNSAFE_CHARS.contains(c)).collect();
    truncate_chars(&cleaned, max_chars).trim().to_string()
}

/// Password policy: 8 to 100 characters with at least one ASCII letter and one digit.
pub fn validate_password(password: &str) -> Result<(), CoreError> {
    let len = password.chars().count();
    if len == 0 {
        return Err(CoreError::Validation("Password is required".into()));
    }
    if len < MIN_PASSWORD_LEN {
        return Err(CoreError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    if len > MAX_PASSWORD_LEN {
        return Err(CoreError::Validation(format!(
            "Password must be at most {MAX_PASSWORD_LEN} characters"
        )));
    }
    let has_letter = password.chars().any(|c| c.is_ascii_alphabetic());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    if !(has_letter && has_digit) {
        return Err(CoreError::Validation(
            "Password must contain both letters and digits".into(),
        ));
    }
    Ok(())
}

/// Trim a required field and reject it when empty or too long.
pub fn require_text(field: &str, value: &str, max_chars: usize) -> Result<String, CoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(format!("{field} is required")));
    }
    if trimmed.chars().count() > max_chars {
        return Err(CoreError::Validation(format!(
            "{field} must be at most {max_chars} characters"
        )));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn strips_markup_and_scripts() {
        let out = sanitize_text(
            r#"<b>hello</b> <a href="javascript:alert(1)">x</a> <img onerror=boom>"#,
            MAX_NOTE_LEN,
        );
        assert_eq!(out, "hello x");

        assert_eq!(sanitize_text("JavaScript:go onClick=do", 100), "go do");
    }

    #[test]
    fn truncates_by_characters() {
        assert_eq!(sanitize_text("ที่ดินที่ดิน", 3), "ที่");
        assert_eq!(truncate_chars("abc", 10), "abc");
    }

    #[test]
    fn search_input_drops_operators() {
        assert_eq!(
            sanitize_search_input(r#" R1"; DROP | x = 1 & <y> "#, 100),
            "R1 DROP  x  1  y"
        );
        assert_eq!(sanitize_search_input(&"9".repeat(150), 100).len(), 100);
    }

    #[test]
    fn password_policy() {
        assert!(validate_password("secret123").is_ok());
        assert_matches!(validate_password(""), Err(CoreError::Validation(_)));
        assert_matches!(validate_password("abc12"), Err(CoreError::Validation(_)));
        assert_matches!(validate_password("onlyletters"), Err(CoreError::Validation(_)));
        assert_matches!(validate_password("12345678"), Err(CoreError::Validation(_)));
        assert_matches!(
            validate_password(&format!("a1{}", "x".repeat(99))),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn required_text() {
        assert_eq!(require_text("owner", "  นายสมชาย  ", MAX_NAME_LEN).unwrap(), "นายสมชาย");
        assert_matches!(require_text("owner", "   ", MAX_NAME_LEN), Err(CoreError::Validation(_)));
        assert_matches!(require_text("owner", "abcd", 3), Err(CoreError::Validation(_)));
    }
}
