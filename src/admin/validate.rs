//! Boundary checks applied before anything reaches the repository.

use serde_json::Value as Json;

use super::error::AdminError;

fn starts_tag(next: Option<char>) -> bool {
    matches!(next, Some(c) if c.is_ascii_alphabetic() || c == '/' || c == '!' || c == '?')
}

/// Strip markup tags, drop control characters, collapse whitespace runs into
/// single spaces and trim.
///
/// A `<` that does not open a tag (`a < b`) is kept as text.
pub fn sanitize_text_field(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    let mut pending_space = false;

    while let Some(c) = chars.next() {
        if c == '<' && starts_tag(chars.peek().copied()) {
            // Unterminated tags swallow the rest of the input.
            for t in chars.by_ref() {
                if t == '>' {
                    break;
                }
            }
            continue;
        }
        if c.is_whitespace() {
            pending_space = true;
            continue;
        }
        if c.is_control() {
            continue;
        }
        if pending_space && !out.is_empty() {
            out.push(' ');
        }
        pending_space = false;
        out.push(c);
    }
    out
}

/// Sanitized value of a required text field.
pub fn required_text(field: &str, raw: Option<&str>) -> Result<String, AdminError> {
    let raw = raw.ok_or_else(|| AdminError::missing(field))?;
    let clean = sanitize_text_field(raw);
    if clean.is_empty() {
        return Err(AdminError::invalid(field));
    }
    Ok(clean)
}

/// Sanitized value of an optional text field; present but blank is rejected.
pub fn optional_text(field: &str, raw: Option<&str>) -> Result<Option<String>, AdminError> {
    raw.map(|r| required_text(field, Some(r))).transpose()
}

/// Parse a non-negative integer id given as text (path segments, CLI flags).
pub fn parse_id(field: &str, raw: &str) -> Result<i64, AdminError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AdminError::invalid(field));
    }
    trimmed
        .parse::<i64>()
        .map_err(|_| AdminError::invalid(field))
}

/// Parse a required id from a JSON body, accepting numbers and numeric strings.
pub fn json_id(field: &str, raw: Option<&Json>) -> Result<i64, AdminError> {
    match raw {
        None | Some(Json::Null) => Err(AdminError::missing(field)),
        Some(value) => json_id_value(field, value),
    }
}

/// Like [`json_id`] but absent and `null` read as `None`.
pub fn optional_json_id(field: &str, raw: Option<&Json>) -> Result<Option<i64>, AdminError> {
    match raw {
        None | Some(Json::Null) => Ok(None),
        Some(value) => json_id_value(field, value).map(Some),
    }
}

fn json_id_value(field: &str, value: &Json) -> Result<i64, AdminError> {
    match value {
        Json::Number(n) => n
            .as_u64()
            .and_then(|n| i64::try_from(n).ok())
            .ok_or_else(|| AdminError::invalid(field)),
        Json::String(s) => parse_id(field, s),
        _ => Err(AdminError::invalid(field)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sanitize_strips_tags_and_collapses_whitespace() {
        assert_eq!(
            sanitize_text_field("  <b>Billing</b>\n\thelp  "),
            "Billing help"
        );
        assert_eq!(sanitize_text_field("<em>Bill</em>ing"), "Billing");
        assert_eq!(sanitize_text_field("a < b"), "a < b");
        assert_eq!(sanitize_text_field("bell\u{7}less"), "bellless");
        assert_eq!(sanitize_text_field("   "), "");
    }

    #[test]
    fn sanitize_keeps_sql_metacharacters() {
        assert_eq!(sanitize_text_field("' OR '1'='1"), "' OR '1'='1");
    }

    #[test]
    fn required_text_rejects_missing_and_blank() {
        assert!(matches!(
            required_text("link_url", None),
            Err(AdminError::Validation(_))
        ));
        assert!(matches!(
            required_text("link_url", Some("<br/>")),
            Err(AdminError::Validation(_))
        ));
        assert_eq!(
            required_text("link_url", Some(" https://x ")).unwrap(),
            "https://x"
        );
        assert_eq!(optional_text("link_label", None).unwrap(), None);
    }

    #[test]
    fn ids_must_be_numeric() {
        assert_eq!(parse_id("id", "42").unwrap(), 42);
        assert_eq!(parse_id("id", " 7 ").unwrap(), 7);
        for bad in ["", "abc", "-1", "1.5", "1; DROP TABLE x", "99999999999999999999"] {
            assert!(
                matches!(parse_id("id", bad), Err(AdminError::Validation(_))),
                "{bad:?} accepted"
            );
        }
    }

    #[test]
    fn json_ids_accept_numbers_and_numeric_strings() {
        assert_eq!(json_id("link_id", Some(&json!(3))).unwrap(), 3);
        assert_eq!(json_id("link_id", Some(&json!("3"))).unwrap(), 3);
        assert!(json_id("link_id", Some(&json!(-3))).is_err());
        assert!(json_id("link_id", Some(&json!(1.5))).is_err());
        assert!(json_id("link_id", Some(&json!(true))).is_err());
        assert!(json_id("link_id", None).is_err());
        assert_eq!(optional_json_id("link_id", Some(&json!(null))).unwrap(), None);
    }
}
