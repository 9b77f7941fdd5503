//! Field validators used by request DTOs.

use std::borrow::Cow;

use validator::{ValidationError, ValidationErrors, ValidationErrorsKind};

use roster_auth::password::validator::{POLICY_MESSAGE, meets_composition};
use roster_core::error::AppError;

const IMAGE_MIME_TYPES: [&str; 7] = [
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "image/webp",
    "image/bmp",
    "image/svg+xml",
];

const DANGEROUS_FRAGMENTS: [&str; 5] = ["<script", "<iframe", "<object", "<embed", "javascript:"];

fn error(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

/// True when `value` contains an `on<event>=` attribute such as `onclick =`.
fn has_event_handler(value: &str) -> bool {
    let bytes = value.as_bytes();
    let mut i = 0;
    while let Some(pos) = value[i..].find("on") {
        let start = i + pos;
        let mut j = start + 2;
        let name_start = j;
        while j < bytes.len() && (bytes[j].is_ascii_alphanumeric() || bytes[j] == b'_') {
            j += 1;
        }
        let has_name = j > name_start;
        while j < bytes.len() && bytes[j].is_ascii_whitespace() {
            j += 1;
        }
        if has_name && j < bytes.len() && bytes[j] == b'=' {
            return true;
        }
        i = start + 2;
    }
    false
}

/// True when `value` contains something shaped like an HTML tag.
fn has_html_tag(value: &str) -> bool {
    value.split('<').skip(1).any(|rest| {
        rest.starts_with(|c: char| c.is_ascii_alphabetic() || c == '/' || c == '!')
            && rest.contains('>')
    })
}

/// Rejects names carrying markup, script URLs or inline event handlers.
pub fn no_xss(value: &str) -> Result<(), ValidationError> {
    let lowered = value.to_ascii_lowercase();
    let dangerous = DANGEROUS_FRAGMENTS.iter().any(|f| lowered.contains(f))
        || has_event_handler(&lowered)
        || has_html_tag(&lowered);

    if dangerous {
        return Err(error("no_xss", "contains potentially dangerous content"));
    }
    Ok(())
}

/// Accepts an empty string (clears the avatar), an http(s) URL, or a base64
/// image data URL.
pub fn image_url(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Ok(());
    }

    if let Some(rest) = value.strip_prefix("data:") {
        let Some((mime, payload)) = rest.split_once(";base64,") else {
            return Err(error("image_url", "must be a valid image data URL"));
        };
        let mime_ok = IMAGE_MIME_TYPES.contains(&mime.to_ascii_lowercase().as_str());
        let payload_ok = !payload.is_empty()
            && payload
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'+' | b'/' | b'='));
        if mime_ok && payload_ok {
            return Ok(());
        }
        return Err(error("image_url", "must be a valid image data URL"));
    }

    let host = value
        .strip_prefix("https://")
        .or_else(|| value.strip_prefix("http://"));
    match host {
        Some(rest) if !rest.is_empty() && !rest.starts_with('/') && !rest.contains(' ') => Ok(()),
        _ => Err(error("image_url", "must be an http(s) URL or an image data URL")),
    }
}

/// Password composition rule shared with the service layer.
pub fn password_policy(value: &str) -> Result<(), ValidationError> {
    if meets_composition(value) {
        Ok(())
    } else {
        Err(error("password_policy", POLICY_MESSAGE))
    }
}

/// Rejects blank strings that `length(min = 1)` would let through as spaces.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(error("not_blank", "must not be empty"));
    }
    Ok(())
}

/// Collects field errors into `{ field: [message, ..] }`, flattening nested structs.
fn collect(
    errors: &ValidationErrors,
    prefix: &str,
    out: &mut serde_json::Map<String, serde_json::Value>,
) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };
        match kind {
            ValidationErrorsKind::Field(list) => {
                let messages = list
                    .iter()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| format!("{path} is invalid ({})", e.code))
                    })
                    .map(serde_json::Value::String)
                    .collect();
                out.insert(path, serde_json::Value::Array(messages));
            }
            ValidationErrorsKind::Struct(inner) => collect(inner, &path, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect(inner, &format!("{path}[{index}]"), out);
                }
            }
        }
    }
}

/// Converts `validator` output into a validation error with per-field details.
pub fn into_app_error(errors: ValidationErrors) -> AppError {
    let mut fields = serde_json::Map::new();
    collect(&errors, "", &mut fields);
    AppError::validation("Validation failed").with_details(serde_json::Value::Object(fields))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_xss_rejects_markup_and_handlers() {
        assert!(no_xss("Ada").is_ok());
        assert!(no_xss("Jean-Luc O'Neil").is_ok());
        assert!(no_xss("a < b and c > d").is_ok());

        assert!(no_xss("<script>alert(1)</script>").is_err());
        assert!(no_xss("<b>bold</b>").is_err());
        assert!(no_xss("JavaScript:alert(1)").is_err());
        assert!(no_xss("x onerror = alert(1)").is_err());
    }

    #[test]
    fn test_no_xss_allows_words_containing_on() {
        assert!(no_xss("Jonathan").is_ok());
        assert!(no_xss("Simon Conway").is_ok());
    }

    #[test]
    fn test_image_url_accepts_http_and_image_data() {
        assert!(image_url("").is_ok());
        assert!(image_url("https://cdn.example.com/a.png").is_ok());
        assert!(image_url("http://example.com/avatar").is_ok());
        assert!(image_url("data:image/png;base64,iVBORw0KGgo=").is_ok());

        assert!(image_url("ftp://example.com/a.png").is_err());
        assert!(image_url("data:text/html;base64,PGgxPg==").is_err());
        assert!(image_url("data:image/png;base64,").is_err());
        assert!(image_url("https://").is_err());
    }

    #[test]
    fn test_password_policy_matches_service_rule() {
        assert!(password_policy("Secret1!").is_ok());
        let err = password_policy("secret").unwrap_err();
        assert_eq!(err.message.as_deref(), Some(POLICY_MESSAGE));
    }
}
