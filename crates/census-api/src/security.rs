//! Output sanitization helpers.
//!
//! This module provides:
//! - HTML escaping for values rendered into the admin view
//! - Log-safe truncation of user-provided strings

/// Maximum length of a user-provided value written to logs.
pub const MAX_LOG_FIELD_LENGTH: usize = 254;

/// Escape text for inclusion in HTML element content or quoted attributes.
pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Sanitize a user-provided string for safe logging.
///
/// Drops control characters so a crafted email cannot forge log lines.
pub fn sanitize_for_log(input: &str) -> String {
    input
        .chars()
        .filter(|c| !c.is_control())
        .take(MAX_LOG_FIELD_LENGTH)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("admin"), "admin");
        assert_eq!(
            escape_html("<script>alert('x')</script>"),
            "&lt;script&gt;alert(&#x27;x&#x27;)&lt;/script&gt;"
        );
        assert_eq!(escape_html("a & \"b\""), "a &amp; &quot;b&quot;");
    }

    #[test]
    fn test_sanitize_for_log() {
        assert_eq!(sanitize_for_log("a@b.co\n[INFO] forged"), "a@b.co[INFO] forged");
        assert_eq!(sanitize_for_log(&"x".repeat(1000)).len(), MAX_LOG_FIELD_LENGTH);
    }
}
