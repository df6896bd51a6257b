//! Utility functions and helpers

/// Group the digits of an unsigned integer string with a separator
pub fn group_thousands(digits: &str, separator: &str) -> String {
    let mut result = String::new();
    let mut count = 0;
    for c in digits.chars().rev() {
        if count == 3 {
            result.push_str(&separator.chars().rev().collect::<String>());
            count = 0;
        }
        result.push(c);
        count += 1;
    }
    result.chars().rev().collect()
}

/// Escape text for inclusion in HTML content or quoted attributes
pub fn escape_html(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    for c in content.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape text for a quoted attribute value, keeping line breaks
pub fn html_attr(content: &str) -> String {
    escape_html(content).replace('\n', "&#10;").replace('\r', "")
}

/// Generate a short hash (16 hex characters) from content
pub fn short_hash(content: &str) -> String {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    format!("{:016x}", hasher.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands("1234567", " "), "1 234 567");
        assert_eq!(group_thousands("123", ","), "123");
        assert_eq!(group_thousands("1000", ","), "1,000");
        assert_eq!(group_thousands("", ","), "");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b onclick="x">Tom & 'Jerry'</b>"#),
            "&lt;b onclick=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_html_attr_keeps_line_breaks() {
        assert_eq!(html_attr("a'b\r\nc"), "a&#39;b&#10;c");
    }

    #[test]
    fn test_short_hash_is_stable() {
        assert_eq!(short_hash("token"), short_hash("token"));
        assert_ne!(short_hash("token-a"), short_hash("token-b"));
        assert_eq!(short_hash("token").len(), 16);
    }
}
