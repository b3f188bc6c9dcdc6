#![forbid(unsafe_code)]

//! Entity escaping for attribute values written into the config.
//!
//! - `&` → `&amp;`, `<` → `&lt;`
//! - the delimiting quote → `&quot;` or `&apos;`
//! - `\t` → `&#x9;`, `\n` → `&#xA;`, `\r` → `&#xD;` (otherwise normalized away)

/// Escape an attribute value delimited by double quotes.
pub fn escape_attr(s: &str) -> String {
    escape_attr_quoted(s, '"')
}

/// Escape an attribute value delimited by `quote` (`"` or `'`).
pub fn escape_attr_quoted(s: &str, quote: char) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '"' if quote == '"' => out.push_str("&quot;"),
            '\'' if quote == '\'' => out.push_str("&apos;"),
            '\t' => out.push_str("&#x9;"),
            '\n' => out.push_str("&#xA;"),
            '\r' => out.push_str("&#xD;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_attr() {
        assert_eq!(escape_attr("ABCDEF0123"), "ABCDEF0123");
        assert_eq!(escape_attr("a&b\"c<d>"), "a&amp;b&quot;c&lt;d>");
        assert_eq!(escape_attr("a\tb\nc\rd"), "a&#x9;b&#xA;c&#xD;d");
        assert_eq!(escape_attr("it's"), "it's");
    }

    #[test]
    fn test_escape_single_quoted() {
        assert_eq!(escape_attr_quoted("it's \"x\"", '\''), "it&apos;s \"x\"");
    }
}
