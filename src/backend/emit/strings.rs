//! String and number literal spelling shared by the text emitters.

/// Quote `s` as a JSON string.
///
/// The result is a valid string literal in Python, Java, C#, JavaScript and TypeScript: JSON only produces the
/// escapes `\" \\ \b \f \n \r \t \uXXXX`, all of which those languages accept.
pub fn quote_json(s: &str) -> String {
    // Serializing a `str` cannot fail.
    serde_json::to_string(s).unwrap_or_else(|_| String::from("\"\""))
}

/// Quote `s` as a Kotlin string literal (`$` starts a template, `\f` is not an escape).
pub fn quote_kotlin(s: &str) -> String {
    quote_json(s).replace('$', "\\$").replace("\\f", "\\u000C")
}

/// Quote `s` as a C string literal using only simple and octal escapes.
pub fn quote_c(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for byte in s.bytes() {
        match byte {
            b'"' => out.push_str("\\\""),
            b'\\' => out.push_str("\\\\"),
            b'\n' => out.push_str("\\n"),
            b'\r' => out.push_str("\\r"),
            b'\t' => out.push_str("\\t"),
            // `?` would start a trigraph.
            b'?' => out.push_str("\\?"),
            0x20..=0x7e => out.push(byte as char),
            _ => out.push_str(&format!("\\{:03o}", byte)),
        }
    }
    out.push('"');
    out
}

/// Quote `s` as a Haskell string literal.
///
/// Control characters use decimal escapes closed by `\&`, so a following digit is never read as part of the escape.
pub fn quote_haskell(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\{}\\&", u32::from(c))),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Spell a real so every target reads it as floating point (`1.0`, not `1`).
pub fn real(value: f64) -> String {
    let text = format!("{value:?}");
    if text.contains(['.', 'e', 'E', 'N', 'i']) {
        text
    } else {
        format!("{text}.0")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_json_escapes() {
        assert_eq!(quote_json("a\"b\\c\n"), r#""a\"b\\c\n""#);
    }

    #[test]
    fn test_quote_haskell_terminates_numeric_escapes() {
        assert_eq!(quote_haskell("a\"b\\c\n"), r#""a\"b\\c\n""#);
        assert_eq!(quote_haskell("\u{1}2"), r#""\1\&2""#);
        assert_eq!(quote_haskell("héllo"), "\"héllo\"");
    }

    #[test]
    fn test_quote_kotlin_escapes_template() {
        assert_eq!(quote_kotlin("cost: $5"), r#""cost: \$5""#);
        assert_eq!(quote_kotlin("\u{c}"), r#""\u000C""#);
    }

    #[test]
    fn test_quote_c_uses_octal_for_non_ascii() {
        assert_eq!(quote_c("é"), r#""\303\251""#);
        assert_eq!(quote_c("a?b"), r#""a\?b""#);
        assert_eq!(quote_c("tab\t"), r#""tab\t""#);
    }

    #[test]
    fn test_real_always_has_fraction() {
        assert_eq!(real(1.0), "1.0");
        assert_eq!(real(2.5), "2.5");
        assert_eq!(real(1e300), "1e300");
    }
}
