//! SQL identifier quoting.

/// Quotes an identifier so PostgreSQL treats it literally.
///
/// The name is wrapped in double quotes and every embedded double quote is
/// doubled. Any string is accepted, including names with spaces, punctuation,
/// or reserved words.
///
/// # Example
/// ```rust
/// use doublecheck_core::quoting::quote_identifier;
///
/// assert_eq!(quote_identifier("syntax error"), r#""syntax error""#);
/// assert_eq!(quote_identifier(r#"a"b"#), r#""a""b""#);
/// ```
pub fn quote_identifier(name: &str) -> String {
    let mut quoted = String::with_capacity(name.len().saturating_add(2));
    quoted.push('"');
    for ch in name.chars() {
        if ch == '"' {
            quoted.push('"');
        }
        quoted.push(ch);
    }
    quoted.push('"');
    quoted
}

/// Quotes a `schema.relation` pair.
pub fn qualified_name(schema: &str, relation: &str) -> String {
    format!("{}.{}", quote_identifier(schema), quote_identifier(relation))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_identifier() {
        assert_eq!(quote_identifier("without_errors"), "\"without_errors\"");
    }

    #[test]
    fn test_identifier_with_space() {
        assert_eq!(quote_identifier("syntax error"), "\"syntax error\"");
    }

    #[test]
    fn test_embedded_quotes_are_doubled() {
        assert_eq!(quote_identifier("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(quote_identifier("\""), "\"\"\"\"");
    }

    #[test]
    fn test_injection_attempt_stays_inside_identifier() {
        let quoted = quote_identifier("x\"; DROP TABLE users; --");
        assert_eq!(quoted, "\"x\"\"; DROP TABLE users; --\"");
        // The only unpaired quotes are the delimiters.
        let inner = &quoted[1..quoted.len() - 1];
        assert!(!inner.replace("\"\"", "").contains('"'));
    }

    #[test]
    fn test_empty_and_unicode() {
        assert_eq!(quote_identifier(""), "\"\"");
        assert_eq!(quote_identifier("prüfung ✓"), "\"prüfung ✓\"");
    }

    #[test]
    fn test_qualified_name() {
        assert_eq!(
            qualified_name("doublecheck", "syntax error"),
            "\"doublecheck\".\"syntax error\""
        );
    }
}
