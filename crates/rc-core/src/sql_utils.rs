//! SQL identifier quoting utilities
//!
//! Provides quoting for SQL identifiers and string literals used when
//! rendering relations and catalog queries.

/// Wrap an identifier in `quote_char`, doubling any embedded occurrence.
///
/// # Examples
/// ```
/// use rc_core::sql_utils::quote_with;
/// assert_eq!(quote_with('`', "orders"), "`orders`");
/// assert_eq!(quote_with('`', "a`b"), "`a``b`");
/// ```
pub fn quote_with(quote_char: char, ident: &str) -> String {
    let mut out = String::with_capacity(ident.len() + 2);
    out.push(quote_char);
    for c in ident.chars() {
        if c == quote_char {
            out.push(quote_char);
        }
        out.push(c);
    }
    out.push(quote_char);
    out
}

/// Quote a SQL identifier with standard double quotes.
///
/// # Examples
/// ```
/// use rc_core::sql_utils::quote_ident;
/// assert_eq!(quote_ident("users"), r#""users""#);
/// assert_eq!(quote_ident(r#"my"table"#), r#""my""table""#);
/// ```
pub fn quote_ident(ident: &str) -> String {
    quote_with('"', ident)
}

/// Remove exactly one leading and one trailing character.
///
/// Strings shorter than two characters strip to the empty string.
pub fn strip_outer(value: &str) -> &str {
    let mut chars = value.char_indices();
    let start = match chars.next() {
        Some((_, c)) => c.len_utf8(),
        None => return "",
    };
    match chars.next_back() {
        Some((end, _)) => &value[start..end],
        None => "",
    }
}

/// Escape a SQL string literal value by doubling single quotes.
///
/// This is for use inside single-quoted SQL string literals, not identifiers.
pub fn escape_sql_string(value: &str) -> String {
    value.replace('\'', "''")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_ident_simple() {
        assert_eq!(quote_ident("users"), r#""users""#);
    }

    #[test]
    fn test_quote_ident_with_embedded_quotes() {
        assert_eq!(quote_ident(r#"my"table"#), r#""my""table""#);
    }

    #[test]
    fn test_quote_ident_empty() {
        assert_eq!(quote_ident(""), r#""""#);
    }

    #[test]
    fn test_quote_with_dots() {
        // Dots are NOT special inside a quoted identifier
        assert_eq!(quote_with('"', "schema.table"), r#""schema.table""#);
    }

    #[test]
    fn test_quote_with_backtick() {
        assert_eq!(quote_with('`', "events"), "`events`");
        assert_eq!(quote_with('`', r#"a"b"#), r#"`a"b`"#);
    }

    #[test]
    fn test_strip_outer() {
        assert_eq!(strip_outer(r#""orders""#), "orders");
        assert_eq!(strip_outer("ab"), "");
        assert_eq!(strip_outer("a"), "");
        assert_eq!(strip_outer(""), "");
    }

    #[test]
    fn test_strip_outer_multibyte() {
        assert_eq!(strip_outer("«naïve»"), "naïve");
    }

    #[test]
    fn test_escape_sql_string() {
        assert_eq!(escape_sql_string("hello"), "hello");
        assert_eq!(escape_sql_string("it's"), "it''s");
        assert_eq!(escape_sql_string("O'Brien's"), "O''Brien''s");
    }
}
