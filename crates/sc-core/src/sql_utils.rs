//! SQL quoting utilities
//!
//! Provides safe quoting for identifiers and string literals when building
//! change history statements.

/// Quote a SQL identifier to prevent injection.
///
/// Wraps the identifier in double quotes and escapes any embedded double quotes
/// by doubling them, following the SQL standard.
///
/// # Examples
/// ```
/// use sc_core::sql_utils::quote_ident;
/// assert_eq!(quote_ident("CHANGE_HISTORY"), r#""CHANGE_HISTORY""#);
/// assert_eq!(quote_ident(r#"my"table"#), r#""my""table""#);
/// ```
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Escape a SQL string literal value by doubling single quotes.
///
/// This is for use inside single-quoted SQL string literals, not identifiers.
pub fn escape_sql_string(value: &str) -> String {
    value.replace('\'', "''")
}

/// Render `value` as a single-quoted SQL string literal.
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", escape_sql_string(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_ident_simple() {
        assert_eq!(quote_ident("VERSION"), r#""VERSION""#);
    }

    #[test]
    fn test_quote_ident_with_embedded_quotes() {
        assert_eq!(quote_ident(r#"my"table"#), r#""my""table""#);
    }

    #[test]
    fn test_quote_ident_with_dots() {
        // Dots are NOT special inside quote_ident
        assert_eq!(quote_ident("schema.table"), r#""schema.table""#);
    }

    #[test]
    fn test_escape_sql_string() {
        assert_eq!(escape_sql_string("hello"), "hello");
        assert_eq!(escape_sql_string("it's"), "it''s");
        assert_eq!(escape_sql_string("O'Brien's"), "O''Brien''s");
    }

    #[test]
    fn test_quote_literal() {
        assert_eq!(quote_literal("Add users"), "'Add users'");
        assert_eq!(quote_literal("Don't"), "'Don''t'");
        assert_eq!(quote_literal(""), "''");
    }
}
