//! Identifier validation for SQL injection prevention.

/// Maximum length for SQL identifiers (`PostgreSQL` limit is 63).
const MAX_IDENTIFIER_LENGTH: usize = 63;

/// Validate that a string is a safe SQL identifier.
///
/// A valid SQL identifier:
/// - Starts with a letter (a-z, A-Z) or underscore
/// - Contains only letters, digits (0-9), and underscores
/// - Is not empty and not longer than 63 characters
///
/// ```
/// use seekset_sql::is_valid_sql_identifier;
///
/// assert!(is_valid_sql_identifier("orders"));
/// assert!(is_valid_sql_identifier("shipped_at"));
/// assert!(!is_valid_sql_identifier("1st"));
/// assert!(!is_valid_sql_identifier("id; DROP TABLE orders"));
/// ```
#[inline]
#[must_use]
pub fn is_valid_sql_identifier(s: &str) -> bool {
    if s.is_empty() || s.len() > MAX_IDENTIFIER_LENGTH {
        return false;
    }

    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {},
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Assert that a string is a valid SQL identifier.
///
/// # Panics
///
/// Panics if the identifier is invalid. Table and column names come from
/// code, so an invalid one is a programmer error.
///
/// ```should_panic
/// use seekset_sql::assert_valid_sql_identifier;
///
/// assert_valid_sql_identifier("orders; --", "table");
/// ```
#[inline]
pub fn assert_valid_sql_identifier(s: &str, context: &str) {
    assert!(
        is_valid_sql_identifier(s),
        "Invalid SQL {context} name '{s}': must start with letter/underscore, \
             contain only ASCII alphanumeric/underscore, and be 1-63 chars"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_identifiers() {
        assert!(is_valid_sql_identifier("id"));
        assert!(is_valid_sql_identifier("_shadow"));
        assert!(is_valid_sql_identifier("CreatedAt2"));
        assert!(is_valid_sql_identifier(&"a".repeat(63)));
    }

    #[test]
    fn test_invalid_identifiers() {
        assert!(!is_valid_sql_identifier(""));
        assert!(!is_valid_sql_identifier(&"a".repeat(64)));
        assert!(!is_valid_sql_identifier("9lives"));
        assert!(!is_valid_sql_identifier("orders.id"));
        assert!(!is_valid_sql_identifier("id--"));
        assert!(!is_valid_sql_identifier("naïve"));
        assert!(!is_valid_sql_identifier("(SELECT 1)"));
    }

    #[test]
    #[should_panic(expected = "Invalid SQL column name")]
    fn test_assert_panics() {
        assert_valid_sql_identifier("a b", "column");
    }
}
