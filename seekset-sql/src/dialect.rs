//! SQL dialect implementations for Postgres and `SQLite`.
//!
//! Each dialect handles the specific syntax differences between databases.

use seekset::SortDir;

/// SQL dialect trait for database-specific syntax.
pub trait Dialect: Clone + Copy {
    /// Format a parameter placeholder (e.g., `$1` for Postgres, `?1` for `SQLite`).
    fn param(&self, idx: usize) -> String;

    /// Format a boolean literal.
    fn bool_lit(&self, val: bool) -> &'static str;

    /// Explicit NULL placement for a nullable sort column, or `None` when the
    /// database already sorts `NULL` lowest.
    fn nulls_order(&self, dir: SortDir) -> Option<&'static str>;

    /// The `LIMIT` value to pair with a bare `OFFSET`, if one is required.
    fn unbounded_limit(&self) -> Option<&'static str>;
}

/// Postgres dialect.
///
/// Postgres treats `NULL` as the largest value, so nullable sort columns
/// get an explicit `NULLS FIRST` / `NULLS LAST`.
#[derive(Debug, Clone, Copy, Default)]
#[non_exhaustive]
pub struct Postgres;

impl Dialect for Postgres {
    #[inline]
    fn param(&self, idx: usize) -> String {
        format!("${idx}")
    }

    #[inline]
    fn bool_lit(&self, val: bool) -> &'static str {
        if val { "TRUE" } else { "FALSE" }
    }

    #[inline]
    fn nulls_order(&self, dir: SortDir) -> Option<&'static str> {
        Some(match dir {
            SortDir::Asc => "NULLS FIRST",
            SortDir::Desc => "NULLS LAST",
        })
    }

    #[inline]
    fn unbounded_limit(&self) -> Option<&'static str> {
        None
    }
}

/// `SQLite` dialect.
#[derive(Debug, Clone, Copy, Default)]
#[non_exhaustive]
pub struct Sqlite;

impl Dialect for Sqlite {
    #[inline]
    fn param(&self, idx: usize) -> String {
        format!("?{idx}")
    }

    #[inline]
    fn bool_lit(&self, val: bool) -> &'static str {
        if val { "1" } else { "0" }
    }

    #[inline]
    fn nulls_order(&self, _dir: SortDir) -> Option<&'static str> {
        // NULL is already the smallest value in SQLite.
        None
    }

    #[inline]
    fn unbounded_limit(&self) -> Option<&'static str> {
        Some("-1")
    }
}
