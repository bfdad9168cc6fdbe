// =============================================================================
// CRATE-LEVEL QUALITY LINTS (following Tokio/Serde standards)
// =============================================================================
#![forbid(unsafe_code)]
#![deny(unused_must_use)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![warn(rust_2018_idioms)]
#![warn(unreachable_pub)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
// =============================================================================
// CLIPPY CONFIGURATION
// =============================================================================
#![allow(clippy::doc_markdown)] // SQL keywords in docs
#![allow(clippy::missing_panics_doc)] // Identifier asserts are documented on constructors
#![allow(clippy::format_push_string)] // String building style preference
#![allow(clippy::module_name_repetitions)] // Type names matching module - acceptable

//! # seekset-sql - SQL rendering for keyset pagination
//!
//! Turns the predicates and sort orders produced by [`seekset`] into
//! parameterized SQL for Postgres (`$1`) and `SQLite` (`?1`).
//!
//! ```
//! use seekset::{KeysetDefinition, Query, TraversalDirection, compile};
//! use seekset_sql::postgres;
//!
//! struct Post { id: i64, published: Option<i64> }
//!
//! let keyset = KeysetDefinition::<Post>::build(|b| {
//!     b.descending("published", |p| p.published).ascending("id", |p| p.id)
//! })
//! .unwrap();
//!
//! let reference = Post { id: 42, published: Some(1_700_000_000) };
//! let compiled = compile(&keyset, TraversalDirection::Forward, Some(&reference));
//! let result = postgres("posts").select(&Query::seek(compiled, 20));
//!
//! assert_eq!(
//!     result.sql,
//!     "SELECT * FROM posts WHERE (published < $1 OR published IS NULL OR \
//!      (published = $2 AND id > $3)) ORDER BY published DESC NULLS LAST, id ASC LIMIT 20"
//! );
//! assert_eq!(result.params.len(), 3);
//! ```
//!
//! ## NULL ordering
//!
//! `NULL` sorts lowest: first under `ASC`, last under `DESC`. `SQLite` does
//! this natively; Postgres gets explicit `NULLS FIRST` / `NULLS LAST` on
//! nullable columns.

mod dialect;
mod render;
mod select;
mod validate;

pub use dialect::{Dialect, Postgres, Sqlite};
pub use select::{QueryResult, SqlTable};
pub use validate::{assert_valid_sql_identifier, is_valid_sql_identifier};

/// Table handle for Postgres.
///
/// # Panics
///
/// Panics if the table name is not a valid SQL identifier.
#[must_use]
pub fn postgres(table: &str) -> SqlTable<Postgres> {
    SqlTable::new(Postgres, table)
}

/// Table handle for `SQLite`.
///
/// # Panics
///
/// Panics if the table name is not a valid SQL identifier.
#[must_use]
pub fn sqlite(table: &str) -> SqlTable<Sqlite> {
    SqlTable::new(Sqlite, table)
}

#[cfg(test)]
mod tests {
    use super::*;

    static_assertions::assert_impl_all!(SqlTable<Postgres>: Send, Sync, Clone);
    static_assertions::assert_impl_all!(SqlTable<Sqlite>: Send, Sync, Clone);
}
