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
#![allow(clippy::doc_markdown)] // SQL keywords in prose
#![allow(clippy::missing_errors_doc)] // Error enums document their variants
#![allow(clippy::module_name_repetitions)] // Type names matching module - acceptable
#![allow(clippy::return_self_not_must_use)] // Builder pattern methods return Self
#![allow(clippy::must_use_candidate)] // Fluent API doesn't need must_use everywhere
#![allow(clippy::cast_precision_loss)] // Int/Float value comparison
#![allow(clippy::future_not_send)] // Send-ness follows the caller's source and resolver

//! # seekset - Keyset and Offset Pagination
//!
//! Seek-based pagination over any ordered data source. A [`KeysetDefinition`]
//! names the columns a result set is sorted by; the engine turns a navigation
//! intent (first page, last page, after a row, before a row) into a filter
//! predicate and sort order, runs it against a [`Queryable`] and computes
//! accurate `has_previous` / `has_next` flags.
//!
//! ## Quick Start
//!
//! ```
//! use seekset::prelude::*;
//!
//! #[derive(Clone)]
//! struct Order { id: i64, shipped: Option<i64> }
//!
//! let source = MemSource::new(
//!     (1..=30).map(|id| Order { id, shipped: (id % 2 == 0).then_some(id) }).collect(),
//! );
//!
//! // NULL sorts lowest: first under ASC, last under DESC.
//! let keyset = KeysetDefinition::<Order>::build(|b| {
//!     b.descending("shipped", |o| o.shipped).ascending("id", |o| o.id)
//! })
//! .unwrap();
//!
//! let page = futures::executor::block_on(
//!     Paginator::default().keyset(&source, &keyset, &KeysetRequest::first().with_size(5), no_reference),
//! )
//! .unwrap();
//!
//! assert_eq!(page.data.iter().map(|o| o.id).collect::<Vec<_>>(), vec![30, 28, 26, 24, 22]);
//! assert!(!page.has_previous);
//! assert!(page.has_next);
//! ```
//!
//! ## Seek predicates
//!
//! Rows after `(a, b) = (1, 2)` under `a ASC, b DESC` are matched by
//!
//! ```text
//! a > 1 OR (a = 1 AND b < 2)
//! ```
//!
//! Backward traversal (last page, `before`) flips every column, seeks
//! forward and reverses the fetched page, so `data` is always in the
//! definition's order.
//!
//! ## Query parameters
//!
//! ```
//! use seekset::{KeysetRequest, NavigationIntent, PaginationOptions, QueryParams, ReferenceToken};
//!
//! let options = PaginationOptions::default();
//! let request = KeysetRequest::from_query(&QueryParams::parse("?after=20"), &options);
//! assert_eq!(request.intent, NavigationIntent::After(ReferenceToken::Int(20)));
//! ```

mod compile;
mod error;
mod mem;
mod options;
mod ordering;
mod page;
mod paginate;
mod predicate;
mod request;
mod source;
mod value;

pub use compile::{CompiledKeyset, compile, seek_after};
pub use error::{ConfigError, DefinitionError, PaginationError};
pub use mem::MemSource;
pub use options::{
    DEFAULT_MAX_PAGE_SIZE, DEFAULT_PAGE_SIZE, ENV_DEFAULT_SIZE, ENV_MAX_SIZE, ENV_SIZE_FROM_QUERY,
    PaginationOptions,
};
pub use ordering::{
    Column, KeysetBuilder, KeysetDefinition, SortDir, SortKey, TraversalDirection, compare_by,
};
pub use page::{KeysetPage, OffsetPage};
pub use paginate::{Paginator, no_reference};
pub use predicate::{CompoundPredicate, Condition, LogicalOp, Operator, Predicate};
pub use request::{KeysetRequest, NavigationIntent, OffsetRequest, QueryParams, ReferenceToken};
pub use source::{Query, Queryable};
pub use value::{KeyValue, Value};

/// Prelude module for convenient imports.
///
/// ```
/// use seekset::prelude::*;
/// let options = PaginationOptions::default();
/// assert_eq!(options.resolve_size(Some(1000)), 100);
/// ```
pub mod prelude {
    pub use crate::{
        KeyValue, KeysetDefinition, KeysetPage, KeysetRequest, MemSource, NavigationIntent,
        OffsetPage, OffsetRequest, PaginationError, PaginationOptions, Paginator, Predicate, Query,
        Queryable, QueryParams, ReferenceToken, SortDir, TraversalDirection, Value, no_reference,
    };
}
