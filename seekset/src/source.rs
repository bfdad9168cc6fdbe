//! The queryable capability set the orchestrators run against.

use std::future::Future;

use crate::compile::CompiledKeyset;
use crate::ordering::SortKey;
use crate::predicate::Predicate;

/// One query against a [`Queryable`]: filter, order, skip, take.
pub struct Query<T> {
    /// Rows to keep.
    pub filter: Predicate<T>,
    /// Sort keys in priority order; empty means the source's natural order.
    pub order: Vec<SortKey<T>>,
    /// Rows to skip after ordering.
    pub skip: u64,
    /// Maximum rows to return; `None` is unbounded.
    pub take: Option<u64>,
}

impl<T> Query<T> {
    /// Unfiltered, unordered, unbounded.
    pub const fn all() -> Self {
        Self {
            filter: Predicate::Always,
            order: Vec::new(),
            skip: 0,
            take: None,
        }
    }

    /// Query for a compiled keyset page.
    pub fn seek(compiled: CompiledKeyset<T>, take: u64) -> Self {
        Self {
            filter: compiled.predicate,
            order: compiled.order,
            skip: 0,
            take: Some(take),
        }
    }

    /// Query for an offset window in natural order.
    pub const fn window(skip: u64, take: u64) -> Self {
        Self {
            filter: Predicate::Always,
            order: Vec::new(),
            skip,
            take: Some(take),
        }
    }

    /// Replace the filter.
    pub fn filter(mut self, filter: Predicate<T>) -> Self {
        self.filter = filter;
        self
    }

    /// Replace the ordering.
    pub fn order_by(mut self, order: Vec<SortKey<T>>) -> Self {
        self.order = order;
        self
    }

    /// Limit the number of rows.
    pub fn take(mut self, take: u64) -> Self {
        self.take = Some(take);
        self
    }
}

impl<T> Clone for Query<T> {
    fn clone(&self) -> Self {
        Self {
            filter: self.filter.clone(),
            order: self.order.clone(),
            skip: self.skip,
            take: self.take,
        }
    }
}

impl<T> std::fmt::Debug for Query<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Query")
            .field("filter", &self.filter)
            .field("order", &self.order)
            .field("skip", &self.skip)
            .field("take", &self.take)
            .finish()
    }
}

/// A source of entities that can be filtered, ordered, windowed and counted.
///
/// This is the only thing the orchestrators know about storage. Reads issued
/// for one page request may run concurrently; implementations that need a
/// consistent snapshot across them must provide it themselves.
///
/// All methods return futures that are `Send`.
pub trait Queryable: Send + Sync {
    /// The entity type.
    type Item: Send;
    /// The source's error type, surfaced unchanged to callers.
    type Error: core::error::Error + Send + Sync + 'static;

    /// Count rows matching `filter`.
    fn count(&self, filter: &Predicate<Self::Item>)
    -> impl Future<Output = Result<u64, Self::Error>> + Send;

    /// Run a query and collect the rows.
    fn fetch(
        &self,
        query: &Query<Self::Item>,
    ) -> impl Future<Output = Result<Vec<Self::Item>, Self::Error>> + Send;

    /// Whether any row matches `filter`.
    ///
    /// The default fetches at most one row; override with a cheaper
    /// native existence check where one exists.
    fn exists(
        &self,
        filter: &Predicate<Self::Item>,
    ) -> impl Future<Output = Result<bool, Self::Error>> + Send {
        let probe = Query::all().filter(filter.clone()).take(1);
        async move { Ok(!self.fetch(&probe).await?.is_empty()) }
    }
}
