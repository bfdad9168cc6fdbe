//! In-memory [`Queryable`] backend.
//!
//! Evaluates predicates and sort keys directly against the stored entities.
//! Useful for tests, fixtures and small data sets that are already loaded.

use std::convert::Infallible;
use std::future::{Future, ready};

use crate::ordering::compare_by;
use crate::predicate::Predicate;
use crate::source::{Query, Queryable};

/// An in-memory data source over owned rows.
///
/// Rows keep their insertion order as the natural order.
#[derive(Debug, Clone, Default)]
pub struct MemSource<T> {
    rows: Vec<T>,
}

impl<T> MemSource<T> {
    /// Create a source over the given rows.
    pub const fn new(rows: Vec<T>) -> Self {
        Self { rows }
    }

    /// The stored rows in natural order.
    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    /// Find the first row matching `pred`, cloned.
    ///
    /// Handy as a reference resolver in tests.
    pub fn find(&self, pred: impl Fn(&T) -> bool) -> Option<T>
    where
        T: Clone,
    {
        self.rows.iter().find(|row| pred(row)).cloned()
    }

    fn run(&self, query: &Query<T>) -> Vec<T>
    where
        T: Clone,
    {
        let mut matched: Vec<&T> = self
            .rows
            .iter()
            .filter(|row| query.filter.matches(row))
            .collect();
        if !query.order.is_empty() {
            // Stable sort keeps natural order among full ties.
            matched.sort_by(|a, b| compare_by(&query.order, *a, *b));
        }
        let skip = usize::try_from(query.skip).unwrap_or(usize::MAX);
        let take = query
            .take
            .map_or(usize::MAX, |t| usize::try_from(t).unwrap_or(usize::MAX));
        matched.into_iter().skip(skip).take(take).cloned().collect()
    }
}

impl<T> From<Vec<T>> for MemSource<T> {
    fn from(rows: Vec<T>) -> Self {
        Self::new(rows)
    }
}

impl<T> Queryable for MemSource<T>
where
    T: Clone + Send + Sync,
{
    type Item = T;
    type Error = Infallible;

    fn count(&self, filter: &Predicate<T>) -> impl Future<Output = Result<u64, Infallible>> + Send {
        let n = self.rows.iter().filter(|row| filter.matches(row)).count();
        ready(Ok(n as u64))
    }

    fn fetch(&self, query: &Query<T>) -> impl Future<Output = Result<Vec<T>, Infallible>> + Send {
        ready(Ok(self.run(query)))
    }

    fn exists(&self, filter: &Predicate<T>) -> impl Future<Output = Result<bool, Infallible>> + Send {
        ready(Ok(self.rows.iter().any(|row| filter.matches(row))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{KeysetDefinition, TraversalDirection, compile};
    use futures::executor::block_on;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        id: i64,
        rank: Option<i64>,
    }

    fn items() -> MemSource<Item> {
        MemSource::new(vec![
            Item { id: 3, rank: Some(2) },
            Item { id: 1, rank: None },
            Item { id: 2, rank: Some(1) },
            Item { id: 4, rank: None },
        ])
    }

    #[test]
    fn test_fetch_orders_and_limits() {
        let source = items();
        let def = KeysetDefinition::<Item>::build(|b| {
            b.ascending("rank", |i| i.rank).ascending("id", |i| i.id)
        })
        .unwrap();

        let query = Query::seek(compile(&def, TraversalDirection::Forward, None), 3);
        let rows = block_on(source.fetch(&query)).unwrap();
        let ids: Vec<i64> = rows.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![1, 4, 2]);
    }

    #[test]
    fn test_window_uses_natural_order() {
        let source = items();
        let rows = block_on(source.fetch(&Query::window(1, 2))).unwrap();
        let ids: Vec<i64> = rows.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_count_and_exists() {
        let source = items();
        let def = KeysetDefinition::<Item>::build(|b| b.ascending("id", |i| i.id)).unwrap();
        let reference = source.find(|i| i.id == 3).unwrap();
        let compiled = compile(&def, TraversalDirection::Forward, Some(&reference));

        assert_eq!(block_on(source.count(&compiled.predicate)).unwrap(), 1);
        assert!(block_on(source.exists(&compiled.predicate)).unwrap());
        assert_eq!(block_on(source.count(&Predicate::Always)).unwrap(), 4);
        assert!(!block_on(source.exists(&Predicate::Never)).unwrap());
    }
}
