//! Keyset ordering definitions.
//!
//! A [`KeysetDefinition`] is the ordered list of columns a result set is
//! sorted by. The first column is the primary sort key; the last column
//! should be unique per row for gap-free pagination (not enforced).
//!
//! # NULL ordering
//!
//! `NULL` is the lowest value of every nullable column: ascending columns
//! put `NULL`s first, descending columns put them last. Sorting, seek
//! predicates and rendered SQL all follow this rule.

use std::{cmp::Ordering, fmt, sync::Arc};

use crate::error::DefinitionError;
use crate::value::{KeyValue, Value};

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortDir {
    /// Ascending, `NULL`s first
    Asc,
    /// Descending, `NULL`s last
    Desc,
}

impl SortDir {
    /// The opposite direction.
    #[inline]
    #[must_use]
    pub const fn flip(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

/// Direction the underlying query walks relative to the logical ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TraversalDirection {
    /// Same order as the definition (first page, `after`).
    Forward,
    /// Reversed order (last page, `before`).
    Backward,
}

type Accessor<T> = Arc<dyn Fn(&T) -> Value + Send + Sync>;

/// A named column with a value accessor.
pub struct Column<T> {
    name: Arc<str>,
    nullable: bool,
    accessor: Accessor<T>,
}

impl<T> Column<T> {
    /// Create a column reading a [`KeyValue`] from the entity.
    ///
    /// Nullability is taken from `V::NULLABLE`.
    pub fn new<V, F>(name: impl Into<Arc<str>>, accessor: F) -> Self
    where
        V: KeyValue,
        F: Fn(&T) -> V + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            nullable: V::NULLABLE,
            accessor: Arc::new(move |row: &T| accessor(row).into_value()),
        }
    }

    /// Column name, as used when rendering to a query language.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the column's declared type admits `NULL`.
    #[inline]
    #[must_use]
    pub const fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// Read this column's value from an entity.
    #[inline]
    pub fn value_of(&self, row: &T) -> Value {
        (self.accessor)(row)
    }
}

impl<T> Clone for Column<T> {
    fn clone(&self) -> Self {
        Self {
            name: Arc::clone(&self.name),
            nullable: self.nullable,
            accessor: Arc::clone(&self.accessor),
        }
    }
}

impl<T> fmt::Debug for Column<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("name", &self.name)
            .field("nullable", &self.nullable)
            .finish_non_exhaustive()
    }
}

/// A column paired with a sort direction.
pub struct SortKey<T> {
    /// The column to sort by.
    pub column: Column<T>,
    /// Sort direction.
    pub dir: SortDir,
}

impl<T> SortKey<T> {
    /// Create a sort key.
    pub const fn new(column: Column<T>, dir: SortDir) -> Self {
        Self { column, dir }
    }

    /// Whether `NULL`s come first under this key.
    #[inline]
    #[must_use]
    pub const fn nulls_first(&self) -> bool {
        matches!(self.dir, SortDir::Asc)
    }

    /// The same column sorted the other way.
    #[must_use]
    pub fn flipped(&self) -> Self {
        Self::new(self.column.clone(), self.dir.flip())
    }

    /// Compare two entities under this key alone.
    pub fn compare(&self, a: &T, b: &T) -> Ordering {
        let ord = self
            .column
            .value_of(a)
            .null_lowest_cmp(&self.column.value_of(b));
        match self.dir {
            SortDir::Asc => ord,
            SortDir::Desc => ord.reverse(),
        }
    }
}

impl<T> Clone for SortKey<T> {
    fn clone(&self) -> Self {
        Self::new(self.column.clone(), self.dir)
    }
}

impl<T> fmt::Debug for SortKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SortKey")
            .field("column", &self.column.name())
            .field("dir", &self.dir)
            .finish()
    }
}

/// Compare two entities lexicographically over a list of sort keys.
pub fn compare_by<T>(keys: &[SortKey<T>], a: &T, b: &T) -> Ordering {
    keys.iter()
        .map(|key| key.compare(a, b))
        .find(|ord| ord.is_ne())
        .unwrap_or(Ordering::Equal)
}

/// An immutable, non-empty keyset ordering.
///
/// Cheap to clone; build once and share it across requests.
///
/// ```
/// use seekset::KeysetDefinition;
///
/// struct Order { id: i64, shipped: Option<i64> }
///
/// let keyset = KeysetDefinition::<Order>::builder()
///     .ascending("shipped", |o| o.shipped)
///     .ascending("id", |o| o.id)
///     .build()
///     .unwrap();
///
/// assert_eq!(keyset.len(), 2);
/// assert!(keyset.keys()[0].column.is_nullable());
/// ```
pub struct KeysetDefinition<T> {
    keys: Arc<[SortKey<T>]>,
}

impl<T> KeysetDefinition<T> {
    /// Start an empty builder.
    pub const fn builder() -> KeysetBuilder<T> {
        KeysetBuilder { keys: Vec::new() }
    }

    /// Build a definition from a builder closure.
    pub fn build<F>(declare: F) -> Result<Self, DefinitionError>
    where
        F: FnOnce(KeysetBuilder<T>) -> KeysetBuilder<T>,
    {
        declare(Self::builder()).build()
    }

    /// Sort keys in priority order.
    #[inline]
    #[must_use]
    pub fn keys(&self) -> &[SortKey<T>] {
        &self.keys
    }

    /// Number of columns.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Always `false`; an empty definition cannot be built.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// The physical ordering used for a traversal direction.
    ///
    /// Backward traversal flips every column, so taking `n` rows yields the
    /// `n` rows closest to the reference.
    #[must_use]
    pub fn effective_order(&self, direction: TraversalDirection) -> Vec<SortKey<T>> {
        match direction {
            TraversalDirection::Forward => self.keys.to_vec(),
            TraversalDirection::Backward => self.keys.iter().map(SortKey::flipped).collect(),
        }
    }
}

impl<T> Clone for KeysetDefinition<T> {
    fn clone(&self) -> Self {
        Self {
            keys: Arc::clone(&self.keys),
        }
    }
}

impl<T> fmt::Debug for KeysetDefinition<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.keys.iter()).finish()
    }
}

/// Ordered-append builder for [`KeysetDefinition`].
#[must_use = "builder does nothing until .build() is called"]
pub struct KeysetBuilder<T> {
    keys: Vec<SortKey<T>>,
}

impl<T> KeysetBuilder<T> {
    /// Append an ascending column.
    pub fn ascending<V, F>(self, name: impl Into<Arc<str>>, accessor: F) -> Self
    where
        V: KeyValue,
        F: Fn(&T) -> V + Send + Sync + 'static,
    {
        self.push(Column::new(name, accessor), SortDir::Asc)
    }

    /// Append a descending column.
    pub fn descending<V, F>(self, name: impl Into<Arc<str>>, accessor: F) -> Self
    where
        V: KeyValue,
        F: Fn(&T) -> V + Send + Sync + 'static,
    {
        self.push(Column::new(name, accessor), SortDir::Desc)
    }

    /// Append a prepared column.
    pub fn push(mut self, column: Column<T>, dir: SortDir) -> Self {
        self.keys.push(SortKey::new(column, dir));
        self
    }

    /// Finish the definition.
    ///
    /// Fails when no column was declared or a column name repeats.
    pub fn build(self) -> Result<KeysetDefinition<T>, DefinitionError> {
        if self.keys.is_empty() {
            return Err(DefinitionError::Empty);
        }
        for (i, key) in self.keys.iter().enumerate() {
            let name = key.column.name();
            if self.keys.iter().take(i).any(|k| k.column.name() == name) {
                return Err(DefinitionError::DuplicateColumn(name.to_string()));
            }
        }
        Ok(KeysetDefinition {
            keys: self.keys.into(),
        })
    }
}

impl<T> fmt::Debug for KeysetBuilder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeysetBuilder")
            .field("keys", &self.keys)
            .finish()
    }
}
