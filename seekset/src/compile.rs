//! Seek predicate compilation.
//!
//! Turns a keyset definition, a traversal direction and an optional
//! reference row into a filter predicate plus the physical sort order.

use crate::ordering::{KeysetDefinition, SortDir, SortKey, TraversalDirection};
use crate::predicate::{Operator, Predicate};
use crate::value::Value;

/// The output of [`compile`]: what to filter on and how to sort.
pub struct CompiledKeyset<T> {
    /// Seek predicate; `Always` when there is no reference row.
    pub predicate: Predicate<T>,
    /// Effective ordering: the definition, flipped for backward traversal.
    pub order: Vec<SortKey<T>>,
}

impl<T> std::fmt::Debug for CompiledKeyset<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompiledKeyset")
            .field("predicate", &self.predicate)
            .field("order", &self.order)
            .finish()
    }
}

/// Compile the predicate and sort order for one page query.
///
/// Backward traversal is a forward seek over the flipped ordering, so the
/// rows returned by "take `n`" are always the `n` rows nearest the reference.
pub fn compile<T>(
    definition: &KeysetDefinition<T>,
    direction: TraversalDirection,
    reference: Option<&T>,
) -> CompiledKeyset<T> {
    let order = definition.effective_order(direction);
    let predicate = reference.map_or(Predicate::Always, |row| seek_after(&order, row));
    CompiledKeyset { predicate, order }
}

/// Predicate matching rows strictly after `reference` under `order`.
///
/// A lexicographic tuple comparison expands to:
/// `(a > 1) OR (a = 1 AND b > 2) OR (a = 1 AND b = 2 AND c > 3)`
///
/// Prefix equalities are null-safe and each per-column "after" clause
/// treats `NULL` as the lowest value.
pub fn seek_after<T>(order: &[SortKey<T>], reference: &T) -> Predicate<T> {
    let mut branches = Vec::with_capacity(order.len());
    let mut prefix: Vec<Predicate<T>> = Vec::with_capacity(order.len());

    for key in order {
        let value = key.column.value_of(reference);
        let after = column_after(key, value.clone());
        branches.push(Predicate::and(prefix.iter().cloned().chain([after])));
        prefix.push(Predicate::null_safe_eq(key.column.clone(), value));
    }

    Predicate::or(branches)
}

/// Rows whose value in `key` sorts strictly after `value`.
fn column_after<T>(key: &SortKey<T>, value: Value) -> Predicate<T> {
    let column = key.column.clone();
    match (key.dir, value.is_null()) {
        // Everything non-null sorts after NULL.
        (SortDir::Asc, true) => Predicate::is_not_null(column),
        (SortDir::Asc, false) => Predicate::compare(column, Operator::Gt, value),
        // Nothing sorts below NULL.
        (SortDir::Desc, true) => Predicate::Never,
        (SortDir::Desc, false) if key.column.is_nullable() => Predicate::or([
            Predicate::compare(column.clone(), Operator::Lt, value),
            Predicate::is_null(column),
        ]),
        (SortDir::Desc, false) => Predicate::compare(column, Operator::Lt, value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ordering::compare_by;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        a: i64,
        b: Option<i64>,
        c: String,
    }

    fn row(a: i64, b: Option<i64>, c: &str) -> Row {
        Row {
            a,
            b,
            c: c.to_string(),
        }
    }

    fn keyset(declare: impl FnOnce(crate::KeysetBuilder<Row>) -> crate::KeysetBuilder<Row>) -> KeysetDefinition<Row> {
        KeysetDefinition::build(declare).unwrap()
    }

    #[test]
    fn test_no_reference_has_no_filter() {
        let def = keyset(|b| b.ascending("a", |r| r.a));
        let compiled = compile(&def, TraversalDirection::Forward, None);
        assert!(compiled.predicate.is_always());
        assert_eq!(compiled.order[0].dir, SortDir::Asc);

        let compiled = compile(&def, TraversalDirection::Backward, None);
        assert!(compiled.predicate.is_always());
        assert_eq!(compiled.order[0].dir, SortDir::Desc);
    }

    #[test]
    fn test_single_column_forward_and_backward() {
        let def = keyset(|b| b.ascending("a", |r| r.a));
        let reference = row(100, None, "");

        let forward = compile(&def, TraversalDirection::Forward, Some(&reference));
        assert_eq!(forward.predicate.to_string(), "a > 100");

        let backward = compile(&def, TraversalDirection::Backward, Some(&reference));
        assert_eq!(backward.predicate.to_string(), "a < 100");
    }

    #[test]
    fn test_descending_column_flips_operator() {
        let def = keyset(|b| b.descending("c", |r| r.c.clone()));
        let reference = row(0, None, "2024-01-01");

        let forward = compile(&def, TraversalDirection::Forward, Some(&reference));
        assert_eq!(forward.predicate.to_string(), "c < '2024-01-01'");

        let backward = compile(&def, TraversalDirection::Backward, Some(&reference));
        assert_eq!(backward.predicate.to_string(), "c > '2024-01-01'");
    }

    #[test]
    fn test_three_columns_expand_to_prefix_disjunction() {
        let def = keyset(|b| {
            b.ascending("a", |r| r.a)
                .descending("c", |r| r.c.clone())
                .ascending("id", |r| r.a * 10)
        });
        let reference = row(1, None, "x");
        let compiled = compile(&def, TraversalDirection::Forward, Some(&reference));
        assert_eq!(
            compiled.predicate.to_string(),
            "(a > 1 OR (a = 1 AND c < 'x') OR (a = 1 AND c = 'x' AND id > 10))"
        );
    }

    #[test]
    fn test_nullable_ascending_reference_null() {
        let def = keyset(|b| b.ascending("b", |r| r.b).ascending("a", |r| r.a));
        let reference = row(5, None, "");

        let forward = compile(&def, TraversalDirection::Forward, Some(&reference));
        assert_eq!(
            forward.predicate.to_string(),
            "(b IS NOT NULL OR (b IS NULL AND a > 5))"
        );

        // Backward over an ascending nullable column: nothing precedes NULL,
        // so only the tie-break branch survives.
        let backward = compile(&def, TraversalDirection::Backward, Some(&reference));
        assert_eq!(backward.predicate.to_string(), "(b IS NULL AND a < 5)");
    }

    #[test]
    fn test_nullable_ascending_reference_value() {
        let def = keyset(|b| b.ascending("b", |r| r.b).ascending("a", |r| r.a));
        let reference = row(5, Some(3), "");

        let forward = compile(&def, TraversalDirection::Forward, Some(&reference));
        assert_eq!(
            forward.predicate.to_string(),
            "(b > 3 OR (b = 3 AND a > 5))"
        );

        let backward = compile(&def, TraversalDirection::Backward, Some(&reference));
        assert_eq!(
            backward.predicate.to_string(),
            "(b < 3 OR b IS NULL OR (b = 3 AND a < 5))"
        );
    }

    #[test]
    fn test_nullable_descending_column() {
        let def = keyset(|b| b.descending("b", |r| r.b).ascending("a", |r| r.a));

        let forward = compile(&def, TraversalDirection::Forward, Some(&row(5, Some(3), "")));
        assert_eq!(
            forward.predicate.to_string(),
            "(b < 3 OR b IS NULL OR (b = 3 AND a > 5))"
        );

        let forward = compile(&def, TraversalDirection::Forward, Some(&row(5, None, "")));
        assert_eq!(forward.predicate.to_string(), "(b IS NULL AND a > 5)");
    }

    /// The compiled predicate must agree with the in-memory sort: a row
    /// matches exactly when it sorts strictly after the reference.
    #[test]
    fn test_predicate_agrees_with_sort_order() {
        let rows: Vec<Row> = [None, Some(1), Some(2)]
            .into_iter()
            .flat_map(|b| (1..=3).map(move |a| row(a, b, "")))
            .collect();

        let defs = [
            keyset(|b| b.ascending("b", |r| r.b).ascending("a", |r| r.a)),
            keyset(|b| b.descending("b", |r| r.b).ascending("a", |r| r.a)),
            keyset(|b| b.descending("b", |r| r.b).descending("a", |r| r.a)),
        ];

        for def in &defs {
            for direction in [TraversalDirection::Forward, TraversalDirection::Backward] {
                for reference in &rows {
                    let compiled = compile(def, direction, Some(reference));
                    for candidate in &rows {
                        let expected =
                            compare_by(&compiled.order, candidate, reference).is_gt();
                        assert_eq!(
                            compiled.predicate.matches(candidate),
                            expected,
                            "{direction:?} ref={reference:?} candidate={candidate:?} predicate={}",
                            compiled.predicate
                        );
                    }
                }
            }
        }
    }
}
