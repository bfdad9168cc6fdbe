//! Filter predicates over keyset columns.
//!
//! Predicates are a small boolean algebra built from per-column comparisons.
//! They can be evaluated against entities in memory ([`Predicate::matches`])
//! or rendered by a query backend.

use std::fmt;

use crate::ordering::Column;
use crate::value::Value;

/// Comparison operators.
///
/// `Eq`/`Ne` against [`Value::Null`] mean `IS NULL` / `IS NOT NULL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// Equal: `=` (or `IS NULL` against `Null`)
    Eq,
    /// Not equal: `!=` (or `IS NOT NULL` against `Null`)
    Ne,
    /// Greater than: `>`
    Gt,
    /// Less than: `<`
    Lt,
}

/// Logical operators for compound predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    /// All conditions must match: `AND`
    And,
    /// At least one condition must match: `OR`
    Or,
}

/// A single column comparison.
pub struct Condition<T> {
    /// Column to compare.
    pub column: Column<T>,
    /// Comparison operator.
    pub op: Operator,
    /// Right-hand side.
    pub value: Value,
}

impl<T> Condition<T> {
    /// Evaluate under SQL semantics; an unknown result does not match.
    pub fn matches(&self, row: &T) -> bool {
        let actual = self.column.value_of(row);
        match (self.op, &self.value) {
            (Operator::Eq, Value::Null) => actual.is_null(),
            (Operator::Ne, Value::Null) => !actual.is_null(),
            (op, expected) => actual.compare(expected).is_some_and(|ord| match op {
                Operator::Eq => ord.is_eq(),
                Operator::Ne => ord.is_ne(),
                Operator::Gt => ord.is_gt(),
                Operator::Lt => ord.is_lt(),
            }),
        }
    }
}

impl<T> Clone for Condition<T> {
    fn clone(&self) -> Self {
        Self {
            column: self.column.clone(),
            op: self.op,
            value: self.value.clone(),
        }
    }
}

impl<T> fmt::Debug for Condition<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Condition")
            .field("column", &self.column.name())
            .field("op", &self.op)
            .field("value", &self.value)
            .finish()
    }
}

/// A compound predicate combining several predicates with one operator.
pub struct CompoundPredicate<T> {
    /// How the operands are combined.
    pub op: LogicalOp,
    /// Operands; never empty after construction through [`Predicate::and`]/[`Predicate::or`].
    pub predicates: Vec<Predicate<T>>,
}

impl<T> Clone for CompoundPredicate<T> {
    fn clone(&self) -> Self {
        Self {
            op: self.op,
            predicates: self.predicates.clone(),
        }
    }
}

/// A filter predicate.
pub enum Predicate<T> {
    /// Matches every row (no filter).
    Always,
    /// Matches no row.
    Never,
    /// A single column comparison.
    Simple(Condition<T>),
    /// An `AND`/`OR` combination.
    Compound(CompoundPredicate<T>),
}

impl<T> Predicate<T> {
    /// A simple comparison.
    pub const fn compare(column: Column<T>, op: Operator, value: Value) -> Self {
        Self::Simple(Condition { column, op, value })
    }

    /// `column IS NULL`.
    pub const fn is_null(column: Column<T>) -> Self {
        Self::compare(column, Operator::Eq, Value::Null)
    }

    /// `column IS NOT NULL`.
    pub const fn is_not_null(column: Column<T>) -> Self {
        Self::compare(column, Operator::Ne, Value::Null)
    }

    /// Null-safe equality: `IS NULL` for a `Null` value, `=` otherwise.
    pub const fn null_safe_eq(column: Column<T>, value: Value) -> Self {
        Self::compare(column, Operator::Eq, value)
    }

    /// Conjunction with constant folding.
    ///
    /// `Always` operands are dropped, any `Never` operand yields `Never`,
    /// nested `AND`s are flattened and a single operand is returned as is.
    pub fn and(predicates: impl IntoIterator<Item = Self>) -> Self {
        let mut parts = Vec::new();
        for predicate in predicates {
            match predicate {
                Self::Always => {},
                Self::Never => return Self::Never,
                Self::Compound(CompoundPredicate {
                    op: LogicalOp::And,
                    predicates,
                }) => parts.extend(predicates),
                other => parts.push(other),
            }
        }
        Self::collapse(LogicalOp::And, parts, Self::Always)
    }

    /// Disjunction with constant folding.
    ///
    /// `Never` operands are dropped, any `Always` operand yields `Always`,
    /// nested `OR`s are flattened and a single operand is returned as is.
    pub fn or(predicates: impl IntoIterator<Item = Self>) -> Self {
        let mut parts = Vec::new();
        for predicate in predicates {
            match predicate {
                Self::Never => {},
                Self::Always => return Self::Always,
                Self::Compound(CompoundPredicate {
                    op: LogicalOp::Or,
                    predicates,
                }) => parts.extend(predicates),
                other => parts.push(other),
            }
        }
        Self::collapse(LogicalOp::Or, parts, Self::Never)
    }

    fn collapse(op: LogicalOp, mut parts: Vec<Self>, empty: Self) -> Self {
        match parts.len() {
            0 => empty,
            1 => parts.pop().unwrap_or(empty),
            _ => Self::Compound(CompoundPredicate {
                op,
                predicates: parts,
            }),
        }
    }

    /// Returns `true` for [`Predicate::Always`].
    #[inline]
    #[must_use]
    pub const fn is_always(&self) -> bool {
        matches!(self, Self::Always)
    }

    /// Evaluate against an entity.
    pub fn matches(&self, row: &T) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Simple(condition) => condition.matches(row),
            Self::Compound(compound) => match compound.op {
                LogicalOp::And => compound.predicates.iter().all(|p| p.matches(row)),
                LogicalOp::Or => compound.predicates.iter().any(|p| p.matches(row)),
            },
        }
    }
}

impl<T> Clone for Predicate<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Always => Self::Always,
            Self::Never => Self::Never,
            Self::Simple(condition) => Self::Simple(condition.clone()),
            Self::Compound(compound) => Self::Compound(compound.clone()),
        }
    }
}

/// Human-readable SQL-like form, used in logs and tests.
impl<T> fmt::Display for Predicate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Always => f.write_str("TRUE"),
            Self::Never => f.write_str("FALSE"),
            Self::Simple(c) => {
                let name = c.column.name();
                match (c.op, &c.value) {
                    (Operator::Eq, Value::Null) => write!(f, "{name} IS NULL"),
                    (Operator::Ne, Value::Null) => write!(f, "{name} IS NOT NULL"),
                    (op, value) => {
                        let op = match op {
                            Operator::Eq => "=",
                            Operator::Ne => "!=",
                            Operator::Gt => ">",
                            Operator::Lt => "<",
                        };
                        write!(f, "{name} {op} {value}")
                    },
                }
            },
            Self::Compound(compound) => {
                let joiner = match compound.op {
                    LogicalOp::And => " AND ",
                    LogicalOp::Or => " OR ",
                };
                f.write_str("(")?;
                for (i, p) in compound.predicates.iter().enumerate() {
                    if i > 0 {
                        f.write_str(joiner)?;
                    }
                    write!(f, "{p}")?;
                }
                f.write_str(")")
            },
        }
    }
}

impl<T> fmt::Debug for Predicate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Predicate({self})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Row {
        n: Option<i64>,
    }

    fn col() -> Column<Row> {
        Column::new("n", |r: &Row| r.n)
    }

    #[test]
    fn test_and_folds_constants() {
        let p = Predicate::and([Predicate::Always, Predicate::is_null(col())]);
        assert_eq!(p.to_string(), "n IS NULL");

        let p = Predicate::and([Predicate::is_null(col()), Predicate::Never]);
        assert!(matches!(p, Predicate::Never));

        let p: Predicate<Row> = Predicate::and([]);
        assert!(p.is_always());
    }

    #[test]
    fn test_or_folds_constants() {
        let p = Predicate::or([Predicate::Never, Predicate::is_not_null(col())]);
        assert_eq!(p.to_string(), "n IS NOT NULL");

        let p = Predicate::or([Predicate::is_null(col()), Predicate::Always]);
        assert!(p.is_always());

        let p: Predicate<Row> = Predicate::or([]);
        assert!(matches!(p, Predicate::Never));
    }

    #[test]
    fn test_nested_compounds_flatten() {
        let inner = Predicate::or([
            Predicate::compare(col(), Operator::Gt, Value::Int(1)),
            Predicate::is_null(col()),
        ]);
        let p = Predicate::or([inner, Predicate::compare(col(), Operator::Eq, Value::Int(0))]);
        assert_eq!(p.to_string(), "(n > 1 OR n IS NULL OR n = 0)");
    }

    #[test]
    fn test_three_valued_comparisons() {
        let null_row = Row { n: None };
        let five = Row { n: Some(5) };

        let gt = Predicate::compare(col(), Operator::Gt, Value::Int(1));
        assert!(gt.matches(&five));
        assert!(!gt.matches(&null_row), "NULL > 1 is unknown, not a match");

        let lt = Predicate::compare(col(), Operator::Lt, Value::Int(10));
        assert!(!lt.matches(&null_row));

        let eq = Predicate::null_safe_eq(col(), Value::Null);
        assert!(eq.matches(&null_row));
        assert!(!eq.matches(&five));

        let eq = Predicate::null_safe_eq(col(), Value::Int(5));
        assert!(eq.matches(&five));
        assert!(!eq.matches(&null_row));
    }
}
