//! Predicate rendering.

use seekset::{CompoundPredicate, Condition, LogicalOp, Operator, Predicate, Value};

use crate::dialect::Dialect;
use crate::validate::assert_valid_sql_identifier;

/// Render a predicate, numbering placeholders from `start_idx`.
///
/// Returns the SQL fragment, its parameters and the next free index.
pub(crate) fn render_predicate<D: Dialect, T>(
    dialect: &D,
    predicate: &Predicate<T>,
    start_idx: usize,
) -> (String, Vec<Value>, usize) {
    match predicate {
        Predicate::Always => (dialect.bool_lit(true).to_string(), vec![], start_idx),
        Predicate::Never => (dialect.bool_lit(false).to_string(), vec![], start_idx),
        Predicate::Simple(condition) => render_condition(dialect, condition, start_idx),
        Predicate::Compound(compound) => render_compound(dialect, compound, start_idx),
    }
}

fn render_compound<D: Dialect, T>(
    dialect: &D,
    compound: &CompoundPredicate<T>,
    start_idx: usize,
) -> (String, Vec<Value>, usize) {
    let mut idx = start_idx;
    let mut all_params = Vec::new();
    let mut conditions = Vec::with_capacity(compound.predicates.len());

    for predicate in &compound.predicates {
        let (condition, params, new_idx) = render_predicate(dialect, predicate, idx);
        conditions.push(condition);
        all_params.extend(params);
        idx = new_idx;
    }

    let joiner = match compound.op {
        LogicalOp::And => " AND ",
        LogicalOp::Or => " OR ",
    };
    let sql = match conditions.len() {
        0 => dialect.bool_lit(compound.op == LogicalOp::And).to_string(),
        1 => conditions.pop().unwrap_or_default(),
        _ => format!("({})", conditions.join(joiner)),
    };

    (sql, all_params, idx)
}

fn render_condition<D: Dialect, T>(
    dialect: &D,
    condition: &Condition<T>,
    idx: usize,
) -> (String, Vec<Value>, usize) {
    let field = condition.column.name();
    assert_valid_sql_identifier(field, "column");

    match (condition.op, &condition.value) {
        (Operator::Eq, Value::Null) => (format!("{field} IS NULL"), vec![], idx),
        (Operator::Ne, Value::Null) => (format!("{field} IS NOT NULL"), vec![], idx),
        (op, value) => {
            let op_str = match op {
                Operator::Eq => "=",
                Operator::Ne => "!=",
                Operator::Gt => ">",
                Operator::Lt => "<",
            };
            let sql = format!("{} {} {}", field, op_str, dialect.param(idx));
            (sql, vec![value.clone()], idx + 1)
        },
    }
}
