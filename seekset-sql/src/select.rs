//! SELECT statements for pagination queries.

use seekset::{Predicate, Query, SortKey, Value};

use crate::dialect::Dialect;
use crate::render::render_predicate;
use crate::validate::assert_valid_sql_identifier;

/// Built SQL query with parameters.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "QueryResult must be used to execute the query"]
pub struct QueryResult {
    /// The SQL text with dialect placeholders.
    pub sql: String,
    /// Parameters in placeholder order.
    pub params: Vec<Value>,
}

/// A table the pagination queries are issued against.
#[derive(Debug, Clone)]
pub struct SqlTable<D: Dialect> {
    dialect: D,
    table: String,
    fields: Vec<String>,
}

impl<D: Dialect> SqlTable<D> {
    /// Create a table handle.
    ///
    /// # Panics
    ///
    /// Panics if the table name is not a valid SQL identifier.
    pub fn new(dialect: D, table: impl Into<String>) -> Self {
        let table = table.into();
        assert_valid_sql_identifier(&table, "table");
        Self {
            dialect,
            table,
            fields: Vec::new(),
        }
    }

    /// Set the fields to SELECT (default `*`).
    ///
    /// # Panics
    ///
    /// Panics if any field name is not a valid SQL identifier.
    pub fn fields(mut self, fields: &[&str]) -> Self {
        for field in fields {
            assert_valid_sql_identifier(field, "field");
        }
        self.fields = fields.iter().map(|s| (*s).to_string()).collect();
        self
    }

    /// The table name.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// `SELECT ... WHERE ... ORDER BY ... LIMIT ... OFFSET ...` for a query.
    pub fn select<T>(&self, query: &Query<T>) -> QueryResult {
        let select_str = if self.fields.is_empty() {
            "*".to_string()
        } else {
            self.fields.join(", ")
        };

        let mut sql = format!("SELECT {} FROM {}", select_str, self.table);
        let params = self.push_where(&mut sql, &query.filter);

        if !query.order.is_empty() {
            sql.push_str(" ORDER BY ");
            sql.push_str(&self.order_by(&query.order));
        }

        match (query.take, query.skip) {
            (Some(limit), _) => sql.push_str(&format!(" LIMIT {limit}")),
            (None, skip) if skip > 0 => {
                if let Some(all) = self.dialect.unbounded_limit() {
                    sql.push_str(&format!(" LIMIT {all}"));
                }
            },
            (None, _) => {},
        }
        if query.skip > 0 {
            sql.push_str(&format!(" OFFSET {}", query.skip));
        }

        QueryResult { sql, params }
    }

    /// `SELECT COUNT(*)` over the rows matching `filter`.
    pub fn count<T>(&self, filter: &Predicate<T>) -> QueryResult {
        let mut sql = format!("SELECT COUNT(*) FROM {}", self.table);
        let params = self.push_where(&mut sql, filter);
        QueryResult { sql, params }
    }

    /// `SELECT EXISTS(...)` for the rows matching `filter`.
    pub fn exists<T>(&self, filter: &Predicate<T>) -> QueryResult {
        let mut inner = format!("SELECT 1 FROM {}", self.table);
        let params = self.push_where(&mut inner, filter);
        QueryResult {
            sql: format!("SELECT EXISTS({inner})"),
            params,
        }
    }

    /// `Always` adds no WHERE clause.
    fn push_where<T>(&self, sql: &mut String, filter: &Predicate<T>) -> Vec<Value> {
        if filter.is_always() {
            return Vec::new();
        }
        let (condition, params, _) = render_predicate(&self.dialect, filter, 1);
        sql.push_str(" WHERE ");
        sql.push_str(&condition);
        params
    }

    fn order_by<T>(&self, order: &[SortKey<T>]) -> String {
        order
            .iter()
            .map(|key| {
                let name = key.column.name();
                assert_valid_sql_identifier(name, "sort column");
                let dir = match key.dir {
                    seekset::SortDir::Asc => "ASC",
                    seekset::SortDir::Desc => "DESC",
                };
                let nulls = key
                    .column
                    .is_nullable()
                    .then(|| self.dialect.nulls_order(key.dir))
                    .flatten();
                match nulls {
                    Some(nulls) => format!("{name} {dir} {nulls}"),
                    None => format!("{name} {dir}"),
                }
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}
