//! Builds parameterized SELECT, COUNT, INSERT, UPDATE, DELETE from a column descriptor.
//! Placeholders are numbered left to right in the order values are pushed.

use crate::model::{Column, ColumnDescriptor};
use crate::query::{ColumnValues, FilterPredicate, OrderClause, QuerySpec};
use crate::sql::SqlValue;

/// Quote identifier for PostgreSQL (safe: only from descriptors and config).
fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

/// Full qualified table name.
pub fn qualified_table(schema: &str, table: &str) -> String {
    format!("{}.{}", quoted(schema), quoted(table))
}

#[derive(Debug)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<SqlValue>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: SqlValue) -> usize {
        self.params.push(v);
        self.params.len()
    }
}

/// ` WHERE …` for the predicates, or empty. Predicates on the same column form
/// one OR group; groups are AND'd in first-appearance order. Pushes one
/// parameter per predicate, so calling it twice binds every value twice.
fn push_where(q: &mut QueryBuf, filters: &[FilterPredicate]) -> String {
    let mut groups: Vec<(Column, Vec<&FilterPredicate>)> = Vec::new();
    for f in filters {
        match groups.iter_mut().find(|(c, _)| *c == f.column) {
            Some((_, preds)) => preds.push(f),
            None => groups.push((f.column, vec![f])),
        }
    }
    if groups.is_empty() {
        return String::new();
    }
    let parts: Vec<String> = groups
        .iter()
        .map(|(col, preds)| {
            let alternatives: Vec<String> = preds
                .iter()
                .map(|p| {
                    let n = q.push_param(SqlValue::Text(p.value.clone()));
                    let op = if p.case_sensitive { "LIKE" } else { "ILIKE" };
                    format!("{} {} ${}", quoted(col.name()), op, n)
                })
                .collect();
            match alternatives.as_slice() {
                [single] => single.clone(),
                _ => format!("({})", alternatives.join(" OR ")),
            }
        })
        .collect();
    format!(" WHERE {}", parts.join(" AND "))
}

fn order_clause(order: &OrderClause) -> String {
    if order.columns.is_empty() {
        return String::new();
    }
    let dir = if order.ascending { "ASC" } else { "DESC" };
    let cols: Vec<String> = order
        .columns
        .iter()
        .map(|c| format!("{} {}", quoted(c.name()), dir))
        .collect();
    format!(" ORDER BY {}", cols.join(", "))
}

/// Data statement: the requested page.
pub fn select(spec: &QuerySpec, schema: &str) -> QueryBuf {
    let mut q = QueryBuf::new();
    let table = qualified_table(schema, spec.descriptor().table);
    let where_clause = push_where(&mut q, spec.filters());
    let order = order_clause(spec.order());
    let window = spec.window();
    let limit = q.push_param(SqlValue::Int(window.results_offset));
    let offset = q.push_param(SqlValue::Int(window.results_from));
    q.sql = format!(
        "SELECT * FROM {}{}{} LIMIT ${} OFFSET ${}",
        table, where_clause, order, limit, offset
    );
    q
}

/// Count statement: one row of (`page_rows`, `generable_results`). `page_rows` counts the
/// window over the same filtered, ordered relation; `generable_results` ignores the window.
pub fn count(spec: &QuerySpec, schema: &str) -> QueryBuf {
    let mut q = QueryBuf::new();
    let table = qualified_table(schema, spec.descriptor().table);
    let page_where = push_where(&mut q, spec.filters());
    let order = order_clause(spec.order());
    let window = spec.window();
    let limit = q.push_param(SqlValue::Int(window.results_offset));
    let offset = q.push_param(SqlValue::Int(window.results_from));
    let total_where = push_where(&mut q, spec.filters());
    q.sql = format!(
        "SELECT (SELECT COUNT(*) FROM (SELECT 1 FROM {}{}{} LIMIT ${} OFFSET ${}) AS page) AS page_rows, \
         COUNT(*) AS generable_results FROM {}{}",
        table, page_where, order, limit, offset, table, total_where
    );
    q
}

/// INSERT returning the generated primary key.
pub fn insert(descriptor: &ColumnDescriptor, values: &ColumnValues, schema: &str) -> QueryBuf {
    let mut q = QueryBuf::new();
    let table = qualified_table(schema, descriptor.table);
    let pk = quoted(descriptor.primary_key().name());
    if values.is_empty() {
        q.sql = format!("INSERT INTO {} DEFAULT VALUES RETURNING {}", table, pk);
        return q;
    }
    let mut cols = Vec::with_capacity(values.len());
    let mut placeholders = Vec::with_capacity(values.len());
    for (col, value) in values.iter() {
        let n = q.push_param(value.clone());
        cols.push(quoted(col.name()));
        placeholders.push(format!("${}", n));
    }
    q.sql = format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
        table,
        cols.join(", "),
        placeholders.join(", "),
        pk
    );
    q
}

/// UPDATE of the rows matching `filters`, returning the updated rows.
pub fn update(
    descriptor: &ColumnDescriptor,
    values: &ColumnValues,
    filters: &[FilterPredicate],
    schema: &str,
) -> QueryBuf {
    let mut q = QueryBuf::new();
    let table = qualified_table(schema, descriptor.table);
    let sets: Vec<String> = values
        .iter()
        .map(|(col, value)| {
            let n = q.push_param(value.clone());
            format!("{} = ${}", quoted(col.name()), n)
        })
        .collect();
    let where_clause = push_where(&mut q, filters);
    q.sql = format!(
        "UPDATE {} SET {}{} RETURNING *",
        table,
        sets.join(", "),
        where_clause
    );
    q
}

/// DELETE of the rows matching `filters`, returning their primary keys.
pub fn delete(descriptor: &ColumnDescriptor, filters: &[FilterPredicate], schema: &str) -> QueryBuf {
    let mut q = QueryBuf::new();
    let table = qualified_table(schema, descriptor.table);
    let where_clause = push_where(&mut q, filters);
    q.sql = format!(
        "DELETE FROM {}{} RETURNING {}",
        table,
        where_clause,
        quoted(descriptor.primary_key().name())
    );
    q
}
