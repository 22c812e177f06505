//! Validated, immutable description of one read: filters, order and window.

use crate::config::{EngineConfig, MultiValuePolicy};
use crate::error::AppError;
use crate::model::{Column, ColumnDescriptor};

/// One `LIKE`/`ILIKE` match condition. Predicates on distinct columns are AND'd.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterPredicate {
    pub column: Column,
    pub value: String,
    pub case_sensitive: bool,
}

impl FilterPredicate {
    pub fn new(column: Column, value: impl Into<String>, case_sensitive: bool) -> Self {
        FilterPredicate {
            column,
            value: value.into(),
            case_sensitive,
        }
    }

    /// Parses `value[,caseSensitive]`: the text before the first comma is the
    /// pattern; the flag is set only when the rest reads `true`.
    pub fn parse(column: Column, raw: &str) -> Self {
        match raw.split_once(',') {
            Some((value, flag)) => Self::new(column, value, flag.trim().eq_ignore_ascii_case("true")),
            None => Self::new(column, raw, false),
        }
    }

    /// Case-sensitive predicate matching `value` literally (LIKE wildcards escaped).
    pub fn exact(column: Column, value: &str) -> Self {
        let mut escaped = String::with_capacity(value.len());
        for c in value.chars() {
            if matches!(c, '\\' | '%' | '_') {
                escaped.push('\\');
            }
            escaped.push(c);
        }
        Self::new(column, escaped, true)
    }
}

/// Columns to sort by; one direction applies to every column.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrderClause {
    pub columns: Vec<Column>,
    pub ascending: bool,
}

impl Default for OrderClause {
    fn default() -> Self {
        OrderClause {
            columns: Vec::new(),
            ascending: true,
        }
    }
}

/// Offset window. `results_offset` is a page size and is never compared to `results_from`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Window {
    pub results_from: i64,
    pub results_offset: i64,
}

impl Window {
    pub fn validate(&self, max_page_size: i64) -> Result<(), AppError> {
        if self.results_from < 0 {
            return Err(AppError::InvalidBoundaries(format!(
                "resultsFrom must be >= 0, got {}",
                self.results_from
            )));
        }
        if self.results_offset < 0 {
            return Err(AppError::InvalidBoundaries(format!(
                "resultsOffset must be >= 0, got {}",
                self.results_offset
            )));
        }
        if self.results_offset > max_page_size {
            return Err(AppError::InvalidBoundaries(format!(
                "resultsOffset must be <= {}, got {}",
                max_page_size, self.results_offset
            )));
        }
        Ok(())
    }
}

#[derive(Clone, Debug)]
pub struct QuerySpec {
    descriptor: &'static ColumnDescriptor,
    filters: Vec<FilterPredicate>,
    order: OrderClause,
    window: Window,
}

impl QuerySpec {
    pub fn builder(descriptor: &'static ColumnDescriptor, config: &EngineConfig) -> QuerySpecBuilder {
        QuerySpecBuilder {
            descriptor,
            policy: config.multi_value,
            default_page_size: config.default_page_size,
            filters: Vec::new(),
            order: OrderClause::default(),
            results_from: None,
            results_offset: None,
        }
    }

    pub fn descriptor(&self) -> &'static ColumnDescriptor {
        self.descriptor
    }

    /// Filters in insertion order; placeholders are numbered in this order.
    pub fn filters(&self) -> &[FilterPredicate] {
        &self.filters
    }

    pub fn order(&self) -> &OrderClause {
        &self.order
    }

    pub fn window(&self) -> Window {
        self.window
    }
}

#[derive(Clone, Debug)]
pub struct QuerySpecBuilder {
    descriptor: &'static ColumnDescriptor,
    policy: MultiValuePolicy,
    default_page_size: i64,
    filters: Vec<FilterPredicate>,
    order: OrderClause,
    results_from: Option<i64>,
    results_offset: Option<i64>,
}

impl QuerySpecBuilder {
    pub fn descriptor(&self) -> &'static ColumnDescriptor {
        self.descriptor
    }

    pub fn filter(mut self, predicate: FilterPredicate) -> Self {
        self.filters.push(predicate);
        self
    }

    pub fn order_by(mut self, column: Column) -> Self {
        self.order.columns.push(column);
        self
    }

    pub fn ascending(mut self, ascending: bool) -> Self {
        self.order.ascending = ascending;
        self
    }

    pub fn results_from(mut self, n: i64) -> Self {
        self.results_from = Some(n);
        self
    }

    pub fn results_offset(mut self, n: i64) -> Self {
        self.results_offset = Some(n);
        self
    }

    pub fn build(self) -> Result<QuerySpec, AppError> {
        check_multi_value(self.policy, &self.filters)?;
        Ok(QuerySpec {
            descriptor: self.descriptor,
            filters: self.filters,
            order: self.order,
            window: Window {
                results_from: self.results_from.unwrap_or(0),
                results_offset: self.results_offset.unwrap_or(self.default_page_size),
            },
        })
    }
}

/// Under [`MultiValuePolicy::Reject`] a column may appear in at most one predicate.
pub fn check_multi_value(policy: MultiValuePolicy, filters: &[FilterPredicate]) -> Result<(), AppError> {
    if policy == MultiValuePolicy::AnyOf {
        return Ok(());
    }
    for (i, f) in filters.iter().enumerate() {
        if filters[..i].iter().any(|g| g.column == f.column) {
            return Err(AppError::Validation(format!(
                "column '{}' filtered more than once",
                f.column
            )));
        }
    }
    Ok(())
}
