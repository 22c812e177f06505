//! Criteria builder: flat request parameters to a [`QuerySpec`].
//!
//! Keys that resolve against the entity's descriptor become filters, the reserved
//! keys below drive order and window, and every other key is ignored so clients
//! can send parameters newer than the server understands.

use crate::config::EngineConfig;
use crate::error::AppError;
use crate::model::{Column, ColumnDescriptor};
use crate::query::{check_multi_value, FilterPredicate, QuerySpec, QuerySpecBuilder};

pub const ORDER_BY: &str = "orderBy";
pub const IS_ASCENDING: &str = "isAscending";
pub const RESULTS_FROM: &str = "resultsFrom";
pub const RESULTS_OFFSET: &str = "resultsOffset";

const RESERVED: [&str; 4] = [ORDER_BY, IS_ASCENDING, RESULTS_FROM, RESULTS_OFFSET];

pub struct CriteriaBuilder;

impl CriteriaBuilder {
    /// Map-shaped input, e.g. a decoded query string. Pairs are kept in order so
    /// a repeated column key reaches the multi-value policy.
    pub fn from_params(
        descriptor: &'static ColumnDescriptor,
        config: &EngineConfig,
        params: &[(String, String)],
    ) -> Result<QuerySpec, AppError> {
        let mut builder = QuerySpec::builder(descriptor, config);
        for (key, value) in params {
            builder = match key.as_str() {
                ORDER_BY => {
                    let mut b = builder;
                    for col in parse_order_by(descriptor, value)? {
                        b = b.order_by(col);
                    }
                    b
                }
                IS_ASCENDING => builder.ascending(parse_bool(IS_ASCENDING, value)?),
                RESULTS_FROM => builder.results_from(parse_index(RESULTS_FROM, value)?),
                RESULTS_OFFSET => builder.results_offset(parse_index(RESULTS_OFFSET, value)?),
                _ => match descriptor.resolve(key) {
                    Some(col) => builder.filter(FilterPredicate::parse(col, value)),
                    None => builder,
                },
            };
        }
        builder.build()
    }

    /// Filters only, for writes addressed by query string. Reserved and unknown keys are
    /// skipped; a repeated column follows the configured multi-value policy.
    pub fn filters(
        descriptor: &ColumnDescriptor,
        config: &EngineConfig,
        params: &[(String, String)],
    ) -> Result<Vec<FilterPredicate>, AppError> {
        let filters: Vec<_> = params
            .iter()
            .filter(|(key, _)| !RESERVED.contains(&key.as_str()))
            .filter_map(|(key, value)| descriptor.resolve(key).map(|col| FilterPredicate::parse(col, value)))
            .collect();
        check_multi_value(config.multi_value, &filters)?;
        Ok(filters)
    }

    /// Positional-array input: `search_by[i]` names the column for `search_by_values[i]`.
    /// Unlike the map form, an unknown column here is an error: the caller
    /// explicitly asked to filter on it.
    pub fn positional(
        descriptor: &'static ColumnDescriptor,
        config: &EngineConfig,
        search_by: &[String],
        search_by_values: &[String],
    ) -> Result<QuerySpecBuilder, AppError> {
        if search_by.len() != search_by_values.len() {
            return Err(AppError::Validation(format!(
                "searchBy has {} entries but searchByValues has {}",
                search_by.len(),
                search_by_values.len()
            )));
        }
        let mut builder = QuerySpec::builder(descriptor, config);
        for (name, value) in search_by.iter().zip(search_by_values) {
            let col = resolve_or_reject(descriptor, name)?;
            builder = builder.filter(FilterPredicate::parse(col, value));
        }
        Ok(builder)
    }
}

fn resolve_or_reject(descriptor: &ColumnDescriptor, name: &str) -> Result<Column, AppError> {
    descriptor
        .resolve(name)
        .ok_or_else(|| AppError::Validation(format!("unknown column '{}' for {}", name, descriptor.table)))
}

fn parse_order_by(descriptor: &ColumnDescriptor, raw: &str) -> Result<Vec<Column>, AppError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|name| resolve_or_reject(descriptor, name))
        .collect()
}

fn parse_bool(key: &str, raw: &str) -> Result<bool, AppError> {
    match raw.trim().to_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(AppError::Validation(format!("{} must be true or false, got '{}'", key, raw))),
    }
}

fn parse_index(key: &str, raw: &str) -> Result<i64, AppError> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::Validation(format!("{} must be an integer, got '{}'", key, raw)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MultiValuePolicy;
    use crate::model::catalog::Classroom;
    use crate::model::Entity;
    use crate::query::Window;

    fn params(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    fn build(pairs: &[(&str, &str)]) -> Result<QuerySpec, AppError> {
        CriteriaBuilder::from_params(Classroom::descriptor(), &EngineConfig::default(), &params(pairs))
    }

    #[test]
    fn column_keys_become_filters_and_reserved_keys_do_not() {
        let spec = build(&[
            ("grade", "10"),
            ("name", "A%,true"),
            ("orderBy", "name"),
            ("isAscending", "false"),
            ("resultsFrom", "5"),
            ("resultsOffset", "2"),
        ])
        .unwrap();
        let filters: Vec<_> = spec.filters().iter().map(|f| (f.column.name(), f.value.as_str(), f.case_sensitive)).collect();
        assert_eq!(filters, vec![("grade", "10", false), ("name", "A%", true)]);
        assert_eq!(spec.order().columns.iter().map(|c| c.name()).collect::<Vec<_>>(), vec!["name"]);
        assert!(!spec.order().ascending);
        assert_eq!(spec.window(), Window { results_from: 5, results_offset: 2 });
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let with_noise = build(&[("grade", "10"), ("color", "red"), ("token", "abc")]).unwrap();
        let without = build(&[("grade", "10")]).unwrap();
        assert_eq!(with_noise.filters(), without.filters());
    }

    #[test]
    fn malformed_reserved_values_are_rejected() {
        assert!(matches!(build(&[("resultsFrom", "ten")]), Err(AppError::Validation(_))));
        assert!(matches!(build(&[("resultsOffset", "1.5")]), Err(AppError::Validation(_))));
        assert!(matches!(build(&[("isAscending", "yes")]), Err(AppError::Validation(_))));
        assert!(matches!(build(&[("orderBy", "name,colour")]), Err(AppError::Validation(_))));
    }

    #[test]
    fn negative_bounds_parse_and_are_left_to_window_validation() {
        let spec = build(&[("resultsFrom", "-3")]).unwrap();
        assert!(spec.window().validate(1000).is_err());
    }

    #[test]
    fn order_by_accepts_lists_with_blanks() {
        let spec = build(&[("orderBy", " grade , name ,")]).unwrap();
        let cols: Vec<_> = spec.order().columns.iter().map(|c| c.name()).collect();
        assert_eq!(cols, vec!["grade", "name"]);
    }

    #[test]
    fn repeated_column_key_is_rejected_by_default() {
        assert!(matches!(build(&[("grade", "10"), ("grade", "11")]), Err(AppError::Validation(_))));
        let cfg = EngineConfig::default().with_multi_value(MultiValuePolicy::AnyOf);
        let spec = CriteriaBuilder::from_params(
            Classroom::descriptor(),
            &cfg,
            &params(&[("grade", "10"), ("grade", "11")]),
        )
        .unwrap();
        assert_eq!(spec.filters().len(), 2);
    }

    #[test]
    fn write_filters_skip_reserved_keys() {
        let filters = CriteriaBuilder::filters(
            Classroom::descriptor(),
            &EngineConfig::default(),
            &params(&[("id", "3"), ("resultsFrom", "1"), ("ghost", "x")]),
        )
        .unwrap();
        assert_eq!(filters.len(), 1);
        assert_eq!(filters[0].column.name(), "id");
    }

    #[test]
    fn write_filters_follow_multi_value_policy() {
        let repeated = params(&[("grade", "10"), ("grade", "11")]);
        let rejected = CriteriaBuilder::filters(Classroom::descriptor(), &EngineConfig::default(), &repeated);
        assert!(matches!(rejected, Err(AppError::Validation(_))));

        let cfg = EngineConfig::default().with_multi_value(MultiValuePolicy::AnyOf);
        let widened = CriteriaBuilder::filters(Classroom::descriptor(), &cfg, &repeated).unwrap();
        assert_eq!(widened.len(), 2);
    }

    #[test]
    fn positional_arrays_must_line_up() {
        let cfg = EngineConfig::default();
        let d = Classroom::descriptor();
        let by = vec!["grade".to_string(), "name".to_string()];
        let err = CriteriaBuilder::positional(d, &cfg, &by, &["10".to_string()]).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let unknown = CriteriaBuilder::positional(d, &cfg, &["floor".to_string()], &["2".to_string()]);
        assert!(unknown.is_err());

        let spec = CriteriaBuilder::positional(d, &cfg, &by, &["10".to_string(), "B,true".to_string()])
            .unwrap()
            .results_offset(1)
            .build()
            .unwrap();
        assert_eq!(spec.filters()[1].value, "B");
        assert!(spec.filters()[1].case_sensitive);
        assert_eq!(spec.window().results_offset, 1);
    }
}
