//! Write validation performed before any SQL is built.

use crate::error::AppError;
use crate::model::ColumnDescriptor;
use crate::query::{ColumnValues, FilterPredicate};

pub struct RequestValidator;

impl RequestValidator {
    /// Every required column must be present and non-null.
    pub fn validate_insert(descriptor: &ColumnDescriptor, values: &ColumnValues) -> Result<(), AppError> {
        for col in descriptor.required() {
            match values.get(col) {
                Some(v) if !v.is_null() => {}
                _ => return Err(AppError::Validation(format!("{} is required", col))),
            }
        }
        Ok(())
    }

    /// An update needs something to set and something to match.
    pub fn validate_update(values: &ColumnValues, filters: &[FilterPredicate]) -> Result<(), AppError> {
        if values.is_empty() {
            return Err(AppError::Validation("no updatable columns in request".into()));
        }
        Self::validate_delete(filters)
    }

    pub fn validate_delete(filters: &[FilterPredicate]) -> Result<(), AppError> {
        if filters.is_empty() {
            return Err(AppError::Validation("at least one filter is required".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::catalog::Classroom;
    use crate::model::Entity;
    use crate::sql::SqlValue;

    #[test]
    fn insert_requires_non_null_required_columns() {
        let d = Classroom::descriptor();
        let mut values = ColumnValues::new();
        values.set(d.resolve("name").unwrap(), SqlValue::from("A"));
        assert!(RequestValidator::validate_insert(d, &values).is_err());

        values.set(d.resolve("grade").unwrap(), SqlValue::Null);
        assert!(RequestValidator::validate_insert(d, &values).is_err());

        values.set(d.resolve("grade").unwrap(), SqlValue::from("10"));
        assert!(RequestValidator::validate_insert(d, &values).is_ok());
    }

    #[test]
    fn unfiltered_writes_are_rejected() {
        let d = Classroom::descriptor();
        let mut values = ColumnValues::new();
        values.set(d.resolve("name").unwrap(), SqlValue::from("A"));
        assert!(RequestValidator::validate_update(&values, &[]).is_err());
        assert!(RequestValidator::validate_delete(&[]).is_err());

        let filters = vec![FilterPredicate::exact(d.primary_key(), "1")];
        assert!(RequestValidator::validate_update(&ColumnValues::new(), &filters).is_err());
        assert!(RequestValidator::validate_update(&values, &filters).is_ok());
    }
}
