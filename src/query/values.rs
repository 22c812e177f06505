//! Column/value lists for inserts and updates, restricted to writable columns.

use crate::error::AppError;
use crate::model::{Column, ColumnDescriptor};
use crate::sql::SqlValue;
use serde_json::Value;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ColumnValues(Vec<(Column, SqlValue)>);

impl ColumnValues {
    pub fn new() -> Self {
        ColumnValues(Vec::new())
    }

    /// Sets a column, replacing an earlier value for the same column in place.
    pub fn set(&mut self, column: Column, value: SqlValue) {
        match self.0.iter_mut().find(|(c, _)| *c == column) {
            Some(slot) => slot.1 = value,
            None => self.0.push((column, value)),
        }
    }

    pub fn get(&self, column: Column) -> Option<&SqlValue> {
        self.0.iter().find(|(c, _)| *c == column).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(Column, SqlValue)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// From a JSON object body. Unknown keys and the primary key are dropped.
    pub fn from_json(descriptor: &ColumnDescriptor, body: &Value) -> Result<Self, AppError> {
        let Value::Object(map) = body else {
            return Err(AppError::Validation("body must be a JSON object".into()));
        };
        let mut out = ColumnValues::new();
        for (key, value) in map {
            if let Some(col) = writable(descriptor, key) {
                out.set(col, SqlValue::from_json(value));
            }
        }
        Ok(out)
    }

    /// From multipart `(field name, bytes)` parts. Unknown fields and the primary key are dropped.
    pub fn from_parts(descriptor: &ColumnDescriptor, parts: Vec<(String, Vec<u8>)>) -> Result<Self, AppError> {
        let mut out = ColumnValues::new();
        for (name, bytes) in parts {
            let Some(col) = writable(descriptor, &name) else {
                continue;
            };
            let text = String::from_utf8(bytes)
                .map_err(|_| AppError::Validation(format!("field '{}' is not valid UTF-8", name)))?;
            out.set(col, SqlValue::Text(text));
        }
        Ok(out)
    }
}

impl FromIterator<(Column, SqlValue)> for ColumnValues {
    fn from_iter<I: IntoIterator<Item = (Column, SqlValue)>>(iter: I) -> Self {
        let mut out = ColumnValues::new();
        for (col, value) in iter {
            out.set(col, value);
        }
        out
    }
}

fn writable(descriptor: &ColumnDescriptor, name: &str) -> Option<Column> {
    descriptor.resolve(name).filter(|c| !c.is_primary_key())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::catalog::Classroom;
    use crate::model::Entity;
    use serde_json::json;

    #[test]
    fn json_body_keeps_known_writable_columns_in_order() {
        let d = Classroom::descriptor();
        let values = ColumnValues::from_json(d, &json!({"id": "99", "grade": 10, "name": "A", "color": "red"})).unwrap();
        let cols: Vec<_> = values.iter().map(|(c, _)| c.name()).collect();
        assert_eq!(values.len(), 2);
        assert!(cols.contains(&"grade") && cols.contains(&"name"));
        assert_eq!(values.get(d.resolve("grade").unwrap()), Some(&SqlValue::Text("10".into())));
        assert!(values.get(d.primary_key()).is_none());
    }

    #[test]
    fn non_object_body_is_rejected() {
        let err = ColumnValues::from_json(Classroom::descriptor(), &json!([1, 2])).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn multipart_parts_last_value_wins_and_unknown_fields_drop() {
        let d = Classroom::descriptor();
        let parts = vec![
            ("name".to_string(), b"A".to_vec()),
            ("avatar".to_string(), vec![0xff, 0xfe]),
            ("name".to_string(), b"B".to_vec()),
        ];
        let values = ColumnValues::from_parts(d, parts).unwrap();
        assert_eq!(values.len(), 1);
        assert_eq!(values.get(d.resolve("name").unwrap()), Some(&SqlValue::Text("B".into())));
    }

    #[test]
    fn multipart_known_field_must_be_utf8() {
        let parts = vec![("name".to_string(), vec![0xff])];
        assert!(ColumnValues::from_parts(Classroom::descriptor(), parts).is_err());
    }
}
