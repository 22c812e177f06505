//! Lookup of entity descriptors by API path segment. Built once, read-only afterwards.

use crate::model::{catalog, ColumnDescriptor};
use std::collections::HashMap;

#[derive(Clone, Debug)]
pub struct EntityRegistry {
    by_path: HashMap<&'static str, &'static ColumnDescriptor>,
}

impl EntityRegistry {
    /// Registry holding every catalog entity.
    pub fn catalog() -> Self {
        Self::from_descriptors(catalog::all())
    }

    pub fn from_descriptors(descriptors: impl IntoIterator<Item = &'static ColumnDescriptor>) -> Self {
        EntityRegistry {
            by_path: descriptors.into_iter().map(|d| (d.table, d)).collect(),
        }
    }

    pub fn get(&self, path: &str) -> Option<&'static ColumnDescriptor> {
        self.by_path.get(path).copied()
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &'static ColumnDescriptor> + '_ {
        self.by_path.values().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_registry_finds_entities_by_table() {
        let registry = EntityRegistry::catalog();
        assert_eq!(registry.get("classrooms").map(|d| d.table), Some("classrooms"));
        assert_eq!(registry.get("relief_records").map(|d| d.table), Some("relief_records"));
        assert!(registry.get("grades").is_none());
        assert_eq!(registry.descriptors().count(), 7);
    }
}
