//! Column descriptor: the closed, ordered set of persisted columns of one entity.

use crate::auth::AccessPolicy;

/// Primary key column shared by every entity table.
pub const PRIMARY_KEY: &str = "id";

/// Canonical column token. Only obtainable from a descriptor, so the name it
/// carries is always one of the descriptor's static names, never request input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Column(&'static str);

impl Column {
    pub fn name(&self) -> &'static str {
        self.0
    }

    pub fn is_primary_key(&self) -> bool {
        self.0 == PRIMARY_KEY
    }
}

impl std::fmt::Display for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

#[derive(Debug)]
pub struct ColumnDescriptor {
    /// Table name; also the API path segment.
    pub table: &'static str,
    columns: &'static [&'static str],
    required: &'static [&'static str],
    pub access: AccessPolicy,
}

impl ColumnDescriptor {
    /// `columns` must start with [`PRIMARY_KEY`]; the catalog macro guarantees it.
    pub const fn new(
        table: &'static str,
        columns: &'static [&'static str],
        required: &'static [&'static str],
        access: AccessPolicy,
    ) -> Self {
        ColumnDescriptor {
            table,
            columns,
            required,
            access,
        }
    }

    /// Resolves a candidate name. Unknown names yield `None`, never an error.
    pub fn resolve(&self, name: &str) -> Option<Column> {
        self.columns.iter().find(|c| **c == name).map(|c| Column(*c))
    }

    pub fn primary_key(&self) -> Column {
        Column(PRIMARY_KEY)
    }

    pub fn columns(&self) -> impl Iterator<Item = Column> + '_ {
        self.columns.iter().map(|c| Column(*c))
    }

    /// Columns a client may set: everything except the primary key.
    pub fn writable(&self) -> impl Iterator<Item = Column> + '_ {
        self.columns().filter(|c| !c.is_primary_key())
    }

    /// Columns an insert must supply with a non-null value.
    pub fn required(&self) -> impl Iterator<Item = Column> + '_ {
        self.required.iter().map(|c| Column(*c))
    }
}

/// Implemented by every entity type in the catalog.
pub trait Entity {
    fn descriptor() -> &'static ColumnDescriptor;
}
