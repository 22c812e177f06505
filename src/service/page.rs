//! One page of results plus metadata about the whole match set.

use serde::de::DeserializeOwned;
use serde_json::Value;

#[derive(Clone, Debug)]
pub struct ResultPage {
    pub rows: Vec<Value>,
    /// Rows matching the filters, ignoring the window.
    pub generable_results: u64,
    /// Echo of the requested start index.
    pub results_from: u64,
    /// Rows actually available from `results_from`, capped by the requested page size.
    pub results_offset: u64,
}

impl ResultPage {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Maps every row into a typed entity value.
    pub fn deserialize_rows<T: DeserializeOwned>(&self) -> Result<Vec<T>, serde_json::Error> {
        self.rows.iter().cloned().map(serde_json::from_value).collect()
    }
}

impl IntoIterator for ResultPage {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}
