//! Uniform response envelope shared by every entity endpoint.

use crate::service::ResultPage;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    pub success: bool,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generable_results: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results_from: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results_offset: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<Value>>,
}

impl Envelope {
    fn base(success: bool) -> Self {
        Envelope {
            success,
            timestamp: Utc::now(),
            error: None,
            generable_results: None,
            results_from: None,
            results_offset: None,
            data: None,
        }
    }

    pub fn failure(message: String) -> Self {
        Envelope {
            error: Some(message),
            ..Self::base(false)
        }
    }

    /// Success carrying rows without pagination metadata (create, update, single read).
    pub fn rows(data: Vec<Value>) -> Self {
        Envelope {
            data: Some(data),
            ..Self::base(true)
        }
    }

    /// Success with no payload (delete).
    pub fn empty() -> Self {
        Self::base(true)
    }

    pub fn page(page: ResultPage) -> Self {
        Envelope {
            generable_results: Some(page.generable_results),
            results_from: Some(page.results_from),
            results_offset: Some(page.results_offset),
            data: Some(page.rows),
            ..Self::base(true)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn failure_omits_page_fields() {
        let v = serde_json::to_value(Envelope::failure("validation: bad".into())).unwrap();
        assert_eq!(v["success"], json!(false));
        assert_eq!(v["error"], json!("validation: bad"));
        assert!(v.get("data").is_none());
        assert!(v.get("generableResults").is_none());
        assert!(v["timestamp"].is_string());
    }

    #[test]
    fn page_uses_camel_case_metadata() {
        let page = ResultPage {
            rows: vec![json!({"id": "1"})],
            generable_results: 2,
            results_from: 0,
            results_offset: 1,
        };
        let v = serde_json::to_value(Envelope::page(page)).unwrap();
        assert_eq!(v["success"], json!(true));
        assert_eq!(v["generableResults"], json!(2));
        assert_eq!(v["resultsFrom"], json!(0));
        assert_eq!(v["resultsOffset"], json!(1));
        assert_eq!(v["data"], json!([{"id": "1"}]));
        assert!(v.get("error").is_none());
    }
}
