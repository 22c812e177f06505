//! Engine configuration: constructed explicitly and handed to `Engine::new`.

use crate::error::ConfigError;
use std::str::FromStr;

pub const DEFAULT_SCHEMA: &str = "public";
pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const MAX_PAGE_SIZE: i64 = 1000;

/// What to do when the same filter column is given more than once.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MultiValuePolicy {
    /// A repeated column is a validation error.
    #[default]
    Reject,
    /// Values of a repeated column are OR'd together.
    AnyOf,
}

impl FromStr for MultiValuePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "reject" => Ok(MultiValuePolicy::Reject),
            "any_of" | "anyof" | "or" => Ok(MultiValuePolicy::AnyOf),
            _ => Err(ConfigError::Invalid {
                key: "FILTER_MULTI_VALUE",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// PostgreSQL schema that holds one table per entity.
    pub schema: String,
    /// Page size used when a request carries no `resultsOffset`.
    pub default_page_size: i64,
    /// Largest page size a request may ask for.
    pub max_page_size: i64,
    pub multi_value: MultiValuePolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            schema: DEFAULT_SCHEMA.to_string(),
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
            multi_value: MultiValuePolicy::default(),
        }
    }
}

impl EngineConfig {
    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = schema.into();
        self
    }

    pub fn with_default_page_size(mut self, size: i64) -> Self {
        self.default_page_size = size;
        self
    }

    pub fn with_max_page_size(mut self, size: i64) -> Self {
        self.max_page_size = size;
        self
    }

    pub fn with_multi_value(mut self, policy: MultiValuePolicy) -> Self {
        self.multi_value = policy;
        self
    }

    /// Rejects values that would make every request fail.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.schema.is_empty() {
            return Err(ConfigError::Invalid {
                key: "DB_SCHEMA",
                value: String::new(),
            });
        }
        if self.max_page_size < 1 {
            return Err(ConfigError::Invalid {
                key: "MAX_PAGE_SIZE",
                value: self.max_page_size.to_string(),
            });
        }
        if self.default_page_size < 0 || self.default_page_size > self.max_page_size {
            return Err(ConfigError::Invalid {
                key: "DEFAULT_PAGE_SIZE",
                value: self.default_page_size.to_string(),
            });
        }
        Ok(())
    }
}
