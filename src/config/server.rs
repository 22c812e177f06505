//! Process configuration read from the environment (after `.env` is loaded).

use crate::config::{EngineConfig, MultiValuePolicy, DEFAULT_PAGE_SIZE, DEFAULT_SCHEMA, MAX_PAGE_SIZE};
use crate::error::ConfigError;
use std::str::FromStr;

pub const DEFAULT_BODY_LIMIT: usize = 2 * 1024 * 1024;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub database_url: String,
    pub bind_addr: String,
    pub max_connections: u32,
    pub body_limit: usize,
    pub engine: EngineConfig,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes `std::env::var`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let engine = EngineConfig {
            schema: lookup("DB_SCHEMA").unwrap_or_else(|| DEFAULT_SCHEMA.into()),
            default_page_size: parse_or(&lookup, "DEFAULT_PAGE_SIZE", DEFAULT_PAGE_SIZE)?,
            max_page_size: parse_or(&lookup, "MAX_PAGE_SIZE", MAX_PAGE_SIZE)?,
            multi_value: parse_or(&lookup, "FILTER_MULTI_VALUE", MultiValuePolicy::Reject)?,
        };
        engine.validate()?;
        Ok(ServerConfig {
            database_url: lookup("DATABASE_URL").unwrap_or_else(|| "postgres://localhost/school_admin".into()),
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".into()),
            max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 5)?,
            body_limit: parse_or(&lookup, "BODY_LIMIT_BYTES", DEFAULT_BODY_LIMIT)?,
            engine,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid { key, value: raw }),
    }
}
