//! Configuration management for the fuzzy index server.
//!
//! This module handles loading and validating configuration from environment variables.
//! A `.env` file is honoured if present; nothing is printed to stdout, which the MCP
//! transport owns.

use crate::error::{ConfigError, ConfigResult};
use std::env;

/// Configuration for the fuzzy index server.
#[derive(Debug, Clone)]
pub struct Config {
    /// Cluster contact points (`host:port`)
    pub contact_points: Vec<String>,

    /// Keyspace holding the index table (default: "fuzzy_search")
    pub keyspace: String,

    /// Replication factor used if the keyspace has to be created (default: 1)
    pub replication_factor: u32,

    /// Optional cluster credentials
    pub username: Option<String>,
    pub password: Option<String>,

    /// Connection timeout in seconds (default: 10)
    pub connect_timeout: u64,

    /// Row writes in flight per indexed document (default: 16)
    pub write_concurrency: usize,

    /// Hits returned per search (default: 10)
    pub max_query_results: usize,

    /// Calls per owner per minute, 0 disables (default: 120)
    pub rate_limit_per_minute: u32,

    /// Log level (default: "error")
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required environment variables:
    /// - `SEARCH_CONTACT_POINTS`: comma-separated `host:port` list
    ///
    /// Optional environment variables:
    /// - `SEARCH_KEYSPACE`: keyspace name (default: fuzzy_search)
    /// - `SEARCH_REPLICATION_FACTOR`: replication factor (default: 1)
    /// - `SEARCH_USERNAME` / `SEARCH_PASSWORD`: credentials, both or neither
    /// - `CONNECT_TIMEOUT`: seconds (default: 10)
    /// - `WRITE_CONCURRENCY`: per-document write fan-out (default: 16)
    /// - `MAX_QUERY_RESULTS`: hits per search (default: 10)
    /// - `RATE_LIMIT_PER_MINUTE`: per-owner call budget (default: 120)
    /// - `LOG_LEVEL`: logging level (default: "error")
    pub fn from_env() -> ConfigResult<Self> {
        // dotenvy::dotenv() doesn't print to stdout
        let _ = dotenvy::dotenv();

        let raw_points = env::var("SEARCH_CONTACT_POINTS")
            .map_err(|_| ConfigError::MissingVar("SEARCH_CONTACT_POINTS".to_string()))?;
        let contact_points = Self::parse_contact_points(&raw_points)?;

        let keyspace = Self::parse_keyspace(
            &env::var("SEARCH_KEYSPACE").unwrap_or_else(|_| "fuzzy_search".to_string()),
        )?;

        let username = env::var("SEARCH_USERNAME").ok().filter(|v| !v.is_empty());
        let password = env::var("SEARCH_PASSWORD").ok().filter(|v| !v.is_empty());
        if username.is_some() != password.is_some() {
            return Err(ConfigError::InvalidValue {
                var: "SEARCH_USERNAME".to_string(),
                reason: "SEARCH_USERNAME and SEARCH_PASSWORD must be set together".to_string(),
            });
        }

        let replication_factor = Self::parse_env_u32("SEARCH_REPLICATION_FACTOR", 1)?;
        if replication_factor == 0 {
            return Err(ConfigError::InvalidValue {
                var: "SEARCH_REPLICATION_FACTOR".to_string(),
                reason: "Must be at least 1".to_string(),
            });
        }

        let connect_timeout = Self::parse_env_u64("CONNECT_TIMEOUT", 10)?;
        let write_concurrency = Self::parse_env_usize("WRITE_CONCURRENCY", 16)?;
        let max_query_results = Self::parse_env_usize("MAX_QUERY_RESULTS", 10)?;
        if max_query_results == 0 {
            return Err(ConfigError::InvalidValue {
                var: "MAX_QUERY_RESULTS".to_string(),
                reason: "Must be at least 1".to_string(),
            });
        }
        let rate_limit_per_minute = Self::parse_env_u32("RATE_LIMIT_PER_MINUTE", 120)?;

        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "error".to_string());

        Ok(Config {
            contact_points,
            keyspace,
            replication_factor,
            username,
            password,
            connect_timeout,
            write_concurrency,
            max_query_results,
            rate_limit_per_minute,
            log_level,
        })
    }

    /// Split and validate the contact point list.
    fn parse_contact_points(raw: &str) -> ConfigResult<Vec<String>> {
        let points: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect();

        if points.is_empty() {
            return Err(ConfigError::InvalidValue {
                var: "SEARCH_CONTACT_POINTS".to_string(),
                reason: "Cannot be empty".to_string(),
            });
        }

        if let Some(bad) = points.iter().find(|p| !p.contains(':')) {
            return Err(ConfigError::InvalidValue {
                var: "SEARCH_CONTACT_POINTS".to_string(),
                reason: format!("Expected host:port, got: {}", bad),
            });
        }

        Ok(points)
    }

    /// Keyspace names are interpolated into CQL, so only plain identifiers pass.
    fn parse_keyspace(raw: &str) -> ConfigResult<String> {
        let keyspace = raw.trim().to_lowercase();
        let valid = !keyspace.is_empty()
            && keyspace.len() <= 48
            && keyspace.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
            && keyspace.chars().next().is_some_and(|c| c.is_ascii_alphabetic());

        if !valid {
            return Err(ConfigError::InvalidValue {
                var: "SEARCH_KEYSPACE".to_string(),
                reason: format!("Must be a plain identifier, got: {}", raw),
            });
        }
        Ok(keyspace)
    }

    /// Parse an environment variable as u64 with a default value.
    fn parse_env_u64(var_name: &str, default: u64) -> ConfigResult<u64> {
        match env::var(var_name) {
            Ok(val) => val.parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                var: var_name.to_string(),
                reason: format!("Must be a positive number, got: {}", val),
            }),
            Err(_) => Ok(default),
        }
    }

    /// Parse an environment variable as usize with a default value.
    fn parse_env_usize(var_name: &str, default: usize) -> ConfigResult<usize> {
        match env::var(var_name) {
            Ok(val) => val.parse::<usize>().map_err(|_| ConfigError::InvalidValue {
                var: var_name.to_string(),
                reason: format!("Must be a positive number, got: {}", val),
            }),
            Err(_) => Ok(default),
        }
    }

    /// Parse an environment variable as u32 with a default value.
    fn parse_env_u32(var_name: &str, default: u32) -> ConfigResult<u32> {
        match env::var(var_name) {
            Ok(val) => val.parse::<u32>().map_err(|_| ConfigError::InvalidValue {
                var: var_name.to_string(),
                reason: format!("Must be a positive number, got: {}", val),
            }),
            Err(_) => Ok(default),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            contact_points: vec!["127.0.0.1:9042".to_string()],
            keyspace: "fuzzy_search".to_string(),
            replication_factor: 1,
            username: None,
            password: None,
            connect_timeout: 10,
            write_concurrency: 16,
            max_query_results: 10,
            rate_limit_per_minute: 120,
            log_level: "error".to_string(),
        }
    }
}
