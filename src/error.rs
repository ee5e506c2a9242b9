//! Error types for the fuzzy index server.
//!
//! This module defines custom error types using `thiserror` for precise error handling.
//! Each layer gets its own enum so callers can tell a storage outage apart from a
//! rejected request.

use thiserror::Error;

/// Errors raised by an [`IndexStore`](crate::storage::IndexStore) backend.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Could not reach the cluster (connection, session setup)
    #[error("Storage connection failed: {0}")]
    Connection(String),

    /// A statement was sent but the cluster rejected it or timed out
    #[error("Statement failed: {0}")]
    Statement(String),

    /// A returned row could not be decoded into the expected shape
    #[error("Row decode error: {0}")]
    RowDecode(String),

    /// The session has no keyspace to resolve the table against
    #[error("No keyspace selected")]
    NoKeyspace,
}

/// Errors surfaced by the index core (writer, query engine, provisioning).
#[derive(Error, Debug)]
pub enum IndexError {
    /// Table creation failed; fatal at startup
    #[error("Search index schema unavailable: {0}")]
    SchemaUnavailable(#[source] StoreError),

    /// A read or write against the cluster failed
    #[error("Search index storage unavailable: {0}")]
    StorageUnavailable(#[from] StoreError),
}

/// Errors returned by the service layer in front of the core.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Request failed validation
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Too many calls for this identity in the current window
    #[error("Rate limit exceeded, retry after {retry_after_secs}s")]
    RateLimitExceeded { retry_after_secs: u64 },

    /// The core failed
    #[error(transparent)]
    Index(#[from] IndexError),
}

/// Errors that can occur during configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Required environment variable is missing
    #[error("Missing required environment variable: {0}")]
    MissingVar(String),

    /// Environment variable has invalid value
    #[error("Invalid value for {var}: {reason}")]
    InvalidValue { var: String, reason: String },
}

/// Convenience type alias for Results with StoreError
pub type StoreResult<T> = Result<T, StoreError>;

/// Convenience type alias for Results with IndexError
pub type IndexResult<T> = Result<T, IndexError>;

/// Convenience type alias for Results with ServiceError
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Convenience type alias for Results with ConfigError
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StoreError::NoKeyspace;
        assert_eq!(err.to_string(), "No keyspace selected");

        let err = ConfigError::MissingVar("SEARCH_CONTACT_POINTS".to_string());
        assert_eq!(
            err.to_string(),
            "Missing required environment variable: SEARCH_CONTACT_POINTS"
        );

        let err = ServiceError::RateLimitExceeded {
            retry_after_secs: 12,
        };
        assert_eq!(err.to_string(), "Rate limit exceeded, retry after 12s");
    }

    #[test]
    fn test_store_error_converts_to_storage_unavailable() {
        let err: IndexError = StoreError::Statement("timeout".to_string()).into();
        assert!(matches!(err, IndexError::StorageUnavailable(_)));
        assert!(err.to_string().contains("timeout"));
    }

    #[test]
    fn test_service_error_is_transparent_over_index_error() {
        let err: ServiceError =
            IndexError::SchemaUnavailable(StoreError::Connection("refused".to_string())).into();
        assert_eq!(
            err.to_string(),
            "Search index schema unavailable: Storage connection failed: refused"
        );
    }
}
