//! Typed error handling for the household client
//!
//! This module provides an error hierarchy that lets callers react to the
//! exact failure instead of a generic `anyhow::Error`.
//!
//! # Error Categories
//!
//! - [`RemoteError`]: failed reads (FetchError) and writes (MutationError)
//! - [`ValidationError`]: client-side form validation, never reaches the network
//! - [`TableError`]: invalid table construction or state changes
//! - [`StorageError`]: session storage failures
//! - [`ConfigError`]: configuration parsing failures
//!
//! # Example
//!
//! ```rust,ignore
//! match view.delete("Milk").await {
//!     Ok(()) => {}
//!     Err(HouseholdError::Remote(RemoteError::Mutation { status, .. })) => {
//!         eprintln!("backend refused the delete ({:?})", status);
//!     }
//!     Err(e) => eprintln!("other error: {}", e),
//! }
//! ```

use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

/// Result alias used across the crate
pub type Result<T, E = HouseholdError> = std::result::Result<T, E>;

/// The main error type for the household client
#[derive(Debug, Error)]
pub enum HouseholdError {
    /// Remote API errors (reads and writes)
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// Client-side validation errors
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Table engine errors
    #[error(transparent)]
    Table(#[from] TableError),

    /// Session storage errors
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Configuration errors
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl HouseholdError {
    /// Get the error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            HouseholdError::Remote(e) => e.error_code(),
            HouseholdError::Validation(_) => "VALIDATION_ERROR",
            HouseholdError::Table(e) => e.error_code(),
            HouseholdError::Storage(_) => "STORAGE_ERROR",
            HouseholdError::Config(_) => "CONFIG_ERROR",
        }
    }

    /// Whether the failure happened before any network call was made
    pub fn is_local(&self) -> bool {
        !matches!(self, HouseholdError::Remote(_))
    }
}

// =============================================================================
// Remote Errors
// =============================================================================

/// Errors raised by the remote resource client
///
/// Reads and writes have their own variants so a caller can tell a failed
/// refresh from a rejected mutation. Transport and decoding failures are
/// folded into the same two variants with `status: None`.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// A read returned something other than 200, or could not be completed
    #[error("{message} (GET {url}{})", format_status(.status))]
    Fetch {
        url: String,
        status: Option<u16>,
        message: String,
    },

    /// A write returned something outside {200, 201}, or could not be completed
    #[error("{message} ({method} {url}{})", format_status(.status))]
    Mutation {
        method: String,
        url: String,
        status: Option<u16>,
        message: String,
    },

    /// The HTTP client itself could not be built
    #[error("Failed to create HTTP client: {0}")]
    Client(String),
}

fn format_status(status: &Option<u16>) -> String {
    status.map(|s| format!(" -> {}", s)).unwrap_or_default()
}

impl RemoteError {
    pub fn error_code(&self) -> &'static str {
        match self {
            RemoteError::Fetch { .. } => "FETCH_ERROR",
            RemoteError::Mutation { .. } => "MUTATION_ERROR",
            RemoteError::Client(_) => "CLIENT_ERROR",
        }
    }

    /// HTTP status returned by the backend, if the request got that far
    pub fn status(&self) -> Option<u16> {
        match self {
            RemoteError::Fetch { status, .. } | RemoteError::Mutation { status, .. } => *status,
            RemoteError::Client(_) => None,
        }
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors related to client-side input validation
#[derive(Debug, Clone, Error)]
pub enum ValidationError {
    /// One or more form fields are invalid
    #[error("Validation errors: {}", format_field_errors(.0))]
    FieldErrors(Vec<FieldValidationError>),
}

/// A single field validation error
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldValidationError {
    pub field: String,
    pub message: String,
}

fn format_field_errors(errors: &[FieldValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join(", ")
}

impl ValidationError {
    /// The first message per field, keyed by field name
    pub fn first_messages(&self) -> BTreeMap<String, String> {
        let ValidationError::FieldErrors(errors) = self;
        let mut out = BTreeMap::new();
        for e in errors {
            out.entry(e.field.clone())
                .or_insert_with(|| e.message.clone());
        }
        out
    }
}

// =============================================================================
// Table Errors
// =============================================================================

/// Errors raised by the generic table engine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    /// Two column definitions share the same key
    #[error("Duplicate column key '{key}'")]
    DuplicateColumn { key: String },

    /// A state change referenced a column that does not exist
    #[error("Unknown column '{key}'")]
    UnknownColumn { key: String },

    /// Sorting was requested on a column with `sortable = false`
    #[error("Column '{key}' is not sortable")]
    NotSortable { key: String },

    /// A per-column filter was set on a column with `filterable = false`
    #[error("Column '{key}' is not filterable")]
    NotFilterable { key: String },

    /// The page size is not one of the configured options
    #[error("Unsupported page size {size} (allowed: {allowed:?})")]
    InvalidPageSize { size: usize, allowed: Vec<usize> },
}

impl TableError {
    pub fn error_code(&self) -> &'static str {
        match self {
            TableError::DuplicateColumn { .. } => "DUPLICATE_COLUMN",
            TableError::UnknownColumn { .. } => "UNKNOWN_COLUMN",
            TableError::NotSortable { .. } => "COLUMN_NOT_SORTABLE",
            TableError::NotFilterable { .. } => "COLUMN_NOT_FILTERABLE",
            TableError::InvalidPageSize { .. } => "INVALID_PAGE_SIZE",
        }
    }
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors related to session storage backends
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing medium failed
    #[error("Session storage I/O error for '{key}': {message}")]
    Io { key: String, message: String },

    /// A stored value could not be (de)serialized
    #[error("Failed to (de)serialize session value '{key}': {message}")]
    Serialization { key: String, message: String },

    /// A lock guarding the storage was poisoned
    #[error("Session storage lock poisoned: {0}")]
    Poisoned(String),
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to parse configuration
    #[error("Failed to parse config{}: {message}", format_file(.file))]
    ParseError {
        file: Option<String>,
        message: String,
    },

    /// Invalid value in configuration
    #[error("Invalid value '{value}' for field '{field}': {message}")]
    InvalidValue {
        field: String,
        value: String,
        message: String,
    },
}

fn format_file(file: &Option<String>) -> String {
    file.as_ref()
        .map(|f| format!(" file '{}'", f))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_display_includes_status() {
        let err = RemoteError::Fetch {
            url: "http://localhost:3005/api/inventory".to_string(),
            status: Some(500),
            message: "Failed to fetch inventory".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to fetch inventory (GET http://localhost:3005/api/inventory -> 500)"
        );
    }

    #[test]
    fn test_mutation_error_without_status() {
        let err = RemoteError::Mutation {
            method: "DELETE".to_string(),
            url: "http://localhost:3005/api/inventory".to_string(),
            status: None,
            message: "Failed to delete inventory item".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to delete inventory item (DELETE http://localhost:3005/api/inventory)"
        );
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_error_codes() {
        let err: HouseholdError = TableError::DuplicateColumn {
            key: "name".to_string(),
        }
        .into();
        assert_eq!(err.error_code(), "DUPLICATE_COLUMN");
        assert!(err.is_local());

        let err: HouseholdError = RemoteError::Client("boom".to_string()).into();
        assert_eq!(err.error_code(), "CLIENT_ERROR");
        assert!(!err.is_local());
    }

    #[test]
    fn test_first_messages_keeps_first_per_field() {
        let err = ValidationError::FieldErrors(vec![
            FieldValidationError {
                field: "name".to_string(),
                message: "too short".to_string(),
            },
            FieldValidationError {
                field: "name".to_string(),
                message: "second".to_string(),
            },
            FieldValidationError {
                field: "quantity".to_string(),
                message: "too large".to_string(),
            },
        ]);
        let first = err.first_messages();
        assert_eq!(first.get("name").map(String::as_str), Some("too short"));
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::ParseError {
            file: Some("household.yaml".to_string()),
            message: "bad indent".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to parse config file 'household.yaml': bad indent"
        );
    }
}
