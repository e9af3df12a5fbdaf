//! Core module containing fundamental traits and types for the crate

pub mod entity;
pub mod error;
pub mod field;
pub mod query;
pub mod validation;

pub use entity::Resource;
pub use error::{
    ConfigError, FieldValidationError, HouseholdError, RemoteError, StorageError, TableError,
    ValidationError,
};
pub use field::{CellValue, Row};
pub use query::{PageSizeOptions, PaginationMeta, PaginationState};
