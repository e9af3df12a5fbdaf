//! Resource trait describing a collection served by the backend

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::core::field::Row;

/// A record type exposed as a REST collection
///
/// The backend serves the whole collection at `collection_path()` and accepts
/// writes on the same path with the record in the request body.
pub trait Resource: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Path of the collection, relative to the API base URL (e.g. "/api/inventory")
    fn collection_path() -> &'static str;

    /// Human-readable plural name used in logs and error messages
    fn resource_name() -> &'static str;

    /// Stable identifier of this record, when it has one
    fn id(&self) -> Option<&str>;

    /// Project this record into a table row
    fn to_row(&self) -> Row {
        Row::from_record(self)
    }
}
