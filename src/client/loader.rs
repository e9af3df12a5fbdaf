//! Collection loader feeding a mirror store

use std::sync::Arc;

use tracing::info;

use super::RemoteClient;
use crate::core::entity::Resource;
use crate::core::error::RemoteError;
use crate::store::MirrorStore;

/// Fetches a resource collection and mirrors it locally
#[derive(Clone)]
pub struct Loader<T: Resource> {
    client: RemoteClient,
    store: MirrorStore<T>,
    path: String,
    error_message: String,
}

impl<T: Resource> Loader<T> {
    /// Loader for `T`'s collection path, replacing `store` on success
    pub fn new(client: RemoteClient, store: MirrorStore<T>) -> Self {
        Self {
            client,
            store,
            path: T::collection_path().to_string(),
            error_message: format!("Failed to fetch {}", T::resource_name()),
        }
    }

    /// Override the message carried by a [`RemoteError::Fetch`]
    pub fn with_error_message(mut self, message: impl Into<String>) -> Self {
        self.error_message = message.into();
        self
    }

    pub fn client(&self) -> &RemoteClient {
        &self.client
    }

    pub fn store(&self) -> &MirrorStore<T> {
        &self.store
    }

    /// Fetch the collection and replace the store with it
    ///
    /// On failure the store keeps its previous collection.
    pub async fn load(&self) -> Result<Arc<Vec<T>>, RemoteError> {
        let items: Vec<T> = self.client.load(&self.path, &self.error_message).await?;
        info!(
            resource = T::resource_name(),
            count = items.len(),
            "Loaded collection"
        );
        self.store.replace(items);
        Ok(self.store.items())
    }
}
