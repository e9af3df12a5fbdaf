//! Task list screen controller

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{info, warn};

use crate::client::{Loader, Mutation, RemoteClient};
use crate::core::entity::Resource;
use crate::core::error::RemoteError;
use crate::entities::{DeleteByName, Task};
use crate::input::Poller;
use crate::store::{MirrorStore, Snapshot};

/// Task list kept fresh by a polling reload
///
/// Polling starts with the view and stops when it is dropped. Must be created
/// inside a tokio runtime.
pub struct TaskListView {
    loader: Loader<Task>,
    poller: Option<Poller>,
}

impl TaskListView {
    pub fn new(client: RemoteClient, refresh: Duration) -> Self {
        let loader = Loader::new(client, MirrorStore::new()).with_error_message("Failed to fetch tasks");
        let poller = spawn_refresh(loader.clone(), refresh);
        Self {
            loader,
            poller: Some(poller),
        }
    }

    pub fn tasks(&self) -> Arc<Vec<Task>> {
        self.loader.store().items()
    }

    /// Receiver notified after every reload
    pub fn subscribe(&self) -> watch::Receiver<Snapshot<Task>> {
        self.loader.store().subscribe()
    }

    pub async fn load(&self) -> Result<Arc<Vec<Task>>, RemoteError> {
        self.loader.load().await
    }

    /// Delete the task with this title, then reload
    pub async fn delete(&self, title: &str) -> Result<Arc<Vec<Task>>, RemoteError> {
        let body = DeleteByName {
            name: title.to_string(),
        };
        Mutation::delete(Task::collection_path(), "Failed to delete task")
            .send_then(self.loader.client(), &body, |_| self.loader.load())
            .await?
    }

    pub fn is_polling(&self) -> bool {
        self.poller.as_ref().is_some_and(Poller::is_running)
    }

    pub fn stop_polling(&mut self) {
        if let Some(poller) = self.poller.take() {
            poller.cancel();
        }
    }
}

fn spawn_refresh(loader: Loader<Task>, period: Duration) -> Poller {
    Poller::spawn("tasks", period, move || {
        let loader = loader.clone();
        async move {
            info!("Refreshing task list");
            if let Err(e) = loader.load().await {
                warn!(error = %e, "Task list refresh failed");
            }
        }
    })
}
