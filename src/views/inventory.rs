//! Inventory screen controller
//!
//! Ties the inventory loader, the mirror store, the table and the add/edit
//! form together. Every successful write is followed by a full reload of the
//! collection; a failed write leaves the store untouched and the form open.

use tokio::sync::watch;
use tracing::{debug, warn};

use crate::client::{Loader, Mutation, RemoteClient};
use crate::config::TableConfig;
use crate::core::entity::Resource;
use crate::core::error::{HouseholdError, RemoteError, Result};
use crate::core::validation::InventoryForm;
use crate::entities::{DeleteByName, InventoryItem};
use crate::input::DebouncedInput;
use crate::store::MirrorStore;
use crate::table::{Table, inventory_columns};

/// Inventory table, modal form and their remote writes
///
/// Must be created inside a tokio runtime: the search box owns a debounce timer.
pub struct InventoryView {
    loader: Loader<InventoryItem>,
    table: Table,
    form: InventoryForm,
    modal_open: bool,
    last_error: Option<String>,
    search: DebouncedInput,
    search_committed: watch::Receiver<String>,
}

impl InventoryView {
    pub fn new(
        client: RemoteClient,
        store: MirrorStore<InventoryItem>,
        config: &TableConfig,
    ) -> Result<Self> {
        let rows = store.items().iter().map(Resource::to_row).collect();
        let mut table = Table::new(rows, inventory_columns())?.with_page_sizes(config.page_sizes());
        table.set_page_size(config.page_size)?;

        let search = DebouncedInput::new("", config.debounce());
        let search_committed = search.subscribe();

        Ok(Self {
            loader: Loader::new(client, store).with_error_message("Failed to fetch inventory"),
            table,
            form: InventoryForm::default(),
            modal_open: false,
            last_error: None,
            search,
            search_committed,
        })
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut Table {
        &mut self.table
    }

    pub fn store(&self) -> &MirrorStore<InventoryItem> {
        self.loader.store()
    }

    pub fn form(&self) -> &InventoryForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut InventoryForm {
        &mut self.form
    }

    pub fn is_modal_open(&self) -> bool {
        self.modal_open
    }

    /// Message of the last failed load or write, cleared by the next success
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Fetch the inventory and show it
    pub async fn load(&mut self) -> Result<()> {
        match self.loader.load().await {
            Ok(_) => {
                self.last_error = None;
                self.refresh_table();
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Rebuild the table rows from the mirror store, keeping table state
    pub fn refresh_table(&mut self) {
        let rows = self.store().items().iter().map(Resource::to_row).collect();
        self.table.replace_rows(rows);
    }

    // === Search ===

    /// Record a keystroke in the search box
    pub fn search(&mut self, text: impl Into<String>) {
        self.search.input(text);
    }

    /// What the search box currently shows
    pub fn search_text(&self) -> &str {
        self.search.value()
    }

    /// Apply the committed search text to the table, if it changed
    ///
    /// Returns whether the global filter was updated.
    pub fn apply_search(&mut self) -> bool {
        if !self.search_committed.has_changed().unwrap_or(false) {
            return false;
        }
        let query = self.search_committed.borrow_and_update().clone();
        self.table.set_global_filter(query);
        true
    }

    /// Empty the search box and drop the global filter at once
    pub fn clear_search(&mut self) {
        self.search.sync("");
        self.search_committed.mark_unchanged();
        self.table.set_global_filter("");
    }

    // === Modal ===

    /// Open the form in create mode
    pub fn open_create(&mut self) {
        self.form.reset();
        self.modal_open = true;
    }

    /// Open the form pre-filled with the item `id`
    ///
    /// Returns false when no such item is mirrored.
    pub fn open_edit(&mut self, id: &str) -> bool {
        let Some(item) = self.store().find(id) else {
            return false;
        };
        debug!(id, name = %item.name, "Editing inventory item");
        self.form = InventoryForm::for_edit(&item);
        self.modal_open = true;
        true
    }

    /// Close the modal and reset the form
    pub fn close_modal(&mut self) {
        self.modal_open = false;
        self.form.reset();
    }

    /// Validate the form and send it
    ///
    /// Creates with POST, or updates with PUT when editing. On success the
    /// inventory is reloaded, then the modal closes and the form resets. On
    /// failure nothing is reloaded and the modal stays open.
    pub async fn submit(&mut self) -> Result<()> {
        self.form.check()?;

        let path = InventoryItem::collection_path();
        let mutation = if self.form.is_edit() {
            Mutation::put(path, "Failed to update inventory item")
        } else {
            Mutation::post(path, "Failed to add inventory item")
        };

        let loader = &self.loader;
        let reloaded = match mutation
            .send_then(loader.client(), &self.form, |_| loader.load())
            .await
        {
            Ok(reloaded) => reloaded,
            Err(e) => return Err(self.fail(e)),
        };

        self.close_modal();
        self.settle(reloaded)
    }

    /// Delete the item named `name`, then reload
    pub async fn delete(&mut self, name: &str) -> Result<()> {
        let mutation = Mutation::delete(
            InventoryItem::collection_path(),
            "Failed to delete inventory item",
        );
        let body = DeleteByName {
            name: name.to_string(),
        };

        let loader = &self.loader;
        let reloaded = match mutation
            .send_then(loader.client(), &body, |_| loader.load())
            .await
        {
            Ok(reloaded) => reloaded,
            Err(e) => return Err(self.fail(e)),
        };

        self.settle(reloaded)
    }

    fn settle<T>(&mut self, reloaded: std::result::Result<T, RemoteError>) -> Result<()> {
        match reloaded {
            Ok(_) => {
                self.last_error = None;
                self.refresh_table();
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    fn fail(&mut self, error: RemoteError) -> HouseholdError {
        warn!(code = error.error_code(), status = ?error.status(), "{}", error);
        self.last_error = Some(error.to_string());
        error.into()
    }
}
