//! # Household
//!
//! A headless client library for tracking household data against a small REST
//! backend.
//!
//! ## Features
//!
//! - **Generic Table Engine**: per-column and global fuzzy filtering, stable
//!   single-column sorting, clamped pagination
//! - **Fuzzy Ranking**: exact and prefix matches rank above subsequence matches
//! - **Row Severity**: capability-based classification of `quantity`/`threshold` rows
//! - **Debounced Input**: keystrokes echo at once, commits trail by a quiet period
//! - **Remote Resources**: typed loaders and mutations with normalized errors
//! - **Mirror Store**: whole-collection replacement, session persistence
//! - **Configuration-Based**: backend, table and session settings via YAML
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use household::prelude::*;
//!
//! let config = HouseholdConfig::default();
//! let client = RemoteClient::from_config(&config.api)?;
//! let store = MirrorStore::with_session(config.session.open_storage(), &config.session.namespace)?;
//!
//! let mut view = InventoryView::new(client, store, &config.table)?;
//! view.load().await?;
//!
//! view.table_mut().set_global_filter("milk");
//! for row in view.table().render_page() {
//!     println!("{:?} {:?}", row.cells, row.severity);
//! }
//! ```

pub mod client;
pub mod config;
pub mod core;
pub mod entities;
pub mod input;
pub mod storage;
pub mod store;
pub mod table;
pub mod views;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        CellValue, ConfigError, HouseholdError, PageSizeOptions, PaginationMeta, PaginationState,
        RemoteError, Resource, Row, StorageError, TableError, ValidationError,
        validation::{FormField, InventoryForm},
    };

    // === Entities ===
    pub use crate::entities::{DeleteByName, InventoryItem, Task};

    // === Table ===
    pub use crate::table::{
        ColumnDefinition, FilterState, Page, RenderedRow, Severity, SortDirection, SortState,
        StockLevel, StockSummary, Table, classify, inventory_columns, match_value,
    };

    // === Inputs ===
    pub use crate::input::{DebouncedInput, Poller};

    // === Remote ===
    pub use crate::client::{Loader, Mutation, RemoteClient};
    pub use crate::store::{MirrorStore, Snapshot};

    // === Storage ===
    pub use crate::storage::{FileSessionStorage, InMemorySessionStorage, SessionStorage};

    // === Views ===
    pub use crate::views::{Dashboard, InventoryView, TaskListView};

    // === Config ===
    pub use crate::config::{ApiConfig, HouseholdConfig, PollingConfig, SessionConfig, TableConfig};
}
