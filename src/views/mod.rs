//! Headless screen controllers built on the table, client and store

pub mod dashboard;
pub mod inventory;
pub mod tasks;

pub use dashboard::Dashboard;
pub use inventory::InventoryView;
pub use tasks::TaskListView;
