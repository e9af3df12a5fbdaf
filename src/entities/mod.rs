//! Household records served by the backend

pub mod inventory;
pub mod task;

pub use inventory::{DeleteByName, InventoryItem};
pub use task::Task;
