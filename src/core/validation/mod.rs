//! Client-side validation
//!
//! Validation gates form submission: nothing invalid ever reaches the network,
//! and errors stay local to the form that produced them.

pub mod form;
pub mod validators;

pub use form::{InventoryForm, FormField};
