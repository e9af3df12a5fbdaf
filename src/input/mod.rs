//! Timer-driven inputs: debounced text and periodic polling

pub mod debounce;
pub mod interval;

pub use debounce::{DEFAULT_DEBOUNCE, DebouncedInput};
pub use interval::Poller;
