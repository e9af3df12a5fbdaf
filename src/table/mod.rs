//! Generic data table: fuzzy filtering, sorting, pagination and row severity

pub mod classify;
pub mod column;
pub mod engine;
pub mod fuzzy;
pub mod state;

pub use classify::{Severity, StockLevel, StockSummary, classify};
pub use column::{CellRenderer, ColumnDefinition, inventory_columns};
pub use engine::{Page, RenderedRow, Table};
pub use fuzzy::{MatchResult, Rank, RankTier, match_str, match_value};
pub use state::{FilterState, SortDirection, SortState};
