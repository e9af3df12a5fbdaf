//! Filter and sort state

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Sort direction of the active column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    /// Parse "asc"/"desc" (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Some(SortDirection::Ascending),
            "desc" | "descending" => Some(SortDirection::Descending),
            _ => None,
        }
    }
}

/// Single-column sort state; `None` keeps the original row order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub active: Option<(String, SortDirection)>,
}

impl SortState {
    pub fn direction_of(&self, key: &str) -> Option<SortDirection> {
        match &self.active {
            Some((k, dir)) if k == key => Some(*dir),
            _ => None,
        }
    }

    /// Next state of the unsorted → ascending → descending → unsorted cycle
    pub fn toggled(&self, key: &str) -> SortState {
        let next = match self.direction_of(key) {
            None => Some(SortDirection::Ascending),
            Some(SortDirection::Ascending) => Some(SortDirection::Descending),
            Some(SortDirection::Descending) => None,
        };
        SortState {
            active: next.map(|dir| (key.to_string(), dir)),
        }
    }
}

/// Global and per-column filter queries; empty strings mean "no filter"
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub global_query: String,
    pub column_queries: IndexMap<String, String>,
}

impl FilterState {
    /// Per-column filters with a non-empty query
    pub fn active_columns(&self) -> impl Iterator<Item = (&str, &str)> {
        self.column_queries
            .iter()
            .filter(|(_, q)| !q.is_empty())
            .map(|(k, q)| (k.as_str(), q.as_str()))
    }

    pub fn column_query(&self, key: &str) -> Option<&str> {
        self.column_queries
            .get(key)
            .map(String::as_str)
            .filter(|q| !q.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.global_query.is_empty() && self.active_columns().next().is_none()
    }
}
