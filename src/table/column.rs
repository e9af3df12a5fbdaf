//! Column definitions

use std::fmt;
use std::sync::Arc;

use crate::core::field::{CellValue, Row};

/// Custom cell renderer: receives the whole row, returns the cell text
pub type CellRenderer = Arc<dyn Fn(&Row) -> String + Send + Sync>;

/// Static description of how to read and render one field of a row
#[derive(Clone)]
pub struct ColumnDefinition {
    /// Accessor into the row, also the column identity
    pub key: String,
    pub header: String,
    pub renderer: Option<CellRenderer>,
    pub sortable: bool,
    pub filterable: bool,
}

impl ColumnDefinition {
    /// A data column: sortable and filterable
    pub fn new(key: impl Into<String>, header: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            header: header.into(),
            renderer: None,
            sortable: true,
            filterable: true,
        }
    }

    /// A display-only column (e.g. row actions) rendered entirely by `renderer`
    pub fn display(
        key: impl Into<String>,
        header: impl Into<String>,
        renderer: impl Fn(&Row) -> String + Send + Sync + 'static,
    ) -> Self {
        Self {
            key: key.into(),
            header: header.into(),
            renderer: Some(Arc::new(renderer)),
            sortable: false,
            filterable: false,
        }
    }

    pub fn with_renderer(
        mut self,
        renderer: impl Fn(&Row) -> String + Send + Sync + 'static,
    ) -> Self {
        self.renderer = Some(Arc::new(renderer));
        self
    }

    pub fn sortable(mut self, sortable: bool) -> Self {
        self.sortable = sortable;
        self
    }

    pub fn filterable(mut self, filterable: bool) -> Self {
        self.filterable = filterable;
        self
    }

    /// Raw value of this column in `row`
    pub fn value<'r>(&self, row: &'r Row) -> &'r CellValue {
        row.value(&self.key)
    }

    /// Text shown in the cell
    pub fn render(&self, row: &Row) -> String {
        match &self.renderer {
            Some(render) => render(row),
            None => self.value(row).to_string(),
        }
    }
}

impl fmt::Debug for ColumnDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDefinition")
            .field("key", &self.key)
            .field("header", &self.header)
            .field("renderer", &self.renderer.as_ref().map(|_| "<fn>"))
            .field("sortable", &self.sortable)
            .field("filterable", &self.filterable)
            .finish()
    }
}

/// Columns of the inventory table: name, quantity, threshold and row actions
pub fn inventory_columns() -> Vec<ColumnDefinition> {
    vec![
        ColumnDefinition::new("name", "Name"),
        ColumnDefinition::new("quantity", "Quantity"),
        ColumnDefinition::new("threshold", "Threshold"),
        ColumnDefinition::display("actions", "Actions", |_| "Edit | Delete".to_string()),
    ]
}
