//! Generic table engine
//!
//! Owns rows, column definitions and the filter/sort/pagination state, and
//! derives the visible page through a fixed pipeline:
//!
//! 1. per-column filters (a row must pass every active one)
//! 2. global filter (a row must match the query in at least one filterable column)
//! 3. sort by the active column; fuzzy rank breaks ties when that column is
//!    also filtered
//! 4. slice the current page
//!
//! The pipeline works on row indices and never mutates the row collection.

use std::collections::HashSet;

use serde::Serialize;
use tracing::{debug, trace};

use super::classify::{Severity, classify};
use super::column::ColumnDefinition;
use super::fuzzy::{self, Rank};
use super::state::{FilterState, SortDirection, SortState};
use crate::core::error::TableError;
use crate::core::field::Row;
use crate::core::query::{PageSizeOptions, PaginationMeta, PaginationState};

/// A table instance; its column set is fixed at construction
#[derive(Debug, Clone)]
pub struct Table {
    rows: Vec<Row>,
    columns: Vec<ColumnDefinition>,
    filter: FilterState,
    sort: SortState,
    pagination: PaginationState,
    page_sizes: PageSizeOptions,
}

/// One page of the derived view
#[derive(Debug, Clone)]
pub struct Page<'a> {
    pub rows: Vec<&'a Row>,
    pub meta: PaginationMeta,
}

/// A visible row prepared for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedRow {
    /// Explicit row id, or the positional index when the row has none
    pub key: String,
    /// Position of the row in the underlying collection
    pub index: usize,
    pub cells: Vec<String>,
    pub severity: Option<Severity>,
}

impl Table {
    /// Build a table with the standard page sizes
    ///
    /// Fails when two columns share a key.
    pub fn new(rows: Vec<Row>, columns: Vec<ColumnDefinition>) -> Result<Self, TableError> {
        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.key.as_str()) {
                return Err(TableError::DuplicateColumn {
                    key: column.key.clone(),
                });
            }
        }

        let page_sizes = PageSizeOptions::standard();
        Ok(Self {
            rows,
            columns,
            filter: FilterState::default(),
            sort: SortState::default(),
            pagination: PaginationState::new(page_sizes.first()),
            page_sizes,
        })
    }

    /// Replace the accepted page sizes; the page size becomes the smallest option
    pub fn with_page_sizes(mut self, page_sizes: PageSizeOptions) -> Self {
        self.pagination = PaginationState::new(page_sizes.first());
        self.page_sizes = page_sizes;
        self
    }

    // === Accessors ===

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn columns(&self) -> &[ColumnDefinition] {
        &self.columns
    }

    pub fn filter_state(&self) -> &FilterState {
        &self.filter
    }

    pub fn sort_state(&self) -> &SortState {
        &self.sort
    }

    pub fn pagination(&self) -> PaginationState {
        self.pagination
    }

    pub fn page_sizes(&self) -> &PageSizeOptions {
        &self.page_sizes
    }

    fn column(&self, key: &str) -> Result<&ColumnDefinition, TableError> {
        self.columns
            .iter()
            .find(|c| c.key == key)
            .ok_or_else(|| TableError::UnknownColumn {
                key: key.to_string(),
            })
    }

    // === Filter ===

    /// Replace the global query and go back to the first page
    pub fn set_global_filter(&mut self, query: impl Into<String>) {
        self.filter.global_query = query.into();
        self.pagination.page_index = 0;
        debug!(query = %self.filter.global_query, "Global filter changed");
    }

    /// Replace one column's query (empty clears it) and go back to the first page
    pub fn set_column_filter(
        &mut self,
        key: &str,
        query: impl Into<String>,
    ) -> Result<(), TableError> {
        if !self.column(key)?.filterable {
            return Err(TableError::NotFilterable {
                key: key.to_string(),
            });
        }

        let query = query.into();
        debug!(column = key, query = %query, "Column filter changed");
        if query.is_empty() {
            self.filter.column_queries.shift_remove(key);
        } else {
            self.filter.column_queries.insert(key.to_string(), query);
        }
        self.pagination.page_index = 0;
        Ok(())
    }

    // === Sort ===

    /// Sort by `key` in `direction`; `None` restores the original order
    pub fn set_sort(
        &mut self,
        key: &str,
        direction: Option<SortDirection>,
    ) -> Result<(), TableError> {
        if !self.column(key)?.sortable {
            return Err(TableError::NotSortable {
                key: key.to_string(),
            });
        }

        self.sort = SortState {
            active: direction.map(|dir| (key.to_string(), dir)),
        };
        debug!(column = key, direction = ?direction, "Sort changed");
        Ok(())
    }

    pub fn clear_sort(&mut self) {
        self.sort = SortState::default();
    }

    /// Advance `key` through unsorted → ascending → descending → unsorted
    pub fn toggle_sort(&mut self, key: &str) -> Result<Option<SortDirection>, TableError> {
        let next = self.sort.toggled(key).direction_of(key);
        self.set_sort(key, next)?;
        Ok(next)
    }

    // === Pagination ===

    /// Jump to a page; out-of-range indices are clamped to the last page
    pub fn set_page(&mut self, index: usize) {
        self.pagination.page_index = index;
        if self.pagination.clamp(self.total_filtered_count()) {
            debug!(
                requested = index,
                page_index = self.pagination.page_index,
                "Page index clamped"
            );
        }
    }

    /// Change the page size and go back to the first page
    pub fn set_page_size(&mut self, size: usize) -> Result<(), TableError> {
        self.page_sizes.check(size)?;
        self.pagination = PaginationState::new(size);
        debug!(page_size = size, "Page size changed");
        Ok(())
    }

    pub fn can_previous_page(&self) -> bool {
        self.pagination.page_index > 0
    }

    pub fn can_next_page(&self) -> bool {
        self.pagination.page_index + 1 < self.page_count()
    }

    pub fn previous_page(&mut self) {
        self.set_page(self.pagination.page_index.saturating_sub(1));
    }

    pub fn next_page(&mut self) {
        self.set_page(self.pagination.page_index + 1);
    }

    pub fn first_page(&mut self) {
        self.set_page(0);
    }

    pub fn last_page(&mut self) {
        self.set_page(self.page_count() - 1);
    }

    // === Data ===

    /// Swap in a new collection, keeping filter/sort/pagination state
    pub fn replace_rows(&mut self, rows: Vec<Row>) {
        self.rows = rows;
        let total = self.total_filtered_count();
        if self.pagination.clamp(total) {
            debug!(
                page_index = self.pagination.page_index,
                total, "Page index clamped after row replacement"
            );
        }
    }

    // === Derived view ===

    /// Indices of rows surviving the filters, in display order
    fn derive(&self) -> Vec<usize> {
        let sort_column = self
            .sort
            .active
            .as_ref()
            .and_then(|(key, dir)| self.column(key).ok().map(|c| (c, *dir)));

        let column_filters: Vec<(&ColumnDefinition, &str)> = self
            .filter
            .active_columns()
            .filter_map(|(key, query)| self.column(key).ok().map(|c| (c, query)))
            .collect();

        let global = self.filter.global_query.as_str();
        let global_columns: Vec<&ColumnDefinition> =
            self.columns.iter().filter(|c| c.filterable).collect();

        let mut survivors: Vec<(usize, Option<Rank>)> = Vec::with_capacity(self.rows.len());
        'rows: for (idx, row) in self.rows.iter().enumerate() {
            let mut sort_rank = None;
            for (column, query) in &column_filters {
                let result = fuzzy::match_value(column.value(row), query);
                if !result.passed {
                    continue 'rows;
                }
                if sort_column.is_some_and(|(c, _)| c.key == column.key) {
                    sort_rank = Some(result.rank);
                }
            }

            if !global.is_empty()
                && !global_columns
                    .iter()
                    .any(|c| fuzzy::match_value(c.value(row), global).passed)
            {
                continue;
            }

            survivors.push((idx, sort_rank));
        }

        if let Some((column, direction)) = sort_column {
            // Stable: rows that compare equal keep their original order
            survivors.sort_by(|(a, rank_a), (b, rank_b)| {
                let (value_a, value_b) = (column.value(&self.rows[*a]), column.value(&self.rows[*b]));
                let by_value = value_a.natural_cmp(value_b);
                // Missing values stay last whatever the direction
                let by_value = match direction {
                    SortDirection::Descending if !value_a.is_null() && !value_b.is_null() => {
                        by_value.reverse()
                    }
                    _ => by_value,
                };
                by_value.then_with(|| rank_b.cmp(rank_a))
            });
        }

        trace!(
            total = self.rows.len(),
            filtered = survivors.len(),
            "Derived table view"
        );
        survivors.into_iter().map(|(idx, _)| idx).collect()
    }

    /// Number of rows passing the filters (the "of N rows" counter)
    pub fn total_filtered_count(&self) -> usize {
        self.derive().len()
    }

    /// Same as [`Table::total_filtered_count`]: rows before slicing into pages
    pub fn pre_pagination_count(&self) -> usize {
        self.total_filtered_count()
    }

    /// `ceil(total_filtered_count / page_size)`, at least 1
    pub fn page_count(&self) -> usize {
        self.pagination.page_count(self.total_filtered_count())
    }

    /// Current page after the full pipeline, with its metadata
    pub fn page(&self) -> Page<'_> {
        let order = self.derive();
        let mut pagination = self.pagination;
        pagination.clamp(order.len());

        Page {
            rows: order[pagination.range(order.len())]
                .iter()
                .map(|&idx| &self.rows[idx])
                .collect(),
            meta: PaginationMeta::new(&pagination, order.len()),
        }
    }

    /// Rows of the current page after filter → sort → paginate
    pub fn visible_rows(&self) -> Vec<&Row> {
        self.page().rows
    }

    /// Current page prepared for display: keys, rendered cells and severity
    pub fn render_page(&self) -> Vec<RenderedRow> {
        let order = self.derive();
        let mut pagination = self.pagination;
        pagination.clamp(order.len());

        order[pagination.range(order.len())]
            .iter()
            .map(|&idx| {
                let row = &self.rows[idx];
                RenderedRow {
                    key: row.id().unwrap_or_else(|| idx.to_string()),
                    index: idx,
                    cells: self.columns.iter().map(|c| c.render(row)).collect(),
                    severity: classify(row),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::field::CellValue;

    fn item(name: &str, quantity: i64, threshold: i64) -> Row {
        Row::new()
            .with("name", name)
            .with("quantity", quantity)
            .with("threshold", threshold)
    }

    fn columns() -> Vec<ColumnDefinition> {
        vec![
            ColumnDefinition::new("name", "Name"),
            ColumnDefinition::new("quantity", "Quantity"),
            ColumnDefinition::new("threshold", "Threshold"),
        ]
    }

    fn names(rows: &[&Row]) -> Vec<String> {
        rows.iter().map(|r| r.value("name").to_string()).collect()
    }

    fn pantry() -> Table {
        Table::new(
            vec![
                item("Milk", 2, 5),
                item("Bread", 1, 1),
                item("Eggs", 12, 6),
                item("Butter", 3, 2),
            ],
            columns(),
        )
        .unwrap()
    }

    #[test]
    fn test_duplicate_column_key_fails() {
        let mut cols = columns();
        cols.push(ColumnDefinition::new("name", "Again"));
        let err = Table::new(vec![], cols).unwrap_err();
        assert_eq!(
            err,
            TableError::DuplicateColumn {
                key: "name".to_string()
            }
        );
    }

    #[test]
    fn test_unsorted_keeps_original_order() {
        let table = pantry();
        assert_eq!(
            names(&table.visible_rows()),
            vec!["Milk", "Bread", "Eggs", "Butter"]
        );
    }

    #[test]
    fn test_sort_numeric_column() {
        let mut table = pantry();
        table
            .set_sort("quantity", Some(SortDirection::Ascending))
            .unwrap();
        assert_eq!(
            names(&table.visible_rows()),
            vec!["Bread", "Milk", "Butter", "Eggs"]
        );

        table
            .set_sort("quantity", Some(SortDirection::Descending))
            .unwrap();
        assert_eq!(
            names(&table.visible_rows()),
            vec!["Eggs", "Butter", "Milk", "Bread"]
        );

        table.set_sort("quantity", None).unwrap();
        assert_eq!(
            names(&table.visible_rows()),
            vec!["Milk", "Bread", "Eggs", "Butter"]
        );
    }

    #[test]
    fn test_toggle_sort_cycles() {
        let mut table = pantry();
        assert_eq!(table.toggle_sort("name"), Ok(Some(SortDirection::Ascending)));
        assert_eq!(
            names(&table.visible_rows()),
            vec!["Bread", "Butter", "Eggs", "Milk"]
        );
        assert_eq!(table.toggle_sort("name"), Ok(Some(SortDirection::Descending)));
        assert_eq!(table.toggle_sort("name"), Ok(None));
        assert_eq!(table.sort_state(), &SortState::default());
    }

    #[test]
    fn test_sort_rejects_unknown_and_unsortable_columns() {
        let mut cols = columns();
        cols.push(ColumnDefinition::display("actions", "Actions", |_| String::new()));
        let mut table = Table::new(vec![], cols).unwrap();

        assert!(matches!(
            table.set_sort("price", Some(SortDirection::Ascending)),
            Err(TableError::UnknownColumn { .. })
        ));
        assert!(matches!(
            table.toggle_sort("actions"),
            Err(TableError::NotSortable { .. })
        ));
        assert!(matches!(
            table.set_column_filter("actions", "x"),
            Err(TableError::NotFilterable { .. })
        ));
    }

    #[test]
    fn test_global_filter_matches_any_column() {
        let mut table = pantry();
        table.set_global_filter("12");
        assert_eq!(names(&table.visible_rows()), vec!["Eggs"]);

        table.set_global_filter("bu");
        assert_eq!(names(&table.visible_rows()), vec!["Butter"]);

        table.set_global_filter("");
        assert_eq!(table.total_filtered_count(), 4);
    }

    #[test]
    fn test_filter_does_not_mutate_rows() {
        let mut table = pantry();
        table.set_global_filter("milk");
        assert_eq!(table.total_filtered_count(), 1);
        assert_eq!(table.rows().len(), 4);
    }

    #[test]
    fn test_column_filter_and_global_filter_combine() {
        let mut table = pantry();
        table.set_column_filter("name", "b").unwrap();
        assert_eq!(names(&table.visible_rows()), vec!["Bread", "Butter"]);

        table.set_global_filter("3");
        assert_eq!(names(&table.visible_rows()), vec!["Butter"]);

        table.set_column_filter("name", "").unwrap();
        assert!(table.filter_state().column_query("name").is_none());
        assert_eq!(names(&table.visible_rows()), vec!["Butter"]);
    }

    #[test]
    fn test_rank_breaks_ties_on_filtered_sort_column() {
        let rows = vec![
            Row::new().with("name", "milk"),
            Row::new().with("name", "Milk"),
        ];
        let mut table =
            Table::new(rows, vec![ColumnDefinition::new("name", "Name")]).unwrap();
        table.set_column_filter("name", "Milk").unwrap();
        table.set_sort("name", Some(SortDirection::Ascending)).unwrap();

        // Equal ignoring case; the case-sensitive match ranks first
        assert_eq!(names(&table.visible_rows()), vec!["Milk", "milk"]);

        // Without the column filter the original order is kept
        table.set_column_filter("name", "").unwrap();
        assert_eq!(names(&table.visible_rows()), vec!["milk", "Milk"]);
    }

    #[test]
    fn test_pagination_over_120_rows() {
        let rows = (0..120)
            .map(|i| {
                let name = if i < 30 { format!("apple {i}") } else { format!("pear {i}") };
                item(&name, i, 10)
            })
            .collect();
        let mut table = Table::new(rows, columns()).unwrap();
        assert_eq!(table.page_count(), 5);

        table.set_page(3);
        assert_eq!(table.pagination().page_index, 3);

        table.set_global_filter("apple");
        assert_eq!(table.total_filtered_count(), 30);
        assert_eq!(table.page_count(), 2);
        assert_eq!(table.pagination().page_index, 0);
        assert_eq!(table.visible_rows().len(), 25);

        table.next_page();
        assert_eq!(table.visible_rows().len(), 5);
        assert!(!table.can_next_page());
        assert!(table.can_previous_page());
    }

    #[test]
    fn test_set_page_clamps() {
        let mut table = pantry();
        table.set_page(10);
        assert_eq!(table.pagination().page_index, 0);
        assert_eq!(table.visible_rows().len(), 4);
    }

    #[test]
    fn test_set_page_size() {
        let rows = (0..60).map(|i| item("x", i, 0)).collect();
        let mut table = Table::new(rows, columns()).unwrap();
        table.next_page();
        assert_eq!(table.pagination().page_index, 1);

        table.set_page_size(50).unwrap();
        assert_eq!(table.pagination().page_index, 0);
        assert_eq!(table.page_count(), 2);
        let once = table.visible_rows().len();
        table.set_page_size(50).unwrap();
        assert_eq!(table.visible_rows().len(), once);

        assert!(matches!(
            table.set_page_size(33),
            Err(TableError::InvalidPageSize { .. })
        ));
    }

    #[test]
    fn test_compact_page_sizes() {
        let table = Table::new(vec![], columns())
            .unwrap()
            .with_page_sizes(PageSizeOptions::compact());
        assert_eq!(table.pagination().page_size, 10);
        assert_eq!(table.page_count(), 1);
    }

    #[test]
    fn test_replace_rows_clamps_page_index() {
        let rows = (0..60).map(|i| item("x", i, 0)).collect();
        let mut table = Table::new(rows, columns()).unwrap();
        table.last_page();
        assert_eq!(table.pagination().page_index, 2);

        table.replace_rows((0..10).map(|i| item("x", i, 0)).collect());
        assert_eq!(table.pagination().page_index, 0);
        assert_eq!(table.visible_rows().len(), 10);
    }

    #[test]
    fn test_render_page_keys_cells_and_severity() {
        let rows = vec![
            item("Milk", 2, 5).with("_id", "a1"),
            item("Eggs", 6, 6),
        ];
        let mut cols = columns();
        cols.push(ColumnDefinition::display("actions", "Actions", |r| {
            format!("edit {}", r.value("name"))
        }));
        let table = Table::new(rows, cols).unwrap();

        let rendered = table.render_page();
        assert_eq!(rendered[0].key, "a1");
        assert_eq!(rendered[1].key, "1");
        assert_eq!(rendered[0].cells, vec!["Milk", "2", "5", "edit Milk"]);
        assert_eq!(rendered[0].severity, Some(Severity::Violation));
        assert_eq!(rendered[1].severity, Some(Severity::Warning));
    }

    #[test]
    fn test_missing_values_sort_last_ascending() {
        let rows = vec![
            Row::new().with("name", "b"),
            Row::new().with("name", CellValue::Null),
            Row::new().with("name", "a"),
        ];
        let mut table =
            Table::new(rows, vec![ColumnDefinition::new("name", "Name")]).unwrap();
        table.set_sort("name", Some(SortDirection::Ascending)).unwrap();
        assert_eq!(names(&table.visible_rows()), vec!["a", "b", ""]);
    }

    #[test]
    fn test_missing_values_sort_last_descending() {
        let rows = vec![
            Row::new().with("name", "a"),
            Row::new().with("name", CellValue::Null),
            Row::new().with("name", "b"),
        ];
        let mut table =
            Table::new(rows, vec![ColumnDefinition::new("name", "Name")]).unwrap();
        table.set_sort("name", Some(SortDirection::Descending)).unwrap();
        assert_eq!(names(&table.visible_rows()), vec!["b", "a", ""]);
    }
}
