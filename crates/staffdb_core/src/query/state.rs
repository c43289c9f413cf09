//! Per-session list state.
//!
//! # Invariants
//! - Filter and sort are independent: changing one never resets the other.
//! - Toggling the current sort field flips direction; a new field starts `Asc`.

use super::filter::EmployeeFilter;
use super::sort::{order_by_clause, SortDirection, SortField, SortSpec};

/// Filter + sort selection kept by one interactive session across reloads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListState {
    filter: EmployeeFilter,
    sort: Option<SortSpec>,
}

impl ListState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filter(mut self, filter: EmployeeFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_sort(mut self, sort: SortSpec) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn filter(&self) -> &EmployeeFilter {
        &self.filter
    }

    pub fn sort(&self) -> Option<SortSpec> {
        self.sort
    }

    pub fn set_filter(&mut self, filter: EmployeeFilter) {
        self.filter = filter;
    }

    pub fn clear_filter(&mut self) {
        self.filter = EmployeeFilter::All;
    }

    /// Column-header style sort: same field flips, new field resets to `Asc`.
    pub fn toggle_sort(&mut self, field: SortField) -> SortSpec {
        let next = match self.sort {
            Some(current) if current.field == field => SortSpec {
                field,
                direction: current.direction.toggled(),
            },
            _ => SortSpec::asc(field),
        };
        self.sort = Some(next);
        next
    }

    pub fn set_sort(&mut self, field: SortField, direction: SortDirection) {
        self.sort = Some(SortSpec { field, direction });
    }

    pub fn clear_sort(&mut self) {
        self.sort = None;
    }

    pub fn order_by(&self) -> String {
        order_by_clause(self.sort)
    }
}
