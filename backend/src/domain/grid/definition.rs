//! Per-resource grid definitions and the normalised query they produce.

use serde::Serialize;
use tracing::debug;

use super::{FilterSpec, SortDirection, SortOrder};

/// One column of a listing grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDefinition {
    name: String,
    sortable: bool,
    filterable: bool,
}

impl ColumnDefinition {
    /// A display-only column.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sortable: false,
            filterable: false,
        }
    }

    /// Allow sorting by this column.
    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    /// Allow filtering on this column.
    pub fn filterable(mut self) -> Self {
        self.filterable = true;
        self
    }

    /// Column name.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }
}

/// Column filter handed to the repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnFilter {
    /// Filterable column name.
    pub column: String,
    /// Non-empty, trimmed filter value.
    pub value: String,
}

/// Normalised listing query consumed by
/// [`ResourceRepository`](crate::domain::ports::ResourceRepository).
///
/// Filters combine with logical AND. `order` always ends with the primary
/// key so row order is deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridQuery {
    /// Trimmed free-text search; `None` when blank.
    pub search: Option<String>,
    /// Column constraints, all of which must match.
    pub filters: Vec<ColumnFilter>,
    /// Effective ordering, most significant first.
    pub order: Vec<SortOrder>,
    /// Rows to skip.
    pub offset: u64,
    /// Maximum rows to return.
    pub limit: u32,
}

/// Columns, sortability and default ordering of one resource grid.
///
/// # Examples
/// ```
/// use backoffice::domain::grid::{ColumnDefinition, FilterSpec, GridDefinition, SortDirection};
///
/// let grid = GridDefinition::new("store", "id_store")
///     .column(ColumnDefinition::new("name").sortable().filterable());
/// let spec = FilterSpec::first_page(10)
///     .expect("valid page size")
///     .sorted_by("unknown", SortDirection::Desc);
///
/// let query = grid.query_for(&spec);
/// assert_eq!(query.order.len(), 1);
/// assert_eq!(query.order[0].column, "id_store");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridDefinition {
    id: String,
    primary_key: String,
    columns: Vec<ColumnDefinition>,
}

impl GridDefinition {
    /// A grid with only its primary-key column, which is always sortable
    /// and filterable.
    pub fn new(id: impl Into<String>, primary_key: impl Into<String>) -> Self {
        let primary_key = primary_key.into();
        Self {
            id: id.into(),
            columns: vec![
                ColumnDefinition::new(primary_key.clone())
                    .sortable()
                    .filterable(),
            ],
            primary_key,
        }
    }

    /// Add a column, replacing any column with the same name.
    pub fn column(mut self, column: ColumnDefinition) -> Self {
        self.columns.retain(|existing| existing.name != column.name);
        self.columns.push(column);
        self
    }

    /// Grid identifier, used to key persisted filters.
    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    /// Primary-key column.
    pub fn primary_key(&self) -> &str {
        self.primary_key.as_str()
    }

    /// Declared columns.
    pub fn columns(&self) -> &[ColumnDefinition] {
        self.columns.as_slice()
    }

    /// Whether `column` may be sorted by.
    pub fn is_sortable(&self, column: &str) -> bool {
        self.find(column).is_some_and(|def| def.sortable)
    }

    /// Whether `column` may be filtered on.
    pub fn is_filterable(&self, column: &str) -> bool {
        self.find(column).is_some_and(|def| def.filterable)
    }

    /// Normalise `spec` into the query handed to the repository.
    ///
    /// Unknown sort columns fall back to primary-key order and unknown or
    /// blank filters are dropped; neither is an error.
    pub fn query_for(&self, spec: &FilterSpec) -> GridQuery {
        let search = spec
            .search()
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(str::to_owned);

        let filters = spec
            .filters()
            .iter()
            .filter_map(|(column, value)| self.column_filter(column, value))
            .collect();

        GridQuery {
            search,
            filters,
            order: self.order_for(spec.sort()),
            offset: spec.page_request().offset(),
            limit: spec.page_size(),
        }
    }

    fn find(&self, column: &str) -> Option<&ColumnDefinition> {
        self.columns.iter().find(|def| def.name == column)
    }

    fn column_filter(&self, column: &str, value: &str) -> Option<ColumnFilter> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return None;
        }
        if !self.is_filterable(column) {
            debug!(grid = %self.id, column, "ignoring filter on non-filterable column");
            return None;
        }
        Some(ColumnFilter {
            column: column.to_owned(),
            value: trimmed.to_owned(),
        })
    }

    fn order_for(&self, requested: Option<&SortOrder>) -> Vec<SortOrder> {
        let tie_break = SortOrder::new(self.primary_key.clone(), SortDirection::Asc);
        match requested {
            Some(sort) if sort.column == self.primary_key => vec![sort.clone()],
            Some(sort) if self.is_sortable(&sort.column) => vec![sort.clone(), tie_break],
            Some(sort) => {
                debug!(
                    grid = %self.id,
                    column = %sort.column,
                    "unknown sort column; using default order"
                );
                vec![tie_break]
            }
            None => vec![tie_break],
        }
    }
}
