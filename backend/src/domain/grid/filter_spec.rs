//! Listing filters, sort order and pagination for one grid request.

use std::collections::BTreeMap;
use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

use pagination::PageRequest;
use serde::{Deserialize, Serialize};

use crate::domain::ValidationFailure;

/// Sort direction of a grid column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Smallest first.
    #[default]
    Asc,
    /// Largest first.
    Desc,
}

impl SortDirection {
    /// Lowercase tag used in requests.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortDirection {
    type Err = ValidationFailure;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(ValidationFailure::InvalidSortDirection {
                value: raw.to_owned(),
            }),
        }
    }
}

/// A column and the direction to sort it in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortOrder {
    /// Column name as declared in the grid definition.
    pub column: String,
    /// Direction to sort in.
    pub direction: SortDirection,
}

impl SortOrder {
    /// Sort `column` in `direction`.
    pub fn new(column: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            column: column.into(),
            direction,
        }
    }

    /// Sort `column` ascending.
    pub fn ascending(column: impl Into<String>) -> Self {
        Self::new(column, SortDirection::Asc)
    }
}

/// Page size bounds applied while building a [`FilterSpec`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridDefaults {
    /// Used when neither the request nor persisted filters carry a size.
    pub default_page_size: NonZeroU32,
    /// Largest accepted page size.
    pub max_page_size: NonZeroU32,
}

/// Rows per page when nothing else names a size.
pub const DEFAULT_PAGE_SIZE: u32 = 50;
/// Largest page size accepted unless configured otherwise.
pub const MAX_PAGE_SIZE: u32 = 1000;

const fn non_zero(raw: u32) -> NonZeroU32 {
    match NonZeroU32::new(raw) {
        Some(value) => value,
        None => NonZeroU32::MIN,
    }
}

impl GridDefaults {
    /// Bounds of 50 rows per page, at most 1000.
    pub const STANDARD: Self = Self {
        default_page_size: non_zero(DEFAULT_PAGE_SIZE),
        max_page_size: non_zero(MAX_PAGE_SIZE),
    };
}

impl Default for GridDefaults {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Validated, immutable listing request.
///
/// ## Invariants
/// - `page >= 1` and `page_size >= 1` (carried by [`PageRequest`]).
/// - Filter values are stored as submitted; an empty value means "no
///   constraint" and is dropped when the query is built.
///
/// # Examples
/// ```
/// use backoffice::domain::grid::{FilterSpec, SortDirection};
///
/// let spec = FilterSpec::first_page(20)
///     .expect("valid page size")
///     .with_filter("city", "Miami")
///     .sorted_by("name", SortDirection::Desc);
/// assert_eq!(spec.filter("city"), Some("Miami"));
/// assert_eq!(spec.page(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    search: Option<String>,
    filters: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sort: Option<SortOrder>,
    #[serde(flatten)]
    page: PageRequest,
}

impl FilterSpec {
    /// No filters, no explicit sort, the given page.
    pub fn new(page: PageRequest) -> Self {
        Self {
            search: None,
            filters: BTreeMap::new(),
            sort: None,
            page,
        }
    }

    /// First page with `page_size` rows.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationFailure::InvalidPageSize`] when `page_size` is 0.
    pub fn first_page(page_size: u32) -> Result<Self, ValidationFailure> {
        let size = NonZeroU32::new(page_size).ok_or(ValidationFailure::InvalidPageSize {
            page_size,
            max: u32::MAX,
        })?;
        Ok(Self::new(PageRequest::first(size)))
    }

    /// Constrain `column` to `value`.
    pub fn with_filter(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.insert(column.into(), value.into());
        self
    }

    /// Free-text search across the grid's searchable columns.
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Sort by `column` in `direction`.
    pub fn sorted_by(mut self, column: impl Into<String>, direction: SortDirection) -> Self {
        self.sort = Some(SortOrder::new(column, direction));
        self
    }

    /// Move to another page with the same filters.
    pub fn at_page(mut self, page: PageRequest) -> Self {
        self.page = page;
        self
    }

    /// Free-text search, as submitted.
    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    /// Column filters, as submitted.
    pub fn filters(&self) -> &BTreeMap<String, String> {
        &self.filters
    }

    /// Value submitted for `column`.
    pub fn filter(&self, column: &str) -> Option<&str> {
        self.filters.get(column).map(String::as_str)
    }

    /// Requested sort, if any.
    pub fn sort(&self) -> Option<&SortOrder> {
        self.sort.as_ref()
    }

    /// Requested sort column, if any.
    pub fn sort_column(&self) -> Option<&str> {
        self.sort.as_ref().map(|sort| sort.column.as_str())
    }

    /// Requested sort direction; ascending when no sort was requested.
    pub fn sort_direction(&self) -> SortDirection {
        self.sort
            .as_ref()
            .map_or(SortDirection::Asc, |sort| sort.direction)
    }

    /// Page and page size.
    pub fn page_request(&self) -> PageRequest {
        self.page
    }

    /// 1-based page number.
    pub fn page(&self) -> u32 {
        self.page.page()
    }

    /// Rows per page.
    pub fn page_size(&self) -> u32 {
        self.page.page_size()
    }

    /// The raw parameter form, used to persist last-used filters.
    pub fn to_params(&self) -> FilterParams {
        FilterParams {
            filters: self.filters.clone(),
            search: self.search.clone(),
            order_by: self.sort.as_ref().map(|sort| sort.column.clone()),
            sort_order: self
                .sort
                .as_ref()
                .map(|sort| sort.direction.as_str().to_owned()),
            page: Some(self.page()),
            limit: Some(self.page_size()),
        }
    }
}

/// Raw listing parameters as submitted by a request or persisted per user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterParams {
    /// Column filters keyed by column name.
    pub filters: BTreeMap<String, String>,
    /// Free-text search.
    pub search: Option<String>,
    /// Column to sort by.
    pub order_by: Option<String>,
    /// `asc` or `desc`.
    pub sort_order: Option<String>,
    /// 1-based page number.
    pub page: Option<u32>,
    /// Rows per page.
    pub limit: Option<u32>,
}

impl FilterParams {
    /// Whether no parameter was submitted at all.
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
            && self.search.is_none()
            && self.order_by.is_none()
            && self.sort_order.is_none()
            && self.page.is_none()
            && self.limit.is_none()
    }

    /// Validate into a [`FilterSpec`], filling gaps from `defaults`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationFailure::InvalidPage`] for page 0,
    /// [`ValidationFailure::InvalidPageSize`] for a size of 0 or above
    /// `defaults.max_page_size`, and
    /// [`ValidationFailure::InvalidSortDirection`] for an unknown direction.
    pub fn into_spec(self, defaults: &GridDefaults) -> Result<FilterSpec, ValidationFailure> {
        let page_number = self.page.unwrap_or(1);
        let page = NonZeroU32::new(page_number)
            .ok_or(ValidationFailure::InvalidPage { page: page_number })?;

        let size_number = self.limit.unwrap_or(defaults.default_page_size.get());
        let page_size = NonZeroU32::new(size_number)
            .filter(|size| *size <= defaults.max_page_size)
            .ok_or(ValidationFailure::InvalidPageSize {
                page_size: size_number,
                max: defaults.max_page_size.get(),
            })?;

        let direction = self
            .sort_order
            .as_deref()
            .map(str::parse::<SortDirection>)
            .transpose()?
            .unwrap_or_default();
        let sort = self
            .order_by
            .filter(|column| !column.trim().is_empty())
            .map(|column| SortOrder::new(column.trim(), direction));

        Ok(FilterSpec {
            search: self.search,
            filters: self.filters,
            sort,
            page: PageRequest::new(page, page_size),
        })
    }
}
