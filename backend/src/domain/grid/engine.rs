//! Grid query engine: filter spec in, bounded page of rows out.

use std::sync::Arc;

use pagination::PageWindow;
use thiserror::Error;
use tracing::warn;

use crate::domain::ValidationFailure;
use crate::domain::ports::{ResourceRepository, ResourceRepositoryError};

use super::{FilterSpec, GridDefinition};

/// One page of a listing plus the filters that produced it.
///
/// ## Invariants
/// - `rows().len() <= filters().page_size()`.
/// - `total_count()` honours filters and ignores pagination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridPage<Row> {
    window: PageWindow<Row>,
    filters: FilterSpec,
}

impl<Row> GridPage<Row> {
    /// Rows on this page in display order.
    pub fn rows(&self) -> &[Row] {
        self.window.items()
    }

    /// Consume the page and return its rows.
    pub fn into_rows(self) -> Vec<Row> {
        self.window.into_items()
    }

    /// Matching rows across all pages.
    pub fn total_count(&self) -> u64 {
        self.window.total()
    }

    /// The filters this page was built from.
    pub fn filters(&self) -> &FilterSpec {
        &self.filters
    }

    /// Pages needed to show every matching row.
    pub fn page_count(&self) -> u64 {
        self.window.page_count()
    }

    /// Whether the requested page lies past the last one. The engine never
    /// clamps; callers decide what to show.
    pub fn is_beyond_last_page(&self) -> bool {
        self.window.is_beyond_last_page()
    }
}

/// Why a listing could not be shown.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ListingError {
    /// The submitted filters were invalid.
    #[error(transparent)]
    Invalid(#[from] ValidationFailure),
    /// The repository failed.
    #[error(transparent)]
    Repository(#[from] ResourceRepositoryError),
}

/// Stateless listing engine for one resource grid.
///
/// Holds only immutable configuration and a shared repository handle, so a
/// single engine may serve concurrent requests.
pub struct GridQueryEngine<R> {
    definition: GridDefinition,
    repository: Arc<R>,
}

impl<R> GridQueryEngine<R> {
    /// Build an engine for `definition` reading through `repository`.
    pub fn new(definition: GridDefinition, repository: Arc<R>) -> Self {
        Self {
            definition,
            repository,
        }
    }

    /// The grid this engine lists.
    pub fn definition(&self) -> &GridDefinition {
        &self.definition
    }
}

impl<R> GridQueryEngine<R>
where
    R: ResourceRepository,
{
    /// Count and fetch the page described by `filters`.
    ///
    /// A page past the end returns no rows and the true match count; the
    /// row fetch is skipped in that case.
    ///
    /// # Errors
    ///
    /// Propagates repository failures unchanged.
    pub async fn build_page(
        &self,
        filters: &FilterSpec,
    ) -> Result<GridPage<R::Row>, ResourceRepositoryError> {
        let query = self.definition.query_for(filters);
        let request = filters.page_request();
        let total = self.repository.count_matching(&query).await?;

        let window = if request.is_beyond(total) {
            PageWindow::empty(total, request)
        } else {
            let rows = self.repository.fetch_page(&query).await?;
            if rows.len() > usize::try_from(query.limit).unwrap_or(usize::MAX) {
                warn!(
                    grid = %self.definition.id(),
                    returned = rows.len(),
                    limit = query.limit,
                    "repository returned more rows than requested; truncating"
                );
            }
            PageWindow::new(rows, total, request)
        };

        Ok(GridPage {
            window,
            filters: filters.clone(),
        })
    }
}
