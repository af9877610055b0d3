//! Port for per-user, per-grid "last used" listing filters.
//!
//! Listing screens remember the filters an employee last applied so the
//! grid reopens where they left it. Implementations only store and return
//! raw [`FilterParams`]; validation happens when the spec is rebuilt.

use async_trait::async_trait;

use crate::domain::EntityId;
use crate::domain::grid::FilterParams;

use super::define_port_error;

define_port_error! {
    /// Errors raised by filter preference adapters.
    pub enum FilterPreferencesRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "filter preferences connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "filter preferences query failed: {message}",
    }
}

/// Storage for last-used grid filters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FilterPreferencesRepository: Send + Sync {
    /// Last filters `owner` applied to `grid_id`, if any were saved.
    async fn load(
        &self,
        owner: EntityId,
        grid_id: &str,
    ) -> Result<Option<FilterParams>, FilterPreferencesRepositoryError>;

    /// Remember `params` as `owner`'s filters for `grid_id`.
    async fn save(
        &self,
        owner: EntityId,
        grid_id: &str,
        params: &FilterParams,
    ) -> Result<(), FilterPreferencesRepositoryError>;
}

/// Fixture implementation that remembers nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureFilterPreferencesRepository;

#[async_trait]
impl FilterPreferencesRepository for FixtureFilterPreferencesRepository {
    async fn load(
        &self,
        _owner: EntityId,
        _grid_id: &str,
    ) -> Result<Option<FilterParams>, FilterPreferencesRepositoryError> {
        Ok(None)
    }

    async fn save(
        &self,
        _owner: EntityId,
        _grid_id: &str,
        _params: &FilterParams,
    ) -> Result<(), FilterPreferencesRepositoryError> {
        Ok(())
    }
}
