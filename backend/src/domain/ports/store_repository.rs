//! Port for single-store mutations performed by command handlers.
//!
//! Listing reads go through
//! [`ResourceRepository`](super::ResourceRepository); this port only
//! covers what the store command handlers need.

use async_trait::async_trait;

use crate::domain::EntityId;
use crate::domain::IdentitySet;
use crate::domain::store::Store;

use super::define_port_error;

define_port_error! {
    /// Errors raised by store repository adapters.
    pub enum StoreRepositoryError {
        /// No store exists with the given identifier.
        NotFound { id: EntityId } =>
            "store {id} not found",
        /// The storage refused the change, e.g. because of dependent rows.
        Rejected { id: EntityId, reason: String } =>
            "store {id} rejected the change: {reason}",
        /// Repository connection could not be established.
        Connection { message: String } =>
            "store repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "store repository query failed: {message}",
    }
}

/// Store persistence used by the store command handlers.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StoreRepository: Send + Sync {
    /// Fetch one store.
    async fn find_by_id(&self, id: EntityId) -> Result<Option<Store>, StoreRepositoryError>;

    /// Delete one store.
    ///
    /// Returns [`StoreRepositoryError::NotFound`] when the store does not
    /// exist and [`StoreRepositoryError::Rejected`] when it cannot be
    /// removed.
    async fn delete(&self, id: EntityId) -> Result<(), StoreRepositoryError>;

    /// Set one store's active flag.
    async fn set_status(&self, id: EntityId, active: bool) -> Result<(), StoreRepositoryError>;

    /// Set the active flag of every store in `ids` as a single unit: either
    /// all stores change or none do.
    async fn set_status_many(
        &self,
        ids: &IdentitySet,
        active: bool,
    ) -> Result<(), StoreRepositoryError>;
}
