//! Adapter-agnostic facade over the store admin screen's actions.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::grid::{
    FilterParams, FilterSpecResolver, GridDefaults, GridPage, GridQueryEngine, ListingError,
};
use crate::domain::ports::{FilterPreferencesRepository, ResourceRepository};
use crate::domain::{
    BulkAction, BulkOperationCoordinator, BulkPayload, Command, CommandBus, ConfigurationError,
    DispatchError, DomainFailure, EntityId, IdentitySet, MessageTable, Notice, NoticeLevel,
};

use super::{
    BulkUpdateStoreStatus, DELETED_NOTICE, DeleteStore, SELECTION_DELETED_NOTICE,
    SELECTION_STATUS_UPDATED_NOTICE, STATUS_UPDATED_NOTICE, STORE_BULK_FIELD, Store,
    ToggleStoreStatus, store_grid,
};

/// The store screen: listing plus single and bulk actions, each producing
/// one [`Notice`].
///
/// Only a mis-wired bus is reported as an error; every other failure
/// becomes an error notice.
pub struct StoreAdmin<R, P> {
    bus: Arc<CommandBus>,
    coordinator: BulkOperationCoordinator,
    grid: GridQueryEngine<R>,
    filters: FilterSpecResolver<P>,
    messages: MessageTable,
}

impl<R, P> StoreAdmin<R, P>
where
    R: ResourceRepository<Row = Store>,
    P: FilterPreferencesRepository,
{
    /// Wire the screen.
    pub fn new(
        bus: Arc<CommandBus>,
        rows: Arc<R>,
        preferences: Arc<P>,
        defaults: GridDefaults,
        messages: MessageTable,
    ) -> Self {
        Self {
            coordinator: BulkOperationCoordinator::new(Arc::clone(&bus)),
            bus,
            grid: GridQueryEngine::new(store_grid(), rows),
            filters: FilterSpecResolver::new(preferences, defaults),
            messages,
        }
    }

    /// Messages used to render failures.
    pub fn messages(&self) -> &MessageTable {
        &self.messages
    }

    /// The store listing as `employee` sees it.
    ///
    /// # Errors
    ///
    /// Returns [`ListingError::Invalid`] for invalid request parameters and
    /// [`ListingError::Repository`] when the rows cannot be read.
    pub async fn index(
        &self,
        employee: EntityId,
        params: FilterParams,
    ) -> Result<GridPage<Store>, ListingError> {
        let spec = self
            .filters
            .resolve(employee, self.grid.definition().id(), params)
            .await?;
        Ok(self.grid.build_page(&spec).await?)
    }

    /// Flip one store's status.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] if the bus is mis-wired.
    pub async fn toggle_status(&self, store_id: EntityId) -> Result<Notice, ConfigurationError> {
        self.single(ToggleStoreStatus { store_id }, STATUS_UPDATED_NOTICE)
            .await
    }

    /// Delete one store.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] if the bus is mis-wired.
    pub async fn delete(&self, store_id: EntityId) -> Result<Notice, ConfigurationError> {
        self.single(DeleteStore { store_id }, DELETED_NOTICE).await
    }

    /// Delete every selected store, carrying on past individual failures.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] if the bus is mis-wired.
    pub async fn bulk_delete(&self, payload: &BulkPayload) -> Result<Notice, ConfigurationError> {
        let ids = match self.selection(payload) {
            Ok(ids) => ids,
            Err(notice) => return Ok(notice),
        };
        let outcome = self
            .coordinator
            .run_bulk(&BulkAction::delete(), &ids, |store_id| DeleteStore {
                store_id,
            })
            .await?;
        Ok(outcome.notice(&self.messages, SELECTION_DELETED_NOTICE))
    }

    /// Activate every selected store in one step.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] if the bus is mis-wired.
    pub async fn bulk_enable(&self, payload: &BulkPayload) -> Result<Notice, ConfigurationError> {
        self.bulk_status(payload, true).await
    }

    /// Deactivate every selected store in one step.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] if the bus is mis-wired.
    pub async fn bulk_disable(&self, payload: &BulkPayload) -> Result<Notice, ConfigurationError> {
        self.bulk_status(payload, false).await
    }

    async fn bulk_status(
        &self,
        payload: &BulkPayload,
        active: bool,
    ) -> Result<Notice, ConfigurationError> {
        let ids = match self.selection(payload) {
            Ok(ids) => ids,
            Err(notice) => return Ok(notice),
        };
        let outcome = self
            .coordinator
            .run_batched(&BulkAction::status_update(), &ids, |store_ids| {
                BulkUpdateStoreStatus {
                    active,
                    store_ids: store_ids.clone(),
                }
            })
            .await?;
        Ok(outcome.notice(&self.messages, SELECTION_STATUS_UPDATED_NOTICE))
    }

    async fn single<C>(&self, command: C, success: &str) -> Result<Notice, ConfigurationError>
    where
        C: Command,
    {
        match self.bus.dispatch(command).await {
            Ok(_) => {
                info!(command = C::NAME, "store action succeeded");
                Ok(Notice::success(success))
            }
            Err(DispatchError::Failed(failure)) => {
                Ok(Notice::error(self.messages.resolve(&failure)))
            }
            Err(DispatchError::Configuration(err)) => Err(err),
        }
    }

    fn selection(&self, payload: &BulkPayload) -> Result<IdentitySet, Notice> {
        IdentitySet::extract(payload, STORE_BULK_FIELD).map_err(|invalid| {
            warn!(reason = invalid.reason(), "rejected store selection");
            let failure = DomainFailure::from(invalid);
            Notice {
                level: NoticeLevel::Error,
                message: self.messages.resolve(&failure).to_owned(),
                succeeded: 0,
                failed: 0,
            }
        })
    }
}
