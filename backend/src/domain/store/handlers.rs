//! Store command handlers over the [`StoreRepository`] port.
//!
//! Handlers translate storage rejections into the failure kind of the
//! action that was attempted. Everything else is returned as the raw
//! [`StoreRepositoryError`] and classified by [`store_repository_failure`],
//! which [`register_store_handlers`] installs on the bus.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ports::{StoreRepository, StoreRepositoryError};
use crate::domain::{
    CommandBusBuilder, CommandHandler, ConfigurationError, DomainFailure, HandlerError, SubCode,
};

use super::{BulkUpdateStoreStatus, DeleteStore, SetStoreStatus, ToggleStoreStatus};

const STORE_ID: &str = "storeId";

/// Classify store repository errors that reach the bus unhandled.
pub fn store_repository_failure(err: &StoreRepositoryError) -> DomainFailure {
    match err {
        StoreRepositoryError::NotFound { id } => {
            DomainFailure::not_found().with_context(STORE_ID, id.to_string())
        }
        StoreRepositoryError::Rejected { id, reason } => DomainFailure::unknown()
            .with_context(STORE_ID, id.to_string())
            .with_context("detail", reason.clone()),
        StoreRepositoryError::Connection { .. } | StoreRepositoryError::Query { .. } => {
            DomainFailure::unknown().with_context("detail", err.to_string())
        }
    }
}

fn status_rejection(err: StoreRepositoryError) -> HandlerError {
    match err {
        StoreRepositoryError::Rejected { id, reason } => Box::new(
            DomainFailure::cannot_toggle_status()
                .with_context(STORE_ID, id.to_string())
                .with_context("reason", reason),
        ),
        other => Box::new(other),
    }
}

/// Handles [`DeleteStore`].
pub struct DeleteStoreHandler<R> {
    repository: Arc<R>,
}

impl<R> DeleteStoreHandler<R> {
    /// Handler writing through `repository`.
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<R> CommandHandler<DeleteStore> for DeleteStoreHandler<R>
where
    R: StoreRepository + 'static,
{
    async fn handle(&self, command: DeleteStore) -> Result<(), HandlerError> {
        self.repository
            .delete(command.store_id)
            .await
            .map_err(|err| -> HandlerError {
                match err {
                    StoreRepositoryError::Rejected { id, reason } => Box::new(
                        DomainFailure::cannot_delete(SubCode::FAILED_SINGLE_DELETE)
                            .with_context(STORE_ID, id.to_string())
                            .with_context("reason", reason),
                    ),
                    other => Box::new(other),
                }
            })?;
        debug!(store_id = %command.store_id, "store deleted");
        Ok(())
    }
}

/// Handles [`ToggleStoreStatus`].
pub struct ToggleStoreStatusHandler<R> {
    repository: Arc<R>,
}

impl<R> ToggleStoreStatusHandler<R> {
    /// Handler writing through `repository`.
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<R> CommandHandler<ToggleStoreStatus> for ToggleStoreStatusHandler<R>
where
    R: StoreRepository + 'static,
{
    async fn handle(&self, command: ToggleStoreStatus) -> Result<bool, HandlerError> {
        let store = self
            .repository
            .find_by_id(command.store_id)
            .await?
            .ok_or_else(|| StoreRepositoryError::not_found(command.store_id))?;
        let active = !store.active;
        self.repository
            .set_status(command.store_id, active)
            .await
            .map_err(status_rejection)?;
        debug!(store_id = %command.store_id, active, "store status toggled");
        Ok(active)
    }
}

/// Handles [`SetStoreStatus`].
pub struct SetStoreStatusHandler<R> {
    repository: Arc<R>,
}

impl<R> SetStoreStatusHandler<R> {
    /// Handler writing through `repository`.
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<R> CommandHandler<SetStoreStatus> for SetStoreStatusHandler<R>
where
    R: StoreRepository + 'static,
{
    async fn handle(&self, command: SetStoreStatus) -> Result<(), HandlerError> {
        self.repository
            .set_status(command.store_id, command.active)
            .await
            .map_err(status_rejection)?;
        Ok(())
    }
}

/// Handles [`BulkUpdateStoreStatus`].
pub struct BulkUpdateStoreStatusHandler<R> {
    repository: Arc<R>,
}

impl<R> BulkUpdateStoreStatusHandler<R> {
    /// Handler writing through `repository`.
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<R> CommandHandler<BulkUpdateStoreStatus> for BulkUpdateStoreStatusHandler<R>
where
    R: StoreRepository + 'static,
{
    async fn handle(&self, command: BulkUpdateStoreStatus) -> Result<(), HandlerError> {
        self.repository
            .set_status_many(&command.store_ids, command.active)
            .await
            .map_err(status_rejection)?;
        debug!(
            stores = command.store_ids.len(),
            active = command.active,
            "store statuses updated"
        );
        Ok(())
    }
}

/// Register every store handler and the store failure mapper.
///
/// # Errors
///
/// Returns [`ConfigurationError::DuplicateHandler`] if a store command is
/// already registered on `builder`.
pub fn register_store_handlers<R>(
    builder: CommandBusBuilder,
    repository: Arc<R>,
) -> Result<CommandBusBuilder, ConfigurationError>
where
    R: StoreRepository + 'static,
{
    Ok(builder
        .register::<DeleteStore, _>(DeleteStoreHandler::new(Arc::clone(&repository)))?
        .register::<ToggleStoreStatus, _>(ToggleStoreStatusHandler::new(Arc::clone(
            &repository,
        )))?
        .register::<SetStoreStatus, _>(SetStoreStatusHandler::new(Arc::clone(&repository)))?
        .register::<BulkUpdateStoreStatus, _>(BulkUpdateStoreStatusHandler::new(repository))?
        .map_failure::<StoreRepositoryError>(store_repository_failure))
}
