//! Bulk actions over a selection of entities.
//!
//! The coordinator either dispatches one command per selected id, in
//! selection order, carrying on past failures, or dispatches a single
//! command covering the whole selection. Failures raised inside a bulk
//! run are re-tagged with the action's bulk sub-code before they are
//! recorded, so the user sees e.g. "could not delete this selection"
//! rather than the single-item text.

use std::borrow::Cow;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;
use tokio::sync::watch;
use tracing::{Instrument, error, info, info_span, warn};

use super::{
    Command, CommandBus, ConfigurationError, DomainFailure, EntityId, FailureKind, IdentitySet,
    MessageTable, SubCode,
};

/// Named bulk context and the failure it reports.
///
/// Inside a bulk run every non-validation failure is reported as the
/// action's bulk failure, whatever the per-item kind was; the per-item
/// kind is kept in the `cause` context entry.
///
/// # Examples
/// ```
/// use backoffice::domain::{BulkAction, DomainFailure, FailureKind, SubCode};
///
/// let retagged = BulkAction::delete().retag(DomainFailure::not_found());
/// assert_eq!(retagged.kind(), &FailureKind::CANNOT_DELETE);
/// assert_eq!(retagged.sub_code(), Some(&SubCode::FAILED_BULK_DELETE));
/// assert_eq!(retagged.context_value("cause"), Some("not-found"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkAction {
    name: Cow<'static, str>,
    failure: Option<(FailureKind, SubCode)>,
}

impl BulkAction {
    /// An action that reports per-item failures unchanged.
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            failure: None,
        }
    }

    /// Deleting a selection: failures become `cannot-delete` /
    /// `failed-bulk-delete`.
    pub fn delete() -> Self {
        Self::new("bulk-delete")
            .reporting(FailureKind::CANNOT_DELETE, SubCode::FAILED_BULK_DELETE)
    }

    /// Changing the status of a selection: failures become
    /// `cannot-toggle-status` / `failed-bulk-status-update`.
    pub fn status_update() -> Self {
        Self::new("bulk-status-update").reporting(
            FailureKind::CANNOT_TOGGLE_STATUS,
            SubCode::FAILED_BULK_STATUS_UPDATE,
        )
    }

    /// Report failures as `kind` with `sub_code`.
    pub fn reporting(mut self, kind: FailureKind, sub_code: SubCode) -> Self {
        self.failure = Some((kind, sub_code));
        self
    }

    /// Action name used in logs.
    pub fn name(&self) -> &str {
        self.name.as_ref()
    }

    /// Turn a per-item `failure` into the action's bulk failure.
    ///
    /// Validation failures and actions without a bulk failure pass
    /// through unchanged.
    pub fn retag(&self, failure: DomainFailure) -> DomainFailure {
        let Some((kind, sub_code)) = &self.failure else {
            return failure;
        };
        if failure.kind() == &FailureKind::VALIDATION {
            return failure;
        }
        if failure.kind() == kind {
            return failure.with_sub_code(sub_code.clone());
        }
        failure
            .context()
            .iter()
            .fold(
                DomainFailure::new(kind.clone()).with_sub_code(sub_code.clone()),
                |bulk, (key, value)| bulk.with_context(key.clone(), value.clone()),
            )
            .with_context("cause", failure.kind().as_str())
    }
}

/// Severity of a user-facing notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    /// Everything asked for was done.
    Success,
    /// At least part of the action failed.
    Error,
}

/// The single message shown after an admin action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    /// Severity.
    pub level: NoticeLevel,
    /// Text shown to the user.
    pub message: String,
    /// Entities the action succeeded for.
    pub succeeded: usize,
    /// Entities the action failed for.
    pub failed: usize,
}

impl Notice {
    /// Success for a single-entity action.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
            succeeded: 1,
            failed: 0,
        }
    }

    /// Failure for a single-entity action.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
            succeeded: 0,
            failed: 1,
        }
    }

    /// Whether the notice reports success.
    pub fn is_success(&self) -> bool {
        self.level == NoticeLevel::Success
    }
}

/// Partition of a selection after a bulk run.
///
/// ## Invariants
/// - `succeeded`, `failed` and `unattempted` are disjoint and together
///   hold exactly the submitted selection.
/// - `unattempted` is empty unless the run was cancelled.
/// - `first_failure` is `Some` iff `failed` is non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkOutcome {
    succeeded: Vec<EntityId>,
    failed: Vec<EntityId>,
    unattempted: Vec<EntityId>,
    first_failure: Option<DomainFailure>,
}

impl BulkOutcome {
    fn empty() -> Self {
        Self {
            succeeded: Vec::new(),
            failed: Vec::new(),
            unattempted: Vec::new(),
            first_failure: None,
        }
    }

    fn record_success(&mut self, id: EntityId) {
        self.succeeded.push(id);
    }

    fn record_failure(&mut self, id: EntityId, failure: DomainFailure) {
        self.failed.push(id);
        if self.first_failure.is_none() {
            self.first_failure = Some(failure);
        }
    }

    /// Ids the action succeeded for, in selection order.
    pub fn succeeded_ids(&self) -> &[EntityId] {
        &self.succeeded
    }

    /// Ids the action failed for, in selection order.
    pub fn failed_ids(&self) -> &[EntityId] {
        &self.failed
    }

    /// Ids skipped because the run was cancelled.
    pub fn unattempted_ids(&self) -> &[EntityId] {
        &self.unattempted
    }

    /// The first failure met, already re-tagged for the bulk context.
    pub fn first_failure(&self) -> Option<&DomainFailure> {
        self.first_failure.as_ref()
    }

    /// Whether every selected id succeeded.
    pub fn is_complete_success(&self) -> bool {
        self.failed.is_empty() && self.unattempted.is_empty()
    }

    /// The notice for this outcome: `success_message` when every id
    /// succeeded, otherwise the resolved first failure.
    ///
    /// A run cancelled before any failure reports the table fallback.
    pub fn notice(&self, table: &MessageTable, success_message: &str) -> Notice {
        let (level, message) = if self.is_complete_success() {
            (NoticeLevel::Success, success_message)
        } else {
            let message = self
                .first_failure
                .as_ref()
                .map_or_else(|| table.fallback(), |failure| table.resolve(failure));
            (NoticeLevel::Error, message)
        };
        Notice {
            level,
            message: message.to_owned(),
            succeeded: self.succeeded.len(),
            failed: self.failed.len(),
        }
    }
}

/// Polled before each per-id attempt.
pub trait CancellationSignal {
    /// Whether the caller has given up on the run.
    fn is_cancelled(&self) -> bool;
}

/// A signal that never fires.
#[derive(Debug, Default, Clone, Copy)]
pub struct NeverCancelled;

impl CancellationSignal for NeverCancelled {
    fn is_cancelled(&self) -> bool {
        false
    }
}

impl CancellationSignal for AtomicBool {
    fn is_cancelled(&self) -> bool {
        self.load(Ordering::Acquire)
    }
}

impl CancellationSignal for watch::Receiver<bool> {
    fn is_cancelled(&self) -> bool {
        *self.borrow()
    }
}

impl<T> CancellationSignal for Arc<T>
where
    T: CancellationSignal + ?Sized,
{
    fn is_cancelled(&self) -> bool {
        (**self).is_cancelled()
    }
}

/// Runs bulk actions through a shared [`CommandBus`].
#[derive(Clone)]
pub struct BulkOperationCoordinator {
    bus: Arc<CommandBus>,
}

impl BulkOperationCoordinator {
    /// Coordinator dispatching through `bus`.
    pub fn new(bus: Arc<CommandBus>) -> Self {
        Self { bus }
    }

    /// Dispatch `factory(id)` for every id in order, continuing past
    /// failures.
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigurationError`] if the command has no handler;
    /// the run stops there.
    pub async fn run_bulk<C, F>(
        &self,
        action: &BulkAction,
        ids: &IdentitySet,
        factory: F,
    ) -> Result<BulkOutcome, ConfigurationError>
    where
        C: Command,
        F: FnMut(EntityId) -> C,
    {
        self.run_bulk_until(action, ids, factory, &NeverCancelled)
            .await
    }

    /// As [`run_bulk`](Self::run_bulk), but stops before the next id once
    /// `cancel` fires. Ids not attempted are reported in
    /// [`BulkOutcome::unattempted_ids`].
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigurationError`] if the command has no handler.
    pub async fn run_bulk_until<C, F, S>(
        &self,
        action: &BulkAction,
        ids: &IdentitySet,
        mut factory: F,
        cancel: &S,
    ) -> Result<BulkOutcome, ConfigurationError>
    where
        C: Command,
        F: FnMut(EntityId) -> C,
        S: CancellationSignal + ?Sized,
    {
        let span = info_span!("bulk", action = action.name(), selected = ids.len());
        async move {
            let mut outcome = BulkOutcome::empty();
            let mut remaining = ids.iter();
            while let Some(id) = remaining.next() {
                if cancel.is_cancelled() {
                    outcome.unattempted = std::iter::once(id).chain(remaining).collect();
                    warn!(
                        skipped = outcome.unattempted.len(),
                        "bulk run cancelled"
                    );
                    break;
                }
                match self.bus.dispatch(factory(id)).await {
                    Ok(_) => outcome.record_success(id),
                    Err(err) => match err.into_failure() {
                        Ok(failure) => outcome.record_failure(id, action.retag(failure)),
                        Err(config) => {
                            error!(%config, "bulk run aborted");
                            return Err(config);
                        }
                    },
                }
            }
            log_summary(&outcome);
            Ok(outcome)
        }
        .instrument(span)
        .await
    }

    /// Dispatch one command covering the whole selection. Success marks
    /// every id succeeded; failure marks every id failed.
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigurationError`] if the command has no handler.
    pub async fn run_batched<C, F>(
        &self,
        action: &BulkAction,
        ids: &IdentitySet,
        factory: F,
    ) -> Result<BulkOutcome, ConfigurationError>
    where
        C: Command,
        F: FnOnce(&IdentitySet) -> C,
    {
        let span = info_span!("bulk", action = action.name(), selected = ids.len());
        async move {
            let mut outcome = BulkOutcome::empty();
            match self.bus.dispatch(factory(ids)).await {
                Ok(_) => outcome.succeeded = ids.as_slice().to_vec(),
                Err(err) => {
                    let failure = match err.into_failure() {
                        Ok(failure) => failure,
                        Err(config) => {
                            error!(%config, "bulk run aborted");
                            return Err(config);
                        }
                    };
                    outcome.failed = ids.as_slice().to_vec();
                    outcome.first_failure = Some(action.retag(failure));
                }
            }
            log_summary(&outcome);
            Ok(outcome)
        }
        .instrument(span)
        .await
    }
}

fn log_summary(outcome: &BulkOutcome) {
    info!(
        succeeded = outcome.succeeded.len(),
        failed = outcome.failed.len(),
        unattempted = outcome.unattempted.len(),
        first_failure = ?outcome.first_failure.as_ref().map(ToString::to_string),
        "bulk run finished"
    );
}
