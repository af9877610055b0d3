//! Back-office domain core.
//!
//! Purpose: route typed commands to handlers, turn every handler failure
//! into a message-table lookup, list resources through filtered grids and
//! run bulk actions over a selection with partial-failure semantics. No
//! transport or storage concerns live here; those sit behind `ports`.
//!
//! Public surface:
//! - CommandBus (alias to `command_bus::CommandBus`): single-handler
//!   dispatch with failure normalisation.
//! - DomainFailure / ValidationFailure / ConfigurationError: the three
//!   failure families.
//! - MessageTable: failure kind and sub-code to user message.
//! - IdentitySet: validated bulk selection.
//! - BulkOperationCoordinator: per-id and batched bulk runs.
//! - grid: listing definitions, filters and the query engine.
//! - store: the store screen built from the above.

pub mod bulk;
pub mod command;
pub mod command_bus;
pub mod failure;
pub mod grid;
pub mod identity;
pub mod messages;
pub mod ports;
pub mod store;
pub mod trace_id;

pub use self::bulk::{
    BulkAction, BulkOperationCoordinator, BulkOutcome, CancellationSignal, NeverCancelled,
    Notice, NoticeLevel,
};
pub use self::command::{Command, CommandHandler, CommandKey, HandlerError};
pub use self::command_bus::{CommandBus, CommandBusBuilder, CommandResult, DispatchError};
pub use self::failure::{ConfigurationError, DomainFailure, FailureKind, SubCode, ValidationFailure};
pub use self::identity::{BulkPayload, EntityId, IdentitySet, extract};
pub use self::messages::{
    DEFAULT_FALLBACK_MESSAGE, MessageEntry, MessageTable, MessageTableBuilder, MessageTableError,
    resolve,
};
pub use self::trace_id::TraceId;
