//! Store commands.

use crate::domain::{Command, CommandKey, EntityId, IdentitySet};

/// Remove one store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteStore {
    /// Store to remove.
    pub store_id: EntityId,
}

impl Command for DeleteStore {
    const NAME: &'static str = "DeleteStore";
    type Output = ();
}

/// Flip one store's active flag; outputs the new flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleStoreStatus {
    /// Store to toggle.
    pub store_id: EntityId,
}

impl Command for ToggleStoreStatus {
    const NAME: &'static str = "ToggleStoreStatus";
    type Output = bool;
}

/// Set one store's active flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetStoreStatus {
    /// Store to update.
    pub store_id: EntityId,
    /// New flag.
    pub active: bool,
}

impl Command for SetStoreStatus {
    const NAME: &'static str = "SetStoreStatus";
    type Output = ();
}

/// Set the active flag of a whole selection in one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkUpdateStoreStatus {
    /// New flag.
    pub active: bool,
    /// Stores to update.
    pub store_ids: IdentitySet,
}

impl Command for BulkUpdateStoreStatus {
    const NAME: &'static str = "BulkUpdateStoreStatus";
    type Output = ();
}

/// Every store command, for startup verification.
pub fn store_commands() -> [CommandKey; 4] {
    [
        CommandKey::of::<DeleteStore>(),
        CommandKey::of::<ToggleStoreStatus>(),
        CommandKey::of::<SetStoreStatus>(),
        CommandKey::of::<BulkUpdateStoreStatus>(),
    ]
}
