//! User-facing texts of the store screen.

use crate::domain::{FailureKind, MessageTable, SubCode};

/// Shown after a single store's status changed.
pub const STATUS_UPDATED_NOTICE: &str = "The status has been successfully updated.";
/// Shown after a single store was deleted.
pub const DELETED_NOTICE: &str = "Successful deletion";
/// Shown after a selection was deleted.
pub const SELECTION_DELETED_NOTICE: &str = "The selection has been successfully deleted.";
/// Shown after a selection's status changed.
pub const SELECTION_STATUS_UPDATED_NOTICE: &str =
    "The status of the selection has been successfully updated.";

/// Failure messages of the store screen.
pub fn store_messages() -> MessageTable {
    MessageTable::builder()
        .message(
            FailureKind::CANNOT_TOGGLE_STATUS,
            "An error occurred while updating the status.",
        )
        .sub_code_message(
            FailureKind::CANNOT_DELETE,
            SubCode::FAILED_SINGLE_DELETE,
            "An error occurred while deleting the object.",
        )
        .sub_code_message(
            FailureKind::CANNOT_DELETE,
            SubCode::FAILED_BULK_DELETE,
            "An error occurred while deleting this selection.",
        )
        .message(
            FailureKind::NOT_FOUND,
            "The object cannot be loaded (or found).",
        )
        .sub_code_message(
            FailureKind::VALIDATION,
            SubCode::from("empty-selection"),
            "You must select at least one element.",
        )
        .sub_code_message(
            FailureKind::VALIDATION,
            SubCode::from("invalid-identifier"),
            "The selection contains an invalid identifier.",
        )
        .build()
}
