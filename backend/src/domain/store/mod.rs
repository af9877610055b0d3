//! The physical-store admin screen expressed over the command bus, the
//! listing grid and the bulk coordinator.

mod admin;
mod commands;
mod handlers;
mod messages;

use serde::{Deserialize, Serialize};

use crate::domain::EntityId;
use crate::domain::grid::{ColumnDefinition, GridDefinition};

pub use admin::StoreAdmin;
pub use commands::{
    BulkUpdateStoreStatus, DeleteStore, SetStoreStatus, ToggleStoreStatus, store_commands,
};
pub use handlers::{
    BulkUpdateStoreStatusHandler, DeleteStoreHandler, SetStoreStatusHandler,
    ToggleStoreStatusHandler, register_store_handlers, store_repository_failure,
};
pub use messages::{
    DELETED_NOTICE, SELECTION_DELETED_NOTICE, SELECTION_STATUS_UPDATED_NOTICE,
    STATUS_UPDATED_NOTICE, store_messages,
};

/// Grid id used to key persisted filters.
pub const STORE_GRID_ID: &str = "store";
/// Primary-key column of the store grid.
pub const STORE_PRIMARY_KEY: &str = "id_store";
/// Payload field carrying bulk-selected store ids.
pub const STORE_BULK_FIELD: &str = "store_bulk";

/// One physical store as listed in the admin grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    /// Store identifier.
    pub id: EntityId,
    /// Display name.
    pub name: String,
    /// Street address.
    pub address: String,
    /// City.
    pub city: String,
    /// Postal code.
    pub postcode: String,
    /// Country name.
    pub country: String,
    /// Contact phone number.
    pub phone: String,
    /// Contact e-mail address.
    pub email: String,
    /// Whether the store is shown to customers.
    pub active: bool,
}

/// Columns of the store listing.
///
/// Every column except `phone` and `email` sorts; `name`, `city`,
/// `postcode`, `country` and `active` filter.
pub fn store_grid() -> GridDefinition {
    GridDefinition::new(STORE_GRID_ID, STORE_PRIMARY_KEY)
        .column(ColumnDefinition::new("name").sortable().filterable())
        .column(ColumnDefinition::new("address").sortable())
        .column(ColumnDefinition::new("city").sortable().filterable())
        .column(ColumnDefinition::new("postcode").sortable().filterable())
        .column(ColumnDefinition::new("country").sortable().filterable())
        .column(ColumnDefinition::new("phone"))
        .column(ColumnDefinition::new("email"))
        .column(ColumnDefinition::new("active").sortable().filterable())
}
