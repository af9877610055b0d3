//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod filter_preferences_repository;
mod resource_repository;
mod store_repository;

#[cfg(test)]
pub use filter_preferences_repository::MockFilterPreferencesRepository;
pub use filter_preferences_repository::{
    FilterPreferencesRepository, FilterPreferencesRepositoryError,
    FixtureFilterPreferencesRepository,
};
pub use resource_repository::{ResourceRepository, ResourceRepositoryError};
#[cfg(test)]
pub use store_repository::MockStoreRepository;
pub use store_repository::{StoreRepository, StoreRepositoryError};
