//! In-memory adapters.

mod filter_preferences;
mod store_repository;

pub use filter_preferences::InMemoryFilterPreferences;
pub use store_repository::InMemoryStoreRepository;
