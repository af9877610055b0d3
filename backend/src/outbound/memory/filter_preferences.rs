//! Last-used grid filters kept in process memory.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::EntityId;
use crate::domain::grid::FilterParams;
use crate::domain::ports::{FilterPreferencesRepository, FilterPreferencesRepositoryError};

/// Filter preferences keyed by owner and grid id.
#[derive(Debug, Default)]
pub struct InMemoryFilterPreferences {
    saved: RwLock<HashMap<(EntityId, String), FilterParams>>,
}

impl InMemoryFilterPreferences {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FilterPreferencesRepository for InMemoryFilterPreferences {
    async fn load(
        &self,
        owner: EntityId,
        grid_id: &str,
    ) -> Result<Option<FilterParams>, FilterPreferencesRepositoryError> {
        let saved = self.saved.read().await;
        Ok(saved.get(&(owner, grid_id.to_owned())).cloned())
    }

    async fn save(
        &self,
        owner: EntityId,
        grid_id: &str,
        params: &FilterParams,
    ) -> Result<(), FilterPreferencesRepositoryError> {
        self.saved
            .write()
            .await
            .insert((owner, grid_id.to_owned()), params.clone());
        Ok(())
    }
}
