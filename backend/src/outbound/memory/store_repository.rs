//! Stores kept in process memory.
//!
//! Serves both the store command handlers ([`StoreRepository`]) and the
//! store listing ([`ResourceRepository`]). Text filters match
//! case-insensitive substrings; `id_store` and `active` match exactly.
//! Individual stores can be marked as refusing deletion or status changes
//! to stand in for storage-side constraints such as dependent orders.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::grid::{ColumnFilter, GridQuery, SortDirection, SortOrder};
use crate::domain::ports::{
    ResourceRepository, ResourceRepositoryError, StoreRepository, StoreRepositoryError,
};
use crate::domain::store::{STORE_PRIMARY_KEY, Store};
use crate::domain::{EntityId, IdentitySet};

#[derive(Debug, Default)]
struct State {
    stores: BTreeMap<EntityId, Store>,
    undeletable: BTreeMap<EntityId, String>,
    status_locked: BTreeMap<EntityId, String>,
}

/// In-memory store table.
#[derive(Debug, Default)]
pub struct InMemoryStoreRepository {
    state: RwLock<State>,
}

impl InMemoryStoreRepository {
    /// Repository holding `stores`.
    pub fn new(stores: impl IntoIterator<Item = Store>) -> Self {
        let stores = stores.into_iter().map(|store| (store.id, store)).collect();
        Self {
            state: RwLock::new(State {
                stores,
                ..State::default()
            }),
        }
    }

    /// Make deleting `id` fail with `reason`.
    #[must_use]
    pub fn refusing_delete(mut self, id: EntityId, reason: impl Into<String>) -> Self {
        self.state.get_mut().undeletable.insert(id, reason.into());
        self
    }

    /// Make changing the status of `id` fail with `reason`.
    #[must_use]
    pub fn locking_status(mut self, id: EntityId, reason: impl Into<String>) -> Self {
        self.state.get_mut().status_locked.insert(id, reason.into());
        self
    }

    /// Copy of every stored store in id order.
    pub async fn snapshot(&self) -> Vec<Store> {
        self.state.read().await.stores.values().cloned().collect()
    }
}

impl State {
    fn check_status_change(&self, id: EntityId) -> Result<(), StoreRepositoryError> {
        if !self.stores.contains_key(&id) {
            return Err(StoreRepositoryError::not_found(id));
        }
        match self.status_locked.get(&id) {
            Some(reason) => Err(StoreRepositoryError::rejected(id, reason.clone())),
            None => Ok(()),
        }
    }

    fn set_active(&mut self, id: EntityId, active: bool) {
        if let Some(store) = self.stores.get_mut(&id) {
            store.active = active;
        }
    }

    fn matching(&self, query: &GridQuery) -> Vec<&Store> {
        let mut rows: Vec<&Store> = self
            .stores
            .values()
            .filter(|store| matches_search(store, query.search.as_deref()))
            .filter(|store| query.filters.iter().all(|filter| matches_filter(store, filter)))
            .collect();
        rows.sort_by(|a, b| compare(a, b, &query.order));
        rows
    }
}

fn text_column<'a>(store: &'a Store, column: &str) -> Option<&'a str> {
    let value = match column {
        "name" => &store.name,
        "address" => &store.address,
        "city" => &store.city,
        "postcode" => &store.postcode,
        "country" => &store.country,
        "phone" => &store.phone,
        "email" => &store.email,
        _ => return None,
    };
    Some(value.as_str())
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn matches_search(store: &Store, search: Option<&str>) -> bool {
    let Some(needle) = search else {
        return true;
    };
    ["name", "address", "city", "postcode", "country", "phone", "email"]
        .iter()
        .filter_map(|column| text_column(store, column))
        .any(|value| contains_ignore_case(value, needle))
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}

fn matches_filter(store: &Store, filter: &ColumnFilter) -> bool {
    match filter.column.as_str() {
        STORE_PRIMARY_KEY => filter
            .value
            .parse::<u64>()
            .is_ok_and(|id| id == store.id.get()),
        "active" => parse_flag(&filter.value) == Some(store.active),
        column => match text_column(store, column) {
            Some(value) => contains_ignore_case(value, &filter.value),
            None => {
                debug!(column, "filter on unknown store column matches nothing");
                false
            }
        },
    }
}

fn compare_column(a: &Store, b: &Store, column: &str) -> Ordering {
    match column {
        STORE_PRIMARY_KEY => a.id.cmp(&b.id),
        "active" => a.active.cmp(&b.active),
        other => match (text_column(a, other), text_column(b, other)) {
            (Some(left), Some(right)) => left.to_lowercase().cmp(&right.to_lowercase()),
            _ => Ordering::Equal,
        },
    }
}

fn compare(a: &Store, b: &Store, order: &[SortOrder]) -> Ordering {
    order.iter().fold(Ordering::Equal, |acc, sort| {
        acc.then_with(|| {
            let ord = compare_column(a, b, &sort.column);
            match sort.direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            }
        })
    })
}

#[async_trait]
impl StoreRepository for InMemoryStoreRepository {
    async fn find_by_id(&self, id: EntityId) -> Result<Option<Store>, StoreRepositoryError> {
        Ok(self.state.read().await.stores.get(&id).cloned())
    }

    async fn delete(&self, id: EntityId) -> Result<(), StoreRepositoryError> {
        let mut state = self.state.write().await;
        if !state.stores.contains_key(&id) {
            return Err(StoreRepositoryError::not_found(id));
        }
        if let Some(reason) = state.undeletable.get(&id) {
            return Err(StoreRepositoryError::rejected(id, reason.clone()));
        }
        state.stores.remove(&id);
        Ok(())
    }

    async fn set_status(&self, id: EntityId, active: bool) -> Result<(), StoreRepositoryError> {
        let mut state = self.state.write().await;
        state.check_status_change(id)?;
        state.set_active(id, active);
        Ok(())
    }

    async fn set_status_many(
        &self,
        ids: &IdentitySet,
        active: bool,
    ) -> Result<(), StoreRepositoryError> {
        let mut state = self.state.write().await;
        for id in ids {
            state.check_status_change(id)?;
        }
        for id in ids {
            state.set_active(id, active);
        }
        Ok(())
    }
}

#[async_trait]
impl ResourceRepository for InMemoryStoreRepository {
    type Row = Store;

    async fn count_matching(&self, query: &GridQuery) -> Result<u64, ResourceRepositoryError> {
        let count = self.state.read().await.matching(query).len();
        u64::try_from(count).map_err(|err| ResourceRepositoryError::query(err.to_string()))
    }

    async fn fetch_page(&self, query: &GridQuery) -> Result<Vec<Store>, ResourceRepositoryError> {
        let offset = usize::try_from(query.offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(query.limit).unwrap_or(usize::MAX);
        Ok(self
            .state
            .read()
            .await
            .matching(query)
            .into_iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests;
