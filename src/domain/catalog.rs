use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use super::models::StoreInfo;
use crate::errors::RankingResult;
use crate::rating::types::{StoreId, UserId};

/// Read-only view of the stores each user has logged items against.
///
/// The wardrobe backend owns stores and items; the ranking engine only needs
/// to enumerate them.
pub trait StoreCatalog: Send + Sync {
    /// Distinct stores for the user, ordered by id.
    fn stores_for_user(&self, user_id: UserId) -> RankingResult<Vec<StoreInfo>>;

    fn candidate_ids(&self, user_id: UserId) -> RankingResult<Vec<StoreId>> {
        Ok(self
            .stores_for_user(user_id)?
            .into_iter()
            .map(|store| store.id)
            .collect())
    }
}

#[derive(Default)]
pub struct MemoryStoreCatalog {
    stores: RwLock<HashMap<UserId, Vec<StoreInfo>>>,
}

impl MemoryStoreCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an item logged by the user at `store`.
    pub fn add(&self, user_id: UserId, store: StoreInfo) {
        let mut stores = self.stores.write().unwrap_or_else(PoisonError::into_inner);
        let owned = stores.entry(user_id).or_default();
        if !owned.iter().any(|existing| existing.id == store.id) {
            owned.push(store);
            owned.sort_by_key(|s| s.id);
        }
    }

    /// The user no longer has any item at the store.
    pub fn remove(&self, user_id: UserId, store_id: StoreId) {
        let mut stores = self.stores.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(owned) = stores.get_mut(&user_id) {
            owned.retain(|s| s.id != store_id);
        }
    }
}

impl StoreCatalog for MemoryStoreCatalog {
    fn stores_for_user(&self, user_id: UserId) -> RankingResult<Vec<StoreInfo>> {
        let stores = self.stores.read().unwrap_or_else(PoisonError::into_inner);
        Ok(stores.get(&user_id).cloned().unwrap_or_default())
    }
}
