use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::{Mutex, MutexGuard, PoisonError, RwLock};

use super::types::{Rating, RatingKey, StoreId, UserId};
use crate::errors::{RankingError, RankingResult};

const DEFAULT_STRIPES: usize = 64;

/// Read-modify-write callback for [`RatingStore::update_pair`].
///
/// Receives the current ratings of both keys (`None` when never compared) and
/// returns the ratings to persist, in the same order.
pub type PairUpdate<'a> = dyn FnMut(Option<Rating>, Option<Rating>) -> (Rating, Rating) + 'a;

/// Persistent mapping from (user, store) to a rating.
///
/// Every write to a key is serialized with every other write to that key.
pub trait RatingStore: Send + Sync {
    fn get(&self, user_id: UserId, store_id: StoreId) -> RankingResult<Option<Rating>>;

    /// Last-write-wins insert or replace.
    fn upsert(&self, rating: &Rating) -> RankingResult<()>;

    /// All ratings ever recorded for the user, in no particular order.
    fn list(&self, user_id: UserId) -> RankingResult<Vec<Rating>>;

    /// Atomically reads both ratings, applies `update` and writes both
    /// results. Either both writes land or neither does.
    fn update_pair(
        &self,
        user_id: UserId,
        first: StoreId,
        second: StoreId,
        update: &mut PairUpdate<'_>,
    ) -> RankingResult<(Rating, Rating)>;
}

/// Fixed set of mutexes shared by hash, so locking never allocates per key.
pub struct KeyLocks {
    stripes: Vec<Mutex<()>>,
}

pub struct PairGuard<'a> {
    _guards: Vec<MutexGuard<'a, ()>>,
}

impl KeyLocks {
    pub fn new(stripes: usize) -> Self {
        Self {
            stripes: (0..stripes.max(1)).map(|_| Mutex::new(())).collect(),
        }
    }

    fn stripe_of(&self, key: &RatingKey) -> usize {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        (hasher.finish() % self.stripes.len() as u64) as usize
    }

    pub fn lock(&self, key: RatingKey) -> MutexGuard<'_, ()> {
        let idx = self.stripe_of(&key);
        acquire(&self.stripes[idx])
    }

    /// Locks both keys in ascending stripe order so concurrent pairs cannot
    /// deadlock. Keys sharing a stripe lock it once.
    pub fn lock_pair(&self, first: RatingKey, second: RatingKey) -> PairGuard<'_> {
        let mut indices = vec![self.stripe_of(&first), self.stripe_of(&second)];
        indices.sort_unstable();
        indices.dedup();

        PairGuard {
            _guards: indices.into_iter().map(|idx| acquire(&self.stripes[idx])).collect(),
        }
    }
}

impl Default for KeyLocks {
    fn default() -> Self {
        Self::new(DEFAULT_STRIPES)
    }
}

// The guarded value is `()`, so a poisoned stripe carries no broken state.
fn acquire(mutex: &Mutex<()>) -> MutexGuard<'_, ()> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// In-process rating store. Nothing survives the process.
#[derive(Default)]
pub struct MemoryRatingStore {
    ratings: RwLock<HashMap<UserId, HashMap<StoreId, Rating>>>,
    locks: KeyLocks,
}

impl MemoryRatingStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<UserId, HashMap<StoreId, Rating>>> {
        self.ratings.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<UserId, HashMap<StoreId, Rating>>> {
        self.ratings.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Removes every rating of a store, mirroring a cascading delete.
    pub fn remove_store(&self, store_id: StoreId) {
        for by_store in self.write().values_mut() {
            by_store.remove(&store_id);
        }
    }

    pub fn remove_user(&self, user_id: UserId) {
        self.write().remove(&user_id);
    }
}

impl RatingStore for MemoryRatingStore {
    fn get(&self, user_id: UserId, store_id: StoreId) -> RankingResult<Option<Rating>> {
        Ok(self
            .read()
            .get(&user_id)
            .and_then(|by_store| by_store.get(&store_id))
            .cloned())
    }

    fn upsert(&self, rating: &Rating) -> RankingResult<()> {
        let _guard = self.locks.lock(rating.key());
        self.write()
            .entry(rating.user_id)
            .or_default()
            .insert(rating.store_id, rating.clone());
        Ok(())
    }

    fn list(&self, user_id: UserId) -> RankingResult<Vec<Rating>> {
        Ok(self
            .read()
            .get(&user_id)
            .map(|by_store| by_store.values().cloned().collect())
            .unwrap_or_default())
    }

    fn update_pair(
        &self,
        user_id: UserId,
        first: StoreId,
        second: StoreId,
        update: &mut PairUpdate<'_>,
    ) -> RankingResult<(Rating, Rating)> {
        if first == second {
            return Err(RankingError::InvalidComparison { store_id: first });
        }

        let _guard = self
            .locks
            .lock_pair(RatingKey::new(user_id, first), RatingKey::new(user_id, second));

        let current_first = self.get(user_id, first)?;
        let current_second = self.get(user_id, second)?;
        let (new_first, new_second) = update(current_first, current_second);

        // One write lock for both keys so readers never see half a judgment.
        let mut ratings = self.write();
        let by_store = ratings.entry(user_id).or_default();
        by_store.insert(first, new_first.clone());
        by_store.insert(second, new_second.clone());

        Ok((new_first, new_second))
    }
}
