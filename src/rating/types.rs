use serde::{Deserialize, Serialize};

pub type UserId = i64;
pub type StoreId = i64;
pub type RatingValue = f64;

/// One user's current belief about one store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub user_id: UserId,
    pub store_id: StoreId,
    pub value: RatingValue,
    pub comparisons: u32,
}

impl Rating {
    /// A rating that has not yet taken part in any comparison.
    pub fn baseline(user_id: UserId, store_id: StoreId, value: RatingValue) -> Self {
        Self {
            user_id,
            store_id,
            value,
            comparisons: 0,
        }
    }

    pub fn key(&self) -> RatingKey {
        RatingKey::new(self.user_id, self.store_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RatingKey {
    pub user_id: UserId,
    pub store_id: StoreId,
}

impl RatingKey {
    pub fn new(user_id: UserId, store_id: StoreId) -> Self {
        Self { user_id, store_id }
    }
}

/// A single judgment: `winner` was preferred over `loser`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Comparison {
    pub user_id: UserId,
    pub winner: StoreId,
    pub loser: StoreId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonOutcome {
    pub winner: Rating,
    pub loser: Rating,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedStore {
    pub store_id: StoreId,
    /// 1-based position
    pub rank: usize,
    pub rating: RatingValue,
    pub comparisons: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RankingProgress {
    pub ranked: usize,
    pub candidates: usize,
}

impl RankingProgress {
    pub fn is_complete(&self) -> bool {
        self.ranked == self.candidates
    }
}
