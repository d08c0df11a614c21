use std::collections::HashSet;
use std::sync::Arc;

use super::store::RatingStore;
use super::types::{RankedStore, Rating, StoreId, UserId};
use crate::errors::RankingResult;

/// Orders a user's rated stores by descending rating.
#[derive(Clone)]
pub struct RankingQuery {
    store: Arc<dyn RatingStore>,
}

impl RankingQuery {
    pub fn new(store: Arc<dyn RatingStore>) -> Self {
        Self { store }
    }

    /// Candidates without a rating are left out: they are not ranked yet,
    /// which is different from being ranked last. Equal ratings are ordered
    /// by ascending store id so repeated calls give identical output.
    pub fn rankings(&self, user_id: UserId, candidates: &[StoreId]) -> RankingResult<Vec<RankedStore>> {
        let candidates: HashSet<StoreId> = candidates.iter().copied().collect();

        let mut rated: Vec<Rating> = self
            .store
            .list(user_id)?
            .into_iter()
            .filter(|rating| rating.comparisons > 0 && candidates.contains(&rating.store_id))
            .collect();

        rated.sort_by(|a, b| {
            b.value
                .total_cmp(&a.value)
                .then_with(|| a.store_id.cmp(&b.store_id))
        });

        Ok(rated
            .into_iter()
            .enumerate()
            .map(|(idx, rating)| RankedStore {
                store_id: rating.store_id,
                rank: idx + 1,
                rating: rating.value,
                comparisons: rating.comparisons,
            })
            .collect())
    }
}
