use std::collections::HashSet;
use std::sync::Arc;

use log::debug;
use rand::Rng;
use rand::seq::{IndexedRandom, index};

use super::store::RatingStore;
use super::types::{RankingProgress, StoreId, UserId};
use crate::errors::RankingResult;

pub type StorePair = (StoreId, StoreId);

/// Chooses which two stores to present next.
///
/// Stateless: every decision is derived from the comparison counts currently
/// persisted in the [`RatingStore`].
#[derive(Clone)]
pub struct PairSelector {
    store: Arc<dyn RatingStore>,
}

impl PairSelector {
    pub fn new(store: Arc<dyn RatingStore>) -> Self {
        Self { store }
    }

    pub fn next_pair(&self, user_id: UserId, candidates: &[StoreId]) -> RankingResult<Option<StorePair>> {
        self.next_pair_with_rng(user_id, candidates, &mut rand::rng())
    }

    /// Returns `None` when fewer than two distinct candidates exist.
    ///
    /// While some candidate has never been compared, one of those stores is
    /// always part of the pair. Afterwards any two candidates are drawn
    /// uniformly without replacement.
    pub fn next_pair_with_rng<R: Rng + ?Sized>(
        &self,
        user_id: UserId,
        candidates: &[StoreId],
        rng: &mut R,
    ) -> RankingResult<Option<StorePair>> {
        let candidates = distinct(candidates);
        if candidates.len() < 2 {
            return Ok(None);
        }

        let compared = self.compared_stores(user_id)?;
        let unrated: Vec<StoreId> = candidates
            .iter()
            .copied()
            .filter(|id| !compared.contains(id))
            .collect();

        let pair = if unrated.is_empty() {
            pick_any_two(&candidates, rng)
        } else {
            pick_with_unrated(&candidates, &unrated, rng)
        };

        debug!(
            "user {}: next pair {:?} ({} of {} candidates unrated)",
            user_id,
            pair,
            unrated.len(),
            candidates.len()
        );
        Ok(pair)
    }

    /// True once every candidate has taken part in at least one comparison.
    pub fn is_complete(&self, user_id: UserId, candidates: &[StoreId]) -> RankingResult<bool> {
        Ok(self.progress(user_id, candidates)?.is_complete())
    }

    pub fn progress(&self, user_id: UserId, candidates: &[StoreId]) -> RankingResult<RankingProgress> {
        let candidates = distinct(candidates);
        let compared = self.compared_stores(user_id)?;
        let ranked = candidates.iter().filter(|id| compared.contains(id)).count();

        Ok(RankingProgress {
            ranked,
            candidates: candidates.len(),
        })
    }

    fn compared_stores(&self, user_id: UserId) -> RankingResult<HashSet<StoreId>> {
        Ok(self
            .store
            .list(user_id)?
            .into_iter()
            .filter(|rating| rating.comparisons > 0)
            .map(|rating| rating.store_id)
            .collect())
    }
}

fn distinct(ids: &[StoreId]) -> Vec<StoreId> {
    let mut ids = ids.to_vec();
    ids.sort_unstable();
    ids.dedup();
    ids
}

fn pick_any_two<R: Rng + ?Sized>(candidates: &[StoreId], rng: &mut R) -> Option<StorePair> {
    if candidates.len() < 2 {
        return None;
    }
    let picked = index::sample(rng, candidates.len(), 2);
    Some((candidates[picked.index(0)], candidates[picked.index(1)]))
}

fn pick_with_unrated<R: Rng + ?Sized>(
    candidates: &[StoreId],
    unrated: &[StoreId],
    rng: &mut R,
) -> Option<StorePair> {
    let fresh = *unrated.choose(rng)?;
    let partners: Vec<StoreId> = candidates.iter().copied().filter(|&id| id != fresh).collect();
    let partner = *partners.choose(rng)?;

    // Random presentation order so the unrated store is not always on the left
    if rng.random_bool(0.5) {
        Some((fresh, partner))
    } else {
        Some((partner, fresh))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rating::store::MemoryRatingStore;
    use crate::rating::types::Rating;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn selector_with(ratings: &[(StoreId, u32)]) -> PairSelector {
        let store = Arc::new(MemoryRatingStore::new());
        for &(store_id, comparisons) in ratings {
            store
                .upsert(&Rating { user_id: 1, store_id, value: 1200.0, comparisons })
                .unwrap();
        }
        PairSelector::new(store)
    }

    #[test]
    fn test_fewer_than_two_candidates() {
        let selector = selector_with(&[]);
        let mut rng = StdRng::seed_from_u64(1);

        assert_eq!(selector.next_pair_with_rng(1, &[], &mut rng).unwrap(), None);
        assert_eq!(selector.next_pair_with_rng(1, &[5], &mut rng).unwrap(), None);
        assert_eq!(selector.next_pair_with_rng(1, &[5, 5, 5], &mut rng).unwrap(), None);
    }

    #[test]
    fn test_pair_members_are_distinct_candidates() {
        let selector = selector_with(&[(1, 3), (2, 1), (3, 2)]);
        let mut rng = StdRng::seed_from_u64(7);
        let candidates = [1, 2, 3, 4];

        for _ in 0..200 {
            let (a, b) = selector.next_pair_with_rng(1, &candidates, &mut rng).unwrap().unwrap();
            assert_ne!(a, b);
            assert!(candidates.contains(&a) && candidates.contains(&b));
        }
    }

    #[test]
    fn test_unrated_store_always_included() {
        let selector = selector_with(&[(1, 1), (2, 1)]);
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..200 {
            let (a, b) = selector.next_pair_with_rng(1, &[1, 2, 3], &mut rng).unwrap().unwrap();
            assert!(a == 3 || b == 3, "pair ({}, {}) skipped the unrated store", a, b);
        }
    }

    #[test]
    fn test_every_unrated_store_gets_picked() {
        let selector = selector_with(&[(1, 2)]);
        let mut rng = StdRng::seed_from_u64(3);
        let mut seen = HashSet::new();

        for _ in 0..500 {
            let (a, b) = selector.next_pair_with_rng(1, &[1, 2, 3, 4], &mut rng).unwrap().unwrap();
            seen.insert(a);
            seen.insert(b);
        }

        assert!(seen.contains(&2) && seen.contains(&3) && seen.contains(&4));
    }

    #[test]
    fn test_all_rated_samples_every_pair() {
        let selector = selector_with(&[(1, 1), (2, 1), (3, 1)]);
        let mut rng = StdRng::seed_from_u64(11);
        let mut seen = HashSet::new();

        for _ in 0..500 {
            let (a, b) = selector.next_pair_with_rng(1, &[1, 2, 3], &mut rng).unwrap().unwrap();
            seen.insert((a.min(b), a.max(b)));
        }

        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn test_zero_comparison_record_counts_as_unrated() {
        let selector = selector_with(&[(1, 0), (2, 1)]);
        let progress = selector.progress(1, &[1, 2]).unwrap();
        assert_eq!(progress, RankingProgress { ranked: 1, candidates: 2 });
    }

    #[test]
    fn test_completeness() {
        let selector = selector_with(&[(1, 1), (2, 4)]);

        assert!(selector.is_complete(1, &[1, 2]).unwrap());
        assert!(selector.is_complete(1, &[2, 2, 1]).unwrap());
        assert!(!selector.is_complete(1, &[1, 2, 3]).unwrap());
        assert!(selector.is_complete(1, &[]).unwrap());
    }

    #[test]
    fn test_ratings_outside_candidates_do_not_count() {
        let selector = selector_with(&[(1, 1), (9, 1)]);
        let progress = selector.progress(1, &[1, 2]).unwrap();
        assert_eq!(progress.ranked, 1);
    }
}
