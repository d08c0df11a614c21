use std::sync::Arc;

use log::debug;

use super::elo;
use super::store::RatingStore;
use super::types::{Comparison, ComparisonOutcome, Rating, StoreId, UserId};
use crate::config::settings::RatingSettings;
use crate::errors::{RankingError, RankingResult};

/// Applies judged comparisons to the ratings held by a [`RatingStore`].
#[derive(Clone)]
pub struct RatingUpdater {
    store: Arc<dyn RatingStore>,
    settings: RatingSettings,
}

impl RatingUpdater {
    pub fn new(store: Arc<dyn RatingStore>, settings: RatingSettings) -> Self {
        Self { store, settings }
    }

    pub fn record(&self, comparison: Comparison) -> RankingResult<ComparisonOutcome> {
        self.record_comparison(comparison.user_id, comparison.winner, comparison.loser)
    }

    /// Records that `winner` was preferred over `loser`.
    ///
    /// Stores seen for the first time enter at the baseline rating and the
    /// regular update is applied on top of it.
    pub fn record_comparison(
        &self,
        user_id: UserId,
        winner: StoreId,
        loser: StoreId,
    ) -> RankingResult<ComparisonOutcome> {
        if winner == loser {
            return Err(RankingError::InvalidComparison { store_id: winner });
        }

        let baseline = self.settings.baseline_rating;
        let (new_winner, new_loser) = self.store.update_pair(
            user_id,
            winner,
            loser,
            &mut |current_winner: Option<Rating>, current_loser: Option<Rating>| {
                let w = current_winner.unwrap_or_else(|| Rating::baseline(user_id, winner, baseline));
                let l = current_loser.unwrap_or_else(|| Rating::baseline(user_id, loser, baseline));
                let (w_value, l_value) = elo::apply_comparison(w.value, l.value, &self.settings);

                (
                    Rating { value: w_value, comparisons: w.comparisons + 1, ..w },
                    Rating { value: l_value, comparisons: l.comparisons + 1, ..l },
                )
            },
        )?;

        debug!(
            "user {}: store {} beat store {} ({:.2} / {:.2})",
            user_id, winner, loser, new_winner.value, new_loser.value
        );

        Ok(ComparisonOutcome {
            winner: new_winner,
            loser: new_loser,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rating::store::{MemoryRatingStore, PairUpdate};

    fn updater() -> (Arc<MemoryRatingStore>, RatingUpdater) {
        let store = Arc::new(MemoryRatingStore::new());
        let updater = RatingUpdater::new(store.clone(), RatingSettings::default());
        (store, updater)
    }

    struct UnavailableStore;

    impl RatingStore for UnavailableStore {
        fn get(&self, _: UserId, _: StoreId) -> RankingResult<Option<Rating>> {
            Err(RankingError::unavailable("offline"))
        }

        fn upsert(&self, _: &Rating) -> RankingResult<()> {
            Err(RankingError::unavailable("offline"))
        }

        fn list(&self, _: UserId) -> RankingResult<Vec<Rating>> {
            Err(RankingError::unavailable("offline"))
        }

        fn update_pair(
            &self,
            _: UserId,
            _: StoreId,
            _: StoreId,
            _: &mut PairUpdate<'_>,
        ) -> RankingResult<(Rating, Rating)> {
            Err(RankingError::unavailable("offline"))
        }
    }

    #[test]
    fn test_first_comparison_creates_both_ratings() {
        let (store, updater) = updater();

        let outcome = updater.record_comparison(7, 1, 2).unwrap();

        assert_eq!(outcome.winner, Rating { user_id: 7, store_id: 1, value: 1216.0, comparisons: 1 });
        assert_eq!(outcome.loser, Rating { user_id: 7, store_id: 2, value: 1184.0, comparisons: 1 });
        assert_eq!(store.get(7, 1).unwrap(), Some(outcome.winner));
        assert_eq!(store.get(7, 2).unwrap(), Some(outcome.loser));
    }

    #[test]
    fn test_same_store_rejected_without_writes() {
        let (store, updater) = updater();

        let err = updater.record_comparison(7, 3, 3).unwrap_err();

        assert!(matches!(err, RankingError::InvalidComparison { store_id: 3 }));
        assert!(store.list(7).unwrap().is_empty());
    }

    #[test]
    fn test_existing_rating_is_updated_not_reset() {
        let (store, updater) = updater();
        store.upsert(&Rating { user_id: 7, store_id: 1, value: 1300.0, comparisons: 4 }).unwrap();

        let outcome = updater.record_comparison(7, 2, 1).unwrap();

        assert!(outcome.winner.value > 1200.0);
        assert!(outcome.loser.value < 1300.0);
        assert_eq!(outcome.loser.comparisons, 5);
        assert_eq!(outcome.winner.comparisons, 1);
    }

    #[test]
    fn test_winner_strictly_increases_over_many_comparisons() {
        let (store, updater) = updater();
        let pairs = [(1, 2), (2, 3), (3, 1), (1, 3), (2, 1), (1, 2)];

        for (winner, loser) in pairs {
            let before_w = store.get(7, winner).unwrap().map(|r| r.value).unwrap_or(1200.0);
            let before_l = store.get(7, loser).unwrap().map(|r| r.value).unwrap_or(1200.0);
            let outcome = updater.record_comparison(7, winner, loser).unwrap();
            assert!(outcome.winner.value > before_w);
            assert!(outcome.loser.value < before_l);
        }
    }

    #[test]
    fn test_reversed_judgments_mirror_each_other() {
        let (_, forward) = updater();
        let (_, reverse) = updater();

        let ab = forward.record_comparison(7, 1, 2).unwrap();
        let ba = reverse.record_comparison(7, 2, 1).unwrap();

        assert_eq!(ab.winner.value, ba.winner.value);
        assert_eq!(ab.loser.value, ba.loser.value);
        assert_eq!(ab.winner.store_id, ba.loser.store_id);
        assert_eq!(ab.loser.store_id, ba.winner.store_id);
    }

    #[test]
    fn test_storage_failure_is_retryable() {
        let updater = RatingUpdater::new(Arc::new(UnavailableStore), RatingSettings::default());
        let err = updater.record(Comparison { user_id: 7, winner: 1, loser: 2 }).unwrap_err();
        assert!(err.is_retryable());
    }

    #[test]
    fn test_custom_k_and_baseline() {
        let store = Arc::new(MemoryRatingStore::new());
        let settings = RatingSettings {
            baseline_rating: 1500.0,
            k_factor: 10.0,
            decimal_places: None,
        };
        let updater = RatingUpdater::new(store, settings);

        let outcome = updater.record_comparison(1, 1, 2).unwrap();

        assert_eq!(outcome.winner.value, 1505.0);
        assert_eq!(outcome.loser.value, 1495.0);
    }
}
