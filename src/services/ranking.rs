use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use log::info;

use crate::config::settings::AppConfig;
use crate::database::{self, SqliteRatingStore, SqliteStoreCatalog};
use crate::domain::catalog::StoreCatalog;
use crate::domain::models::StoreInfo;
use crate::errors::{RankingError, RankingResult};
use crate::rating::{
    ComparisonOutcome, PairSelector, RankedStore, RankingProgress, RankingQuery, RatingStore,
    RatingUpdater, StoreId, UserId,
};

/// A ranked store joined with the catalog's display metadata
#[derive(Debug, Clone, PartialEq)]
pub struct RankingEntry {
    pub ranked: RankedStore,
    pub store: StoreInfo,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankingSnapshot {
    pub entries: Vec<RankingEntry>,
    pub progress: RankingProgress,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NextComparison {
    Pair(StoreInfo, StoreInfo),
    /// Every candidate store has at least one comparison
    Complete,
    /// Fewer than two candidate stores, nothing to compare
    InsufficientStores,
}

/// Entry point used by the HTTP handlers, the CLI and comparison sessions.
///
/// Joins the wardrobe catalog with the rating engine and checks comparisons
/// against the user's candidate stores before anything is written.
#[derive(Clone)]
pub struct RankingService {
    catalog: Arc<dyn StoreCatalog>,
    updater: RatingUpdater,
    selector: PairSelector,
    query: RankingQuery,
}

impl RankingService {
    pub fn new(catalog: Arc<dyn StoreCatalog>, ratings: Arc<dyn RatingStore>, config: &AppConfig) -> Self {
        Self {
            catalog,
            updater: RatingUpdater::new(ratings.clone(), config.rating.clone()),
            selector: PairSelector::new(ratings.clone()),
            query: RankingQuery::new(ratings),
        }
    }

    /// Service over the SQLite database named in the config, creating the
    /// schema if it does not exist yet.
    pub fn open_sqlite(config: &AppConfig) -> Result<Self> {
        let pool = database::create_pool(&config.database)?;
        {
            let conn = database::get_connection(&pool)?;
            database::setup::initialize_schema(&conn)?;
        }
        info!("Using rating database at {}", config.database.path);

        Ok(Self::new(
            Arc::new(SqliteStoreCatalog::new(pool.clone())),
            Arc::new(SqliteRatingStore::new(pool)),
            config,
        ))
    }

    pub fn candidates(&self, user_id: UserId) -> RankingResult<Vec<StoreInfo>> {
        self.catalog.stores_for_user(user_id)
    }

    pub fn rankings(&self, user_id: UserId) -> RankingResult<RankingSnapshot> {
        let stores = self.candidates(user_id)?;
        let ids = store_ids(&stores);
        let ranked = self.query.rankings(user_id, &ids)?;

        let progress = RankingProgress {
            ranked: ranked.len(),
            candidates: ids.len(),
        };

        let mut by_id: HashMap<StoreId, StoreInfo> = stores.into_iter().map(|s| (s.id, s)).collect();
        let entries = ranked
            .into_iter()
            .filter_map(|ranked| {
                by_id
                    .remove(&ranked.store_id)
                    .map(|store| RankingEntry { ranked, store })
            })
            .collect();

        Ok(RankingSnapshot { entries, progress })
    }

    pub fn progress(&self, user_id: UserId) -> RankingResult<RankingProgress> {
        let ids = self.catalog.candidate_ids(user_id)?;
        self.selector.progress(user_id, &ids)
    }

    /// Validates and records one judgment.
    ///
    /// Identical ids are rejected before the catalog is consulted; stores
    /// outside the user's candidate set are rejected before any write.
    pub fn compare(&self, user_id: UserId, winner: StoreId, loser: StoreId) -> RankingResult<ComparisonOutcome> {
        if winner == loser {
            return Err(RankingError::InvalidComparison { store_id: winner });
        }

        let candidates = self.catalog.candidate_ids(user_id)?;
        for store_id in [winner, loser] {
            if !candidates.contains(&store_id) {
                return Err(RankingError::UnknownStore { user_id, store_id });
            }
        }

        self.updater.record_comparison(user_id, winner, loser)
    }

    /// Pair to present next, or why there is none.
    ///
    /// Once every candidate is ranked this reports `Complete` instead of a
    /// refinement pair; callers wanting to keep refining use [`Self::refinement_pair`].
    ///
    /// Completeness is checked first, so a user whose every store is ranked
    /// (including a user with no stores) sees `Complete` even with fewer than
    /// two candidates.
    pub fn next_comparison(&self, user_id: UserId) -> RankingResult<NextComparison> {
        let stores = self.candidates(user_id)?;
        let ids = store_ids(&stores);
        if self.selector.is_complete(user_id, &ids)? {
            return Ok(NextComparison::Complete);
        }

        self.pick(user_id, stores)
    }

    /// Pair to present regardless of completeness.
    pub fn refinement_pair(&self, user_id: UserId) -> RankingResult<NextComparison> {
        let stores = self.candidates(user_id)?;
        self.pick(user_id, stores)
    }

    fn pick(&self, user_id: UserId, stores: Vec<StoreInfo>) -> RankingResult<NextComparison> {
        let ids = store_ids(&stores);
        let Some((a, b)) = self.selector.next_pair(user_id, &ids)? else {
            return Ok(NextComparison::InsufficientStores);
        };

        let mut by_id: HashMap<StoreId, StoreInfo> = stores.into_iter().map(|s| (s.id, s)).collect();
        match (by_id.remove(&a), by_id.remove(&b)) {
            (Some(store_a), Some(store_b)) => Ok(NextComparison::Pair(store_a, store_b)),
            _ => Ok(NextComparison::InsufficientStores),
        }
    }
}

fn store_ids(stores: &[StoreInfo]) -> Vec<StoreId> {
    stores.iter().map(|s| s.id).collect()
}
