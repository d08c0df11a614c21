use serde::{Deserialize, Serialize};

use crate::domain::models::{StoreCategory, StoreInfo};
use crate::rating::{Rating, StoreId, UserId};
use crate::services::ranking::{NextComparison, RankingEntry, RankingSnapshot};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingItem {
    pub rank: usize,
    pub store_id: StoreId,
    pub name: String,
    pub category: StoreCategory,
    pub rating: f64,
    pub comparisons: u32,
}

impl From<RankingEntry> for RankingItem {
    fn from(entry: RankingEntry) -> Self {
        Self {
            rank: entry.ranked.rank,
            store_id: entry.store.id,
            name: entry.store.name,
            category: entry.store.category,
            rating: entry.ranked.rating,
            comparisons: entry.ranked.comparisons,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingsResponse {
    pub items: Vec<RankingItem>,
    pub ranked: usize,
    pub candidates: usize,
    pub complete: bool,
}

impl From<RankingSnapshot> for RankingsResponse {
    fn from(snapshot: RankingSnapshot) -> Self {
        Self {
            ranked: snapshot.progress.ranked,
            candidates: snapshot.progress.candidates,
            complete: snapshot.progress.is_complete(),
            items: snapshot.entries.into_iter().map(RankingItem::from).collect(),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareRequest {
    pub winner_store_id: StoreId,
    pub loser_store_id: StoreId,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingView {
    pub store_id: StoreId,
    pub rating: f64,
    pub comparisons: u32,
}

impl From<Rating> for RatingView {
    fn from(rating: Rating) -> Self {
        Self {
            store_id: rating.store_id,
            rating: rating.value,
            comparisons: rating.comparisons,
        }
    }
}

#[derive(Serialize)]
pub struct CompareResponse {
    pub winner: RatingView,
    pub loser: RatingView,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreView {
    pub store_id: StoreId,
    pub name: String,
    pub category: StoreCategory,
}

impl From<StoreInfo> for StoreView {
    fn from(store: StoreInfo) -> Self {
        Self {
            store_id: store.id,
            name: store.name,
            category: store.category,
        }
    }
}

#[derive(Deserialize, Default)]
pub struct NextPairParams {
    /// Keep handing out pairs once every store is ranked
    #[serde(default)]
    pub refine: bool,
}

#[derive(Serialize)]
#[serde(tag = "status", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum NextPairResponse {
    Pair { store_a: StoreView, store_b: StoreView },
    Complete,
    InsufficientStores,
}

impl From<NextComparison> for NextPairResponse {
    fn from(next: NextComparison) -> Self {
        match next {
            NextComparison::Pair(a, b) => NextPairResponse::Pair {
                store_a: a.into(),
                store_b: b.into(),
            },
            NextComparison::Complete => NextPairResponse::Complete,
            NextComparison::InsufficientStores => NextPairResponse::InsufficientStores,
        }
    }
}

// Shapes used by the first version of the wardrobe frontend

#[derive(Deserialize)]
pub struct LegacyRankingsParams {
    pub user_id: UserId,
}

#[derive(Serialize)]
pub struct LegacyRanking {
    pub id: StoreId,
    pub name: String,
    pub store_type: StoreCategory,
    pub current_elo: f64,
}

impl From<RankingEntry> for LegacyRanking {
    fn from(entry: RankingEntry) -> Self {
        Self {
            id: entry.store.id,
            name: entry.store.name,
            store_type: entry.store.category,
            current_elo: entry.ranked.rating,
        }
    }
}

#[derive(Deserialize)]
pub struct LegacyCompareRequest {
    pub user_id: UserId,
    pub winner_store_id: StoreId,
    pub loser_store_id: StoreId,
}

#[derive(Serialize)]
pub struct LegacyCompareResponse {
    pub winner_new_score: f64,
    pub loser_new_score: f64,
}
