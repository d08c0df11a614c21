use axum::{
    extract::{Query, State},
    response::Json,
};
use std::sync::Arc;

use crate::api::models::{LegacyCompareRequest, LegacyCompareResponse, LegacyRanking, LegacyRankingsParams};
use crate::errors::RankingError;
use super::AppState;

pub async fn legacy_rankings(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LegacyRankingsParams>,
) -> Result<Json<Vec<LegacyRanking>>, RankingError> {
    let snapshot = state.service.rankings(params.user_id)?;
    Ok(Json(snapshot.entries.into_iter().map(LegacyRanking::from).collect()))
}

pub async fn legacy_compare(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LegacyCompareRequest>,
) -> Result<Json<LegacyCompareResponse>, RankingError> {
    let outcome = state
        .service
        .compare(request.user_id, request.winner_store_id, request.loser_store_id)?;

    Ok(Json(LegacyCompareResponse {
        winner_new_score: outcome.winner.value,
        loser_new_score: outcome.loser.value,
    }))
}
