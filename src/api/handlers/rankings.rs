use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use log::debug;
use std::sync::Arc;

use crate::api::models::{CompareRequest, CompareResponse, NextPairParams, NextPairResponse, RankingsResponse};
use crate::errors::RankingError;
use crate::rating::UserId;
use super::AppState;

pub async fn get_rankings(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<UserId>,
) -> Result<Json<RankingsResponse>, RankingError> {
    let snapshot = state.service.rankings(user_id)?;
    Ok(Json(snapshot.into()))
}

pub async fn post_compare(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<UserId>,
    Json(request): Json<CompareRequest>,
) -> Result<Json<CompareResponse>, RankingError> {
    debug!(
        "user {} prefers store {} over {}",
        user_id, request.winner_store_id, request.loser_store_id
    );
    let outcome = state
        .service
        .compare(user_id, request.winner_store_id, request.loser_store_id)?;

    Ok(Json(CompareResponse {
        winner: outcome.winner.into(),
        loser: outcome.loser.into(),
    }))
}

pub async fn get_next_pair(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<UserId>,
    Query(params): Query<NextPairParams>,
) -> Result<Json<NextPairResponse>, RankingError> {
    let next = if params.refine {
        state.service.refinement_pair(user_id)?
    } else {
        state.service.next_comparison(user_id)?
    };
    Ok(Json(next.into()))
}
