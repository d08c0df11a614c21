use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use crate::api::handlers::{
    legacy::{legacy_compare, legacy_rankings},
    rankings::{get_next_pair, get_rankings, post_compare},
    AppState,
};

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/users/:user_id/rankings", get(get_rankings))
        .route("/api/users/:user_id/compare", post(post_compare))
        .route("/api/users/:user_id/next-pair", get(get_next_pair))
        .route("/store_rankings", get(legacy_rankings))
        .route("/compare_store", post(legacy_compare))
        .with_state(state)
}
