use crate::services::ranking::RankingService;

pub mod legacy;
pub mod rankings;

pub struct AppState {
    pub service: RankingService,
}
