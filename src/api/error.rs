use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::errors::RankingError;

impl RankingError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RankingError::InvalidComparison { .. } => StatusCode::BAD_REQUEST,
            RankingError::UnknownStore { .. } => StatusCode::NOT_FOUND,
            RankingError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            RankingError::StoreRejected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RankingError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("Request failed: {:?}", self);
        }
        (status, self.to_string()).into_response()
    }
}
