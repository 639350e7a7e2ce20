//! HTTP mapping of [`MovieStatsError`].
//!
//! Bad selections are the client's fault (400); anything else that fails
//! while answering a request is ours (500).

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use movie_stats::MovieStatsError;
use tracing::{error, warn};

/// Status code for a request that failed with `err`.
pub fn status_for(err: &MovieStatsError) -> StatusCode {
    if err.is_client_error() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

/// Log a request error at a level matching its status.
pub fn log_request_error(err: &MovieStatsError) {
    if err.is_client_error() {
        warn!("Rejected request: {}", err);
    } else {
        error!("Request failed: {}", err);
    }
}

/// JSON error response: `{"code": ..., "message": ...}`.
pub struct ApiError(pub MovieStatsError);

impl From<MovieStatsError> for ApiError {
    fn from(err: MovieStatsError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        log_request_error(&self.0);
        (status_for(&self.0), Json(self.0)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_for() {
        let invalid = MovieStatsError::invalid_selection("metric", "votes");
        assert_eq!(status_for(&invalid), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_for(&invalid.with_context("Resolving request")),
            StatusCode::BAD_REQUEST
        );

        let render = MovieStatsError::Render("backend".to_string());
        assert_eq!(status_for(&render), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_api_error_status() {
        let response = ApiError(MovieStatsError::UnknownCode("qq".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
