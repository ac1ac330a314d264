use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SummaryError {
    /// Any failed read against the data store.
    #[error("data read failed: {0}")]
    Database(#[from] sqlx::Error),

    #[error("missing or invalid caller identity")]
    Unauthenticated,
}

pub type Result<T> = std::result::Result<T, SummaryError>;

impl IntoResponse for SummaryError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            SummaryError::Unauthenticated => (StatusCode::UNAUTHORIZED, "Unauthorized"),
            SummaryError::Database(err) => {
                tracing::error!(error = %err, "summary request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_errors_map_to_500() {
        let response = SummaryError::Database(sqlx::Error::PoolTimedOut).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn missing_identity_maps_to_401() {
        let response = SummaryError::Unauthenticated.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
