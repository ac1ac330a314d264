//! HTTP surface for the engagement summary.
//!
//! Authentication happens upstream; the identity provider forwards the
//! verified user id in the `x-user-id` header.

use std::net::SocketAddr;

use axum::{
    async_trait,
    extract::{FromRequestParts, State},
    http::request::Parts,
    routing::get,
    Json, Router,
};
use tower_http::trace::TraceLayer;
use tracing::info;
use uuid::Uuid;

use crate::error::SummaryError;
use crate::models::EngagementSummary;
use crate::summary::SummaryService;

pub const USER_ID_HEADER: &str = "x-user-id";

/// Caller identity taken from the authenticated request.
#[derive(Debug, Clone, Copy)]
pub struct CallerId(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for CallerId
where
    S: Send + Sync,
{
    type Rejection = SummaryError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| Uuid::parse_str(value.trim()).ok())
            .map(CallerId)
            .ok_or(SummaryError::Unauthenticated)
    }
}

async fn summary_handler(
    State(service): State<SummaryService>,
    CallerId(user_id): CallerId,
) -> Result<Json<EngagementSummary>, SummaryError> {
    let summary = service.user_summary(user_id).await?;
    Ok(Json(summary))
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

pub fn build_router(service: SummaryService) -> Router {
    Router::new()
        .route("/summary", get(summary_handler))
        .route("/health", get(health_handler))
        .with_state(service)
        .layer(TraceLayer::new_for_http())
}

pub async fn serve(addr: SocketAddr, service: SummaryService) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("summary API listening on http://{}", listener.local_addr()?);

    axum::serve(listener, build_router(service))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown signal received");
        })
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::summary::tests::{active_store, user, FakeStore, Query};
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    fn router(store: FakeStore) -> Router {
        build_router(SummaryService::new(Arc::new(store)))
    }

    async fn request_summary(
        app: Router,
        user_header: Option<&str>,
    ) -> (StatusCode, serde_json::Value) {
        let mut request = Request::builder().uri("/summary");
        if let Some(value) = user_header {
            request = request.header(USER_ID_HEADER, value);
        }
        let response = app
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn returns_summary_for_authenticated_caller() {
        let caller = user().to_string();
        let (status, body) = request_summary(router(active_store()), Some(&caller)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["group"], "ex");
        assert!(body["streak"].is_u64());
        for key in ["consistency", "weeklyProgress", "totalCompleted"] {
            assert!(body.get(key).is_some(), "missing {key}");
        }
        for key in ["dailyDone", "weeklyDone", "monthlyDone"] {
            assert!(body["status"][key].is_boolean(), "missing status.{key}");
        }
    }

    #[tokio::test]
    async fn rejects_missing_or_malformed_identity() {
        let (status, body) = request_summary(router(active_store()), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Unauthorized");

        let (status, _) = request_summary(router(active_store()), Some("not-a-uuid")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn store_failure_returns_generic_500_without_partial_summary() {
        let store = FakeStore {
            fail_on: Some(Query::VoiceRecordings),
            ..active_store()
        };
        let caller = user().to_string();
        let (status, body) = request_summary(router(store), Some(&caller)).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, serde_json::json!({ "error": "Internal server error" }));
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let response = router(FakeStore::default())
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
