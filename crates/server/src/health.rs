use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;

use crate::bootstrap::AppState;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub status: &'static str,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: HealthCheck,
    pub catalog: HealthCheck,
    pub checked_at: String,
}

pub fn router(state: AppState) -> Router {
    Router::new().route("/health", get(health)).with_state(state)
}

pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let catalog = catalog_check(&state).await;
    let ready = catalog.status == "ready";

    let payload = HealthResponse {
        status: if ready { "ready" } else { "degraded" },
        service: HealthCheck {
            status: "ready",
            detail: "ridewise-server runtime initialized".to_string(),
        },
        catalog,
        checked_at: Utc::now().to_rfc3339(),
    };

    let status_code = if ready { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (status_code, Json(payload))
}

/// An empty catalog still serves requests but has nothing to rank.
async fn catalog_check(state: &AppState) -> HealthCheck {
    match state.catalog.snapshot().await {
        Ok(vehicles) if vehicles.is_empty() => {
            HealthCheck { status: "degraded", detail: "catalog snapshot is empty".to_string() }
        }
        Ok(vehicles) => HealthCheck {
            status: "ready",
            detail: format!("catalog snapshot holds {} vehicles", vehicles.len()),
        },
        Err(error) => {
            HealthCheck { status: "degraded", detail: format!("catalog snapshot failed: {error}") }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{extract::State, http::StatusCode, Json};
    use ridewise_catalog::{demo_catalog, InMemoryCatalog, InMemoryProfileStore, JsonFileCatalog};
    use ridewise_core::recommendations::RecommendationEngine;

    use crate::bootstrap::AppState;
    use crate::health::health;

    fn state_with(catalog: Arc<dyn ridewise_catalog::CatalogProvider>) -> AppState {
        AppState {
            engine: RecommendationEngine::new(),
            catalog,
            profiles: Arc::new(InMemoryProfileStore::default()),
        }
    }

    #[tokio::test]
    async fn health_returns_ready_when_catalog_has_vehicles() {
        let state = state_with(Arc::new(InMemoryCatalog::with_vehicles(demo_catalog())));

        let (status, Json(payload)) = health(State(state)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload.status, "ready");
        assert_eq!(payload.catalog.status, "ready");
        assert_eq!(payload.catalog.detail, "catalog snapshot holds 12 vehicles");
    }

    #[tokio::test]
    async fn health_returns_service_unavailable_when_catalog_is_empty() {
        let state = state_with(Arc::new(InMemoryCatalog::default()));

        let (status, Json(payload)) = health(State(state)).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(payload.status, "degraded");
        assert_eq!(payload.service.status, "ready");
    }

    #[tokio::test]
    async fn health_reports_unreadable_catalog_as_degraded() {
        let state = state_with(Arc::new(JsonFileCatalog::new("missing/catalog.json")));

        let (status, Json(payload)) = health(State(state)).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(payload.catalog.detail.starts_with("catalog snapshot failed"));
    }
}
