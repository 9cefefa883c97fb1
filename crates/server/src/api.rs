use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use ridewise_core::domain::profile::UserProfile;
use ridewise_core::domain::vehicle::{VehicleCandidate, VehicleId};
use ridewise_core::errors::{ApplicationError, InterfaceError};
use ridewise_core::recommendations::{
    RecommendationCategory, RecommendationRequest, RecommendationSet,
};

use crate::bootstrap::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/recommendations", post(recommend))
        .route("/api/v1/categories", get(list_categories))
        .route("/api/v1/vehicles/{id}", get(get_vehicle))
        .with_state(state)
}

/// Either an inline profile or the id of a stored one. An inline profile wins
/// when both are present.
#[derive(Debug, Deserialize)]
pub struct RecommendationPayload {
    #[serde(default)]
    pub profile: Option<UserProfile>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub anchor_id: Option<u64>,
    #[serde(default)]
    pub max_results: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct CategoryInfo {
    pub tag: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    pub correlation_id: String,
}

/// HTTP rendering of an [`InterfaceError`]. Details are only exposed for
/// caller mistakes.
#[derive(Debug)]
pub struct ApiError(InterfaceError);

impl From<InterfaceError> for ApiError {
    fn from(value: InterfaceError) -> Self {
        Self(value)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error = self.0;
        let (status, detail) = match &error {
            InterfaceError::BadRequest { message, .. } => {
                (StatusCode::BAD_REQUEST, Some(message.clone()))
            }
            InterfaceError::NotFound { message, .. } => {
                (StatusCode::NOT_FOUND, Some(message.clone()))
            }
            InterfaceError::ServiceUnavailable { .. } => (StatusCode::SERVICE_UNAVAILABLE, None),
            InterfaceError::Internal { .. } => (StatusCode::INTERNAL_SERVER_ERROR, None),
        };

        warn!(
            event_name = "api.request.failed",
            correlation_id = %error.correlation_id(),
            status = status.as_u16(),
            error = %error,
            "request failed"
        );

        let body = ErrorBody {
            error: error.user_message(),
            detail,
            correlation_id: error.correlation_id().to_string(),
        };
        (status, Json(body)).into_response()
    }
}

async fn recommend(
    State(state): State<AppState>,
    Json(payload): Json<RecommendationPayload>,
) -> Result<Json<RecommendationSet>, ApiError> {
    let correlation_id = Uuid::new_v4().to_string();
    let set = compute(&state, payload)
        .await
        .map_err(|error| ApiError::from(error.into_interface(correlation_id.clone())))?;

    info!(
        event_name = "api.recommendations.served",
        correlation_id = %correlation_id,
        categories = set.categories().count(),
        items = set.total_items(),
        "recommendations served"
    );
    Ok(Json(set))
}

async fn compute(
    state: &AppState,
    payload: RecommendationPayload,
) -> Result<RecommendationSet, ApplicationError> {
    let profile = match (payload.profile, payload.user_id) {
        (Some(profile), _) => profile,
        (None, Some(user_id)) => state
            .profiles
            .profile_for(&user_id)
            .await?
            .ok_or(ApplicationError::ProfileNotFound(user_id))?,
        (None, None) => {
            return Err(ApplicationError::InvalidRequest(
                "request must carry either `profile` or `user_id`".to_string(),
            ))
        }
    };

    let catalog = state.catalog.snapshot().await?;

    let mut request = RecommendationRequest::new(payload.categories);
    if let Some(anchor_id) = payload.anchor_id {
        let anchor_id = VehicleId(anchor_id);
        let anchor = catalog
            .iter()
            .find(|vehicle| vehicle.id == anchor_id)
            .cloned()
            .ok_or(ApplicationError::VehicleNotFound(anchor_id))?;
        request = request.with_anchor(anchor);
    }
    if let Some(max_results) = payload.max_results {
        request = request.with_max_results(max_results);
    }

    Ok(state.engine.compute_recommendations(&profile, &catalog, &request)?)
}

async fn list_categories() -> Json<Vec<CategoryInfo>> {
    Json(
        RecommendationCategory::ALL
            .iter()
            .map(|category| CategoryInfo {
                tag: category.as_str(),
                description: category.description(),
            })
            .collect(),
    )
}

async fn get_vehicle(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<VehicleCandidate>, ApiError> {
    let correlation_id = Uuid::new_v4().to_string();
    let vehicle_id = VehicleId(id);
    let lookup = state
        .catalog
        .find(vehicle_id)
        .await
        .map_err(ApplicationError::from)
        .and_then(|found| found.ok_or(ApplicationError::VehicleNotFound(vehicle_id)));

    lookup.map(Json).map_err(|error| ApiError::from(error.into_interface(correlation_id)))
}
