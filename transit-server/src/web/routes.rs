//! HTTP route handlers.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use geojson::FeatureCollection;
use tower_http::cors::CorsLayer;
use tracing::{debug, error, warn};

use crate::planner::{PlanError, Planner, Priority, search_with_widening};

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/find", get(find))
        .route("/network", get(network))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Find ranked trips between two points, widening the walking radius if
/// nothing is found nearby.
async fn find(
    State(state): State<AppState>,
    Query(req): Query<FindRequest>,
) -> Result<Json<FindResponse>, AppError> {
    let source = parse_point(&req.src).map_err(|message| AppError::BadRequest {
        message: format!("Invalid src: {message}"),
    })?;
    let destination = parse_point(&req.dest).map_err(|message| AppError::BadRequest {
        message: format!("Invalid dest: {message}"),
    })?;
    let priority = match req.priority.as_deref() {
        None | Some("") => Priority::default(),
        Some(raw) => raw
            .parse::<Priority>()
            .map_err(|message| AppError::BadRequest { message })?,
    };

    // Plan from the cache's rounded coordinates so cached answers match
    let (source, destination) = (state.cache.snap(source), state.cache.snap(destination));
    let key = state.cache.key(source, destination, priority);
    if let Some(cached) = state.cache.get(&key).await {
        debug!(%source, %destination, %priority, "cache hit");
        return Ok(Json(FindResponse::from_search(&cached)));
    }

    // Planning is CPU-bound
    let model = state.model.clone();
    let config = state.config.clone();
    let search = tokio::task::spawn_blocking(move || {
        let planner = Planner::new(&model, &config);
        search_with_widening(&planner, source, destination, priority)
    })
    .await
    .map_err(|e| AppError::Internal {
        message: format!("Planner task failed: {e}"),
    })??;

    let search = Arc::new(search);
    state.cache.insert(key, search.clone()).await;

    Ok(Json(FindResponse::from_search(&search)))
}

/// The whole route network as GeoJSON.
async fn network(State(state): State<AppState>) -> Json<FeatureCollection> {
    Json(state.model.to_feature_collection())
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    Internal { message: String },
}

impl From<PlanError> for AppError {
    fn from(e: PlanError) -> Self {
        match e {
            PlanError::InvalidRequest(message) => AppError::BadRequest { message },
            _ => AppError::Internal {
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            warn!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheConfig, PlanCache};
    use crate::geometry::Point;
    use crate::network::{NetworkModel, Weighting};
    use crate::planner::PlannerConfig;
    use crate::route::Route;

    fn state() -> AppState {
        let config = PlannerConfig::default();
        let routes = vec![
            Route::line("A", vec![Point::new(0.0, 0.0), Point::new(0.0, 1.0)]),
            Route::line("B", vec![Point::new(0.0, 1.0), Point::new(0.0, 2.0)]),
        ];
        let model = NetworkModel::generate(routes, Weighting::Walkability, &config).unwrap();
        AppState::new(model, config, PlanCache::new(&CacheConfig::default()))
    }

    fn request(src: &str, dest: &str, priority: Option<&str>) -> Query<FindRequest> {
        Query(FindRequest {
            src: src.to_string(),
            dest: dest.to_string(),
            priority: priority.map(str::to_string),
        })
    }

    #[tokio::test]
    async fn health_is_ok() {
        assert_eq!(health().await, "ok");
    }

    #[tokio::test]
    async fn find_returns_ranked_trips() {
        let state = state();
        let Json(response) = find(State(state.clone()), request("0,0", "0,2", None))
            .await
            .unwrap();

        assert_eq!(response.source, vec!["A"]);
        assert_eq!(response.destination, vec!["B"]);
        assert_eq!(response.attempts, 1);
        assert_eq!(response.output.len(), 1);
        assert_eq!(response.output[0].features.len(), 2);

        let key = state
            .cache
            .key(Point::new(0.0, 0.0), Point::new(0.0, 2.0), Priority::Fare);
        assert!(state.cache.get(&key).await.is_some());
    }

    #[tokio::test]
    async fn find_reports_widened_radius() {
        let Json(response) = find(State(state()), request("0,0", "0,2.006", Some("distance")))
            .await
            .unwrap();

        assert_eq!(response.attempts, 2);
        assert_eq!(response.radius.source, 0.5);
        assert!((response.radius.destination - 0.7).abs() < 1e-9);
        assert_eq!(response.output.len(), 1);
    }

    #[tokio::test]
    async fn nearby_requests_get_the_same_answer() {
        let shared = state();
        let Json(first) = find(State(shared.clone()), request("0.000004,0", "0,2", None))
            .await
            .unwrap();
        let Json(second) = find(State(shared.clone()), request("-0.000002,0.000003", "0,2", None))
            .await
            .unwrap();
        let Json(exact) = find(State(state()), request("0,0", "0,2", None))
            .await
            .unwrap();

        // Both nearby requests were planned from the rounded point
        let first = serde_json::to_value(first).unwrap();
        assert_eq!(first, serde_json::to_value(second).unwrap());
        assert_eq!(first, serde_json::to_value(exact).unwrap());
    }

    #[tokio::test]
    async fn find_rejects_bad_coordinates() {
        let result = find(State(state()), request("0,0", "95,2", None)).await;
        assert!(matches!(result, Err(AppError::BadRequest { .. })));

        let result = find(State(state()), request("nowhere", "0,2", None)).await;
        assert!(matches!(result, Err(AppError::BadRequest { .. })));
    }

    #[tokio::test]
    async fn find_rejects_unknown_priority() {
        let result = find(State(state()), request("0,0", "0,2", Some("SPEED"))).await;
        assert!(matches!(result, Err(AppError::BadRequest { .. })));
    }

    #[tokio::test]
    async fn network_lists_every_route() {
        let Json(collection) = network(State(state())).await;
        assert_eq!(collection.features.len(), 2);
    }

    #[test]
    fn errors_map_to_status_codes() {
        let bad = AppError::from(PlanError::InvalidRequest("nope".into())).into_response();
        assert_eq!(bad.status(), StatusCode::BAD_REQUEST);

        let internal = AppError::from(PlanError::Network(crate::network::NetworkError::UnknownNode(
            "X".into(),
        )))
        .into_response();
        assert_eq!(internal.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
