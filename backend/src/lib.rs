pub mod assembler;
pub mod distance;
pub mod error;
pub mod gpx_export;
pub mod graph;
pub mod models;
pub mod planner;
pub mod search;
pub mod waypoints;

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;

use crate::error::RouteError;
use crate::gpx_export::encode_route_as_gpx;
use crate::models::{
    ApiError, PreferencesRequest, RouteDescriptor, RouteEnvelope, RouteOptions, RouteRequest,
    RouteResponse,
};
use crate::planner::RoutePlanner;

#[derive(Clone)]
pub struct AppState {
    pub planner: Arc<RoutePlanner>,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/routes/calculate", post(calculate_handler))
        .route("/api/routes/preferences", post(preferences_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

type ApiResult<T> = Result<T, (StatusCode, Json<ApiError>)>;

async fn health_handler() -> &'static str {
    "ok"
}

async fn calculate_handler(
    State(state): State<AppState>,
    payload: Result<Json<RouteRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(req) = payload.map_err(bad_request)?;
    let algorithm = req.algorithm.unwrap_or(state.planner.default_algorithm());

    let route = state
        .planner
        .compute_route(&req.source, &req.destination, algorithm, &req.options())
        .map_err(route_error)?;

    envelope(route, None).map(Json)
}

async fn preferences_handler(
    State(state): State<AppState>,
    payload: Result<Json<PreferencesRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(req) = payload.map_err(bad_request)?;

    let route = state
        .planner
        .compute_route_with_preferences(&req.source, &req.destination, &req.preferences)
        .map_err(route_error)?;

    envelope(route, Some(req.preferences)).map(Json)
}

fn envelope(
    route: RouteDescriptor,
    preferences: Option<RouteOptions>,
) -> ApiResult<RouteEnvelope> {
    let gpx_base64 = encode_route_as_gpx(&route).map_err(route_error)?;
    Ok(RouteEnvelope {
        success: true,
        route: RouteResponse {
            route,
            gpx_base64,
            preferences,
        },
    })
}

fn bad_request(rejection: JsonRejection) -> (StatusCode, Json<ApiError>) {
    route_error(RouteError::InvalidInput(rejection.body_text()))
}

fn route_error(err: RouteError) -> (StatusCode, Json<ApiError>) {
    let status = match &err {
        RouteError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        RouteError::NoPathFound { .. } => StatusCode::NOT_FOUND,
        RouteError::Internal(_) | RouteError::Gpx(_) => {
            tracing::error!("route request failed: {err}");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (
        status,
        Json(ApiError {
            message: err.to_string(),
        }),
    )
}
