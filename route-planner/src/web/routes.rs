//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use tracing::{debug, error};

use crate::planner::RouteFailure;

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/route", get(plan_route))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Plan a route between two coordinates.
///
/// Planning is CPU-bound and synchronous, so it runs on the blocking pool.
async fn plan_route(
    State(state): State<AppState>,
    Query(req): Query<RouteRequest>,
) -> Result<Json<ItineraryResult>, AppError> {
    debug!(?req, "route request");
    let planner = state.planner.clone();

    let itinerary = tokio::task::spawn_blocking(move || {
        planner.plan_route(req.start_lat, req.start_lon, req.end_lat, req.end_lon)
    })
    .await
    .map_err(|e| AppError::Internal {
        message: format!("planner task failed: {e}"),
    })??;

    Ok(Json(ItineraryResult::from_itinerary(&itinerary)))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Internal { message: String },
}

impl From<RouteFailure> for AppError {
    fn from(e: RouteFailure) -> Self {
        let message = e.to_string();
        match e {
            RouteFailure::InvalidCoordinate(_) => AppError::BadRequest { message },
            RouteFailure::Domain(_) => AppError::Internal { message },
            RouteFailure::NoRouteFound(_)
            | RouteFailure::NoCommonService(_)
            | RouteFailure::AmbiguousOrInvalidStop { .. }
            | RouteFailure::SameStop => AppError::NotFound { message },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            debug!(%status, %message, "request rejected");
        }

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
