//! HTTP route handlers.

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::cache::PlannerError;
use crate::domain::{LegId, StopId};
use crate::planner::{EngineConfig, PlanError};

use super::dto::*;
use super::state::AppState;

/// Longest route a single plan request may ask for.
const MAX_ROUTE_STOPS: usize = 8;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/stops/search", get(search_stops))
        .route("/api/stops/destinations", get(destinations))
        .route("/itinerary/plan", post(plan_itinerary))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Search stops by name.
async fn search_stops(
    State(state): State<AppState>,
    Query(req): Query<StopSearchRequest>,
) -> Json<StopSearchResponse> {
    let limit = req.limit.unwrap_or(10).min(50);
    let stops = state
        .feed()
        .search_stops(&req.q, limit)
        .into_iter()
        .map(StopResult::from_stop)
        .collect();

    Json(StopSearchResponse { stops })
}

/// Stops reachable by a direct trip, from one stop or from anywhere.
async fn destinations(
    State(state): State<AppState>,
    Query(req): Query<DestinationsRequest>,
) -> Result<Json<DestinationsResponse>, AppError> {
    let from = req
        .from
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map(|s| parse_stop(&state, s))
        .transpose()?;

    let feed = state.feed();
    let stops = feed
        .destinations_from(from.as_ref())
        .iter()
        .filter_map(|id| feed.stop(id))
        .map(StopResult::from_stop)
        .collect();

    Ok(Json(DestinationsResponse {
        from: from.map(|s| s.to_string()),
        stops,
    }))
}

/// Plan an itinerary through the requested stops.
async fn plan_itinerary(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<PlanItineraryResponse>, AppError> {
    // Parse JSON manually so we can log the body on failure
    let req: PlanItineraryRequest = serde_json::from_slice(&body).map_err(|e| {
        warn!(error = %e, body = %String::from_utf8_lossy(&body), "invalid plan request");
        AppError::BadRequest {
            message: format!("Invalid JSON: {e}"),
        }
    })?;

    let start = parse_instant(&req.start).map_err(|e| AppError::BadRequest {
        message: format!("Invalid start time {:?}: {e}", req.start),
    })?;

    if req.stops.len() > MAX_ROUTE_STOPS {
        return Err(AppError::BadRequest {
            message: format!(
                "At most {MAX_ROUTE_STOPS} stops per route, got {}",
                req.stops.len()
            ),
        });
    }
    let stops = req
        .stops
        .iter()
        .map(|s| parse_stop(&state, s))
        .collect::<Result<Vec<StopId>, AppError>>()?;

    let config = EngineConfig {
        drive_multipliers: req
            .drive_multipliers
            .unwrap_or_else(|| state.config.drive_multipliers.clone()),
        disembark_time_mins: req
            .disembark_time_mins
            .unwrap_or(state.config.disembark_time_mins),
        max_ferry_options: req
            .max_ferry_options
            .unwrap_or(state.config.max_ferry_options),
    };
    config.validate().map_err(PlanError::from)?;

    let itinerary = state.planner.plan(&config, start, &stops).await?;
    info!(
        %start,
        stops = stops.len(),
        legs = itinerary.leg_count(),
        errors = itinerary.error_count(),
        cached = state.planner.cache_entry_count(),
        "planned itinerary"
    );

    let mut response = PlanItineraryResponse::from_itinerary(&itinerary);
    if let Some(raw) = req.highlight.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        let chain = itinerary
            .chain_of(&LegId::from_raw(raw))
            .ok_or_else(|| AppError::BadRequest {
                message: format!("Unknown leg: {raw}"),
            })?;
        response.highlighted = Some(chain.iter().map(LegId::to_string).collect());
    }

    Ok(Json(response))
}

/// Parse a stop id and check the feed knows it.
fn parse_stop(state: &AppState, raw: &str) -> Result<StopId, AppError> {
    let id = StopId::new(raw.trim()).map_err(|e| AppError::BadRequest {
        message: e.to_string(),
    })?;
    if state.feed().stop(&id).is_none() {
        return Err(AppError::BadRequest {
            message: format!("Unknown stop: {id}"),
        });
    }
    Ok(id)
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
            PlanError::UnknownStop(_) | PlanError::Config(_) => AppError::BadRequest {
                message: e.to_string(),
            },
        }
    }
}

impl From<PlannerError> for AppError {
    fn from(e: PlannerError) -> Self {
        match e {
            PlannerError::Plan(e) => e.into(),
            PlannerError::Task(e) => AppError::Internal {
                message: format!("Planning failed: {e}"),
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
