//! Data transfer objects for web requests and responses.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{NaiveDateTime, ParseError};
use serde::{Deserialize, Serialize};

use crate::domain::{Leg, LegId, Stop};
use crate::planner::{Itinerary, PathSummary};

/// Format used for instants in responses.
const INSTANT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Request to search stops by name.
#[derive(Debug, Deserialize)]
pub struct StopSearchRequest {
    /// Search query
    pub q: String,

    /// Maximum number of results (default 10, capped at 50)
    pub limit: Option<usize>,
}

/// Request for the stops reachable by a direct trip.
#[derive(Debug, Deserialize)]
pub struct DestinationsRequest {
    /// Origin stop; without it, every stop with a departure is returned
    pub from: Option<String>,
}

/// A stop in responses.
#[derive(Debug, Serialize)]
pub struct StopResult {
    pub id: String,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

/// Response for stop search.
#[derive(Debug, Serialize)]
pub struct StopSearchResponse {
    pub stops: Vec<StopResult>,
}

/// Response for destination lookup.
#[derive(Debug, Serialize)]
pub struct DestinationsResponse {
    pub from: Option<String>,
    pub stops: Vec<StopResult>,
}

/// Request to plan an itinerary.
///
/// Engine parameters left out fall back to the server defaults.
#[derive(Debug, Deserialize)]
pub struct PlanItineraryRequest {
    /// Departure instant, `YYYY-MM-DDTHH:MM` or `YYYY-MM-DDTHH:MM:SS`
    pub start: String,

    /// Stop ids to visit, in order
    pub stops: Vec<String>,

    pub drive_multipliers: Option<Vec<f64>>,

    pub disembark_time_mins: Option<u32>,

    pub max_ferry_options: Option<usize>,

    /// Leg id whose chain of following legs should be reported
    pub highlight: Option<String>,
}

/// A leg and everything that can follow it.
#[derive(Debug, Serialize)]
pub struct LegResult {
    pub id: String,

    /// "drive", "ferry" or "error"
    pub kind: String,

    pub text: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub trip_id: Option<String>,

    pub from: String,

    pub to: String,

    pub start: String,

    pub end: String,

    pub duration_mins: i64,

    /// Minutes between the previous leg's end and this leg's start
    pub wait_mins: i64,

    pub children: Vec<LegResult>,
}

/// One complete option through the tree.
#[derive(Debug, Serialize)]
pub struct PathResult {
    pub leg_ids: Vec<String>,
    pub departure: String,
    pub arrival: String,
    pub travel_mins: i64,
    pub waiting_mins: i64,
    pub total_mins: i64,
    /// False if the path ends at an unreachable stop pair
    pub complete: bool,
}

/// Response for itinerary planning.
#[derive(Debug, Serialize)]
pub struct PlanItineraryResponse {
    pub start: String,
    pub stops: Vec<String>,
    pub legs: Vec<LegResult>,
    /// For each leg id, the ids of legs that come before it
    pub ancestors: BTreeMap<String, Vec<String>>,
    /// For each leg id, the ids of legs that come after it
    pub descendants: BTreeMap<String, Vec<String>>,
    pub paths: Vec<PathResult>,
    pub leg_count: usize,
    pub error_count: usize,
    /// The requested leg and every leg after it, if a highlight was asked for
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlighted: Option<Vec<String>>,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

// Conversion implementations

impl StopResult {
    pub fn from_stop(stop: &Stop) -> Self {
        Self {
            id: stop.id.to_string(),
            name: stop.name.clone(),
            lat: stop.location.lat,
            lon: stop.location.lon,
        }
    }
}

impl LegResult {
    /// Convert a leg subtree. `previous_end` is the parent's end, if any.
    pub fn from_leg(leg: &Leg, previous_end: Option<NaiveDateTime>) -> Self {
        let wait_mins = previous_end
            .map(|end| leg.start().signed_duration_since(end).num_minutes().max(0))
            .unwrap_or(0);

        Self {
            id: leg.id().to_string(),
            kind: leg.kind().to_string(),
            text: leg.text().to_string(),
            remark: leg.remark().map(str::to_string),
            trip_id: leg.trip_id().map(|t| t.to_string()),
            from: leg.from().to_string(),
            to: leg.to().to_string(),
            start: format_instant(leg.start()),
            end: format_instant(leg.end()),
            duration_mins: leg.duration().num_minutes(),
            wait_mins,
            children: leg
                .children()
                .iter()
                .map(|child| LegResult::from_leg(child, Some(leg.end())))
                .collect(),
        }
    }
}

impl PathResult {
    pub fn from_path(path: &PathSummary) -> Self {
        Self {
            leg_ids: path.leg_ids.iter().map(LegId::to_string).collect(),
            departure: format_instant(path.departure),
            arrival: format_instant(path.arrival),
            travel_mins: path.travel.num_minutes(),
            waiting_mins: path.waiting.num_minutes(),
            total_mins: path.total().num_minutes(),
            complete: path.complete,
        }
    }
}

impl PlanItineraryResponse {
    pub fn from_itinerary(itinerary: &Itinerary) -> Self {
        let relations = itinerary.relations();
        Self {
            start: format_instant(itinerary.start()),
            stops: itinerary.stops().iter().map(|s| s.to_string()).collect(),
            legs: itinerary
                .legs()
                .iter()
                .map(|leg| LegResult::from_leg(leg, None))
                .collect(),
            ancestors: relation_map(relations.ancestors()),
            descendants: relation_map(relations.descendants()),
            paths: itinerary.paths().iter().map(PathResult::from_path).collect(),
            leg_count: itinerary.leg_count(),
            error_count: itinerary.error_count(),
            highlighted: None,
        }
    }
}

fn relation_map(map: &BTreeMap<LegId, BTreeSet<LegId>>) -> BTreeMap<String, Vec<String>> {
    map.iter()
        .map(|(id, related)| {
            (
                id.to_string(),
                related.iter().map(LegId::to_string).collect(),
            )
        })
        .collect()
}

fn format_instant(instant: NaiveDateTime) -> String {
    instant.format(INSTANT_FORMAT).to_string()
}

/// Parse a request instant, with or without seconds.
pub fn parse_instant(s: &str) -> Result<NaiveDateTime, ParseError> {
    let s = s.trim();
    NaiveDateTime::parse_from_str(s, INSTANT_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M"))
}
