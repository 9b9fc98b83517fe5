//! In-memory schedule feed.
//!
//! Holds the already-decoded feed (stops, trips, stop visits, service
//! calendar) and the indices the planner queries. The feed is built once
//! and read concurrently afterwards; nothing in it changes during planning.

mod calendar;
mod error;
mod snapshot;
mod trips;

use std::collections::{BTreeSet, HashMap};

use chrono::NaiveDate;
use tracing::debug;

use crate::domain::{DomainError, Stop, StopId, StopVisit, Trip, TripId};

pub use calendar::ServiceCalendar;
pub use error::FeedError;
pub use snapshot::{
    CalendarDateRecord, CalendarRecord, FeedSnapshot, StopRecord, StopTimeRecord, TripRecord,
};
pub use trips::DirectTrip;

/// Ordered stop pair used as the direct-trip index key.
type StopPair = (StopId, StopId);

/// A decoded schedule feed.
#[derive(Debug, Clone)]
pub struct Feed {
    stops: HashMap<StopId, Stop>,
    trips: HashMap<TripId, Trip>,
    stop_visits: HashMap<TripId, Vec<StopVisit>>,
    calendar: ServiceCalendar,
    /// Trips with exactly two stop visits, keyed by (first stop, second stop),
    /// in feed order.
    direct_pairs: HashMap<StopPair, Vec<TripId>>,
}

impl Feed {
    /// Build a feed and its direct-trip index.
    ///
    /// `trips` order is preserved as the order in which trips are offered
    /// for a stop pair. Stop visits are sorted by stop sequence within each trip.
    ///
    /// # Errors
    ///
    /// Returns `Err` if a stop visit references a trip not in `trips`.
    pub fn new(
        stops: Vec<Stop>,
        trips: Vec<Trip>,
        visits: Vec<(TripId, StopVisit)>,
        calendar: ServiceCalendar,
    ) -> Result<Self, DomainError> {
        let trip_order: Vec<TripId> = trips.iter().map(|t| t.id.clone()).collect();
        let trips: HashMap<TripId, Trip> = trips.into_iter().map(|t| (t.id.clone(), t)).collect();

        let mut stop_visits: HashMap<TripId, Vec<StopVisit>> = HashMap::new();
        for (trip_id, visit) in visits {
            if !trips.contains_key(&trip_id) {
                return Err(DomainError::UnknownTrip(trip_id));
            }
            stop_visits.entry(trip_id).or_default().push(visit);
        }
        for sequence in stop_visits.values_mut() {
            sequence.sort_by_key(|v| v.sequence);
        }

        let mut direct_pairs: HashMap<StopPair, Vec<TripId>> = HashMap::new();
        let mut skipped = 0usize;
        for trip_id in trip_order {
            match stop_visits.get(&trip_id).map(Vec::as_slice) {
                Some([first, second]) => {
                    direct_pairs
                        .entry((first.stop_id.clone(), second.stop_id.clone()))
                        .or_default()
                        .push(trip_id);
                }
                _ => skipped += 1,
            }
        }
        if skipped > 0 {
            debug!(skipped, "trips without exactly two stop visits left out of the direct-trip index");
        }

        Ok(Self {
            stops: stops.into_iter().map(|s| (s.id.clone(), s)).collect(),
            trips,
            stop_visits,
            calendar,
            direct_pairs,
        })
    }

    /// Look up a stop by id.
    pub fn stop(&self, id: &StopId) -> Option<&Stop> {
        self.stops.get(id)
    }

    /// Look up a trip by id.
    pub fn trip(&self, id: &TripId) -> Option<&Trip> {
        self.trips.get(id)
    }

    /// Stop visits of a trip, in stop-sequence order.
    pub fn stop_visits(&self, id: &TripId) -> &[StopVisit] {
        self.stop_visits.get(id).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn calendar(&self) -> &ServiceCalendar {
        &self.calendar
    }

    pub fn stops(&self) -> impl Iterator<Item = &Stop> {
        self.stops.values()
    }

    pub fn stop_count(&self) -> usize {
        self.stops.len()
    }

    pub fn trip_count(&self) -> usize {
        self.trips.len()
    }

    /// Number of trips usable for planning (exactly two stop visits).
    pub fn direct_trip_count(&self) -> usize {
        self.direct_pairs.values().map(Vec::len).sum()
    }

    /// Stops reachable by a direct trip.
    ///
    /// With `Some(stop)`, the destinations of direct trips leaving `stop`.
    /// With `None`, every stop that has at least one outgoing direct trip,
    /// i.e. the places a route can sensibly start from.
    pub fn destinations_from(&self, from: Option<&StopId>) -> BTreeSet<StopId> {
        self.direct_pairs
            .keys()
            .filter_map(|(origin, dest)| match from {
                None => Some(origin.clone()),
                Some(stop) if stop == origin => Some(dest.clone()),
                Some(_) => None,
            })
            .collect()
    }

    /// Search stops by name, case-insensitively.
    ///
    /// Prefix matches come first, then other substring matches; each group
    /// is sorted by name.
    pub fn search_stops(&self, query: &str, limit: usize) -> Vec<&Stop> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        let mut prefix = Vec::new();
        let mut contains = Vec::new();
        for stop in self.stops.values() {
            let name = stop.name.to_lowercase();
            if name.starts_with(&needle) {
                prefix.push(stop);
            } else if name.contains(&needle) {
                contains.push(stop);
            }
        }

        let by_name = |a: &&Stop, b: &&Stop| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id));
        prefix.sort_by(by_name);
        contains.sort_by(by_name);

        prefix.into_iter().chain(contains).take(limit).collect()
    }

    /// Drop calendar data that cannot apply on or after `cutoff`.
    pub fn retain_calendar_from(&mut self, cutoff: NaiveDate) {
        self.calendar.retain_from(cutoff);
    }
}
