//! Scheduled-trip lookup between two stops.

use chrono::NaiveDateTime;
use tracing::trace;

use super::Feed;
use crate::domain::{ClockTime, StopId, StopVisit, Trip};

/// A direct trip between two stops together with its two stop visits.
#[derive(Debug, Clone, Copy)]
pub struct DirectTrip<'a> {
    pub trip: &'a Trip,
    pub departure: &'a StopVisit,
    pub arrival: &'a StopVisit,
}

impl Feed {
    /// Direct trips from `origin` to `dest` usable at `at`.
    ///
    /// A trip qualifies if it has exactly two stop visits (`origin` then
    /// `dest`), its service operates on `at`'s date, and it departs no
    /// earlier than `at`'s time of day. Feed order is preserved.
    ///
    /// There is no day rollover: trips with a clock time at or past
    /// midnight, or arriving before they depart, are left out.
    pub fn trips_between(
        &self,
        origin: &StopId,
        dest: &StopId,
        at: NaiveDateTime,
    ) -> Vec<DirectTrip<'_>> {
        let Some(candidates) = self.direct_pairs.get(&(origin.clone(), dest.clone())) else {
            return Vec::new();
        };

        let services = self.calendar.valid_services(at.date());
        let earliest = ClockTime::of_instant(at);

        let trips: Vec<DirectTrip<'_>> = candidates
            .iter()
            .filter_map(|trip_id| {
                let trip = self.trips.get(trip_id)?;
                let [departure, arrival] = self.stop_visits(trip_id) else {
                    return None;
                };
                Some(DirectTrip {
                    trip,
                    departure,
                    arrival,
                })
            })
            .filter(|direct| services.contains(&direct.trip.service_id))
            .filter(|direct| within_day(direct))
            .filter(|direct| direct.departure.departure >= earliest)
            .collect();

        trace!(
            %origin,
            %dest,
            %at,
            candidates = candidates.len(),
            valid = trips.len(),
            "direct trip lookup"
        );

        trips
    }
}

fn within_day(direct: &DirectTrip<'_>) -> bool {
    let dep = direct.departure.departure;
    let arr = direct.arrival.arrival;
    !dep.is_past_midnight() && !arr.is_past_midnight() && arr >= dep
}
