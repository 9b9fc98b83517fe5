//! Recursive itinerary expansion.
//!
//! Expands an ordered list of stop pairs into a tree of legs. Each pair is
//! served by scheduled trips if any are available, otherwise by a known
//! drive, otherwise it becomes an error leaf. Every option's end time is the
//! start time for the rest of the route, so the tree branches wherever a
//! pair has more than one option.

use chrono::{Duration, NaiveDateTime};
use tracing::{debug, trace, warn};

use crate::domain::{DomainError, Leg, Stop, StopId};
use crate::feed::{DirectTrip, Feed};
use crate::segments::SegmentMap;

use super::config::{ConfigError, EngineConfig};
use super::itinerary::Itinerary;

/// Error from itinerary planning.
///
/// Only configuration problems abort planning. An unreachable stop pair is
/// not an error; it shows up as an error leg in the tree.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlanError {
    /// The route names a stop that is not in the feed
    #[error("unknown stop: {0}")]
    UnknownStop(StopId),

    /// Engine parameters are unusable
    #[error("invalid engine configuration: {0}")]
    Config(#[from] ConfigError),
}

/// Read-only view of the schedule used during expansion.
///
/// This abstraction allows the engine to be tested with hand-built data.
pub trait Timetable {
    /// Look up a stop by id.
    fn stop(&self, id: &StopId) -> Option<&Stop>;

    /// Direct scheduled trips from `origin` to `dest` usable at `at`, in
    /// the order they should be offered.
    fn trips_between(
        &self,
        origin: &StopId,
        dest: &StopId,
        at: NaiveDateTime,
    ) -> Vec<DirectTrip<'_>>;
}

impl Timetable for Feed {
    fn stop(&self, id: &StopId) -> Option<&Stop> {
        Feed::stop(self, id)
    }

    fn trips_between(
        &self,
        origin: &StopId,
        dest: &StopId,
        at: NaiveDateTime,
    ) -> Vec<DirectTrip<'_>> {
        Feed::trips_between(self, origin, dest, at)
    }
}

/// Split a stop sequence into consecutive (from, to) pairs.
///
/// ```
/// use itinerary_server::domain::StopId;
/// use itinerary_server::planner::stop_pairs;
///
/// let stops: Vec<StopId> = ["a", "b", "c"].iter().map(|s| StopId::new(*s).unwrap()).collect();
/// let pairs = stop_pairs(&stops);
/// assert_eq!(pairs.len(), 2);
/// assert_eq!(pairs[1].0.as_str(), "b");
/// assert_eq!(pairs[1].1.as_str(), "c");
/// ```
pub fn stop_pairs(stops: &[StopId]) -> Vec<(StopId, StopId)> {
    stops
        .windows(2)
        .map(|w| (w[0].clone(), w[1].clone()))
        .collect()
}

/// Itinerary expansion engine.
pub struct Engine<'a, T: Timetable> {
    timetable: &'a T,
    segments: &'a SegmentMap,
    config: &'a EngineConfig,
}

impl<'a, T: Timetable> Engine<'a, T> {
    /// Create a new engine.
    pub fn new(timetable: &'a T, segments: &'a SegmentMap, config: &'a EngineConfig) -> Self {
        Self {
            timetable,
            segments,
            config,
        }
    }

    /// Plan a route visiting `stops` in order, leaving at `start`.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the configuration is invalid or any stop is missing
    /// from the timetable. Unreachable pairs are not errors.
    pub fn plan(&self, start: NaiveDateTime, stops: &[StopId]) -> Result<Itinerary, PlanError> {
        self.config.validate()?;
        if let Some(missing) = stops.iter().find(|id| self.timetable.stop(id).is_none()) {
            return Err(PlanError::UnknownStop(missing.clone()));
        }

        let pairs = stop_pairs(stops);
        debug!(%start, pairs = pairs.len(), "expanding itinerary");

        let legs = self.expand(start, &pairs);
        let itinerary = Itinerary::new(start, stops.to_vec(), legs);

        debug!(
            legs = itinerary.leg_count(),
            errors = itinerary.error_count(),
            "itinerary expanded"
        );
        Ok(itinerary)
    }

    /// Expand `pairs` starting at `start`, returning the options for the
    /// first pair with their continuations attached.
    pub fn expand(&self, start: NaiveDateTime, pairs: &[(StopId, StopId)]) -> Vec<Leg> {
        let Some(((from, to), rest)) = pairs.split_first() else {
            return Vec::new();
        };

        let ferries = self.ferry_options(start, from, to, rest);
        if !ferries.is_empty() {
            trace!(%from, %to, options = ferries.len(), "ferry options");
            return ferries;
        }

        if let Some(drives) = self.drive_options(start, from, to, rest) {
            trace!(%from, %to, options = drives.len(), "drive options");
            return drives;
        }

        debug!(%from, %to, %start, "no route for stop pair");
        vec![Leg::error(
            from.clone(),
            to.clone(),
            format!("no valid route: {} -> {}", self.stop_name(from), self.stop_name(to)),
            start,
        )]
    }

    /// One leg per scheduled trip, up to the configured cap.
    ///
    /// Trips whose times cannot be placed on the calendar are skipped and do
    /// not count towards the cap.
    fn ferry_options(
        &self,
        start: NaiveDateTime,
        from: &StopId,
        to: &StopId,
        rest: &[(StopId, StopId)],
    ) -> Vec<Leg> {
        let date = start.date();
        let disembark = self.config.disembark_time();

        self.timetable
            .trips_between(from, to, start)
            .into_iter()
            .filter_map(|direct| {
                let trip_id = &direct.trip.id;
                let departure = direct.departure.departure.on(date);
                let end = direct
                    .arrival
                    .arrival
                    .on(date)
                    .and_then(|arrival| arrival.checked_add_signed(disembark));
                let (Some(departure), Some(end)) = (departure, end) else {
                    warn!(trip = %trip_id, %date, "trip times out of range, skipping");
                    return None;
                };
                match Leg::ferry(
                    trip_id.clone(),
                    from.clone(),
                    to.clone(),
                    direct.trip.headsign.clone(),
                    departure,
                    end,
                ) {
                    Ok(leg) => Some(leg),
                    Err(e) => {
                        warn!(trip = %trip_id, "skipping trip: {e}");
                        None
                    }
                }
            })
            .take(self.config.max_ferry_options)
            .map(|leg| {
                let end = leg.end();
                leg.with_children(self.expand(end, rest))
            })
            .collect()
    }

    /// One leg per drive multiplier, or `None` if the pair has no known
    /// drive or no drive could be built.
    fn drive_options(
        &self,
        start: NaiveDateTime,
        from: &StopId,
        to: &StopId,
        rest: &[(StopId, StopId)],
    ) -> Option<Vec<Leg>> {
        let base_minutes = self.segments.minutes(from, to)?;

        // The last pair connects to nothing, so traffic scenarios are moot there
        let multipliers = if rest.is_empty() {
            vec![1.0]
        } else {
            self.config.unique_multipliers()
        };

        let text = format!("{} -> {}", self.stop_name(from), self.stop_name(to));
        let legs: Vec<Leg> = multipliers
            .into_iter()
            .filter_map(|multiplier| {
                let leg = scaled_minutes(base_minutes, multiplier)
                    .ok_or(DomainError::InvalidLeg("drive duration out of range"))
                    .and_then(|duration| {
                        Leg::drive(from.clone(), to.clone(), text.clone(), start, duration)
                    });
                let leg = match leg {
                    Ok(leg) => leg,
                    Err(e) => {
                        warn!(%from, %to, %start, multiplier, "skipping drive: {e}");
                        return None;
                    }
                };
                let leg = if multiplier != 1.0 {
                    leg.with_remark(format!("{:.1}x traffic adjustment", multiplier))
                } else {
                    leg
                };
                let end = leg.end();
                Some(leg.with_children(self.expand(end, rest)))
            })
            .collect();

        (!legs.is_empty()).then_some(legs)
    }

    fn stop_name(&self, id: &StopId) -> String {
        self.timetable
            .stop(id)
            .map(|s| s.name.clone())
            .unwrap_or_else(|| id.to_string())
    }
}

/// `minutes × multiplier`, rounded to the nearest second, or `None` if that
/// is not a representable duration.
fn scaled_minutes(minutes: u32, multiplier: f64) -> Option<Duration> {
    let seconds = (f64::from(minutes) * multiplier * 60.0).round();
    if !seconds.is_finite() || seconds < 0.0 || seconds >= i64::MAX as f64 {
        return None;
    }
    Duration::try_seconds(seconds as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scaled_minutes_rounds_to_seconds() {
        assert_eq!(scaled_minutes(30, 1.0), Some(Duration::minutes(30)));
        assert_eq!(scaled_minutes(30, 1.5), Some(Duration::minutes(45)));
        assert_eq!(scaled_minutes(45, 1.5), Some(Duration::seconds(67 * 60 + 30)));
        assert_eq!(scaled_minutes(7, 1.1), Some(Duration::seconds(462)));
        assert_eq!(scaled_minutes(0, 2.0), Some(Duration::zero()));
    }

    #[test]
    fn scaled_minutes_out_of_range() {
        assert_eq!(scaled_minutes(30, 1e13), None);
        assert_eq!(scaled_minutes(u32::MAX, f64::MAX), None);
        assert_eq!(scaled_minutes(30, f64::NAN), None);
        assert_eq!(scaled_minutes(30, -1.0), None);
    }

    #[test]
    fn pairs_of_short_sequences() {
        assert!(stop_pairs(&[]).is_empty());
        assert!(stop_pairs(&[StopId::new("a").unwrap()]).is_empty());
    }

    #[test]
    fn plan_error_display() {
        let err = PlanError::UnknownStop(StopId::new("c99").unwrap());
        assert_eq!(err.to_string(), "unknown stop: c99");

        let err = PlanError::from(ConfigError::NoFerryOptions);
        assert_eq!(
            err.to_string(),
            "invalid engine configuration: max ferry options must be at least 1"
        );
    }
}
