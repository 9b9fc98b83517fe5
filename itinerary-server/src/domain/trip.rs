//! Scheduled trip types.

use super::{ClockTime, DomainError, RouteId, ServiceId, StopId, TripId};

/// A scheduled run from the feed's trip directory.
///
/// The stop visits of a trip are stored separately, keyed by trip id,
/// the way the feed itself stores them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trip {
    pub id: TripId,
    pub service_id: ServiceId,
    pub route_id: Option<RouteId>,
    /// Headsign shown to travellers (e.g. "Nauvo - Korpo").
    pub headsign: String,
}

/// One visit of a trip to a stop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopVisit {
    pub stop_id: StopId,
    /// Position of this visit within its trip (GTFS `stop_sequence`).
    pub sequence: u32,
    pub arrival: ClockTime,
    pub departure: ClockTime,
}

impl StopVisit {
    /// Construct a stop visit, validating that it does not depart before it arrives.
    pub fn new(
        stop_id: StopId,
        sequence: u32,
        arrival: ClockTime,
        departure: ClockTime,
    ) -> Result<Self, DomainError> {
        if departure < arrival {
            return Err(DomainError::DepartureBeforeArrival(stop_id));
        }
        Ok(Self {
            stop_id,
            sequence,
            arrival,
            departure,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> ClockTime {
        ClockTime::parse(s).unwrap()
    }

    #[test]
    fn visit_valid() {
        let stop = StopId::new("c4").unwrap();
        let visit = StopVisit::new(stop.clone(), 1, t("09:00:00"), t("09:05:00")).unwrap();
        assert_eq!(visit.stop_id, stop);
        assert_eq!(visit.sequence, 1);
    }

    #[test]
    fn visit_same_arrival_and_departure() {
        let stop = StopId::new("c4").unwrap();
        assert!(StopVisit::new(stop, 0, t("09:00:00"), t("09:00:00")).is_ok());
    }

    #[test]
    fn visit_departing_before_arrival_rejected() {
        let stop = StopId::new("c4").unwrap();
        let err = StopVisit::new(stop.clone(), 0, t("09:10:00"), t("09:00:00")).unwrap_err();
        assert_eq!(err, DomainError::DepartureBeforeArrival(stop));
    }
}
