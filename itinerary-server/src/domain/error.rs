//! Domain error types.
//!
//! These errors represent validation failures when building domain values
//! from feed records. They are distinct from snapshot I/O errors.

use super::{StopId, TripId};

/// Domain-level errors for validation and data consistency.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    /// Latitude or longitude outside the valid range
    #[error("invalid coordinate: ({lat}, {lon})")]
    InvalidCoordinate { lat: f64, lon: f64 },

    /// Calendar entry ends before it starts
    #[error("invalid date range: {0}")]
    InvalidDateRange(&'static str),

    /// Unknown GTFS calendar exception code
    #[error("invalid exception type: {0} (expected 1 or 2)")]
    InvalidExceptionType(u8),

    /// Invalid leg construction (e.g., arrival before departure)
    #[error("invalid leg: {0}")]
    InvalidLeg(&'static str),

    /// Stop visit departs before it arrives
    #[error("stop visit at {0} departs before it arrives")]
    DepartureBeforeArrival(StopId),

    /// Stop visits reference a trip missing from the trip directory
    #[error("stop visits reference unknown trip {0}")]
    UnknownTrip(TripId),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = DomainError::InvalidCoordinate {
            lat: 91.0,
            lon: 22.0,
        };
        assert_eq!(err.to_string(), "invalid coordinate: (91, 22)");

        let err = DomainError::InvalidDateRange("end before start");
        assert_eq!(err.to_string(), "invalid date range: end before start");

        let err = DomainError::InvalidExceptionType(3);
        assert_eq!(
            err.to_string(),
            "invalid exception type: 3 (expected 1 or 2)"
        );

        let err = DomainError::InvalidLeg("ferry arrives before it departs");
        assert_eq!(err.to_string(), "invalid leg: ferry arrives before it departs");

        let err = DomainError::DepartureBeforeArrival(StopId::new("c1").unwrap());
        assert_eq!(err.to_string(), "stop visit at c1 departs before it arrives");

        let err = DomainError::UnknownTrip(TripId::new("T9").unwrap());
        assert_eq!(err.to_string(), "stop visits reference unknown trip T9");
    }
}
