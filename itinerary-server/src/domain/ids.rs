//! Feed identifier types.
//!
//! GTFS identifiers are opaque strings. The only validation applied is that
//! they must be non-empty; everything else about them is feed-specific.

use std::fmt;

/// Error returned when constructing an identifier from an empty string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind}: identifier cannot be empty")]
pub struct InvalidId {
    kind: &'static str,
}

macro_rules! feed_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(String);

        impl $name {
            /// Create a new identifier, rejecting empty strings.
            pub fn new(s: impl Into<String>) -> Result<Self, InvalidId> {
                let s = s.into();
                if s.is_empty() {
                    return Err(InvalidId { kind: $kind });
                }
                Ok(Self(s))
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consumes the identifier and returns the inner String.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

feed_id!(
    /// A GTFS `stop_id`.
    ///
    /// # Examples
    ///
    /// ```
    /// use itinerary_server::domain::StopId;
    ///
    /// let stop = StopId::new("c1").unwrap();
    /// assert_eq!(stop.as_str(), "c1");
    ///
    /// // Empty strings are rejected
    /// assert!(StopId::new("").is_err());
    /// ```
    StopId,
    "stop id"
);

feed_id!(
    /// A GTFS `trip_id`.
    TripId,
    "trip id"
);

feed_id!(
    /// A GTFS `service_id`, linking trips to the service calendar.
    ServiceId,
    "service id"
);

feed_id!(
    /// A GTFS `route_id`.
    RouteId,
    "route id"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_ids() {
        assert_eq!(StopId::new("c29").unwrap().as_str(), "c29");
        assert_eq!(TripId::new("T1").unwrap().to_string(), "T1");
        assert_eq!(ServiceId::new("wk").unwrap().into_inner(), "wk");
        assert!(RouteId::new("r").is_ok());
    }

    #[test]
    fn reject_empty() {
        assert!(StopId::new("").is_err());
        assert!(TripId::new(String::new()).is_err());
    }

    #[test]
    fn error_names_kind() {
        let err = ServiceId::new("").unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid service id: identifier cannot be empty"
        );
    }

    #[test]
    fn debug_format() {
        let id = StopId::new("c1").unwrap();
        assert_eq!(format!("{:?}", id), "StopId(c1)");
    }

    #[test]
    fn ordering_is_lexicographic() {
        let a = StopId::new("a").unwrap();
        let b = StopId::new("b").unwrap();
        assert!(a < b);
    }
}
