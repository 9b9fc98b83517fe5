//! Clock times from the schedule feed.
//!
//! GTFS stop times are "HH:MM:SS" strings measured from the start of the
//! service day. Hours may exceed 23 for trips that run past midnight, so a
//! clock time is not a `NaiveTime`; it only becomes an instant once it is
//! placed on a date.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use std::fmt;

const SECONDS_PER_DAY: u32 = 24 * 60 * 60;

/// Error returned when parsing an invalid clock time string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid clock time: {reason}")]
pub struct TimeError {
    reason: &'static str,
}

impl TimeError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// A schedule clock time, in seconds since the start of the service day.
///
/// # Examples
///
/// ```
/// use itinerary_server::domain::ClockTime;
///
/// let t = ClockTime::parse("9:05:00").unwrap();
/// assert_eq!(t.to_string(), "09:05:00");
///
/// // Past-midnight times are representable but do not fit in a single day
/// let late = ClockTime::parse("25:10:00").unwrap();
/// assert!(late.is_past_midnight());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClockTime(u32);

impl ClockTime {
    /// Build a clock time from components. Minutes and seconds must be 0-59.
    pub fn from_hms(hours: u32, minutes: u32, seconds: u32) -> Option<Self> {
        if minutes > 59 || seconds > 59 {
            return None;
        }
        let total = hours
            .checked_mul(3600)?
            .checked_add(minutes * 60 + seconds)?;
        Some(Self(total))
    }

    /// Parse "H:MM:SS" or "HH:MM:SS".
    ///
    /// ```
    /// use itinerary_server::domain::ClockTime;
    ///
    /// assert!(ClockTime::parse("00:00:00").is_ok());
    /// assert!(ClockTime::parse("7:30:00").is_ok());
    /// assert!(ClockTime::parse("24:15:00").is_ok());
    ///
    /// assert!(ClockTime::parse("07:30").is_err());
    /// assert!(ClockTime::parse("07:60:00").is_err());
    /// assert!(ClockTime::parse("ab:cd:ef").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, TimeError> {
        let mut parts = s.trim().split(':');
        let (Some(h), Some(m), Some(sec), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(TimeError::new("expected H:MM:SS format"));
        };

        if h.is_empty() || h.len() > 3 || m.len() != 2 || sec.len() != 2 {
            return Err(TimeError::new("expected H:MM:SS format"));
        }

        let hours = parse_digits(h).ok_or_else(|| TimeError::new("invalid hour digits"))?;
        let minutes = parse_digits(m).ok_or_else(|| TimeError::new("invalid minute digits"))?;
        let seconds = parse_digits(sec).ok_or_else(|| TimeError::new("invalid second digits"))?;

        if minutes > 59 {
            return Err(TimeError::new("minute must be 0-59"));
        }
        if seconds > 59 {
            return Err(TimeError::new("second must be 0-59"));
        }

        Self::from_hms(hours, minutes, seconds).ok_or_else(|| TimeError::new("time out of range"))
    }

    /// Seconds since the start of the service day.
    pub fn seconds_since_midnight(&self) -> u32 {
        self.0
    }

    /// True if this time falls on the following calendar day (24:00:00 or later).
    pub fn is_past_midnight(&self) -> bool {
        self.0 >= SECONDS_PER_DAY
    }

    /// The time of day, or `None` for past-midnight times.
    pub fn to_naive_time(&self) -> Option<NaiveTime> {
        if self.is_past_midnight() {
            return None;
        }
        NaiveTime::from_num_seconds_from_midnight_opt(self.0, 0)
    }

    /// Place this clock time on `date`.
    ///
    /// Returns `None` for past-midnight times: no rollover onto the next
    /// date is attempted.
    pub fn on(&self, date: NaiveDate) -> Option<NaiveDateTime> {
        self.to_naive_time().map(|t| date.and_time(t))
    }

    /// The clock time of an instant (sub-second precision is dropped).
    pub fn of_instant(instant: NaiveDateTime) -> Self {
        Self(instant.time().num_seconds_from_midnight())
    }
}

impl fmt::Debug for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClockTime({})", self)
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let h = self.0 / 3600;
        let m = (self.0 % 3600) / 60;
        let s = self.0 % 60;
        write!(f, "{:02}:{:02}:{:02}", h, m, s)
    }
}

fn parse_digits(s: &str) -> Option<u32> {
    if !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}
