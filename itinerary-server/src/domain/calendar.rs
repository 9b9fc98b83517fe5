//! Service calendar types.
//!
//! GTFS splits service days into a recurring weekly pattern (`calendar.txt`)
//! and per-date overrides (`calendar_dates.txt`). The resolution of the two
//! into "which services run on this date" lives in the feed layer.

use chrono::{Datelike, NaiveDate, Weekday};

use super::{DomainError, ServiceId};

/// Which weekdays a service recurs on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WeekdayMask(u8);

impl WeekdayMask {
    /// A mask with no weekdays set.
    pub fn empty() -> Self {
        Self(0)
    }

    /// A mask with every weekday set.
    pub fn every_day() -> Self {
        Self(0b111_1111)
    }

    pub fn set(&mut self, weekday: Weekday) {
        self.0 |= 1 << weekday.num_days_from_monday();
    }

    pub fn contains(&self, weekday: Weekday) -> bool {
        self.0 & (1 << weekday.num_days_from_monday()) != 0
    }

    /// Build a mask from GTFS column order: Monday first, Sunday last.
    pub fn from_bools(days: [bool; 7]) -> Self {
        let mut mask = Self::empty();
        for (day, on) in days.into_iter().enumerate() {
            if on {
                mask.0 |= 1 << day;
            }
        }
        mask
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

/// A recurring service definition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CalendarEntry {
    pub service_id: ServiceId,
    start_date: NaiveDate,
    end_date: NaiveDate,
    pub weekdays: WeekdayMask,
}

impl CalendarEntry {
    /// Create an entry valid from `start_date` to `end_date`, both inclusive.
    pub fn new(
        service_id: ServiceId,
        start_date: NaiveDate,
        end_date: NaiveDate,
        weekdays: WeekdayMask,
    ) -> Result<Self, DomainError> {
        if end_date < start_date {
            return Err(DomainError::InvalidDateRange("end date before start date"));
        }
        Ok(Self {
            service_id,
            start_date,
            end_date,
            weekdays,
        })
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    /// True if the weekly pattern alone says the service runs on `date`.
    pub fn recurs_on(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date && self.weekdays.contains(date.weekday())
    }
}

/// Whether an exception adds or removes service.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExceptionKind {
    Added,
    Removed,
}

impl ExceptionKind {
    /// Decode a GTFS `exception_type`: 1 adds service, 2 removes it.
    pub fn from_gtfs_code(code: u8) -> Result<Self, DomainError> {
        match code {
            1 => Ok(ExceptionKind::Added),
            2 => Ok(ExceptionKind::Removed),
            other => Err(DomainError::InvalidExceptionType(other)),
        }
    }
}

/// A single-date override of the recurring calendar.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CalendarException {
    pub service_id: ServiceId,
    pub date: NaiveDate,
    pub kind: ExceptionKind,
}

impl CalendarException {
    pub fn new(service_id: ServiceId, date: NaiveDate, kind: ExceptionKind) -> Self {
        Self {
            service_id,
            date,
            kind,
        }
    }
}
