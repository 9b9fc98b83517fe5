//! JSON feed snapshots.
//!
//! A snapshot is an already-decoded feed serialized as JSON, using GTFS
//! field names and value conventions (dates as `YYYYMMDD`, weekday flags
//! as 0/1, `exception_type` 1 = added and 2 = removed, times as
//! `H:MM:SS`). Records are validated while being turned into a [`Feed`].

use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Feed, FeedError, ServiceCalendar};
use crate::domain::{
    CalendarEntry, CalendarException, ClockTime, Coordinate, ExceptionKind, RouteId, ServiceId,
    Stop, StopId, StopVisit, Trip, TripId, WeekdayMask,
};

/// A `stops.txt` row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StopRecord {
    pub stop_id: String,
    pub stop_name: String,
    pub stop_lat: f64,
    pub stop_lon: f64,
}

/// A `trips.txt` row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripRecord {
    pub trip_id: String,
    pub service_id: String,
    #[serde(default)]
    pub route_id: Option<String>,
    #[serde(default)]
    pub trip_headsign: String,
}

/// A `stop_times.txt` row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StopTimeRecord {
    pub trip_id: String,
    pub stop_id: String,
    pub stop_sequence: u32,
    pub arrival_time: String,
    pub departure_time: String,
}

/// A `calendar.txt` row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarRecord {
    pub service_id: String,
    pub monday: u8,
    pub tuesday: u8,
    pub wednesday: u8,
    pub thursday: u8,
    pub friday: u8,
    pub saturday: u8,
    pub sunday: u8,
    pub start_date: String,
    pub end_date: String,
}

/// A `calendar_dates.txt` row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarDateRecord {
    pub service_id: String,
    pub date: String,
    pub exception_type: u8,
}

/// The whole snapshot document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedSnapshot {
    pub stops: Vec<StopRecord>,
    pub trips: Vec<TripRecord>,
    pub stop_times: Vec<StopTimeRecord>,
    #[serde(default)]
    pub calendar: Vec<CalendarRecord>,
    #[serde(default)]
    pub calendar_dates: Vec<CalendarDateRecord>,
}

impl FeedSnapshot {
    /// Parse a snapshot from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, FeedError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a snapshot file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, FeedError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| FeedError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&contents)
    }

    /// Validate every record and build the feed.
    pub fn into_feed(self) -> Result<Feed, FeedError> {
        let stops = self
            .stops
            .into_iter()
            .map(decode_stop)
            .collect::<Result<Vec<_>, _>>()?;

        let trips = self
            .trips
            .into_iter()
            .map(decode_trip)
            .collect::<Result<Vec<_>, _>>()?;

        let visits = self
            .stop_times
            .into_iter()
            .map(decode_stop_time)
            .collect::<Result<Vec<_>, _>>()?;

        let entries = self
            .calendar
            .into_iter()
            .map(decode_calendar)
            .collect::<Result<Vec<_>, _>>()?;

        let exceptions = self
            .calendar_dates
            .into_iter()
            .map(decode_calendar_date)
            .collect::<Result<Vec<_>, _>>()?;

        Feed::new(
            stops,
            trips,
            visits,
            ServiceCalendar::new(entries, exceptions),
        )
        .map_err(|e| FeedError::invalid("stop_times", e))
    }
}

impl Feed {
    /// Load a feed from a JSON snapshot file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, FeedError> {
        FeedSnapshot::load(path)?.into_feed()
    }
}

fn decode_stop(record: StopRecord) -> Result<Stop, FeedError> {
    let label = format!("stop {}", record.stop_id);
    let id = StopId::new(record.stop_id).map_err(|e| FeedError::invalid(&label, e))?;
    let location =
        Coordinate::new(record.stop_lat, record.stop_lon).map_err(|e| FeedError::invalid(&label, e))?;
    Ok(Stop::new(id, record.stop_name, location))
}

fn decode_trip(record: TripRecord) -> Result<Trip, FeedError> {
    let label = format!("trip {}", record.trip_id);
    let id = TripId::new(record.trip_id).map_err(|e| FeedError::invalid(&label, e))?;
    let service_id = ServiceId::new(record.service_id).map_err(|e| FeedError::invalid(&label, e))?;
    let route_id = record
        .route_id
        .filter(|r| !r.is_empty())
        .map(RouteId::new)
        .transpose()
        .map_err(|e| FeedError::invalid(&label, e))?;
    Ok(Trip {
        id,
        service_id,
        route_id,
        headsign: record.trip_headsign,
    })
}

fn decode_stop_time(record: StopTimeRecord) -> Result<(TripId, StopVisit), FeedError> {
    let label = format!(
        "stop time {} #{} of trip {}",
        record.stop_id, record.stop_sequence, record.trip_id
    );
    let trip_id = TripId::new(record.trip_id).map_err(|e| FeedError::invalid(&label, e))?;
    let stop_id = StopId::new(record.stop_id).map_err(|e| FeedError::invalid(&label, e))?;
    let arrival = ClockTime::parse(&record.arrival_time).map_err(|e| FeedError::invalid(&label, e))?;
    let departure =
        ClockTime::parse(&record.departure_time).map_err(|e| FeedError::invalid(&label, e))?;
    let visit = StopVisit::new(stop_id, record.stop_sequence, arrival, departure)
        .map_err(|e| FeedError::invalid(&label, e))?;
    Ok((trip_id, visit))
}

fn decode_calendar(record: CalendarRecord) -> Result<CalendarEntry, FeedError> {
    let label = format!("calendar {}", record.service_id);
    let flags = [
        record.monday,
        record.tuesday,
        record.wednesday,
        record.thursday,
        record.friday,
        record.saturday,
        record.sunday,
    ];
    let mut days = [false; 7];
    for (day, flag) in days.iter_mut().zip(flags) {
        *day = match flag {
            0 => false,
            1 => true,
            other => {
                return Err(FeedError::invalid(
                    &label,
                    format!("weekday flag must be 0 or 1, got {other}"),
                ));
            }
        };
    }

    let service_id = ServiceId::new(record.service_id).map_err(|e| FeedError::invalid(&label, e))?;
    let start = parse_gtfs_date(&record.start_date).map_err(|e| FeedError::invalid(&label, e))?;
    let end = parse_gtfs_date(&record.end_date).map_err(|e| FeedError::invalid(&label, e))?;
    CalendarEntry::new(service_id, start, end, WeekdayMask::from_bools(days))
        .map_err(|e| FeedError::invalid(&label, e))
}

fn decode_calendar_date(record: CalendarDateRecord) -> Result<CalendarException, FeedError> {
    let label = format!("calendar date {} {}", record.service_id, record.date);
    let service_id = ServiceId::new(record.service_id).map_err(|e| FeedError::invalid(&label, e))?;
    let date = parse_gtfs_date(&record.date).map_err(|e| FeedError::invalid(&label, e))?;
    let kind =
        ExceptionKind::from_gtfs_code(record.exception_type).map_err(|e| FeedError::invalid(&label, e))?;
    Ok(CalendarException::new(service_id, date, kind))
}

/// Parse a GTFS `YYYYMMDD` date.
fn parse_gtfs_date(s: &str) -> Result<NaiveDate, String> {
    if s.len() != 8 {
        return Err(format!("expected YYYYMMDD date, got {s:?}"));
    }
    NaiveDate::parse_from_str(s, "%Y%m%d").map_err(|e| format!("invalid date {s:?}: {e}"))
}
