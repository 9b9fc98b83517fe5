//! Server settings read from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveDate;

use crate::cache::CacheConfig;
use crate::planner::{ConfigError, EngineConfig};
use crate::segments::{SegmentMap, SegmentParseError, archipelago_segments};

pub const BIND_VAR: &str = "ITINERARY_BIND";
pub const FEED_VAR: &str = "ITINERARY_FEED";
pub const CUTOFF_VAR: &str = "ITINERARY_CALENDAR_CUTOFF";
pub const MULTIPLIERS_VAR: &str = "ITINERARY_DRIVE_MULTIPLIERS";
pub const DISEMBARK_VAR: &str = "ITINERARY_DISEMBARK_MINS";
pub const MAX_FERRY_OPTIONS_VAR: &str = "ITINERARY_MAX_FERRY_OPTIONS";
pub const SEGMENTS_VAR: &str = "ITINERARY_SEGMENTS";
pub const CACHE_TTL_VAR: &str = "ITINERARY_CACHE_TTL_SECS";

/// Error from reading settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{var}: cannot parse {value:?}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },

    #[error("ITINERARY_SEGMENTS: {0}")]
    Segments(#[from] SegmentParseError),

    #[error(transparent)]
    Engine(#[from] ConfigError),
}

/// Everything the server needs at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    pub bind: SocketAddr,
    pub feed_path: PathBuf,
    /// Calendar data ending before this date is dropped after loading.
    pub calendar_cutoff: Option<NaiveDate>,
    /// Default engine parameters; requests may override them.
    pub engine: EngineConfig,
    pub segments: SegmentMap,
    pub cache: CacheConfig,
}

impl Settings {
    /// Read settings from the process environment.
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`, which returns a variable's value if set.
    ///
    /// Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let bind = match get(BIND_VAR) {
            Some(value) => parse_value(BIND_VAR, &value)?,
            None => SocketAddr::from(([127, 0, 0, 1], 3000)),
        };

        let feed_path = get(FEED_VAR)
            .map(PathBuf::from)
            .ok_or(SettingsError::Missing(FEED_VAR))?;

        let calendar_cutoff = match get(CUTOFF_VAR) {
            Some(value) => Some(
                NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
                    .map_err(|e| invalid(CUTOFF_VAR, &value, e))?,
            ),
            None => None,
        };

        let drive_multipliers = match get(MULTIPLIERS_VAR) {
            Some(value) => parse_multipliers(&value)?,
            None => vec![1.0, 1.5],
        };
        let disembark_time_mins = match get(DISEMBARK_VAR) {
            Some(value) => parse_value(DISEMBARK_VAR, &value)?,
            None => 3,
        };
        let max_ferry_options = match get(MAX_FERRY_OPTIONS_VAR) {
            Some(value) => parse_value(MAX_FERRY_OPTIONS_VAR, &value)?,
            None => 5,
        };
        let engine = EngineConfig::new(drive_multipliers, disembark_time_mins, max_ferry_options)?;

        let segments = match get(SEGMENTS_VAR) {
            Some(value) => SegmentMap::parse(&value)?,
            None => archipelago_segments(),
        };

        let mut cache = CacheConfig::default();
        if let Some(value) = get(CACHE_TTL_VAR) {
            cache.ttl = Duration::from_secs(parse_value(CACHE_TTL_VAR, &value)?);
        }

        Ok(Self {
            bind,
            feed_path,
            calendar_cutoff,
            engine,
            segments,
            cache,
        })
    }
}

fn invalid(var: &'static str, value: &str, reason: impl ToString) -> SettingsError {
    SettingsError::Invalid {
        var,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_value<T>(var: &'static str, value: &str) -> Result<T, SettingsError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e| invalid(var, value, e))
}

fn parse_multipliers(value: &str) -> Result<Vec<f64>, SettingsError> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| parse_value(MULTIPLIERS_VAR, s))
        .collect()
}
