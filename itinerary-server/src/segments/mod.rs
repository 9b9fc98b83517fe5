//! Fixed-duration road segments between stops.
//!
//! Some stop pairs are connected by road rather than by anything in the
//! schedule feed (e.g. driving from Turku to the Parainen ferry). This
//! module provides lookup for those pairs and their one-way durations.

use std::collections::HashMap;

use crate::domain::StopId;

/// Error returned when parsing a segment list.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid segment {entry:?}: {reason}")]
pub struct SegmentParseError {
    entry: String,
    reason: &'static str,
}

/// Known travel durations between ordered stop pairs.
///
/// Entries are directional. Use [`SegmentMap::add`] to store a pair in
/// both directions, or [`SegmentMap::insert`] for a one-way duration.
#[derive(Debug, Clone, Default)]
pub struct SegmentMap {
    /// Map from (from, to) to duration in minutes.
    durations: HashMap<(StopId, StopId), u32>,
}

impl SegmentMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a one-way duration from `from` to `to`.
    pub fn insert(&mut self, from: StopId, to: StopId, minutes: u32) {
        self.durations.insert((from, to), minutes);
    }

    /// Add a duration in both directions.
    pub fn add(&mut self, from: StopId, to: StopId, minutes: u32) {
        self.durations.insert((to.clone(), from.clone()), minutes);
        self.durations.insert((from, to), minutes);
    }

    /// Base duration in minutes from `from` to `to`, if known.
    pub fn minutes(&self, from: &StopId, to: &StopId) -> Option<u32> {
        self.durations.get(&(from.clone(), to.clone())).copied()
    }

    /// Returns the number of directed pairs.
    pub fn len(&self) -> usize {
        self.durations.len()
    }

    /// Returns true if no durations are known.
    pub fn is_empty(&self) -> bool {
        self.durations.is_empty()
    }

    /// Parse a comma-separated segment list.
    ///
    /// Each entry is `FROM<>TO=MINUTES` (both directions) or
    /// `FROM>TO=MINUTES` (one way). Blank entries are ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use itinerary_server::segments::SegmentMap;
    /// use itinerary_server::domain::StopId;
    ///
    /// let map = SegmentMap::parse("c1<>c3=45, c6>24=30").unwrap();
    /// let c1 = StopId::new("c1").unwrap();
    /// let c3 = StopId::new("c3").unwrap();
    /// assert_eq!(map.minutes(&c1, &c3), Some(45));
    /// assert_eq!(map.minutes(&c3, &c1), Some(45));
    /// assert_eq!(map.len(), 3);
    /// ```
    pub fn parse(list: &str) -> Result<Self, SegmentParseError> {
        let mut map = Self::new();
        for entry in list.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let err = |reason| SegmentParseError {
                entry: entry.to_string(),
                reason,
            };

            let (pair, minutes) = entry.split_once('=').ok_or_else(|| err("missing '='"))?;
            let minutes: u32 = minutes
                .trim()
                .parse()
                .map_err(|_| err("minutes must be a non-negative integer"))?;

            let (from, to, both_ways) = match pair.split_once("<>") {
                Some((from, to)) => (from, to, true),
                None => {
                    let (from, to) = pair
                        .split_once('>')
                        .ok_or_else(|| err("expected FROM<>TO or FROM>TO"))?;
                    (from, to, false)
                }
            };

            let from = StopId::new(from.trim()).map_err(|_| err("empty stop id"))?;
            let to = StopId::new(to.trim()).map_err(|_| err("empty stop id"))?;
            if both_ways {
                map.add(from, to, minutes);
            } else {
                map.insert(from, to, minutes);
            }
        }
        Ok(map)
    }
}

/// Builder for creating segment maps.
///
/// Provides a fluent API for adding segments.
#[derive(Debug, Default)]
pub struct SegmentMapBuilder {
    inner: SegmentMap,
}

impl SegmentMapBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a segment in both directions. Empty stop ids are ignored.
    pub fn add(mut self, from: &str, to: &str, minutes: u32) -> Self {
        if let (Ok(from), Ok(to)) = (StopId::new(from), StopId::new(to)) {
            self.inner.add(from, to, minutes);
        }
        self
    }

    /// Add a one-way segment. Empty stop ids are ignored.
    pub fn one_way(mut self, from: &str, to: &str, minutes: u32) -> Self {
        if let (Ok(from), Ok(to)) = (StopId::new(from), StopId::new(to)) {
            self.inner.insert(from, to, minutes);
        }
        self
    }

    /// Build the segment map.
    pub fn build(self) -> SegmentMap {
        self.inner
    }
}

/// The road segments of the Turku archipelago route.
///
/// Stop ids are those of the Föli/archipelago ferry feed.
pub fn archipelago_segments() -> SegmentMap {
    SegmentMapBuilder::new()
        .add("c1", "c3", 45) // Turku ↔ Parainen (Lillmälö)
        .add("c4", "c29", 30) // Nauvo Prostvik ↔ Nauvo Parnäs
        .add("c6", "24", 30) // Korpo Retais ↔ Korpo Centrum
        .build()
}
