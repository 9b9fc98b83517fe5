//! Itinerary leg type.
//!
//! A `Leg` is one traversal between two consecutive stops of a planned
//! route: a ferry trip, a drive, or a marker saying the pair could not be
//! reached. Each leg owns the alternative continuations that become
//! available once it completes, so a set of root legs forms a tree of
//! itineraries.

use std::fmt;

use chrono::{Duration, NaiveDateTime};

use super::{DomainError, StopId, TripId};

/// How a leg is travelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LegKind {
    Drive,
    Ferry,
    /// Reserved: the planner does not produce waiting legs.
    Wait,
    /// The stop pair could not be reached.
    Error,
}

impl LegKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LegKind::Drive => "drive",
            LegKind::Ferry => "ferry",
            LegKind::Wait => "wait",
            LegKind::Error => "error",
        }
    }
}

impl fmt::Display for LegKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier of a leg within a leg tree.
///
/// Identifiers are derived from the leg's content, never from its position
/// in the tree. Ferry legs are identified by their trip alone, so the same
/// trip reached along two different paths yields two legs with one id.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LegId(String);

impl LegId {
    /// `{from}-{to}-{startMillis}-{endMillis}`
    pub fn drive(from: &StopId, to: &StopId, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self(format!(
            "{}-{}-{}-{}",
            from,
            to,
            epoch_millis(start),
            epoch_millis(end)
        ))
    }

    /// The trip id itself.
    pub fn ferry(trip: &TripId) -> Self {
        Self(trip.as_str().to_string())
    }

    /// `{from}-{to}-{startMillis}-error`
    pub fn error(from: &StopId, to: &StopId, start: NaiveDateTime) -> Self {
        Self(format!("{}-{}-{}-error", from, to, epoch_millis(start)))
    }

    /// Wrap an identifier received from a client, such as the leg to highlight.
    pub fn from_raw(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for LegId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LegId({})", self.0)
    }
}

impl fmt::Display for LegId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Milliseconds since the Unix epoch, reading the naive local instant as if it were UTC.
fn epoch_millis(instant: NaiveDateTime) -> i64 {
    instant.and_utc().timestamp_millis()
}

/// A leg of an itinerary and the options that follow it.
///
/// # Invariants
///
/// - `end >= start`
/// - Error legs have zero duration and no children
#[derive(Debug, Clone, PartialEq)]
pub struct Leg {
    id: LegId,
    kind: LegKind,
    text: String,
    remark: Option<String>,
    start: NaiveDateTime,
    end: NaiveDateTime,
    from: StopId,
    to: StopId,
    trip_id: Option<TripId>,
    children: Vec<Leg>,
}

impl Leg {
    /// A drive of `duration` starting at `start`.
    ///
    /// # Errors
    ///
    /// Returns `Err` if `duration` is negative or overflows the calendar.
    pub fn drive(
        from: StopId,
        to: StopId,
        text: impl Into<String>,
        start: NaiveDateTime,
        duration: Duration,
    ) -> Result<Self, DomainError> {
        if duration < Duration::zero() {
            return Err(DomainError::InvalidLeg("drive duration must not be negative"));
        }
        let end = start
            .checked_add_signed(duration)
            .ok_or(DomainError::InvalidLeg("drive end time out of range"))?;
        Ok(Self {
            id: LegId::drive(&from, &to, start, end),
            kind: LegKind::Drive,
            text: text.into(),
            remark: None,
            start,
            end,
            from,
            to,
            trip_id: None,
            children: Vec::new(),
        })
    }

    /// A ride on scheduled trip `trip_id` between `start` and `end`.
    ///
    /// # Errors
    ///
    /// Returns `Err` if `end` is before `start`.
    ///
    /// # Examples
    ///
    /// ```
    /// use itinerary_server::domain::{Leg, LegKind, StopId, TripId};
    /// use chrono::NaiveDate;
    ///
    /// let date = NaiveDate::from_ymd_opt(2024, 6, 14).unwrap();
    /// let leg = Leg::ferry(
    ///     TripId::new("T1").unwrap(),
    ///     StopId::new("c29").unwrap(),
    ///     StopId::new("c6").unwrap(),
    ///     "Nauvo - Korpo",
    ///     date.and_hms_opt(9, 0, 0).unwrap(),
    ///     date.and_hms_opt(9, 33, 0).unwrap(),
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(leg.kind(), LegKind::Ferry);
    /// assert_eq!(leg.id().as_str(), "T1");
    /// assert_eq!(leg.duration().num_minutes(), 33);
    /// ```
    pub fn ferry(
        trip_id: TripId,
        from: StopId,
        to: StopId,
        text: impl Into<String>,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Self, DomainError> {
        if end < start {
            return Err(DomainError::InvalidLeg("ferry arrives before it departs"));
        }
        Ok(Self {
            id: LegId::ferry(&trip_id),
            kind: LegKind::Ferry,
            text: text.into(),
            remark: None,
            start,
            end,
            from,
            to,
            trip_id: Some(trip_id),
            children: Vec::new(),
        })
    }

    /// A zero-duration marker for an unreachable stop pair.
    pub fn error(from: StopId, to: StopId, text: impl Into<String>, start: NaiveDateTime) -> Self {
        Self {
            id: LegId::error(&from, &to, start),
            kind: LegKind::Error,
            text: text.into(),
            remark: None,
            start,
            end: start,
            from,
            to,
            trip_id: None,
            children: Vec::new(),
        }
    }

    /// Attach a remark, e.g. the traffic factor a drive was scaled by.
    pub fn with_remark(mut self, remark: impl Into<String>) -> Self {
        self.remark = Some(remark.into());
        self
    }

    /// Attach the continuations available after this leg.
    ///
    /// Error legs are terminal; children given to them are dropped.
    pub fn with_children(mut self, children: Vec<Leg>) -> Self {
        if self.kind != LegKind::Error {
            self.children = children;
        }
        self
    }

    pub fn id(&self) -> &LegId {
        &self.id
    }

    pub fn kind(&self) -> LegKind {
        self.kind
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn remark(&self) -> Option<&str> {
        self.remark.as_deref()
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    /// Stop the leg departs from.
    pub fn from(&self) -> &StopId {
        &self.from
    }

    /// Stop the leg arrives at.
    pub fn to(&self) -> &StopId {
        &self.to
    }

    /// The scheduled trip ridden, for ferry legs.
    pub fn trip_id(&self) -> Option<&TripId> {
        self.trip_id.as_ref()
    }

    pub fn children(&self) -> &[Leg] {
        &self.children
    }

    pub fn duration(&self) -> Duration {
        self.end.signed_duration_since(self.start)
    }

    /// True if nothing follows this leg.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn is_error(&self) -> bool {
        self.kind == LegKind::Error
    }

    /// Iterate over this leg and all of its descendants, depth-first, pre-order.
    pub fn iter(&self) -> LegIter<'_> {
        LegIter { stack: vec![self] }
    }
}

/// Depth-first iterator over a leg subtree.
pub struct LegIter<'a> {
    stack: Vec<&'a Leg>,
}

impl<'a> Iterator for LegIter<'a> {
    type Item = &'a Leg;

    fn next(&mut self) -> Option<Self::Item> {
        let leg = self.stack.pop()?;
        // Reversed so the first child is visited first
        self.stack.extend(leg.children.iter().rev());
        Some(leg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 14)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn stop(s: &str) -> StopId {
        StopId::new(s).unwrap()
    }

    #[test]
    fn drive_leg() {
        let leg = Leg::drive(stop("c1"), stop("c3"), "Turku -> Parainen", at(8, 0), Duration::minutes(45))
            .unwrap();

        assert_eq!(leg.kind(), LegKind::Drive);
        assert_eq!(leg.start(), at(8, 0));
        assert_eq!(leg.end(), at(8, 45));
        assert_eq!(leg.duration(), Duration::minutes(45));
        assert!(leg.trip_id().is_none());
        assert!(leg.remark().is_none());
        assert!(leg.is_leaf());
    }

    #[test]
    fn drive_id_from_stops_and_times() {
        let leg = Leg::drive(stop("c1"), stop("c3"), "", at(0, 0), Duration::minutes(1)).unwrap();
        // 2024-06-14T00:00:00 = 1718323200 seconds since the epoch
        assert_eq!(leg.id().as_str(), "c1-c3-1718323200000-1718323260000");
    }

    #[test]
    fn drive_rejects_negative_duration() {
        let result = Leg::drive(stop("a"), stop("b"), "", at(8, 0), Duration::minutes(-1));
        assert!(result.is_err());
    }

    #[test]
    fn ferry_leg() {
        let trip = TripId::new("T42").unwrap();
        let leg = Leg::ferry(trip.clone(), stop("c29"), stop("c6"), "Nauvo - Korpo", at(9, 0), at(9, 33))
            .unwrap();

        assert_eq!(leg.kind(), LegKind::Ferry);
        assert_eq!(leg.id(), &LegId::ferry(&trip));
        assert_eq!(leg.trip_id(), Some(&trip));
        assert_eq!(leg.text(), "Nauvo - Korpo");
        assert_eq!(leg.from(), &stop("c29"));
        assert_eq!(leg.to(), &stop("c6"));
    }

    #[test]
    fn ferry_rejects_arrival_before_departure() {
        let trip = TripId::new("T1").unwrap();
        assert!(Leg::ferry(trip, stop("a"), stop("b"), "", at(9, 30), at(9, 0)).is_err());
    }

    #[test]
    fn error_leg_is_zero_duration() {
        let leg = Leg::error(stop("a"), stop("b"), "no valid route: A -> B", at(12, 0));

        assert!(leg.is_error());
        assert_eq!(leg.start(), leg.end());
        assert_eq!(leg.duration(), Duration::zero());
        assert!(leg.id().as_str().ends_with("-error"));
    }

    #[test]
    fn error_leg_ignores_children() {
        let child = Leg::error(stop("b"), stop("c"), "", at(12, 0));
        let leg = Leg::error(stop("a"), stop("b"), "", at(12, 0)).with_children(vec![child]);
        assert!(leg.is_leaf());
    }

    #[test]
    fn remark_attached() {
        let leg = Leg::drive(stop("a"), stop("b"), "", at(8, 0), Duration::minutes(10))
            .unwrap()
            .with_remark("1.5x traffic adjustment");
        assert_eq!(leg.remark(), Some("1.5x traffic adjustment"));
    }

    #[test]
    fn iter_is_preorder() {
        let grandchild = Leg::error(stop("c"), stop("d"), "", at(9, 0));
        let child1 = Leg::drive(stop("b"), stop("c"), "", at(8, 30), Duration::minutes(30))
            .unwrap()
            .with_children(vec![grandchild]);
        let child2 = Leg::error(stop("b"), stop("c"), "", at(8, 30));
        let root = Leg::drive(stop("a"), stop("b"), "", at(8, 0), Duration::minutes(30))
            .unwrap()
            .with_children(vec![child1, child2]);

        let kinds: Vec<_> = root.iter().map(|l| (l.from().as_str().to_string(), l.kind())).collect();
        assert_eq!(
            kinds,
            vec![
                ("a".to_string(), LegKind::Drive),
                ("b".to_string(), LegKind::Drive),
                ("c".to_string(), LegKind::Error),
                ("b".to_string(), LegKind::Error),
            ]
        );
    }

    #[test]
    fn kind_display() {
        assert_eq!(LegKind::Drive.to_string(), "drive");
        assert_eq!(LegKind::Ferry.to_string(), "ferry");
        assert_eq!(LegKind::Wait.to_string(), "wait");
        assert_eq!(LegKind::Error.to_string(), "error");
    }
}
