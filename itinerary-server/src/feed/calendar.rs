//! Service calendar resolution.
//!
//! Combines the recurring weekly calendar with per-date exceptions to
//! answer which services operate on a given date.

use std::collections::HashSet;

use chrono::NaiveDate;

use crate::domain::{CalendarEntry, CalendarException, ExceptionKind, ServiceId};

/// The recurring calendar and its exceptions.
#[derive(Debug, Clone, Default)]
pub struct ServiceCalendar {
    entries: Vec<CalendarEntry>,
    exceptions: Vec<CalendarException>,
}

impl ServiceCalendar {
    pub fn new(entries: Vec<CalendarEntry>, exceptions: Vec<CalendarException>) -> Self {
        Self {
            entries,
            exceptions,
        }
    }

    /// Services operating on `date`.
    ///
    /// The result is `(recurring ∪ added) − removed`: an exception always
    /// beats the weekly pattern for its date, and a removal beats an
    /// addition of the same service on the same date.
    ///
    /// # Examples
    ///
    /// ```
    /// use itinerary_server::domain::{CalendarEntry, CalendarException, ExceptionKind, ServiceId, WeekdayMask};
    /// use itinerary_server::feed::ServiceCalendar;
    /// use chrono::NaiveDate;
    ///
    /// let summer = ServiceId::new("summer").unwrap();
    /// let start = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
    /// let end = NaiveDate::from_ymd_opt(2024, 8, 31).unwrap();
    /// let midsummer = NaiveDate::from_ymd_opt(2024, 6, 21).unwrap();
    ///
    /// let calendar = ServiceCalendar::new(
    ///     vec![CalendarEntry::new(summer.clone(), start, end, WeekdayMask::every_day()).unwrap()],
    ///     vec![CalendarException::new(summer.clone(), midsummer, ExceptionKind::Removed)],
    /// );
    ///
    /// assert!(calendar.valid_services(start).contains(&summer));
    /// assert!(calendar.valid_services(midsummer).is_empty());
    /// ```
    pub fn valid_services(&self, date: NaiveDate) -> HashSet<ServiceId> {
        let mut services: HashSet<ServiceId> = self
            .entries
            .iter()
            .filter(|entry| entry.recurs_on(date))
            .map(|entry| entry.service_id.clone())
            .collect();

        let exceptions: Vec<&CalendarException> =
            self.exceptions.iter().filter(|ex| ex.date == date).collect();

        services.extend(
            exceptions
                .iter()
                .filter(|ex| ex.kind == ExceptionKind::Added)
                .map(|ex| ex.service_id.clone()),
        );
        for removed in exceptions.iter().filter(|ex| ex.kind == ExceptionKind::Removed) {
            services.remove(&removed.service_id);
        }

        services
    }

    /// Drop entries that ended before `cutoff` and exceptions dated before it.
    pub fn retain_from(&mut self, cutoff: NaiveDate) {
        self.entries.retain(|entry| entry.end_date() >= cutoff);
        self.exceptions.retain(|ex| ex.date >= cutoff);
    }

    pub fn entries(&self) -> &[CalendarEntry] {
        &self.entries
    }

    pub fn exceptions(&self) -> &[CalendarException] {
        &self.exceptions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::WeekdayMask;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sid(s: &str) -> ServiceId {
        ServiceId::new(s).unwrap()
    }

    fn weekdays_only() -> WeekdayMask {
        WeekdayMask::from_bools([true, true, true, true, true, false, false])
    }

    fn weekends_only() -> WeekdayMask {
        WeekdayMask::from_bools([false, false, false, false, false, true, true])
    }

    /// Summer 2024: weekday and weekend services, plus a holiday swap on
    /// Friday 21 June (weekday service removed, weekend service added).
    fn summer_calendar() -> ServiceCalendar {
        let start = date(2024, 6, 1);
        let end = date(2024, 8, 31);
        ServiceCalendar::new(
            vec![
                CalendarEntry::new(sid("wk"), start, end, weekdays_only()).unwrap(),
                CalendarEntry::new(sid("we"), start, end, weekends_only()).unwrap(),
            ],
            vec![
                CalendarException::new(sid("wk"), date(2024, 6, 21), ExceptionKind::Removed),
                CalendarException::new(sid("we"), date(2024, 6, 21), ExceptionKind::Added),
            ],
        )
    }

    #[test]
    fn recurring_weekday() {
        let services = summer_calendar().valid_services(date(2024, 6, 18)); // Tuesday
        assert_eq!(services, HashSet::from([sid("wk")]));
    }

    #[test]
    fn recurring_weekend() {
        let services = summer_calendar().valid_services(date(2024, 6, 22)); // Saturday
        assert_eq!(services, HashSet::from([sid("we")]));
    }

    #[test]
    fn exceptions_override_recurring() {
        let services = summer_calendar().valid_services(date(2024, 6, 21)); // Friday, holiday
        assert_eq!(services, HashSet::from([sid("we")]));
    }

    #[test]
    fn outside_range_is_empty() {
        assert!(summer_calendar().valid_services(date(2024, 9, 2)).is_empty());
        assert!(summer_calendar().valid_services(date(2024, 5, 31)).is_empty());
    }

    #[test]
    fn added_outside_range() {
        let calendar = ServiceCalendar::new(
            Vec::new(),
            vec![CalendarException::new(sid("extra"), date(2024, 12, 24), ExceptionKind::Added)],
        );
        assert_eq!(
            calendar.valid_services(date(2024, 12, 24)),
            HashSet::from([sid("extra")])
        );
        assert!(calendar.valid_services(date(2024, 12, 25)).is_empty());
    }

    #[test]
    fn removal_beats_addition_on_same_date() {
        let day = date(2024, 7, 1);
        let calendar = ServiceCalendar::new(
            Vec::new(),
            vec![
                CalendarException::new(sid("x"), day, ExceptionKind::Added),
                CalendarException::new(sid("x"), day, ExceptionKind::Removed),
            ],
        );
        assert!(calendar.valid_services(day).is_empty());
    }

    #[test]
    fn empty_calendar() {
        let calendar = ServiceCalendar::default();
        assert!(calendar.valid_services(date(2024, 1, 1)).is_empty());
    }

    #[test]
    fn retain_from_drops_past_data() {
        let mut calendar = ServiceCalendar::new(
            vec![
                CalendarEntry::new(sid("old"), date(2019, 1, 1), date(2019, 12, 31), weekdays_only())
                    .unwrap(),
                CalendarEntry::new(sid("new"), date(2019, 6, 1), date(2020, 6, 1), weekdays_only())
                    .unwrap(),
            ],
            vec![
                CalendarException::new(sid("old"), date(2019, 12, 24), ExceptionKind::Removed),
                CalendarException::new(sid("new"), date(2020, 1, 6), ExceptionKind::Removed),
            ],
        );

        calendar.retain_from(date(2020, 1, 1));

        assert_eq!(calendar.entries().len(), 1);
        assert_eq!(calendar.entries()[0].service_id, sid("new"));
        assert_eq!(calendar.exceptions().len(), 1);
        assert_eq!(calendar.exceptions()[0].date, date(2020, 1, 6));
    }
}
