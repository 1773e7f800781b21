//! The closed-inclusive planning horizon.

use chrono::{DateTime, Duration, NaiveDate, Utc};

/// `[start_date, end_date]` closed-inclusive interval of calendar dates, in
/// the observer's local calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Horizon {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl Horizon {
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        assert!(start_date <= end_date, "horizon start must not be after end");
        Self { start_date, end_date }
    }

    /// Number of calendar days spanned, inclusive of both endpoints.
    pub fn num_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    /// Iterate over every date in the horizon, inclusive.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        (0..self.num_days()).map(move |d| self.start_date + Duration::days(d))
    }

    /// The horizon's start instant, midnight UTC on `start_date`.
    pub fn start_instant(&self) -> DateTime<Utc> {
        self.start_date.and_hms_opt(0, 0, 0).unwrap().and_utc()
    }

    /// The horizon's end instant, the end of `end_date` (midnight the day
    /// after, exclusive boundary used as an inclusive cap for comparisons).
    pub fn end_instant(&self) -> DateTime<Utc> {
        (self.end_date + Duration::days(1))
            .and_hms_opt(0, 0, 0)
            .unwrap()
            .and_utc()
    }

    /// Total span of the horizon, in seconds.
    pub fn seconds(&self) -> f64 {
        (self.end_instant() - self.start_instant()).num_seconds() as f64
    }

    /// Whether `instant` falls within `[start_instant, end_instant]`.
    pub fn contains_instant(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start_instant() && instant <= self.end_instant()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn num_days_is_inclusive() {
        let h = Horizon::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 22).unwrap(),
        );
        assert_eq!(h.num_days(), 22);
        assert_eq!(h.dates().count(), 22);
    }

    #[test]
    fn seconds_matches_num_days() {
        let h = Horizon::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        );
        assert_eq!(h.seconds(), 86400.0);
    }
}
