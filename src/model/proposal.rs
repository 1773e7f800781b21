//! Proposal records and the feasibility predicate.
//!
//! Grounded on `ga/proposal.py`'s `lst_start_end_time_constraint_met`/
//! `night_obs_constraint_met`/`avoid_sunriset_sunset_constraint_met`/
//! `can_be_scheduled_proposal`, correcting two bugs documented as open
//! questions: the sunrise/sunset avoidance window is computed from
//! `simulated_duration` **seconds** (the source mixes `timedelta(minutes=…)`
//! in some variants), and `can_be_scheduled_proposal`'s existential check —
//! a proposal is schedulable if *any* day in the horizon admits it, not
//! every day.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};

use crate::astro::{night_window, sunrise_sunset};

use super::horizon::Horizon;

/// A preferred or avoided calendar-date range attached to a proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// An immutable input proposal.
#[derive(Debug, Clone)]
pub struct Proposal {
    pub id: i64,
    pub owner_email: String,
    /// Simulated duration, seconds. Invariant: > 0.
    pub duration_seconds: i64,
    /// `[lst_start, lst_start_end]`, both times-of-day; the window may wrap
    /// midnight when `lst_start_end < lst_start`.
    pub lst_start: NaiveTime,
    pub lst_start_end: NaiveTime,
    pub night_obs: bool,
    pub avoid_sunrise_sunset: bool,
    /// Invariant: >= 1.
    pub minimum_antennas: u32,
    /// Invariant: >= 1.
    pub priority: f64,
    pub preferred_dates: Vec<DateRange>,
    pub avoided_dates: Vec<DateRange>,
}

impl Proposal {
    pub fn duration(&self) -> Duration {
        Duration::seconds(self.duration_seconds)
    }

    /// LST start-window test (§4.2.1): convert the proposal's LST window
    /// endpoints to UTC for `t`'s calendar date, then test membership,
    /// handling midnight wraparound.
    fn lst_window_contains(&self, t: DateTime<Utc>) -> bool {
        let date = t.date_naive();
        let lo = crate::astro::lst_to_utc(date, self.lst_start, self.lst_longitude());
        let hi = crate::astro::lst_to_utc(date, self.lst_start_end, self.lst_longitude());

        if hi < lo {
            let next_midnight = (date + Duration::days(1)).and_hms_opt(0, 0, 0).unwrap().and_utc();
            let midnight = date.and_hms_opt(0, 0, 0).unwrap().and_utc();
            (t >= lo && t <= next_midnight) || (t >= midnight && t <= hi)
        } else {
            t >= lo && t <= hi
        }
    }

    /// Longitude to use for LST conversion. Proposals don't carry their own
    /// site, so this always resolves to the SKA site; kept as a method so a
    /// future multi-site extension has a single seam to change.
    fn lst_longitude(&self) -> f64 {
        crate::astro::site::SKA_LONGITUDE
    }

    /// Night-observation test (§4.2.2).
    fn night_obs_met(&self, t: DateTime<Utc>) -> bool {
        if !self.night_obs {
            return true;
        }
        let end = t + self.duration();
        let (night_start, night_end) = night_window(t.date_naive());
        t >= night_start && t <= night_end && end >= night_start && end <= night_end
    }

    /// Sunrise/sunset avoidance test (§4.2.3).
    fn avoid_sunrise_sunset_met(&self, t: DateTime<Utc>) -> bool {
        if !self.avoid_sunrise_sunset {
            return true;
        }
        let end = t + self.duration();
        let (sunrise, sunset) = sunrise_sunset(
            t.date_naive(),
            crate::astro::site::SKA_LATITUDE,
            crate::astro::site::SKA_LONGITUDE,
        );
        let strictly_within = |instant: DateTime<Utc>| t < instant && instant < end;
        let sunrise_clashes = sunrise.is_some_and(strictly_within);
        let sunset_clashes = sunset.is_some_and(strictly_within);
        !(sunrise_clashes || sunset_clashes)
    }

    /// Antenna availability test (§4.2.4). The constant form: a fixed
    /// antenna count is available at every instant.
    fn antennas_met(&self, antennas_available: u32) -> bool {
        antennas_available >= self.minimum_antennas
    }

    /// The core feasibility predicate: can this proposal start at `t`?
    pub fn feasible(&self, t: DateTime<Utc>, antennas_available: u32) -> bool {
        self.lst_window_contains(t)
            && self.night_obs_met(t)
            && self.avoid_sunrise_sunset_met(t)
            && self.antennas_met(antennas_available)
    }

    /// Horizon-level predicate: does *some* date in `horizon` admit a start
    /// time that passes every feasibility test, checked at both the
    /// earliest and latest admissible LST-window instants for that date?
    pub fn schedulable(&self, horizon: &Horizon, antennas_available: u32) -> bool {
        horizon.dates().any(|date| {
            let lo = crate::astro::lst_to_utc(date, self.lst_start, self.lst_longitude());
            let hi = crate::astro::lst_to_utc(date, self.lst_start_end, self.lst_longitude());
            [lo, hi]
                .into_iter()
                .any(|t| self.feasible(t, antennas_available))
        })
    }
}
