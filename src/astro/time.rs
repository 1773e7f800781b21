//! Julian date, Greenwich Mean Sidereal Time, and LST→UTC conversion.
//!
//! Grounded directly on `ga/utils.py`'s `julian_date`/`gmst_at_0h_utc`/
//! `lst_to_utc` (Fliegel–Van Flandern JDN plus day fraction, then the
//! standard linear GMST-at-0h approximation).

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};

use super::site::SKA_LONGITUDE;

/// Convert a UTC instant to its Julian Date.
///
/// Uses the Fliegel–Van Flandern algorithm for the Julian Day Number, then
/// adds the fractional day computed from the time-of-day (noon-referenced,
/// per the convention `JD = JDN + (h-12)/24 + min/1440 + sec/86400`).
pub fn julian_date(instant: DateTime<Utc>) -> f64 {
    use chrono::Datelike;
    let y0 = instant.year() as i64;
    let m0 = instant.month() as i64;
    let d0 = instant.day() as i64;

    let a = (14 - m0).div_euclid(12);
    let y = y0 + 4800 - a;
    let m = m0 + 12 * a - 3;

    let jdn = d0 + (153 * m + 2).div_euclid(5) + 365 * y + y.div_euclid(4) - y.div_euclid(100)
        + y.div_euclid(400)
        - 32045;

    use chrono::Timelike;
    let h = instant.hour() as f64;
    let min = instant.minute() as f64;
    let sec = instant.second() as f64 + instant.nanosecond() as f64 / 1e9;

    jdn as f64 + (h - 12.0) / 24.0 + min / 1440.0 + sec / 86400.0
}

/// Greenwich Mean Sidereal Time at 0h UTC on the day containing `jd`,
/// in decimal hours, normalized to `[0, 24)`.
pub fn gmst_at_0h_utc(jd: f64) -> f64 {
    let d = jd - 2451545.0;
    let gmst = 6.697374558 + 0.06570982441908 * d;
    gmst.rem_euclid(24.0)
}

/// Convert Local Sidereal Time on `date` (a UTC calendar date) to the
/// corresponding UTC instant, at the given observer longitude (degrees
/// East).
///
/// This is the approximate method used throughout the original scheduling
/// tooling: compute Greenwich Sidereal Time from LST and longitude, find
/// its offset from GMST at 0h UTC, then scale the sidereal-hours offset
/// down to solar (UTC) hours by the sidereal/solar rate ratio.
pub fn lst_to_utc(date: NaiveDate, lst_time: NaiveTime, longitude_deg: f64) -> DateTime<Utc> {
    use chrono::Timelike;
    let lst_hours = lst_time.hour() as f64 + lst_time.minute() as f64 / 60.0 + lst_time.second() as f64 / 3600.0;

    let longitude_hours = longitude_deg / 15.0;

    let midnight = date.and_hms_opt(0, 0, 0).unwrap().and_utc();
    let jd_0h = julian_date(midnight);
    let gmst0 = gmst_at_0h_utc(jd_0h);

    let gst = (lst_hours - longitude_hours).rem_euclid(24.0);
    let delta_sidereal_hours = (gst - gmst0).rem_euclid(24.0);

    const SIDEREAL_TO_SOLAR: f64 = 0.9972695663;
    let delta_solar_hours = delta_sidereal_hours * SIDEREAL_TO_SOLAR;

    let delta = Duration::milliseconds((delta_solar_hours * 3_600_000.0).round() as i64);
    let utc = midnight + delta;
    // Truncate to whole seconds, matching the original `.replace(microsecond=0)`.
    utc - Duration::nanoseconds(utc.timestamp_subsec_nanos() as i64)
}

/// Convenience overload using the SKA site's longitude.
pub fn lst_to_utc_ska(date: NaiveDate, lst_time: NaiveTime) -> DateTime<Utc> {
    lst_to_utc(date, lst_time, SKA_LONGITUDE)
}

/// Convert a UTC instant to Local Sidereal Time, in decimal hours
/// normalized to `[0, 24)`.
///
/// Uses the IAU 1982 GMST polynomial (more precise than the linear
/// `gmst_at_0h_utc` approximation used by [`lst_to_utc`]), matching the
/// `UTC_to_LST` helper the original interval-tree construction relies on.
pub fn utc_to_lst(instant: DateTime<Utc>, longitude_deg: f64) -> f64 {
    let jd = julian_date(instant);
    let t = (jd - 2451545.0) / 36525.0;
    let gmst_deg = 280.46061837 + 360.98564736629 * (jd - 2451545.0) + 0.000387933 * t * t
        - t * t * t / 38_710_000.0;
    let gmst_hours = (gmst_deg / 15.0).rem_euclid(24.0);
    (gmst_hours + longitude_deg / 15.0).rem_euclid(24.0)
}
