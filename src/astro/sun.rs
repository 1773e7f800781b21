//! Sunrise/sunset (standard almanac formula) and the site-local night-window
//! proxy.
//!
//! Grounded on `ga/utils.py`'s `get_sunrise_sunset`/`get_night_window`.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use std::f64::consts::PI;

use super::site::{SKA_LATITUDE, SKA_LONGITUDE};

const ZENITH_DEG: f64 = 90.0 + 50.0 / 60.0;
const TO_RAD: f64 = PI / 180.0;

/// Force `v` into `[0, modulus)`.
fn force_range(v: f64, modulus: f64) -> f64 {
    if v < 0.0 {
        v + modulus
    } else if v >= modulus {
        v - modulus
    } else {
        v
    }
}

/// Sunrise and sunset for `date` at `(latitude_deg, longitude_deg)`, in UTC.
///
/// Returns `(None, None)` when the sun never rises or never sets that day
/// (the `SunNeverRisesOrSets` condition of §7 — not fatal, callers treat the
/// affected feasibility test as failed).
pub fn sunrise_sunset(
    date: NaiveDate,
    latitude_deg: f64,
    longitude_deg: f64,
) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
    let n = date.ordinal() as f64;
    let lng_hour = longitude_deg / 15.0;

    let t_rise = n + (6.0 - lng_hour) / 24.0;
    let t_set = n + (18.0 - lng_hour) / 24.0;

    let m_rise = 0.9856 * t_rise - 3.289;
    let m_set = 0.9856 * t_set - 3.289;

    let mut l_rise = m_rise
        + 1.916 * (TO_RAD * m_rise).sin()
        + 0.020 * (TO_RAD * 2.0 * m_rise).sin()
        + 282.634;
    let mut l_set = m_set
        + 1.916 * (TO_RAD * m_set).sin()
        + 0.020 * (TO_RAD * 2.0 * m_set).sin()
        + 282.634;
    l_rise = force_range(l_rise, 360.0);
    l_set = force_range(l_set, 360.0);

    let sin_dec_rise = 0.39782 * (TO_RAD * l_rise).sin();
    let cos_dec_rise = sin_dec_rise.asin().cos();
    let sin_dec_set = 0.39782 * (TO_RAD * l_set).sin();
    let cos_dec_set = sin_dec_set.asin().cos();

    let cos_h_rise = ((TO_RAD * ZENITH_DEG).cos() - sin_dec_rise * (TO_RAD * latitude_deg).sin())
        / (cos_dec_rise * (TO_RAD * latitude_deg).cos());
    let cos_h_set = ((TO_RAD * ZENITH_DEG).cos() - sin_dec_set * (TO_RAD * latitude_deg).sin())
        / (cos_dec_set * (TO_RAD * latitude_deg).cos());

    if cos_h_rise > 1.0 {
        return (None, None); // sun never rises
    }
    if cos_h_set < -1.0 {
        return (None, None); // sun never sets
    }

    let mut h_rise = 360.0 - (1.0 / TO_RAD) * cos_h_rise.acos();
    let mut h_set = (1.0 / TO_RAD) * cos_h_set.acos();
    h_rise /= 15.0;
    h_set /= 15.0;

    let mut ra_rise = (1.0 / TO_RAD) * (0.91764 * (TO_RAD * l_rise).tan()).atan();
    let mut ra_set = (1.0 / TO_RAD) * (0.91764 * (TO_RAD * l_set).tan()).atan();
    ra_rise = force_range(ra_rise, 360.0);
    ra_set = force_range(ra_set, 360.0);

    let l_quadrant_rise = (l_rise / 90.0).floor() * 90.0;
    let ra_quadrant_rise = (ra_rise / 90.0).floor() * 90.0;
    ra_rise += l_quadrant_rise - ra_quadrant_rise;

    let l_quadrant_set = (l_set / 90.0).floor() * 90.0;
    let ra_quadrant_set = (ra_set / 90.0).floor() * 90.0;
    ra_set += l_quadrant_set - ra_quadrant_set;

    ra_rise /= 15.0;
    ra_set /= 15.0;

    let t_rise_local = h_rise + ra_rise - 0.06571 * t_rise - 6.622;
    let t_set_local = h_set + ra_set - 0.06571 * t_set - 6.622;

    let mut ut_rise = t_rise_local - lng_hour;
    let mut ut_set = t_set_local - lng_hour;

    ut_rise = (ut_rise * 100.0).round() / 100.0;
    ut_set = (ut_set * 100.0).round() / 100.0;

    ut_rise = force_range(ut_rise, 24.0);
    ut_set = force_range(ut_set, 24.0);

    let midnight = date.and_hms_opt(0, 0, 0).unwrap().and_utc();
    let sunrise = midnight + Duration::milliseconds((ut_rise * 3_600_000.0).round() as i64);
    let sunset = midnight + Duration::milliseconds((ut_set * 3_600_000.0).round() as i64);

    // Truncate to whole minutes, matching the original `.replace(second=0, microsecond=0)`.
    let trunc = |dt: DateTime<Utc>| dt - Duration::seconds(dt.timestamp() % 60);

    (Some(trunc(sunrise)), Some(trunc(sunset)))
}

/// Sunrise/sunset at the SKA site.
pub fn sunrise_sunset_ska(date: NaiveDate) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
    sunrise_sunset(date, SKA_LATITUDE, SKA_LONGITUDE)
}

/// The site-local night-window proxy: `[18:00, 06:00 next day]`, naive UTC
/// instants. A stricter refinement could substitute real civil/astronomical
/// twilight in place of this fixed clock window.
pub fn night_window(date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = date.and_hms_opt(18, 0, 0).unwrap().and_utc();
    let end = start + Duration::hours(12);
    (start, end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn assert_close_time(got: DateTime<Utc>, expected_h: u32, expected_m: u32, tolerance_s: i64) {
        let expected = got
            .date_naive()
            .and_hms_opt(expected_h, expected_m, 0)
            .unwrap()
            .and_utc();
        let diff = (got - expected).num_seconds().abs();
        assert!(
            diff <= tolerance_s,
            "expected ~{expected_h:02}:{expected_m:02}, got {:02}:{:02} (diff {diff}s)",
            got.hour(),
            got.minute()
        );
    }

    #[test]
    fn e3_summer_solstice_2025() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 21).unwrap();
        let (rise, set) = sunrise_sunset_ska(date);
        let rise = rise.unwrap() + Duration::hours(2);
        let set = set.unwrap() + Duration::hours(2);
        assert_close_time(rise, 7, 31, 60);
        assert_close_time(set, 17, 41, 60);
    }

    #[test]
    fn e4_winter_solstice_2025() {
        let date = NaiveDate::from_ymd_opt(2025, 12, 21).unwrap();
        let (rise, set) = sunrise_sunset_ska(date);
        let rise = rise.unwrap() + Duration::hours(2);
        let set = set.unwrap() + Duration::hours(2);
        assert_close_time(rise, 5, 27, 60);
        assert_close_time(set, 19, 36, 60);
    }

    #[test]
    fn night_window_spans_twelve_hours() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let (start, end) = night_window(date);
        assert_eq!((end - start).num_hours(), 12);
        assert_eq!(start.hour(), 18);
        assert_eq!(end.hour(), 6);
    }

    #[test]
    fn sunrise_never_happens_at_pole_in_midsummer() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 21).unwrap();
        let (rise, set) = sunrise_sunset(date, 89.9, 0.0);
        assert_eq!((rise, set), (None, None));
    }
}
