//! Observer site constants and the degrees-string parser used by the
//! original MeerKAT/SKA scheduling tooling (`"-30:42:39.8"` style strings).

use qtty::Degrees;

/// SKA site latitude, degrees (south negative).
pub const SKA_LATITUDE_STR: &str = "-30:42:39.8";
/// SKA site longitude, degrees East.
pub const SKA_LONGITUDE_STR: &str = "21:26:38.0";

/// Parse a sexagesimal degrees string of the form `"[-]hh:mm:ss.s"` into a
/// decimal-degrees `f64`.
pub fn degrees_string_to_float(degrees: &str) -> f64 {
    let (sign, rest) = match degrees.strip_prefix('-') {
        Some(rest) => (-1.0, rest),
        None => (1.0, degrees),
    };
    let mut parts = rest.split(':');
    let h: f64 = parts.next().unwrap_or("0").trim().parse().unwrap_or(0.0);
    let m: f64 = parts.next().unwrap_or("0").trim().parse().unwrap_or(0.0);
    let s: f64 = parts.next().unwrap_or("0").trim().parse().unwrap_or(0.0);
    sign * (h + m / 60.0 + s / 3600.0)
}

/// SKA site latitude in decimal degrees.
pub fn ska_latitude() -> f64 {
    degrees_string_to_float(SKA_LATITUDE_STR)
}

/// SKA site longitude in decimal degrees.
pub fn ska_longitude() -> f64 {
    degrees_string_to_float(SKA_LONGITUDE_STR)
}

/// `SKA_LATITUDE` evaluated once, matching the constant of the same name in
/// the original `ga/utils.py`.
pub static SKA_LATITUDE: f64 = -30.711055555555554;
/// `SKA_LONGITUDE` evaluated once.
pub static SKA_LONGITUDE: f64 = 21.44388888888889;

/// A fixed, process-wide observer location.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObserverSite {
    pub latitude: Degrees,
    pub longitude: Degrees,
}

impl ObserverSite {
    pub fn new(latitude_deg: f64, longitude_deg: f64) -> Self {
        Self {
            latitude: Degrees::new(latitude_deg),
            longitude: Degrees::new(longitude_deg),
        }
    }

    /// The SKA site, as used throughout the original scheduling tooling.
    pub fn ska() -> Self {
        Self::new(SKA_LATITUDE, SKA_LONGITUDE)
    }
}

impl Default for ObserverSite {
    fn default() -> Self {
        Self::ska()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_negative_sexagesimal_string() {
        let v = degrees_string_to_float(SKA_LATITUDE_STR);
        assert!((v - SKA_LATITUDE).abs() < 1e-6);
    }

    #[test]
    fn parses_positive_sexagesimal_string() {
        let v = degrees_string_to_float(SKA_LONGITUDE_STR);
        assert!((v - SKA_LONGITUDE).abs() < 1e-6);
    }

    #[test]
    fn default_site_is_ska() {
        let site = ObserverSite::default();
        assert!((site.latitude.value() - SKA_LATITUDE).abs() < 1e-6);
    }
}
