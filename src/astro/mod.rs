//! Astronomical primitives: Julian date, GMST, LST↔UTC conversion,
//! sunrise/sunset, and the night-window proxy. Pure functions; no hidden
//! state.
//!
//! Malformed inputs never occur here — callers are expected to have
//! validated time-of-day/date values before reaching these functions (see
//! [`crate::error::SchedulerError::InvalidTimeFormat`]).

pub mod site;
pub mod sun;
pub mod time;

pub use site::ObserverSite;
pub use sun::{night_window, sunrise_sunset};
pub use time::{gmst_at_0h_utc, julian_date, lst_to_utc, utc_to_lst};
