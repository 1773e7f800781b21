//! Data Transfer Objects for the timetable submission API (§6).
//!
//! The wire format accepts the original source's loosely-typed
//! `night_obs`/`avoid_sunrise_sunset` fields, which travel as either a JSON
//! boolean or a `"yes"`/`"no"` string depending on the producer.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::model::{DateRange, Proposal};

/// `POST /api/v1/timetables` request body.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTimetableRequest {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub proposals: Vec<ProposalDto>,
}

/// One proposal as received over the wire.
#[derive(Debug, Clone, Deserialize)]
pub struct ProposalDto {
    pub id: i64,
    pub owner_email: String,
    pub lst_start_time: String,
    pub lst_start_end_time: String,
    pub simulated_duration: i64,
    #[serde(default, deserialize_with = "deserialize_bool_or_yes_no")]
    pub night_obs: bool,
    #[serde(default, deserialize_with = "deserialize_bool_or_yes_no")]
    pub avoid_sunrise_sunset: bool,
    pub minimum_antennas: u32,
    #[serde(default)]
    pub prefered_dates_start: Vec<NaiveDate>,
    #[serde(default)]
    pub prefered_dates_end: Vec<NaiveDate>,
    #[serde(default)]
    pub avoid_dates_start: Vec<NaiveDate>,
    #[serde(default)]
    pub avoid_dates_end: Vec<NaiveDate>,
    #[serde(default = "default_score")]
    pub score: f64,
}

fn default_score() -> f64 {
    1.0
}

/// Accepts a JSON `true`/`false` or a `"yes"`/`"no"` (case-insensitive)
/// string, matching the inconsistent typing the original API clients send.
fn deserialize_bool_or_yes_no<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolOrString {
        Bool(bool),
        Str(String),
    }

    match BoolOrString::deserialize(deserializer)? {
        BoolOrString::Bool(b) => Ok(b),
        BoolOrString::Str(s) => Ok(matches!(s.trim().to_lowercase().as_str(), "yes" | "true" | "1")),
    }
}

impl ProposalDto {
    /// Parse `"HH:MM[:SS]"` into the matching `NaiveTime`.
    fn parse_time(raw: &str) -> Option<NaiveTime> {
        let raw = raw.trim();
        NaiveTime::parse_from_str(raw, "%H:%M:%S").or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M")).ok()
    }

    /// Convert into the core `Proposal` type, rejecting malformed time
    /// fields (§7: `InvalidTimeFormat` surfaces as HTTP 400, never reaches
    /// the optimizer).
    pub fn into_proposal(self) -> Result<Proposal, String> {
        let lst_start = Self::parse_time(&self.lst_start_time)
            .ok_or_else(|| format!("proposal {}: invalid lst_start_time {:?}", self.id, self.lst_start_time))?;
        let lst_start_end = Self::parse_time(&self.lst_start_end_time)
            .ok_or_else(|| format!("proposal {}: invalid lst_start_end_time {:?}", self.id, self.lst_start_end_time))?;

        if self.simulated_duration <= 0 {
            return Err(format!("proposal {}: simulated_duration must be > 0", self.id));
        }
        if self.minimum_antennas < 1 {
            return Err(format!("proposal {}: minimum_antennas must be >= 1", self.id));
        }

        let preferred_dates = zip_date_ranges(&self.prefered_dates_start, &self.prefered_dates_end);
        let avoided_dates = zip_date_ranges(&self.avoid_dates_start, &self.avoid_dates_end);

        Ok(Proposal {
            id: self.id,
            owner_email: self.owner_email,
            duration_seconds: self.simulated_duration,
            lst_start,
            lst_start_end,
            night_obs: self.night_obs,
            avoid_sunrise_sunset: self.avoid_sunrise_sunset,
            minimum_antennas: self.minimum_antennas,
            priority: self.score.max(1.0),
            preferred_dates,
            avoided_dates,
        })
    }
}

fn zip_date_ranges(starts: &[NaiveDate], ends: &[NaiveDate]) -> Vec<DateRange> {
    starts
        .iter()
        .zip(ends.iter())
        .map(|(&start, &end)| DateRange { start, end })
        .collect()
}

/// `POST`/`GET`/`PUT` response body.
#[derive(Debug, Clone, Serialize)]
pub struct TimetableResponse {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub schedules: Vec<ScheduleEntryDto>,
}

/// One binding in a `TimetableResponse`.
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleEntryDto {
    pub proposal: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_datetime: Option<String>,
}

impl From<crate::db::StoredTimetable> for TimetableResponse {
    fn from(t: crate::db::StoredTimetable) -> Self {
        Self {
            start_date: t.start_date,
            end_date: t.end_date,
            schedules: t
                .schedules
                .into_iter()
                .map(|e| ScheduleEntryDto {
                    proposal: e.proposal_id,
                    start_datetime: e.start_datetime.map(|dt| dt.format("%Y-%m-%dT%H:%M:%S").to_string()),
                })
                .collect(),
        }
    }
}
