//! CSV proposal ingestion (§6).
//!
//! Required columns: `id, owner_email, lst_start, lst_start_end,
//! simulated_duration, night_obs, avoid_sunrise_sunset, minimum_antennas`.
//! Optional repeated columns `prefered_dates_start_N`/`prefered_dates_end_N`
//! and `avoid_dates_start_N`/`avoid_dates_end_N`, `N` starting at 1.
//!
//! Grounded on the original loader's row-skip rules, with one correction:
//! the source variant that guards `avoid_sunrise_sunset` with
//! `.lower` (a bound-method reference, never called) silently treated every
//! row as truthy; here the column is actually lowercased before comparison.

use std::collections::HashMap;
use std::io::Read;

use chrono::{NaiveDate, NaiveTime};

use crate::error::{SchedulerError, SchedulerResult};
use crate::model::{DateRange, Proposal};

/// Parse proposals out of a UTF-8 CSV document with a header row. Rows that
/// fail validation are skipped (and logged), per the error-handling policy
/// that ingestion failures never propagate into the optimizer.
pub fn ingest<R: Read>(reader: R) -> SchedulerResult<Vec<Proposal>> {
    let mut rdr = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);
    let headers = rdr.headers()?.clone();

    let mut proposals = Vec::new();
    for (row_number, record) in rdr.records().enumerate() {
        let record = record?;
        let row: HashMap<&str, &str> = headers.iter().zip(record.iter()).collect();

        match parse_row(&row) {
            Some(proposal) => proposals.push(proposal),
            None => log::warn!("skipping CSV row {} (line {}): failed validation", row_number, row_number + 2),
        }
    }
    Ok(proposals)
}

fn parse_row(row: &HashMap<&str, &str>) -> Option<Proposal> {
    let id: i64 = row.get("id")?.trim().parse().ok()?;
    let owner_email = row.get("owner_email")?.trim().to_string();

    let lst_start = parse_time(row.get("lst_start")?)?;
    let lst_start_end = parse_time(row.get("lst_start_end")?)?;

    let duration_seconds: i64 = row.get("simulated_duration")?.trim().parse().ok()?;
    if duration_seconds <= 0 {
        return None;
    }

    let minimum_antennas_raw = row.get("minimum_antennas")?.trim();
    if minimum_antennas_raw.is_empty() {
        return None;
    }
    let minimum_antennas: i64 = minimum_antennas_raw.parse().ok()?;
    if minimum_antennas <= 0 {
        return None;
    }

    let night_obs = parse_yes_no(row.get("night_obs").copied().unwrap_or("no"));
    let avoid_sunrise_sunset = parse_yes_no(row.get("avoid_sunrise_sunset").copied().unwrap_or("no"));

    Some(Proposal {
        id,
        owner_email,
        duration_seconds,
        lst_start,
        lst_start_end,
        night_obs,
        avoid_sunrise_sunset,
        minimum_antennas: minimum_antennas as u32,
        priority: row.get("score").and_then(|v| v.trim().parse().ok()).unwrap_or(1.0),
        preferred_dates: parse_date_ranges(row, "prefered_dates_start", "prefered_dates_end"),
        avoided_dates: parse_date_ranges(row, "avoid_dates_start", "avoid_dates_end"),
    })
}

fn parse_time(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M:%S").or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M")).ok()
}

fn parse_yes_no(raw: &str) -> bool {
    matches!(raw.trim().to_lowercase().as_str(), "yes" | "true" | "1")
}

fn parse_date_ranges(row: &HashMap<&str, &str>, start_prefix: &str, end_prefix: &str) -> Vec<DateRange> {
    let mut ranges = Vec::new();
    let mut n = 1;
    loop {
        let start_key = format!("{start_prefix}_{n}");
        let end_key = format!("{end_prefix}_{n}");
        let (Some(start_raw), Some(end_raw)) = (row.get(start_key.as_str()), row.get(end_key.as_str())) else {
            break;
        };
        let (Some(start), Some(end)) = (parse_date(start_raw), parse_date(end_raw)) else {
            n += 1;
            continue;
        };
        ranges.push(DateRange { start, end });
        n += 1;
    }
    ranges
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

/// Convenience wrapper returning [`SchedulerError::InvalidTimeFormat`] when
/// the document itself is malformed enough that `csv` can't even iterate
/// it (used at the CLI/HTTP boundary, where a hard failure should surface
/// as a 400 rather than silently yielding zero proposals).
pub fn ingest_strict<R: Read>(reader: R) -> SchedulerResult<Vec<Proposal>> {
    let proposals = ingest(reader)?;
    if proposals.is_empty() {
        return Err(SchedulerError::InvalidTimeFormat("no valid proposal rows found".into()));
    }
    Ok(proposals)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "id,owner_email,lst_start,lst_start_end,simulated_duration,night_obs,avoid_sunrise_sunset,minimum_antennas\n";

    #[test]
    fn parses_a_well_formed_row() {
        let csv = format!("{HEADER}1,a@b.com,10:00:00,12:00:00,3600,yes,no,4\n");
        let proposals = ingest(csv.as_bytes()).unwrap();
        assert_eq!(proposals.len(), 1);
        assert_eq!(proposals[0].id, 1);
        assert!(proposals[0].night_obs);
        assert!(!proposals[0].avoid_sunrise_sunset);
        assert_eq!(proposals[0].minimum_antennas, 4);
    }

    #[test]
    fn skips_rows_with_non_positive_duration() {
        let csv = format!("{HEADER}1,a@b.com,10:00:00,12:00:00,0,no,no,4\n2,a@b.com,10:00:00,12:00:00,-5,no,no,4\n");
        let proposals = ingest(csv.as_bytes()).unwrap();
        assert!(proposals.is_empty());
    }

    #[test]
    fn skips_rows_with_empty_or_non_positive_minimum_antennas() {
        let csv = format!("{HEADER}1,a@b.com,10:00:00,12:00:00,3600,no,no,\n2,a@b.com,10:00:00,12:00:00,3600,no,no,0\n");
        let proposals = ingest(csv.as_bytes()).unwrap();
        assert!(proposals.is_empty());
    }

    #[test]
    fn yes_no_parsing_is_case_insensitive() {
        let csv = format!("{HEADER}1,a@b.com,10:00:00,12:00:00,3600,YES,No,4\n");
        let proposals = ingest(csv.as_bytes()).unwrap();
        assert!(proposals[0].night_obs);
        assert!(!proposals[0].avoid_sunrise_sunset);
    }

    #[test]
    fn parses_repeated_preferred_date_columns() {
        let csv = "id,owner_email,lst_start,lst_start_end,simulated_duration,night_obs,avoid_sunrise_sunset,minimum_antennas,prefered_dates_start_1,prefered_dates_end_1\n\
                   1,a@b.com,10:00:00,12:00:00,3600,no,no,4,2024-01-01,2024-01-05\n";
        let proposals = ingest(csv.as_bytes()).unwrap();
        assert_eq!(proposals[0].preferred_dates.len(), 1);
        assert_eq!(proposals[0].preferred_dates[0].start, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    }

    #[test]
    fn ingest_strict_errors_on_zero_valid_rows() {
        let csv = format!("{HEADER}1,a@b.com,10:00:00,12:00:00,0,no,no,4\n");
        assert!(ingest_strict(csv.as_bytes()).is_err());
    }
}
