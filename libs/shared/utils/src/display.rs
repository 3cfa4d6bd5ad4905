//! Human-readable schedule labels.
//!
//! Schedules are stored as naive clinic-local date-times; the labels clients
//! send and receive ("Dec 15, 2025", "10:30 AM") are parsed and rendered only
//! at the API boundary.

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use thiserror::Error;

const DATE_FORMATS: &[&str] = &["%b %d, %Y", "%Y-%m-%d"];
const TIME_FORMATS: &[&str] = &["%I:%M %p", "%I:%M%p", "%H:%M", "%H:%M:%S"];

#[derive(Debug, Error, PartialEq)]
pub enum LabelError {
    #[error("Unrecognised date '{0}', expected e.g. 'Dec 15, 2025' or '2025-12-15'")]
    Date(String),

    #[error("Unrecognised time '{0}', expected e.g. '10:30 AM' or '10:30'")]
    Time(String),
}

pub fn date_label(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

pub fn time_label(time: NaiveTime) -> String {
    time.format("%I:%M %p").to_string()
}

pub fn parse_date_label(label: &str) -> Result<NaiveDate, LabelError> {
    let label = label.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(label, format).ok())
        .ok_or_else(|| LabelError::Date(label.to_string()))
}

pub fn parse_time_label(label: &str) -> Result<NaiveTime, LabelError> {
    let label = label.trim();
    TIME_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(label, format).ok())
        .ok_or_else(|| LabelError::Time(label.to_string()))
}

pub fn parse_schedule(date: &str, time: &str) -> Result<NaiveDateTime, LabelError> {
    Ok(parse_date_label(date)?.and_time(parse_time_label(time)?))
}

/// Current wall-clock time at the clinic.
pub fn clinic_now() -> NaiveDateTime {
    Local::now().naive_local()
}

pub fn today_label() -> String {
    date_label(clinic_now().date())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_display_and_iso_dates() {
        let expected = NaiveDate::from_ymd_opt(2025, 12, 5).unwrap();
        assert_eq!(parse_date_label("Dec 5, 2025"), Ok(expected));
        assert_eq!(parse_date_label("Dec 05, 2025"), Ok(expected));
        assert_eq!(parse_date_label("2025-12-05"), Ok(expected));
    }

    #[test]
    fn parses_twelve_and_twenty_four_hour_times() {
        let expected = NaiveTime::from_hms_opt(14, 30, 0).unwrap();
        assert_eq!(parse_time_label("02:30 PM"), Ok(expected));
        assert_eq!(parse_time_label("2:30 pm"), Ok(expected));
        assert_eq!(parse_time_label("14:30"), Ok(expected));
    }

    #[test]
    fn labels_round_trip_through_display_format() {
        let at = parse_schedule("Dec 15, 2025", "09:05 AM").unwrap();
        assert_eq!(date_label(at.date()), "Dec 15, 2025");
        assert_eq!(time_label(at.time()), "09:05 AM");
    }

    #[test]
    fn rejects_free_text() {
        assert_eq!(
            parse_date_label("next tuesday"),
            Err(LabelError::Date("next tuesday".to_string()))
        );
        assert!(matches!(parse_time_label("noonish"), Err(LabelError::Time(_))));
    }
}
