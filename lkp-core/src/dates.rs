use crate::error::{LakeError, Result};
use chrono::{NaiveDate, TimeDelta};
use std::mem::replace;

/// A date range iterator that yields each date from the start date
/// through the end date (inclusive).
#[derive(Clone, Eq, PartialEq, Copy, Debug)]
pub struct DateRange(pub NaiveDate, pub NaiveDate);

impl Iterator for DateRange {
    type Item = NaiveDate;
    fn next(&mut self) -> Option<Self::Item> {
        if self.0 <= self.1 {
            let next = self.0 + TimeDelta::try_days(1).unwrap();
            Some(replace(&mut self.0, next))
        } else {
            None
        }
    }
}

/// Format a NaiveDate as "YYYY-MM-DD"
pub fn format_date(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Parse a date string in "YYYY-MM-DD" format
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|e| LakeError::DateParse(e.to_string()))
}

/// First simulated day of a year span (January 1 of the start year).
pub fn span_start(start_year: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(start_year, 1, 1).unwrap()
}

/// Last simulated day of a year span (December 31 of the end year).
pub fn span_end(end_year: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(end_year, 12, 31).unwrap()
}

/// Every calendar day of the simulation period, in order.
pub fn simulation_days(start_year: i32, end_year: i32) -> Vec<NaiveDate> {
    DateRange(span_start(start_year), span_end(end_year)).collect()
}
