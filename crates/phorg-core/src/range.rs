use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::OrganizeError;

/// Format of dates typed by the user.
pub const INPUT_FORMAT: &str = "%d/%m/%Y";

/// Inclusive day range. Time of day is ignored on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, OrganizeError> {
        if start > end {
            return Err(OrganizeError::InvalidDateRange(format!(
                "start {} is after end {}",
                start.format(INPUT_FORMAT),
                end.format(INPUT_FORMAT)
            )));
        }
        Ok(Self { start, end })
    }

    /// Parse two `DD/MM/YYYY` dates.
    pub fn parse(start: &str, end: &str) -> Result<Self, OrganizeError> {
        Self::new(parse_day(start)?, parse_day(end)?)
    }

    /// Parse a single line holding both dates, e.g. `01/01/2023 - 31/12/2023`.
    /// Dashes, commas and whitespace all separate the two halves.
    pub fn parse_pair(input: &str) -> Result<Self, OrganizeError> {
        let parts: Vec<&str> = input
            .split(|c: char| c == '-' || c == ',' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .collect();
        match parts.as_slice() {
            [start, end] => Self::parse(start, end),
            _ => Err(OrganizeError::InvalidDateRange(format!(
                "expected two dates as DD/MM/YYYY, got '{}'",
                input.trim()
            ))),
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDateTime) -> bool {
        let day = date.date();
        self.start <= day && day <= self.end
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {}",
            self.start.format(INPUT_FORMAT),
            self.end.format(INPUT_FORMAT)
        )
    }
}

fn parse_day(s: &str) -> Result<NaiveDate, OrganizeError> {
    NaiveDate::parse_from_str(s.trim(), INPUT_FORMAT)
        .map_err(|e| OrganizeError::InvalidDateRange(format!("'{}': {}", s.trim(), e)))
}
