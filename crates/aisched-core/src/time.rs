//! Date handling for extracted events.
//!
//! This module provides [`EventDate`], which classifies the date strings the
//! model produces as either all-day (`YYYYMMDD`) or timed, and implements the
//! exclusive end-date adjustment calendar services expect for all-day events.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::error::{EventError, EventResult};

/// Compact date format used by calendar links.
pub const COMPACT_DATE_FORMAT: &str = "%Y%m%d";

/// An all-day date is exactly eight digits with no time component.
static ALL_DAY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{8}$").expect("Invalid all-day regex"));

/// Returns `true` if the string has the all-day `YYYYMMDD` shape.
///
/// Only the shape is checked; use [`EventDate::parse`] to validate the date.
pub fn is_all_day(value: &str) -> bool {
    ALL_DAY_REGEX.is_match(value)
}

/// A date string as produced by the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventDate {
    /// A compact all-day date.
    AllDay(NaiveDate),
    /// Anything else, kept verbatim.
    Timed(String),
}

impl EventDate {
    /// Classifies a date string.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::InvalidDate`] when the string has the all-day
    /// shape but is not a real calendar date (e.g. `20241340`).
    pub fn parse(value: &str) -> EventResult<Self> {
        if !is_all_day(value) {
            return Ok(Self::Timed(value.to_string()));
        }
        NaiveDate::parse_from_str(value, COMPACT_DATE_FORMAT)
            .map(Self::AllDay)
            .map_err(|_| EventError::InvalidDate(value.to_string()))
    }

    /// Returns `true` for all-day dates.
    pub fn is_all_day(&self) -> bool {
        matches!(self, Self::AllDay(_))
    }

    /// Returns the exclusive end boundary for this date.
    ///
    /// All-day dates move forward by one calendar day; timed values are
    /// returned unchanged.
    pub fn exclusive_end(&self) -> EventResult<Self> {
        match self {
            Self::AllDay(date) => date
                .succ_opt()
                .map(Self::AllDay)
                .ok_or_else(|| EventError::InvalidDate(self.to_compact())),
            Self::Timed(_) => Ok(self.clone()),
        }
    }

    /// Serializes back to the form used in calendar links.
    pub fn to_compact(&self) -> String {
        match self {
            Self::AllDay(date) => date.format(COMPACT_DATE_FORMAT).to_string(),
            Self::Timed(raw) => raw.clone(),
        }
    }
}

/// Removes dashes from an ISO-style date (`2024-03-20` → `20240320`).
pub fn strip_dashes(value: &str) -> String {
    value.replace('-', "")
}
