//! Event types produced by the language model.
//!
//! This module provides the vendor-agnostic shapes every provider adapter
//! must produce:
//! - [`NormalizedResponse`]: which function the model called, with its payload
//! - [`EventData`]: a single event, possibly recurring
//! - [`Recurrence`]: optional recurrence rule components
//! - [`IcalFile`]: a complete calendar file generated by the model

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{EventError, EventResult};

/// Function name for single-event extraction.
pub const GET_EVENT_INFORMATION: &str = "get_event_information";

/// Function name for full calendar file generation.
pub const GENERATE_ICAL_FILE: &str = "generate_ical_file";

/// The function the model chose to invoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FunctionUsed {
    /// Extract one event and open it as a calendar link.
    GetEventInformation,
    /// Emit a complete iCalendar file for download.
    GenerateIcalFile,
}

impl FunctionUsed {
    /// Every function the compiler understands.
    pub const ALL: [FunctionUsed; 2] = [Self::GetEventInformation, Self::GenerateIcalFile];

    /// Returns the wire name of this function.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GetEventInformation => GET_EVENT_INFORMATION,
            Self::GenerateIcalFile => GENERATE_ICAL_FILE,
        }
    }

    /// Looks up a function by its exact wire name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == name)
    }
}

impl fmt::Display for FunctionUsed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single event extracted from free-form text.
///
/// Dates are kept as the strings the model produced: either a compact
/// `YYYYMMDD` date (all-day) or a date-time form such as `20240610T090000`.
/// See [`crate::time::EventDate`] for how the two are told apart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventData {
    /// Event title.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    /// Event location, empty when unknown.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub location: String,
    /// Free-form description, empty when unknown.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    /// Start date or date-time.
    pub start_date: String,
    /// End date or date-time; defaults to the start when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    /// Recurrence rule, if the event repeats.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<Recurrence>,
}

impl EventData {
    /// Creates a new event with a title and start date.
    pub fn new(title: impl Into<String>, start_date: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            start_date: start_date.into(),
            ..Default::default()
        }
    }

    /// Builder method to set the location.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    /// Builder method to set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Builder method to set the end date.
    pub fn with_end_date(mut self, end_date: impl Into<String>) -> Self {
        self.end_date = Some(end_date.into());
        self
    }

    /// Builder method to set the recurrence rule.
    pub fn with_recurrence(mut self, recurrence: Recurrence) -> Self {
        self.recurrence = Some(recurrence);
        self
    }

    /// Returns the end date if the model supplied a non-empty one.
    pub fn end_date(&self) -> Option<&str> {
        self.end_date.as_deref().filter(|s| !s.is_empty())
    }
}

/// Recurrence components of an event.
///
/// Every field is optional. A field that is absent, empty, or zero is treated
/// as missing and its rule component is not emitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recurrence {
    /// Frequency such as `daily`, `weekly`, `monthly`, `yearly`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<String>,
    /// Interval between occurrences.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_interval"
    )]
    pub interval: Option<u32>,
    /// Weekday codes (`MO`, `TU`, ...), order preserved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days: Option<Vec<String>>,
    /// Last date of the series.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    /// Dates excluded from the series.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exceptions: Option<Vec<String>>,
}

impl Recurrence {
    /// Creates an empty recurrence.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the frequency.
    pub fn with_frequency(mut self, frequency: impl Into<String>) -> Self {
        self.frequency = Some(frequency.into());
        self
    }

    /// Builder method to set the interval.
    pub fn with_interval(mut self, interval: u32) -> Self {
        self.interval = Some(interval);
        self
    }

    /// Builder method to set the weekdays.
    pub fn with_days<I, S>(mut self, days: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.days = Some(days.into_iter().map(Into::into).collect());
        self
    }

    /// Builder method to set the series end date.
    pub fn with_end_date(mut self, end_date: impl Into<String>) -> Self {
        self.end_date = Some(end_date.into());
        self
    }

    /// Builder method to set the excluded dates.
    pub fn with_exceptions<I, S>(mut self, exceptions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exceptions = Some(exceptions.into_iter().map(Into::into).collect());
        self
    }

    /// Returns the frequency if present and non-empty.
    pub fn frequency(&self) -> Option<&str> {
        self.frequency.as_deref().filter(|s| !s.is_empty())
    }

    /// Returns the interval if present and non-zero.
    pub fn interval(&self) -> Option<u32> {
        self.interval.filter(|i| *i > 0)
    }

    /// Returns the weekday codes, empty when absent.
    pub fn days(&self) -> &[String] {
        self.days.as_deref().unwrap_or_default()
    }

    /// Returns the series end date if present and non-empty.
    pub fn end_date(&self) -> Option<&str> {
        self.end_date.as_deref().filter(|s| !s.is_empty())
    }

    /// Returns the excluded dates, empty when absent.
    pub fn exceptions(&self) -> &[String] {
        self.exceptions.as_deref().unwrap_or_default()
    }
}

/// A complete calendar file produced by the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IcalFile {
    /// Full iCalendar contents.
    pub ical: String,
    /// Suggested file name.
    pub filename: String,
}

impl IcalFile {
    /// Creates a new calendar file payload.
    pub fn new(ical: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            ical: ical.into(),
            filename: filename.into(),
        }
    }
}

/// The vendor-agnostic result of one model call.
///
/// Exactly one variant is active per response. Building one from a function
/// name rejects anything other than the two known functions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizedResponse {
    /// Result of `get_event_information`.
    EventInformation(EventData),
    /// Result of `generate_ical_file`.
    IcalFile(IcalFile),
}

impl NormalizedResponse {
    /// Builds a response from a function name and already-decoded arguments.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::UnknownFunction`] for any name other than the two
    /// known functions, and [`EventError::MalformedArguments`] when the
    /// arguments do not match the function's payload.
    pub fn from_call(name: &str, arguments: Value) -> EventResult<Self> {
        let function =
            FunctionUsed::from_name(name).ok_or_else(|| EventError::UnknownFunction(name.into()))?;
        match function {
            FunctionUsed::GetEventInformation => serde_json::from_value(arguments)
                .map(Self::EventInformation)
                .map_err(|e| EventError::malformed(GET_EVENT_INFORMATION, e)),
            FunctionUsed::GenerateIcalFile => serde_json::from_value(arguments)
                .map(Self::IcalFile)
                .map_err(|e| EventError::malformed(GENERATE_ICAL_FILE, e)),
        }
    }

    /// Builds a response from a function name and JSON-encoded arguments.
    ///
    /// Some vendors return arguments as a string containing JSON.
    pub fn from_call_json(name: &str, arguments: &str) -> EventResult<Self> {
        let function =
            FunctionUsed::from_name(name).ok_or_else(|| EventError::UnknownFunction(name.into()))?;
        let value: Value = serde_json::from_str(arguments)
            .map_err(|e| EventError::malformed(function.as_str(), e))?;
        Self::from_call(name, value)
    }

    /// Returns which function produced this response.
    pub fn function_used(&self) -> FunctionUsed {
        match self {
            Self::EventInformation(_) => FunctionUsed::GetEventInformation,
            Self::IcalFile(_) => FunctionUsed::GenerateIcalFile,
        }
    }
}

/// Deserializes `null` as an empty string.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accepts an interval given either as a number or a numeric string.
fn lenient_interval<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Interval {
        Number(u32),
        Text(String),
    }

    match Option::<Interval>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Interval::Number(n)) => Ok(Some(n)),
        Some(Interval::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(Interval::Text(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("invalid interval `{}`", s))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    mod function_used {
        use super::*;

        #[test]
        fn names_round_trip() {
            for f in FunctionUsed::ALL {
                assert_eq!(FunctionUsed::from_name(f.as_str()), Some(f));
            }
        }

        #[test]
        fn lookup_is_case_sensitive() {
            assert_eq!(FunctionUsed::from_name("GET_EVENT_INFORMATION"), None);
            assert_eq!(FunctionUsed::from_name(""), None);
        }
    }

    mod normalized_response {
        use super::*;

        #[test]
        fn decodes_event_information() {
            let args = json!({
                "title": "Team Sync",
                "location": "Room 4",
                "description": "Weekly",
                "start_date": "20240610T090000",
                "end_date": "20240610T100000",
                "recurrence": {"frequency": "weekly", "days": ["MO"]}
            });
            let resp = NormalizedResponse::from_call(GET_EVENT_INFORMATION, args).unwrap();
            assert_eq!(resp.function_used(), FunctionUsed::GetEventInformation);
            let NormalizedResponse::EventInformation(event) = resp else {
                panic!("expected event information");
            };
            assert_eq!(event.title, "Team Sync");
            assert_eq!(event.end_date(), Some("20240610T100000"));
            assert_eq!(event.recurrence.unwrap().days(), ["MO".to_string()]);
        }

        #[test]
        fn decodes_ical_file() {
            let args = r#"{"ical":"BEGIN:VCALENDAR\nEND:VCALENDAR","filename":"events.ics"}"#;
            let resp = NormalizedResponse::from_call_json(GENERATE_ICAL_FILE, args).unwrap();
            assert_eq!(resp.function_used(), FunctionUsed::GenerateIcalFile);
            assert_eq!(
                resp,
                NormalizedResponse::IcalFile(IcalFile::new(
                    "BEGIN:VCALENDAR\nEND:VCALENDAR",
                    "events.ics"
                ))
            );
        }

        #[test]
        fn rejects_unknown_function() {
            let err = NormalizedResponse::from_call("delete_calendar", json!({})).unwrap_err();
            assert!(matches!(err, EventError::UnknownFunction(ref n) if n == "delete_calendar"));
        }

        #[test]
        fn rejects_missing_start_date() {
            let err =
                NormalizedResponse::from_call(GET_EVENT_INFORMATION, json!({"title": "x"}))
                    .unwrap_err();
            assert!(matches!(
                err,
                EventError::MalformedArguments {
                    function: GET_EVENT_INFORMATION,
                    ..
                }
            ));
        }

        #[test]
        fn rejects_invalid_json_arguments() {
            let err = NormalizedResponse::from_call_json(GENERATE_ICAL_FILE, "{not json")
                .unwrap_err();
            assert!(matches!(err, EventError::MalformedArguments { .. }));
        }

        #[test]
        fn null_strings_become_empty() {
            let args = json!({"title": "x", "location": null, "start_date": "20240101"});
            let NormalizedResponse::EventInformation(event) =
                NormalizedResponse::from_call(GET_EVENT_INFORMATION, args).unwrap()
            else {
                panic!("expected event information");
            };
            assert_eq!(event.location, "");
            assert_eq!(event.description, "");
            assert_eq!(event.end_date(), None);
        }
    }

    mod recurrence {
        use super::*;

        #[test]
        fn interval_accepts_numeric_string() {
            let r: Recurrence = serde_json::from_value(json!({"interval": "3"})).unwrap();
            assert_eq!(r.interval(), Some(3));
        }

        #[test]
        fn interval_rejects_garbage() {
            let r = serde_json::from_value::<Recurrence>(json!({"interval": "often"}));
            assert!(r.is_err());
        }

        #[test]
        fn empty_fields_count_as_absent() {
            let r = Recurrence::new()
                .with_frequency("")
                .with_interval(0)
                .with_end_date("");
            assert_eq!(r.frequency(), None);
            assert_eq!(r.interval(), None);
            assert_eq!(r.end_date(), None);
            assert!(r.days().is_empty());
            assert!(r.exceptions().is_empty());
        }
    }
}
