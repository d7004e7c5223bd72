//! Mode selection: what the model is steered to produce.
//!
//! - [`Mode::NewTab`] asks for one event, opened as a calendar link
//! - [`Mode::Ical`] asks for a complete calendar file
//! - [`Mode::Auto`] lets the model choose, typically a file when the text
//!   describes several events or a recurrence the link cannot express

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use aisched_core::FunctionUsed;

use crate::request::{FunctionChoice, FunctionDeclaration, RequestParams};

/// How the selected text should be turned into a calendar artifact.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    /// Extract one event and open it as a calendar link.
    #[default]
    #[serde(rename = "newTab")]
    NewTab,
    /// Generate a calendar file for download.
    #[serde(rename = "ical")]
    Ical,
    /// Let the model pick between the two.
    #[serde(rename = "auto")]
    Auto,
}

impl Mode {
    /// Every mode, in display order.
    pub const ALL: [Mode; 3] = [Self::NewTab, Self::Ical, Self::Auto];

    /// Returns the configuration name of this mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NewTab => "newTab",
            Self::Ical => "ical",
            Self::Auto => "auto",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown mode name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown mode `{0}` (expected one of: newTab, ical, auto)")]
pub struct UnknownMode(pub String);

impl FromStr for Mode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| UnknownMode(s.to_string()))
    }
}

/// Builds the request parameters for the given text and mode.
///
/// `today` anchors relative dates such as "next Tuesday".
pub fn select(text: &str, mode: Mode, today: NaiveDate) -> RequestParams {
    let (functions, choice) = match mode {
        Mode::NewTab => (
            vec![event_information_declaration()],
            FunctionChoice::Required(FunctionUsed::GetEventInformation),
        ),
        Mode::Ical => (
            vec![ical_file_declaration()],
            FunctionChoice::Required(FunctionUsed::GenerateIcalFile),
        ),
        Mode::Auto => (
            vec![event_information_declaration(), ical_file_declaration()],
            FunctionChoice::Auto,
        ),
    };

    RequestParams {
        system_prompt: system_prompt(mode, today),
        user_text: text.to_string(),
        functions,
        choice,
    }
}

fn system_prompt(mode: Mode, today: NaiveDate) -> String {
    let task = match mode {
        Mode::NewTab => "Extract the single event described in the user's text.",
        Mode::Ical => "Convert every event described in the user's text into one iCalendar file.",
        Mode::Auto => {
            "Extract the event described in the user's text. Use generate_ical_file when the \
             text describes several events or a schedule a single recurrence rule cannot \
             express; otherwise use get_event_information."
        }
    };
    format!(
        "{} Today is {}. Answer only by calling a function.",
        task,
        today.format("%A %Y-%m-%d")
    )
}

/// Declaration of `get_event_information`.
pub fn event_information_declaration() -> FunctionDeclaration {
    FunctionDeclaration {
        function: FunctionUsed::GetEventInformation,
        description: "Return the details of one calendar event.".to_string(),
        parameters: json!({
            "type": "object",
            "properties": {
                "title": { "type": "string", "description": "Short event title." },
                "location": { "type": "string", "description": "Event location, empty if unknown." },
                "description": { "type": "string", "description": "Relevant details from the text." },
                "start_date": {
                    "type": "string",
                    "description": "YYYYMMDD for all-day events, otherwise YYYYMMDDTHHMMSS."
                },
                "end_date": {
                    "type": "string",
                    "description": "Same format as start_date. For all-day events, the last day (inclusive)."
                },
                "recurrence": recurrence_schema()
            },
            "required": ["title", "start_date"]
        }),
    }
}

/// Declaration of `generate_ical_file`.
pub fn ical_file_declaration() -> FunctionDeclaration {
    FunctionDeclaration {
        function: FunctionUsed::GenerateIcalFile,
        description: "Return a complete iCalendar (RFC 5545) file.".to_string(),
        parameters: json!({
            "type": "object",
            "properties": {
                "ical": { "type": "string", "description": "Full VCALENDAR contents." },
                "filename": { "type": "string", "description": "File name ending in .ics." }
            },
            "required": ["ical", "filename"]
        }),
    }
}

fn recurrence_schema() -> Value {
    json!({
        "type": "object",
        "description": "Only for repeating events.",
        "properties": {
            "frequency": {
                "type": "string",
                "enum": ["daily", "weekly", "monthly", "yearly"]
            },
            "interval": { "type": "integer", "description": "Repeat every N periods." },
            "days": {
                "type": "array",
                "items": { "type": "string", "enum": ["MO", "TU", "WE", "TH", "FR", "SA", "SU"] }
            },
            "end_date": { "type": "string", "description": "Last occurrence, YYYY-MM-DD." },
            "exceptions": {
                "type": "array",
                "items": { "type": "string" },
                "description": "Skipped dates, YYYY-MM-DD."
            }
        }
    })
}
