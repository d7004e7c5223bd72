//! Core types: extracted events, dates, calendar link compiler, tracing

pub mod compile;
pub mod error;
pub mod event;
pub mod ical;
pub mod links;
pub mod time;
pub mod tracing;

pub use compile::{Artifact, compile};
pub use error::{EventError, EventResult};
pub use event::{
    EventData, FunctionUsed, GENERATE_ICAL_FILE, GET_EVENT_INFORMATION, IcalFile,
    NormalizedResponse, Recurrence,
};
pub use ical::IcalSummary;
pub use links::{calendar_link, exdate_value, rrule_value};
pub use time::{EventDate, is_all_day};
pub use crate::tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
