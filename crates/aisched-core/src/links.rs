//! Calendar deep link construction.
//!
//! This module turns an [`EventData`] into a Google Calendar
//! `render?action=TEMPLATE` link:
//! - all-day end dates are made exclusive (moved forward one day)
//! - title, location and description are percent-encoded individually
//! - recurrence is emitted as a `recur=RRULE:...` parameter, with excluded
//!   dates in a separate `recurrence=EXDATE:...` parameter
//!
//! # Example
//!
//! ```
//! use aisched_core::event::{EventData, Recurrence};
//! use aisched_core::links::calendar_link;
//!
//! let event = EventData::new("Standup", "20240610T090000")
//!     .with_end_date("20240610T091500")
//!     .with_recurrence(Recurrence::new().with_frequency("daily"));
//! let link = calendar_link(&event, "https://example.com").unwrap();
//! assert!(link.contains("dates=20240610T090000/20240610T091500"));
//! assert!(link.contains("&recur=RRULE%3AFREQ%3DDAILY"));
//! ```

use tracing::debug;

use crate::error::EventResult;
use crate::event::{EventData, Recurrence};
use crate::time::{EventDate, strip_dashes};

/// Base URL of the calendar event template page.
pub const CALENDAR_RENDER_URL: &str = "https://www.google.com/calendar/render";

/// Builds the fixed description trailer linking back to the origin page.
pub fn description_trailer(origin_page_url: &str) -> String {
    format!(
        "<br/><br/><br/><a href=\"{}\">Created from this web page</a>",
        origin_page_url
    )
}

/// Computes the `start/end` pair for the `dates` parameter.
///
/// When the end date is missing it falls back to the start date as-is. When
/// it has the all-day shape it is moved forward one day, since the calendar
/// treats the end of an all-day range as exclusive.
pub fn date_range(event: &EventData) -> EventResult<(String, String)> {
    let start = event.start_date.clone();
    let end = match event.end_date() {
        None => start.clone(),
        Some(end) => {
            let end = EventDate::parse(end)?;
            if end.is_all_day() {
                let adjusted = end.exclusive_end()?;
                debug!(
                    from = %end.to_compact(),
                    to = %adjusted.to_compact(),
                    "adjusted all-day end date"
                );
                adjusted.to_compact()
            } else {
                end.to_compact()
            }
        }
    };
    Ok((start, end))
}

/// Returns the recurrence rule body, e.g. `FREQ=WEEKLY;INTERVAL=2;BYDAY=MO,WE`.
///
/// Only components whose source field is present are emitted. Returns `None`
/// when no component is present.
pub fn rrule_value(recurrence: &Recurrence) -> Option<String> {
    let mut parts = Vec::new();

    if let Some(frequency) = recurrence.frequency() {
        parts.push(format!("FREQ={}", frequency.to_uppercase()));
    }
    if let Some(interval) = recurrence.interval() {
        parts.push(format!("INTERVAL={}", interval));
    }
    if !recurrence.days().is_empty() {
        parts.push(format!("BYDAY={}", recurrence.days().join(",")));
    }
    if let Some(until) = recurrence.end_date() {
        parts.push(format!("UNTIL={}", strip_dashes(until)));
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(";"))
    }
}

/// Returns the excluded-dates value, e.g. `EXDATE:20240320,20240321`.
pub fn exdate_value(recurrence: &Recurrence) -> Option<String> {
    let exceptions = recurrence.exceptions();
    if exceptions.is_empty() {
        return None;
    }
    let dates: Vec<String> = exceptions.iter().map(|d| strip_dashes(d)).collect();
    Some(format!("EXDATE:{}", dates.join(",")))
}

/// Compiles an event into a calendar deep link.
///
/// # Errors
///
/// Returns [`crate::EventError::InvalidDate`] when the end date has the
/// all-day shape but is not a real date.
pub fn calendar_link(event: &EventData, origin_page_url: &str) -> EventResult<String> {
    let (start, end) = date_range(event)?;

    let title = urlencoding::encode(&event.title);
    let location = urlencoding::encode(&event.location);
    let details = format!(
        "{}{}",
        urlencoding::encode(&event.description),
        urlencoding::encode(&description_trailer(origin_page_url))
    );

    let mut link = format!(
        "{}?action=TEMPLATE&text={}&dates={}/{}&details={}&location={}",
        CALENDAR_RENDER_URL, title, start, end, details, location
    );

    if let Some(ref recurrence) = event.recurrence {
        if let Some(rule) = rrule_value(recurrence) {
            link.push_str("&recur=");
            link.push_str(&urlencoding::encode(&format!("RRULE:{}", rule)));
        }
        // Kept as its own unencoded parameter, not merged into the rule.
        if let Some(exdate) = exdate_value(recurrence) {
            link.push_str("&recurrence=");
            link.push_str(&exdate);
        }
    }

    Ok(link)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EventError;
    use url::Url;

    const PAGE: &str = "https://example.com/post";

    fn query_param(link: &str, key: &str) -> Option<String> {
        Url::parse(link)
            .unwrap()
            .query_pairs()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }

    mod dates {
        use super::*;

        #[test]
        fn all_day_end_is_exclusive() {
            let event = EventData::new("Conf", "20240313").with_end_date("20240315");
            let link = calendar_link(&event, PAGE).unwrap();
            assert!(link.contains("&dates=20240313/20240316&"));
        }

        #[test]
        fn all_day_end_rolls_over_month_and_year() {
            let event = EventData::new("x", "20240130").with_end_date("20240131");
            assert_eq!(date_range(&event).unwrap().1, "20240201");

            let event = EventData::new("x", "20241230").with_end_date("20241231");
            assert_eq!(date_range(&event).unwrap().1, "20250101");
        }

        #[test]
        fn missing_end_defaults_to_start_without_increment() {
            let event = EventData::new("x", "20240315");
            let (start, end) = date_range(&event).unwrap();
            assert_eq!(start, "20240315");
            assert_eq!(end, "20240315");
        }

        #[test]
        fn empty_end_counts_as_missing() {
            let event = EventData::new("x", "20240315T100000").with_end_date("");
            assert_eq!(date_range(&event).unwrap().1, "20240315T100000");
        }

        #[test]
        fn timed_end_is_unchanged() {
            let event =
                EventData::new("Team Sync", "20240610T090000").with_end_date("20240610T100000");
            let link = calendar_link(&event, PAGE).unwrap();
            assert!(link.contains("dates=20240610T090000/20240610T100000"));
        }

        #[test]
        fn invalid_all_day_end_errors() {
            let event = EventData::new("x", "20240101").with_end_date("20240230");
            let err = calendar_link(&event, PAGE).unwrap_err();
            assert!(matches!(err, EventError::InvalidDate(_)));
        }
    }

    mod recurrence {
        use super::*;

        #[test]
        fn rrule_contains_present_components_in_order() {
            let r = Recurrence::new()
                .with_frequency("weekly")
                .with_interval(2)
                .with_days(["MO", "WE"]);
            assert_eq!(
                rrule_value(&r).as_deref(),
                Some("FREQ=WEEKLY;INTERVAL=2;BYDAY=MO,WE")
            );
        }

        #[test]
        fn until_has_dashes_stripped() {
            let r = Recurrence::new()
                .with_frequency("monthly")
                .with_end_date("2024-12-31");
            assert_eq!(
                rrule_value(&r).as_deref(),
                Some("FREQ=MONTHLY;UNTIL=20241231")
            );
        }

        #[test]
        fn empty_recurrence_adds_no_recur_parameter() {
            let event = EventData::new("x", "20240315").with_recurrence(Recurrence::new());
            let link = calendar_link(&event, PAGE).unwrap();
            assert!(!link.contains("recur="));
            assert!(!link.contains("recurrence="));
        }

        #[test]
        fn recur_parameter_is_encoded() {
            let event = EventData::new("x", "20240315").with_recurrence(
                Recurrence::new()
                    .with_frequency("weekly")
                    .with_interval(2)
                    .with_days(["MO", "WE"]),
            );
            let link = calendar_link(&event, PAGE).unwrap();
            assert!(link.ends_with("&recur=RRULE%3AFREQ%3DWEEKLY%3BINTERVAL%3D2%3BBYDAY%3DMO%2CWE"));
            assert_eq!(
                query_param(&link, "recur").as_deref(),
                Some("RRULE:FREQ=WEEKLY;INTERVAL=2;BYDAY=MO,WE")
            );
        }

        #[test]
        fn exceptions_become_separate_unencoded_parameter() {
            let event = EventData::new("x", "20240315").with_recurrence(
                Recurrence::new()
                    .with_frequency("daily")
                    .with_exceptions(["2024-03-20", "2024-03-21"]),
            );
            let link = calendar_link(&event, PAGE).unwrap();
            assert!(link.ends_with("&recurrence=EXDATE:20240320,20240321"));
            assert!(link.contains("&recur=RRULE%3AFREQ%3DDAILY&"));
        }

        #[test]
        fn exceptions_without_rule_are_still_emitted() {
            let event = EventData::new("x", "20240315")
                .with_recurrence(Recurrence::new().with_exceptions(["2024-03-20"]));
            let link = calendar_link(&event, PAGE).unwrap();
            assert!(!link.contains("recur="));
            assert!(link.ends_with("&recurrence=EXDATE:20240320"));
        }

        #[test]
        fn empty_exceptions_are_ignored() {
            let r = Recurrence::new().with_exceptions(Vec::<String>::new());
            assert_eq!(exdate_value(&r), None);
        }
    }

    mod encoding {
        use super::*;

        #[test]
        fn reserved_characters_round_trip() {
            let title = "Lunch & Learn = fun?";
            let location = "Café Zürich, 2nd floor #3";
            let description = "Bring snacks & drinks; ask for 50% off";
            let event = EventData::new(title, "20240610T120000")
                .with_end_date("20240610T130000")
                .with_location(location)
                .with_description(description);
            let link = calendar_link(&event, PAGE).unwrap();

            assert_eq!(query_param(&link, "text").as_deref(), Some(title));
            assert_eq!(query_param(&link, "location").as_deref(), Some(location));
            assert_eq!(
                query_param(&link, "details").unwrap(),
                format!("{}{}", description, description_trailer(PAGE))
            );
        }

        #[test]
        fn page_url_is_percent_encoded_in_trailer() {
            let event = EventData::new("x", "20240315");
            let link = calendar_link(&event, "https://example.com/a?b=c&d=e").unwrap();
            assert!(link.contains("https%3A%2F%2Fexample.com%2Fa%3Fb%3Dc%26d%3De"));
        }

        #[test]
        fn full_link_snapshot() {
            let event =
                EventData::new("Team Sync", "20240610T090000").with_end_date("20240610T100000");
            let link = calendar_link(&event, PAGE).unwrap();
            insta::assert_snapshot!(link, @"https://www.google.com/calendar/render?action=TEMPLATE&text=Team%20Sync&dates=20240610T090000/20240610T100000&details=%3Cbr%2F%3E%3Cbr%2F%3E%3Cbr%2F%3E%3Ca%20href%3D%22https%3A%2F%2Fexample.com%2Fpost%22%3ECreated%20from%20this%20web%20page%3C%2Fa%3E&location=");
        }
    }
}
