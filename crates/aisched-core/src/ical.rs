//! Calendar file payloads.
//!
//! Files generated by the model are handed to the download sink unchanged.
//! The helpers here only render the payload for transport and inspect it for
//! logging.

use std::path::Path;

use icalendar::{Calendar, CalendarComponent};
use tracing::{debug, warn};

use crate::event::IcalFile;

/// File name used when the model supplies none we can use.
pub const DEFAULT_ICAL_FILENAME: &str = "event.ics";

/// What a quick parse of a calendar file found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IcalSummary {
    /// Whether the content parsed as iCalendar.
    pub parsed: bool,
    /// Number of `VEVENT` components.
    pub events: usize,
}

impl IcalFile {
    /// Renders the file as a `data:` URL.
    pub fn data_url(&self) -> String {
        format!("data:text/calendar,{}", urlencoding::encode(&self.ical))
    }

    /// Returns a file name that is safe to join onto a download directory.
    ///
    /// Directory components are dropped and an `.ics` extension is added
    /// when missing. The file contents are never touched.
    pub fn safe_filename(&self) -> String {
        let name = Path::new(self.filename.trim())
            .file_name()
            .and_then(|n| n.to_str())
            .filter(|n| !n.is_empty() && *n != "." && *n != "..")
            .unwrap_or(DEFAULT_ICAL_FILENAME);

        if name.to_ascii_lowercase().ends_with(".ics") {
            name.to_string()
        } else {
            format!("{}.ics", name)
        }
    }

    /// Parses the content to count its events.
    ///
    /// Unparsable content is logged and reported, not rejected.
    pub fn inspect(&self) -> IcalSummary {
        match self.ical.parse::<Calendar>() {
            Ok(calendar) => {
                let events = calendar
                    .iter()
                    .filter(|c| matches!(c, CalendarComponent::Event(_)))
                    .count();
                debug!(filename = %self.filename, events, "inspected calendar file");
                IcalSummary {
                    parsed: true,
                    events,
                }
            }
            Err(e) => {
                warn!(filename = %self.filename, error = %e, "calendar file does not parse");
                IcalSummary {
                    parsed: false,
                    events: 0,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
PRODID:-//test//EN\r\n\
BEGIN:VEVENT\r\n\
UID:1@test\r\n\
DTSTAMP:20240101T000000Z\r\n\
DTSTART:20240610T090000Z\r\n\
SUMMARY:One\r\n\
END:VEVENT\r\n\
BEGIN:VEVENT\r\n\
UID:2@test\r\n\
DTSTAMP:20240101T000000Z\r\n\
DTSTART:20240611T090000Z\r\n\
SUMMARY:Two\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";

    #[test]
    fn data_url_encodes_content() {
        let file = IcalFile::new("BEGIN:VCALENDAR\nEND:VCALENDAR", "x.ics");
        assert_eq!(
            file.data_url(),
            "data:text/calendar,BEGIN%3AVCALENDAR%0AEND%3AVCALENDAR"
        );
    }

    #[test]
    fn inspect_counts_events() {
        let summary = IcalFile::new(SAMPLE, "two.ics").inspect();
        assert!(summary.parsed);
        assert_eq!(summary.events, 2);
    }

    #[test]
    fn inspect_reports_unparsable_content() {
        let summary = IcalFile::new("not really ical", "x.ics").inspect();
        assert_eq!(
            summary,
            IcalSummary {
                parsed: false,
                events: 0
            }
        );
    }

    mod safe_filename {
        use super::*;

        #[test]
        fn keeps_plain_name() {
            assert_eq!(IcalFile::new("", "meetup.ics").safe_filename(), "meetup.ics");
        }

        #[test]
        fn strips_directories() {
            assert_eq!(
                IcalFile::new("", "../../etc/passwd").safe_filename(),
                "passwd.ics"
            );
        }

        #[test]
        fn adds_extension() {
            assert_eq!(IcalFile::new("", "schedule").safe_filename(), "schedule.ics");
        }

        #[test]
        fn falls_back_when_empty() {
            assert_eq!(IcalFile::new("", "  ").safe_filename(), DEFAULT_ICAL_FILENAME);
            assert_eq!(IcalFile::new("", "..").safe_filename(), DEFAULT_ICAL_FILENAME);
        }
    }
}
