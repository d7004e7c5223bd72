//! NormalizedResponse to Artifact compilation.
//!
//! Branches on the function the model used: single events become calendar
//! links, generated calendar files pass through for download.

use tracing::info;

use crate::error::EventResult;
use crate::event::{IcalFile, NormalizedResponse};
use crate::links::calendar_link;

/// What the user ends up with after one action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Artifact {
    /// A calendar deep link to open.
    CalendarLink(String),
    /// A calendar file to offer for download, unchanged from the model.
    IcalDownload(IcalFile),
}

impl Artifact {
    /// Returns a short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::CalendarLink(_) => "calendar_link",
            Self::IcalDownload(_) => "ical_download",
        }
    }
}

/// Compiles a normalized response into an artifact.
///
/// `origin_page_url` is linked from the event description.
pub fn compile(response: NormalizedResponse, origin_page_url: &str) -> EventResult<Artifact> {
    let artifact = match response {
        NormalizedResponse::EventInformation(event) => {
            Artifact::CalendarLink(calendar_link(&event, origin_page_url)?)
        }
        NormalizedResponse::IcalFile(file) => {
            let summary = file.inspect();
            info!(
                filename = %file.filename,
                parsed = summary.parsed,
                events = summary.events,
                "calendar file passed through"
            );
            Artifact::IcalDownload(file)
        }
    };
    info!(kind = artifact.kind(), "compiled artifact");
    Ok(artifact)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventData;

    #[test]
    fn event_becomes_link() {
        let response = NormalizedResponse::EventInformation(
            EventData::new("Team Sync", "20240610T090000").with_end_date("20240610T100000"),
        );
        let artifact = compile(response, "https://example.com").unwrap();
        let Artifact::CalendarLink(link) = artifact else {
            panic!("expected a calendar link");
        };
        assert!(link.starts_with("https://www.google.com/calendar/render?action=TEMPLATE"));
        assert!(link.contains("text=Team%20Sync"));
    }

    #[test]
    fn file_passes_through_unchanged() {
        let file = IcalFile::new("not really ical", "x.ics");
        let artifact = compile(NormalizedResponse::IcalFile(file.clone()), "https://e.com").unwrap();
        assert_eq!(artifact, Artifact::IcalDownload(file));
        assert_eq!(artifact.kind(), "ical_download");
    }
}
