//! One user action, from selected text to a delivered artifact.

use chrono::NaiveDate;
use tracing::{Instrument, error, info, info_span};
use uuid::Uuid;

use aisched_core::{Artifact, compile};
use aisched_providers::{Mode, Transport, execute, select};

use crate::busy::{BusyGuard, BusyIndicator};
use crate::error::{ClientError, ClientResult};
use crate::sinks::{ArtifactSink, Notifier};

/// Title of every failure notification.
pub const NOTIFICATION_TITLE: &str = "aisched";

/// Shown when the API key is missing or rejected.
pub const CREDENTIAL_MESSAGE: &str =
    "Please set a valid API key. Run `aisched config set-key` to store one.";

/// Shown for every other failure.
pub const GENERIC_MESSAGE: &str = "Something went wrong while creating the event. Please try again later.";

/// The text the user selected and the page it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trigger {
    /// Selected text.
    pub selected_text: String,
    /// Page the text was selected on; linked from the event description.
    pub origin_page_url: String,
}

impl Trigger {
    /// Creates a trigger.
    pub fn new(selected_text: impl Into<String>, origin_page_url: impl Into<String>) -> Self {
        Self {
            selected_text: selected_text.into(),
            origin_page_url: origin_page_url.into(),
        }
    }
}

/// Settings for one action, resolved from config and flags.
#[derive(Debug, Clone)]
pub struct ActionSettings {
    /// Resolved API key, if any.
    pub api_key: Option<String>,
    /// Model identifier.
    pub model: String,
    /// Requested mode.
    pub mode: Mode,
    /// Anchor for relative dates.
    pub today: NaiveDate,
}

/// Collaborators of an action.
pub struct Pipeline<'a> {
    transport: &'a dyn Transport,
    sink: &'a dyn ArtifactSink,
    notifier: &'a dyn Notifier,
    busy: &'a dyn BusyIndicator,
}

impl<'a> Pipeline<'a> {
    /// Creates a pipeline.
    pub fn new(
        transport: &'a dyn Transport,
        sink: &'a dyn ArtifactSink,
        notifier: &'a dyn Notifier,
        busy: &'a dyn BusyIndicator,
    ) -> Self {
        Self {
            transport,
            sink,
            notifier,
            busy,
        }
    }

    /// Runs one action. Failures are reported through the notifier before
    /// being returned.
    pub async fn run_action(
        &self,
        settings: &ActionSettings,
        trigger: &Trigger,
    ) -> ClientResult<Artifact> {
        let span = info_span!(
            "action",
            id = %Uuid::new_v4(),
            model = %settings.model,
            mode = %settings.mode,
        );

        async {
            let _busy = BusyGuard::new(self.busy);
            let result = self.perform(settings, trigger).await;
            if let Err(ref e) = result {
                self.report(e);
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn perform(&self, settings: &ActionSettings, trigger: &Trigger) -> ClientResult<Artifact> {
        let text = trigger.selected_text.trim();
        if text.is_empty() {
            return Err(ClientError::Input("no text selected".into()));
        }

        let api_key = settings.api_key.as_deref().ok_or_else(|| {
            aisched_providers::ProviderError::missing_credential("no API key configured")
        })?;

        let params = select(text, settings.mode, settings.today);
        let response = execute(self.transport, &params, api_key, &settings.model).await?;
        let artifact = compile(response, &trigger.origin_page_url)?;

        match &artifact {
            Artifact::CalendarLink(url) => self.sink.open_link(url)?,
            Artifact::IcalDownload(file) => {
                self.sink.offer_download(file)?;
            }
        }
        info!(kind = artifact.kind(), "action complete");
        Ok(artifact)
    }

    fn report(&self, err: &ClientError) {
        error!(error = %err, "action failed");
        let message = if err.is_credential_problem() {
            CREDENTIAL_MESSAGE
        } else {
            GENERIC_MESSAGE
        };
        self.notifier.notify(NOTIFICATION_TITLE, message);
    }
}
