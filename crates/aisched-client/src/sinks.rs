//! Where artifacts and notifications end up.
//!
//! [`ArtifactSink`] receives the compiled link or calendar file;
//! [`Notifier`] shows user-facing failure messages. The desktop
//! implementations use the default browser, the clipboard, the download
//! directory and `notify-rust`.

use std::path::{Path, PathBuf};

use notify_rust::Notification;
use tracing::{debug, info, warn};

use aisched_core::IcalFile;

use crate::error::{ClientError, ClientResult};

/// Application name shown on notifications.
pub const APP_NAME: &str = "aisched";

/// Receives compiled artifacts.
pub trait ArtifactSink: Send + Sync {
    /// Opens (or otherwise hands over) a calendar link.
    fn open_link(&self, url: &str) -> ClientResult<()>;

    /// Offers a calendar file to the user. Returns where it was written.
    fn offer_download(&self, file: &IcalFile) -> ClientResult<PathBuf>;
}

/// Shows user-facing messages.
pub trait Notifier: Send + Sync {
    /// Shows `message` under `title`. Never fails.
    fn notify(&self, title: &str, message: &str);
}

/// What the desktop sink does with a link.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LinkHandling {
    /// Open in the default browser.
    #[default]
    Open,
    /// Copy to the clipboard.
    Copy,
    /// Only print to stdout.
    Print,
}

/// Desktop sink: browser, clipboard, download directory.
#[derive(Debug, Clone)]
pub struct DesktopSink {
    download_dir: PathBuf,
    links: LinkHandling,
}

impl DesktopSink {
    /// Creates a sink writing files to `download_dir`.
    pub fn new(download_dir: impl Into<PathBuf>) -> Self {
        Self {
            download_dir: download_dir.into(),
            links: LinkHandling::default(),
        }
    }

    /// Builder method to set link handling.
    pub fn with_links(mut self, links: LinkHandling) -> Self {
        self.links = links;
        self
    }
}

impl ArtifactSink for DesktopSink {
    fn open_link(&self, url: &str) -> ClientResult<()> {
        println!("{}", url);
        match self.links {
            LinkHandling::Open => {
                info!("opening calendar link");
                open::that(url)
                    .map_err(|e| ClientError::Action(format!("failed to open URL: {}", e)))?;
            }
            LinkHandling::Copy => {
                info!("copying calendar link to clipboard");
                let mut clipboard = arboard::Clipboard::new().map_err(|e| {
                    ClientError::Action(format!("failed to access clipboard: {}", e))
                })?;
                clipboard.set_text(url).map_err(|e| {
                    ClientError::Action(format!("failed to copy to clipboard: {}", e))
                })?;
            }
            LinkHandling::Print => {}
        }
        Ok(())
    }

    fn offer_download(&self, file: &IcalFile) -> ClientResult<PathBuf> {
        std::fs::create_dir_all(&self.download_dir)?;
        let path = unique_path(&self.download_dir, &file.safe_filename());
        std::fs::write(&path, &file.ical)?;
        info!(path = %path.display(), "calendar file written");
        for line in self.download_output(file, &path) {
            println!("{}", line);
        }

        if self.links == LinkHandling::Open {
            open::that(&path)
                .map_err(|e| ClientError::Action(format!("failed to open file: {}", e)))?;
        }
        Ok(path)
    }
}

impl DesktopSink {
    /// Lines printed after a file is written. Print-only mode adds the
    /// content as a `data:` URL.
    fn download_output(&self, file: &IcalFile, path: &Path) -> Vec<String> {
        let mut lines = vec![path.display().to_string()];
        if self.links == LinkHandling::Print {
            lines.push(file.data_url());
        }
        lines
    }
}

/// Returns `dir/name`, or `dir/stem-N.ext` if that already exists.
fn unique_path(dir: &Path, name: &str) -> PathBuf {
    let candidate = dir.join(name);
    if !candidate.exists() {
        return candidate;
    }
    let (stem, ext) = name.rsplit_once('.').unwrap_or((name, "ics"));
    (1..)
        .map(|n| dir.join(format!("{}-{}.{}", stem, n, ext)))
        .find(|p| !p.exists())
        .unwrap_or(candidate)
}

/// Desktop notifications, echoed on stderr.
#[derive(Debug, Clone)]
pub struct DesktopNotifier {
    enabled: bool,
}

impl DesktopNotifier {
    /// Creates a notifier. When disabled, messages only go to stderr.
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

impl Notifier for DesktopNotifier {
    fn notify(&self, title: &str, message: &str) {
        eprintln!("{}: {}", title, message);
        if !self.enabled {
            return;
        }

        let mut notification = Notification::new();
        notification.appname(APP_NAME).summary(title).body(message);

        match notification.show() {
            Ok(_) => debug!(title, "notification sent"),
            Err(e) => warn!(error = %e, title, "failed to send notification"),
        }
    }
}
