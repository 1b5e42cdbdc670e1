//! Capability-ranked distribution of raster artifacts.
//!
//! One [`Dispatcher::dispatch`] call is one user action. It walks a fixed
//! channel plan for the intent, checking each channel right before trying it,
//! and stops at the first success. Single channel failures (including a user
//! dismissing a share sheet) only advance the plan; exhaustion is reported as
//! [`DispatchState::AllFailed`].

mod host;
mod lease;

pub use host::{Capability, ChannelError, HostPlatform, ShareFile, SharePayload};
pub use lease::ObjectUrlLease;

use crate::artifact::RasterArtifact;
use crate::destination::CanonicalDestination;
use crate::error::QrFlashError;
use std::fmt;
use std::time::Duration;

/// One concrete distribution mechanism.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    NativeShareFile,
    NativeShareLink,
    ClipboardImage,
    ClipboardText,
    FileDownload,
    NewTabFallback,
}

impl Channel {
    pub fn as_str(self) -> &'static str {
        match self {
            Channel::NativeShareFile => "native-share-file",
            Channel::NativeShareLink => "native-share-link",
            Channel::ClipboardImage => "clipboard-image",
            Channel::ClipboardText => "clipboard-text",
            Channel::FileDownload => "file-download",
            Channel::NewTabFallback => "new-tab-fallback",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelStatus {
    Succeeded,
    Failed,
    Unsupported,
}

/// Result of one channel in one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DistributionOutcome {
    pub channel: Channel,
    pub status: ChannelStatus,
}

/// What the user asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Share,
    Copy,
    Download,
    /// Copy only the destination text.
    CopyLink,
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Intent::Share => "share",
            Intent::Copy => "copy",
            Intent::Download => "download",
            Intent::CopyLink => "copy-link",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchState {
    Idle,
    CheckingCapability(Channel),
    Attempting(Channel),
    Succeeded(Channel),
    AllFailed,
}

impl DispatchState {
    pub fn is_terminal(self) -> bool {
        matches!(self, DispatchState::Succeeded(_) | DispatchState::AllFailed)
    }
}

/// Ordered channels for `intent`.
///
/// Downloads use a single channel whose delivery depends on whether the
/// browser honors the anchor download attribute.
pub fn channel_plan(intent: Intent, ignores_download_attribute: bool) -> &'static [Channel] {
    match intent {
        Intent::Share => &[
            Channel::NativeShareFile,
            Channel::NativeShareLink,
            Channel::ClipboardImage,
            Channel::ClipboardText,
        ],
        Intent::Copy => &[Channel::ClipboardImage, Channel::ClipboardText],
        Intent::CopyLink => &[Channel::ClipboardText],
        Intent::Download if ignores_download_attribute => &[Channel::NewTabFallback],
        Intent::Download => &[Channel::FileDownload],
    }
}

/// Dispatcher settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchConfig {
    /// File name for downloads and shared files of the bare code.
    pub download_filename: String,
    /// File name for downloads and shared files of a card.
    pub card_filename: String,
    /// How long a download's object URL stays alive after the anchor click.
    pub revoke_delay: Duration,
    pub share_title: String,
    /// Share text; `{url}` is replaced by the destination.
    pub share_text_template: String,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            download_filename: "qr-code.png".to_string(),
            card_filename: "qr-card.png".to_string(),
            revoke_delay: Duration::from_millis(100),
            share_title: "QR Code".to_string(),
            share_text_template: "QR Code for {url}".to_string(),
        }
    }
}

impl DispatchConfig {
    pub fn share_text(&self, destination: &CanonicalDestination) -> String {
        self.share_text_template.replace("{url}", destination.as_str())
    }
}

/// An immutable snapshot of what is being distributed.
#[derive(Debug, Clone, Copy)]
pub struct Distributable<'a> {
    pub artifact: &'a RasterArtifact,
    pub destination: &'a CanonicalDestination,
    pub filename: &'a str,
}

/// Everything that happened during one dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchReport {
    pub intent: Intent,
    pub attempts: Vec<DistributionOutcome>,
    /// Every state entered, starting with `Idle` and ending in a terminal state.
    pub history: Vec<DispatchState>,
}

impl DispatchReport {
    fn new(intent: Intent) -> Self {
        Self {
            intent,
            attempts: Vec::new(),
            history: vec![DispatchState::Idle],
        }
    }

    pub fn state(&self) -> DispatchState {
        self.history.last().copied().unwrap_or(DispatchState::Idle)
    }

    pub fn succeeded_channel(&self) -> Option<Channel> {
        match self.state() {
            DispatchState::Succeeded(channel) => Some(channel),
            _ => None,
        }
    }

    /// The outcome that ended the dispatch.
    pub fn final_outcome(&self) -> Option<DistributionOutcome> {
        self.attempts.last().copied()
    }

    /// `Err(AllChannelsFailed)` unless some channel succeeded.
    pub fn into_result(self) -> Result<Self, QrFlashError> {
        if self.succeeded_channel().is_some() {
            Ok(self)
        } else {
            Err(QrFlashError::AllChannelsFailed {
                intent: self.intent,
                attempts: self.attempts,
            })
        }
    }

    fn enter(&mut self, state: DispatchState) {
        log::debug!(target: "dispatch", "{}: {:?} -> {:?}", self.intent, self.state(), state);
        self.history.push(state);
    }

    fn record(&mut self, channel: Channel, status: ChannelStatus) {
        self.attempts.push(DistributionOutcome { channel, status });
    }
}

/// Runs channel plans against a host.
pub struct Dispatcher<'a> {
    host: &'a dyn HostPlatform,
    config: &'a DispatchConfig,
}

impl<'a> Dispatcher<'a> {
    pub fn new(host: &'a dyn HostPlatform, config: &'a DispatchConfig) -> Self {
        Self { host, config }
    }

    /// Distribute `item` for `intent`. Channels are tried strictly in order.
    pub async fn dispatch(&self, intent: Intent, item: Distributable<'_>) -> DispatchReport {
        let mut report = DispatchReport::new(intent);
        // Only downloads care about the anchor quirk
        let ignores_download_attribute = intent == Intent::Download
            && self.host.is_known_download_attribute_ignoring_browser();
        let plan = channel_plan(intent, ignores_download_attribute);

        for &channel in plan {
            report.enter(DispatchState::CheckingCapability(channel));
            if !self.capability(channel, &item).is_available() {
                log::debug!(target: "dispatch", "{} unavailable", channel);
                report.record(channel, ChannelStatus::Unsupported);
                continue;
            }

            report.enter(DispatchState::Attempting(channel));
            match self.attempt(channel, &item).await {
                Ok(()) => {
                    report.record(channel, ChannelStatus::Succeeded);
                    report.enter(DispatchState::Succeeded(channel));
                    return report;
                }
                Err(err) => {
                    log::warn!(target: "dispatch", "{} failed: {}", channel, err);
                    let status = match err {
                        ChannelError::Unsupported => ChannelStatus::Unsupported,
                        ChannelError::Dismissed | ChannelError::Failed(_) => ChannelStatus::Failed,
                    };
                    report.record(channel, status);
                }
            }
        }

        report.enter(DispatchState::AllFailed);
        report
    }

    fn capability(&self, channel: Channel, item: &Distributable<'_>) -> Capability {
        match channel {
            Channel::NativeShareFile => self.host.can_share_files(&self.share_file(item)),
            Channel::NativeShareLink => self.host.can_share_basic(),
            Channel::ClipboardImage => self.host.clipboard_supports_image_write(),
            // Last resorts are always attempted so their failure is observed
            Channel::ClipboardText | Channel::FileDownload | Channel::NewTabFallback => {
                Capability::Available
            }
        }
    }

    async fn attempt(&self, channel: Channel, item: &Distributable<'_>) -> Result<(), ChannelError> {
        match channel {
            Channel::NativeShareFile => {
                let payload = SharePayload {
                    files: vec![self.share_file(item)],
                    ..self.link_payload(item)
                };
                self.host.share(&payload).await
            }
            Channel::NativeShareLink => self.host.share(&self.link_payload(item)).await,
            Channel::ClipboardImage => self.host.write_clipboard_image(item.artifact.blob()).await,
            Channel::ClipboardText => {
                self.host
                    .write_clipboard_text(item.destination.as_str())
                    .await
            }
            Channel::FileDownload => {
                let lease = ObjectUrlLease::acquire(self.host, item.artifact.blob())?;
                self.host
                    .click_download_anchor(lease.url(), item.filename)
                    .await?;
                lease.release_after(self.config.revoke_delay).await;
                Ok(())
            }
            Channel::NewTabFallback => {
                self.host
                    .open_in_new_context(item.artifact.data_url())
                    .await
            }
        }
    }

    /// A fresh file handle per use; attempts never share one.
    fn share_file(&self, item: &Distributable<'_>) -> ShareFile {
        ShareFile::from_blob(item.artifact.blob(), item.filename)
    }

    fn link_payload(&self, item: &Distributable<'_>) -> SharePayload {
        SharePayload {
            title: self.config.share_title.clone(),
            text: self.config.share_text(item.destination),
            url: Some(item.destination.as_str().to_string()),
            files: Vec::new(),
        }
    }
}
