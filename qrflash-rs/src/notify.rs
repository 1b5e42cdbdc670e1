//! User-facing notifications.
//!
//! Every user action ends in exactly one [`Notification`]. The texts mirror
//! the toasts of the QR Flash web app.

use crate::dispatch::{Channel, Intent};
use crate::error::{EncodingError, QrFlashError, ValidationError};
use crate::social::SocialTarget;
use std::cell::RefCell;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Destructive,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub severity: Severity,
}

impl Notification {
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity: Severity::Info,
        }
    }

    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity: Severity::Destructive,
        }
    }

    pub fn is_destructive(&self) -> bool {
        self.severity == Severity::Destructive
    }

    pub fn generated() -> Self {
        Self::info(
            "QR Code Generated!",
            "Your QR code is ready to download or share.",
        )
    }

    /// Notification for a successful dispatch that ended on `channel`.
    pub fn delivered(intent: Intent, channel: Channel) -> Self {
        match (intent, channel) {
            (_, Channel::FileDownload | Channel::NewTabFallback) => {
                Self::info("Download Started", "Your QR code is being downloaded.")
            }
            (_, Channel::NativeShareFile | Channel::NativeShareLink) => {
                Self::info("Shared Successfully", "QR code shared successfully.")
            }
            (_, Channel::ClipboardImage) => {
                Self::info("Copied to Clipboard", "QR code image copied successfully.")
            }
            (Intent::CopyLink, Channel::ClipboardText) => {
                Self::info("URL Copied", "URL copied to clipboard successfully.")
            }
            (_, Channel::ClipboardText) => {
                Self::info("URL Copied", "URL copied to clipboard as fallback.")
            }
        }
    }

    pub fn social_opened(target: SocialTarget) -> Self {
        Self::info(
            format!("Opening {}", target.name()),
            format!("Share your QR code on {}.", target.name()),
        )
    }

    /// Notification for a failed action.
    pub fn failed(error: &QrFlashError) -> Self {
        match error {
            QrFlashError::Validation(ValidationError::Empty) => Self::destructive(
                "URL Required",
                "Please enter a valid URL to generate QR code.",
            ),
            QrFlashError::Validation(ValidationError::Invalid(_)) => Self::destructive(
                "Invalid URL",
                "Please enter a valid URL (e.g., example.com or https://example.com).",
            ),
            QrFlashError::Validation(ValidationError::NoCode) => {
                Self::destructive("No QR Code", "Generate a QR code first.")
            }
            QrFlashError::Encoding(EncodingError::CapacityExceeded { .. }) => Self::destructive(
                "Generation Failed",
                "The URL is too long to fit in a QR code. Try a shorter link.",
            ),
            QrFlashError::Encoding(_) => Self::destructive(
                "Generation Failed",
                "Failed to generate QR code. Please try again.",
            ),
            QrFlashError::Composition(_) => Self::destructive(
                "Card Generation Failed",
                "Failed to create the QR card. Please try again.",
            ),
            QrFlashError::AllChannelsFailed { intent, .. } => match intent {
                Intent::Share => {
                    Self::destructive("Share Failed", "Unable to share or copy the QR code.")
                }
                Intent::Copy => Self::destructive("Copy Failed", "Unable to copy to clipboard."),
                Intent::CopyLink => {
                    Self::destructive("Copy Failed", "Unable to copy URL to clipboard.")
                }
                Intent::Download => {
                    Self::destructive("Download Failed", "Unable to download the QR code.")
                }
            },
        }
    }
}

/// Receives the notification that ends each action.
pub trait Notifier {
    fn notify(&self, notification: Notification);
}

/// Writes notifications to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: Notification) {
        match notification.severity {
            Severity::Info => log::info!("{}: {}", notification.title, notification.description),
            Severity::Destructive => {
                log::error!("{}: {}", notification.title, notification.description)
            }
        }
    }
}

/// Keeps every notification, for inspection.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notifications: RefCell<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications.borrow().clone()
    }

    pub fn last(&self) -> Option<Notification> {
        self.notifications.borrow().last().cloned()
    }

    pub fn len(&self) -> usize {
        self.notifications.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.notifications.borrow().is_empty()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.notifications.borrow_mut().push(notification);
    }
}
