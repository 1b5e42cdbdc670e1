//! Host platform boundary: capability queries and the channels themselves.

use crate::artifact::Blob;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Whether the host offers a feature right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Available,
    Unavailable,
}

impl Capability {
    pub fn is_available(self) -> bool {
        matches!(self, Capability::Available)
    }
}

impl From<bool> for Capability {
    fn from(available: bool) -> Self {
        if available {
            Capability::Available
        } else {
            Capability::Unavailable
        }
    }
}

/// Failure of a single channel attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChannelError {
    #[error("not supported by this host")]
    Unsupported,

    #[error("dismissed by the user")]
    Dismissed,

    #[error("{0}")]
    Failed(String),
}

/// A file attached to a native share.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareFile {
    pub name: String,
    pub mime: String,
    pub bytes: Arc<[u8]>,
}

impl ShareFile {
    pub fn from_blob(blob: &Blob, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mime: blob.mime().to_string(),
            bytes: blob.shared_bytes(),
        }
    }
}

/// What a native share sheet receives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharePayload {
    pub title: String,
    pub text: String,
    pub url: Option<String>,
    pub files: Vec<ShareFile>,
}

/// Everything the dispatcher needs from the environment it runs in.
///
/// Capabilities are queried fresh on every dispatch; implementations must not
/// assume their answers are cached.
#[async_trait(?Send)]
pub trait HostPlatform {
    /// Whether a native share of `file` is possible.
    fn can_share_files(&self, file: &ShareFile) -> Capability;

    /// Whether a native share of text and a link is possible.
    fn can_share_basic(&self) -> Capability;

    fn clipboard_supports_image_write(&self) -> Capability;

    /// True on browser families that ignore the download attribute of anchors.
    fn is_known_download_attribute_ignoring_browser(&self) -> bool;

    async fn share(&self, payload: &SharePayload) -> Result<(), ChannelError>;

    async fn write_clipboard_image(&self, image: &Blob) -> Result<(), ChannelError>;

    async fn write_clipboard_text(&self, text: &str) -> Result<(), ChannelError>;

    /// Create a temporary reference to `blob`. Must be paired with
    /// [`HostPlatform::revoke_object_url`].
    fn create_object_url(&self, blob: &Blob) -> Result<String, ChannelError>;

    fn revoke_object_url(&self, url: &str);

    /// Trigger a download of `href` saved as `filename`.
    async fn click_download_anchor(&self, href: &str, filename: &str) -> Result<(), ChannelError>;

    /// Open `href` in a new browsing context.
    async fn open_in_new_context(&self, href: &str) -> Result<(), ChannelError>;
}
