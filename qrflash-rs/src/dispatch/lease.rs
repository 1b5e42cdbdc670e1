use super::host::{ChannelError, HostPlatform};
use crate::artifact::Blob;
use std::time::Duration;

/// A temporary object URL that is revoked when the lease ends.
///
/// Dropping the lease revokes immediately; [`ObjectUrlLease::release_after`]
/// waits first so the host can start reading the blob.
pub struct ObjectUrlLease<'h> {
    host: &'h dyn HostPlatform,
    url: Option<String>,
}

impl<'h> ObjectUrlLease<'h> {
    pub fn acquire(host: &'h dyn HostPlatform, blob: &Blob) -> Result<Self, ChannelError> {
        let url = host.create_object_url(blob)?;
        log::debug!(target: "dispatch", "acquired object url {}", url);
        Ok(Self {
            host,
            url: Some(url),
        })
    }

    pub fn url(&self) -> &str {
        self.url.as_deref().unwrap_or_default()
    }

    pub async fn release_after(mut self, delay: Duration) {
        tokio::time::sleep(delay).await;
        self.release();
    }

    fn release(&mut self) {
        if let Some(url) = self.url.take() {
            log::debug!(target: "dispatch", "revoking object url {}", url);
            self.host.revoke_object_url(&url);
        }
    }
}

impl Drop for ObjectUrlLease<'_> {
    fn drop(&mut self) {
        self.release();
    }
}
