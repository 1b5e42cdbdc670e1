//! Host platform for a desktop terminal.

use async_trait::async_trait;
use qrflash_rs::{Blob, Capability, ChannelError, HostPlatform, ShareFile, SharePayload};
use std::borrow::Cow;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

/// Terminals have no share sheet. Downloads land in `output_dir` and
/// "new tabs" are printed for the user to open.
///
/// On Linux the clipboard contents belong to this process, so every write
/// blocks for up to `clipboard_hold` or until a clipboard manager takes over.
pub struct DesktopHost {
    clipboard: Option<RefCell<arboard::Clipboard>>,
    clipboard_hold: Duration,
    output_dir: PathBuf,
    object_urls: RefCell<HashMap<String, Blob>>,
    next_url: Cell<u64>,
}

impl DesktopHost {
    pub fn new(output_dir: PathBuf, use_clipboard: bool, clipboard_hold: Duration) -> Self {
        let clipboard = if use_clipboard {
            match arboard::Clipboard::new() {
                Ok(clipboard) => Some(RefCell::new(clipboard)),
                Err(err) => {
                    log::info!("system clipboard unavailable: {}", err);
                    None
                }
            }
        } else {
            None
        };
        Self {
            clipboard,
            clipboard_hold,
            output_dir,
            object_urls: RefCell::new(HashMap::new()),
            next_url: Cell::new(0),
        }
    }

    fn with_clipboard(
        &self,
        write: impl FnOnce(&mut arboard::Clipboard) -> Result<(), arboard::Error>,
    ) -> Result<(), ChannelError> {
        let clipboard = self.clipboard.as_ref().ok_or(ChannelError::Unsupported)?;
        write(&mut clipboard.borrow_mut()).map_err(|e| ChannelError::Failed(e.to_string()))
    }
}

#[async_trait(?Send)]
impl HostPlatform for DesktopHost {
    fn can_share_files(&self, _file: &ShareFile) -> Capability {
        Capability::Unavailable
    }

    fn can_share_basic(&self) -> Capability {
        Capability::Unavailable
    }

    fn clipboard_supports_image_write(&self) -> Capability {
        Capability::from(self.clipboard.is_some())
    }

    fn is_known_download_attribute_ignoring_browser(&self) -> bool {
        false
    }

    async fn share(&self, _payload: &SharePayload) -> Result<(), ChannelError> {
        Err(ChannelError::Unsupported)
    }

    async fn write_clipboard_image(&self, image: &Blob) -> Result<(), ChannelError> {
        let rgba = image::load_from_memory(image.bytes())
            .map_err(|e| ChannelError::Failed(e.to_string()))?
            .to_rgba8();
        let (width, height) = rgba.dimensions();
        let image = arboard::ImageData {
            width: width as usize,
            height: height as usize,
            bytes: Cow::Owned(rgba.into_raw()),
        };
        let hold = self.clipboard_hold;
        self.with_clipboard(|clipboard| held(clipboard, hold).image(image))
    }

    async fn write_clipboard_text(&self, text: &str) -> Result<(), ChannelError> {
        let hold = self.clipboard_hold;
        self.with_clipboard(|clipboard| held(clipboard, hold).text(text))
    }

    fn create_object_url(&self, blob: &Blob) -> Result<String, ChannelError> {
        let n = self.next_url.get() + 1;
        self.next_url.set(n);
        let url = format!("blob:qrflash/{n}");
        self.object_urls
            .borrow_mut()
            .insert(url.clone(), blob.clone());
        Ok(url)
    }

    fn revoke_object_url(&self, url: &str) {
        if self.object_urls.borrow_mut().remove(url).is_none() {
            log::warn!("revoking unknown object URL {}", url);
        }
    }

    async fn click_download_anchor(&self, href: &str, filename: &str) -> Result<(), ChannelError> {
        let blob = self
            .object_urls
            .borrow()
            .get(href)
            .cloned()
            .ok_or_else(|| ChannelError::Failed(format!("{href} has been revoked")))?;
        let path = self.output_dir.join(filename);
        std::fs::write(&path, blob.bytes()).map_err(|e| {
            ChannelError::Failed(format!("failed to write {}: {}", path.display(), e))
        })?;
        println!("Saved {}", path.display());
        Ok(())
    }

    async fn open_in_new_context(&self, href: &str) -> Result<(), ChannelError> {
        println!("{href}");
        Ok(())
    }
}

/// A clipboard write that keeps serving the contents for `hold`.
#[cfg(target_os = "linux")]
fn held(clipboard: &mut arboard::Clipboard, hold: Duration) -> arboard::Set<'_> {
    use arboard::SetExtLinux;
    clipboard
        .set()
        .wait_until(std::time::Instant::now() + hold)
}

#[cfg(not(target_os = "linux"))]
fn held(clipboard: &mut arboard::Clipboard, _hold: Duration) -> arboard::Set<'_> {
    clipboard.set()
}
