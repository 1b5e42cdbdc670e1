//! A scripted host platform that records every call.

#![allow(dead_code)]

use async_trait::async_trait;
use qrflash_rs::{Blob, Capability, ChannelError, HostPlatform, ShareFile, SharePayload};
use std::cell::{Cell, RefCell};
use std::collections::{BTreeSet, VecDeque};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    QueryShareFiles(String),
    QueryShareBasic,
    QueryClipboardImage,
    QueryDownloadQuirk,
    Share(SharePayload),
    ClipboardImage(usize),
    ClipboardText(String),
    CreateObjectUrl(String),
    RevokeObjectUrl(String),
    ClickDownload { href: String, filename: String },
    OpenNewContext(String),
}

/// Every capability is available and every channel succeeds unless scripted
/// otherwise. Capabilities are cells so tests can flip them between actions.
pub struct FakeHost {
    pub share_files: Cell<Capability>,
    pub share_basic: Cell<Capability>,
    pub clipboard_image: Cell<Capability>,
    pub ignores_download_attribute: Cell<bool>,
    /// Results of successive `share` calls; `Ok` once exhausted.
    pub share_results: RefCell<VecDeque<Result<(), ChannelError>>>,
    pub clipboard_image_result: RefCell<Result<(), ChannelError>>,
    pub clipboard_text_result: RefCell<Result<(), ChannelError>>,
    pub download_result: RefCell<Result<(), ChannelError>>,
    pub new_context_result: RefCell<Result<(), ChannelError>>,
    calls: RefCell<Vec<HostCall>>,
    live_urls: RefCell<BTreeSet<String>>,
    next_url: Cell<u32>,
}

impl Default for FakeHost {
    fn default() -> Self {
        Self {
            share_files: Cell::new(Capability::Available),
            share_basic: Cell::new(Capability::Available),
            clipboard_image: Cell::new(Capability::Available),
            ignores_download_attribute: Cell::new(false),
            share_results: RefCell::new(VecDeque::new()),
            clipboard_image_result: RefCell::new(Ok(())),
            clipboard_text_result: RefCell::new(Ok(())),
            download_result: RefCell::new(Ok(())),
            new_context_result: RefCell::new(Ok(())),
            calls: RefCell::new(Vec::new()),
            live_urls: RefCell::new(BTreeSet::new()),
            next_url: Cell::new(0),
        }
    }
}

impl FakeHost {
    /// A desktop browser: no native share, clipboard images work.
    pub fn desktop() -> Self {
        let host = Self::default();
        host.share_files.set(Capability::Unavailable);
        host.share_basic.set(Capability::Unavailable);
        host
    }

    pub fn calls(&self) -> Vec<HostCall> {
        self.calls.borrow().clone()
    }

    /// Calls excluding capability queries.
    pub fn channel_calls(&self) -> Vec<HostCall> {
        self.calls()
            .into_iter()
            .filter(|call| {
                !matches!(
                    call,
                    HostCall::QueryShareFiles(_)
                        | HostCall::QueryShareBasic
                        | HostCall::QueryClipboardImage
                        | HostCall::QueryDownloadQuirk
                )
            })
            .collect()
    }

    pub fn live_object_urls(&self) -> Vec<String> {
        self.live_urls.borrow().iter().cloned().collect()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    fn record(&self, call: HostCall) {
        self.calls.borrow_mut().push(call);
    }
}

#[async_trait(?Send)]
impl HostPlatform for FakeHost {
    fn can_share_files(&self, file: &ShareFile) -> Capability {
        self.record(HostCall::QueryShareFiles(file.name.clone()));
        self.share_files.get()
    }

    fn can_share_basic(&self) -> Capability {
        self.record(HostCall::QueryShareBasic);
        self.share_basic.get()
    }

    fn clipboard_supports_image_write(&self) -> Capability {
        self.record(HostCall::QueryClipboardImage);
        self.clipboard_image.get()
    }

    fn is_known_download_attribute_ignoring_browser(&self) -> bool {
        self.record(HostCall::QueryDownloadQuirk);
        self.ignores_download_attribute.get()
    }

    async fn share(&self, payload: &SharePayload) -> Result<(), ChannelError> {
        self.record(HostCall::Share(payload.clone()));
        self.share_results.borrow_mut().pop_front().unwrap_or(Ok(()))
    }

    async fn write_clipboard_image(&self, image: &Blob) -> Result<(), ChannelError> {
        self.record(HostCall::ClipboardImage(image.len()));
        self.clipboard_image_result.borrow().clone()
    }

    async fn write_clipboard_text(&self, text: &str) -> Result<(), ChannelError> {
        self.record(HostCall::ClipboardText(text.to_string()));
        self.clipboard_text_result.borrow().clone()
    }

    fn create_object_url(&self, _blob: &Blob) -> Result<String, ChannelError> {
        let n = self.next_url.get() + 1;
        self.next_url.set(n);
        let url = format!("blob:fake/{n}");
        self.record(HostCall::CreateObjectUrl(url.clone()));
        self.live_urls.borrow_mut().insert(url.clone());
        Ok(url)
    }

    fn revoke_object_url(&self, url: &str) {
        self.record(HostCall::RevokeObjectUrl(url.to_string()));
        self.live_urls.borrow_mut().remove(url);
    }

    async fn click_download_anchor(&self, href: &str, filename: &str) -> Result<(), ChannelError> {
        self.record(HostCall::ClickDownload {
            href: href.to_string(),
            filename: filename.to_string(),
        });
        self.download_result.borrow().clone()
    }

    async fn open_in_new_context(&self, href: &str) -> Result<(), ChannelError> {
        self.record(HostCall::OpenNewContext(href.to_string()));
        self.new_context_result.borrow().clone()
    }
}
