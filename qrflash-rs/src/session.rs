//! The user-facing pipeline: normalize, encode, compose, dispatch.
//!
//! Every public action on [`QrFlash`] resolves to exactly one notification,
//! whether it succeeds or fails. Actions take `&self` and work on an
//! immutable snapshot of the last generated code, so overlapping actions
//! cannot disturb each other.

use crate::artifact::RasterArtifact;
use crate::card::{BrandingSpec, CardCompositor};
use crate::destination::{self, CanonicalDestination};
use crate::dispatch::{
    Channel, ChannelError, ChannelStatus, DispatchConfig, DispatchReport, Dispatcher,
    Distributable, DistributionOutcome, HostPlatform, Intent,
};
use crate::encoder::{CodeEncoder, CodeSurface, QrCodeEncoder, RenderOptions};
use crate::error::{QrFlashError, ValidationError};
use crate::notify::{Notification, Notifier};
use crate::social::{self, SocialTarget};
use qrflash_canvas::FontConfig;
use std::cell::RefCell;
use std::rc::Rc;

/// A generated code and the destination it encodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generated {
    pub destination: CanonicalDestination,
    /// PNG copy of the code surface, kept for display and direct actions.
    pub code: RasterArtifact,
}

/// A QR Flash session bound to one host.
pub struct QrFlash {
    host: Rc<dyn HostPlatform>,
    notifier: Rc<dyn Notifier>,
    encoder: Box<dyn CodeEncoder>,
    compositor: CardCompositor,
    options: RenderOptions,
    branding: BrandingSpec,
    dispatch_config: DispatchConfig,
    current: RefCell<Option<Rc<Generated>>>,
}

impl QrFlash {
    /// A session with the default QR encoder, render options, branding and
    /// system fonts.
    pub fn new(host: Rc<dyn HostPlatform>, notifier: Rc<dyn Notifier>) -> Self {
        Self {
            host,
            notifier,
            encoder: Box::new(QrCodeEncoder::default()),
            compositor: CardCompositor::default(),
            options: RenderOptions::default(),
            branding: BrandingSpec::default(),
            dispatch_config: DispatchConfig::default(),
            current: RefCell::new(None),
        }
    }

    pub fn with_encoder(mut self, encoder: Box<dyn CodeEncoder>) -> Self {
        self.encoder = encoder;
        self
    }

    pub fn with_render_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_branding(mut self, branding: BrandingSpec) -> Self {
        self.branding = branding;
        self
    }

    pub fn with_fonts(mut self, fonts: &FontConfig) -> Self {
        self.compositor = CardCompositor::from_config(fonts);
        self
    }

    pub fn with_dispatch_config(mut self, config: DispatchConfig) -> Self {
        self.dispatch_config = config;
        self
    }

    pub fn render_options(&self) -> &RenderOptions {
        &self.options
    }

    pub fn branding(&self) -> &BrandingSpec {
        &self.branding
    }

    /// The last generated code, if any.
    pub fn current(&self) -> Option<Rc<Generated>> {
        self.current.borrow().clone()
    }

    /// Data URL of the last generated code, for on-screen preview.
    pub fn preview_data_url(&self) -> Option<String> {
        self.current().map(|g| g.code.data_url().to_string())
    }

    /// Validate `raw`, encode it and keep the result as the current code.
    ///
    /// Starting a generation discards the previous code even when this one fails.
    pub async fn generate(&self, raw: &str) -> Result<Rc<Generated>, QrFlashError> {
        *self.current.borrow_mut() = None;
        let result = self.try_generate(raw).await;
        match &result {
            Ok(generated) => {
                log::info!("generated QR code for {}", generated.destination);
                *self.current.borrow_mut() = Some(Rc::clone(generated));
                self.notifier.notify(Notification::generated());
            }
            Err(err) => self.notify_failure(err),
        }
        result
    }

    async fn try_generate(&self, raw: &str) -> Result<Rc<Generated>, QrFlashError> {
        let destination = destination::canonicalize(raw)?;
        let surface = self
            .encoder
            .encode(destination.as_str(), &self.options)
            .await?;
        let code = surface.to_artifact()?;
        Ok(Rc::new(Generated { destination, code }))
    }

    /// Compose a card for the current code without notifying.
    pub async fn card(&self) -> Result<RasterArtifact, QrFlashError> {
        let generated = self.snapshot()?;
        self.compose_card(&generated).await
    }

    async fn compose_card(&self, generated: &Generated) -> Result<RasterArtifact, QrFlashError> {
        // Cards are drawn from the kept PNG, not from a live surface
        let surface = CodeSurface::from_png(generated.code.blob().bytes())?;
        Ok(self
            .compositor
            .compose(surface, &generated.destination, &self.branding)
            .await?)
    }

    pub async fn download_code(&self) -> Result<DispatchReport, QrFlashError> {
        self.code_action(Intent::Download).await
    }

    pub async fn copy_code(&self) -> Result<DispatchReport, QrFlashError> {
        self.code_action(Intent::Copy).await
    }

    pub async fn share_code(&self) -> Result<DispatchReport, QrFlashError> {
        self.code_action(Intent::Share).await
    }

    /// Copy only the destination text.
    pub async fn copy_link(&self) -> Result<DispatchReport, QrFlashError> {
        self.code_action(Intent::CopyLink).await
    }

    pub async fn download_card(&self) -> Result<DispatchReport, QrFlashError> {
        self.card_action(Intent::Download).await
    }

    pub async fn share_card(&self) -> Result<DispatchReport, QrFlashError> {
        self.card_action(Intent::Share).await
    }

    pub async fn copy_card(&self) -> Result<DispatchReport, QrFlashError> {
        self.card_action(Intent::Copy).await
    }

    /// Open the share-intent page of a social platform for the current destination.
    pub async fn open_social(&self, target: SocialTarget) -> Result<String, QrFlashError> {
        let result = self.try_open_social(target).await;
        match &result {
            Ok(_) => self.notifier.notify(Notification::social_opened(target)),
            Err(err) => self.notify_failure(err),
        }
        result
    }

    async fn try_open_social(&self, target: SocialTarget) -> Result<String, QrFlashError> {
        let generated = self.snapshot()?;
        let link = social::share_link(target, &generated.destination);
        match self.host.open_in_new_context(&link).await {
            Ok(()) => Ok(link),
            Err(err) => {
                log::warn!(target: "dispatch", "opening {} failed: {}", target.name(), err);
                let status = match err {
                    ChannelError::Unsupported => ChannelStatus::Unsupported,
                    _ => ChannelStatus::Failed,
                };
                Err(QrFlashError::AllChannelsFailed {
                    intent: Intent::Share,
                    attempts: vec![DistributionOutcome {
                        channel: Channel::NewTabFallback,
                        status,
                    }],
                })
            }
        }
    }

    async fn code_action(&self, intent: Intent) -> Result<DispatchReport, QrFlashError> {
        let result = match self.snapshot() {
            Ok(generated) => {
                let item = Distributable {
                    artifact: &generated.code,
                    destination: &generated.destination,
                    filename: &self.dispatch_config.download_filename,
                };
                Ok(self.dispatcher().dispatch(intent, item).await)
            }
            Err(err) => Err(err),
        };
        self.finish(intent, result)
    }

    async fn card_action(&self, intent: Intent) -> Result<DispatchReport, QrFlashError> {
        let result = self.try_card_action(intent).await;
        self.finish(intent, result)
    }

    async fn try_card_action(&self, intent: Intent) -> Result<DispatchReport, QrFlashError> {
        let generated = self.snapshot()?;
        let card = self.compose_card(&generated).await?;
        let item = Distributable {
            artifact: &card,
            destination: &generated.destination,
            filename: &self.dispatch_config.card_filename,
        };
        Ok(self.dispatcher().dispatch(intent, item).await)
    }

    fn dispatcher(&self) -> Dispatcher<'_> {
        Dispatcher::new(self.host.as_ref(), &self.dispatch_config)
    }

    fn snapshot(&self) -> Result<Rc<Generated>, QrFlashError> {
        self.current().ok_or(QrFlashError::Validation(ValidationError::NoCode))
    }

    /// Turn a dispatch into the action's result and its single notification.
    fn finish(
        &self,
        intent: Intent,
        result: Result<DispatchReport, QrFlashError>,
    ) -> Result<DispatchReport, QrFlashError> {
        let result = result.and_then(DispatchReport::into_result);
        match &result {
            Ok(report) => match report.succeeded_channel() {
                Some(channel) => self
                    .notifier
                    .notify(Notification::delivered(intent, channel)),
                None => self.notify_failure(&QrFlashError::AllChannelsFailed {
                    intent,
                    attempts: report.attempts.clone(),
                }),
            },
            Err(err) => self.notify_failure(err),
        }
        result
    }

    fn notify_failure(&self, err: &QrFlashError) {
        log::warn!("action failed: {}", err);
        self.notifier.notify(Notification::failed(err));
    }
}
