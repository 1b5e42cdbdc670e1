// Allow uninlined format args for cleaner log! macros
#![allow(clippy::uninlined_format_args)]
#![doc = include_str!("../README.md")]

pub mod artifact;
pub mod card;
pub mod destination;
pub mod dispatch;
pub mod encoder;
pub mod error;
pub mod notify;
pub mod session;
pub mod social;

pub use artifact::{Blob, RasterArtifact};
pub use card::{BrandingSpec, CardCompositor};
pub use destination::{canonicalize, validate, CanonicalDestination};
pub use dispatch::{
    Capability, Channel, ChannelError, ChannelStatus, DispatchConfig, DispatchReport,
    DispatchState, Dispatcher, Distributable, DistributionOutcome, HostPlatform, Intent,
    ShareFile, SharePayload,
};
pub use encoder::{CodeEncoder, CodeSurface, QrCodeEncoder, RenderOptions};
pub use error::{CompositionError, EncodingError, QrFlashError, ValidationError};
pub use notify::{LogNotifier, Notification, Notifier, RecordingNotifier, Severity};
pub use session::{Generated, QrFlash};
pub use social::SocialTarget;

pub use qrflash_canvas;
