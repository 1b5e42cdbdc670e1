mod host;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use host::DesktopHost;
use qrflash_rs::{
    BrandingSpec, Notification, Notifier, QrFlash, QrFlashError, RenderOptions, SocialTarget,
};
use std::cell::Cell;
use std::path::PathBuf;
use std::process::ExitCode;
use std::rc::Rc;
use std::time::Duration;

/// qrflash: Generate a QR code for a link, optionally compose it into a card, and deliver it
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Destination to encode. A missing scheme defaults to https://
    pub destination: String,

    /// What to do with the result
    #[clap(short, long, value_enum, default_value_t = Action::Download)]
    pub action: Action,

    /// Deliver a branded card instead of the bare code
    #[clap(short, long)]
    pub card: bool,

    /// Directory that downloads are written to
    #[clap(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Path to a JSON file with card branding (brandName, brandTagline, cardWidth, cardHeight)
    #[clap(short, long)]
    pub branding: Option<PathBuf>,

    /// Width of the code in pixels
    #[clap(long, default_value_t = 256)]
    pub width: u32,

    /// Quiet zone around the code, in modules
    #[clap(long, default_value_t = 2)]
    pub margin: u32,

    /// CSS color of dark modules
    #[clap(long, default_value = "#1a1a1a")]
    pub dark: String,

    /// CSS color of light modules
    #[clap(long, default_value = "#ffffff")]
    pub light: String,

    /// Also print the share link for a social platform (facebook, twitter, linkedin, whatsapp, email)
    #[clap(long, value_parser = parse_social)]
    pub social: Option<SocialTarget>,

    /// Never touch the system clipboard
    #[clap(long)]
    pub no_clipboard: bool,

    /// Seconds to keep serving copied contents on Linux, where they vanish when qrflash exits
    #[clap(long, default_value_t = 5)]
    pub clipboard_hold_secs: u64,

    /// Log pipeline and dispatch details
    #[clap(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Action {
    Download,
    Copy,
    Share,
    CopyLink,
}

fn parse_social(name: &str) -> Result<SocialTarget, String> {
    SocialTarget::from_name(name).ok_or_else(|| format!("unknown social platform: {name}"))
}

/// Prints notifications and remembers whether any was destructive.
#[derive(Debug, Default)]
struct TerminalNotifier {
    failed: Cell<bool>,
}

impl Notifier for TerminalNotifier {
    fn notify(&self, notification: Notification) {
        if notification.is_destructive() {
            self.failed.set(true);
            eprintln!("{}: {}", notification.title, notification.description);
        } else {
            println!("{}: {}", notification.title, notification.description);
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args: Args = Args::parse();

    let level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match run(args).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

/// Returns whether every action succeeded. Action failures have already been
/// reported through the notifier.
async fn run(args: Args) -> anyhow::Result<bool> {
    let branding = match &args.branding {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read branding file: {}", path.display()))?;
            serde_json::from_str::<BrandingSpec>(&text)
                .with_context(|| format!("Failed to parse branding file: {}", path.display()))?
        }
        None => BrandingSpec::default(),
    };
    let options = RenderOptions::default()
        .with_width(args.width)
        .with_margin(args.margin)
        .with_dark_color(args.dark.clone())
        .with_light_color(args.light.clone());

    let host = Rc::new(DesktopHost::new(
        args.output_dir.clone(),
        !args.no_clipboard,
        Duration::from_secs(args.clipboard_hold_secs),
    ));
    let notifier = Rc::new(TerminalNotifier::default());
    let session = QrFlash::new(host, notifier.clone())
        .with_render_options(options)
        .with_branding(branding);

    if session.generate(&args.destination).await.is_err() {
        return Ok(false);
    }

    let delivered = match (args.action, args.card) {
        (Action::Download, false) => session.download_code().await,
        (Action::Copy, false) => session.copy_code().await,
        (Action::Share, false) => session.share_code().await,
        (Action::Download, true) => session.download_card().await,
        (Action::Copy, true) => session.copy_card().await,
        (Action::Share, true) => session.share_card().await,
        (Action::CopyLink, _) => session.copy_link().await,
    };
    if let Err(QrFlashError::AllChannelsFailed { attempts, .. }) = &delivered {
        for attempt in attempts {
            log::info!("{}: {:?}", attempt.channel, attempt.status);
        }
    }

    if let Some(target) = args.social {
        session.open_social(target).await.ok();
    }

    Ok(!notifier.failed.get())
}
