mod common;

use common::{FakeHost, HostCall};
use qrflash_rs::{
    canonicalize, Capability, Channel, ChannelError, ChannelStatus, DispatchConfig,
    DispatchState, Dispatcher, Distributable, DistributionOutcome, Intent, QrFlashError,
    RasterArtifact,
};
use rstest::rstest;
use std::time::Duration;

fn artifact() -> RasterArtifact {
    RasterArtifact::from_rgba(&[0, 0, 0, 255, 255, 255, 255, 255], 2, 1).unwrap()
}

fn fast_config() -> DispatchConfig {
    DispatchConfig {
        revoke_delay: Duration::ZERO,
        ..DispatchConfig::default()
    }
}

fn outcome(channel: Channel, status: ChannelStatus) -> DistributionOutcome {
    DistributionOutcome { channel, status }
}

async fn run(host: &FakeHost, config: &DispatchConfig, intent: Intent) -> qrflash_rs::DispatchReport {
    let artifact = artifact();
    let destination = canonicalize("example.com").unwrap();
    let item = Distributable {
        artifact: &artifact,
        destination: &destination,
        filename: "qr-code.png",
    };
    Dispatcher::new(host, config).dispatch(intent, item).await
}

#[tokio::test]
async fn test_share_falls_back_to_clipboard_text() {
    let host = FakeHost::default();
    host.share_files.set(Capability::Unavailable);
    host.share_basic.set(Capability::Available);
    host.clipboard_image.set(Capability::Unavailable);
    host.share_results
        .borrow_mut()
        .push_back(Err(ChannelError::Dismissed));

    let report = run(&host, &fast_config(), Intent::Share).await;

    assert_eq!(report.succeeded_channel(), Some(Channel::ClipboardText));
    assert_eq!(
        report.attempts,
        vec![
            outcome(Channel::NativeShareFile, ChannelStatus::Unsupported),
            outcome(Channel::NativeShareLink, ChannelStatus::Failed),
            outcome(Channel::ClipboardImage, ChannelStatus::Unsupported),
            outcome(Channel::ClipboardText, ChannelStatus::Succeeded),
        ]
    );
    assert_eq!(
        host.channel_calls().last(),
        Some(&HostCall::ClipboardText("https://example.com".to_string()))
    );
}

#[tokio::test]
async fn test_share_with_file() {
    let host = FakeHost::default();
    let report = run(&host, &fast_config(), Intent::Share).await;

    assert_eq!(report.succeeded_channel(), Some(Channel::NativeShareFile));
    let calls = host.channel_calls();
    assert_eq!(calls.len(), 1);
    let HostCall::Share(payload) = &calls[0] else {
        panic!("expected a share call, got {:?}", calls[0]);
    };
    assert_eq!(payload.title, "QR Code");
    assert_eq!(payload.text, "QR Code for https://example.com");
    assert_eq!(payload.url.as_deref(), Some("https://example.com"));
    assert_eq!(payload.files.len(), 1);
    assert_eq!(payload.files[0].name, "qr-code.png");
    assert_eq!(payload.files[0].mime, "image/png");
    assert_eq!(&payload.files[0].bytes[..], artifact().blob().bytes());
}

#[tokio::test]
async fn test_dismissed_file_share_retries_as_link_share() {
    let host = FakeHost::default();
    host.share_results
        .borrow_mut()
        .push_back(Err(ChannelError::Dismissed));

    let report = run(&host, &fast_config(), Intent::Share).await;

    assert_eq!(report.succeeded_channel(), Some(Channel::NativeShareLink));
    let shares: Vec<_> = host
        .channel_calls()
        .into_iter()
        .filter_map(|call| match call {
            HostCall::Share(payload) => Some(payload),
            _ => None,
        })
        .collect();
    assert_eq!(shares.len(), 2);
    assert_eq!(shares[0].files.len(), 1);
    assert!(shares[1].files.is_empty());
}

#[tokio::test]
async fn test_state_history_is_sequential() {
    let host = FakeHost::desktop();
    let report = run(&host, &fast_config(), Intent::Share).await;

    assert_eq!(
        report.history,
        vec![
            DispatchState::Idle,
            DispatchState::CheckingCapability(Channel::NativeShareFile),
            DispatchState::CheckingCapability(Channel::NativeShareLink),
            DispatchState::CheckingCapability(Channel::ClipboardImage),
            DispatchState::Attempting(Channel::ClipboardImage),
            DispatchState::Succeeded(Channel::ClipboardImage),
        ]
    );
    assert!(report.state().is_terminal());
    // Capability queries happen right before their channel, never ahead of time
    assert_eq!(
        host.calls(),
        vec![
            HostCall::QueryShareFiles("qr-code.png".to_string()),
            HostCall::QueryShareBasic,
            HostCall::QueryClipboardImage,
            HostCall::ClipboardImage(artifact().byte_len()),
        ]
    );
}

#[rstest]
#[case(Ok(()), Ok(()), Some(Channel::ClipboardImage))]
#[case(Err(ChannelError::Failed("denied".into())), Ok(()), Some(Channel::ClipboardText))]
#[case(Err(ChannelError::Unsupported), Ok(()), Some(Channel::ClipboardText))]
#[case(Err(ChannelError::Failed("denied".into())), Err(ChannelError::Failed("denied".into())), None)]
#[tokio::test]
async fn test_copy_fallback(
    #[case] image: Result<(), ChannelError>,
    #[case] text: Result<(), ChannelError>,
    #[case] expected: Option<Channel>,
) {
    let host = FakeHost::desktop();
    *host.clipboard_image_result.borrow_mut() = image;
    *host.clipboard_text_result.borrow_mut() = text;

    let report = run(&host, &fast_config(), Intent::Copy).await;
    assert_eq!(report.succeeded_channel(), expected);
    if expected.is_none() {
        assert_eq!(report.state(), DispatchState::AllFailed);
        assert_eq!(report.attempts.len(), 2);
    }
}

#[tokio::test]
async fn test_all_failed_surfaces_error() {
    let host = FakeHost::desktop();
    host.clipboard_image.set(Capability::Unavailable);
    *host.clipboard_text_result.borrow_mut() = Err(ChannelError::Failed("no clipboard".into()));

    let report = run(&host, &fast_config(), Intent::Share).await;
    assert_eq!(report.history.last(), Some(&DispatchState::AllFailed));
    // The last resort was still attempted
    assert_eq!(
        report.final_outcome(),
        Some(outcome(Channel::ClipboardText, ChannelStatus::Failed))
    );
    match report.into_result() {
        Err(QrFlashError::AllChannelsFailed { intent, attempts }) => {
            assert_eq!(intent, Intent::Share);
            assert_eq!(attempts.len(), 4);
        }
        other => panic!("expected AllChannelsFailed, got {:?}", other),
    }
}

#[tokio::test]
async fn test_download_releases_object_url_after_delay() {
    let host = FakeHost::desktop();
    let config = DispatchConfig::default();
    assert_eq!(config.revoke_delay, Duration::from_millis(100));

    let started = std::time::Instant::now();
    let report = run(&host, &config, Intent::Download).await;

    assert!(started.elapsed() >= Duration::from_millis(100));
    assert_eq!(report.succeeded_channel(), Some(Channel::FileDownload));
    assert_eq!(
        host.channel_calls(),
        vec![
            HostCall::CreateObjectUrl("blob:fake/1".to_string()),
            HostCall::ClickDownload {
                href: "blob:fake/1".to_string(),
                filename: "qr-code.png".to_string(),
            },
            HostCall::RevokeObjectUrl("blob:fake/1".to_string()),
        ]
    );
    assert!(host.live_object_urls().is_empty());
}

#[tokio::test]
async fn test_failed_download_still_releases_object_url() {
    let host = FakeHost::desktop();
    *host.download_result.borrow_mut() = Err(ChannelError::Failed("blocked".into()));

    let report = run(&host, &fast_config(), Intent::Download).await;

    assert_eq!(report.state(), DispatchState::AllFailed);
    assert!(host.live_object_urls().is_empty());
    assert!(host
        .channel_calls()
        .contains(&HostCall::RevokeObjectUrl("blob:fake/1".to_string())));
}

#[tokio::test]
async fn test_repeated_downloads_do_not_leak() {
    let host = FakeHost::desktop();
    let config = fast_config();
    for _ in 0..3 {
        run(&host, &config, Intent::Download).await;
    }
    assert!(host.live_object_urls().is_empty());
}

#[tokio::test]
async fn test_download_quirk_opens_data_url() {
    let host = FakeHost::desktop();
    host.ignores_download_attribute.set(true);

    let report = run(&host, &fast_config(), Intent::Download).await;

    assert_eq!(report.succeeded_channel(), Some(Channel::NewTabFallback));
    assert_eq!(
        host.channel_calls(),
        vec![HostCall::OpenNewContext(artifact().data_url().to_string())]
    );
    assert!(host.live_object_urls().is_empty());
}

#[tokio::test]
async fn test_capabilities_are_queried_per_call() {
    let host = FakeHost::desktop();
    let config = fast_config();

    let first = run(&host, &config, Intent::Share).await;
    assert_eq!(first.succeeded_channel(), Some(Channel::ClipboardImage));

    // A share sheet becomes available after a user gesture
    host.share_files.set(Capability::Available);
    let second = run(&host, &config, Intent::Share).await;
    assert_eq!(second.succeeded_channel(), Some(Channel::NativeShareFile));
}

#[tokio::test]
async fn test_copy_link_uses_only_clipboard_text() {
    let host = FakeHost::default();
    let report = run(&host, &fast_config(), Intent::CopyLink).await;

    assert_eq!(report.succeeded_channel(), Some(Channel::ClipboardText));
    assert_eq!(
        host.channel_calls(),
        vec![HostCall::ClipboardText("https://example.com".to_string())]
    );
}

#[rstest]
#[case(Intent::Share, false)]
#[case(Intent::Copy, false)]
#[case(Intent::CopyLink, false)]
#[case(Intent::Download, true)]
#[tokio::test]
async fn test_download_quirk_queried_only_for_downloads(
    #[case] intent: Intent,
    #[case] queried: bool,
) {
    let host = FakeHost::desktop();
    run(&host, &fast_config(), intent).await;
    assert_eq!(host.calls().contains(&HostCall::QueryDownloadQuirk), queried);
}
