// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::time::Duration;

use axum::body::to_bytes;
use axum::http::header;

use super::*;

fn proxy(trial: Option<&str>) -> ContentProxy {
    let client = crate::outbound::http_client(Duration::from_secs(5)).expect("build client");
    ContentProxy::new(
        client,
        "https://iptv.example/lists/".to_owned(),
        trial.map(str::to_owned),
    )
}

#[test]
fn trial_target_uses_shared_source() {
    let target = proxy(Some("https://cdn.example/trial.m3u8")).target(Variant::Trial, "42");
    assert_eq!(target.variant, Variant::Trial);
    assert_eq!(target.url, "https://cdn.example/trial.m3u8");
    assert_eq!(target.filename, "test_playlist_42.m3u8");
}

#[test]
fn full_target_is_per_client() {
    let target = proxy(Some("https://cdn.example/trial.m3u8")).target(Variant::Full, "42");
    assert_eq!(target.variant, Variant::Full);
    assert_eq!(target.url, "https://iptv.example/lists/42.m3u");
    assert_eq!(target.filename, "iptv_playlist_42.m3u");
}

#[test]
fn trial_without_source_falls_back_to_full() {
    let p = proxy(None);
    assert!(!p.trial_available());
    assert_eq!(p.target(Variant::Trial, "42").variant, Variant::Full);

    let empty = proxy(Some(""));
    assert!(!empty.trial_available());
}

#[tokio::test]
async fn delivery_response_carries_download_headers() -> anyhow::Result<()> {
    let delivery = Delivery {
        variant: Variant::Full,
        filename: "iptv_playlist_42.m3u".to_owned(),
        body: Bytes::from_static(b"#EXTM3U\n"),
    };
    let resp = delivery.into_response();

    assert_eq!(resp.headers()[header::CONTENT_TYPE], PLAYLIST_CONTENT_TYPE);
    assert_eq!(
        resp.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"iptv_playlist_42.m3u\""
    );
    let body = to_bytes(resp.into_body(), usize::MAX).await?;
    assert_eq!(&body[..], b"#EXTM3U\n");
    Ok(())
}

#[tokio::test]
async fn delivery_reports_the_variant_actually_served() -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let app = axum::Router::new()
        .route("/lists/42.m3u", axum::routing::get(|| async { "#EXTM3U\nfull\n" }));
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    let client = crate::outbound::http_client(Duration::from_secs(5))?;
    let p = ContentProxy::new(client, format!("http://{addr}/lists/"), None);

    let delivery = p.deliver(Variant::Trial, "42").await?;
    assert_eq!(delivery.variant, Variant::Full);
    assert_eq!(delivery.filename, "iptv_playlist_42.m3u");
    assert_eq!(delivery.body.as_ref(), b"#EXTM3U\nfull\n");
    Ok(())
}
