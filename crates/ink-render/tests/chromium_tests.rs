#![cfg(all(feature = "chromium", unix))]

use ink_base::ViewportSpec;
use ink_render::chromium::resolve_source;
use ink_render::{ChromiumConfig, ChromiumRenderer, RenderError, RenderSession, Renderer};
use std::time::Duration;

fn scratch(name: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!("ink-chromium-test-{}-{}", std::process::id(), name));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn viewport() -> ViewportSpec {
    ViewportSpec::new(64, 40).unwrap()
}

#[test]
fn test_resolve_source_keeps_urls() {
    assert_eq!(resolve_source("https://example.com/w").unwrap(), "https://example.com/w");
    assert_eq!(resolve_source("data:text/html,<p>").unwrap(), "data:text/html,<p>");
}

#[test]
fn test_resolve_source_makes_file_url() {
    let dir = scratch("resolve");
    let page = dir.join("weather.html");
    std::fs::write(&page, "<div class=\"container\"></div>").unwrap();
    let url = resolve_source(page.to_str().unwrap()).unwrap();
    assert!(url.starts_with("file:///"));
    assert!(url.ends_with("weather.html"));
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_resolve_missing_file_fails() {
    assert!(matches!(
        resolve_source("/nonexistent/weather.html"),
        Err(RenderError::Failure(_))
    ));
}

#[tokio::test]
async fn test_missing_browser_fails_to_open() {
    let renderer = ChromiumRenderer::new(ChromiumConfig::default().with_executable("/nonexistent/chromium"));
    assert!(matches!(
        renderer.open_session(viewport()).await,
        Err(RenderError::Failure(_))
    ));
}

#[tokio::test]
async fn test_session_directory_is_removed_on_close_and_drop() {
    let dir = scratch("lifecycle");
    let renderer = ChromiumRenderer::new(
        ChromiumConfig::default()
            .with_executable("/bin/sh")
            .with_scratch_dir(&dir),
    );

    let session = renderer.open_session(viewport()).await.unwrap();
    assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 1);
    session.close().await.unwrap();
    assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 0);

    let session = renderer.open_session(viewport()).await.unwrap();
    drop(session);
    assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 0);

    std::fs::remove_dir_all(&dir).ok();
}

#[tokio::test]
async fn test_wait_for_sees_marker_in_dumped_dom() {
    let dir = scratch("ready");
    // echo prints its arguments, including the page itself
    let renderer = ChromiumRenderer::new(
        ChromiumConfig::default()
            .with_executable("/bin/echo")
            .with_scratch_dir(&dir),
    );
    let mut session = renderer.open_session(viewport()).await.unwrap();
    session
        .navigate("data:text/html,<div class=\"container\">ok</div>")
        .await
        .unwrap();
    session.wait_for(".container", Duration::from_secs(5)).await.unwrap();
    session.close().await.unwrap();
    std::fs::remove_dir_all(&dir).ok();
}

#[tokio::test]
async fn test_wait_for_times_out_without_marker() {
    let dir = scratch("timeout");
    let renderer = ChromiumRenderer::new(
        ChromiumConfig::default()
            .with_executable("/bin/echo")
            .with_poll_interval(Duration::from_millis(20))
            .with_scratch_dir(&dir),
    );
    let mut session = renderer.open_session(viewport()).await.unwrap();
    session.navigate("data:text/html,<p>loading</p>").await.unwrap();
    let result = session.wait_for(".container", Duration::from_millis(200)).await;
    assert!(matches!(result, Err(RenderError::Timeout(_))));
    session.close().await.unwrap();
    std::fs::remove_dir_all(&dir).ok();
}

#[tokio::test]
async fn test_browser_error_is_render_failure() {
    let dir = scratch("failure");
    let renderer = ChromiumRenderer::new(
        ChromiumConfig::default()
            .with_executable("/bin/false")
            .with_scratch_dir(&dir),
    );
    let mut session = renderer.open_session(viewport()).await.unwrap();
    session.navigate("https://example.invalid").await.unwrap();
    let result = session.wait_for(".container", Duration::from_secs(5)).await;
    assert!(matches!(result, Err(RenderError::Failure(_))));
    assert!(matches!(session.snapshot().await, Err(RenderError::Failure(_))));
    drop(session);
    std::fs::remove_dir_all(&dir).ok();
}
