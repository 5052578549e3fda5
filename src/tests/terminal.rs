use std::time::Duration;

use tokio::sync::mpsc;
use tokio::sync::oneshot;
use tokio::time::timeout;

use crate::controller::Controller;
use crate::endpoint;
use crate::endpoint::Endpoint;
use crate::endpoint::Response;
use crate::links::LinkRequest;
use crate::terminal;
use crate::tests::helper;
use crate::tests::helper::Scripted;

/// Endpoint that never answers
struct Hanging;

impl Endpoint for Hanging {
    async fn create(&self, _request: &LinkRequest) -> endpoint::Result<Response> {
        std::future::pending().await
    }
}

#[tokio::test]
async fn test_shutdown_with_open_input() {
    let page = helper::page();
    let endpoint = Scripted::new(vec![helper::created("abc123", "https://example.com")]);
    let controller = Controller::new(&page, &endpoint);

    let (sender, mut lines) = mpsc::channel(4);
    let (stop, stopped) = oneshot::channel::<()>();
    let mut out = Vec::new();

    let host = terminal::run(&page, &controller, &mut lines, &mut out, async {
        let _ = stopped.await;
    });

    let user = async {
        sender.send("https://example.com".to_string()).await.unwrap();
        sender.send(String::new()).await.unwrap();

        while page.list.rows().is_empty() {
            tokio::task::yield_now().await;
        }

        // input stays open, only the signal arrives
        stop.send(()).unwrap();
    };

    let (result, ()) = timeout(Duration::from_secs(5), async { tokio::join!(host, user) })
        .await
        .expect("Shutdown should end the host loop");
    result.unwrap();

    assert!(!sender.is_closed());
    assert_eq!(1, page.list.rows().len());

    let out = String::from_utf8(out).unwrap();
    assert!(out.contains("Links expire between 2024-03-10T12:00 and 2025-03-10T12:00"));
    assert!(out.contains("  https://blahaj.mom/abc123 -> https://example.com\n"));
}

#[tokio::test]
async fn test_shutdown_during_submission() {
    let page = helper::page();
    let controller = Controller::new(&page, Hanging);

    let (sender, mut lines) = mpsc::channel(4);
    let (stop, stopped) = oneshot::channel::<()>();
    let mut out = Vec::new();

    let host = terminal::run(&page, &controller, &mut lines, &mut out, async {
        let _ = stopped.await;
    });

    let user = async {
        sender.send("https://example.com".to_string()).await.unwrap();
        sender.send(String::new()).await.unwrap();

        while !page.submit.is_disabled() {
            tokio::task::yield_now().await;
        }

        stop.send(()).unwrap();
    };

    let (result, ()) = timeout(Duration::from_secs(5), async { tokio::join!(host, user) })
        .await
        .expect("Shutdown should end a hanging submission");
    result.unwrap();

    assert!(!page.submit.is_disabled());
    assert!(page.list.rows().is_empty());
}

#[tokio::test]
async fn test_closed_input_ends_host_loop() {
    let page = helper::page();
    let endpoint = Scripted::default();
    let controller = Controller::new(&page, &endpoint);

    let (sender, mut lines) = mpsc::channel(4);
    sender.send("not a url".to_string()).await.unwrap();
    sender.send(String::new()).await.unwrap();
    drop(sender);

    let mut out = Vec::new();
    terminal::run(
        &page,
        &controller,
        &mut lines,
        &mut out,
        std::future::pending(),
    )
    .await
    .unwrap();

    assert!(endpoint.requests().is_empty());

    let out = String::from_utf8(out).unwrap();
    assert!(out.contains("destination: Please enter a URL\n"));
}
