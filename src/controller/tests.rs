//! Tests for the feed controller

use super::*;
use crate::pagination::Phase;
use crate::types::{Listing, PageToken};
use async_trait::async_trait;
use pretty_assertions::assert_eq;
use std::time::Duration;
use tokio::sync::oneshot;

type Reply = oneshot::Sender<Result<Page, FetchError>>;

/// A fetch the test answers by hand
struct PendingFetch {
    cursor: PageToken,
    reply: Reply,
}

impl PendingFetch {
    fn respond(self, ids: &[u64]) {
        let _ = self.reply.send(Ok(page(ids)));
    }

    fn fail(self) {
        let _ = self.reply.send(Err(FetchError::network("connection reset")));
    }
}

/// Fetcher whose responses are released by the test, in any order
struct ManualFetcher {
    calls: mpsc::UnboundedSender<PendingFetch>,
}

#[async_trait]
impl ListingFetcher for ManualFetcher {
    async fn fetch(
        &self,
        cursor: &PageToken,
        _filters: &FilterParams,
    ) -> Result<Page, FetchError> {
        let (reply, response) = oneshot::channel();
        let _ = self.calls.send(PendingFetch {
            cursor: cursor.clone(),
            reply,
        });
        response
            .await
            .unwrap_or_else(|_| Err(FetchError::network("test dropped the fetch")))
    }
}

fn page(ids: &[u64]) -> Page {
    Page::new(ids.iter().copied().map(Listing::new).collect())
}

fn ids(view: &FeedView) -> Vec<u64> {
    view.listings.iter().map(|l| l.id.get()).collect()
}

fn start() -> (FeedHandle, mpsc::UnboundedReceiver<PendingFetch>) {
    let (calls_tx, calls_rx) = mpsc::unbounded_channel();
    let fetcher = Arc::new(ManualFetcher { calls: calls_tx });
    let (handle, _task) = FeedController::spawn(fetcher, FilterParams::default());
    (handle, calls_rx)
}

async fn next_call(calls: &mut mpsc::UnboundedReceiver<PendingFetch>) -> PendingFetch {
    tokio::time::timeout(Duration::from_secs(5), calls.recv())
        .await
        .expect("timed out waiting for a fetch")
        .expect("fetcher dropped")
}

/// Wait until the published view satisfies a predicate
async fn wait_for_view(handle: &mut FeedHandle, f: impl Fn(&FeedView) -> bool) -> FeedView {
    loop {
        let view = handle.view();
        if f(&view) {
            return view;
        }
        let changed = tokio::time::timeout(Duration::from_secs(5), handle.changed())
            .await
            .expect("timed out waiting for view");
        assert!(changed, "controller stopped");
    }
}

#[tokio::test]
async fn test_initial_load_publishes_listings() {
    let (mut handle, mut calls) = start();
    assert_eq!(handle.view().phase, Phase::Idle);

    handle.load_initial();
    let call = next_call(&mut calls).await;
    assert!(call.cursor.is_start());

    let view = wait_for_view(&mut handle, |v| v.is_loading_initial).await;
    assert!(view.listings.is_empty());

    call.respond(&[50, 48, 45]);
    let view = handle.wait_until_settled().await;
    assert_eq!(ids(&view), vec![50, 48, 45]);
    assert!(!view.exhausted);
    assert!(view.error.is_none());
}

#[tokio::test]
async fn test_back_to_back_load_more_issues_one_fetch() {
    let (mut handle, mut calls) = start();

    handle.load_initial();
    next_call(&mut calls).await.respond(&[10, 9]);
    handle.wait_until_settled().await;

    handle.load_more();
    handle.load_more();
    handle.load_more();

    // The extra commands are applied as no-ops while the first is in flight
    let view = handle.flush().await;
    assert!(view.is_loading_more);

    let call = next_call(&mut calls).await;
    assert_eq!(call.cursor.as_str(), "9");
    assert!(calls.try_recv().is_err());

    call.respond(&[8]);
    let view = handle.wait_until_settled().await;
    assert_eq!(ids(&view), vec![10, 9, 8]);
    assert!(calls.try_recv().is_err());
}

#[tokio::test]
async fn test_refresh_discards_stale_load_more() {
    let (mut handle, mut calls) = start();

    handle.load_initial();
    next_call(&mut calls).await.respond(&[50, 48, 45]);
    handle.wait_until_settled().await;

    handle.load_more();
    let stale = next_call(&mut calls).await;

    handle.refresh();
    let refresh = next_call(&mut calls).await;
    assert!(refresh.cursor.is_start());

    let view = wait_for_view(&mut handle, |v| v.is_refreshing).await;
    assert!(view.listings.is_empty());

    refresh.respond(&[60, 55]);
    let view = handle.wait_until_settled().await;
    assert_eq!(ids(&view), vec![60, 55]);

    stale.respond(&[44, 40]);
    handle.load_more();
    let next = next_call(&mut calls).await;
    assert_eq!(next.cursor.as_str(), "55");
    assert_eq!(ids(&handle.view()), vec![60, 55]);
    next.respond(&[]);

    let view = handle.wait_until_settled().await;
    assert_eq!(ids(&view), vec![60, 55]);
    assert!(view.exhausted);
}

#[tokio::test]
async fn test_stale_response_during_refresh_is_ignored() {
    let (mut handle, mut calls) = start();

    handle.load_initial();
    let stale = next_call(&mut calls).await;

    handle.refresh();
    let refresh = next_call(&mut calls).await;

    stale.respond(&[99, 98]);
    refresh.respond(&[5, 4]);

    let view = handle.wait_until_settled().await;
    assert_eq!(ids(&view), vec![5, 4]);
    assert_eq!(view.phase, Phase::Idle);
}

#[tokio::test]
async fn test_error_then_retry() {
    let (mut handle, mut calls) = start();

    handle.load_initial();
    next_call(&mut calls).await.fail();

    let view = handle.wait_until_settled().await;
    assert_eq!(view.phase, Phase::Error);
    assert!(view.listings.is_empty());
    assert!(view.error.is_some());

    handle.retry();
    let retried = next_call(&mut calls).await;
    assert!(retried.cursor.is_start());
    retried.respond(&[3, 2, 1]);

    let view = handle.wait_until_settled().await;
    assert_eq!(view.phase, Phase::Idle);
    assert_eq!(ids(&view), vec![3, 2, 1]);
    assert!(view.error.is_none());
}

#[tokio::test]
async fn test_failed_load_more_keeps_listings() {
    let (mut handle, mut calls) = start();

    handle.load_initial();
    next_call(&mut calls).await.respond(&[7, 6]);
    handle.wait_until_settled().await;

    handle.load_more();
    next_call(&mut calls).await.fail();

    let view = handle.wait_until_settled().await;
    assert_eq!(view.phase, Phase::Error);
    assert_eq!(ids(&view), vec![7, 6]);

    handle.retry();
    let retried = next_call(&mut calls).await;
    assert_eq!(retried.cursor.as_str(), "6");
}

#[tokio::test]
async fn test_exhausted_feed_issues_no_fetch() {
    let (mut handle, mut calls) = start();

    handle.load_initial();
    next_call(&mut calls).await.respond(&[]);
    let view = handle.wait_until_settled().await;
    assert!(view.exhausted);
    assert!(view.error.is_none());

    handle.load_more();
    handle.load_more();
    let after = handle.wait_until_settled().await;
    assert_eq!(after, view);
    assert!(calls.try_recv().is_err());
}

#[tokio::test]
async fn test_shutdown_stops_controller() {
    let (calls_tx, _calls_rx) = mpsc::unbounded_channel();
    let fetcher = Arc::new(ManualFetcher { calls: calls_tx });
    let (mut handle, task) = FeedController::spawn(fetcher, FilterParams::default());

    handle.shutdown();
    tokio::time::timeout(Duration::from_secs(5), task)
        .await
        .expect("controller did not stop")
        .unwrap();

    assert!(!handle.is_running());
    assert!(!handle.changed().await);
}

#[tokio::test]
async fn test_dropping_handle_stops_controller() {
    let (calls_tx, _calls_rx) = mpsc::unbounded_channel();
    let fetcher = Arc::new(ManualFetcher { calls: calls_tx });
    let (handle, task) = FeedController::spawn(fetcher, FilterParams::default());

    drop(handle);
    tokio::time::timeout(Duration::from_secs(5), task)
        .await
        .expect("controller did not stop")
        .unwrap();
}
