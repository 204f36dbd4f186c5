//! Tests for the debounced quote scheduler: request collapsing and stale
//! completion discard.

use async_trait::async_trait;
use nova_swap::swap::quote::{QuoteEvent, QuoteFetcher, QuoteRequest, QuoteScheduler};
use nova_swap::swap::Quote;
use nova_swap::{SwapError, Token};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

struct CountingFetcher {
    calls: AtomicUsize,
    delay: Duration,
}

impl CountingFetcher {
    fn new(delay: Duration) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            delay,
        }
    }
}

#[async_trait]
impl QuoteFetcher for CountingFetcher {
    async fn fetch(&self, request: &QuoteRequest) -> Result<(Quote, String), SwapError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let quote = Quote {
            input_mint: request.input.address.clone(),
            output_mint: request.output.address.clone(),
            in_amount: request.amount.parse::<f64>().unwrap_or(0.0) as u64,
            out_amount: 6_000_000,
            response: json!({ "outAmount": "6000000" }),
        };
        Ok((quote, "6.000000".to_string()))
    }
}

fn request(amount: &str) -> QuoteRequest {
    QuoteRequest {
        input: Token::wrapped_sol(),
        output: Token::usdc(),
        amount: amount.to_string(),
    }
}

#[tokio::test(start_paused = true)]
async fn rapid_input_changes_collapse_to_one_request() {
    let fetcher = Arc::new(CountingFetcher::new(Duration::ZERO));
    let (request_tx, request_rx) = mpsc::channel(8);
    let (event_tx, mut event_rx) = mpsc::channel(8);

    let scheduler = QuoteScheduler::new(fetcher.clone(), request_rx, event_tx);
    let handle = tokio::spawn(scheduler.run());

    // Two changes inside the 500ms quiet period: only the second is quoted.
    request_tx.send(request("1")).await.expect("send");
    request_tx.send(request("2")).await.expect("send");

    let event = event_rx.recv().await.expect("event");
    match event {
        QuoteEvent::Quoted { quote, .. } => assert_eq!(quote.in_amount, 2),
        other => panic!("expected Quoted, got {:?}", other),
    }
    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);

    drop(request_tx);
    handle.await.expect("scheduler task");
}

#[tokio::test(start_paused = true)]
async fn stale_completion_is_discarded_when_inputs_change() {
    // Fetch takes longer than the debounce window, so the first fetch is
    // still in flight when the second request arrives.
    let fetcher = Arc::new(CountingFetcher::new(Duration::from_secs(2)));
    let (request_tx, request_rx) = mpsc::channel(8);
    let (event_tx, mut event_rx) = mpsc::channel(8);

    let scheduler = QuoteScheduler::new(fetcher.clone(), request_rx, event_tx);
    let handle = tokio::spawn(scheduler.run());

    request_tx.send(request("1")).await.expect("send");
    // Let the first debounce elapse and the fetch start.
    tokio::time::sleep(Duration::from_millis(600)).await;
    request_tx.send(request("2")).await.expect("send");

    // The only delivered event is for the latest inputs.
    let event = event_rx.recv().await.expect("event");
    match event {
        QuoteEvent::Quoted { quote, .. } => assert_eq!(quote.in_amount, 2),
        other => panic!("expected Quoted, got {:?}", other),
    }
    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 2);
    assert!(event_rx.try_recv().is_err(), "stale result must not be delivered");

    drop(request_tx);
    handle.await.expect("scheduler task");
}

#[tokio::test(start_paused = true)]
async fn fetch_failure_surfaces_as_failed_event() {
    struct FailingFetcher;

    #[async_trait]
    impl QuoteFetcher for FailingFetcher {
        async fn fetch(&self, _request: &QuoteRequest) -> Result<(Quote, String), SwapError> {
            Err(SwapError::QuoteUnavailable("service down".to_string()))
        }
    }

    let (request_tx, request_rx) = mpsc::channel(8);
    let (event_tx, mut event_rx) = mpsc::channel(8);
    let scheduler = QuoteScheduler::new(Arc::new(FailingFetcher), request_rx, event_tx);
    let handle = tokio::spawn(scheduler.run());

    request_tx.send(request("1")).await.expect("send");

    match event_rx.recv().await.expect("event") {
        QuoteEvent::Failed { message, .. } => assert!(message.contains("service down")),
        other => panic!("expected Failed, got {:?}", other),
    }

    drop(request_tx);
    handle.await.expect("scheduler task");
}
