//! Quote fetching and debounced scheduling.
//!
//! [`QuoteClient`] issues a single quote request through the proxy API.
//! [`QuoteScheduler`] wraps a client in the UI policy: input changes are
//! debounced for a quiet period, and only the most recent request's result is
//! ever delivered (stale completions are discarded by generation number).

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{self, Instant};
use tracing::{debug, info, warn};

use crate::errors::SwapError;
use crate::swap::amounts;
use crate::types::Token;

/// Quiet period after the last input change before a quote is requested.
pub const QUOTE_DEBOUNCE: Duration = Duration::from_millis(500);

/// Tunables forwarded to the quoting service.
#[derive(Debug, Clone)]
pub struct QuoteOptions {
    pub slippage_bps: u16,
    pub max_accounts: u16,
    pub only_direct_routes: bool,
}

impl Default for QuoteOptions {
    fn default() -> Self {
        Self {
            slippage_bps: 50,
            max_accounts: 40,
            only_direct_routes: true,
        }
    }
}

/// A priced exchange-rate offer between two tokens, valid momentarily.
///
/// The full upstream response is retained because the swap-instructions
/// request requires it verbatim. A new quote invalidates any prior one.
#[derive(Debug, Clone)]
pub struct Quote {
    /// Input token mint address
    pub input_mint: String,
    /// Output token mint address
    pub output_mint: String,
    /// Input amount in smallest units
    pub in_amount: u64,
    /// Output amount in smallest units
    pub out_amount: u64,
    /// Complete quote JSON as returned by the aggregation service
    pub response: Value,
}

impl Quote {
    /// Whether this quote still corresponds to the given
    /// (input mint, output mint, input amount) triple.
    pub fn matches(&self, input_mint: &str, output_mint: &str, in_amount: u64) -> bool {
        self.input_mint == input_mint
            && self.output_mint == output_mint
            && self.in_amount == in_amount
    }
}

/// Client for the `/api/getquote` proxy endpoint.
pub struct QuoteClient {
    http: reqwest::Client,
    api_base: String,
    options: QuoteOptions,
}

impl QuoteClient {
    pub fn new(http: reqwest::Client, api_base: impl Into<String>) -> Self {
        Self {
            http,
            api_base: api_base.into(),
            options: QuoteOptions::default(),
        }
    }

    pub fn with_options(mut self, options: QuoteOptions) -> Self {
        self.options = options;
        self
    }

    /// Request a quote for swapping `human_amount` of `input` into `output`.
    ///
    /// Returns the quote together with the output amount rendered for
    /// display (fixed 6 decimal places).
    pub async fn get_quote(
        &self,
        input: &Token,
        output: &Token,
        human_amount: &str,
    ) -> Result<(Quote, String), SwapError> {
        let amount = amounts::to_smallest(human_amount, input.decimals)?;

        let url = format!("{}/api/getquote", self.api_base);
        let response = self
            .http
            .get(&url)
            .query(&[
                ("inputMint", input.address.clone()),
                ("outputMint", output.address.clone()),
                ("amount", amount.to_string()),
                ("slippageBps", self.options.slippage_bps.to_string()),
                ("maxAccounts", self.options.max_accounts.to_string()),
                ("onlyDirectRoutes", self.options.only_direct_routes.to_string()),
            ])
            .send()
            .await
            .map_err(|e| SwapError::QuoteUnavailable(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let message = response
                .json::<Value>()
                .await
                .ok()
                .and_then(|body| body.get("error").and_then(|e| e.as_str()).map(String::from))
                .unwrap_or_else(|| format!("quote service returned {}", status));
            return Err(SwapError::QuoteUnavailable(message));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| SwapError::QuoteUnavailable(e.to_string()))?;

        let out_amount = parse_amount_field(&body, "outAmount")
            .ok_or_else(|| SwapError::QuoteUnavailable("quote has no outAmount".to_string()))?;

        let display_out = amounts::format_readable(out_amount, output.decimals);
        info!(
            "Quote: {} {} -> {} {}",
            human_amount, input.symbol, display_out, output.symbol
        );

        Ok((
            Quote {
                input_mint: input.address.clone(),
                output_mint: output.address.clone(),
                in_amount: amount,
                out_amount,
                response: body,
            },
            display_out,
        ))
    }
}

/// Jupiter encodes amounts as decimal strings; tolerate plain numbers too.
fn parse_amount_field(body: &Value, field: &str) -> Option<u64> {
    match body.get(field)? {
        Value::String(s) => s.parse().ok(),
        Value::Number(n) => n.as_u64(),
        _ => None,
    }
}

/// A pending quote request: the full input triple at the time of the change.
#[derive(Debug, Clone)]
pub struct QuoteRequest {
    pub input: Token,
    pub output: Token,
    pub amount: String,
}

/// Result of a scheduled quote, tagged with its request generation.
#[derive(Debug)]
pub enum QuoteEvent {
    Quoted {
        generation: u64,
        quote: Quote,
        display_out: String,
    },
    Failed {
        generation: u64,
        message: String,
    },
}

/// Abstraction over quote fetching so the scheduler can be exercised without
/// a network.
#[async_trait]
pub trait QuoteFetcher: Send + Sync {
    async fn fetch(&self, request: &QuoteRequest) -> Result<(Quote, String), SwapError>;
}

#[async_trait]
impl QuoteFetcher for QuoteClient {
    async fn fetch(&self, request: &QuoteRequest) -> Result<(Quote, String), SwapError> {
        self.get_quote(&request.input, &request.output, &request.amount)
            .await
    }
}

/// Debounced, generation-tracked quote scheduler.
///
/// Every input change received on the request channel bumps the generation
/// and re-arms the quiet-period timer; only the latest inputs are ever
/// quoted. A completion whose generation no longer matches is discarded, so
/// late responses for superseded inputs never reach the consumer.
pub struct QuoteScheduler {
    fetcher: Arc<dyn QuoteFetcher>,
    debounce: Duration,
    requests: mpsc::Receiver<QuoteRequest>,
    events: mpsc::Sender<QuoteEvent>,
}

impl QuoteScheduler {
    pub fn new(
        fetcher: Arc<dyn QuoteFetcher>,
        requests: mpsc::Receiver<QuoteRequest>,
        events: mpsc::Sender<QuoteEvent>,
    ) -> Self {
        Self {
            fetcher,
            debounce: QUOTE_DEBOUNCE,
            requests,
            events,
        }
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Main scheduling loop. Runs until the request channel closes or the
    /// event consumer goes away.
    pub async fn run(mut self) {
        let (done_tx, mut done_rx) =
            mpsc::channel::<(u64, Result<(Quote, String), SwapError>)>(8);
        let mut generation: u64 = 0;
        let mut pending: Option<QuoteRequest> = None;
        let mut deadline = Instant::now();

        loop {
            tokio::select! {
                maybe_request = self.requests.recv() => match maybe_request {
                    Some(request) => {
                        generation += 1;
                        pending = Some(request);
                        deadline = Instant::now() + self.debounce;
                    }
                    None => {
                        debug!("QuoteScheduler request channel closed. Shutting down.");
                        break;
                    }
                },
                _ = time::sleep_until(deadline), if pending.is_some() => {
                    // Quiet period elapsed; quote the latest inputs.
                    let request = match pending.take() {
                        Some(request) => request,
                        None => continue,
                    };
                    let fetch_generation = generation;
                    let fetcher = Arc::clone(&self.fetcher);
                    let done = done_tx.clone();
                    tokio::spawn(async move {
                        let result = fetcher.fetch(&request).await;
                        let _ = done.send((fetch_generation, result)).await;
                    });
                },
                Some((fetch_generation, result)) = done_rx.recv() => {
                    if fetch_generation != generation {
                        debug!(
                            "Discarding stale quote (generation {} superseded by {})",
                            fetch_generation, generation
                        );
                        continue;
                    }
                    let event = match result {
                        Ok((quote, display_out)) => QuoteEvent::Quoted {
                            generation: fetch_generation,
                            quote,
                            display_out,
                        },
                        Err(e) => {
                            warn!("Quote fetch failed: {}", e);
                            QuoteEvent::Failed {
                                generation: fetch_generation,
                                message: e.to_string(),
                            }
                        }
                    };
                    if self.events.send(event).await.is_err() {
                        debug!("QuoteScheduler event channel closed. Shutting down.");
                        break;
                    }
                }
            }
        }
    }
}
