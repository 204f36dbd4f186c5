//! Swap pipeline: quote -> instructions -> sign -> broadcast -> history.
//!
//! Stages run strictly sequentially for a single swap; each stage's failure
//! is converted to a [`SwapError`] at its boundary. The history append is
//! best-effort and never fails the pipeline.

pub mod amounts;
pub mod broadcast;
pub mod instructions;
pub mod quote;
pub mod signer;

use tracing::{info, warn};

use crate::errors::SwapError;
use crate::history::HistoryLedger;
use crate::types::Token;

// Re-export main types
pub use broadcast::BroadcastClient;
pub use instructions::{InstructionAssembler, SwapInstructionsResponse};
pub use quote::{Quote, QuoteClient, QuoteEvent, QuoteRequest, QuoteScheduler};
pub use signer::{LocalKeypairSigner, WalletSigner};

/// Result of a completed swap.
#[derive(Debug, Clone)]
pub struct SwapOutcome {
    /// Transaction signature returned by the network
    pub signature: String,
    /// Display summary, e.g. "Swap completed! Signature: abcd1234...wxyz5678"
    pub summary: String,
}

/// The full swap execution pipeline behind a single entry point.
pub struct SwapPipeline {
    assembler: InstructionAssembler,
    broadcast: BroadcastClient,
    history: HistoryLedger,
}

impl SwapPipeline {
    pub fn new(http: reqwest::Client, api_base: &str, history: HistoryLedger) -> Self {
        Self {
            assembler: InstructionAssembler::new(http.clone(), api_base),
            broadcast: BroadcastClient::new(http, api_base),
            history,
        }
    }

    /// Execute a confirmed swap: assemble instructions for the quote, have
    /// the wallet sign the transaction, broadcast it and record it in the
    /// history log.
    ///
    /// The quote must still correspond to the active
    /// (input token, output token, input amount) triple; a stale quote is
    /// rejected, never reused.
    pub async fn execute(
        &self,
        quote: &Quote,
        from: &Token,
        to: &Token,
        from_amount: &str,
        signer: &dyn WalletSigner,
    ) -> Result<SwapOutcome, SwapError> {
        let in_amount = amounts::to_smallest(from_amount, from.decimals)?;
        if !quote.matches(&from.address, &to.address, in_amount) {
            return Err(SwapError::StaleQuote);
        }

        let payer = signer.pubkey();
        info!(
            "Executing swap: {} {} -> {} for payer {}",
            from_amount, from.symbol, to.symbol, payer
        );

        let transaction = self.assembler.assemble(quote, &payer).await?;
        let signed = signer.sign_transaction(transaction).await?;
        let signature = self.broadcast.send(&signed).await?;

        let to_amount = amounts::format_readable(quote.out_amount, to.decimals);
        self.history
            .append(&signature, &from.symbol, &to.symbol, from_amount, &to_amount)
            .await;

        let summary = completion_summary(&signature);
        info!("{}", summary);
        Ok(SwapOutcome { signature, summary })
    }

    pub fn history(&self) -> &HistoryLedger {
        &self.history
    }
}

/// Toast-style completion message with an abbreviated signature.
fn completion_summary(signature: &str) -> String {
    if signature.len() > 16 {
        format!(
            "Swap completed! Signature: {}...{}",
            &signature[..8],
            &signature[signature.len() - 8..]
        )
    } else {
        warn!("Unexpectedly short transaction signature: {}", signature);
        format!("Swap completed! Signature: {}", signature)
    }
}
