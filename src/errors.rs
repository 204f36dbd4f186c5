//! Error taxonomy for the swap pipeline.
//!
//! Every pipeline stage converts its failures into a [`SwapError`] at the
//! stage boundary; display strings are suitable for surfacing directly in a
//! UI. No variant is fatal to the process.

use thiserror::Error;

/// Errors produced by the swap pipeline stages.
#[derive(Debug, Error)]
pub enum SwapError {
    /// The user-entered amount is non-positive or not a number.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// The quoting service failed or returned a non-success response.
    #[error("failed to get quote: {0}")]
    QuoteUnavailable(String),

    /// The quote no longer matches the active input/output/amount triple.
    #[error("quote is stale and must be re-fetched")]
    StaleQuote,

    /// The swap-instructions response contained neither a pre-built
    /// transaction nor a swap instruction, or was otherwise malformed.
    #[error("failed to assemble swap transaction: {0}")]
    InstructionAssembly(String),

    /// The external signer declined or the user cancelled. Recoverable: the
    /// caller should return to its pre-swap state.
    #[error("signing rejected: {0}")]
    SigningRejected(String),

    /// The network rejected the transaction; carries the RPC's structured
    /// error payload when available.
    #[error("transaction rejected by network: {reason}")]
    BroadcastRejected {
        reason: String,
        details: Option<serde_json::Value>,
    },

    /// The send succeeded at the HTTP level but no signature was returned.
    #[error("broadcast failed: {0}")]
    Broadcast(String),

    /// Transport-level HTTP failure.
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
}
