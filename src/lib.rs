//! NOVA Swap - Solana DEX swap pipeline
//!
//! This crate implements the quote -> instructions -> sign -> broadcast -> history
//! pipeline against a Jupiter-style aggregation API, plus the thin HTTP proxy
//! endpoints that front the upstream aggregator and the Solana RPC node.

pub mod config;
pub mod errors;
pub mod history;
pub mod server;
pub mod storage;
pub mod swap;
pub mod types;

// Re-export main types for convenience
pub use errors::SwapError;
pub use swap::{Quote, SwapOutcome, SwapPipeline};
pub use types::Token;
