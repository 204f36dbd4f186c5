//! Core types shared across the swap pipeline.

use serde::{Deserialize, Serialize};

/// A tradeable token as selected in the UI.
///
/// Immutable once constructed; the on-chain mint address is the unique
/// identifier, everything else is display metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Ticker symbol, e.g. "SOL"
    pub symbol: String,
    /// Display name, e.g. "Wrapped SOL"
    pub name: String,
    /// On-chain mint address
    pub address: String,
    /// Optional logo URI
    pub logo: Option<String>,
    /// Decimal precision of the smallest unit
    pub decimals: u8,
}

impl Token {
    /// Wrapped SOL on mainnet.
    pub fn wrapped_sol() -> Self {
        Self {
            symbol: "SOL".to_string(),
            name: "Wrapped SOL".to_string(),
            address: "So11111111111111111111111111111111111111112".to_string(),
            logo: Some(
                "https://raw.githubusercontent.com/solana-labs/token-list/main/assets/mainnet/So11111111111111111111111111111111111111112/logo.png"
                    .to_string(),
            ),
            decimals: 9,
        }
    }

    /// USDC on mainnet.
    pub fn usdc() -> Self {
        Self {
            symbol: "USDC".to_string(),
            name: "USD Coin".to_string(),
            address: "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v".to_string(),
            logo: Some(
                "https://raw.githubusercontent.com/solana-labs/token-list/main/assets/mainnet/EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v/logo.png"
                    .to_string(),
            ),
            decimals: 6,
        }
    }
}
