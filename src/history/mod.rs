//! Bounded local log of completed swaps.
//!
//! History is best-effort bookkeeping for display: storage failures are
//! logged and swallowed so they never block the swap pipeline.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

use crate::storage::KvStore;

/// Fixed storage key for the history log.
pub const HISTORY_KEY: &str = "swapHistory";

/// Maximum number of retained entries; oldest are evicted first.
pub const HISTORY_CAP: usize = 100;

/// One completed swap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Transaction signature returned by the network
    pub signature: String,
    /// Input token symbol
    pub from_token: String,
    /// Output token symbol
    pub to_token: String,
    /// Human-readable input amount
    pub from_amount: String,
    /// Human-readable output amount
    pub to_amount: String,
    /// Unix timestamp in milliseconds
    pub timestamp: i64,
}

/// Append-only, capped swap log over a key-value store.
pub struct HistoryLedger {
    store: Arc<dyn KvStore>,
}

impl HistoryLedger {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    /// Record a completed swap, stamped with the current time.
    pub async fn append(
        &self,
        signature: &str,
        from_token: &str,
        to_token: &str,
        from_amount: &str,
        to_amount: &str,
    ) {
        self.append_entry(HistoryEntry {
            signature: signature.to_string(),
            from_token: from_token.to_string(),
            to_token: to_token.to_string(),
            from_amount: from_amount.to_string(),
            to_amount: to_amount.to_string(),
            timestamp: Utc::now().timestamp_millis(),
        })
        .await;
    }

    /// Append a fully-formed entry. Read-modify-writes the whole log and
    /// truncates to the most recent [`HISTORY_CAP`] entries, dropping the
    /// oldest first.
    pub async fn append_entry(&self, entry: HistoryEntry) {
        let mut entries = self.load().await;
        entries.push(entry);
        if entries.len() > HISTORY_CAP {
            let excess = entries.len() - HISTORY_CAP;
            entries.drain(..excess);
        }
        match serde_json::to_string(&entries) {
            Ok(json) => {
                if let Err(e) = self.store.set(HISTORY_KEY, &json).await {
                    warn!("Failed to persist swap history: {}", e);
                }
            }
            Err(e) => warn!("Failed to serialize swap history: {}", e),
        }
    }

    /// All entries, most recent first.
    pub async fn list(&self) -> Vec<HistoryEntry> {
        let mut entries = self.load().await;
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        entries
    }

    /// Empty the log.
    pub async fn clear(&self) {
        if let Err(e) = self.store.remove(HISTORY_KEY).await {
            warn!("Failed to clear swap history: {}", e);
        }
    }

    async fn load(&self) -> Vec<HistoryEntry> {
        match self.store.get(HISTORY_KEY).await {
            Ok(Some(json)) => serde_json::from_str(&json).unwrap_or_else(|e| {
                warn!("Discarding unreadable swap history: {}", e);
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("Failed to load swap history: {}", e);
                Vec::new()
            }
        }
    }
}
