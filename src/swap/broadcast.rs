//! Signed transaction broadcast.
//!
//! Serializes the signed transaction (binary, then base64) and submits it
//! through the `/api/swap/send-transaction` proxy endpoint. Delivery retries
//! are delegated to the RPC node; nothing is re-sent client-side.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde_json::{json, Value};
use solana_sdk::transaction::VersionedTransaction;
use tracing::info;

use crate::errors::SwapError;

/// Client for the `/api/swap/send-transaction` proxy endpoint.
pub struct BroadcastClient {
    http: reqwest::Client,
    api_base: String,
}

impl BroadcastClient {
    pub fn new(http: reqwest::Client, api_base: impl Into<String>) -> Self {
        Self {
            http,
            api_base: api_base.into(),
        }
    }

    /// Submit a signed transaction; returns the network's transaction
    /// signature.
    pub async fn send(&self, transaction: &VersionedTransaction) -> Result<String, SwapError> {
        let serialized = bincode::serialize(transaction)
            .map_err(|e| SwapError::Broadcast(format!("serialization failed: {}", e)))?;
        let encoded = BASE64.encode(serialized);

        let url = format!("{}/api/swap/send-transaction", self.api_base);
        let response = self
            .http
            .post(&url)
            .json(&json!({ "signedTransaction": encoded }))
            .send()
            .await?;

        let success = response.status().is_success();
        let body: Value = response
            .json()
            .await
            .map_err(|e| SwapError::Broadcast(e.to_string()))?;

        let signature = parse_send_response(success, &body)?;
        info!("Transaction broadcast, signature: {}", signature);
        Ok(signature)
    }
}

/// Extract the signature from a send-transaction response, or surface the
/// network's structured rejection. An error payload always wins: a signature
/// is never reported alongside one.
pub fn parse_send_response(success: bool, body: &Value) -> Result<String, SwapError> {
    if let Some(error) = body.get("error").filter(|e| !e.is_null()) {
        let reason = error
            .as_str()
            .map(String::from)
            .or_else(|| {
                error
                    .get("message")
                    .and_then(|m| m.as_str())
                    .map(String::from)
            })
            .unwrap_or_else(|| error.to_string());
        return Err(SwapError::BroadcastRejected {
            reason,
            details: body.get("details").filter(|d| !d.is_null()).cloned(),
        });
    }

    if !success {
        return Err(SwapError::Broadcast(
            "send-transaction endpoint returned a non-success status".to_string(),
        ));
    }

    body.get("signature")
        .and_then(|s| s.as_str())
        .map(String::from)
        .ok_or_else(|| SwapError::Broadcast("no signature in RPC response".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn error_payload_surfaces_rejection_without_signature() {
        let body = json!({
            "error": "Transaction simulation failed",
            "details": { "code": -32002, "message": "Transaction simulation failed" },
            "signature": "ShouldNeverBeReported"
        });
        match parse_send_response(false, &body) {
            Err(SwapError::BroadcastRejected { reason, details }) => {
                assert_eq!(reason, "Transaction simulation failed");
                assert_eq!(details.unwrap()["code"], -32002);
            }
            other => panic!("expected BroadcastRejected, got {:?}", other),
        }
    }

    #[test]
    fn structured_error_object_uses_its_message() {
        let body = json!({ "error": { "message": "blockhash not found" } });
        match parse_send_response(true, &body) {
            Err(SwapError::BroadcastRejected { reason, .. }) => {
                assert_eq!(reason, "blockhash not found");
            }
            other => panic!("expected BroadcastRejected, got {:?}", other),
        }
    }

    #[test]
    fn missing_signature_is_a_broadcast_error() {
        let body = json!({ "success": true, "message": "Transaction sent successfully" });
        assert!(matches!(
            parse_send_response(true, &body),
            Err(SwapError::Broadcast(_))
        ));
    }

    #[test]
    fn success_returns_signature() {
        let body = json!({ "success": true, "signature": "5KtP3p1e" });
        assert_eq!(parse_send_response(true, &body).unwrap(), "5KtP3p1e");
    }
}
