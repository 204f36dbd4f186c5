//! Upstream calls to the Jupiter aggregation API and Solana JSON-RPC.

use anyhow::{anyhow, Context, Result};
use rand::Rng;
use serde_json::{json, Value};

/// Parameters forwarded to the Jupiter quote endpoint.
#[derive(Debug)]
pub struct QuoteQuery<'a> {
    pub input_mint: &'a str,
    pub output_mint: &'a str,
    pub amount: &'a str,
    pub slippage_bps: &'a str,
    pub max_accounts: &'a str,
    pub only_direct_routes: &'a str,
}

/// GET a quote from the aggregation service; the JSON body is passed through
/// untouched.
pub async fn jupiter_quote(
    http: &reqwest::Client,
    api_base: &str,
    query: &QuoteQuery<'_>,
) -> Result<Value> {
    let url = format!("{}/swap/v1/quote", api_base);
    let response = http
        .get(&url)
        .query(&[
            ("inputMint", query.input_mint),
            ("outputMint", query.output_mint),
            ("amount", query.amount),
            ("slippageBps", query.slippage_bps),
            ("maxAccounts", query.max_accounts),
            ("onlyDirectRoutes", query.only_direct_routes),
        ])
        .send()
        .await
        .context("Jupiter quote request failed")?;

    if !response.status().is_success() {
        return Err(anyhow!("Jupiter API error: {}", response.status()));
    }
    response
        .json()
        .await
        .context("Jupiter quote response was not JSON")
}

/// POST a swap-instructions request to the aggregation service; the JSON
/// body is passed through untouched.
pub async fn jupiter_swap_instructions(
    http: &reqwest::Client,
    api_base: &str,
    quote_response: &Value,
    user_public_key: &str,
) -> Result<Value> {
    let url = format!("{}/swap/v1/swap-instructions", api_base);
    let response = http
        .post(&url)
        .json(&json!({
            "quoteResponse": quote_response,
            "userPublicKey": user_public_key,
        }))
        .send()
        .await
        .context("Jupiter swap-instructions request failed")?;

    if !response.status().is_success() {
        let status = response.status();
        let message = response
            .json::<Value>()
            .await
            .ok()
            .and_then(|body| body.get("error").and_then(|e| e.as_str()).map(String::from))
            .unwrap_or_else(|| format!("Jupiter API error: {}", status));
        return Err(anyhow!(message));
    }
    response
        .json()
        .await
        .context("Jupiter swap-instructions response was not JSON")
}

/// Fetch the latest blockhash envelope (`result` field of the JSON-RPC
/// response) at the given commitment.
pub async fn latest_blockhash(
    http: &reqwest::Client,
    rpc_url: &str,
    commitment: &str,
) -> Result<Value> {
    let request = json!({
        "jsonrpc": "2.0",
        "id": rand::thread_rng().gen::<u32>(),
        "method": "getLatestBlockhash",
        "params": [{ "commitment": commitment }],
    });

    let body: Value = http
        .post(rpc_url)
        .json(&request)
        .send()
        .await
        .context("blockhash RPC request failed")?
        .json()
        .await
        .context("blockhash RPC response was not JSON")?;

    if let Some(error) = body.get("error").filter(|e| !e.is_null()) {
        let message = error
            .get("message")
            .and_then(|m| m.as_str())
            .unwrap_or("RPC request failed");
        return Err(anyhow!(message.to_string()));
    }

    body.get("result")
        .cloned()
        .ok_or_else(|| anyhow!("no result in RPC response"))
}

/// Rejection reported by the RPC node for a sent transaction.
#[derive(Debug)]
pub struct SendRejection {
    pub message: String,
    pub details: Value,
}

/// Outcome of a sendTransaction RPC call.
#[derive(Debug)]
pub enum SendResult {
    /// The node accepted the transaction and returned its signature.
    Accepted(String),
    /// The node returned a structured error object.
    Rejected(SendRejection),
}

/// Submit a base64-encoded signed transaction with the fixed send policy:
/// skip preflight, "confirmed" preflight commitment, up to 3 node-side
/// delivery retries.
pub async fn send_transaction(
    http: &reqwest::Client,
    rpc_url: &str,
    signed_transaction: &str,
) -> Result<SendResult> {
    let request = json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": "sendTransaction",
        "params": [
            signed_transaction,
            {
                "encoding": "base64",
                "skipPreflight": true,
                "preflightCommitment": "confirmed",
                "maxRetries": 3,
            },
        ],
    });

    let body: Value = http
        .post(rpc_url)
        .json(&request)
        .send()
        .await
        .context("sendTransaction RPC request failed")?
        .json()
        .await
        .context("sendTransaction RPC response was not JSON")?;

    if let Some(error) = body.get("error").filter(|e| !e.is_null()) {
        let message = error
            .get("message")
            .and_then(|m| m.as_str())
            .map(String::from)
            .or_else(|| {
                error
                    .pointer("/data/err")
                    .map(|err| err.to_string())
            })
            .unwrap_or_else(|| "RPC request failed".to_string());
        return Ok(SendResult::Rejected(SendRejection {
            message,
            details: error.clone(),
        }));
    }

    match body.get("result").and_then(|r| r.as_str()) {
        Some(signature) => Ok(SendResult::Accepted(signature.to_string())),
        None => Err(anyhow!("No signature in RPC response")),
    }
}
