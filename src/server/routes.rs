//! Proxy endpoint handlers.
//!
//! Each handler validates its inputs, forwards to the upstream service, and
//! converts failures into the JSON error shapes the front end expects.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::error;

use crate::server::upstream::{self, QuoteQuery, SendResult};
use crate::server::AppState;

/// Query parameters for `/api/getquote`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetQuoteParams {
    pub input_mint: Option<String>,
    pub output_mint: Option<String>,
    pub amount: Option<String>,
    pub slippage_bps: Option<String>,
    pub max_accounts: Option<String>,
    pub only_direct_routes: Option<String>,
}

/// GET `/api/getquote` — proxy to the aggregation service's quote endpoint.
pub async fn get_quote(
    State(state): State<AppState>,
    Query(params): Query<GetQuoteParams>,
) -> impl IntoResponse {
    let (input_mint, output_mint, amount) =
        match (&params.input_mint, &params.output_mint, &params.amount) {
            (Some(input), Some(output), Some(amount)) => (input, output, amount),
            _ => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({
                        "error": "Missing required parameters: inputMint, outputMint, amount"
                    })),
                );
            }
        };

    let query = QuoteQuery {
        input_mint,
        output_mint,
        amount,
        slippage_bps: params.slippage_bps.as_deref().unwrap_or("50"),
        max_accounts: params.max_accounts.as_deref().unwrap_or("40"),
        only_direct_routes: params.only_direct_routes.as_deref().unwrap_or("true"),
    };

    match upstream::jupiter_quote(&state.http, &state.config.jupiter_api_base, &query).await {
        Ok(body) => (StatusCode::OK, Json(body)),
        Err(e) => {
            error!("Error getting quote: {:#}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": e.to_string() })))
        }
    }
}

/// POST `/api/rpc/blockhash` — fetch the latest blockhash from the RPC node.
pub async fn blockhash(
    State(state): State<AppState>,
    body: Option<Json<Value>>,
) -> impl IntoResponse {
    let commitment = body
        .as_ref()
        .and_then(|Json(b)| b.get("commitment").and_then(|c| c.as_str()).map(String::from))
        .unwrap_or_else(|| "confirmed".to_string());

    match upstream::latest_blockhash(&state.http, &state.config.rpc_url, &commitment).await {
        Ok(result) => (
            StatusCode::OK,
            Json(json!({ "success": true, "result": result })),
        ),
        Err(e) => {
            error!("Error getting blockhash: {:#}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": e.to_string() })))
        }
    }
}

/// POST `/api/swap/instructions` — proxy to the aggregation service's
/// swap-instructions endpoint.
pub async fn swap_instructions(
    State(state): State<AppState>,
    body: Option<Json<Value>>,
) -> impl IntoResponse {
    let body = body.map(|Json(b)| b).unwrap_or(Value::Null);
    let quote_response = body.get("quoteResponse").filter(|v| !v.is_null());
    let user_public_key = body.get("userPublicKey").and_then(|v| v.as_str());

    let (quote_response, user_public_key) = match (quote_response, user_public_key) {
        (Some(quote), Some(user)) => (quote, user),
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "Missing required fields: quoteResponse and userPublicKey"
                })),
            );
        }
    };

    match upstream::jupiter_swap_instructions(
        &state.http,
        &state.config.jupiter_api_base,
        quote_response,
        user_public_key,
    )
    .await
    {
        Ok(body) => (StatusCode::OK, Json(body)),
        Err(e) => {
            error!("Error getting swap instructions: {:#}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": e.to_string() })))
        }
    }
}

/// POST `/api/swap/send-transaction` — submit a signed transaction to the
/// RPC node configured for sends.
pub async fn send_transaction(
    State(state): State<AppState>,
    body: Option<Json<Value>>,
) -> impl IntoResponse {
    let signed_transaction = body
        .as_ref()
        .and_then(|Json(b)| b.get("signedTransaction").and_then(|v| v.as_str()));

    let signed_transaction = match signed_transaction {
        Some(tx) => tx,
        None => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Missing required field: signedTransaction" })),
            );
        }
    };

    match upstream::send_transaction(&state.http, state.config.send_rpc_url(), signed_transaction)
        .await
    {
        Ok(SendResult::Accepted(signature)) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "signature": signature,
                "message": "Transaction sent successfully"
            })),
        ),
        Ok(SendResult::Rejected(rejection)) => {
            error!("Solana RPC error: {}", rejection.details);
            (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": rejection.message,
                    "details": rejection.details
                })),
            )
        }
        Err(e) => {
            error!("Error sending transaction: {:#}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": e.to_string() })))
        }
    }
}
