//! Swap transaction assembly.
//!
//! Turns a quote into an unsigned [`VersionedTransaction`]. The aggregation
//! service answers the swap-instructions request in one of two shapes:
//!
//! 1. a pre-built, ready-to-sign transaction blob, used verbatim;
//! 2. a decomposed set of instruction categories, which are linearized in a
//!    fixed order (compute-budget, setup, swap, other, token-ledger, cleanup)
//!    and compiled into a v0 message against a freshly fetched blockhash.
//!
//! A response carrying neither a pre-built transaction nor a swap instruction
//! is not swappable.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::Deserialize;
use serde_json::{json, Value};
use solana_sdk::hash::Hash;
use solana_sdk::instruction::{AccountMeta, Instruction};
use solana_sdk::message::{v0, VersionedMessage};
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use solana_sdk::transaction::VersionedTransaction;
use std::str::FromStr;
use tracing::{debug, info};

use crate::errors::SwapError;
use crate::swap::Quote;

/// One instruction as returned by the aggregation service.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstructionSpec {
    pub program_id: String,
    /// Account references; the service sends either bare pubkey strings or
    /// full records, under either `accounts` or `keys`.
    #[serde(default, alias = "keys")]
    pub accounts: Vec<AccountRef>,
    /// Base64-encoded instruction payload
    pub data: String,
}

/// Account reference in either of the service's two wire shapes.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AccountRef {
    Plain(String),
    Full {
        pubkey: String,
        #[serde(default, rename = "isSigner")]
        is_signer: bool,
        #[serde(default, rename = "isWritable")]
        is_writable: bool,
    },
}

impl AccountRef {
    /// Normalize to the canonical record shape; absent flags default to
    /// false.
    pub fn normalize(&self) -> Result<AccountMeta, SwapError> {
        let (pubkey, is_signer, is_writable) = match self {
            AccountRef::Plain(pubkey) => (pubkey.as_str(), false, false),
            AccountRef::Full {
                pubkey,
                is_signer,
                is_writable,
            } => (pubkey.as_str(), *is_signer, *is_writable),
        };
        let pubkey = Pubkey::from_str(pubkey)
            .map_err(|e| SwapError::InstructionAssembly(format!("bad account pubkey: {}", e)))?;
        Ok(AccountMeta {
            pubkey,
            is_signer,
            is_writable,
        })
    }
}

/// The swap-instructions response, decomposed form and/or pre-built blob.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapInstructionsResponse {
    /// Base64 pre-built transaction; when present it is used as-is.
    pub swap_transaction: Option<String>,
    #[serde(default)]
    pub compute_budget_instructions: Vec<InstructionSpec>,
    #[serde(default)]
    pub setup_instructions: Vec<InstructionSpec>,
    pub swap_instruction: Option<InstructionSpec>,
    #[serde(default)]
    pub other_instructions: Vec<InstructionSpec>,
    pub token_ledger_instruction: Option<InstructionSpec>,
    pub cleanup_instruction: Option<InstructionSpec>,
}

impl SwapInstructionsResponse {
    /// Whether the decomposed form carries anything to build from.
    pub fn has_instructions(&self) -> bool {
        self.swap_instruction.is_some() || !self.setup_instructions.is_empty()
    }
}

fn decode_instruction(spec: &InstructionSpec) -> Result<Instruction, SwapError> {
    let program_id = Pubkey::from_str(&spec.program_id)
        .map_err(|e| SwapError::InstructionAssembly(format!("bad program id: {}", e)))?;
    let accounts = spec
        .accounts
        .iter()
        .map(AccountRef::normalize)
        .collect::<Result<Vec<_>, _>>()?;
    let data = BASE64
        .decode(&spec.data)
        .map_err(|e| SwapError::InstructionAssembly(format!("bad instruction data: {}", e)))?;
    Ok(Instruction {
        program_id,
        accounts,
        data,
    })
}

/// Linearize a decomposed response into one ordered instruction list.
///
/// Category order is fixed: compute-budget, setup, swap, other, token-ledger,
/// cleanup. Absent categories are skipped; within a category the service's
/// order is preserved. Violating this order produces a transaction the
/// network rejects.
pub fn linearize(response: &SwapInstructionsResponse) -> Result<Vec<Instruction>, SwapError> {
    let mut instructions = Vec::new();
    for spec in &response.compute_budget_instructions {
        instructions.push(decode_instruction(spec)?);
    }
    for spec in &response.setup_instructions {
        instructions.push(decode_instruction(spec)?);
    }
    if let Some(spec) = &response.swap_instruction {
        instructions.push(decode_instruction(spec)?);
    }
    for spec in &response.other_instructions {
        instructions.push(decode_instruction(spec)?);
    }
    if let Some(spec) = &response.token_ledger_instruction {
        instructions.push(decode_instruction(spec)?);
    }
    if let Some(spec) = &response.cleanup_instruction {
        instructions.push(decode_instruction(spec)?);
    }
    Ok(instructions)
}

/// Decode a pre-built base64 transaction blob.
pub fn decode_prebuilt(blob: &str) -> Result<VersionedTransaction, SwapError> {
    let bytes = BASE64
        .decode(blob)
        .map_err(|e| SwapError::InstructionAssembly(format!("bad transaction blob: {}", e)))?;
    bincode::deserialize(&bytes)
        .map_err(|e| SwapError::InstructionAssembly(format!("bad transaction encoding: {}", e)))
}

/// Compile an ordered instruction list into an unsigned v0 transaction bound
/// to the payer and blockhash.
///
/// Address lookup tables are deliberately not loaded; the instruction set the
/// service returns for direct routes fits without them.
pub fn compile(
    payer: &Pubkey,
    recent_blockhash: Hash,
    instructions: &[Instruction],
) -> Result<VersionedTransaction, SwapError> {
    let message = v0::Message::try_compile(payer, instructions, &[], recent_blockhash)
        .map_err(|e| SwapError::InstructionAssembly(format!("message compile failed: {}", e)))?;
    let num_signatures = message.header.num_required_signatures as usize;
    Ok(VersionedTransaction {
        signatures: vec![Signature::default(); num_signatures],
        message: VersionedMessage::V0(message),
    })
}

/// Client for the `/api/swap/instructions` and `/api/rpc/blockhash` proxy
/// endpoints.
pub struct InstructionAssembler {
    http: reqwest::Client,
    api_base: String,
}

impl InstructionAssembler {
    pub fn new(http: reqwest::Client, api_base: impl Into<String>) -> Self {
        Self {
            http,
            api_base: api_base.into(),
        }
    }

    /// Build the ready-to-sign transaction for a quote and payer.
    pub async fn assemble(
        &self,
        quote: &Quote,
        payer: &Pubkey,
    ) -> Result<VersionedTransaction, SwapError> {
        let response = self.fetch_swap_instructions(quote, payer).await?;

        if let Some(blob) = &response.swap_transaction {
            // Ready transaction from the service: no reordering, no
            // blockhash substitution.
            info!("Using pre-built swap transaction from aggregation service");
            return decode_prebuilt(blob);
        }

        if !response.has_instructions() {
            return Err(SwapError::InstructionAssembly(
                "no swapTransaction or instructions found in response".to_string(),
            ));
        }

        // Fresh blockhash for every assembly; never reused across retries.
        let blockhash = self.fetch_blockhash().await?;
        let instructions = linearize(&response)?;
        debug!(
            "Assembled {} instructions against blockhash {}",
            instructions.len(),
            blockhash
        );
        compile(payer, blockhash, &instructions)
    }

    async fn fetch_swap_instructions(
        &self,
        quote: &Quote,
        payer: &Pubkey,
    ) -> Result<SwapInstructionsResponse, SwapError> {
        let url = format!("{}/api/swap/instructions", self.api_base);
        let response = self
            .http
            .post(&url)
            .json(&json!({
                "quoteResponse": quote.response,
                "userPublicKey": payer.to_string(),
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let message = response
                .json::<Value>()
                .await
                .ok()
                .and_then(|body| body.get("error").and_then(|e| e.as_str()).map(String::from))
                .unwrap_or_else(|| format!("swap instructions request returned {}", status));
            return Err(SwapError::InstructionAssembly(message));
        }

        response
            .json::<SwapInstructionsResponse>()
            .await
            .map_err(|e| SwapError::InstructionAssembly(e.to_string()))
    }

    async fn fetch_blockhash(&self) -> Result<Hash, SwapError> {
        let url = format!("{}/api/rpc/blockhash", self.api_base);
        let response = self
            .http
            .post(&url)
            .json(&json!({ "commitment": "confirmed" }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let message = response
                .json::<Value>()
                .await
                .ok()
                .and_then(|body| body.get("error").and_then(|e| e.as_str()).map(String::from))
                .unwrap_or_else(|| format!("blockhash request returned {}", status));
            return Err(SwapError::InstructionAssembly(message));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| SwapError::InstructionAssembly(e.to_string()))?;
        let blockhash = body
            .pointer("/result/value/blockhash")
            .and_then(|v| v.as_str())
            .ok_or_else(|| {
                SwapError::InstructionAssembly("no blockhash in response".to_string())
            })?;
        Hash::from_str(blockhash)
            .map_err(|e| SwapError::InstructionAssembly(format!("bad blockhash: {}", e)))
    }
}
