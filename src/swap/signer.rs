//! Signing capability seam.
//!
//! The pipeline never holds private key material: it only receives a
//! [`WalletSigner`] capability from the wallet integration and delegates the
//! assembled transaction to it. There is no client-enforced timeout on
//! signing; the signer is free to wait indefinitely for user action.

use async_trait::async_trait;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Keypair;
use solana_sdk::signer::Signer as _;
use solana_sdk::transaction::VersionedTransaction;

use crate::errors::SwapError;

/// An external, opaque interface able to produce a valid signature over a
/// transaction without exposing key material.
#[async_trait]
pub trait WalletSigner: Send + Sync {
    /// The payer identity this signer signs for.
    fn pubkey(&self) -> Pubkey;

    /// Sign the transaction, returning it with the payer signature filled
    /// in. Declining or cancelling surfaces as
    /// [`SwapError::SigningRejected`].
    async fn sign_transaction(
        &self,
        transaction: VersionedTransaction,
    ) -> Result<VersionedTransaction, SwapError>;
}

/// In-process signer over a local keypair.
///
/// Exists for tests and demos; a production embedder injects its own wallet
/// capability instead.
pub struct LocalKeypairSigner {
    keypair: Keypair,
}

impl LocalKeypairSigner {
    pub fn new(keypair: Keypair) -> Self {
        Self { keypair }
    }
}

#[async_trait]
impl WalletSigner for LocalKeypairSigner {
    fn pubkey(&self) -> Pubkey {
        self.keypair.pubkey()
    }

    async fn sign_transaction(
        &self,
        mut transaction: VersionedTransaction,
    ) -> Result<VersionedTransaction, SwapError> {
        let message_bytes = transaction.message.serialize();
        let signature = self.keypair.sign_message(&message_bytes);
        if transaction.signatures.is_empty() {
            transaction.signatures.push(signature);
        } else {
            // Payer signature occupies the first slot.
            transaction.signatures[0] = signature;
        }
        Ok(transaction)
    }
}
