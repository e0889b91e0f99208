//! Authorization message construction and signing.

use alloy::primitives::{hex, Address};

use crate::auth::types::{AuthorizationChallenge, SignedAuthorization};
use crate::blockchain::types::BlockchainResult;
use crate::blockchain::wallet::Wallet;

/// The exact text the backend verifies. Field order and labels matter.
pub fn authorization_message(address: Address, challenge: &AuthorizationChallenge) -> String {
    format!(
        "Please sign to verify your authenticity. Nonce: {}, Timestamp: {}, Address: {}",
        challenge.nonce,
        challenge.timestamp,
        address.to_checksum(None)
    )
}

/// Sign a challenge with the wallet's key using personal-message (EIP-191) signing.
///
/// Deterministic: the same wallet and challenge always give the same signature.
pub async fn sign_authorization(
    wallet: &Wallet,
    challenge: AuthorizationChallenge,
) -> BlockchainResult<SignedAuthorization> {
    let address = wallet.address();
    let message = authorization_message(address, &challenge);
    tracing::info!(message = %message, "Signing message");

    let signature = wallet.sign_message(message.as_bytes()).await?;

    Ok(SignedAuthorization {
        address,
        challenge,
        signature: hex::encode_prefixed(signature.as_bytes()),
    })
}
