//! Authorization challenge and signature types.

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};

/// Single-use challenge issued by the backend for one claim attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationChallenge {
    /// Server-issued nonce (not the account transaction nonce).
    pub nonce: u64,
    /// Issue time in unix milliseconds.
    pub timestamp: u64,
}

/// A signed challenge, consumed by the relayer submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedAuthorization {
    pub address: Address,
    pub challenge: AuthorizationChallenge,
    /// `0x`-prefixed lowercase hex of the 65-byte signature.
    pub signature: String,
}
