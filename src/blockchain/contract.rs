//! Claim contract ABI.

use alloy::primitives::{Address, Bytes, U256};
use alloy::sol;
use alloy::sol_types::SolCall;

use crate::blockchain::types::{BlockchainError, BlockchainResult};

sol! {
    /// Token distributor the on-chain flow claims from.
    interface IClaimDistributor {
        /// Amount still claimable by `account`.
        function tokensClaimable(address account) external view returns (uint256);

        /// Claim everything claimable by the caller.
        function claim() external;
    }
}

/// Calldata for the claimable-amount query.
pub fn tokens_claimable_calldata(account: Address) -> Bytes {
    IClaimDistributor::tokensClaimableCall { account }.abi_encode().into()
}

/// Decode the claimable-amount query result.
pub fn decode_tokens_claimable(data: &[u8]) -> BlockchainResult<U256> {
    IClaimDistributor::tokensClaimableCall::abi_decode_returns(data)
        .map_err(|e| BlockchainError::Decode(format!("tokensClaimable: {}", e)))
}

/// Calldata for the claim invocation.
pub fn claim_calldata() -> Bytes {
    IClaimDistributor::claimCall {}.abi_encode().into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::sol_types::SolValue;

    #[test]
    fn test_claim_selector() {
        // keccak256("claim()")[..4]
        assert_eq!(claim_calldata().as_ref(), &[0x4e, 0x71, 0xd9, 0x2d]);
    }

    #[test]
    fn test_tokens_claimable_roundtrip() {
        let account = Address::repeat_byte(0x11);
        let calldata = tokens_claimable_calldata(account);
        assert_eq!(calldata.len(), 4 + 32);
        assert_eq!(&calldata[4 + 12..], account.as_slice());

        let encoded = U256::from(42u64).abi_encode();
        assert_eq!(decode_tokens_claimable(&encoded).unwrap(), U256::from(42u64));
    }

    #[test]
    fn test_decode_rejects_short_data() {
        assert!(decode_tokens_claimable(&[0u8; 4]).is_err());
    }
}
