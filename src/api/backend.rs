//! Backend claim API client: eligibility, challenge, relayer submission.

use alloy::primitives::Address;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::{json, Value};
use url::Url;

use crate::api::transport::{endpoint, ApiTransport};
use crate::api::types::{decode_body, ApiResult, AssetId, Envelope, RelayerResponse, TokenUsage};
use crate::auth::{AuthorizationChallenge, SignedAuthorization};

/// Relayer message that marks an accepted claim.
pub const RELAYER_SUCCESS: &str = "success";

/// A signed claim ready for the relayer. Consumed by submission.
#[derive(Debug, Clone)]
pub struct ClaimSubmission {
    pub authorization: SignedAuthorization,
    pub asset_ids: Vec<AssetId>,
}

#[derive(Serialize)]
struct RelayerPayload<'a> {
    address: String,
    nonce: u64,
    #[serde(rename = "tokenIDs")]
    token_ids: &'a [AssetId],
    sig: &'a str,
    timestamp: u64,
}

impl<'a> From<&'a ClaimSubmission> for RelayerPayload<'a> {
    fn from(submission: &'a ClaimSubmission) -> Self {
        let auth = &submission.authorization;
        Self {
            address: auth.address.to_checksum(None),
            nonce: auth.challenge.nonce,
            token_ids: &submission.asset_ids,
            sig: &auth.signature,
            timestamp: auth.challenge.timestamp,
        }
    }
}

/// Remote operations of the claim backend.
#[async_trait]
pub trait ClaimBackend: Send + Sync {
    /// The subset of `asset_ids` eligible for a claim by `address`.
    async fn check_eligibility(&self, address: Address, asset_ids: &[AssetId]) -> ApiResult<Vec<AssetId>>;

    /// A fresh single-use challenge for `address`.
    async fn get_nonce_and_timestamp(&self, address: Address) -> ApiResult<AuthorizationChallenge>;

    /// Hand a signed claim to the relayer; returns the relayer's message.
    async fn submit_claim(&self, submission: ClaimSubmission) -> ApiResult<String>;

    /// Whether an asset has already been used for a claim.
    async fn check_token_used(&self, asset_id: &AssetId) -> ApiResult<bool>;
}

/// HTTP client for the claim backend.
#[derive(Debug, Clone)]
pub struct BackendClient {
    transport: ApiTransport,
    base_url: String,
}

impl BackendClient {
    pub fn new(transport: ApiTransport, base_url: impl Into<String>) -> ApiResult<Self> {
        let base_url = base_url.into();
        // fail at construction rather than on first call
        endpoint(&base_url, "")?;
        Ok(Self { transport, base_url })
    }

    fn url(&self, operation: &str) -> ApiResult<Url> {
        endpoint(&self.base_url, operation)
    }

    async fn call<T>(&self, operation: &'static str, payload: &T) -> ApiResult<Value>
    where
        T: Serialize + Sync + ?Sized,
    {
        let value = self
            .transport
            .post_json(operation, self.url(operation)?, payload)
            .await?;
        Envelope::parse(operation, value)?.into_ok_body(operation)
    }
}

#[async_trait]
impl ClaimBackend for BackendClient {
    async fn check_eligibility(&self, address: Address, asset_ids: &[AssetId]) -> ApiResult<Vec<AssetId>> {
        let payload = json!({
            "address": address.to_checksum(None),
            "tokenIds": asset_ids,
        });
        let body = self.call("checkEligible", &payload).await?;
        let reported: Vec<AssetId> = decode_body("checkEligible", body)?;

        let (eligible, unknown): (Vec<AssetId>, Vec<AssetId>) =
            reported.into_iter().partition(|id| asset_ids.contains(id));
        if !unknown.is_empty() {
            tracing::warn!(address = %address, ?unknown, "Backend reported assets the wallet does not own");
        }
        Ok(eligible)
    }

    async fn get_nonce_and_timestamp(&self, address: Address) -> ApiResult<AuthorizationChallenge> {
        let payload = json!({ "address": address.to_checksum(None) });
        let body = self.call("getNonce", &payload).await?;
        decode_body("getNonce", body)
    }

    async fn submit_claim(&self, submission: ClaimSubmission) -> ApiResult<String> {
        let payload = RelayerPayload::from(&submission);
        let body = self.call("callRelayer", &payload).await?;
        let response: RelayerResponse = decode_body("callRelayer", body)?;
        Ok(response.message)
    }

    async fn check_token_used(&self, asset_id: &AssetId) -> ApiResult<bool> {
        // the backend takes the id as a number when it is one
        let token_id = asset_id
            .as_str()
            .parse::<u64>()
            .map(Value::from)
            .unwrap_or_else(|_| Value::from(asset_id.as_str()));
        let body = self.call("checkToken", &json!({ "tokenId": token_id })).await?;
        let usage: TokenUsage = decode_body("checkToken", body)?;
        Ok(usage.token_used)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{AuthorizationChallenge, SignedAuthorization};

    #[test]
    fn test_relayer_payload_shape() {
        let address: Address = "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266".parse().unwrap();
        let submission = ClaimSubmission {
            authorization: SignedAuthorization {
                address,
                challenge: AuthorizationChallenge {
                    nonce: 3,
                    timestamp: 1_700_000_000_000,
                },
                signature: "0xabcd".to_string(),
            },
            asset_ids: vec![AssetId::from("200")],
        };

        let value = serde_json::to_value(RelayerPayload::from(&submission)).unwrap();
        assert_eq!(
            value,
            json!({
                "address": "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266",
                "nonce": 3,
                "tokenIDs": ["200"],
                "sig": "0xabcd",
                "timestamp": 1_700_000_000_000u64,
            })
        );
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let transport =
            ApiTransport::new(&crate::config::ApiConfig::default(), std::time::Duration::from_secs(1)).unwrap();
        assert!(BackendClient::new(transport, "::nope::").is_err());
    }
}
