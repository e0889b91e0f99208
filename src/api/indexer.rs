//! NFT indexing provider client (`getNFTsForOwner`).

use alloy::primitives::Address;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use url::Url;

use crate::api::transport::{endpoint, ApiTransport};
use crate::api::types::{ApiError, ApiResult, AssetId};
use crate::config::IndexerConfig;

const OPERATION: &str = "getNFTsForOwner";

/// Source of the assets a wallet owns.
#[async_trait]
pub trait AssetIndexer: Send + Sync {
    /// All asset ids `owner` holds in the configured collection. May be empty.
    async fn list_owned_assets(&self, owner: Address) -> ApiResult<Vec<AssetId>>;
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OwnedNftsPage {
    #[serde(default)]
    owned_nfts: Vec<OwnedNft>,
    #[serde(default)]
    page_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwnedNft {
    #[serde(default)]
    metadata: Value,
}

impl OwnedNft {
    fn number(&self) -> Option<AssetId> {
        self.metadata
            .pointer("/properties/number")
            .and_then(AssetId::from_json)
    }
}

/// Indexer client, one request per page.
#[derive(Debug, Clone)]
pub struct IndexerClient {
    transport: ApiTransport,
    endpoint: Url,
    collection: Address,
    page_size: u32,
}

impl IndexerClient {
    pub fn new(transport: ApiTransport, config: &IndexerConfig) -> ApiResult<Self> {
        let base = if config.api_key.is_empty() {
            config.url.clone()
        } else {
            format!("{}/{}", config.url.trim_end_matches('/'), config.api_key)
        };
        let collection = config
            .collection_address
            .parse()
            .map_err(|_| ApiError::InvalidAddress(config.collection_address.clone()))?;

        Ok(Self {
            transport,
            endpoint: endpoint(&base, OPERATION)?,
            collection,
            page_size: config.page_size,
        })
    }

    fn page_url(&self, owner: Address, page_key: Option<&str>) -> Url {
        let mut url = self.endpoint.clone();
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("owner", &owner.to_checksum(None))
                .append_pair("contractAddresses[]", &self.collection.to_checksum(None))
                .append_pair("withMetadata", "true")
                .append_pair("pageSize", &self.page_size.to_string());
            if let Some(key) = page_key {
                query.append_pair("pageKey", key);
            }
        }
        url
    }
}

#[async_trait]
impl AssetIndexer for IndexerClient {
    async fn list_owned_assets(&self, owner: Address) -> ApiResult<Vec<AssetId>> {
        let mut assets = Vec::new();
        let mut page_key: Option<String> = None;

        loop {
            let url = self.page_url(owner, page_key.as_deref());
            let value = self.transport.get_json(OPERATION, url).await?;
            let page: OwnedNftsPage = serde_json::from_value(value).map_err(|e| ApiError::Decode {
                operation: OPERATION,
                detail: e.to_string(),
            })?;

            for nft in &page.owned_nfts {
                match nft.number() {
                    Some(id) => assets.push(id),
                    None => tracing::warn!(owner = %owner, "Skipping NFT without metadata number"),
                }
            }

            match page.page_key.filter(|k| !k.is_empty()) {
                Some(next) if page_key.as_deref() != Some(next.as_str()) => page_key = Some(next),
                _ => break,
            }
        }

        tracing::debug!(owner = %owner, count = assets.len(), "Owned assets fetched");
        Ok(assets)
    }
}
