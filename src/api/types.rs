//! API types, the response envelope and error definitions.

use serde::de::{self, DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Identifier of an owned NFT, kept as the decimal string the backend expects.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct AssetId(String);

impl AssetId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Read an id from a JSON string or integer; anything else is `None`.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) if !s.trim().is_empty() => Some(Self(s.trim().to_string())),
            Value::Number(n) => n.as_u64().map(|n| Self(n.to_string())),
            _ => None,
        }
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AssetId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl<'de> Deserialize<'de> for AssetId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        AssetId::from_json(&value)
            .ok_or_else(|| de::Error::custom(format!("invalid asset id: {}", value)))
    }
}

/// API errors.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("rate limited, retry after {}s", .retry_after.as_secs())]
    RateLimited { retry_after: Duration },

    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    #[error("unexpected HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("{operation} returned status {status}: {body}")]
    Logical {
        operation: &'static str,
        status: i64,
        body: String,
    },

    #[error("failed to decode {operation} response: {detail}")]
    Decode {
        operation: &'static str,
        detail: String,
    },

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid header value: {0}")]
    InvalidHeader(String),
}

// Indexer URLs carry the API key in the path, and reqwest prints the URL.
impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        ApiError::Http(e.without_url())
    }
}

impl ApiError {
    fn decode(operation: &'static str, detail: impl fmt::Display) -> Self {
        ApiError::Decode {
            operation,
            detail: detail.to_string(),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Backend response wrapper.
///
/// Most operations answer `{"status": 200, "body": ...}`; the relayer uses
/// `statusCode` instead. The HTTP status is 200 either way.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope {
    #[serde(alias = "statusCode")]
    pub status: i64,
    #[serde(default)]
    pub body: Value,
}

impl Envelope {
    pub fn parse(operation: &'static str, value: Value) -> ApiResult<Self> {
        serde_json::from_value(value).map_err(|e| ApiError::decode(operation, e))
    }

    /// The body of a logically successful response.
    pub fn into_ok_body(self, operation: &'static str) -> ApiResult<Value> {
        if self.status != 200 {
            return Err(ApiError::Logical {
                operation,
                status: self.status,
                body: self.body.to_string(),
            });
        }
        Ok(self.body)
    }
}

/// Decode a body that is either inline JSON or a JSON document encoded as a string.
pub fn decode_body<T: DeserializeOwned>(operation: &'static str, body: Value) -> ApiResult<T> {
    match body {
        Value::String(encoded) => {
            serde_json::from_str(&encoded).map_err(|e| ApiError::decode(operation, e))
        }
        other => serde_json::from_value(other).map_err(|e| ApiError::decode(operation, e)),
    }
}

/// Relayer response body.
#[derive(Debug, Clone, Deserialize)]
pub struct RelayerResponse {
    pub message: String,
}

/// `checkToken` response body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenUsage {
    pub token_used: bool,
}
