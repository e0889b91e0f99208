//! Shared JSON-over-HTTPS transport.

use reqwest::header::{HeaderMap, HeaderValue, ORIGIN, REFERER};
use reqwest::{Client, Response, StatusCode};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use url::Url;

use crate::api::types::{ApiError, ApiResult};
use crate::config::ApiConfig;
use crate::observability::metrics;

/// HTTP client carrying the fixed browser headers and the rate-limit pause.
///
/// Cloning is cheap; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct ApiTransport {
    client: Client,
    rate_limit_pause: Duration,
}

impl ApiTransport {
    pub fn new(config: &ApiConfig, rate_limit_pause: Duration) -> ApiResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ORIGIN, header_value(&config.origin)?);
        headers.insert(REFERER, header_value(&config.referer)?);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            rate_limit_pause,
        })
    }

    /// GET `url` and parse the JSON response.
    pub async fn get_json(&self, source: &'static str, url: Url) -> ApiResult<Value> {
        tracing::debug!(source, url = %redact(&url), "GET");
        let response = self.client.get(url).send().await?;
        self.read_json(source, response).await
    }

    /// POST `payload` as JSON to `url` and parse the JSON response.
    pub async fn post_json<T>(&self, source: &'static str, url: Url, payload: &T) -> ApiResult<Value>
    where
        T: Serialize + ?Sized,
    {
        tracing::debug!(source, url = %url, "POST");
        let response = self.client.post(url).json(payload).send().await?;
        self.read_json(source, response).await
    }

    async fn read_json(&self, source: &'static str, response: Response) -> ApiResult<Value> {
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            metrics::record_rate_limited(source);
            tracing::info!(source, pause_secs = self.rate_limit_pause.as_secs(), "Rate limited");
            return Err(ApiError::RateLimited {
                retry_after: self.rate_limit_pause,
            });
        }

        let body = response.text().await?;
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|e| ApiError::Decode {
            operation: source,
            detail: e.to_string(),
        })
    }
}

fn header_value(value: &str) -> ApiResult<HeaderValue> {
    HeaderValue::from_str(value).map_err(|_| ApiError::InvalidHeader(value.to_string()))
}

/// Parse `base` and append `segment`, keeping whatever path `base` already has.
pub fn endpoint(base: &str, segment: &str) -> ApiResult<Url> {
    let mut joined = base.trim_end_matches('/').to_string();
    joined.push('/');
    joined.push_str(segment.trim_start_matches('/'));
    Url::parse(&joined).map_err(|e| ApiError::InvalidUrl(format!("{}: {}", joined, e)))
}

// Indexer URLs carry the API key in the path.
fn redact(url: &Url) -> String {
    format!("{}://{}/...", url.scheme(), url.host_str().unwrap_or_default())
}
