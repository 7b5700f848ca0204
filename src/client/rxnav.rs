//! RxNav REST client implementation

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::Client as HttpClient;
use serde_json::Value;

use super::{Endpoint, FetchResult, TerminologyApi};
use crate::config::Config;
use crate::error::{ApiError, ConfigError, Result};

/// RxNav REST client
pub struct RxNavClient {
    http: HttpClient,
    base_url: String,
    rate_limiter: Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
}

impl RxNavClient {
    /// Create a client with a per-request `timeout` and outbound pacing
    pub fn new(base_url: &str, timeout: Duration, requests_per_second: u32) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(timeout)
            .user_agent(concat!("rxlookup/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let rate = NonZeroU32::new(requests_per_second).ok_or_else(|| {
            ConfigError::Invalid("requests_per_second must be positive".to_string())
        })?;
        let rate_limiter = Arc::new(RateLimiter::direct(Quota::per_second(rate)));

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            rate_limiter,
        })
    }

    /// Build a client from loaded configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.base_url, config.timeout(), config.requests_per_second)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issue one GET and decode the body, logging any failure.
    async fn get_json(&self, endpoint: Endpoint, input: &str, query: &[(&str, &str)]) -> FetchResult {
        self.rate_limiter.until_ready().await;

        let url = format!("{}{}", self.base_url, endpoint.path(input));
        log::debug!("GET {} {:?}", url, query);

        let response = match self.http.get(&url).query(query).send().await {
            Ok(response) => response,
            Err(e) => {
                let err = ApiError::from(e);
                log::error!(
                    "RxNav {} failed: input={:?} error={}",
                    endpoint.operation(),
                    input,
                    err
                );
                return Err(err);
            }
        };

        let status = response.status();
        if !status.is_success() {
            log::error!(
                "RxNav {} failed: input={:?} status={}",
                endpoint.operation(),
                input,
                status.as_u16()
            );
            return Err(ApiError::Status {
                status: status.as_u16(),
            });
        }

        response.json::<Value>().await.map_err(|e| {
            // The timeout also covers reading the body
            let err = if e.is_timeout() {
                ApiError::Timeout
            } else {
                ApiError::InvalidResponse(format!("Failed to parse response: {}", e))
            };
            log::error!(
                "RxNav {} failed: input={:?} error={}",
                endpoint.operation(),
                input,
                err
            );
            err
        })
    }
}

#[async_trait]
impl TerminologyApi for RxNavClient {
    async fn fetch_drugs_by_name(&self, name: &str) -> FetchResult {
        self.get_json(Endpoint::Drugs, name, &[("name", name)]).await
    }

    async fn fetch_history_status(&self, rxcui: &str) -> FetchResult {
        self.get_json(Endpoint::HistoryStatus, rxcui, &[]).await
    }

    async fn fetch_status(&self, rxcui: &str) -> FetchResult {
        self.get_json(Endpoint::Status, rxcui, &[]).await
    }

    async fn fetch_properties(&self, rxcui: &str) -> FetchResult {
        self.get_json(Endpoint::Properties, rxcui, &[]).await
    }
}
