// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Blockchain.com API integration
//!
//! This module provides an implementation of the `ApiClient` trait for the
//! Blockchain.com explorer, charts and statistics endpoints.

use std::time::{Duration, Instant};

use api_client::{ApiClient, ApiError, HealthStatus, QueryParams};
use reqwest::{Client, header};
use serde_json::Value;
use thiserror::Error;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

use crate::config::BlockchainConfig;

/// Host serving every `/charts/` endpoint, independent of the configured base URL
pub const CHARTS_BASE_URL: &str = "https://api.blockchain.info";

/// Path prefix routed to [`CHARTS_BASE_URL`]
pub const CHARTS_PREFIX: &str = "/charts/";

/// Endpoint requested by the health check
pub const LATEST_BLOCK_ENDPOINT: &str = "/latestblock";

const USER_AGENT: &str = concat!("blockchain-tables/", env!("CARGO_PKG_VERSION"));

/// Blockchain.com API client implementation
#[derive(Debug)]
pub struct BlockchainClient {
    client: Client,
    config: BlockchainConfig,
    charts_base_url: String,
}

/// Errors specific to the Blockchain.com API client
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum BlockchainError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed
    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    /// API returned a non-success status
    #[error("API error: {status} - {message}")]
    Status { status: u16, message: String },

    /// Timeout error
    #[error("Request timeout after {seconds} seconds")]
    Timeout { seconds: u64 },
}

impl From<BlockchainError> for ApiError {
    fn from(value: BlockchainError) -> Self {
        match value {
            BlockchainError::Http(error) => ApiError::Http {
                message: error.to_string(),
            },
            BlockchainError::Json(error) => ApiError::InvalidResponse {
                message: error.to_string(),
            },
            BlockchainError::Status { status, message } => ApiError::Status { status, message },
            BlockchainError::Timeout { seconds } => ApiError::Timeout {
                timeout_seconds: seconds,
            },
        }
    }
}

/// Reasons a [`BlockchainClient`] cannot be constructed
#[derive(Debug, Error)]
pub enum ClientBuildError {
    /// A request or health-check timeout of zero seconds
    #[error("timeouts must be greater than 0")]
    ZeroTimeout,

    /// The underlying HTTP client failed to initialise
    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

impl BlockchainClient {
    /// Create a new Blockchain.com API client
    ///
    /// # Errors
    ///
    /// Returns an error if the timeouts are zero or the HTTP client cannot be built
    pub fn new(config: BlockchainConfig) -> Result<Self, ClientBuildError> {
        if config.timeout_seconds == 0 || config.health_check_timeout_seconds == 0 {
            return Err(ClientBuildError::ZeroTimeout);
        }

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            config,
            charts_base_url: CHARTS_BASE_URL.to_string(),
        })
    }

    /// Point chart endpoints at another host
    ///
    /// Only meant for tests that stand up a local server in place of
    /// `api.blockchain.info`.
    #[must_use]
    pub fn with_charts_base_url(mut self, charts_base_url: impl Into<String>) -> Self {
        self.charts_base_url = charts_base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Connection configuration
    pub fn config(&self) -> &BlockchainConfig {
        &self.config
    }

    /// Resolve the absolute URL an endpoint path is served from
    pub fn endpoint_url(&self, endpoint: &str) -> String {
        let base = if endpoint.starts_with(CHARTS_PREFIX) {
            self.charts_base_url.as_str()
        } else {
            self.config.base_url.as_str()
        };
        format!("{base}{endpoint}")
    }

    /// Parameters actually sent for a call, including the shared `cors` flag
    pub fn effective_params(&self, params: &QueryParams) -> Vec<(&'static str, String)> {
        let mut query = params.to_vec();
        if self.config.cors {
            query.push(("cors", "true".to_string()));
        }
        query
    }

    /// Fetch `endpoint` and decode its JSON body
    ///
    /// # Errors
    ///
    /// Returns an error on timeout, transport failure, non-2xx status, or an
    /// undecodable body
    pub async fn get_json(
        &self,
        endpoint: &str,
        params: &QueryParams,
        timeout_seconds: u64,
    ) -> Result<Value, BlockchainError> {
        let url = self.endpoint_url(endpoint);
        let query = self.effective_params(params);

        debug!(url, ?query, "calling Blockchain.com API");

        let request = self.client.get(&url).query(&query);

        let response = timeout(Duration::from_secs(timeout_seconds), request.send())
            .await
            .map_err(|_| BlockchainError::Timeout {
                seconds: timeout_seconds,
            })?
            .map_err(|e| {
                error!(url, "API request failed: {}", e);
                BlockchainError::Http(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            warn!(url, "Blockchain.com API error: {} - {}", status.as_u16(), message);
            return Err(BlockchainError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.bytes().await.map_err(BlockchainError::Http)?;
        serde_json::from_slice(&body).map_err(|e| {
            error!(url, "failed to decode API response: {}", e);
            BlockchainError::Json(e)
        })
    }

    /// Check the latest-block endpoint
    ///
    /// Healthy only when the response carries a `hash`. Failures are folded into
    /// a `Down` status and never returned as errors.
    pub async fn check_latest_block(&self) -> HealthStatus {
        let start_time = Instant::now();
        let result = self
            .get_json(
                LATEST_BLOCK_ENDPOINT,
                &[],
                self.config.health_check_timeout_seconds,
            )
            .await;

        match result {
            Ok(body) if body.get("hash").is_some() => {
                info!(
                    "Blockchain.com API health check passed in {:?}",
                    start_time.elapsed()
                );
                HealthStatus::Up
            }
            Ok(_) => {
                warn!("Blockchain.com API health check failed: response has no block hash");
                HealthStatus::Down {
                    reason: "Connection failed: Invalid response from Blockchain.com API"
                        .to_string(),
                }
            }
            Err(e) => {
                error!("Error connecting to Blockchain.com: {}", e);
                HealthStatus::Down {
                    reason: format!("Connection failed: {e}"),
                }
            }
        }
    }
}

impl ApiClient for BlockchainClient {
    async fn call(&self, endpoint: &str, params: &QueryParams) -> Result<Value, ApiError> {
        Ok(self
            .get_json(endpoint, params, self.config.timeout_seconds)
            .await?)
    }

    async fn health_check(&self) -> Result<HealthStatus, ApiError> {
        Ok(self.check_latest_block().await)
    }

    fn name(&self) -> &'static str {
        "blockchain.com"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BaseUrl;

    fn client_with_base(base_url: &str) -> BlockchainClient {
        let config = BlockchainConfig {
            base_url: BaseUrl::new(base_url).unwrap(),
            ..Default::default()
        };
        BlockchainClient::new(config).unwrap()
    }

    #[test]
    fn client_creation_success() {
        assert!(BlockchainClient::new(BlockchainConfig::default()).is_ok());
    }

    #[test]
    fn client_creation_rejects_zero_timeout() {
        let config = BlockchainConfig {
            timeout_seconds: 0,
            ..Default::default()
        };
        let client = BlockchainClient::new(config);
        assert!(matches!(client.unwrap_err(), ClientBuildError::ZeroTimeout));
    }

    #[test]
    fn chart_endpoints_use_api_host_regardless_of_base_url() {
        let client = client_with_base("http://localhost:9999");
        assert_eq!(
            client.endpoint_url("/charts/market-price"),
            "https://api.blockchain.info/charts/market-price"
        );
        assert_eq!(
            client.endpoint_url("/latestblock"),
            "http://localhost:9999/latestblock"
        );
        // only the exact prefix is rerouted
        assert_eq!(
            client.endpoint_url("/chartsx"),
            "http://localhost:9999/chartsx"
        );
    }

    #[test]
    fn cors_flag_is_appended_when_enabled() {
        let client = BlockchainClient::new(BlockchainConfig::default()).unwrap();
        let params = client.effective_params(&[("format", "json".to_string())]);
        assert_eq!(
            params,
            vec![
                ("format", "json".to_string()),
                ("cors", "true".to_string())
            ]
        );
    }

    #[test]
    fn cors_flag_is_omitted_when_disabled() {
        let config = BlockchainConfig {
            cors: false,
            ..Default::default()
        };
        let client = BlockchainClient::new(config).unwrap();
        assert!(client.effective_params(&[]).is_empty());
    }

    #[test]
    fn errors_convert_into_api_errors() {
        let err: ApiError = BlockchainError::Status {
            status: 500,
            message: "oops".to_string(),
        }
        .into();
        assert!(matches!(err, ApiError::Status { status: 500, .. }));

        let err: ApiError = BlockchainError::Timeout { seconds: 3 }.into();
        assert!(matches!(err, ApiError::Timeout { timeout_seconds: 3 }));
    }
}
