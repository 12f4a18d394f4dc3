// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Connection configuration for the Blockchain.com client
//!
//! [`BaseUrl`] makes invalid base URLs unrepresentable: once constructed it is an
//! absolute `http(s)` URL without a trailing slash, so endpoint paths can be
//! appended verbatim.

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::Url;

/// Default upstream host for every non-chart endpoint
pub const DEFAULT_BASE_URL: &str = "https://blockchain.info";

const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
const DEFAULT_HEALTH_CHECK_TIMEOUT_SECONDS: u64 = 5;

/// A validated upstream base URL
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BaseUrl(Box<str>);

impl BaseUrl {
    /// Validate and normalise a base URL
    ///
    /// # Errors
    ///
    /// Returns an error if the value is blank, not an absolute URL, or uses a
    /// scheme other than `http`/`https`.
    pub fn new(value: impl Into<String>) -> Result<Self, String> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err("base URL cannot be empty".to_string());
        }

        let parsed = Url::parse(trimmed).map_err(|e| format!("invalid base URL '{trimmed}': {e}"))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(format!(
                "invalid base URL '{trimmed}': scheme must be http or https"
            ));
        }

        Ok(Self(trimmed.trim_end_matches('/').into()))
    }

    /// Get the URL as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for BaseUrl {
    fn default() -> Self {
        Self(DEFAULT_BASE_URL.into())
    }
}

impl fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for BaseUrl {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for BaseUrl {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<BaseUrl> for String {
    fn from(value: BaseUrl) -> Self {
        value.0.into()
    }
}

impl AsRef<str> for BaseUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Configuration for the Blockchain.com API client
///
/// Established once per connection and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockchainConfig {
    /// Base URL for every non-chart endpoint
    pub base_url: BaseUrl,
    /// Append `cors=true` to every request
    pub cors: bool,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// Health check timeout in seconds
    pub health_check_timeout_seconds: u64,
}

impl Default for BlockchainConfig {
    fn default() -> Self {
        Self {
            base_url: BaseUrl::default(),
            cors: true,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            health_check_timeout_seconds: DEFAULT_HEALTH_CHECK_TIMEOUT_SECONDS,
        }
    }
}

impl BlockchainConfig {
    /// Configuration pointing at `base_url`, other settings defaulted
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is not a valid http(s) URL
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, String> {
        Ok(Self {
            base_url: BaseUrl::new(base_url)?,
            ..Self::default()
        })
    }
}
