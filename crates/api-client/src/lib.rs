// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Upstream JSON API client contract
//!
//! This crate provides the narrow interface the resolvers use to reach the
//! upstream data provider, so that table logic never depends on a concrete
//! HTTP stack.
//!
//! # Core Abstractions
//!
//! - **`ApiClient` Trait**: one GET call returning decoded JSON, plus a health check
//! - **Health Check System**: `Up` and `Down` statuses and the
//!   boolean-plus-reason [`ConnectionStatus`] reported to the host engine
//! - **Error Handling**: [`ApiError`] covers every way a call can fail; malformed
//!   payloads are *not* errors, callers read missing members as null

use std::future::Future;

use serde_json::Value;
use thiserror::Error;

pub mod health;

pub use health::*;

/// Query parameters of a single upstream call
pub type QueryParams = [(&'static str, String)];

/// Generic trait for upstream JSON API clients
pub trait ApiClient: Send + Sync {
    /// Issue a GET request against `endpoint` and decode the JSON body
    ///
    /// `endpoint` is a path such as `/rawblock/{hash}`; the client decides which
    /// host serves it.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-2xx status, or a body that
    /// is not JSON. Nothing is retried.
    fn call(
        &self,
        endpoint: &str,
        params: &QueryParams,
    ) -> impl Future<Output = Result<Value, ApiError>> + Send;

    /// Check the health of the upstream API
    ///
    /// # Errors
    ///
    /// Returns an error if the health check could not be performed at all
    fn health_check(&self) -> impl Future<Output = Result<HealthStatus, ApiError>> + Send;

    /// Get the name/identifier of this API client
    fn name(&self) -> &'static str;
}

/// Common errors that can occur when calling the upstream API
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum ApiError {
    /// Transport-level failure (DNS, connect, TLS, reset)
    #[error("HTTP request failed: {message}")]
    Http { message: String },

    /// Upstream answered with a non-success status
    #[error("upstream returned status {status}: {message}")]
    Status { status: u16, message: String },

    /// Body could not be decoded as JSON
    #[error("Invalid response format: {message}")]
    InvalidResponse { message: String },

    /// Network timeout
    #[error("Request timeout after {timeout_seconds} seconds")]
    Timeout { timeout_seconds: u64 },
}

impl ApiError {
    /// Whether the upstream was reached but refused or failed the request
    pub fn is_upstream_status(&self) -> bool {
        matches!(self, Self::Status { .. })
    }
}
