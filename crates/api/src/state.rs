// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Server state management module
//!
//! Shared application state: configuration, the table handler bound to the
//! upstream client, and the cancellation token for coordinated shutdown.

use std::{sync::Arc, time::Instant};

use api_client::{ApiClient, ConnectionStatus};
use blockchain_client::BlockchainClient;
use resolvers::BlockchainHandler;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use utoipa::ToSchema;

use crate::{
    config::{Environment, ServerConfig},
    metrics,
};

/// Table handler served by this process
pub type TableHandler = BlockchainHandler<BlockchainClient>;

/// Shared application state with cancellation token support
#[derive(Debug, Clone)]
pub struct ServerState {
    config: ServerConfig,
    handler: Arc<TableHandler>,
    /// Cancellation token for coordinated shutdown
    pub cancellation_token: CancellationToken,
}

impl ServerState {
    /// Create new server state
    pub fn new(
        config: ServerConfig,
        handler: Arc<TableHandler>,
        cancellation_token: CancellationToken,
    ) -> Self {
        Self {
            config,
            handler,
            cancellation_token,
        }
    }

    /// Server configuration
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Table handler
    pub fn handler(&self) -> &TableHandler {
        &self.handler
    }

    /// Re-check the upstream and report service health
    ///
    /// The service itself is up whenever it can answer; an unreachable
    /// upstream degrades it.
    pub async fn health_check(&self) -> HealthCheck {
        let start = Instant::now();
        let connection = self.handler.check_connection().await;
        let elapsed = start.elapsed();

        metrics::observe_upstream_duration(
            "health",
            if connection.success { "success" } else { "error" },
            elapsed.as_secs_f64(),
        );

        let status = match &connection.error_message {
            None if connection.success => HealthStatus::Up,
            reason => HealthStatus::Degraded {
                reason: reason
                    .as_deref()
                    .unwrap_or("upstream unavailable")
                    .into(),
            },
        };

        HealthCheck {
            status,
            version: Box::from(env!("CARGO_PKG_VERSION")),
            environment: self.config.environment,
            timestamp: chrono::Utc::now().to_rfc3339(),
            upstream: UpstreamHealth {
                name: self.handler.client().name(),
                base_url: self.config.blockchain.base_url.to_string(),
                connection,
                response_time_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
            },
        }
    }
}

/// Health status of the service
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub enum HealthStatus {
    /// Service and upstream are operational
    Up,

    /// Service answers but the upstream check failed
    Degraded {
        /// Why the upstream check failed
        reason: Box<str>,
    },
}

/// Outcome of the upstream connection check
#[derive(Debug, Serialize, ToSchema)]
pub struct UpstreamHealth {
    /// Client identifier
    pub name: &'static str,
    /// Configured base URL
    pub base_url: String,
    /// Check result as reported to the host engine
    #[schema(value_type = Object)]
    pub connection: ConnectionStatus,
    /// Check round trip in milliseconds
    pub response_time_ms: u64,
}

/// Health check response
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthCheck {
    /// Service status
    pub status: HealthStatus,
    /// Service version
    pub version: Box<str>,
    /// Environment
    pub environment: Environment,
    /// RFC 3339 timestamp
    pub timestamp: String,
    /// Upstream connection details
    pub upstream: UpstreamHealth,
}
