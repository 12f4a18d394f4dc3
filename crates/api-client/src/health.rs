// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Health check types for API clients

use serde::{Deserialize, Serialize};

/// Health status of an API client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum HealthStatus {
    /// Service is healthy and operational
    Up,
    /// Service is down and not functional
    Down { reason: String },
}

/// Outcome of `connect` / `check_connection` as reported to the host engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionStatus {
    /// Whether the upstream is usable
    pub success: bool,
    /// Human-readable reason when `success` is false
    pub error_message: Option<String>,
}

impl HealthStatus {
    /// Check if this health status indicates the service is completely down
    pub fn is_down(&self) -> bool {
        matches!(self, HealthStatus::Down { .. })
    }

    /// Get a human-readable description of the status
    pub fn description(&self) -> &str {
        match self {
            HealthStatus::Up => "Service is healthy",
            HealthStatus::Down { reason } => reason,
        }
    }
}

impl ConnectionStatus {
    /// A successful connection
    pub fn ok() -> Self {
        Self {
            success: true,
            error_message: None,
        }
    }

    /// A failed connection with its reason
    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            success: false,
            error_message: Some(reason.into()),
        }
    }
}

impl From<&HealthStatus> for ConnectionStatus {
    fn from(status: &HealthStatus) -> Self {
        match status {
            HealthStatus::Up => Self::ok(),
            HealthStatus::Down { reason } => Self::failed(reason.clone()),
        }
    }
}
