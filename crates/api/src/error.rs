// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Error handling module
//!
//! Server errors and their HTTP mapping. Every error response carries a
//! `{"error": "<message>"}` body.

use std::net::SocketAddr;

use api_client::ApiError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use shared_types::ResourceParseError;
use thiserror::Error;

/// Error types for server operations
#[derive(Error, Debug)]
pub enum ServerError {
    /// Configuration validation errors
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// Network binding errors
    #[error("Failed to bind to {address}: {source}")]
    Bind {
        /// Socket address that failed to bind
        address: SocketAddr,
        /// Underlying IO error
        source: std::io::Error,
    },

    /// Server startup errors
    #[error("Server startup failed: {source}")]
    Startup {
        /// Underlying IO error
        source: std::io::Error,
    },

    /// Server shutdown errors
    #[error("Server shutdown failed: {source}")]
    Shutdown {
        /// Underlying IO error
        source: std::io::Error,
    },

    /// JSON parsing errors with detailed context
    #[error("Invalid JSON request: {message}")]
    JsonError {
        /// Detailed error message
        message: String,
    },

    /// Query against a table that is not registered
    #[error(transparent)]
    UnknownTable(#[from] ResourceParseError),

    /// Upstream call failed while resolving a query
    #[error("Upstream error: {0}")]
    Upstream(#[from] ApiError),
}

/// Result type for server operations
pub type ServerResult<T> = Result<T, ServerError>;

impl ServerError {
    /// HTTP status this error is reported with
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::JsonError { .. } => StatusCode::BAD_REQUEST,
            Self::UnknownTable(..) => StatusCode::NOT_FOUND,
            Self::Upstream(ApiError::Timeout { .. }) => StatusCode::GATEWAY_TIMEOUT,
            Self::Upstream(
                ApiError::Http { .. } | ApiError::Status { .. } | ApiError::InvalidResponse { .. },
            ) => StatusCode::BAD_GATEWAY,
            Self::Config { .. }
            | Self::Bind { .. }
            | Self::Startup { .. }
            | Self::Shutdown { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}
