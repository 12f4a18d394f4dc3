// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Routes module
//!
//! Route table for the table server.

pub mod handlers;

use axum::{
    Router,
    routing::{get, post},
};
use handlers::{columns_handler, health_handler, query_handler, tables_handler};

use crate::{
    docs::{openapi_spec, swagger_ui},
    metrics::metrics_handler,
    state::ServerState,
};

/// Create application routes
pub fn create_routes() -> Router<ServerState> {
    let ops_routes = Router::new()
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler));

    let docs_routes = Router::new()
        .route("/api-doc/openapi.json", get(openapi_spec))
        .route("/swagger-ui", get(swagger_ui));

    let api_routes = Router::new()
        .route("/tables", get(tables_handler))
        .route("/tables/{table}/columns", get(columns_handler))
        .route("/query", post(query_handler));

    Router::new()
        .merge(ops_routes)
        .merge(docs_routes)
        .nest("/v1", api_routes)
}
