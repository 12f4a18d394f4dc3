// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Blockchain Tables HTTP server
//!
//! Exposes the Blockchain.com tables (blocks, transactions, addresses, charts,
//! stats and unconfirmed transactions) to a host query engine over HTTP. The
//! engine posts a table name and its parsed filter tree; the server extracts
//! the comparison predicates, resolves them into one upstream call and answers
//! with rows aligned to the table's declared columns.
//!
//! # Module Structure
//!
//! - [`config`]: layered configuration (defaults, JSON files, `SERVER_` environment)
//! - [`error`]: error types and their HTTP status mapping
//! - [`state`]: shared state holding the table handler and cancellation token
//! - [`server`]: router, middleware stack and coordinated shutdown
//! - [`routes`]: health, table catalogue and query endpoints
//! - [`extractors`]: JSON body extraction with filter-aware error hints
//! - [`metrics`]: Prometheus counters and histograms
//! - [`docs`]: `OpenAPI` document and Swagger UI

pub mod config;
pub mod docs;
pub mod error;
pub mod extractors;
pub mod metrics;
pub mod routes;
pub mod server;
pub mod state;

pub use config::{Environment, ServerConfig};
pub use error::{ServerError, ServerResult};
pub use server::{Server, ShutdownConfig};
pub use state::{HealthCheck, ServerState, TableHandler};
