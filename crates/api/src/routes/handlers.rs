// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! HTTP request handlers module
//!
//! Health, table catalogue and query endpoints. Queries are resolved through
//! the shared [`TableHandler`](crate::state::TableHandler); each query makes at
//! most one upstream call.

use std::time::Instant;

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared_types::{FilterExpr, ResourceKind, extract_comparison_conditions};
use tracing::{debug, warn};
use utoipa::ToSchema;

use crate::{
    error::ServerError,
    extractors::JsonExtractor,
    metrics,
    state::{HealthCheck, ServerState},
};

/// Health check endpoint handler
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    summary = "Health check endpoint",
    description = "Re-checks the Blockchain.com latest-block endpoint and returns the service version, environment and upstream connection status. Always answers 200; a failed check is reported as a degraded status.",
    responses(
        (status = 200, description = "Service health", body = HealthCheck)
    )
)]
pub async fn health_handler(State(state): State<ServerState>) -> Json<HealthCheck> {
    Json(state.health_check().await)
}

/// A table and its declared columns
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct TableInfo {
    /// Table name
    #[schema(example = "blocks")]
    pub name: String,
    /// Declared columns, in row order
    pub columns: Vec<String>,
}

impl TableInfo {
    fn of(kind: ResourceKind, columns: &[&str]) -> Self {
        Self {
            name: kind.name().to_string(),
            columns: columns.iter().map(ToString::to_string).collect(),
        }
    }
}

/// Registered tables
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct TablesResponse {
    /// Tables in registration order
    pub tables: Vec<TableInfo>,
}

/// List registered tables
#[utoipa::path(
    get,
    path = "/v1/tables",
    tag = "tables",
    summary = "List tables",
    responses(
        (status = 200, description = "Registered tables with their columns", body = TablesResponse)
    )
)]
pub async fn tables_handler(State(state): State<ServerState>) -> Json<TablesResponse> {
    let handler = state.handler();
    let tables = handler
        .tables()
        .iter()
        .map(|&kind| TableInfo::of(kind, handler.columns(kind)))
        .collect();
    Json(TablesResponse { tables })
}

/// Columns of one table
///
/// # Errors
///
/// Returns `ServerError::UnknownTable` for names that are not registered.
#[utoipa::path(
    get,
    path = "/v1/tables/{table}/columns",
    tag = "tables",
    summary = "Describe a table",
    params(("table" = String, Path, description = "Table name", example = "addresses")),
    responses(
        (status = 200, description = "Declared columns", body = TableInfo),
        (status = 404, description = "Unknown table", body = String)
    )
)]
pub async fn columns_handler(
    State(state): State<ServerState>,
    Path(table): Path<String>,
) -> Result<Json<TableInfo>, ServerError> {
    let kind = table.parse::<ResourceKind>()?;
    Ok(Json(TableInfo::of(kind, state.handler().columns(kind))))
}

/// Query request
///
/// `where` is the host engine's parsed filter tree. Only `=` and `IN`
/// comparisons joined by `and` are accepted.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct QueryRequest {
    /// Table to query
    #[schema(example = "blocks")]
    pub table: String,
    /// Optional filter tree
    #[serde(rename = "where", default)]
    #[schema(value_type = Option<Object>, example = json!({"and": [{"op": "=", "field": "height", "value": 700_000}]}))]
    pub filter: Option<FilterExpr>,
}

/// Query result: the declared columns and the resolved rows
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct QueryResponse {
    /// Declared columns of the table
    pub columns: Vec<String>,
    /// Rows aligned with `columns`; absent upstream values are null
    #[schema(value_type = Vec<Vec<Object>>)]
    pub rows: Vec<Vec<Value>>,
}

/// Resolve a query against one table
///
/// # Errors
///
/// Returns `ServerError::UnknownTable` for unregistered tables and
/// `ServerError::Upstream` when the Blockchain.com call fails.
#[utoipa::path(
    post,
    path = "/v1/query",
    tag = "tables",
    summary = "Query a table",
    description = "Extracts the comparison predicates from the filter tree, lets the table's resolver pick one upstream endpoint by fixed precedence and returns rows matching the table's declared columns.",
    request_body = QueryRequest,
    responses(
        (status = 200, description = "Query resolved", body = QueryResponse),
        (status = 400, description = "Malformed request or unsupported operator", body = String),
        (status = 404, description = "Unknown table", body = String),
        (status = 502, description = "Upstream request failed", body = String),
        (status = 504, description = "Upstream request timed out", body = String)
    )
)]
pub async fn query_handler(
    State(state): State<ServerState>,
    JsonExtractor(request): JsonExtractor<QueryRequest>,
) -> Result<Json<QueryResponse>, ServerError> {
    let kind = request.table.parse::<ResourceKind>()?;
    let predicates = extract_comparison_conditions(request.filter.as_ref());
    debug!(table = %kind, ?predicates, "resolving query");

    let start = Instant::now();
    let outcome = state.handler().select(kind, &predicates).await;
    let elapsed = start.elapsed().as_secs_f64();

    let result = if outcome.is_ok() { "success" } else { "error" };
    metrics::observe_upstream_duration(kind.name(), result, elapsed);
    metrics::inc_queries(kind.name(), result);

    let table = outcome.inspect_err(|e| {
        warn!(table = %kind, error = %e, "query failed upstream");
    })?;

    Ok(Json(QueryResponse {
        columns: table.columns().iter().map(ToString::to_string).collect(),
        rows: table.into_rows(),
    }))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn query_request_accepts_missing_filter() {
        let request: QueryRequest = serde_json::from_value(json!({"table": "stats"})).unwrap();
        assert_eq!(request.table, "stats");
        assert!(request.filter.is_none());
    }

    #[test]
    fn query_request_reads_filter_from_where() {
        let request: QueryRequest = serde_json::from_value(json!({
            "table": "addresses",
            "where": {"op": "IN", "field": "address", "value": ["a", "b"]}
        }))
        .unwrap();

        let predicates = extract_comparison_conditions(request.filter.as_ref());
        assert_eq!(predicates.len(), 1);
        assert_eq!(predicates[0].field, "address");
    }

    #[test]
    fn table_info_lists_columns_in_order() {
        let info = TableInfo::of(ResourceKind::Charts, resolvers::CHART_COLUMNS);
        assert_eq!(info.name, "charts");
        assert_eq!(info.columns, vec!["chart_type", "timestamp", "value", "date"]);
    }
}
