// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Prometheus metrics module
//!
//! Global metrics on the default Prometheus registry and an Axum handler that
//! exports them.

use std::sync::LazyLock;

use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use prometheus::{
    Encoder, HistogramVec, IntCounterVec, TextEncoder, register_histogram_vec,
    register_int_counter_vec,
};
use tracing::error;

/// Queries served, labeled by table and outcome
pub static QUERIES_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    register_int_counter_vec!(
        "blockchain_tables_queries_total",
        "Total number of table queries, labeled by table and result",
        &["table", "result"]
    )
    .expect("Failed to create blockchain_tables_queries_total counter vec")
});

/// Upstream request durations in seconds
pub static UPSTREAM_REQUEST_DURATION: LazyLock<HistogramVec> = LazyLock::new(|| {
    register_histogram_vec!(
        "blockchain_tables_upstream_request_duration_seconds",
        "Blockchain.com request durations in seconds",
        &["endpoint_kind", "result"],
        vec![0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]
    )
    .expect("Failed to create upstream request duration histogram")
});

/// Count one query against `table`
pub fn inc_queries(table: &str, result: &str) {
    QUERIES_TOTAL.with_label_values(&[table, result]).inc();
}

/// Observe the duration of an upstream request
///
/// `endpoint_kind` is the table whose resolver issued the request, or
/// `health` for connection checks.
pub fn observe_upstream_duration(endpoint_kind: &str, result: &str, duration_secs: f64) {
    UPSTREAM_REQUEST_DURATION
        .with_label_values(&[endpoint_kind, result])
        .observe(duration_secs);
}

/// Axum handler that exports metrics in Prometheus text format
pub async fn metrics_handler() -> Response {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = vec![];

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        error!("failed to encode metrics: {e}");
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    match String::from_utf8(buffer) {
        Ok(body) => ([(header::CONTENT_TYPE, encoder.format_type().to_string())], body)
            .into_response(),
        Err(e) => {
            error!("metrics buffer is not valid UTF-8: {e}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
