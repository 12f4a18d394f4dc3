// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! HTTP-level tests: a running server resolving queries against a mocked
//! Blockchain.com

use std::{net::SocketAddr, sync::Arc};

use api::{Server, ServerConfig, ShutdownConfig};
use axum::http::StatusCode;
use blockchain_client::{BlockchainClient, BlockchainConfig};
use resolvers::BlockchainHandler;
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

async fn start_server(upstream: &MockServer) -> (SocketAddr, CancellationToken) {
    let mut config = ServerConfig::for_testing();
    config.blockchain =
        BlockchainConfig::with_base_url(upstream.uri()).expect("mock URI is a valid base URL");

    let client = BlockchainClient::new(config.blockchain.clone())
        .expect("Failed to create client")
        .with_charts_base_url(upstream.uri());

    Server::with_handler(
        config,
        ShutdownConfig::default(),
        Arc::new(BlockchainHandler::new(client)),
    )
    .run_for_testing()
    .await
    .expect("Failed to start test server")
}

async fn post_query(addr: SocketAddr, body: &Value) -> reqwest::Response {
    reqwest::Client::new()
        .post(format!("http://{addr}/v1/query"))
        .json(body)
        .send()
        .await
        .expect("Failed to send request")
}

#[tokio::test]
async fn health_reports_upstream_status() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/latestblock"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"hash": "000abc"})))
        .mount(&upstream)
        .await;
    let (addr, token) = start_server(&upstream).await;

    let response = reqwest::get(format!("http://{addr}/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], json!("Up"));
    assert_eq!(body["environment"], json!("testing"));
    assert_eq!(body["upstream"]["name"], json!("blockchain.com"));
    assert_eq!(body["upstream"]["connection"]["success"], json!(true));

    token.cancel();
}

#[tokio::test]
async fn health_degrades_when_upstream_is_down() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/latestblock"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&upstream)
        .await;
    let (addr, token) = start_server(&upstream).await;

    let response = reqwest::get(format!("http://{addr}/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.unwrap();
    let reason = body["status"]["Degraded"]["reason"].as_str().unwrap();
    assert!(reason.starts_with("Connection failed"), "{reason}");
    assert_eq!(body["upstream"]["connection"]["success"], json!(false));

    token.cancel();
}

#[tokio::test]
async fn tables_lists_every_table_with_columns() {
    let upstream = MockServer::start().await;
    let (addr, token) = start_server(&upstream).await;

    let body: Value = reqwest::get(format!("http://{addr}/v1/tables"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let names: Vec<&str> = body["tables"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        vec![
            "blocks",
            "transactions",
            "addresses",
            "charts",
            "stats",
            "unconfirmed_transactions"
        ]
    );
    assert_eq!(
        body["tables"][3]["columns"],
        json!(["chart_type", "timestamp", "value", "date"])
    );

    token.cancel();
}

#[tokio::test]
async fn columns_of_unknown_table_is_not_found() {
    let upstream = MockServer::start().await;
    let (addr, token) = start_server(&upstream).await;

    let response = reqwest::get(format!("http://{addr}/v1/tables/mempool/columns"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = reqwest::get(format!("http://{addr}/v1/tables/Stats/columns"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["name"], json!("stats"));
    assert_eq!(body["columns"].as_array().unwrap().last(), Some(&json!("timestamp")));

    token.cancel();
}

#[tokio::test]
async fn query_block_by_hash() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rawblock/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "hash": "abc",
            "height": 800_000,
            "time": 1_690_168_629,
            "n_tx": 3721,
            "prev_block": "prev",
            "main_chain": true
        })))
        .expect(1)
        .mount(&upstream)
        .await;
    let (addr, token) = start_server(&upstream).await;

    let response = post_query(
        addr,
        &json!({
            "table": "blocks",
            "where": {"and": [
                {"op": "=", "field": "hash", "value": "abc"},
                {"op": "=", "field": "height", "value": 1}
            ]}
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.unwrap();
    let columns = body["columns"].as_array().unwrap();
    let rows = body["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].as_array().unwrap().len(), columns.len());

    let height = columns.iter().position(|c| c == "height").unwrap();
    assert_eq!(rows[0][height], json!(800_000));

    token.cancel();
}

#[tokio::test]
async fn query_unknown_table_is_not_found() {
    let upstream = MockServer::start().await;
    let (addr, token) = start_server(&upstream).await;

    let response = post_query(addr, &json!({"table": "wallets"})).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("wallets"));

    token.cancel();
}

#[tokio::test]
async fn query_with_unsupported_operator_is_rejected() {
    let upstream = MockServer::start().await;
    let (addr, token) = start_server(&upstream).await;

    let response = post_query(
        addr,
        &json!({
            "table": "blocks",
            "where": {"op": ">", "field": "height", "value": 5}
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert!(
        body["error"]
            .as_str()
            .unwrap()
            .contains("unsupported operator '>' on field 'height'")
    );

    token.cancel();
}

#[tokio::test]
async fn upstream_failure_is_bad_gateway() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/stats"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&upstream)
        .await;
    let (addr, token) = start_server(&upstream).await;

    let response = post_query(addr, &json!({"table": "stats"})).await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    token.cancel();
}

#[tokio::test]
async fn metrics_record_queries() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/charts/market-price"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "values": [{"x": 1_700_006_400, "y": 37_000.5}]
        })))
        .mount(&upstream)
        .await;
    let (addr, token) = start_server(&upstream).await;

    let response = post_query(addr, &json!({"table": "charts"})).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body["rows"],
        json!([["market-price", 1_700_006_400, 37_000.5, "2023-11-15"]])
    );

    let text = reqwest::get(format!("http://{addr}/metrics"))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(text.contains("blockchain_tables_queries_total"));
    assert!(text.contains(r#"table="charts""#));

    token.cancel();
}

#[tokio::test]
async fn openapi_document_is_served() {
    let upstream = MockServer::start().await;
    let (addr, token) = start_server(&upstream).await;

    let doc: Value = reqwest::get(format!("http://{addr}/api-doc/openapi.json"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(doc["info"]["title"], json!("Blockchain Tables API"));
    assert!(doc["paths"].get("/v1/query").is_some());

    let ui = reqwest::get(format!("http://{addr}/swagger-ui")).await.unwrap();
    assert_eq!(ui.status(), StatusCode::OK);

    token.cancel();
}
