// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! `OpenAPI` document for the table server and the page that renders it

use axum::{Json, response::Html};
use utoipa::OpenApi;

use crate::{
    config::Environment,
    routes::handlers::{self, QueryRequest, QueryResponse, TableInfo, TablesResponse},
    state::{HealthCheck, HealthStatus, UpstreamHealth},
};

/// Generated `OpenAPI` description of every public route
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "Blockchain Tables API",
        description = "Tabular query adapter over the Blockchain.com data API"
    ),
    paths(
        handlers::health_handler,
        handlers::tables_handler,
        handlers::columns_handler,
        handlers::query_handler,
    ),
    components(schemas(
        HealthCheck,
        HealthStatus,
        UpstreamHealth,
        Environment,
        TableInfo,
        TablesResponse,
        QueryRequest,
        QueryResponse,
        shared_types::ResourceKind,
    )),
    tags(
        (name = "health", description = "Service and upstream health"),
        (name = "tables", description = "Table catalogue and queries")
    )
)]
pub struct ApiDoc;

const SWAGGER_UI_DIST: &str = "https://unpkg.com/swagger-ui-dist@5.17.14";

/// Serves the generated document
pub async fn openapi_spec() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Swagger UI page reading `/api-doc/openapi.json`
pub async fn swagger_ui() -> Html<String> {
    Html(format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Blockchain Tables API</title>
  <link rel="stylesheet" href="{SWAGGER_UI_DIST}/swagger-ui.css">
</head>
<body>
  <main id="tables-api"></main>
  <script src="{SWAGGER_UI_DIST}/swagger-ui-bundle.js"></script>
  <script>
    SwaggerUIBundle({{
      url: "/api-doc/openapi.json",
      dom_id: "#tables-api",
      docExpansion: "list",
      defaultModelsExpandDepth: 0,
      tryItOutEnabled: true
    }});
  </script>
</body>
</html>
"##
    ))
}
