// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! In-memory `ApiClient` for resolver unit tests

use std::{collections::HashMap, sync::Mutex};

use api_client::{ApiClient, ApiError, HealthStatus, QueryParams};
use serde_json::Value;

type RecordedCall = (String, Vec<(&'static str, String)>);

/// Serves canned bodies keyed by endpoint path and records every call
#[derive(Debug)]
pub(crate) struct StubClient {
    responses: HashMap<String, Value>,
    health: Result<HealthStatus, String>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl StubClient {
    pub(crate) fn new() -> Self {
        Self {
            responses: HashMap::new(),
            health: Ok(HealthStatus::Up),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn with_response(mut self, endpoint: &str, body: Value) -> Self {
        self.responses.insert(endpoint.to_string(), body);
        self
    }

    pub(crate) fn with_health(mut self, health: Result<HealthStatus, String>) -> Self {
        self.health = health;
        self
    }

    pub(crate) fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().expect("call log poisoned").clone()
    }
}

impl ApiClient for StubClient {
    async fn call(&self, endpoint: &str, params: &QueryParams) -> Result<Value, ApiError> {
        self.calls
            .lock()
            .expect("call log poisoned")
            .push((endpoint.to_string(), params.to_vec()));

        self.responses
            .get(endpoint)
            .cloned()
            .ok_or_else(|| ApiError::Status {
                status: 404,
                message: format!("no stubbed response for {endpoint}"),
            })
    }

    async fn health_check(&self) -> Result<HealthStatus, ApiError> {
        self.health
            .clone()
            .map_err(|message| ApiError::Http { message })
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}
