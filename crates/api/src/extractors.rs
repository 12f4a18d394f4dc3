// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Custom extractors for improved error handling
//!
//! [`JsonExtractor`] reports malformed bodies as `400` with a hint about what
//! went wrong. Filter trees get special treatment: a comparison using an
//! operator the adapter cannot evaluate is named explicitly instead of
//! surfacing serde's untagged-enum error.

use axum::{
    extract::{FromRequest, Request},
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use shared_types::Operator;

use crate::error::ServerError;

mod error_hints {
    pub const FILTER_SHAPE: &str = "a filter is either a comparison {\"op\", \"field\", \"value\"} \
         or a conjunction {\"and\": [...]}; supported operators are '=' and 'IN'";
    pub const MISSING_COMMA: &str =
        "check for missing or extra commas between object properties or array elements";
    pub const MISSING_BRACE: &str = "check for missing closing brace '}' for JSON object";
    pub const MISSING_BRACKET: &str = "check for missing closing bracket ']' for JSON array";
    pub const MISSING_QUOTES: &str =
        "check for missing or improperly escaped quotes around string values";
    pub const CONTROL_CHARS: &str = "JSON contains invalid control characters that must be escaped";
    pub const EXPECTED_VALUE: &str =
        "expected a valid JSON value (string, number, boolean, null, object, or array)";
    pub const DEFAULT_SYNTAX: &str = "check JSON formatting and structure";
    pub const EMPTY_BODY: &str = "request body is empty, expected valid JSON";
    pub const TRUNCATED_JSON: &str =
        "unexpected end of JSON input, request appears to be truncated";
}

const MAX_JSON_PAYLOAD_SIZE: usize = 64 * 1024;

/// JSON extractor with detailed error messages
#[derive(Debug)]
pub struct JsonExtractor<T>(pub T);

impl<T, S> FromRequest<S> for JsonExtractor<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        Self::extract_json(req, state).await
    }
}

impl<T> JsonExtractor<T>
where
    T: DeserializeOwned,
{
    async fn extract_json<S>(req: Request, state: &S) -> Result<Self, ServerError>
    where
        S: Send + Sync,
    {
        if let Some(content_type) = req.headers().get("content-type")
            && let Ok(content_type_str) = content_type.to_str()
            && !content_type_str.starts_with("application/json")
        {
            return Err(ServerError::JsonError {
                message: format!(
                    "invalid content-type: expected 'application/json', got '{content_type_str}'"
                ),
            });
        }

        let bytes = axum::body::Bytes::from_request(req, state)
            .await
            .map_err(|rejection| ServerError::JsonError {
                message: format!("failed to read request body: {rejection}"),
            })?;

        if bytes.len() > MAX_JSON_PAYLOAD_SIZE {
            return Err(ServerError::JsonError {
                message: format!(
                    "request body too large: {} bytes (max: {} bytes)",
                    bytes.len(),
                    MAX_JSON_PAYLOAD_SIZE
                ),
            });
        }

        if bytes.is_empty() {
            return Err(ServerError::JsonError {
                message: error_hints::EMPTY_BODY.to_string(),
            });
        }

        serde_json::from_slice::<T>(&bytes)
            .map(JsonExtractor)
            .map_err(|err| {
                let message = if err.is_syntax() {
                    format!(
                        "invalid JSON syntax at line {}, column {}: {}",
                        err.line(),
                        err.column(),
                        syntax_hint(&err)
                    )
                } else if err.is_data() {
                    format!("JSON data validation failed: {}", data_hint(&err, &bytes))
                } else if err.is_eof() {
                    error_hints::TRUNCATED_JSON.to_string()
                } else {
                    format!("JSON parsing error: {err}")
                };
                ServerError::JsonError { message }
            })
    }
}

impl<T> IntoResponse for JsonExtractor<T>
where
    T: IntoResponse,
{
    fn into_response(self) -> Response {
        self.0.into_response()
    }
}

fn syntax_hint(err: &serde_json::Error) -> &'static str {
    let err_msg = err.to_string();

    if err_msg.contains("expected ','") || err_msg.contains("trailing comma") {
        error_hints::MISSING_COMMA
    } else if err_msg.contains("expected '}'") {
        error_hints::MISSING_BRACE
    } else if err_msg.contains("expected ']'") {
        error_hints::MISSING_BRACKET
    } else if err_msg.contains("expected '\"'") {
        error_hints::MISSING_QUOTES
    } else if err_msg.contains("control character") {
        error_hints::CONTROL_CHARS
    } else if err_msg.contains("expected value") {
        error_hints::EXPECTED_VALUE
    } else {
        error_hints::DEFAULT_SYNTAX
    }
}

fn data_hint(err: &serde_json::Error, raw_json: &[u8]) -> String {
    let err_msg = err.to_string();

    if err_msg.contains("untagged enum FilterExpr") {
        return serde_json::from_slice::<Value>(raw_json)
            .ok()
            .and_then(|body| body.get("where").and_then(first_unsupported_operator))
            .map_or_else(
                || format!("invalid filter - {}", error_hints::FILTER_SHAPE),
                |(op, field)| {
                    format!(
                        "unsupported operator '{op}' on field '{field}'. Supported operators are '=' and 'IN'"
                    )
                },
            );
    }

    if err_msg.contains("invalid type") {
        if err_msg.contains("expected a string") || err_msg.contains("expected string") {
            "expected a string value, but received a different data type".to_string()
        } else if err_msg.contains("expected an array") || err_msg.contains("expected array") {
            "expected an array, but received a different data type".to_string()
        } else {
            format!("data type mismatch: {err_msg}")
        }
    } else if err_msg.contains("missing field") {
        format!("required field is missing: {err_msg}")
    } else if err_msg.contains("unknown field") {
        format!("unrecognized field found: {err_msg}")
    } else {
        err_msg
    }
}

/// Depth-first search for the first comparison whose operator does not parse
fn first_unsupported_operator(filter: &Value) -> Option<(String, String)> {
    if let Some(conjuncts) = filter.get("and").and_then(Value::as_array) {
        return conjuncts.iter().find_map(first_unsupported_operator);
    }

    let op = filter.get("op")?.as_str()?;
    if op.parse::<Operator>().is_ok() {
        return None;
    }
    let field = filter
        .get("field")
        .and_then(Value::as_str)
        .unwrap_or_default();
    Some((op.to_string(), field.to_string()))
}
