// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Null-tolerant payload access and derived values
//!
//! Upstream payloads are partially populated and never validated against a
//! schema. Every payload-to-row mapping goes through these helpers so that a
//! missing member always becomes a null cell instead of an error.

use chrono::DateTime;
use serde_json::Value;

static NULL: Value = Value::Null;

/// Member `key` of `payload`, or null when absent or when `payload` is not an object
pub fn field(payload: &Value, key: &str) -> Value {
    lookup(payload, key).clone()
}

/// Borrowing variant of [`field`]
pub fn lookup<'a>(payload: &'a Value, key: &str) -> &'a Value {
    payload.get(key).unwrap_or(&NULL)
}

/// Array member `key` of `payload`, empty when absent or not an array
pub fn list<'a>(payload: &'a Value, key: &str) -> &'a [Value] {
    payload
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

/// Whether a value would count as present in a boolean context
///
/// `null`, `false`, zero, empty strings and empty collections are absent.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Numeric view of a value; numeric strings are accepted
pub fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Sum of the referenced previous-output values of a transaction's inputs
///
/// Inputs without a previous-output reference (coinbase) are skipped.
pub fn total_input(tx: &Value) -> f64 {
    list(tx, "inputs")
        .iter()
        .map(|input| lookup(input, "prev_out"))
        .filter(|prev_out| is_truthy(prev_out))
        .filter_map(|prev_out| as_f64(lookup(prev_out, "value")))
        .sum()
}

/// Sum of a transaction's output values
pub fn total_output(tx: &Value) -> f64 {
    list(tx, "out")
        .iter()
        .filter_map(|output| as_f64(lookup(output, "value")))
        .sum()
}

/// Fee divided by size, zero when size is not positive
pub fn fee_per_byte(fee: f64, size: f64) -> f64 {
    if size > 0.0 { fee / size } else { 0.0 }
}

/// Earliest and latest `time` across a transaction list
///
/// Transactions without a numeric `time` are ignored; with nothing to scan
/// both bounds are `None`.
pub fn time_bounds(txs: &[Value]) -> (Option<Value>, Option<Value>) {
    let mut first: Option<(f64, &Value)> = None;
    let mut last: Option<(f64, &Value)> = None;

    for time in txs.iter().map(|tx| lookup(tx, "time")) {
        let Some(t) = as_f64(time) else {
            continue;
        };
        if first.is_none_or(|(min, _)| t < min) {
            first = Some((t, time));
        }
        if last.is_none_or(|(max, _)| t > max) {
            last = Some((t, time));
        }
    }

    (
        first.map(|(_, v)| v.clone()),
        last.map(|(_, v)| v.clone()),
    )
}

/// Formats a Unix timestamp (seconds) as a UTC `YYYY-MM-DD` date
pub fn utc_date(timestamp: &Value) -> Value {
    let seconds = match timestamp {
        Value::Null => Some(0),
        #[allow(clippy::cast_possible_truncation)]
        other => as_f64(other).map(|f| f.floor() as i64),
    };

    seconds
        .and_then(|s| DateTime::from_timestamp(s, 0))
        .map_or(Value::Null, |dt| {
            Value::String(dt.format("%Y-%m-%d").to_string())
        })
}

/// JSON number from a float, null when not finite
pub fn number(value: f64) -> Value {
    serde_json::Number::from_f64(value).map_or(Value::Null, Value::Number)
}

/// JSON number from a collection length
pub fn count(len: usize) -> Value {
    Value::from(len)
}
