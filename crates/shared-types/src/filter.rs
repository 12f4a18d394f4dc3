// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Filter predicates and the filter tree they are extracted from
//!
//! The host query engine hands over a parsed `WHERE` clause as a [`FilterExpr`].
//! Resolvers never look at the tree directly: they consume the flat list of
//! `(operator, field, value)` triples produced by [`extract_comparison_conditions`].

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Comparison operator of a predicate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// Equality (`=`)
    Eq,
    /// Set membership (`IN`)
    In,
}

impl Operator {
    /// SQL spelling of the operator
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::In => "IN",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operator {
    type Err = OperatorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "=" | "==" => Ok(Self::Eq),
            op if op.eq_ignore_ascii_case("in") => Ok(Self::In),
            _ => Err(OperatorParseError(s.to_string())),
        }
    }
}

impl Serialize for Operator {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Operator {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let op = String::deserialize(deserializer)?;
        op.parse().map_err(serde::de::Error::custom)
    }
}

/// Error returned for operators the adapter cannot evaluate
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported operator: {0}. Supported operators are '=' and 'IN'")]
pub struct OperatorParseError(pub String);

/// Right-hand side of a predicate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// Value list, as produced by `IN (...)`
    List(Vec<Value>),
    /// Single constant
    Scalar(Value),
}

impl FilterValue {
    /// Renders a scalar as text suitable for an endpoint path segment
    ///
    /// Strings are returned unquoted, numbers and booleans in their JSON form.
    /// Lists, `null` and empty strings have no text form.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Self::Scalar(value) => value_text(value),
            Self::List(_) => None,
        }
    }

    /// Renders every member as text; a scalar counts as a one-element list
    pub fn texts(&self) -> Vec<String> {
        match self {
            Self::Scalar(value) => value_text(value).into_iter().collect(),
            Self::List(values) => values.iter().filter_map(value_text).collect(),
        }
    }

    /// Whether the value would count as "present" in a filter
    pub fn is_present(&self) -> bool {
        match self {
            Self::Scalar(value) => value_text(value).is_some(),
            Self::List(values) => values.iter().any(|v| value_text(v).is_some()),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        Self::Scalar(Value::String(value.to_string()))
    }
}

impl From<i32> for FilterValue {
    fn from(value: i32) -> Self {
        Self::Scalar(Value::from(value))
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        Self::Scalar(Value::from(value))
    }
}

impl From<Vec<&str>> for FilterValue {
    fn from(values: Vec<&str>) -> Self {
        Self::List(values.into_iter().map(Value::from).collect())
    }
}

/// Largest magnitude below which every integer is exactly representable in f64
const MAX_EXACT_F64: f64 = 9_007_199_254_740_992.0;

fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(number_text(n)),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Decimal text of a number; whole-valued floats render as integers
#[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
fn number_text(n: &serde_json::Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < MAX_EXACT_F64 => {
            (f as i64).to_string()
        }
        _ => n.to_string(),
    }
}

/// A single `(operator, field, value)` triple
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Predicate {
    /// Comparison operator
    #[serde(rename = "op")]
    pub operator: Operator,
    /// Column name the predicate applies to
    pub field: String,
    /// Constant the column is compared against
    pub value: FilterValue,
}

impl Predicate {
    /// Create a new predicate
    pub fn new(operator: Operator, field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self {
            operator,
            field: field.into(),
            value: value.into(),
        }
    }

    /// Shorthand for an equality predicate
    pub fn eq(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::new(Operator::Eq, field, value)
    }

    /// Shorthand for a set-membership predicate
    pub fn is_in(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::new(Operator::In, field, value)
    }
}

/// Parsed filter tree handed over by the host query engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterExpr {
    /// Conjunction of sub-expressions
    And {
        /// Conjuncts, in textual order
        and: Vec<FilterExpr>,
    },
    /// Leaf comparison
    Comparison(Predicate),
}

/// Flattens a filter tree into its comparison triples
///
/// Conjunctions are walked depth-first so the returned list keeps the textual
/// order of the original clause. A missing filter yields no predicates.
pub fn extract_comparison_conditions(filter: Option<&FilterExpr>) -> Vec<Predicate> {
    let mut predicates = Vec::new();
    if let Some(filter) = filter {
        collect(filter, &mut predicates);
    }
    predicates
}

fn collect(filter: &FilterExpr, out: &mut Vec<Predicate>) {
    match filter {
        FilterExpr::And { and } => {
            for child in and {
                collect(child, out);
            }
        }
        FilterExpr::Comparison(predicate) => out.push(predicate.clone()),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn operator_parsing() {
        assert_eq!("=".parse::<Operator>().ok(), Some(Operator::Eq));
        assert_eq!("in".parse::<Operator>().ok(), Some(Operator::In));
        assert_eq!(" IN ".parse::<Operator>().ok(), Some(Operator::In));
        assert!(">".parse::<Operator>().is_err());
    }

    #[test]
    fn scalar_text_forms() {
        assert_eq!(FilterValue::from("abc").as_text().as_deref(), Some("abc"));
        assert_eq!(FilterValue::from(700_000).as_text().as_deref(), Some("700000"));
        assert_eq!(FilterValue::Scalar(Value::Null).as_text(), None);
        assert_eq!(FilterValue::from("").as_text(), None);
        assert_eq!(FilterValue::from(vec!["a"]).as_text(), None);
    }

    #[test]
    fn whole_floats_render_as_integers() {
        let text = |value: Value| FilterValue::Scalar(value).as_text();

        assert_eq!(text(json!(1.6e12)).as_deref(), Some("1600000000000"));
        assert_eq!(text(json!(700_000.0)).as_deref(), Some("700000"));
        assert_eq!(text(json!(-3.0)).as_deref(), Some("-3"));
        assert_eq!(text(json!(2.5)).as_deref(), Some("2.5"));
        assert_eq!(text(json!(1e300)).as_deref(), Some("1e300"));
    }

    #[test]
    fn scalar_counts_as_single_member_list() {
        assert_eq!(FilterValue::from("a").texts(), vec!["a".to_string()]);
        assert_eq!(
            FilterValue::from(vec!["a", "b"]).texts(),
            vec!["a".to_string(), "b".to_string()]
        );
    }

    #[test]
    fn presence_follows_truthiness() {
        assert!(FilterValue::from("x").is_present());
        assert!(!FilterValue::from("").is_present());
        assert!(!FilterValue::List(vec![]).is_present());
        assert!(!FilterValue::Scalar(Value::Null).is_present());
    }

    #[test]
    fn extraction_flattens_conjunctions_in_order() {
        let filter: FilterExpr = serde_json::from_value(json!({
            "and": [
                {"op": "=", "field": "hash", "value": "000abc"},
                {"and": [
                    {"op": "=", "field": "height", "value": 700000},
                    {"op": "in", "field": "address", "value": ["a", "b"]}
                ]}
            ]
        }))
        .unwrap();

        let predicates = extract_comparison_conditions(Some(&filter));
        assert_eq!(
            predicates,
            vec![
                Predicate::eq("hash", "000abc"),
                Predicate::eq("height", 700_000),
                Predicate::is_in("address", vec!["a", "b"]),
            ]
        );
    }

    #[test]
    fn extraction_without_filter_is_empty() {
        assert!(extract_comparison_conditions(None).is_empty());
    }

    #[test]
    fn unknown_operator_fails_deserialization() {
        let result = serde_json::from_value::<FilterExpr>(json!({
            "op": "LIKE", "field": "hash", "value": "x"
        }));
        assert!(result.is_err());
    }
}
