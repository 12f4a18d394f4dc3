// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! `charts` table: one row per point of a chart series

use api_client::{ApiClient, ApiError};
use serde_json::Value;
use shared_types::{Predicate, Table};
use tracing::debug;

use crate::{
    TableResolver,
    dispatch::{PredicateMatcher, path_segment},
    fields::{field, list, lookup, utc_date},
};

/// Columns of the `charts` table
pub const CHART_COLUMNS: &[&str] = &["chart_type", "timestamp", "value", "date"];

/// Chart served when the query does not name one
pub const DEFAULT_CHART_TYPE: &str = "market-price";

const CHART_TYPE: PredicateMatcher = PredicateMatcher::eq("chart_type");

/// Resolver for the `charts` table
#[derive(Debug, Clone, Copy, Default)]
pub struct ChartsTable;

impl TableResolver for ChartsTable {
    fn columns(&self) -> &'static [&'static str] {
        CHART_COLUMNS
    }

    async fn select<C: ApiClient>(
        &self,
        client: &C,
        predicates: &[Predicate],
    ) -> Result<Table, ApiError> {
        let (chart_type, segment) = match CHART_TYPE.bind(predicates) {
            Some(value) => match (value.as_text(), path_segment(value)) {
                (Some(chart_type), Some(segment)) => (chart_type, segment),
                _ => {
                    debug!("chart type is not a path segment, returning empty table");
                    return Ok(Table::new(CHART_COLUMNS));
                }
            },
            None => (DEFAULT_CHART_TYPE.to_string(), DEFAULT_CHART_TYPE.to_string()),
        };
        debug!(chart_type, "resolving chart series");

        let response = client
            .call(&format!("/charts/{segment}"), &[("format", "json".to_string())])
            .await?;

        let label = Value::String(chart_type);
        let rows = list(&response, "values")
            .iter()
            .map(|point| {
                vec![
                    label.clone(),
                    field(point, "x"),
                    field(point, "y"),
                    utc_date(lookup(point, "x")),
                ]
            })
            .collect();

        Ok(Table::with_rows(CHART_COLUMNS, rows))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::testing::StubClient;

    #[tokio::test]
    async fn defaults_to_market_price() {
        let client = StubClient::new().with_response(
            "/charts/market-price",
            json!({"values": [{"x": 1_700_006_400, "y": 37_000.5}]}),
        );
        let table = ChartsTable.select(&client, &[]).await.unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(table.cell(0, "chart_type"), Some(&json!("market-price")));
        assert_eq!(table.cell(0, "date"), Some(&json!("2023-11-15")));
        assert_eq!(
            client.calls()[0].1,
            vec![("format", "json".to_string())]
        );
    }

    #[tokio::test]
    async fn named_chart_and_epoch_point() {
        let client = StubClient::new().with_response(
            "/charts/hash-rate",
            json!({"values": [{"x": 0, "y": 1}, {"y": 2}]}),
        );
        let table = ChartsTable
            .select(&client, &[Predicate::eq("chart_type", "hash-rate")])
            .await
            .unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.cell(0, "timestamp"), Some(&json!(0)));
        assert_eq!(table.cell(0, "date"), Some(&json!("1970-01-01")));
        assert_eq!(table.cell(1, "timestamp"), Some(&Value::Null));
        assert_eq!(table.cell(1, "date"), Some(&json!("1970-01-01")));
        assert_eq!(table.cell(1, "value"), Some(&json!(2)));
    }

    #[tokio::test]
    async fn missing_series_is_empty() {
        let client = StubClient::new().with_response("/charts/market-price", Value::Null);
        let table = ChartsTable.select(&client, &[]).await.unwrap();

        assert!(table.is_empty());
        assert_eq!(table.columns(), CHART_COLUMNS);
    }

    #[tokio::test]
    async fn chart_type_is_escaped_but_labelled_verbatim() {
        let client = StubClient::new().with_response(
            "/charts/..%2Fstats",
            json!({"values": [{"x": 86_400, "y": 1}]}),
        );
        let table = ChartsTable
            .select(&client, &[Predicate::eq("chart_type", "../stats")])
            .await
            .unwrap();

        assert_eq!(client.calls()[0].0, "/charts/..%2Fstats");
        assert_eq!(table.cell(0, "chart_type"), Some(&json!("../stats")));
        assert_eq!(table.cell(0, "date"), Some(&json!("1970-01-02")));
    }
}
