// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! `addresses` table
//!
//! `address = ?` reads the detailed address record, `address IN (...)` the
//! multi-address summary. Without either predicate the table is empty.

use api_client::{ApiClient, ApiError};
use serde_json::Value;
use shared_types::{Predicate, Table};
use tracing::debug;

use crate::{
    TableResolver,
    dispatch::{PredicateMatcher, path_segment, select_variant},
    fields::{field, is_truthy, list, time_bounds},
};

/// Columns of the `addresses` table
pub const ADDRESS_COLUMNS: &[&str] = &[
    "address",
    "hash160",
    "n_tx",
    "n_unredeemed",
    "total_received",
    "total_sent",
    "final_balance",
    "first_tx_time",
    "last_tx_time",
];

/// Separator the multi-address endpoint expects between addresses
const ACTIVE_SEPARATOR: &str = "|";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AddressQuery {
    Single,
    Set,
}

const RULES: &[(PredicateMatcher, AddressQuery)] = &[
    (PredicateMatcher::eq("address"), AddressQuery::Single),
    (PredicateMatcher::is_in("address"), AddressQuery::Set),
];

/// Resolver for the `addresses` table
#[derive(Debug, Clone, Copy, Default)]
pub struct AddressesTable;

impl TableResolver for AddressesTable {
    fn columns(&self) -> &'static [&'static str] {
        ADDRESS_COLUMNS
    }

    async fn select<C: ApiClient>(
        &self,
        client: &C,
        predicates: &[Predicate],
    ) -> Result<Table, ApiError> {
        let mut table = Table::new(ADDRESS_COLUMNS);

        match select_variant(RULES, predicates) {
            Some((AddressQuery::Single, value)) => {
                let Some(address) = path_segment(value) else {
                    debug!("address is not a path segment, returning empty table");
                    return Ok(table);
                };
                debug!(address, "resolving address");
                let record = client.call(&format!("/rawaddr/{address}"), &[]).await?;
                if is_truthy(&record) {
                    table.push_row(address_row(&record));
                }
            }
            Some((AddressQuery::Set, value)) => {
                let active = value.texts().join(ACTIVE_SEPARATOR);
                debug!(active, "resolving address set");
                let response = client.call("/multiaddr", &[("active", active)]).await?;
                for summary in list(&response, "addresses") {
                    table.push_row(summary_row(summary));
                }
            }
            None => debug!("no address predicate, returning empty table"),
        }

        Ok(table)
    }
}

fn address_row(record: &Value) -> Vec<Value> {
    let (first, last) = time_bounds(list(record, "txs"));
    vec![
        field(record, "address"),
        field(record, "hash160"),
        field(record, "n_tx"),
        field(record, "n_unredeemed"),
        field(record, "total_received"),
        field(record, "total_sent"),
        field(record, "final_balance"),
        first.unwrap_or(Value::Null),
        last.unwrap_or(Value::Null),
    ]
}

/// The multi-address shape carries no unspent count and no transaction list
fn summary_row(summary: &Value) -> Vec<Value> {
    vec![
        field(summary, "address"),
        field(summary, "hash160"),
        field(summary, "n_tx"),
        Value::Null,
        field(summary, "total_received"),
        field(summary, "total_sent"),
        field(summary, "final_balance"),
        Value::Null,
        Value::Null,
    ]
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::testing::StubClient;

    const ADDR: &str = "1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa";

    #[tokio::test]
    async fn single_address_scans_transaction_times() {
        let client = StubClient::new().with_response(
            &format!("/rawaddr/{ADDR}"),
            json!({
                "address": ADDR,
                "hash160": "62e907b15cbf27d5425399ebf6f0fb50ebb88f18",
                "n_tx": 3,
                "n_unredeemed": 1,
                "total_received": 5_000_000_000_i64,
                "total_sent": 0,
                "final_balance": 5_000_000_000_i64,
                "txs": [
                    {"time": 1_300_000_000},
                    {"time": 1_231_006_505},
                    {"hash": "no-time"},
                    {"time": 1_600_000_000}
                ]
            }),
        );
        let table = AddressesTable
            .select(&client, &[Predicate::eq("address", ADDR)])
            .await
            .unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(table.cell(0, "n_unredeemed"), Some(&json!(1)));
        assert_eq!(table.cell(0, "first_tx_time"), Some(&json!(1_231_006_505)));
        assert_eq!(table.cell(0, "last_tx_time"), Some(&json!(1_600_000_000)));
    }

    #[tokio::test]
    async fn empty_transaction_list_leaves_times_null() {
        let client = StubClient::new().with_response(
            &format!("/rawaddr/{ADDR}"),
            json!({"address": ADDR, "n_tx": 0, "txs": []}),
        );
        let table = AddressesTable
            .select(&client, &[Predicate::eq("address", ADDR)])
            .await
            .unwrap();

        assert_eq!(table.cell(0, "first_tx_time"), Some(&Value::Null));
        assert_eq!(table.cell(0, "last_tx_time"), Some(&Value::Null));
    }

    #[tokio::test]
    async fn address_set_joins_members_into_one_request() {
        let client = StubClient::new().with_response(
            "/multiaddr",
            json!({"addresses": [
                {"address": "addr1", "n_tx": 2, "final_balance": 10},
                {"address": "addr2", "n_tx": 5, "final_balance": 0}
            ]}),
        );
        let table = AddressesTable
            .select(&client, &[Predicate::is_in("address", vec!["addr1", "addr2"])])
            .await
            .unwrap();

        let calls = client.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].1, vec![("active", "addr1|addr2".to_string())]);

        assert_eq!(table.len(), 2);
        for row in 0..2 {
            for column in ["n_unredeemed", "first_tx_time", "last_tx_time"] {
                assert_eq!(table.cell(row, column), Some(&Value::Null), "{column}");
            }
        }
        assert_eq!(table.cell(1, "n_tx"), Some(&json!(5)));
    }

    #[tokio::test]
    async fn exact_address_beats_address_set() {
        let client = StubClient::new()
            .with_response(&format!("/rawaddr/{ADDR}"), json!({"address": ADDR}));
        let predicates = vec![
            Predicate::is_in("address", vec!["addr1", "addr2"]),
            Predicate::eq("address", ADDR),
        ];
        AddressesTable.select(&client, &predicates).await.unwrap();

        assert_eq!(client.calls()[0].0, format!("/rawaddr/{ADDR}"));
    }

    #[tokio::test]
    async fn scalar_membership_is_a_single_member_set() {
        let client = StubClient::new().with_response("/multiaddr", json!({"addresses": []}));
        AddressesTable
            .select(&client, &[Predicate::is_in("address", "addr1")])
            .await
            .unwrap();

        assert_eq!(client.calls()[0].1, vec![("active", "addr1".to_string())]);
    }

    #[tokio::test]
    async fn without_predicate_nothing_is_fetched() {
        let client = StubClient::new();
        let table = AddressesTable
            .select(&client, &[Predicate::eq("hash", "abc")])
            .await
            .unwrap();

        assert!(table.is_empty());
        assert_eq!(table.columns(), ADDRESS_COLUMNS);
        assert!(client.calls().is_empty());
    }
}
