// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! `transactions` table
//!
//! `hash = ?` fetches one raw transaction; without it the table shows the
//! first [`UNCONFIRMED_ROW_LIMIT`] mempool transactions.

use api_client::{ApiClient, ApiError};
use serde_json::Value;
use shared_types::{Predicate, Table};
use tracing::debug;

use crate::{
    TableResolver,
    dispatch::{PredicateMatcher, path_segment, select_variant},
    fields::{count, field, is_truthy, list, number, total_input, total_output},
};

/// Columns of the `transactions` table
pub const TRANSACTION_COLUMNS: &[&str] = &[
    "hash",
    "size",
    "block_height",
    "block_index",
    "time",
    "tx_index",
    "version",
    "lock_time",
    "vin_sz",
    "vout_sz",
    "fee",
    "relayed_by",
    "inputs_count",
    "outputs_count",
    "total_input",
    "total_output",
];

/// Maximum rows returned when listing unconfirmed transactions
pub const UNCONFIRMED_ROW_LIMIT: usize = 50;

pub(crate) const UNCONFIRMED_ENDPOINT: &str = "/unconfirmed-transactions";

const RULES: &[(PredicateMatcher, ())] = &[(PredicateMatcher::eq("hash"), ())];

/// Resolver for the `transactions` table
#[derive(Debug, Clone, Copy, Default)]
pub struct TransactionsTable;

impl TableResolver for TransactionsTable {
    fn columns(&self) -> &'static [&'static str] {
        TRANSACTION_COLUMNS
    }

    async fn select<C: ApiClient>(
        &self,
        client: &C,
        predicates: &[Predicate],
    ) -> Result<Table, ApiError> {
        let mut table = Table::new(TRANSACTION_COLUMNS);

        if let Some(((), value)) = select_variant(RULES, predicates) {
            let Some(hash) = path_segment(value) else {
                debug!("transaction hash is not a path segment, returning empty table");
                return Ok(table);
            };
            debug!(hash, "resolving transaction by hash");
            let tx = client.call(&format!("/rawtx/{hash}"), &[]).await?;
            if is_truthy(&tx) {
                table.push_row(transaction_row(&tx));
            }
        } else {
            debug!("resolving unconfirmed transactions");
            let response = client.call(UNCONFIRMED_ENDPOINT, &[]).await?;
            for tx in list(&response, "txs").iter().take(UNCONFIRMED_ROW_LIMIT) {
                table.push_row(transaction_row(tx));
            }
        }

        Ok(table)
    }
}

fn transaction_row(tx: &Value) -> Vec<Value> {
    vec![
        field(tx, "hash"),
        field(tx, "size"),
        field(tx, "block_height"),
        field(tx, "block_index"),
        field(tx, "time"),
        field(tx, "tx_index"),
        field(tx, "ver"),
        field(tx, "lock_time"),
        field(tx, "vin_sz"),
        field(tx, "vout_sz"),
        field(tx, "fee"),
        field(tx, "relayed_by"),
        count(list(tx, "inputs").len()),
        count(list(tx, "out").len()),
        number(total_input(tx)),
        number(total_output(tx)),
    ]
}
