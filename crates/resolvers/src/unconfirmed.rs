// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! `unconfirmed_transactions` table: the whole mempool snapshot, uncapped

use api_client::{ApiClient, ApiError};
use serde_json::Value;
use shared_types::{Predicate, Table};
use tracing::debug;

use crate::{
    TableResolver,
    fields::{as_f64, count, fee_per_byte, field, list, lookup, number, total_input, total_output},
    transactions::UNCONFIRMED_ENDPOINT,
};

/// Columns of the `unconfirmed_transactions` table
pub const UNCONFIRMED_COLUMNS: &[&str] = &[
    "hash",
    "size",
    "time",
    "fee",
    "inputs_count",
    "outputs_count",
    "total_input_value",
    "total_output_value",
    "fee_per_byte",
];

/// Resolver for the `unconfirmed_transactions` table
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfirmedTransactionsTable;

impl TableResolver for UnconfirmedTransactionsTable {
    fn columns(&self) -> &'static [&'static str] {
        UNCONFIRMED_COLUMNS
    }

    async fn select<C: ApiClient>(
        &self,
        client: &C,
        _predicates: &[Predicate],
    ) -> Result<Table, ApiError> {
        debug!("resolving mempool snapshot");
        let response = client
            .call(UNCONFIRMED_ENDPOINT, &[("format", "json".to_string())])
            .await?;

        let rows = list(&response, "txs").iter().map(mempool_row).collect();
        Ok(Table::with_rows(UNCONFIRMED_COLUMNS, rows))
    }
}

fn mempool_row(tx: &Value) -> Vec<Value> {
    let fee = as_f64(lookup(tx, "fee")).unwrap_or(0.0);
    let size = as_f64(lookup(tx, "size")).unwrap_or(1.0);
    let fee_cell = match lookup(tx, "fee") {
        Value::Null => Value::from(0),
        present => present.clone(),
    };

    vec![
        field(tx, "hash"),
        field(tx, "size"),
        field(tx, "time"),
        fee_cell,
        count(list(tx, "inputs").len()),
        count(list(tx, "out").len()),
        number(total_input(tx)),
        number(total_output(tx)),
        number(fee_per_byte(fee, size)),
    ]
}
