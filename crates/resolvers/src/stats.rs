// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! `stats` table: a single snapshot of network statistics

use api_client::{ApiClient, ApiError};
use chrono::Utc;
use serde_json::Value;
use shared_types::{Predicate, Table};
use tracing::debug;

use crate::{
    TableResolver,
    fields::{field, is_truthy},
};

/// Upstream statistics copied verbatim into the row
const STAT_FIELDS: &[&str] = &[
    "market_price_usd",
    "hash_rate",
    "total_fees_btc",
    "n_btc_mined",
    "n_tx",
    "n_blocks_mined",
    "minutes_between_blocks",
    "totalbc",
    "n_blocks_total",
    "estimated_transaction_volume_usd",
    "blocks_size",
    "miners_revenue_usd",
    "nextretarget",
    "difficulty",
    "estimated_btc_sent",
    "miners_revenue_btc",
    "total_btc_sent",
    "trade_volume_btc",
    "trade_volume_usd",
];

/// Columns of the `stats` table; `timestamp` is the resolution time
pub const STATS_COLUMNS: &[&str] = &[
    "market_price_usd",
    "hash_rate",
    "total_fees_btc",
    "n_btc_mined",
    "n_tx",
    "n_blocks_mined",
    "minutes_between_blocks",
    "totalbc",
    "n_blocks_total",
    "estimated_transaction_volume_usd",
    "blocks_size",
    "miners_revenue_usd",
    "nextretarget",
    "difficulty",
    "estimated_btc_sent",
    "miners_revenue_btc",
    "total_btc_sent",
    "trade_volume_btc",
    "trade_volume_usd",
    "timestamp",
];

/// Resolver for the `stats` table
#[derive(Debug, Clone, Copy, Default)]
pub struct StatsTable;

impl TableResolver for StatsTable {
    fn columns(&self) -> &'static [&'static str] {
        STATS_COLUMNS
    }

    async fn select<C: ApiClient>(
        &self,
        client: &C,
        _predicates: &[Predicate],
    ) -> Result<Table, ApiError> {
        debug!("resolving network stats");
        let stats = client
            .call("/stats", &[("format", "json".to_string())])
            .await?;

        let mut table = Table::new(STATS_COLUMNS);
        if is_truthy(&stats) {
            let mut row: Vec<Value> = STAT_FIELDS.iter().map(|key| field(&stats, key)).collect();
            row.push(Value::from(Utc::now().timestamp()));
            table.push_row(row);
        }
        Ok(table)
    }
}
