// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! `blocks` table
//!
//! Predicate precedence: `hash = ?` > `height = ?` > `time = ?` > latest block.
//! The height and time endpoints only return block summaries, so those rows
//! carry height, hash and time and leave the detail columns null.

use api_client::{ApiClient, ApiError};
use serde_json::Value;
use shared_types::{Predicate, Table};
use tracing::debug;

use crate::{
    TableResolver,
    dispatch::{PredicateMatcher, path_segment, select_variant},
    fields::{count, field, is_truthy, list},
};

/// Columns of the `blocks` table
pub const BLOCK_COLUMNS: &[&str] = &[
    "height",
    "hash",
    "time",
    "main_chain",
    "size",
    "block_index",
    "received_time",
    "relayed_by",
    "n_tx",
    "prev_block",
    "mrkl_root",
    "version",
    "bits",
    "nonce",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockQuery {
    Hash,
    Height,
    Time,
}

const RULES: &[(PredicateMatcher, BlockQuery)] = &[
    (PredicateMatcher::eq("hash"), BlockQuery::Hash),
    (PredicateMatcher::eq("height"), BlockQuery::Height),
    (PredicateMatcher::eq("time"), BlockQuery::Time),
];

/// Resolver for the `blocks` table
#[derive(Debug, Clone, Copy, Default)]
pub struct BlocksTable;

impl TableResolver for BlocksTable {
    fn columns(&self) -> &'static [&'static str] {
        BLOCK_COLUMNS
    }

    async fn select<C: ApiClient>(
        &self,
        client: &C,
        predicates: &[Predicate],
    ) -> Result<Table, ApiError> {
        let mut table = Table::new(BLOCK_COLUMNS);

        match select_variant(RULES, predicates) {
            Some((query, value)) => {
                let Some(segment) = path_segment(value) else {
                    debug!(?query, "predicate value is not a path segment, returning empty table");
                    return Ok(table);
                };
                match query {
                    BlockQuery::Hash => {
                        debug!(hash = %segment, "resolving block by hash");
                        let block = client.call(&format!("/rawblock/{segment}"), &[]).await?;
                        if is_truthy(&block) {
                            table.push_row(detail_row(&block));
                        }
                    }
                    BlockQuery::Height => {
                        debug!(height = %segment, "resolving blocks at height");
                        let response = client
                            .call(&format!("/block-height/{segment}"), &[])
                            .await?;
                        for block in list(&response, "blocks") {
                            table.push_row(summary_row(block));
                        }
                    }
                    BlockQuery::Time => {
                        debug!(time = %segment, "resolving blocks for time bucket");
                        let response = client.call(&format!("/blocks/{segment}"), &[]).await?;
                        for block in list(&response, "blocks") {
                            table.push_row(summary_row(block));
                        }
                    }
                }
            }
            None => {
                debug!("resolving latest block");
                let block = client.call("/latestblock", &[]).await?;
                if is_truthy(&block) {
                    table.push_row(latest_row(&block));
                }
            }
        }

        Ok(table)
    }
}

/// Full block record; upstream names the version field `ver`
fn detail_row(block: &Value) -> Vec<Value> {
    vec![
        field(block, "height"),
        field(block, "hash"),
        field(block, "time"),
        field(block, "main_chain"),
        field(block, "size"),
        field(block, "block_index"),
        field(block, "received_time"),
        field(block, "relayed_by"),
        field(block, "n_tx"),
        field(block, "prev_block"),
        field(block, "mrkl_root"),
        field(block, "ver"),
        field(block, "bits"),
        field(block, "nonce"),
    ]
}

fn summary_row(block: &Value) -> Vec<Value> {
    let mut row = vec![
        field(block, "height"),
        field(block, "hash"),
        field(block, "time"),
        Value::Bool(true),
    ];
    row.resize(BLOCK_COLUMNS.len(), Value::Null);
    row
}

fn latest_row(block: &Value) -> Vec<Value> {
    vec![
        field(block, "height"),
        field(block, "hash"),
        field(block, "time"),
        Value::Bool(true),
        Value::Null,
        field(block, "block_index"),
        Value::Null,
        Value::Null,
        count(list(block, "txIndexes").len()),
        Value::Null,
        Value::Null,
        Value::Null,
        Value::Null,
        Value::Null,
    ]
}
