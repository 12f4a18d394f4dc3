// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! # Table resolvers
//!
//! Each Blockchain.com resource is exposed as a table with a fixed column list.
//! A resolver inspects the extracted filter predicates, picks exactly one
//! upstream endpoint through a precedence-ordered rule list, performs a single
//! call through an [`ApiClient`] and normalizes the payload into rows.
//!
//! [`BlockchainHandler`] ties the six resolvers to one client and carries the
//! connection state.

use std::future::Future;

use api_client::{ApiClient, ApiError};
use shared_types::{Predicate, Table};

pub mod addresses;
pub mod blocks;
pub mod charts;
pub mod dispatch;
pub mod fields;
pub mod handler;
pub mod stats;
pub mod transactions;
pub mod unconfirmed;

#[cfg(test)]
mod testing;

pub use addresses::{ADDRESS_COLUMNS, AddressesTable};
pub use blocks::{BLOCK_COLUMNS, BlocksTable};
pub use charts::{CHART_COLUMNS, ChartsTable, DEFAULT_CHART_TYPE};
pub use dispatch::{PredicateMatcher, select_variant};
pub use handler::BlockchainHandler;
pub use stats::{STATS_COLUMNS, StatsTable};
pub use transactions::{TRANSACTION_COLUMNS, TransactionsTable, UNCONFIRMED_ROW_LIMIT};
pub use unconfirmed::{UNCONFIRMED_COLUMNS, UnconfirmedTransactionsTable};

/// A table backed by one family of upstream endpoints
///
/// Implementations never fail on missing payload members; only upstream
/// errors surface through the returned `Result`. Every returned [`Table`]
/// carries exactly [`TableResolver::columns`], including when it is empty.
pub trait TableResolver: std::fmt::Debug + Send + Sync {
    /// Declared column list
    fn columns(&self) -> &'static [&'static str];

    /// Resolve the predicates into rows with at most one upstream call
    fn select<C: ApiClient>(
        &self,
        client: &C,
        predicates: &[Predicate],
    ) -> impl Future<Output = Result<Table, ApiError>> + Send;
}
