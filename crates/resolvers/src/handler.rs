// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Table registry bound to one upstream client

use std::sync::atomic::{AtomicBool, Ordering};

use api_client::{ApiClient, ApiError, ConnectionStatus};
use shared_types::{Predicate, ResourceKind, Table};
use tracing::{info, warn};

use crate::{
    AddressesTable, BlocksTable, ChartsTable, StatsTable, TableResolver, TransactionsTable,
    UnconfirmedTransactionsTable,
};

/// Serves the six Blockchain.com tables through a single client
///
/// The client configuration is fixed at construction. The only mutable state
/// is the outcome of the last connection check.
#[derive(Debug)]
pub struct BlockchainHandler<C> {
    client: C,
    connected: AtomicBool,
}

impl<C: ApiClient> BlockchainHandler<C> {
    /// Create a handler; no request is made until [`Self::connect`] or a query
    pub fn new(client: C) -> Self {
        Self {
            client,
            connected: AtomicBool::new(false),
        }
    }

    /// Underlying client
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Registered tables
    pub fn tables(&self) -> &'static [ResourceKind] {
        ResourceKind::all()
    }

    /// Declared columns of a table
    pub fn columns(&self, kind: ResourceKind) -> &'static [&'static str] {
        match kind {
            ResourceKind::Blocks => BlocksTable.columns(),
            ResourceKind::Transactions => TransactionsTable.columns(),
            ResourceKind::Addresses => AddressesTable.columns(),
            ResourceKind::Charts => ChartsTable.columns(),
            ResourceKind::Stats => StatsTable.columns(),
            ResourceKind::UnconfirmedTransactions => UnconfirmedTransactionsTable.columns(),
        }
    }

    /// Resolve predicates against a table
    pub async fn select(
        &self,
        kind: ResourceKind,
        predicates: &[Predicate],
    ) -> Result<Table, ApiError> {
        match kind {
            ResourceKind::Blocks => BlocksTable.select(&self.client, predicates).await,
            ResourceKind::Transactions => {
                TransactionsTable.select(&self.client, predicates).await
            }
            ResourceKind::Addresses => AddressesTable.select(&self.client, predicates).await,
            ResourceKind::Charts => ChartsTable.select(&self.client, predicates).await,
            ResourceKind::Stats => StatsTable.select(&self.client, predicates).await,
            ResourceKind::UnconfirmedTransactions => {
                UnconfirmedTransactionsTable
                    .select(&self.client, predicates)
                    .await
            }
        }
    }

    /// Check the upstream and record the outcome
    ///
    /// Check failures are reported in the returned status, never raised.
    pub async fn connect(&self) -> ConnectionStatus {
        let status = match self.client.health_check().await {
            Ok(health) => ConnectionStatus::from(&health),
            Err(e) => ConnectionStatus::failed(format!("Connection failed: {e}")),
        };

        if status.success {
            info!(client = self.client.name(), "connected to upstream");
        } else {
            warn!(
                client = self.client.name(),
                reason = status.error_message.as_deref().unwrap_or_default(),
                "upstream connection check failed"
            );
        }

        self.connected.store(status.success, Ordering::Release);
        status
    }

    /// Re-run the connection check
    pub async fn check_connection(&self) -> ConnectionStatus {
        self.connect().await
    }

    /// Outcome of the last check; false before the first one
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }
}
