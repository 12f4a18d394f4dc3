// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Queryable resource identifiers
//!
//! Each variant names one table exposed to the host query engine.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use utoipa::ToSchema;

/// Tables exposed by the adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ToSchema)]
#[schema(rename_all = "snake_case", example = "blocks")]
pub enum ResourceKind {
    /// Bitcoin blocks
    Blocks,
    /// Confirmed or mempool transactions
    Transactions,
    /// Address balances and activity
    Addresses,
    /// Chart time series
    Charts,
    /// Network statistics snapshot
    Stats,
    /// Mempool transactions with fee rates
    UnconfirmedTransactions,
}

impl ResourceKind {
    /// Returns the table name used in queries
    pub const fn name(self) -> &'static str {
        match self {
            Self::Blocks => "blocks",
            Self::Transactions => "transactions",
            Self::Addresses => "addresses",
            Self::Charts => "charts",
            Self::Stats => "stats",
            Self::UnconfirmedTransactions => "unconfirmed_transactions",
        }
    }

    /// Returns all tables in registration order
    pub const fn all() -> &'static [Self] {
        &[
            Self::Blocks,
            Self::Transactions,
            Self::Addresses,
            Self::Charts,
            Self::Stats,
            Self::UnconfirmedTransactions,
        ]
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ResourceKind {
    type Err = ResourceParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|kind| kind.name() == name)
            .ok_or_else(|| ResourceParseError(s.to_string()))
    }
}

impl Serialize for ResourceKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for ResourceKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

/// Error returned when a table name is not recognised
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "unknown table: {0}. Available tables are: blocks, transactions, addresses, charts, stats, unconfirmed_transactions"
)]
pub struct ResourceParseError(pub String);
