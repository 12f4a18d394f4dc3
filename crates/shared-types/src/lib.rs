// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Shared types for the blockchain table adapter
//!
//! This crate provides the data model that is shared across the workspace:
//! resource names, filter predicates and the fixed-column tables produced
//! by the resolvers, avoiding circular dependencies between crates.

pub mod filter;
pub mod resource;
pub mod table;

pub use filter::{
    FilterExpr, FilterValue, Operator, OperatorParseError, Predicate,
    extract_comparison_conditions,
};
pub use resource::{ResourceKind, ResourceParseError};
pub use table::Table;
