// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Blockchain.com data API client
//!
//! This crate provides the `ApiClient` implementation that every table resolver
//! goes through to reach the upstream provider.
//!
//! # Behaviour
//!
//! - **Host routing**: paths under `/charts/` always go to `https://api.blockchain.info`,
//!   everything else goes to the configured base URL
//! - **Shared parameters**: `cors=true` is appended to every request when enabled
//! - **Static headers**: a client identifier and `Accept: application/json`
//! - **No retries**: a failed call surfaces immediately as an error
//! - **Testing Support**: integration tests use wiremock for HTTP simulation

pub mod client;
pub mod config;

pub use client::*;
pub use config::*;
