// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Fixed-column result tables

use serde::Serialize;
use serde_json::Value;

/// Rows of nullable JSON cells under a fixed column list
///
/// The column list is declared by the resolver that produced the table and is
/// identical for every endpoint variant, including empty results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    columns: &'static [&'static str],
    rows: Vec<Vec<Value>>,
}

impl Table {
    /// Create an empty table with the given columns
    pub fn new(columns: &'static [&'static str]) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Create a table from pre-built rows
    pub fn with_rows(columns: &'static [&'static str], rows: Vec<Vec<Value>>) -> Self {
        let mut table = Self::new(columns);
        for row in rows {
            table.push_row(row);
        }
        table
    }

    /// Append a row, null-padded or truncated to the column count
    pub fn push_row(&mut self, mut row: Vec<Value>) {
        row.resize(self.columns.len(), Value::Null);
        self.rows.push(row);
    }

    /// Declared column names
    pub fn columns(&self) -> &'static [&'static str] {
        self.columns
    }

    /// All rows
    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell at `row` under `column`, if both exist
    pub fn cell(&self, row: usize, column: &str) -> Option<&Value> {
        let index = self.columns.iter().position(|c| *c == column)?;
        self.rows.get(row)?.get(index)
    }

    /// Consume the table, returning its rows
    pub fn into_rows(self) -> Vec<Vec<Value>> {
        self.rows
    }
}
