// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The ledger core: chart of accounts, append-only journal, event posting,
//! balance aggregation, budgets, and derived reports. All functions are
//! explicit input/output services over a `rusqlite::Connection`; every
//! multi-row write happens inside a single store transaction.

pub mod balance;
pub mod budget;
pub mod journal;
pub mod posting;
pub mod registry;
pub mod reports;

use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;

use crate::errors::{LedgerError, Result};

/// Explicit configuration for the posting and reporting services. Loaded
/// from the settings table rather than carried as ambient global state.
#[derive(Debug, Clone)]
pub struct Config {
    pub base_currency: String,
}

impl Config {
    pub fn load(conn: &Connection) -> Result<Self> {
        let v: Option<String> = conn
            .query_row(
                "SELECT value FROM settings WHERE key='base_currency'",
                [],
                |r| r.get(0),
            )
            .optional()?;
        Ok(Config {
            base_currency: v.unwrap_or_else(|| "QAR".to_string()),
        })
    }
}

pub fn set_base_currency(conn: &Connection, ccy: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES('base_currency', ?1)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![ccy.to_uppercase()],
    )?;
    Ok(())
}

/// Parse a decimal stored as TEXT. Amounts are written by this crate only,
/// so a parse failure means the store was tampered with or corrupted.
pub(crate) fn parse_stored_amount(column: &'static str, s: &str) -> Result<Decimal> {
    s.parse::<Decimal>().map_err(|_| LedgerError::CorruptValue {
        column,
        value: s.to_string(),
    })
}
