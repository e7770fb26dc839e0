// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Report Generator: pure derivations over the balance aggregator. These
//! functions only read; they never create journal entries.

use chrono::NaiveDate;
use rusqlite::{params, Connection};
use rust_decimal::Decimal;

use crate::errors::Result;
use crate::ledger::balance;
use crate::models::{CashFlow, ProfitAndLoss};

/// Revenue and expense totals over the period and their difference.
pub fn profit_and_loss(conn: &Connection, start: NaiveDate, end: NaiveDate) -> Result<ProfitAndLoss> {
    let revenue_total = type_total(conn, "revenue", start, end)?;
    let expense_total = type_total(conn, "expense", start, end)?;
    Ok(ProfitAndLoss {
        revenue_total,
        expense_total,
        net_income: revenue_total - expense_total,
    })
}

fn type_total(
    conn: &Connection,
    account_type: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Decimal> {
    let mut stmt = conn.prepare("SELECT code FROM accounts WHERE type=?1 ORDER BY code")?;
    let rows = stmt.query_map(params![account_type], |r| r.get::<_, String>(0))?;
    let mut total = Decimal::ZERO;
    for row in rows {
        total += balance::balance_between(conn, &row?, start, end)?;
    }
    Ok(total)
}

/// Cash movement over the period, restricted to asset accounts flagged as
/// cash/bank. Debits to those accounts are inflows, credits are outflows.
pub fn cash_flow(conn: &Connection, start: NaiveDate, end: NaiveDate) -> Result<CashFlow> {
    let mut stmt =
        conn.prepare("SELECT id FROM accounts WHERE type='asset' AND is_cash=1 ORDER BY code")?;
    let rows = stmt.query_map([], |r| r.get::<_, i64>(0))?;
    let mut inflows = Decimal::ZERO;
    let mut outflows = Decimal::ZERO;
    for row in rows {
        let (debits, credits) = balance::sums(conn, row?, Some(start), Some(end))?;
        inflows += debits;
        outflows += credits;
    }
    Ok(CashFlow {
        inflows,
        outflows,
        net: inflows - outflows,
    })
}
