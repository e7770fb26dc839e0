// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Balance Aggregator: derives account balances from the append-only
//! journal. Balances are commutative over the set of posted lines; only the
//! as-of date view depends on entry dates, never on posting order.

use chrono::NaiveDate;
use rusqlite::{params, Connection};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::errors::{LedgerError, Result};
use crate::ledger::{parse_stored_amount, registry};
use crate::models::{AccountType, Side, TrialBalanceRow};

/// Debit and credit totals for one account over an optional date window
/// (both bounds inclusive).
pub(crate) fn sums(
    conn: &Connection,
    account_id: i64,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<(Decimal, Decimal)> {
    let mut sql = String::from(
        "SELECT l.amount, l.side FROM journal_lines l
         JOIN journal_entries e ON l.entry_id=e.id
         WHERE l.account_id=?1",
    );
    let mut params_vec: Vec<String> = Vec::new();
    if let Some(s) = start {
        sql.push_str(&format!(" AND e.date>=?{}", params_vec.len() + 2));
        params_vec.push(s.to_string());
    }
    if let Some(e) = end {
        sql.push_str(&format!(" AND e.date<=?{}", params_vec.len() + 2));
        params_vec.push(e.to_string());
    }

    let mut stmt = conn.prepare(&sql)?;
    let mut binds: Vec<&dyn rusqlite::ToSql> = vec![&account_id];
    for p in &params_vec {
        binds.push(p);
    }
    let mut rows = stmt.query(rusqlite::params_from_iter(binds))?;

    let mut debits = Decimal::ZERO;
    let mut credits = Decimal::ZERO;
    while let Some(r) = rows.next()? {
        let amount_s: String = r.get(0)?;
        let side_s: String = r.get(1)?;
        let amount = parse_stored_amount("journal_lines.amount", &amount_s)?;
        match Side::parse(&side_s)? {
            Side::Debit => debits += amount,
            Side::Credit => credits += amount,
        }
    }
    Ok((debits, credits))
}

fn signed(account_type: AccountType, debits: Decimal, credits: Decimal) -> Decimal {
    if account_type.debit_normal() {
        debits - credits
    } else {
        credits - debits
    }
}

/// Point-in-time balance using the standard sign convention: Asset/Expense
/// report debit-positive, Liability/Equity/Revenue credit-positive.
/// `as_of` defaults to today.
pub fn balance(conn: &Connection, code: &str, as_of: Option<NaiveDate>) -> Result<Decimal> {
    let account = registry::get_account(conn, code)?;
    let end = as_of.unwrap_or_else(|| chrono::Utc::now().date_naive());
    let (debits, credits) = sums(conn, account.id, None, Some(end))?;
    Ok(signed(account.account_type, debits, credits))
}

/// Balance restricted to a period, used by budget variance and the P&L.
pub fn balance_between(
    conn: &Connection,
    code: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Decimal> {
    let account = registry::get_account(conn, code)?;
    let (debits, credits) = sums(conn, account.id, Some(start), Some(end))?;
    Ok(signed(account.account_type, debits, credits))
}

/// One row per account with activity up to `as_of`, ordered by code. The
/// books must balance: a debit/credit total mismatch is a prior invariant
/// breach and is surfaced instead of silently returning wrong totals.
pub fn trial_balance(conn: &Connection, as_of: Option<NaiveDate>) -> Result<Vec<TrialBalanceRow>> {
    let end = as_of.unwrap_or_else(|| chrono::Utc::now().date_naive());
    let mut stmt = conn.prepare(
        "SELECT a.code, a.name, l.amount, l.side
         FROM journal_lines l
         JOIN accounts a ON l.account_id=a.id
         JOIN journal_entries e ON l.entry_id=e.id
         WHERE e.date<=?1",
    )?;
    let mut rows = stmt.query(params![end.to_string()])?;

    let mut agg: BTreeMap<String, (String, Decimal, Decimal)> = BTreeMap::new();
    while let Some(r) = rows.next()? {
        let code: String = r.get(0)?;
        let name: String = r.get(1)?;
        let amount = parse_stored_amount("journal_lines.amount", &r.get::<_, String>(2)?)?;
        let side = Side::parse(&r.get::<_, String>(3)?)?;
        let entry = agg
            .entry(code)
            .or_insert((name, Decimal::ZERO, Decimal::ZERO));
        match side {
            Side::Debit => entry.1 += amount,
            Side::Credit => entry.2 += amount,
        }
    }

    let mut debit_total = Decimal::ZERO;
    let mut credit_total = Decimal::ZERO;
    let mut out = Vec::with_capacity(agg.len());
    for (code, (name, debits, credits)) in agg {
        debit_total += debits;
        credit_total += credits;
        out.push(TrialBalanceRow {
            code,
            name,
            debit_total: debits,
            credit_total: credits,
        });
    }
    if debit_total != credit_total {
        return Err(LedgerError::ConsistencyViolation {
            debits: debit_total,
            credits: credit_total,
        });
    }
    Ok(out)
}
