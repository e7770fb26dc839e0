// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Budget Tracker: period allocations per account compared against actual
//! postings over the same window.

use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashSet;

use crate::errors::{LedgerError, Result};
use crate::ledger::{balance, parse_stored_amount, registry};
use crate::models::{Budget, BudgetLine, VarianceRow};

/// Create a budget with its lines in one transaction. Each line must name a
/// distinct, existing account; the period must be non-empty.
pub fn create_budget(
    conn: &mut Connection,
    name: &str,
    start: NaiveDate,
    end: NaiveDate,
    currency: &str,
    lines: &[BudgetLine],
) -> Result<Budget> {
    if end <= start {
        return Err(LedgerError::InvalidPeriod);
    }
    let mut seen: HashSet<&str> = HashSet::new();
    for line in lines {
        if !seen.insert(line.account_code.as_str()) {
            return Err(LedgerError::DuplicateAccountInBudget(
                line.account_code.clone(),
            ));
        }
        if line.amount < rust_decimal::Decimal::ZERO {
            return Err(LedgerError::InvalidAmount(line.amount));
        }
    }

    let tx = conn.transaction()?;
    tx.execute(
        "INSERT INTO budgets(name, start_date, end_date, currency) VALUES (?1,?2,?3,?4)",
        params![
            name,
            start.to_string(),
            end.to_string(),
            currency.to_uppercase()
        ],
    )?;
    let budget_id = tx.last_insert_rowid();
    for line in lines {
        let account = registry::get_account(&tx, &line.account_code)?;
        tx.execute(
            "INSERT INTO budget_lines(budget_id, account_id, amount) VALUES (?1,?2,?3)",
            params![budget_id, account.id, line.amount.to_string()],
        )?;
    }
    tx.commit()?;
    get_budget(conn, name)
}

pub fn get_budget(conn: &Connection, name: &str) -> Result<Budget> {
    let header = conn
        .query_row(
            "SELECT id, name, start_date, end_date, currency FROM budgets WHERE name=?1",
            params![name],
            |r| {
                Ok((
                    r.get::<_, i64>(0)?,
                    r.get::<_, String>(1)?,
                    r.get::<_, String>(2)?,
                    r.get::<_, String>(3)?,
                    r.get::<_, String>(4)?,
                ))
            },
        )
        .optional()?
        .ok_or_else(|| LedgerError::BudgetNotFound(name.to_string()))?;
    let (id, name, start_s, end_s, currency) = header;

    let parse = |col: &'static str, s: &str| -> Result<NaiveDate> {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| LedgerError::CorruptValue {
            column: col,
            value: s.to_string(),
        })
    };
    let start_date = parse("budgets.start_date", &start_s)?;
    let end_date = parse("budgets.end_date", &end_s)?;

    let mut stmt = conn.prepare(
        "SELECT a.code, b.amount FROM budget_lines b
         JOIN accounts a ON b.account_id=a.id
         WHERE b.budget_id=?1 ORDER BY a.code",
    )?;
    let rows = stmt.query_map(params![id], |r| {
        Ok((r.get::<_, String>(0)?, r.get::<_, String>(1)?))
    })?;
    let mut lines = Vec::new();
    for row in rows {
        let (code, amount_s) = row?;
        lines.push(BudgetLine {
            account_code: code,
            amount: parse_stored_amount("budget_lines.amount", &amount_s)?,
        });
    }

    Ok(Budget {
        id,
        name,
        start_date,
        end_date,
        currency,
        lines,
    })
}

pub fn list_budgets(conn: &Connection) -> Result<Vec<Budget>> {
    let mut stmt = conn.prepare("SELECT name FROM budgets ORDER BY start_date DESC, name")?;
    let rows = stmt.query_map([], |r| r.get::<_, String>(0))?;
    let mut out = Vec::new();
    for row in rows {
        out.push(get_budget(conn, &row?)?);
    }
    Ok(out)
}

/// Allocated vs. actual per budget line. Actuals come from the balance
/// aggregator restricted to the budget period; variance = actual - allocated.
pub fn variance(conn: &Connection, name: &str) -> Result<Vec<VarianceRow>> {
    let budget = get_budget(conn, name)?;
    let mut out = Vec::with_capacity(budget.lines.len());
    for line in &budget.lines {
        let account = registry::get_account(conn, &line.account_code)?;
        let actual =
            balance::balance_between(conn, &line.account_code, budget.start_date, budget.end_date)?;
        out.push(VarianceRow {
            code: account.code,
            name: account.name,
            allocated: line.amount,
            actual,
            variance: actual - line.amount,
        });
    }
    Ok(out)
}
