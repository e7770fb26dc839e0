// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use postledger::db;
use postledger::errors::LedgerError;
use postledger::ledger::{balance, journal, posting, registry, reports};
use postledger::models::{AccountType, NewLine};
use rusqlite::{params, Connection};
use rust_decimal::Decimal;

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn date(s: &str) -> chrono::NaiveDate {
    chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn setup() -> Connection {
    let conn = db::open_in_memory().unwrap();
    registry::create_account(&conn, "1000", "Cash", AccountType::Asset, None, true).unwrap();
    registry::create_account(&conn, "1500", "Equipment", AccountType::Asset, None, false).unwrap();
    registry::create_account(&conn, "2000", "Payables", AccountType::Liability, None, false)
        .unwrap();
    registry::create_account(&conn, "4000", "Revenue", AccountType::Revenue, None, false).unwrap();
    registry::create_account(&conn, "5000", "Expenses", AccountType::Expense, None, false).unwrap();
    conn
}

#[test]
fn trial_balance_always_balances() {
    let mut conn = setup();
    posting::post_payment(&mut conn, "b-1", dec("150.00"), "4000", "1000", date("2025-01-10"))
        .unwrap();
    posting::post_expense(&mut conn, "e-1", dec("40.00"), "5000", "2000", date("2025-01-12"))
        .unwrap();
    journal::create_entry(
        &mut conn,
        date("2025-01-20"),
        "Buy equipment with cash",
        None,
        &[
            NewLine::debit("1500", dec("75.00")),
            NewLine::credit("1000", dec("75.00")),
        ],
    )
    .unwrap();

    let rows = balance::trial_balance(&conn, Some(date("2025-01-31"))).unwrap();
    let debits: Decimal = rows.iter().map(|r| r.debit_total).sum();
    let credits: Decimal = rows.iter().map(|r| r.credit_total).sum();
    assert_eq!(debits, credits);
    assert_eq!(debits, dec("265.00"));

    // Only accounts with activity appear
    assert!(rows.iter().all(|r| r.code != "9999"));
    assert_eq!(rows.len(), 5);
}

#[test]
fn trial_balance_respects_as_of_date() {
    let mut conn = setup();
    posting::post_payment(&mut conn, "b-1", dec("100"), "4000", "1000", date("2025-01-10"))
        .unwrap();
    posting::post_payment(&mut conn, "b-2", dec("50"), "4000", "1000", date("2025-02-10"))
        .unwrap();

    let rows = balance::trial_balance(&conn, Some(date("2025-01-31"))).unwrap();
    let cash = rows.iter().find(|r| r.code == "1000").unwrap();
    assert_eq!(cash.debit_total, dec("100"));
}

#[test]
fn corrupted_books_are_surfaced_not_hidden() {
    let mut conn = setup();
    posting::post_payment(&mut conn, "b-1", dec("100"), "4000", "1000", date("2025-01-10"))
        .unwrap();

    // Sneak an unbalanced line past the engine, straight into the store
    let account_id: i64 = conn
        .query_row("SELECT id FROM accounts WHERE code='1000'", [], |r| r.get(0))
        .unwrap();
    conn.execute(
        "INSERT INTO journal_entries(date, description) VALUES ('2025-01-11', 'tampered')",
        [],
    )
    .unwrap();
    let entry_id = conn.last_insert_rowid();
    conn.execute(
        "INSERT INTO journal_lines(entry_id, account_id, amount, side)
         VALUES (?1, ?2, '13.37', 'debit')",
        params![entry_id, account_id],
    )
    .unwrap();

    let err = balance::trial_balance(&conn, Some(date("2025-01-31"))).unwrap_err();
    assert!(matches!(err, LedgerError::ConsistencyViolation { .. }));
}

#[test]
fn profit_and_loss_over_period() {
    let mut conn = setup();
    posting::post_payment(&mut conn, "b-1", dec("500"), "4000", "1000", date("2025-03-05"))
        .unwrap();
    posting::post_expense(&mut conn, "e-1", dec("120"), "5000", "2000", date("2025-03-10"))
        .unwrap();
    // Outside the window
    posting::post_payment(&mut conn, "b-2", dec("999"), "4000", "1000", date("2025-04-05"))
        .unwrap();

    let pnl = reports::profit_and_loss(&conn, date("2025-03-01"), date("2025-03-31")).unwrap();
    assert_eq!(pnl.revenue_total, dec("500"));
    assert_eq!(pnl.expense_total, dec("120"));
    assert_eq!(pnl.net_income, dec("380"));
}

#[test]
fn cash_flow_only_counts_cash_accounts() {
    let mut conn = setup();
    // 150 into cash, 75 out of cash into equipment (non-cash asset)
    posting::post_payment(&mut conn, "b-1", dec("150"), "4000", "1000", date("2025-05-01"))
        .unwrap();
    journal::create_entry(
        &mut conn,
        date("2025-05-02"),
        "Buy equipment",
        None,
        &[
            NewLine::debit("1500", dec("75")),
            NewLine::credit("1000", dec("75")),
        ],
    )
    .unwrap();

    let cf = reports::cash_flow(&conn, date("2025-05-01"), date("2025-05-31")).unwrap();
    assert_eq!(cf.inflows, dec("150"));
    assert_eq!(cf.outflows, dec("75"));
    assert_eq!(cf.net, dec("75"));
}

#[test]
fn reversal_cancels_out_in_reports() {
    let mut conn = setup();
    let before = balance::trial_balance(&conn, Some(date("2025-06-30"))).unwrap();
    assert!(before.is_empty());

    let entry =
        posting::post_payment(&mut conn, "b-1", dec("88"), "4000", "1000", date("2025-06-01"))
            .unwrap();
    journal::reverse_entry(&mut conn, entry.entry_no).unwrap();

    let pnl = reports::profit_and_loss(&conn, date("2025-06-01"), date("2025-06-30")).unwrap();
    assert_eq!(pnl.net_income, dec("0"));
    assert_eq!(
        balance::balance(&conn, "1000", Some(date("2025-06-30"))).unwrap(),
        dec("0")
    );
}
