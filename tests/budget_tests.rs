// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use postledger::db;
use postledger::errors::LedgerError;
use postledger::ledger::{budget, posting, registry};
use postledger::models::{AccountType, BudgetLine};
use rusqlite::Connection;
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
    registry::create_account(&conn, "4000", "Revenue", AccountType::Revenue, None, false).unwrap();
    registry::create_account(&conn, "5200", "Marketing", AccountType::Expense, None, false)
        .unwrap();
    conn
}

fn line(code: &str, amount: &str) -> BudgetLine {
    BudgetLine {
        account_code: code.to_string(),
        amount: dec(amount),
    }
}

#[test]
fn budget_roundtrip() {
    let mut conn = setup();
    let created = budget::create_budget(
        &mut conn,
        "Q1-Marketing",
        date("2025-01-01"),
        date("2025-03-31"),
        "QAR",
        &[line("5200", "10000")],
    )
    .unwrap();
    assert_eq!(created.lines.len(), 1);

    let loaded = budget::get_budget(&conn, "Q1-Marketing").unwrap();
    assert_eq!(loaded.start_date, date("2025-01-01"));
    assert_eq!(loaded.currency, "QAR");
    assert_eq!(loaded.lines[0].amount, dec("10000"));
}

#[test]
fn empty_period_rejected() {
    let mut conn = setup();
    let err = budget::create_budget(
        &mut conn,
        "Backwards",
        date("2025-03-31"),
        date("2025-03-31"),
        "QAR",
        &[line("5200", "100")],
    )
    .unwrap_err();
    assert!(matches!(err, LedgerError::InvalidPeriod));
}

#[test]
fn duplicate_account_rejected() {
    let mut conn = setup();
    let err = budget::create_budget(
        &mut conn,
        "Doubled",
        date("2025-01-01"),
        date("2025-03-31"),
        "QAR",
        &[line("5200", "100"), line("5200", "200")],
    )
    .unwrap_err();
    assert!(matches!(err, LedgerError::DuplicateAccountInBudget(code) if code == "5200"));

    // Nothing was written
    let n: i64 = conn
        .query_row("SELECT COUNT(*) FROM budgets", [], |r| r.get(0))
        .unwrap();
    assert_eq!(n, 0);
}

#[test]
fn unknown_account_rejected() {
    let mut conn = setup();
    let err = budget::create_budget(
        &mut conn,
        "Ghost",
        date("2025-01-01"),
        date("2025-03-31"),
        "QAR",
        &[line("9999", "100")],
    )
    .unwrap_err();
    assert!(matches!(err, LedgerError::AccountNotFound(code) if code == "9999"));
}

#[test]
fn variance_tracks_actuals_within_period() {
    let mut conn = setup();
    budget::create_budget(
        &mut conn,
        "Q1-Marketing",
        date("2025-01-01"),
        date("2025-03-31"),
        "QAR",
        &[line("5200", "10000")],
    )
    .unwrap();

    // Three expenses totaling 4000 inside the period
    posting::post_expense(&mut conn, "mk-1", dec("1500"), "5200", "1000", date("2025-01-15"))
        .unwrap();
    posting::post_expense(&mut conn, "mk-2", dec("1500"), "5200", "1000", date("2025-02-15"))
        .unwrap();
    posting::post_expense(&mut conn, "mk-3", dec("1000"), "5200", "1000", date("2025-03-15"))
        .unwrap();
    // One outside the period, must not count
    posting::post_expense(&mut conn, "mk-4", dec("9999"), "5200", "1000", date("2025-04-01"))
        .unwrap();

    let rows = budget::variance(&conn, "Q1-Marketing").unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].code, "5200");
    assert_eq!(rows[0].allocated, dec("10000"));
    assert_eq!(rows[0].actual, dec("4000"));
    assert_eq!(rows[0].variance, dec("-6000"));
}

#[test]
fn missing_budget_reported() {
    let conn = setup();
    let err = budget::variance(&conn, "nope").unwrap_err();
    assert!(matches!(err, LedgerError::BudgetNotFound(name) if name == "nope"));
}
