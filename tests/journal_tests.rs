// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use postledger::db;
use postledger::errors::LedgerError;
use postledger::ledger::{balance, journal, registry};
use postledger::models::{AccountType, NewLine, Side};
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
    registry::create_account(&conn, "2000", "Payables", AccountType::Liability, None, false)
        .unwrap();
    registry::create_account(&conn, "4000", "Revenue", AccountType::Revenue, None, false).unwrap();
    registry::create_account(&conn, "5000", "Expenses", AccountType::Expense, None, false).unwrap();
    conn
}

fn count(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |r| r.get(0))
        .unwrap()
}

#[test]
fn balanced_entry_roundtrip() {
    let mut conn = setup();
    let entry = journal::create_entry(
        &mut conn,
        date("2025-01-15"),
        "Opening sale",
        Some("booking-1"),
        &[
            NewLine::debit("1000", dec("120.50")),
            NewLine::credit("4000", dec("120.50")),
        ],
    )
    .unwrap();

    let loaded = journal::get_entry(&conn, entry.entry_no).unwrap();
    assert_eq!(loaded.date, date("2025-01-15"));
    assert_eq!(loaded.reference.as_deref(), Some("booking-1"));
    assert_eq!(loaded.lines.len(), 2);
    assert_eq!(loaded.lines[0].side, Side::Debit);
    assert_eq!(loaded.lines[0].amount, dec("120.50"));
}

#[test]
fn entry_numbers_are_monotonic() {
    let mut conn = setup();
    let lines = [
        NewLine::debit("1000", dec("5")),
        NewLine::credit("4000", dec("5")),
    ];
    let a = journal::create_entry(&mut conn, date("2025-01-01"), "a", None, &lines).unwrap();
    let b = journal::create_entry(&mut conn, date("2025-01-02"), "b", None, &lines).unwrap();
    let c = journal::create_entry(&mut conn, date("2025-01-03"), "c", None, &lines).unwrap();
    assert!(a.entry_no < b.entry_no && b.entry_no < c.entry_no);
}

#[test]
fn unbalanced_entry_leaves_no_partial_state() {
    let mut conn = setup();
    let err = journal::create_entry(
        &mut conn,
        date("2025-01-15"),
        "Broken",
        None,
        &[
            NewLine::debit("1000", dec("100.00")),
            NewLine::credit("4000", dec("99.99")),
        ],
    )
    .unwrap_err();
    assert!(matches!(
        err,
        LedgerError::UnbalancedEntry { debits, credits }
            if debits == dec("100.00") && credits == dec("99.99")
    ));

    // Direct store inspection: nothing was written
    assert_eq!(count(&conn, "journal_entries"), 0);
    assert_eq!(count(&conn, "journal_lines"), 0);
}

#[test]
fn entry_requires_two_lines() {
    let mut conn = setup();
    let err = journal::create_entry(
        &mut conn,
        date("2025-01-15"),
        "Half an entry",
        None,
        &[NewLine::debit("1000", dec("10"))],
    )
    .unwrap_err();
    assert!(matches!(err, LedgerError::EmptyEntry));
    assert_eq!(count(&conn, "journal_entries"), 0);
}

#[test]
fn non_positive_amount_rejected() {
    let mut conn = setup();
    let err = journal::create_entry(
        &mut conn,
        date("2025-01-15"),
        "Zero line",
        None,
        &[
            NewLine::debit("1000", dec("0")),
            NewLine::credit("4000", dec("0")),
        ],
    )
    .unwrap_err();
    assert!(matches!(err, LedgerError::InvalidAmount(_)));
}

#[test]
fn unknown_account_rejected() {
    let mut conn = setup();
    let err = journal::create_entry(
        &mut conn,
        date("2025-01-15"),
        "Ghost account",
        None,
        &[
            NewLine::debit("9999", dec("10")),
            NewLine::credit("4000", dec("10")),
        ],
    )
    .unwrap_err();
    assert!(matches!(err, LedgerError::AccountNotFound(code) if code == "9999"));
    assert_eq!(count(&conn, "journal_entries"), 0);
}

#[test]
fn multi_line_entry_balances_across_sides() {
    let mut conn = setup();
    journal::create_entry(
        &mut conn,
        date("2025-02-01"),
        "Sale partly on credit",
        None,
        &[
            NewLine::debit("1000", dec("60.00")),
            NewLine::debit("5000", dec("40.00")),
            NewLine::credit("4000", dec("100.00")),
        ],
    )
    .unwrap();
    let rows = balance::trial_balance(&conn, Some(date("2025-02-28"))).unwrap();
    let debits: Decimal = rows.iter().map(|r| r.debit_total).sum();
    let credits: Decimal = rows.iter().map(|r| r.credit_total).sum();
    assert_eq!(debits, credits);
}

#[test]
fn reversal_restores_balances() {
    let mut conn = setup();
    let entry = journal::create_entry(
        &mut conn,
        date("2025-01-15"),
        "Sale",
        None,
        &[
            NewLine::debit("1000", dec("150.00")),
            NewLine::credit("4000", dec("150.00")),
        ],
    )
    .unwrap();

    let reversal = journal::reverse_entry(&mut conn, entry.entry_no).unwrap();
    assert_eq!(reversal.reversal_of, Some(entry.entry_no));
    assert_eq!(reversal.lines.len(), 2);
    assert_eq!(reversal.lines[0].side, Side::Credit); // flipped debit

    let as_of = Some(date("2025-12-31"));
    assert_eq!(balance::balance(&conn, "1000", as_of).unwrap(), dec("0"));
    assert_eq!(balance::balance(&conn, "4000", as_of).unwrap(), dec("0"));
}

#[test]
fn entry_can_only_be_reversed_once() {
    let mut conn = setup();
    let entry = journal::create_entry(
        &mut conn,
        date("2025-01-15"),
        "Sale",
        None,
        &[
            NewLine::debit("1000", dec("20")),
            NewLine::credit("4000", dec("20")),
        ],
    )
    .unwrap();

    let first = journal::reverse_entry(&mut conn, entry.entry_no).unwrap();
    let err = journal::reverse_entry(&mut conn, entry.entry_no).unwrap_err();
    assert!(matches!(
        err,
        LedgerError::AlreadyReversed { original, reversal }
            if original == entry.entry_no && reversal == first.entry_no
    ));
}

#[test]
fn reversing_missing_entry_fails() {
    let mut conn = setup();
    let err = journal::reverse_entry(&mut conn, 42).unwrap_err();
    assert!(matches!(err, LedgerError::EntryNotFound(42)));
}

#[test]
fn list_entries_filters_by_month() {
    let mut conn = setup();
    let lines = [
        NewLine::debit("1000", dec("5")),
        NewLine::credit("4000", dec("5")),
    ];
    journal::create_entry(&mut conn, date("2025-01-10"), "jan", None, &lines).unwrap();
    journal::create_entry(&mut conn, date("2025-02-10"), "feb", None, &lines).unwrap();

    let jan = journal::list_entries(&conn, Some("2025-01")).unwrap();
    assert_eq!(jan.len(), 1);
    assert_eq!(jan[0].description, "jan");
    assert_eq!(journal::list_entries(&conn, None).unwrap().len(), 2);
}
