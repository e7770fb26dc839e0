// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use postledger::db;
use postledger::ledger::{journal, registry};
use postledger::models::{AccountType, NewLine};
use rust_decimal::Decimal;

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn date(s: &str) -> chrono::NaiveDate {
    chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

#[test]
fn journal_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ledger.sqlite");

    let entry_no = {
        let mut conn = db::open_at(&path).unwrap();
        registry::create_account(&conn, "1000", "Cash", AccountType::Asset, None, true).unwrap();
        registry::create_account(&conn, "4000", "Revenue", AccountType::Revenue, None, false)
            .unwrap();
        let entry = journal::create_entry(
            &mut conn,
            date("2025-01-15"),
            "Persisted sale",
            None,
            &[
                NewLine::debit("1000", dec("10.00")),
                NewLine::credit("4000", dec("10.00")),
            ],
        )
        .unwrap();
        entry.entry_no
    };

    // Reopen: schema init is idempotent and the entry is still there
    let conn = db::open_at(&path).unwrap();
    let entry = journal::get_entry(&conn, entry_no).unwrap();
    assert_eq!(entry.description, "Persisted sale");
    assert_eq!(entry.lines.len(), 2);
}
