// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::posting::{self, DocKind};
use crate::utils::{maybe_print_json, parse_date, parse_decimal, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle_invoice(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    handle(conn, m, DocKind::Invoice, "settle")
}

pub fn handle_expense(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    handle(conn, m, DocKind::Expense, "pay")
}

fn handle(
    conn: &mut Connection,
    m: &clap::ArgMatches,
    kind: DocKind,
    settle_verb: &str,
) -> Result<()> {
    match m.subcommand() {
        Some(("create", sub)) => {
            let number = sub.get_one::<String>("number").unwrap();
            let total = parse_decimal(sub.get_one::<String>("total").unwrap())?;
            let doc = posting::create_document(conn, kind, number, total)?;
            println!("Created '{}' ({}, total {:.2})", doc.number, doc.status.as_str(), doc.total);
        }
        Some(("submit", sub)) => {
            let number = sub.get_one::<String>("number").unwrap();
            let doc = posting::submit_document(conn, kind, number)?;
            println!("'{}' is now {}", doc.number, doc.status.as_str());
        }
        Some(("approve", sub)) => {
            let number = sub.get_one::<String>("number").unwrap();
            let doc = posting::approve_document(conn, kind, number)?;
            println!("'{}' is now {}", doc.number, doc.status.as_str());
        }
        Some(("reject", sub)) => {
            let number = sub.get_one::<String>("number").unwrap();
            let doc = posting::reject_document(conn, kind, number)?;
            println!("'{}' is now {}", doc.number, doc.status.as_str());
        }
        Some((verb, sub)) if verb == settle_verb => {
            let number = sub.get_one::<String>("number").unwrap();
            let debit = sub.get_one::<String>("debit").unwrap();
            let credit = sub.get_one::<String>("credit").unwrap();
            let date = parse_date(sub.get_one::<String>("date").unwrap())?;
            let entry = posting::settle_document(conn, kind, number, debit, credit, date)?;
            println!("'{}' posted as entry {}", number, entry.entry_no);
        }
        Some(("list", sub)) => {
            let docs = posting::list_documents(conn, kind)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &docs)? {
                let rows = docs
                    .iter()
                    .map(|d| {
                        vec![
                            d.number.clone(),
                            format!("{:.2}", d.total),
                            d.status.as_str().to_string(),
                            d.entry_no.map(|n| n.to_string()).unwrap_or_default(),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["Number", "Total", "Status", "Entry"], rows)
                );
            }
        }
        _ => {}
    }
    Ok(())
}
