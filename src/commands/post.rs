// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::errors::LedgerError;
use crate::ledger::posting;
use crate::utils::{parse_date, parse_decimal};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("payment", sub)) => {
            let id = sub.get_one::<String>("id").unwrap();
            let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
            let revenue = sub.get_one::<String>("revenue").unwrap();
            let cash = sub.get_one::<String>("cash").unwrap();
            let date = parse_date(sub.get_one::<String>("date").unwrap())?;
            match posting::post_payment(conn, id, amount, revenue, cash, date) {
                Ok(entry) => println!("Payment '{}' posted as entry {}", id, entry.entry_no),
                // At-least-once delivery: a repeat is "already handled".
                Err(LedgerError::AlreadyPosted { entry_no, .. }) => {
                    println!("Payment '{}' was already posted as entry {}", id, entry_no)
                }
                Err(e) => return Err(e.into()),
            }
        }
        Some(("expense", sub)) => {
            let id = sub.get_one::<String>("id").unwrap();
            let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
            let expense = sub.get_one::<String>("expense").unwrap();
            let payable = sub.get_one::<String>("payable").unwrap();
            let date = parse_date(sub.get_one::<String>("date").unwrap())?;
            match posting::post_expense(conn, id, amount, expense, payable, date) {
                Ok(entry) => println!("Expense '{}' posted as entry {}", id, entry.entry_no),
                Err(LedgerError::AlreadyPosted { entry_no, .. }) => {
                    println!("Expense '{}' was already posted as entry {}", id, entry_no)
                }
                Err(e) => return Err(e.into()),
            }
        }
        _ => {}
    }
    Ok(())
}
