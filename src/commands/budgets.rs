// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::{budget, Config};
use crate::models::BudgetLine;
use crate::utils::{maybe_print_json, parse_date, parse_decimal, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("create", sub)) => create(conn, sub)?,
        Some(("list", sub)) => {
            let budgets = budget::list_budgets(conn)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &budgets)? {
                let rows = budgets
                    .iter()
                    .map(|b| {
                        vec![
                            b.name.clone(),
                            b.start_date.to_string(),
                            b.end_date.to_string(),
                            b.currency.clone(),
                            b.lines.len().to_string(),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["Name", "Start", "End", "CCY", "Lines"], rows)
                );
            }
        }
        Some(("variance", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let rows = budget::variance(conn, name)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &rows)? {
                let data = rows
                    .iter()
                    .map(|v| {
                        vec![
                            v.code.clone(),
                            v.name.clone(),
                            format!("{:.2}", v.allocated),
                            format!("{:.2}", v.actual),
                            format!("{:.2}", v.variance),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(
                        &["Account", "Name", "Allocated", "Actual", "Variance"],
                        data
                    )
                );
            }
        }
        _ => {}
    }
    Ok(())
}

fn create(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap();
    let start = parse_date(sub.get_one::<String>("start").unwrap())?;
    let end = parse_date(sub.get_one::<String>("end").unwrap())?;
    let currency = match sub.get_one::<String>("currency") {
        Some(c) => c.to_uppercase(),
        None => Config::load(conn)?.base_currency,
    };

    let mut lines = Vec::new();
    for spec in sub.get_many::<String>("line").unwrap() {
        let (code, amount) = spec
            .split_once(':')
            .ok_or_else(|| anyhow::anyhow!("Invalid line '{}', expected CODE:AMOUNT", spec))?;
        lines.push(BudgetLine {
            account_code: code.to_string(),
            amount: parse_decimal(amount)?,
        });
    }

    let budget = budget::create_budget(conn, name, start, end, &currency, &lines)?;
    println!(
        "Created budget '{}' ({} - {}, {} lines)",
        budget.name,
        budget.start_date,
        budget.end_date,
        budget.lines.len()
    );
    Ok(())
}
