// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::{balance, reports, Config};
use crate::utils::{fmt_money, maybe_print_json, parse_date, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("trial-balance", sub)) => trial_balance(conn, sub)?,
        Some(("pnl", sub)) => pnl(conn, sub)?,
        Some(("cashflow", sub)) => cashflow(conn, sub)?,
        Some(("balance", sub)) => {
            let code = sub.get_one::<String>("code").unwrap();
            let as_of = sub
                .get_one::<String>("as-of")
                .map(|s| parse_date(s))
                .transpose()?;
            let bal = balance::balance(conn, code, as_of)?;
            let config = Config::load(conn)?;
            println!("{}: {}", code, fmt_money(&bal, &config.base_currency));
        }
        _ => {}
    }
    Ok(())
}

fn trial_balance(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let as_of = sub
        .get_one::<String>("as-of")
        .map(|s| parse_date(s))
        .transpose()?;
    let rows = balance::trial_balance(conn, as_of)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &rows)? {
        let data = rows
            .iter()
            .map(|r| {
                vec![
                    r.code.clone(),
                    r.name.clone(),
                    format!("{:.2}", r.debit_total),
                    format!("{:.2}", r.credit_total),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Code", "Account", "Debits", "Credits"], data)
        );
    }
    Ok(())
}

fn pnl(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let start = parse_date(sub.get_one::<String>("start").unwrap())?;
    let end = parse_date(sub.get_one::<String>("end").unwrap())?;
    let report = reports::profit_and_loss(conn, start, end)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &report)? {
        let data = vec![
            vec!["Revenue".into(), format!("{:.2}", report.revenue_total)],
            vec!["Expenses".into(), format!("{:.2}", report.expense_total)],
            vec!["Net income".into(), format!("{:.2}", report.net_income)],
        ];
        println!("{}", pretty_table(&["", "Amount"], data));
    }
    Ok(())
}

fn cashflow(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let start = parse_date(sub.get_one::<String>("start").unwrap())?;
    let end = parse_date(sub.get_one::<String>("end").unwrap())?;
    let report = reports::cash_flow(conn, start, end)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &report)? {
        let data = vec![
            vec!["Inflows".into(), format!("{:.2}", report.inflows)],
            vec!["Outflows".into(), format!("{:.2}", report.outflows)],
            vec!["Net".into(), format!("{:.2}", report.net)],
        ];
        println!("{}", pretty_table(&["", "Amount"], data));
    }
    Ok(())
}
