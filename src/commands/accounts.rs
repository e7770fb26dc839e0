// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::registry;
use crate::models::AccountType;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let code = sub.get_one::<String>("code").unwrap();
            let name = sub.get_one::<String>("name").unwrap();
            let typ = AccountType::parse(sub.get_one::<String>("type").unwrap())?;
            let parent = sub.get_one::<String>("parent").map(|s| s.as_str());
            let is_cash = sub.get_flag("cash");
            let account = registry::create_account(conn, code, name, typ, parent, is_cash)?;
            println!(
                "Added account {} '{}' ({})",
                account.code,
                account.name,
                account.account_type.as_str()
            );
        }
        Some(("list", sub)) => {
            let accounts = registry::list_accounts(conn)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &accounts)? {
                let rows = accounts
                    .iter()
                    .map(|a| {
                        vec![
                            a.code.clone(),
                            a.name.clone(),
                            a.account_type.as_str().to_string(),
                            if a.is_cash { "yes".into() } else { "".into() },
                            if a.is_active { "active".into() } else { "inactive".into() },
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["Code", "Name", "Type", "Cash", "Status"], rows)
                );
            }
        }
        Some(("children", sub)) => {
            let code = sub.get_one::<String>("code").unwrap();
            let children = registry::list_children(conn, code)?;
            let rows = children
                .iter()
                .map(|a| vec![a.code.clone(), a.name.clone()])
                .collect();
            println!("{}", pretty_table(&["Code", "Name"], rows));
        }
        Some(("set-parent", sub)) => {
            let code = sub.get_one::<String>("code").unwrap();
            let parent = sub.get_one::<String>("parent").map(|s| s.as_str());
            registry::set_parent(conn, code, parent)?;
            match parent {
                Some(p) => println!("Account '{}' now under '{}'", code, p),
                None => println!("Account '{}' detached from its parent", code),
            }
        }
        Some(("deactivate", sub)) => {
            let code = sub.get_one::<String>("code").unwrap();
            registry::deactivate(conn, code)?;
            println!("Account '{}' deactivated (history preserved)", code);
        }
        _ => {}
    }
    Ok(())
}
