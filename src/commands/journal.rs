// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::journal;
use crate::models::JournalEntry;
use crate::utils::{maybe_print_json, parse_date, parse_line_spec, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("reverse", sub)) => {
            let number = *sub.get_one::<i64>("number").unwrap();
            let entry = journal::reverse_entry(conn, number)?;
            println!("Entry {} reversed by entry {}", number, entry.entry_no);
        }
        Some(("show", sub)) => {
            let number = *sub.get_one::<i64>("number").unwrap();
            let entry = journal::get_entry(conn, number)?;
            print_entry(&entry);
        }
        Some(("list", sub)) => {
            let month = sub.get_one::<String>("month").map(|s| s.as_str());
            let entries = journal::list_entries(conn, month)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &entries)? {
                let rows = entries
                    .iter()
                    .map(|e| {
                        vec![
                            e.entry_no.to_string(),
                            e.date.to_string(),
                            e.description.clone(),
                            e.reference.clone().unwrap_or_default(),
                            e.lines.len().to_string(),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["No", "Date", "Description", "Reference", "Lines"], rows)
                );
            }
        }
        _ => {}
    }
    Ok(())
}

fn add(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let date = parse_date(sub.get_one::<String>("date").unwrap())?;
    let description = sub.get_one::<String>("description").unwrap();
    let reference = sub.get_one::<String>("reference").map(|s| s.as_str());
    let mut lines = Vec::new();
    for spec in sub.get_many::<String>("line").unwrap() {
        lines.push(parse_line_spec(spec)?);
    }
    let entry = journal::create_entry(conn, date, description, reference, &lines)?;
    println!(
        "Created entry {} on {} with {} lines",
        entry.entry_no,
        entry.date,
        entry.lines.len()
    );
    Ok(())
}

fn print_entry(entry: &JournalEntry) {
    println!(
        "Entry {} | {} | {}{}",
        entry.entry_no,
        entry.date,
        entry.description,
        entry
            .reference
            .as_deref()
            .map(|r| format!(" [{}]", r))
            .unwrap_or_default()
    );
    let rows = entry
        .lines
        .iter()
        .map(|l| {
            vec![
                l.account_code.clone(),
                l.side.as_str().to_string(),
                format!("{:.2}", l.amount),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["Account", "Side", "Amount"], rows));
}
