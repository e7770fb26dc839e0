// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("journal", sub)) => export_journal(conn, sub),
        _ => Ok(()),
    }
}

fn export_journal(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let out = sub.get_one::<String>("out").unwrap();

    let mut stmt = conn.prepare(
        "SELECT e.id, e.date, e.description, e.reference, a.code, l.side, l.amount
         FROM journal_lines l
         JOIN journal_entries e ON l.entry_id=e.id
         JOIN accounts a ON l.account_id=a.id
         ORDER BY e.id, l.id",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, Option<String>>(3)?,
            r.get::<_, String>(4)?,
            r.get::<_, String>(5)?,
            r.get::<_, String>(6)?,
        ))
    })?;

    let mut wtr = csv::Writer::from_path(out)?;
    wtr.write_record([
        "entry_no",
        "date",
        "description",
        "reference",
        "account",
        "side",
        "amount",
    ])?;
    for row in rows {
        let (no, d, desc, reference, code, side, amount) = row?;
        wtr.write_record([
            no.to_string(),
            d,
            desc,
            reference.unwrap_or_default(),
            code,
            side,
            amount,
        ])?;
    }
    wtr.flush()?;
    println!("Exported journal to {}", out);
    Ok(())
}
