// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Journal Engine: sole writer of journal entries and lines. Entries are
//! validated (balanced, >=2 lines, active accounts) and written atomically;
//! once committed they are append-only. Corrections are reversing entries.

use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::errors::{is_unique_violation, LedgerError, Result};
use crate::ledger::parse_stored_amount;
use crate::models::{JournalEntry, JournalLine, NewLine, Side};

/// Validate and persist a balanced entry. All validation runs before any
/// write, and the entry plus its lines commit in one transaction, so a
/// rejected entry leaves nothing behind.
pub fn create_entry(
    conn: &mut Connection,
    date: NaiveDate,
    description: &str,
    reference: Option<&str>,
    lines: &[NewLine],
) -> Result<JournalEntry> {
    let tx = conn.transaction()?;
    let entry_no = insert_entry(&tx, date, description, reference, None, lines)?;
    tx.commit()?;
    get_entry(conn, entry_no)
}

/// Write path shared with the posting service, which wraps it in its own
/// transaction together with the idempotency record.
pub(crate) fn insert_entry(
    conn: &Connection,
    date: NaiveDate,
    description: &str,
    reference: Option<&str>,
    reversal_of: Option<i64>,
    lines: &[NewLine],
) -> Result<i64> {
    if lines.len() < 2 {
        return Err(LedgerError::EmptyEntry);
    }

    let mut debits = Decimal::ZERO;
    let mut credits = Decimal::ZERO;
    let mut account_ids = Vec::with_capacity(lines.len());
    for line in lines {
        if line.amount <= Decimal::ZERO {
            return Err(LedgerError::InvalidAmount(line.amount));
        }
        // Resolution happens inside the caller's transaction, so the
        // active check and the write are serialized against deactivation.
        let (account_id, is_active): (i64, bool) = conn
            .query_row(
                "SELECT id, is_active FROM accounts WHERE code=?1",
                params![line.account_code],
                |r| Ok((r.get(0)?, r.get(1)?)),
            )
            .optional()?
            .ok_or_else(|| LedgerError::AccountNotFound(line.account_code.clone()))?;
        if !is_active {
            return Err(LedgerError::InactiveAccount(line.account_code.clone()));
        }
        account_ids.push(account_id);
        match line.side {
            Side::Debit => debits += line.amount,
            Side::Credit => credits += line.amount,
        }
    }
    if debits != credits {
        return Err(LedgerError::UnbalancedEntry { debits, credits });
    }

    conn.execute(
        "INSERT INTO journal_entries(date, description, reference, reversal_of)
         VALUES (?1, ?2, ?3, ?4)",
        params![date.to_string(), description, reference, reversal_of],
    )?;
    let entry_no = conn.last_insert_rowid();

    let mut stmt = conn.prepare(
        "INSERT INTO journal_lines(entry_id, account_id, amount, side) VALUES (?1,?2,?3,?4)",
    )?;
    for (line, account_id) in lines.iter().zip(&account_ids) {
        stmt.execute(params![
            entry_no,
            account_id,
            line.amount.to_string(),
            line.side.as_str()
        ])?;
    }

    info!(entry_no, %date, lines = lines.len(), %debits, "journal entry created");
    Ok(entry_no)
}

pub fn get_entry(conn: &Connection, entry_no: i64) -> Result<JournalEntry> {
    let header = conn
        .query_row(
            "SELECT date, description, reference, reversal_of FROM journal_entries WHERE id=?1",
            params![entry_no],
            |r| {
                Ok((
                    r.get::<_, String>(0)?,
                    r.get::<_, String>(1)?,
                    r.get::<_, Option<String>>(2)?,
                    r.get::<_, Option<i64>>(3)?,
                ))
            },
        )
        .optional()?
        .ok_or(LedgerError::EntryNotFound(entry_no))?;
    let (date_s, description, reference, reversal_of) = header;
    let date = NaiveDate::parse_from_str(&date_s, "%Y-%m-%d").map_err(|_| {
        LedgerError::CorruptValue {
            column: "journal_entries.date",
            value: date_s.clone(),
        }
    })?;

    let mut stmt = conn.prepare(
        "SELECT a.code, l.amount, l.side FROM journal_lines l
         JOIN accounts a ON l.account_id=a.id
         WHERE l.entry_id=?1 ORDER BY l.id",
    )?;
    let rows = stmt.query_map(params![entry_no], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
        ))
    })?;
    let mut lines = Vec::new();
    for row in rows {
        let (code, amount_s, side_s) = row?;
        lines.push(JournalLine {
            account_code: code,
            amount: parse_stored_amount("journal_lines.amount", &amount_s)?,
            side: Side::parse(&side_s)?,
        });
    }

    Ok(JournalEntry {
        entry_no,
        date,
        description,
        reference,
        reversal_of,
        lines,
    })
}

/// Create a new entry with every line's side flipped, linked to the original
/// through `reversal_of`. The UNIQUE index on that column guarantees at most
/// one reversal per entry even under concurrent callers.
pub fn reverse_entry(conn: &mut Connection, entry_no: i64) -> Result<JournalEntry> {
    let original = get_entry(conn, entry_no)?;

    let tx = conn.transaction()?;
    if let Some(reversal) = reversal_for(&tx, entry_no)? {
        return Err(LedgerError::AlreadyReversed {
            original: entry_no,
            reversal,
        });
    }

    let flipped: Vec<NewLine> = original
        .lines
        .iter()
        .map(|l| NewLine {
            account_code: l.account_code.clone(),
            amount: l.amount,
            side: l.side.flipped(),
        })
        .collect();
    let description = format!("Reversal of entry {}", entry_no);
    let reference = format!("reversal-of-{}", entry_no);
    let result = insert_entry(
        &tx,
        original.date,
        &description,
        Some(&reference),
        Some(entry_no),
        &flipped,
    );
    let new_no = match result {
        Ok(no) => no,
        Err(LedgerError::Store(e)) if is_unique_violation(&e) => {
            // Lost the race to another reversal; report the winner.
            drop(tx);
            let reversal =
                reversal_for(conn, entry_no)?.ok_or(LedgerError::EntryNotFound(entry_no))?;
            return Err(LedgerError::AlreadyReversed {
                original: entry_no,
                reversal,
            });
        }
        Err(e) => return Err(e),
    };
    tx.commit()?;

    debug!(original = entry_no, reversal = new_no, "entry reversed");
    get_entry(conn, new_no)
}

fn reversal_for(conn: &Connection, entry_no: i64) -> Result<Option<i64>> {
    let id: Option<i64> = conn
        .query_row(
            "SELECT id FROM journal_entries WHERE reversal_of=?1",
            params![entry_no],
            |r| r.get(0),
        )
        .optional()?;
    Ok(id)
}

/// Entries ordered by entry number, optionally restricted to a `YYYY-MM`
/// month. Lines are loaded eagerly; the journal is small enough that the
/// CLI listing does not need pagination.
pub fn list_entries(conn: &Connection, month: Option<&str>) -> Result<Vec<JournalEntry>> {
    let mut numbers = Vec::new();
    match month {
        Some(m) => {
            let mut stmt = conn.prepare(
                "SELECT id FROM journal_entries WHERE substr(date,1,7)=?1 ORDER BY id",
            )?;
            let rows = stmt.query_map(params![m], |r| r.get::<_, i64>(0))?;
            for row in rows {
                numbers.push(row?);
            }
        }
        None => {
            let mut stmt = conn.prepare("SELECT id FROM journal_entries ORDER BY id")?;
            let rows = stmt.query_map([], |r| r.get::<_, i64>(0))?;
            for row in rows {
                numbers.push(row?);
            }
        }
    }
    let mut out = Vec::with_capacity(numbers.len());
    for no in numbers {
        out.push(get_entry(conn, no)?);
    }
    Ok(out)
}
