// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Posting Service: translates business events (payment received, expense
//! approved) into journal entries with an at-most-once guarantee per source
//! event. The idempotency record and the entry commit in one transaction;
//! the UNIQUE(source_type, source_id) index is what closes the concurrent
//! double-posting race, the application check only produces the friendlier
//! error on the common path.

use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;
use tracing::info;

use crate::errors::{is_unique_violation, LedgerError, Result};
use crate::ledger::{journal, parse_stored_amount};
use crate::models::{DocStatus, JournalEntry, NewLine, SourceDocument};

pub const SOURCE_PAYMENT: &str = "payment";
pub const SOURCE_EXPENSE: &str = "expense";

/// Record a received payment: debit the cash/receiving account, credit the
/// revenue account. `source_id` must be the stable key of the business event
/// (booking id, payment id); repeating it fails with `AlreadyPosted`
/// carrying the original entry number.
pub fn post_payment(
    conn: &mut Connection,
    source_id: &str,
    amount: Decimal,
    revenue_code: &str,
    cash_code: &str,
    date: NaiveDate,
) -> Result<JournalEntry> {
    let description = format!("Payment {}", source_id);
    post(
        conn,
        SOURCE_PAYMENT,
        source_id,
        amount,
        &description,
        cash_code,
        revenue_code,
        date,
    )
}

/// Record an approved expense: debit the expense account, credit the
/// payable (or cash) account. Same idempotency contract as `post_payment`.
pub fn post_expense(
    conn: &mut Connection,
    source_id: &str,
    amount: Decimal,
    expense_code: &str,
    payable_code: &str,
    date: NaiveDate,
) -> Result<JournalEntry> {
    let description = format!("Expense {}", source_id);
    post(
        conn,
        SOURCE_EXPENSE,
        source_id,
        amount,
        &description,
        expense_code,
        payable_code,
        date,
    )
}

#[allow(clippy::too_many_arguments)]
fn post(
    conn: &mut Connection,
    source_type: &str,
    source_id: &str,
    amount: Decimal,
    description: &str,
    debit_code: &str,
    credit_code: &str,
    date: NaiveDate,
) -> Result<JournalEntry> {
    let tx = conn.transaction()?;
    let entry_no = post_in_tx(
        &tx,
        source_type,
        source_id,
        amount,
        description,
        debit_code,
        credit_code,
        date,
    )?;
    tx.commit()?;
    info!(source_type, source_id, entry_no, %amount, "event posted");
    journal::get_entry(conn, entry_no)
}

/// Validate-then-write sequence for one source event, inside the caller's
/// transaction: the "already posted" read, the entry insert, and the
/// idempotency record are serialized against concurrent postings.
#[allow(clippy::too_many_arguments)]
fn post_in_tx(
    conn: &Connection,
    source_type: &str,
    source_id: &str,
    amount: Decimal,
    description: &str,
    debit_code: &str,
    credit_code: &str,
    date: NaiveDate,
) -> Result<i64> {
    if amount <= Decimal::ZERO {
        return Err(LedgerError::InvalidAmount(amount));
    }
    if let Some(entry_no) = posting_for(conn, source_type, source_id)? {
        return Err(LedgerError::AlreadyPosted {
            source_type: source_type.to_string(),
            source_id: source_id.to_string(),
            entry_no,
        });
    }

    let reference = format!("{}:{}", source_type, source_id);
    let lines = [
        NewLine::debit(debit_code, amount),
        NewLine::credit(credit_code, amount),
    ];
    let entry_no = journal::insert_entry(conn, date, description, Some(&reference), None, &lines)?;

    let res = conn.execute(
        "INSERT INTO postings(source_type, source_id, entry_id) VALUES (?1,?2,?3)",
        params![source_type, source_id, entry_no],
    );
    if let Err(e) = res {
        if is_unique_violation(&e) {
            // Raced another writer; our entry rolls back with the
            // transaction and the winner's entry is reported.
            let entry_no = posting_for(conn, source_type, source_id)?.unwrap_or(entry_no);
            return Err(LedgerError::AlreadyPosted {
                source_type: source_type.to_string(),
                source_id: source_id.to_string(),
                entry_no,
            });
        }
        return Err(e.into());
    }
    Ok(entry_no)
}

/// Entry number previously created for a source event, if any.
pub fn posting_for(conn: &Connection, source_type: &str, source_id: &str) -> Result<Option<i64>> {
    let id: Option<i64> = conn
        .query_row(
            "SELECT entry_id FROM postings WHERE source_type=?1 AND source_id=?2",
            params![source_type, source_id],
            |r| r.get(0),
        )
        .optional()?;
    Ok(id)
}

// ---------------------------------------------------------------------------
// Source documents: invoices and expenses move through
// draft -> pending -> (approved | rejected), and approved documents are
// settled into the journal exactly once. Settling an already-posted document
// is a no-op returning the original entry, to tolerate at-least-once
// delivery from upstream workflows.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocKind {
    Invoice,
    Expense,
}

impl DocKind {
    fn table(&self) -> &'static str {
        match self {
            DocKind::Invoice => "invoices",
            DocKind::Expense => "expenses",
        }
    }

    fn source_type(&self) -> &'static str {
        match self {
            DocKind::Invoice => SOURCE_PAYMENT,
            DocKind::Expense => SOURCE_EXPENSE,
        }
    }
}

pub fn create_document(
    conn: &Connection,
    kind: DocKind,
    number: &str,
    total: Decimal,
) -> Result<SourceDocument> {
    if total <= Decimal::ZERO {
        return Err(LedgerError::InvalidAmount(total));
    }
    let res = conn.execute(
        &format!(
            "INSERT INTO {}(number, total, status) VALUES (?1, ?2, 'draft')",
            kind.table()
        ),
        params![number, total.to_string()],
    );
    match res {
        Ok(_) => {}
        Err(e) if is_unique_violation(&e) => {
            return Err(LedgerError::DuplicateDocument(number.to_string()))
        }
        Err(e) => return Err(e.into()),
    }
    get_document(conn, kind, number)
}

pub fn get_document(conn: &Connection, kind: DocKind, number: &str) -> Result<SourceDocument> {
    let row = conn
        .query_row(
            &format!(
                "SELECT id, number, total, status, entry_id FROM {} WHERE number=?1",
                kind.table()
            ),
            params![number],
            |r| {
                Ok((
                    r.get::<_, i64>(0)?,
                    r.get::<_, String>(1)?,
                    r.get::<_, String>(2)?,
                    r.get::<_, String>(3)?,
                    r.get::<_, Option<i64>>(4)?,
                ))
            },
        )
        .optional()?
        .ok_or_else(|| LedgerError::DocumentNotFound(number.to_string()))?;
    let (id, number, total_s, status_s, entry_no) = row;
    Ok(SourceDocument {
        id,
        number,
        total: parse_stored_amount("total", &total_s)?,
        status: DocStatus::parse(&status_s)?,
        entry_no,
    })
}

fn transition(
    conn: &Connection,
    kind: DocKind,
    number: &str,
    from: &[DocStatus],
    to: DocStatus,
) -> Result<SourceDocument> {
    let doc = get_document(conn, kind, number)?;
    if !from.contains(&doc.status) {
        return Err(LedgerError::InvalidTransition {
            from: doc.status.as_str().to_string(),
            to: to.as_str().to_string(),
        });
    }
    conn.execute(
        &format!("UPDATE {} SET status=?1 WHERE id=?2", kind.table()),
        params![to.as_str(), doc.id],
    )?;
    get_document(conn, kind, number)
}

pub fn submit_document(conn: &Connection, kind: DocKind, number: &str) -> Result<SourceDocument> {
    transition(conn, kind, number, &[DocStatus::Draft], DocStatus::Pending)
}

pub fn approve_document(conn: &Connection, kind: DocKind, number: &str) -> Result<SourceDocument> {
    transition(conn, kind, number, &[DocStatus::Pending], DocStatus::Approved)
}

pub fn reject_document(conn: &Connection, kind: DocKind, number: &str) -> Result<SourceDocument> {
    transition(conn, kind, number, &[DocStatus::Pending], DocStatus::Rejected)
}

/// Settle an approved document into the journal: debit/credit per kind, mark
/// it posted, and record the idempotency row, all in one transaction.
/// Settling a document that is already posted returns the original entry.
pub fn settle_document(
    conn: &mut Connection,
    kind: DocKind,
    number: &str,
    debit_code: &str,
    credit_code: &str,
    date: NaiveDate,
) -> Result<JournalEntry> {
    let doc = get_document(conn, kind, number)?;
    if doc.status == DocStatus::Posted {
        let entry_no = doc
            .entry_no
            .ok_or_else(|| LedgerError::DocumentNotFound(number.to_string()))?;
        return journal::get_entry(conn, entry_no);
    }
    if doc.status != DocStatus::Approved {
        return Err(LedgerError::InvalidTransition {
            from: doc.status.as_str().to_string(),
            to: DocStatus::Posted.as_str().to_string(),
        });
    }

    let description = match kind {
        DocKind::Invoice => format!("Invoice {} settled", number),
        DocKind::Expense => format!("Expense {} paid", number),
    };
    let tx = conn.transaction()?;
    let entry_no = post_in_tx(
        &tx,
        kind.source_type(),
        number,
        doc.total,
        &description,
        debit_code,
        credit_code,
        date,
    )?;
    tx.execute(
        &format!(
            "UPDATE {} SET status='posted', entry_id=?1 WHERE id=?2",
            kind.table()
        ),
        params![entry_no, doc.id],
    )?;
    tx.commit()?;
    info!(kind = kind.table(), number, entry_no, "document settled");
    journal::get_entry(conn, entry_no)
}

pub fn list_documents(conn: &Connection, kind: DocKind) -> Result<Vec<SourceDocument>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT number FROM {} ORDER BY id",
        kind.table()
    ))?;
    let rows = stmt.query_map([], |r| r.get::<_, String>(0))?;
    let mut out = Vec::new();
    for row in rows {
        out.push(get_document(conn, kind, &row?)?);
    }
    Ok(out)
}
