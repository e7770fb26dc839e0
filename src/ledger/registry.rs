// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Account Registry: the authoritative store and validator for the chart of
//! accounts. Accounts form a forest; a child must share its parent's type.
//! Accounts referenced by journal lines are never deleted, only deactivated,
//! so historical entries always resolve.

use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::info;

use crate::errors::{is_unique_violation, LedgerError, Result};
use crate::models::{Account, AccountType};

fn account_from_row(row: &Row) -> rusqlite::Result<(i64, String, String, String, Option<i64>, bool, bool)> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
    ))
}

const ACCOUNT_COLS: &str = "id, code, name, type, parent_id, is_cash, is_active";

fn map_account(raw: (i64, String, String, String, Option<i64>, bool, bool)) -> Result<Account> {
    let (id, code, name, typ, parent_id, is_cash, is_active) = raw;
    Ok(Account {
        id,
        code,
        name,
        account_type: AccountType::parse(&typ)?,
        parent_id,
        is_cash,
        is_active,
    })
}

pub fn get_account(conn: &Connection, code: &str) -> Result<Account> {
    let raw = conn
        .query_row(
            &format!("SELECT {ACCOUNT_COLS} FROM accounts WHERE code=?1"),
            params![code],
            account_from_row,
        )
        .optional()?
        .ok_or_else(|| LedgerError::AccountNotFound(code.to_string()))?;
    map_account(raw)
}

fn get_by_id(conn: &Connection, id: i64) -> Result<Account> {
    let raw = conn.query_row(
        &format!("SELECT {ACCOUNT_COLS} FROM accounts WHERE id=?1"),
        params![id],
        account_from_row,
    )?;
    map_account(raw)
}

pub fn create_account(
    conn: &Connection,
    code: &str,
    name: &str,
    account_type: AccountType,
    parent_code: Option<&str>,
    is_cash: bool,
) -> Result<Account> {
    if is_cash && account_type != AccountType::Asset {
        return Err(LedgerError::InvalidHierarchy(format!(
            "only asset accounts can be flagged as cash, '{}' is {}",
            code,
            account_type.as_str()
        )));
    }

    let parent_id = match parent_code {
        Some(pc) => {
            let parent = match get_account(conn, pc) {
                Ok(a) => a,
                Err(LedgerError::AccountNotFound(_)) => {
                    return Err(LedgerError::InvalidHierarchy(format!(
                        "parent account '{}' does not exist",
                        pc
                    )))
                }
                Err(e) => return Err(e),
            };
            if parent.account_type != account_type {
                return Err(LedgerError::InvalidHierarchy(format!(
                    "parent '{}' is {}, child '{}' is {}",
                    pc,
                    parent.account_type.as_str(),
                    code,
                    account_type.as_str()
                )));
            }
            Some(parent.id)
        }
        None => None,
    };

    let res = conn.execute(
        "INSERT INTO accounts(code, name, type, parent_id, is_cash) VALUES (?1,?2,?3,?4,?5)",
        params![code, name, account_type.as_str(), parent_id, is_cash],
    );
    match res {
        Ok(_) => {}
        Err(e) if is_unique_violation(&e) => {
            return Err(LedgerError::DuplicateCode(code.to_string()))
        }
        Err(e) => return Err(e.into()),
    }
    info!(code, name, kind = account_type.as_str(), "account created");
    get_account(conn, code)
}

/// Re-parent an account (or detach it with `None`). Walks the ancestor chain
/// of the proposed parent to reject links that would close a cycle.
pub fn set_parent(conn: &Connection, code: &str, parent_code: Option<&str>) -> Result<()> {
    let account = get_account(conn, code)?;

    let parent_id = match parent_code {
        Some(pc) => {
            let parent = match get_account(conn, pc) {
                Ok(a) => a,
                Err(LedgerError::AccountNotFound(_)) => {
                    return Err(LedgerError::InvalidHierarchy(format!(
                        "parent account '{}' does not exist",
                        pc
                    )))
                }
                Err(e) => return Err(e),
            };
            if parent.account_type != account.account_type {
                return Err(LedgerError::InvalidHierarchy(format!(
                    "parent '{}' is {}, child '{}' is {}",
                    pc,
                    parent.account_type.as_str(),
                    code,
                    account.account_type.as_str()
                )));
            }
            let mut cursor = Some(parent.clone());
            while let Some(node) = cursor {
                if node.id == account.id {
                    return Err(LedgerError::InvalidHierarchy(format!(
                        "linking '{}' under '{}' would form a cycle",
                        code, pc
                    )));
                }
                cursor = match node.parent_id {
                    Some(pid) => Some(get_by_id(conn, pid)?),
                    None => None,
                };
            }
            Some(parent.id)
        }
        None => None,
    };

    conn.execute(
        "UPDATE accounts SET parent_id=?1 WHERE id=?2",
        params![parent_id, account.id],
    )?;
    Ok(())
}

/// Deactivation blocks future postings only. Historical entries against the
/// account stay readable and keep contributing to balances and reports.
pub fn deactivate(conn: &Connection, code: &str) -> Result<()> {
    let account = get_account(conn, code)?;
    conn.execute(
        "UPDATE accounts SET is_active=0 WHERE id=?1",
        params![account.id],
    )?;
    info!(code, "account deactivated");
    Ok(())
}

pub fn reactivate(conn: &Connection, code: &str) -> Result<()> {
    let account = get_account(conn, code)?;
    conn.execute(
        "UPDATE accounts SET is_active=1 WHERE id=?1",
        params![account.id],
    )?;
    Ok(())
}

/// Direct children only; callers compose recursion when they need a subtree.
pub fn list_children(conn: &Connection, code: &str) -> Result<Vec<Account>> {
    let account = get_account(conn, code)?;
    let mut stmt = conn.prepare(&format!(
        "SELECT {ACCOUNT_COLS} FROM accounts WHERE parent_id=?1 ORDER BY code"
    ))?;
    let rows = stmt.query_map(params![account.id], account_from_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(map_account(row?)?);
    }
    Ok(out)
}

pub fn list_accounts(conn: &Connection) -> Result<Vec<Account>> {
    let mut stmt =
        conn.prepare(&format!("SELECT {ACCOUNT_COLS} FROM accounts ORDER BY code"))?;
    let rows = stmt.query_map([], account_from_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(map_account(row?)?);
    }
    Ok(out)
}
