// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use thiserror::Error;

/// Validation and store errors surfaced by the ledger core.
///
/// Every validation error is raised before anything is written; the store
/// never holds a partially applied operation.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("account code '{0}' already exists")]
    DuplicateCode(String),

    #[error("invalid account hierarchy: {0}")]
    InvalidHierarchy(String),

    #[error("account '{0}' not found")]
    AccountNotFound(String),

    #[error("journal entry {0} not found")]
    EntryNotFound(i64),

    #[error("budget '{0}' not found")]
    BudgetNotFound(String),

    #[error("account '{0}' is inactive and cannot accept new postings")]
    InactiveAccount(String),

    #[error("entry is unbalanced: debits {debits} != credits {credits}")]
    UnbalancedEntry { debits: Decimal, credits: Decimal },

    #[error("entry must contain at least two lines")]
    EmptyEntry,

    #[error("line amount must be positive, got {0}")]
    InvalidAmount(Decimal),

    #[error("source {source_type}:{source_id} already posted as entry {entry_no}")]
    AlreadyPosted {
        source_type: String,
        source_id: String,
        entry_no: i64,
    },

    #[error("entry {original} is already reversed by entry {reversal}")]
    AlreadyReversed { original: i64, reversal: i64 },

    #[error("account '{0}' appears more than once in the budget")]
    DuplicateAccountInBudget(String),

    #[error("budget period must end strictly after it starts")]
    InvalidPeriod,

    #[error("invalid status transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    #[error("document '{0}' not found")]
    DocumentNotFound(String),

    #[error("document number '{0}' already exists")]
    DuplicateDocument(String),

    #[error("trial balance out of balance: debits {debits} != credits {credits}")]
    ConsistencyViolation { debits: Decimal, credits: Decimal },

    #[error("invalid stored value '{value}' in column {column}")]
    CorruptValue { column: &'static str, value: String },

    #[error(transparent)]
    Store(#[from] rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, LedgerError>;

/// True when the store rejected a write on a UNIQUE constraint. The unique
/// indexes on account codes, posting sources, and reversal links are the
/// authority for duplicate detection under concurrent writers.
pub fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}
