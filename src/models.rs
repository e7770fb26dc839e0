// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{LedgerError, Result};

/// Classification of a ledger account. Determines the sign convention for
/// reported balances: Asset/Expense are debit-positive, the rest are
/// credit-positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Asset,
    Liability,
    Equity,
    Revenue,
    Expense,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Asset => "asset",
            AccountType::Liability => "liability",
            AccountType::Equity => "equity",
            AccountType::Revenue => "revenue",
            AccountType::Expense => "expense",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "asset" => Ok(AccountType::Asset),
            "liability" => Ok(AccountType::Liability),
            "equity" => Ok(AccountType::Equity),
            "revenue" => Ok(AccountType::Revenue),
            "expense" => Ok(AccountType::Expense),
            other => Err(LedgerError::CorruptValue {
                column: "accounts.type",
                value: other.to_string(),
            }),
        }
    }

    /// Debit increases the balance of accounts on the debit-normal side.
    pub fn debit_normal(&self) -> bool {
        matches!(self, AccountType::Asset | AccountType::Expense)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Debit,
    Credit,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Debit => "debit",
            Side::Credit => "credit",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "debit" => Ok(Side::Debit),
            "credit" => Ok(Side::Credit),
            other => Err(LedgerError::CorruptValue {
                column: "journal_lines.side",
                value: other.to_string(),
            }),
        }
    }

    pub fn flipped(&self) -> Side {
        match self {
            Side::Debit => Side::Credit,
            Side::Credit => Side::Debit,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub account_type: AccountType,
    pub parent_id: Option<i64>,
    pub is_cash: bool,
    pub is_active: bool,
}

/// An atomic, balanced group of debit/credit lines. Immutable once written;
/// corrections go through a reversing entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    pub entry_no: i64,
    pub date: NaiveDate,
    pub description: String,
    pub reference: Option<String>,
    pub reversal_of: Option<i64>,
    pub lines: Vec<JournalLine>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalLine {
    pub account_code: String,
    pub amount: Decimal,
    pub side: Side,
}

/// Input line for `journal::create_entry`.
#[derive(Debug, Clone)]
pub struct NewLine {
    pub account_code: String,
    pub amount: Decimal,
    pub side: Side,
}

impl NewLine {
    pub fn debit(account_code: &str, amount: Decimal) -> Self {
        NewLine {
            account_code: account_code.to_string(),
            amount,
            side: Side::Debit,
        }
    }

    pub fn credit(account_code: &str, amount: Decimal) -> Self {
        NewLine {
            account_code: account_code.to_string(),
            amount,
            side: Side::Credit,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    pub id: i64,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub currency: String,
    pub lines: Vec<BudgetLine>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetLine {
    pub account_code: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrialBalanceRow {
    pub code: String,
    pub name: String,
    pub debit_total: Decimal,
    pub credit_total: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct VarianceRow {
    pub code: String,
    pub name: String,
    pub allocated: Decimal,
    pub actual: Decimal,
    pub variance: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfitAndLoss {
    pub revenue_total: Decimal,
    pub expense_total: Decimal,
    pub net_income: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct CashFlow {
    pub inflows: Decimal,
    pub outflows: Decimal,
    pub net: Decimal,
}

/// Lifecycle of an invoice or expense document feeding the posting service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocStatus {
    Draft,
    Pending,
    Approved,
    Rejected,
    Posted,
}

impl DocStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocStatus::Draft => "draft",
            DocStatus::Pending => "pending",
            DocStatus::Approved => "approved",
            DocStatus::Rejected => "rejected",
            DocStatus::Posted => "posted",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "draft" => Ok(DocStatus::Draft),
            "pending" => Ok(DocStatus::Pending),
            "approved" => Ok(DocStatus::Approved),
            "rejected" => Ok(DocStatus::Rejected),
            "posted" => Ok(DocStatus::Posted),
            other => Err(LedgerError::CorruptValue {
                column: "status",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceDocument {
    pub id: i64,
    pub number: String,
    pub total: Decimal,
    pub status: DocStatus,
    pub entry_no: Option<i64>,
}
