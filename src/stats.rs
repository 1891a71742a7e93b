// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Per-child totals, recomputed from the collections on every call.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::LedgerError;
use crate::models::{Investment, TradeAction, Transaction, TransactionType};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub income: Decimal,
    pub expense: Decimal,
    /// INVESTMENT transactions plus net stock purchases (BUY minus SELL).
    pub investment: Decimal,
    pub balance: Decimal,
}

fn add(total: Decimal, v: Decimal, what: &str) -> Result<Decimal, LedgerError> {
    total
        .checked_add(v)
        .ok_or_else(|| LedgerError::Overflow(format!("{what} total")))
}

fn sub(total: Decimal, v: Decimal, what: &str) -> Result<Decimal, LedgerError> {
    total
        .checked_sub(v)
        .ok_or_else(|| LedgerError::Overflow(format!("{what} total")))
}

/// Fails with [`LedgerError::Overflow`] when a total leaves the `Decimal`
/// range.
pub fn summarize<'a>(
    child_id: &str,
    transactions: impl IntoIterator<Item = &'a Transaction>,
    investments: impl IntoIterator<Item = &'a Investment>,
) -> Result<Summary, LedgerError> {
    let mut s = Summary::default();
    for t in transactions.into_iter().filter(|t| t.child_id == child_id) {
        match t.r#type {
            TransactionType::Income => s.income = add(s.income, t.amount, "income")?,
            TransactionType::Expense => s.expense = add(s.expense, t.amount, "expense")?,
            TransactionType::Investment => {
                s.investment = add(s.investment, t.amount, "investment")?
            }
        }
    }
    for i in investments.into_iter().filter(|i| i.child_id == child_id) {
        s.investment = match i.action {
            TradeAction::Buy => add(s.investment, i.total_amount, "investment")?,
            TradeAction::Sell => sub(s.investment, i.total_amount, "investment")?,
        };
    }
    let net = sub(s.income, s.expense, "balance")?;
    s.balance = sub(net, s.investment, "balance")?;
    Ok(s)
}
