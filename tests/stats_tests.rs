// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use kidsledger::error::LedgerError;
use kidsledger::models::{Investment, TradeAction, Transaction, TransactionType};
use kidsledger::stats::summarize;
use rust_decimal::Decimal;

fn tx(child: &str, r#type: TransactionType, amount: i64) -> Transaction {
    Transaction {
        id: format!("{child}-{amount}"),
        child_id: child.into(),
        date: "2025-01-01".into(),
        r#type,
        category: "General".into(),
        amount: Decimal::new(amount, 0),
        description: String::new(),
    }
}

fn trade(child: &str, action: TradeAction, total: i64) -> Investment {
    Investment {
        id: format!("{child}-{total}"),
        child_id: child.into(),
        date: "2025-01-01".into(),
        symbol: "MSFT".into(),
        company_name: "Microsoft".into(),
        quantity: Decimal::ONE,
        price: Decimal::new(total, 0),
        total_amount: Decimal::new(total, 0),
        action,
    }
}

#[test]
fn balance_nets_income_expense_and_investments() {
    let txs = vec![
        tx("a", TransactionType::Income, 100),
        tx("a", TransactionType::Expense, 20),
        tx("a", TransactionType::Investment, 10),
        tx("b", TransactionType::Income, 999),
    ];
    let invs = vec![
        trade("a", TradeAction::Buy, 30),
        trade("a", TradeAction::Sell, 15),
        trade("b", TradeAction::Buy, 500),
    ];
    let s = summarize("a", &txs, &invs).unwrap();
    assert_eq!(s.income, Decimal::new(100, 0));
    assert_eq!(s.expense, Decimal::new(20, 0));
    assert_eq!(s.investment, Decimal::new(25, 0));
    assert_eq!(s.balance, Decimal::new(55, 0));
}

#[test]
fn unknown_child_has_zero_totals() {
    let txs = vec![tx("a", TransactionType::Income, 100)];
    let s = summarize("nobody", &txs, &[]).unwrap();
    assert_eq!(s.balance, Decimal::ZERO);
    assert_eq!(s.income, Decimal::ZERO);
}

#[test]
fn totals_out_of_range_are_errors() {
    let mut big = tx("a", TransactionType::Income, 1);
    big.amount = Decimal::MAX;
    let txs = vec![big.clone(), big];
    let err = summarize("a", &txs, &[]).unwrap_err();
    assert!(matches!(err, LedgerError::Overflow(_)));

    let mut sell = trade("a", TradeAction::Sell, 1);
    sell.total_amount = Decimal::MAX;
    let mut buy = trade("a", TradeAction::Buy, 1);
    buy.total_amount = Decimal::MAX;
    let expense = vec![tx("a", TransactionType::Expense, 0)];
    assert!(summarize("a", &expense, &[sell.clone(), sell]).is_err());
    assert!(summarize("a", &expense, &[buy]).is_ok());
}
