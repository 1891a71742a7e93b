// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use kidsledger::db::{KeyValueStore, SqliteKv};
use kidsledger::error::LedgerError;
use kidsledger::ledger::{Ledger, SyncStatus, default_children};
use kidsledger::models::{Child, Investment, TradeAction, Transaction, TransactionType};
use kidsledger::sheets::MemorySheets;
use kidsledger::snapshot::{self, CHILDREN_KEY, INVESTMENTS_KEY, TRANSACTIONS_KEY};
use kidsledger::sync::{CHILD_CAPACITY, SyncClient};
use rust_decimal::Decimal;

const SHEET_ID: &str = "sheet-1";

fn row(cells: &[&str]) -> Vec<String> {
    cells.iter().map(|c| c.to_string()).collect()
}

fn workbook() -> MemorySheets {
    MemorySheets::with_tabs(SHEET_ID, &["Children", "Transactions", "Investments"])
}

fn local_only(kv: SqliteKv) -> Ledger<SqliteKv, MemorySheets> {
    Ledger::open(kv, None).unwrap()
}

fn online(kv: SqliteKv, sheets: &MemorySheets) -> Ledger<SqliteKv, MemorySheets> {
    Ledger::open(kv, Some(SyncClient::new(sheets.clone(), SHEET_ID))).unwrap()
}

fn tx(id: &str, child_id: &str, r#type: TransactionType, amount: i64) -> Transaction {
    Transaction {
        id: id.into(),
        child_id: child_id.into(),
        date: "2025-02-01".into(),
        r#type,
        category: "General".into(),
        amount: Decimal::new(amount, 0),
        description: String::new(),
    }
}

#[test]
fn empty_stores_start_with_the_default_child() {
    let ledger = local_only(SqliteKv::open_in_memory().unwrap());
    assert_eq!(ledger.children(), default_children().as_slice());
    assert_eq!(ledger.children()[0].name, "Ming");
    assert_eq!(ledger.sync_status(), &SyncStatus::Idle);
}

#[test]
fn last_child_cannot_be_removed() {
    let mut ledger = local_only(SqliteKv::open_in_memory().unwrap());
    let err = ledger.remove_child("1").unwrap_err();
    assert!(matches!(err, LedgerError::LastChild));
    assert_eq!(ledger.children().len(), 1);

    let ana = ledger.add_child("Ana", None).unwrap();
    assert!(ana.avatar.contains("seed=Ana"));
    ledger.remove_child("1").unwrap();
    assert_eq!(ledger.children(), &[ana]);
}

#[test]
fn child_count_is_capped() {
    let mut ledger = local_only(SqliteKv::open_in_memory().unwrap());
    for i in 1..CHILD_CAPACITY {
        ledger.add_child(&format!("Kid {i}"), None).unwrap();
    }
    assert_eq!(ledger.children().len(), CHILD_CAPACITY);
    let err = ledger.add_child("One too many", None).unwrap_err();
    assert!(matches!(err, LedgerError::ChildLimit(CHILD_CAPACITY)));
    assert!(matches!(
        ledger.add_child("  ", None).unwrap_err(),
        LedgerError::InvalidInput(_)
    ));
}

#[test]
fn duplicate_ids_are_rejected() {
    let mut ledger = local_only(SqliteKv::open_in_memory().unwrap());
    ledger
        .add_transaction(tx("100", "1", TransactionType::Income, 5))
        .unwrap();
    let err = ledger
        .add_transaction(tx("100", "1", TransactionType::Expense, 2))
        .unwrap_err();
    assert!(matches!(err, LedgerError::DuplicateId(id) if id == "100"));
    assert_eq!(ledger.transactions().len(), 1);
}

#[test]
fn new_transactions_come_first_and_persist_locally() {
    let mut ledger = local_only(SqliteKv::open_in_memory().unwrap());
    ledger
        .add_transaction(tx("1", "1", TransactionType::Income, 5))
        .unwrap();
    ledger
        .add_transaction(tx("2", "1", TransactionType::Expense, 2))
        .unwrap();
    assert_eq!(ledger.transactions()[0].id, "2");

    let kv = ledger.into_store();
    let stored: Vec<Transaction> = snapshot::read(&kv, TRANSACTIONS_KEY).unwrap().unwrap();
    assert_eq!(stored.len(), 2);
    assert_eq!(stored[0].id, "2");

    let reopened = local_only(kv);
    assert_eq!(reopened.transactions().len(), 2);
}

#[test]
fn offline_mutation_keeps_local_change() {
    let sheets = workbook();
    let mut ledger = online(SqliteKv::open_in_memory().unwrap(), &sheets);
    assert_eq!(ledger.sync_status(), &SyncStatus::Synced);

    sheets.set_offline(true);
    ledger
        .add_transaction(tx("7", "1", TransactionType::Income, 10))
        .unwrap();
    assert!(matches!(ledger.sync_status(), SyncStatus::Failed(_)));
    assert_eq!(ledger.transactions().len(), 1);

    sheets.set_offline(false);
    ledger
        .add_transaction(tx("8", "1", TransactionType::Income, 1))
        .unwrap();
    assert_eq!(ledger.sync_status(), &SyncStatus::Synced);
    // Only the change made while online reached the sheet.
    let ids: Vec<String> = sheets
        .rows("Transactions")
        .into_iter()
        .map(|r| r[0].clone())
        .collect();
    assert_eq!(ids, vec!["8"]);
}

#[test]
fn partial_remote_failure_falls_back_to_local_snapshot() {
    let kv = SqliteKv::open_in_memory().unwrap();
    let local = vec![tx("local", "1", TransactionType::Income, 3)];
    snapshot::save(&kv, TRANSACTIONS_KEY, &local).unwrap();

    let sheets = MemorySheets::with_tabs(SHEET_ID, &["Children", "Transactions"]);
    sheets.seed(
        "Transactions",
        vec![row(&["remote", "1", "2025-02-02", "INCOME", "", "99", ""])],
    );
    let ledger = online(kv, &sheets);
    assert!(matches!(ledger.sync_status(), SyncStatus::Failed(_)));
    assert_eq!(ledger.transactions(), local.as_slice());
    assert!(ledger.investments().is_empty());
}

#[test]
fn successful_load_replaces_local_snapshot() {
    let kv = SqliteKv::open_in_memory().unwrap();
    snapshot::save(&kv, TRANSACTIONS_KEY, &vec![tx("old", "1", TransactionType::Income, 1)])
        .unwrap();

    let sheets = workbook();
    sheets.seed(
        "Children",
        vec![row(&["ID", "Name", "Avatar"]), row(&["c9", "Ana", "a.svg"])],
    );
    sheets.seed(
        "Transactions",
        vec![row(&["new", "c9", "2025-02-02", "INCOME", "Gift", "20", ""])],
    );
    let ledger = online(kv, &sheets);
    assert_eq!(ledger.sync_status(), &SyncStatus::Synced);
    assert_eq!(ledger.children()[0].name, "Ana");

    let kv = ledger.into_store();
    let stored: Vec<Transaction> = snapshot::read(&kv, TRANSACTIONS_KEY).unwrap().unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id, "new");
    let children: Vec<Child> = snapshot::read(&kv, CHILDREN_KEY).unwrap().unwrap();
    assert_eq!(children[0].id, "c9");
}

#[test]
fn malformed_snapshot_reads_as_default() {
    let kv = SqliteKv::open_in_memory().unwrap();
    kv.set(CHILDREN_KEY, "{not json").unwrap();
    assert!(matches!(
        snapshot::read::<Vec<Child>>(&kv, CHILDREN_KEY),
        Err(LedgerError::MalformedLocalState { .. })
    ));
    let ledger = local_only(kv);
    assert_eq!(ledger.children(), default_children().as_slice());
}

#[test]
fn edits_and_deletes_reach_the_sheet() {
    let sheets = workbook();
    let mut ledger = online(SqliteKv::open_in_memory().unwrap(), &sheets);
    ledger
        .add_transaction(tx("1", "1", TransactionType::Expense, 4))
        .unwrap();
    ledger
        .add_transaction(tx("2", "1", TransactionType::Expense, 6))
        .unwrap();

    let mut edited = ledger.transaction("1").cloned().unwrap();
    edited.amount = Decimal::new(5, 0);
    ledger.update_transaction(edited).unwrap();
    assert_eq!(sheets.rows("Transactions")[0][5], "5");

    ledger.delete_transaction("1").unwrap();
    let grid = sheets.rows("Transactions");
    assert!(grid[0].iter().all(String::is_empty));
    assert_eq!(grid[1][0], "2");
    assert!(matches!(
        ledger.delete_transaction("1").unwrap_err(),
        LedgerError::UnknownTransaction(_)
    ));
}

#[test]
fn child_changes_rewrite_the_children_sheet() {
    let sheets = workbook();
    let mut ledger = online(SqliteKv::open_in_memory().unwrap(), &sheets);
    let ana = ledger.add_child("Ana", Some("https://example.test/ana.svg")).unwrap();
    let grid = sheets.rows("Children");
    assert_eq!(grid.len(), CHILD_CAPACITY + 1);
    assert_eq!(grid[1][1], "Ming");
    assert_eq!(grid[2], row(&[ana.id.as_str(), "Ana", "https://example.test/ana.svg"]));

    ledger.remove_child("1").unwrap();
    let grid = sheets.rows("Children");
    assert_eq!(grid[1][1], "Ana");
    assert!(grid[2].iter().all(String::is_empty));
}

#[test]
fn trades_are_validated_and_summarized() {
    let mut ledger = local_only(SqliteKv::open_in_memory().unwrap());
    let buy = Investment {
        id: "t1".into(),
        child_id: "1".into(),
        date: "2025-03-01".into(),
        symbol: "AAPL".into(),
        company_name: "Apple".into(),
        quantity: Decimal::new(2, 0),
        price: Decimal::new(10, 0),
        total_amount: Decimal::new(20, 0),
        action: TradeAction::Buy,
    };
    ledger.add_investment(buy.clone()).unwrap();

    let mut bad = buy.clone();
    bad.id = "t2".into();
    bad.symbol = " ".into();
    assert!(matches!(
        ledger.add_investment(bad).unwrap_err(),
        LedgerError::InvalidInput(_)
    ));

    ledger
        .add_transaction(tx("i1", "1", TransactionType::Income, 50))
        .unwrap();
    let s = ledger.summary("1").unwrap();
    assert_eq!(s.investment, Decimal::new(20, 0));
    assert_eq!(s.balance, Decimal::new(30, 0));
}

fn trade(id: &str, action: TradeAction, total: i64) -> Investment {
    Investment {
        id: id.into(),
        child_id: "1".into(),
        date: "2025-03-01".into(),
        symbol: "MSFT".into(),
        company_name: "Microsoft".into(),
        quantity: Decimal::ONE,
        price: Decimal::new(total, 0),
        total_amount: Decimal::new(total, 0),
        action,
    }
}

#[test]
fn ids_only_collide_within_their_collection() {
    let mut ledger = local_only(SqliteKv::open_in_memory().unwrap());
    assert_eq!(ledger.children()[0].id, "1");
    ledger
        .add_transaction(tx("1", "1", TransactionType::Income, 5))
        .unwrap();
    ledger.add_investment(trade("1", TradeAction::Buy, 3)).unwrap();

    assert!(matches!(
        ledger.add_investment(trade("1", TradeAction::Sell, 3)).unwrap_err(),
        LedgerError::DuplicateId(_)
    ));
    let fresh = ledger.next_id();
    assert_ne!(fresh, "1");
}

#[test]
fn investment_edits_and_deletes_reach_the_sheet() {
    let sheets = workbook();
    let mut ledger = online(SqliteKv::open_in_memory().unwrap(), &sheets);
    ledger.add_investment(trade("a", TradeAction::Buy, 10)).unwrap();
    ledger.add_investment(trade("b", TradeAction::Buy, 20)).unwrap();

    let mut edited = ledger.investment("a").cloned().unwrap();
    edited.total_amount = Decimal::new(11, 0);
    edited.action = TradeAction::Sell;
    ledger.update_investment(edited).unwrap();
    let grid = sheets.rows("Investments");
    assert_eq!(grid[0][7], "11");
    assert_eq!(grid[0][8], "SELL");

    ledger.delete_investment("a").unwrap();
    let grid = sheets.rows("Investments");
    assert_eq!(grid[0].len(), 9);
    assert!(grid[0].iter().all(String::is_empty));
    assert_eq!(grid[1][0], "b");
    assert_eq!(ledger.investments().len(), 1);
    assert_eq!(ledger.sync_status(), &SyncStatus::Synced);
    assert!(matches!(
        ledger.delete_investment("a").unwrap_err(),
        LedgerError::UnknownInvestment(_)
    ));
}

#[test]
fn oversized_remote_amounts_fail_the_summary() {
    let sheets = workbook();
    let huge = "79228162514264337593543950335";
    sheets.seed(
        "Transactions",
        vec![
            row(&["x1", "1", "2025-02-02", "INCOME", "", huge, ""]),
            row(&["x2", "1", "2025-02-03", "INCOME", "", huge, ""]),
        ],
    );
    let ledger = online(SqliteKv::open_in_memory().unwrap(), &sheets);
    assert_eq!(ledger.transactions().len(), 2);
    assert!(matches!(
        ledger.summary("1").unwrap_err(),
        LedgerError::Overflow(_)
    ));
}

#[test]
fn offline_change_is_replaced_by_next_successful_load() {
    let sheets = workbook();
    let mut ledger = online(SqliteKv::open_in_memory().unwrap(), &sheets);
    sheets.set_offline(true);
    ledger
        .add_transaction(tx("7", "1", TransactionType::Income, 10))
        .unwrap();
    assert!(matches!(ledger.sync_status(), SyncStatus::Failed(_)));

    sheets.set_offline(false);
    let reopened = online(ledger.into_store(), &sheets);
    assert_eq!(reopened.sync_status(), &SyncStatus::Synced);
    assert!(reopened.transactions().is_empty());
}

#[test]
fn snapshots_use_camel_case_keys() {
    let mut ledger = local_only(SqliteKv::open_in_memory().unwrap());
    ledger
        .add_transaction(tx("1", "1", TransactionType::Income, 5))
        .unwrap();
    ledger.add_investment(trade("2", TradeAction::Buy, 3)).unwrap();
    let kv = ledger.into_store();

    let txs = kv.get(TRANSACTIONS_KEY).unwrap().unwrap();
    assert!(txs.contains("\"childId\""));
    assert!(txs.contains("\"type\":\"INCOME\""));
    assert!(!txs.contains("child_id"));
    let invs = kv.get(INVESTMENTS_KEY).unwrap().unwrap();
    assert!(invs.contains("\"companyName\""));
    assert!(invs.contains("\"totalAmount\""));
}
