// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The ledger session: owns the three collections, writes every change to
//! the local key-value store first, then mirrors it to the remote sheet on a
//! best-effort basis.
//!
//! Remote failures never undo a local change. They are recorded in
//! [`SyncStatus`] and the next mutation is the implicit retry.

use chrono::Utc;
use reqwest::Url;
use std::fmt;
use tracing::{debug, info, warn};

use crate::db::KeyValueStore;
use crate::error::{LedgerError, SyncError};
use crate::models::{Child, Investment, Transaction};
use crate::sheets::TabularStore;
use crate::snapshot::{self, CHILDREN_KEY, INVESTMENTS_KEY, TRANSACTIONS_KEY};
use crate::stats::{self, Summary};
use crate::sync::{CHILD_CAPACITY, SyncClient};

pub const UNKNOWN_CHILD: &str = "unknown";
const AVATAR_BASE: &str = "https://api.dicebear.com/7.x/avataaars/svg";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncStatus {
    /// No remote store configured.
    Idle,
    Synced,
    Failed(String),
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncStatus::Idle => f.write_str("local only"),
            SyncStatus::Synced => f.write_str("synced"),
            SyncStatus::Failed(msg) => write!(f, "sync failed: {msg}"),
        }
    }
}

pub fn avatar_for(name: &str) -> String {
    Url::parse_with_params(AVATAR_BASE, &[("seed", name)])
        .map(String::from)
        .unwrap_or_else(|_| format!("{AVATAR_BASE}?seed={name}"))
}

/// Used whenever neither store holds any child.
pub fn default_children() -> Vec<Child> {
    vec![Child {
        id: "1".to_string(),
        name: "Ming".to_string(),
        avatar: avatar_for("Ming"),
    }]
}

type Collections = (Vec<Child>, Vec<Transaction>, Vec<Investment>);

fn fetch_all<T: TabularStore>(remote: &SyncClient<T>) -> Result<Collections, SyncError> {
    Ok((remote.list()?, remote.list()?, remote.list()?))
}

pub struct Ledger<S, T> {
    kv: S,
    remote: Option<SyncClient<T>>,
    children: Vec<Child>,
    transactions: Vec<Transaction>,
    investments: Vec<Investment>,
    status: SyncStatus,
}

impl<S: KeyValueStore, T: TabularStore> Ledger<S, T> {
    pub fn open(kv: S, remote: Option<SyncClient<T>>) -> Result<Self, LedgerError> {
        let mut ledger = Self {
            kv,
            remote,
            children: Vec::new(),
            transactions: Vec::new(),
            investments: Vec::new(),
            status: SyncStatus::Idle,
        };
        ledger.reload()?;
        Ok(ledger)
    }

    /// Startup load. The remote copy wins when all three reads succeed and
    /// becomes the new local snapshot; any failure falls back to the local
    /// snapshot as a whole, so no partially read remote data is kept.
    ///
    /// Changes made while the remote was failing exist only locally, and the
    /// next successful load replaces them. The CLI opens a new session per
    /// command, so that is the next command run with the remote reachable.
    pub fn reload(&mut self) -> Result<(), LedgerError> {
        match self.remote.as_ref().map(fetch_all) {
            None => {
                self.load_local()?;
                self.status = SyncStatus::Idle;
            }
            Some(Ok((children, transactions, investments))) => {
                info!(
                    children = children.len(),
                    transactions = transactions.len(),
                    investments = investments.len(),
                    "loaded ledger from remote"
                );
                self.children = children;
                self.transactions = transactions;
                self.investments = investments;
                self.persist_children()?;
                self.persist_transactions()?;
                self.persist_investments()?;
                self.status = SyncStatus::Synced;
            }
            Some(Err(err)) => {
                warn!(error = %err, "remote load failed, using local snapshot");
                self.load_local()?;
                self.status = SyncStatus::Failed(err.to_string());
            }
        }
        if self.children.is_empty() {
            self.children = default_children();
        }
        Ok(())
    }

    fn load_local(&mut self) -> Result<(), LedgerError> {
        self.children = snapshot::load_or_default(&self.kv, CHILDREN_KEY)?;
        self.transactions = snapshot::load_or_default(&self.kv, TRANSACTIONS_KEY)?;
        self.investments = snapshot::load_or_default(&self.kv, INVESTMENTS_KEY)?;
        Ok(())
    }

    fn persist_children(&self) -> Result<(), LedgerError> {
        snapshot::save(&self.kv, CHILDREN_KEY, &self.children)
    }

    fn persist_transactions(&self) -> Result<(), LedgerError> {
        snapshot::save(&self.kv, TRANSACTIONS_KEY, &self.transactions)
    }

    fn persist_investments(&self) -> Result<(), LedgerError> {
        snapshot::save(&self.kv, INVESTMENTS_KEY, &self.investments)
    }

    fn record(&mut self, outcome: Option<Result<(), SyncError>>, what: &str) {
        match outcome {
            None => {}
            Some(Ok(())) => {
                debug!(what, "synced");
                self.status = SyncStatus::Synced;
            }
            Some(Err(err)) => {
                warn!(what, error = %err, "sync failed, change kept locally");
                self.status = SyncStatus::Failed(err.to_string());
            }
        }
    }

    pub fn sync_status(&self) -> &SyncStatus {
        &self.status
    }

    pub fn remote(&self) -> Option<&SyncClient<T>> {
        self.remote.as_ref()
    }

    pub fn into_store(self) -> S {
        self.kv
    }

    pub fn children(&self) -> &[Child] {
        &self.children
    }

    pub fn child(&self, id: &str) -> Option<&Child> {
        self.children.iter().find(|c| c.id == id)
    }

    /// Looks a child up by id, then by name (case-insensitive).
    pub fn find_child(&self, key: &str) -> Option<&Child> {
        let key = key.trim();
        self.child(key).or_else(|| {
            self.children
                .iter()
                .find(|c| c.name.to_lowercase() == key.to_lowercase())
        })
    }

    pub fn child_name(&self, id: &str) -> &str {
        self.child(id).map(|c| c.name.as_str()).unwrap_or(UNKNOWN_CHILD)
    }

    /// Newest first.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn transaction(&self, id: &str) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id == id)
    }

    /// Newest first.
    pub fn investments(&self) -> &[Investment] {
        &self.investments
    }

    pub fn investment(&self, id: &str) -> Option<&Investment> {
        self.investments.iter().find(|i| i.id == id)
    }

    pub fn summary(&self, child_id: &str) -> Result<Summary, LedgerError> {
        stats::summarize(child_id, &self.transactions, &self.investments)
    }

    // Explicit ids are checked per collection; generated ones avoid all three.
    fn id_taken(&self, id: &str) -> bool {
        self.child(id).is_some() || self.transaction(id).is_some() || self.investment(id).is_some()
    }

    /// Millisecond timestamp, bumped past any id already in the ledger.
    pub fn next_id(&self) -> String {
        let mut stamp = Utc::now().timestamp_millis();
        loop {
            let id = stamp.to_string();
            if !self.id_taken(&id) {
                return id;
            }
            stamp += 1;
        }
    }

    // ── Children ────────────────────────────────────────────────────────

    pub fn add_child(&mut self, name: &str, avatar: Option<&str>) -> Result<Child, LedgerError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LedgerError::InvalidInput("child name is empty".into()));
        }
        if self.children.len() >= CHILD_CAPACITY {
            return Err(LedgerError::ChildLimit(CHILD_CAPACITY));
        }
        let child = Child {
            id: self.next_id(),
            name: name.to_string(),
            avatar: avatar
                .map(str::trim)
                .filter(|a| !a.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| avatar_for(name)),
        };
        self.children.push(child.clone());
        self.persist_children()?;

        let outcome = self.remote.as_ref().map(|r| r.replace_children(&self.children));
        self.record(outcome, "add child");
        Ok(child)
    }

    /// Rejected when `id` is the only child left.
    pub fn remove_child(&mut self, id: &str) -> Result<Child, LedgerError> {
        let pos = self
            .children
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| LedgerError::UnknownChild(id.to_string()))?;
        if self.children.len() <= 1 {
            return Err(LedgerError::LastChild);
        }
        let removed = self.children.remove(pos);
        self.persist_children()?;

        let outcome = self.remote.as_ref().map(|r| r.replace_children(&self.children));
        self.record(outcome, "remove child");
        Ok(removed)
    }

    // ── Transactions ────────────────────────────────────────────────────

    fn check_transaction(t: &Transaction) -> Result<(), LedgerError> {
        if t.id.trim().is_empty() {
            return Err(LedgerError::InvalidInput("transaction id is empty".into()));
        }
        if t.amount.is_sign_negative() && !t.amount.is_zero() {
            return Err(LedgerError::InvalidInput(format!(
                "amount {} must not be negative",
                t.amount
            )));
        }
        Ok(())
    }

    pub fn add_transaction(&mut self, t: Transaction) -> Result<(), LedgerError> {
        Self::check_transaction(&t)?;
        if self.transaction(&t.id).is_some() {
            return Err(LedgerError::DuplicateId(t.id));
        }
        self.transactions.insert(0, t);
        self.persist_transactions()?;

        let outcome = self
            .remote
            .as_ref()
            .map(|r| r.append(&self.transactions[0]));
        self.record(outcome, "add transaction");
        Ok(())
    }

    pub fn update_transaction(&mut self, t: Transaction) -> Result<(), LedgerError> {
        Self::check_transaction(&t)?;
        let slot = self
            .transactions
            .iter_mut()
            .find(|x| x.id == t.id)
            .ok_or_else(|| LedgerError::UnknownTransaction(t.id.clone()))?;
        *slot = t.clone();
        self.persist_transactions()?;

        let outcome = self.remote.as_ref().map(|r| r.update(&t));
        self.record(outcome, "update transaction");
        Ok(())
    }

    pub fn delete_transaction(&mut self, id: &str) -> Result<Transaction, LedgerError> {
        let pos = self
            .transactions
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| LedgerError::UnknownTransaction(id.to_string()))?;
        let removed = self.transactions.remove(pos);
        self.persist_transactions()?;

        let outcome = self
            .remote
            .as_ref()
            .map(|r| r.remove::<Transaction>(id));
        self.record(outcome, "delete transaction");
        Ok(removed)
    }

    // ── Investments ─────────────────────────────────────────────────────

    fn check_investment(i: &Investment) -> Result<(), LedgerError> {
        if i.id.trim().is_empty() {
            return Err(LedgerError::InvalidInput("investment id is empty".into()));
        }
        if i.symbol.trim().is_empty() {
            return Err(LedgerError::InvalidInput("symbol is empty".into()));
        }
        for (label, v) in [
            ("quantity", i.quantity),
            ("price", i.price),
            ("total", i.total_amount),
        ] {
            if v.is_sign_negative() && !v.is_zero() {
                return Err(LedgerError::InvalidInput(format!(
                    "{label} {v} must not be negative"
                )));
            }
        }
        Ok(())
    }

    pub fn add_investment(&mut self, i: Investment) -> Result<(), LedgerError> {
        Self::check_investment(&i)?;
        if self.investment(&i.id).is_some() {
            return Err(LedgerError::DuplicateId(i.id));
        }
        self.investments.insert(0, i);
        self.persist_investments()?;

        let outcome = self
            .remote
            .as_ref()
            .map(|r| r.append(&self.investments[0]));
        self.record(outcome, "add investment");
        Ok(())
    }

    pub fn update_investment(&mut self, i: Investment) -> Result<(), LedgerError> {
        Self::check_investment(&i)?;
        let slot = self
            .investments
            .iter_mut()
            .find(|x| x.id == i.id)
            .ok_or_else(|| LedgerError::UnknownInvestment(i.id.clone()))?;
        *slot = i.clone();
        self.persist_investments()?;

        let outcome = self.remote.as_ref().map(|r| r.update(&i));
        self.record(outcome, "update investment");
        Ok(())
    }

    pub fn delete_investment(&mut self, id: &str) -> Result<Investment, LedgerError> {
        let pos = self
            .investments
            .iter()
            .position(|i| i.id == id)
            .ok_or_else(|| LedgerError::UnknownInvestment(id.to_string()))?;
        let removed = self.investments.remove(pos);
        self.persist_investments()?;

        let outcome = self
            .remote
            .as_ref()
            .map(|r| r.remove::<Investment>(id));
        self.record(outcome, "delete investment");
        Ok(removed)
    }
}
