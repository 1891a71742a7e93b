// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Error types shared by the sync client and the ledger session.

use thiserror::Error;

/// Failures talking to the remote tabular store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    /// Network, HTTP or auth failure, carrying the message reported by the store.
    #[error("remote store unavailable: {0}")]
    RemoteUnavailable(String),

    #[error("no spreadsheet id configured")]
    MisconfiguredStore,

    #[error("children sheet holds at most {capacity} rows, got {len}")]
    CapacityExceeded { capacity: usize, len: usize },
}

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("at least one child must remain in the ledger")]
    LastChild,

    #[error("the ledger holds at most {0} children")]
    ChildLimit(usize),

    #[error("child '{0}' not found")]
    UnknownChild(String),

    #[error("transaction '{0}' not found")]
    UnknownTransaction(String),

    #[error("investment '{0}' not found")]
    UnknownInvestment(String),

    #[error("id '{0}' is already in use")]
    DuplicateId(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("{0} is out of range")]
    Overflow(String),

    /// A stored snapshot failed to parse.
    #[error("stored value under '{key}' is malformed: {source}")]
    MalformedLocalState {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("local store error: {0}")]
    Store(#[from] rusqlite::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
