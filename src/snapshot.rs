// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! JSON snapshots of the ledger collections in the key-value store.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::db::KeyValueStore;
use crate::error::LedgerError;

pub const CHILDREN_KEY: &str = "children_list";
pub const TRANSACTIONS_KEY: &str = "transactions";
pub const INVESTMENTS_KEY: &str = "investments";

/// Strict read: `None` when the key is absent, an error when it does not parse.
pub fn read<T: DeserializeOwned>(
    kv: &impl KeyValueStore,
    key: &str,
) -> Result<Option<T>, LedgerError> {
    let Some(raw) = kv.get(key)? else {
        return Ok(None);
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|source| LedgerError::MalformedLocalState {
            key: key.to_string(),
            source,
        })
}

/// Tolerant read: absent and malformed values both come back as the default.
/// Store failures still propagate.
pub fn load_or_default<T: DeserializeOwned + Default>(
    kv: &impl KeyValueStore,
    key: &str,
) -> Result<T, LedgerError> {
    match read(kv, key) {
        Ok(v) => Ok(v.unwrap_or_default()),
        Err(err @ LedgerError::MalformedLocalState { .. }) => {
            warn!(key, error = %err, "discarding malformed local snapshot");
            Ok(T::default())
        }
        Err(err) => Err(err),
    }
}

pub fn save<T: Serialize + ?Sized>(
    kv: &impl KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), LedgerError> {
    let raw = serde_json::to_string(value)?;
    kv.set(key, &raw)
}
