// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod children;
pub mod transactions;
pub mod investments;
pub mod reports;
pub mod exporter;
pub mod settings;
pub mod sync;

use anyhow::{Context, Result};

use crate::db::KeyValueStore;
use crate::ledger::Ledger;
use crate::models::Child;
use crate::sheets::TabularStore;

/// `--child` accepts an id or a name.
pub(crate) fn resolve_child<'a, S: KeyValueStore, T: TabularStore>(
    ledger: &'a Ledger<S, T>,
    key: &str,
) -> Result<&'a Child> {
    ledger
        .find_child(key)
        .with_context(|| format!("Child '{}' not found", key.trim()))
}
