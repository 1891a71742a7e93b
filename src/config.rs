// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Persistent settings and construction of the remote sync client.
//!
//! The spreadsheet id is stored in the key-value store; the access token is
//! supplied per run (`--token` / `KIDSLEDGER_TOKEN`) and never written down.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::db::KeyValueStore;
use crate::error::LedgerError;
use crate::sheets::GoogleSheets;
use crate::snapshot;
use crate::sync::SyncClient;

pub const SETTINGS_KEY: &str = "kidsledger_settings";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    #[serde(default)]
    pub google_sheet_id: String,
}

impl AppSettings {
    pub fn load(kv: &impl KeyValueStore) -> Result<Self, LedgerError> {
        snapshot::load_or_default(kv, SETTINGS_KEY)
    }

    pub fn save(&self, kv: &impl KeyValueStore) -> Result<(), LedgerError> {
        snapshot::save(kv, SETTINGS_KEY, self)
    }

    pub fn clear(kv: &impl KeyValueStore) -> Result<(), LedgerError> {
        kv.remove(SETTINGS_KEY)
    }
}

/// `None` without an access token: the ledger then runs local-only. With a
/// token but no spreadsheet id the client is built anyway so that every sync
/// reports the missing id.
pub fn remote_client(
    settings: &AppSettings,
    access_token: Option<&str>,
) -> Result<Option<SyncClient<GoogleSheets>>> {
    let Some(token) = access_token.map(str::trim).filter(|t| !t.is_empty()) else {
        debug!("no access token, running local-only");
        return Ok(None);
    };
    let sheets = GoogleSheets::new(token)?;
    Ok(Some(SyncClient::new(sheets, settings.google_sheet_id.as_str())))
}
