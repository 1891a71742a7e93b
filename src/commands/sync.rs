// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::KeyValueStore;
use crate::ledger::Ledger;
use crate::sheets::TabularStore;
use crate::utils::pretty_table;
use anyhow::Result;

pub fn handle<S: KeyValueStore, T: TabularStore>(
    ledger: &Ledger<S, T>,
    m: &clap::ArgMatches,
) -> Result<()> {
    match m.subcommand() {
        Some(("status", _)) => {
            let sheet = ledger
                .remote()
                .map(|r| r.spreadsheet_id().unwrap_or("(not set)").to_string())
                .unwrap_or_else(|| "(no token)".to_string());
            let rows = vec![
                vec!["Spreadsheet".into(), sheet],
                vec!["Status".into(), ledger.sync_status().to_string()],
                vec!["Children".into(), ledger.children().len().to_string()],
                vec!["Transactions".into(), ledger.transactions().len().to_string()],
                vec!["Investments".into(), ledger.investments().len().to_string()],
            ];
            println!("{}", pretty_table(&["Sync", ""], rows));
        }
        _ => {}
    }
    Ok(())
}
